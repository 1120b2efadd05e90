use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{FormatError, Result};
use crate::frequency::count_frequencies;
use crate::header::{read_header, write_header};
use crate::huffman::{HuffmanTree, PrefixCode};
use crate::symbol::{self, Symbol, SymbolReader, SENTINEL};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Characters read from the input.
    pub symbols: u64,
    /// Entries in the code table, the sentinel included.
    pub distinct_symbols: usize,
    pub header_bytes: usize,
    /// Body bits before padding, the sentinel's code included.
    pub body_bits: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub symbols: u64,
}

impl EncodeSummary {
    pub fn body_bytes(&self) -> u64 {
        (self.body_bits + 7) / 8
    }

    pub fn total_bytes(&self) -> u64 {
        self.header_bytes as u64 + self.body_bytes()
    }
}

/// Compresses UTF-8 text from `reader` into `writer`.
///
/// The input is read twice: once to count symbol frequencies, and again, after
/// rewinding, to emit the codes. Nothing but the code table is held in memory.
pub fn encode(mut reader: impl Read + Seek, writer: impl Write) -> Result<EncodeSummary> {
    log::debug!("scanning frequencies");
    let freqs = count_frequencies(BufReader::new(&mut reader))?;
    reader.rewind()?;

    log::debug!(
        "building tree for {} symbols ({} distinct)",
        freqs.total(),
        freqs.len()
    );
    let tree = HuffmanTree::build(&freqs);

    let table = tree.code_table();
    log::debug!("generated {} codes, longest is {} bits", table.len(), table.max_length());
    log::trace!("code table:\n{}", table);

    let mut bit_writer = BitWriter::new(writer);
    let header_bytes = write_header(&mut bit_writer, &table)?;
    log::debug!("wrote {} byte header", header_bytes);

    let mut symbols = 0;
    for character in SymbolReader::new(BufReader::new(&mut reader)) {
        let character = character?;
        let code = table.code(character as Symbol).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{:?} was not seen on the first pass", character),
            )
        })?;
        bit_writer.write_bits(code.code, code.length)?;
        symbols += 1;
    }

    let eof = table.code(SENTINEL).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "code table has no end-of-stream code")
    })?;
    bit_writer.write_bits(eof.code, eof.length)?;

    let body_bits = bit_writer.bits_written();
    bit_writer.into_inner()?;
    log::debug!("wrote {} symbols in {} body bits", symbols, body_bits);

    Ok(EncodeSummary {
        symbols,
        distinct_symbols: table.len(),
        header_bytes,
        body_bits,
    })
}

/// Decompresses `reader` into `writer`.
///
/// The header is fully validated before the first body bit is read. Bits after
/// the sentinel's code are ignored.
pub fn decode(mut reader: impl BufRead, mut writer: impl Write) -> Result<DecodeSummary> {
    log::debug!("parsing header");
    let table = read_header(&mut reader)?;
    log::debug!("parsed header, longest code is {} bits", table.max_length());

    let mut bit_reader = BitReader::new(reader);
    let mut candidate = PrefixCode::default();
    let mut symbols = 0;
    let mut utf8 = [0u8; 4];

    loop {
        let bit = bit_reader
            .read_bit()?
            .ok_or(FormatError::UnexpectedEndOfBody)?;
        candidate = PrefixCode::update(candidate, bit);

        match table.symbol(&candidate) {
            Some(SENTINEL) => break,
            Some(symbol) => {
                let character = symbol::to_char(symbol).ok_or_else(|| FormatError::InvalidSymbol {
                    token: symbol.to_string(),
                })?;
                writer.write_all(character.encode_utf8(&mut utf8).as_bytes())?;
                symbols += 1;
                candidate = PrefixCode::default();
            }
            None if candidate.length >= table.max_length() => {
                return Err(FormatError::UnmatchedCode.into());
            }
            None => {}
        }
    }

    writer.flush()?;
    log::debug!("decoded {} symbols", symbols);

    Ok(DecodeSummary { symbols })
}

pub fn encode_bytes(source: &[u8]) -> Result<Vec<u8>> {
    let mut compressed = Vec::new();
    encode(Cursor::new(source), &mut compressed)?;
    Ok(compressed)
}

pub fn decode_bytes(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut source = Vec::new();
    decode(compressed, &mut source)?;
    Ok(source)
}
