use std::io::{ErrorKind, Read};

use crate::error::{HuffError, Result};

/// A Unicode scalar value, or the `SENTINEL`.
pub type Symbol = u32;

/// End-of-stream marker. It is the first value past the Unicode scalar range,
/// so it can never collide with a symbol read from the input.
pub const SENTINEL: Symbol = char::MAX as Symbol + 1;

/// Returns the character `symbol` stands for, or `None` for the sentinel and
/// for values that are not Unicode scalar values.
pub fn to_char(symbol: Symbol) -> Option<char> {
    char::from_u32(symbol)
}

/// Decodes a UTF-8 byte stream into characters, one at a time.
///
/// The reader is pulled from in single bytes, so it should be buffered.
pub struct SymbolReader<R: Read> {
    reader: R,
    offset: u64,
}

impl<R: Read> SymbolReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    /// Number of input bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn read_char(&mut self) -> Result<Option<char>> {
        let mut buffer = [0u8; 4];

        let read_bytes = loop {
            match self.reader.read(&mut buffer[..1]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if read_bytes == 0 {
            return Ok(None);
        }

        let invalid = HuffError::InvalidUtf8 {
            offset: self.offset,
        };

        let width = match utf8_width(buffer[0]) {
            Some(width) => width,
            None => return Err(invalid),
        };

        if let Err(e) = self.reader.read_exact(&mut buffer[1..width]) {
            return Err(if e.kind() == ErrorKind::UnexpectedEof {
                invalid
            } else {
                e.into()
            });
        }

        let character = std::str::from_utf8(&buffer[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or(invalid)?;

        self.offset += width as u64;

        Ok(Some(character))
    }
}

impl<R: Read> Iterator for SymbolReader<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_char().transpose()
    }
}

// Length of the UTF-8 sequence introduced by `lead`, or `None` if `lead` can't
// start one.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
