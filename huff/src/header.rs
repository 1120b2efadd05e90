//! The code table header: a single text line of `<symbol> <code> ` pairs,
//! terminated by a newline. Symbols are decimal, codes are strings of `0` and
//! `1`. Entries are written in ascending symbol order.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use crate::error::{FormatError, Result};
use crate::huffman::{CodeTable, PrefixCode, ReverseCodeTable};
use crate::symbol::{self, Symbol, SENTINEL};

/// Writes `table` as a header line and returns its length in bytes.
pub fn write_header(writer: &mut impl Write, table: &CodeTable) -> std::io::Result<usize> {
    let mut line = String::new();
    for (symbol, code) in table.iter() {
        write!(line, "{} {} ", symbol, code)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    }
    line.push('\n');

    writer.write_all(line.as_bytes())?;

    Ok(line.len())
}

/// Reads the header line and leaves `reader` at the first body byte.
pub fn read_header(reader: &mut impl BufRead) -> Result<ReverseCodeTable> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;

    if line.pop() != Some(b'\n') {
        return Err(FormatError::MissingHeaderTerminator.into());
    }

    let line = std::str::from_utf8(&line).map_err(|_| FormatError::HeaderNotUtf8)?;

    Ok(parse_header(line)?)
}

/// Parses and validates a header line (without its newline).
pub fn parse_header(line: &str) -> std::result::Result<ReverseCodeTable, FormatError> {
    let table = parse_entries(line)?;

    let reverse = table.reverse()?;

    if !table.is_prefix_free() {
        return Err(FormatError::NotPrefixFree);
    }

    if table.code(SENTINEL).is_none() {
        return Err(FormatError::MissingSentinel);
    }

    Ok(reverse)
}

/// Splits a header line into `(symbol, code)` entries.
pub fn parse_entries(line: &str) -> std::result::Result<CodeTable, FormatError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();

    if tokens.len() % 2 != 0 {
        return Err(FormatError::OddTokenCount {
            count: tokens.len(),
        });
    }

    let entries = tokens
        .chunks_exact(2)
        .map(|pair| Ok((parse_symbol(pair[0])?, parse_code(pair[1])?)))
        .collect::<std::result::Result<Vec<_>, FormatError>>()?;

    CodeTable::from_entries(entries)
}

fn parse_symbol(token: &str) -> std::result::Result<Symbol, FormatError> {
    let invalid = || FormatError::InvalidSymbol {
        token: token.to_string(),
    };

    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let symbol = token.parse::<Symbol>().map_err(|_| invalid())?;

    if symbol != SENTINEL && symbol::to_char(symbol).is_none() {
        return Err(invalid());
    }

    Ok(symbol)
}

fn parse_code(token: &str) -> std::result::Result<PrefixCode, FormatError> {
    PrefixCode::parse(token).ok_or_else(|| FormatError::InvalidCode {
        token: token.to_string(),
    })
}
