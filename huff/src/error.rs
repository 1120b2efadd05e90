use std::path::PathBuf;

use thiserror::Error;

use crate::symbol::Symbol;

pub type Result<T> = std::result::Result<T, HuffError>;

#[derive(Debug, Error)]
pub enum HuffError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed compressed file: {0}")]
    Format(#[from] FormatError),

    #[error("input is not valid UTF-8 (at byte offset {offset})")]
    InvalidUtf8 { offset: u64 },

    #[error("can only decompress .huff files, got {}", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("refusing to overwrite input {} with its own output", path.display())]
    SameInputAndOutput { path: PathBuf },
}

/// A compressed file that cannot be decoded. Header errors are raised before
/// any body bit is read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("header is not terminated by a newline")]
    MissingHeaderTerminator,

    #[error("header is not valid UTF-8")]
    HeaderNotUtf8,

    #[error("header has an odd number of fields ({count})")]
    OddTokenCount { count: usize },

    #[error("invalid symbol {token:?} in header")]
    InvalidSymbol { token: String },

    #[error("invalid code {token:?} in header")]
    InvalidCode { token: String },

    #[error("symbol {symbol} is listed more than once")]
    DuplicateSymbol { symbol: Symbol },

    #[error("code {code} is assigned to more than one symbol")]
    DuplicateCode { code: String },

    #[error("header codes are not prefix-free")]
    NotPrefixFree,

    #[error("header has no end-of-stream entry")]
    MissingSentinel,

    #[error("body ended before the end-of-stream code")]
    UnexpectedEndOfBody,

    #[error("body contains a bit sequence that matches no code")]
    UnmatchedCode,
}
