//! Huffman compression of UTF-8 text files.
//!
//! A compressed file is a text header line listing every symbol's code,
//! followed by the bit-packed body, terminated by an out-of-band end-of-stream
//! symbol.
//!
//! ```
//! let compressed = huff::encode_bytes(b"ABRACADABRA\n")?;
//! assert_eq!(huff::decode_bytes(&compressed)?, b"ABRACADABRA\n");
//! # Ok::<(), huff::HuffError>(())
//! ```

pub mod bitio;
pub mod codec;
pub mod error;
pub mod files;
pub mod frequency;
pub mod header;
pub mod huffman;
pub mod symbol;

pub use codec::{decode, decode_bytes, encode, encode_bytes, DecodeSummary, EncodeSummary};
pub use error::{FormatError, HuffError, Result};
pub use files::{decode_to_default_output, encode_to_default_output};
