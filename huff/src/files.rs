use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use crate::codec::{decode, encode, DecodeSummary, EncodeSummary};
use crate::error::{HuffError, Result};

pub const COMPRESSED_EXTENSION: &str = "huff";
pub const DECODED_SUFFIX: &str = "_decoded";
pub const TEXT_EXTENSION: &str = "txt";

/// `notes.txt` becomes `notes.huff`.
pub fn encoded_path(input: &Path) -> PathBuf {
    input.with_extension(COMPRESSED_EXTENSION)
}

/// `notes.huff` becomes `notes_decoded.txt`. Anything not ending in `.huff` is
/// rejected.
pub fn decoded_path(input: &Path) -> Result<PathBuf> {
    require_compressed_extension(input)?;

    let stem = input
        .file_stem()
        .ok_or_else(|| HuffError::UnsupportedExtension {
            path: input.to_path_buf(),
        })?;

    let mut name = stem.to_os_string();
    name.push(DECODED_SUFFIX);
    name.push(".");
    name.push(TEXT_EXTENSION);

    Ok(input.with_file_name(name))
}

pub fn require_compressed_extension(path: &Path) -> Result<()> {
    match path.extension() {
        Some(extension) if extension == COMPRESSED_EXTENSION => Ok(()),
        _ => Err(HuffError::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

/// Fails if `output_path` names the file at `input_path`, which creating the
/// output would truncate before it is read.
pub fn require_distinct_output(input_path: &Path, output_path: &Path) -> Result<()> {
    let input = fs::canonicalize(input_path)?;

    match fs::canonicalize(output_path) {
        Ok(output) if output == input => Err(HuffError::SameInputAndOutput { path: input }),
        Ok(_) => Ok(()),
        // Output doesn't exist yet, so it can't be the input.
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn encode_file(input_path: &Path, output_path: &Path) -> Result<EncodeSummary> {
    require_distinct_output(input_path, output_path)?;

    let input_file = File::open(input_path)?;
    let output_file = File::create(output_path)?;

    let buf_writer = BufWriter::new(output_file);

    let summary = encode(input_file, buf_writer)?;
    log::info!(
        "compressed {} into {} ({} symbols, {} bytes)",
        input_path.display(),
        output_path.display(),
        summary.symbols,
        summary.total_bytes()
    );

    Ok(summary)
}

pub fn decode_file(input_path: &Path, output_path: &Path) -> Result<DecodeSummary> {
    require_distinct_output(input_path, output_path)?;

    let input_file = File::open(input_path)?;
    let output_file = File::create(output_path)?;

    let buf_reader = BufReader::new(input_file);
    let buf_writer = BufWriter::new(output_file);

    let summary = decode(buf_reader, buf_writer)?;
    log::info!(
        "decompressed {} into {} ({} symbols)",
        input_path.display(),
        output_path.display(),
        summary.symbols
    );

    Ok(summary)
}

/// Compresses `input_path` next to itself, with its extension replaced by
/// `.huff`.
pub fn encode_to_default_output(input_path: &Path) -> Result<(PathBuf, EncodeSummary)> {
    let output_path = encoded_path(input_path);
    let summary = encode_file(input_path, &output_path)?;
    Ok((output_path, summary))
}

/// Decompresses a `.huff` file into `<stem>_decoded.txt` next to it.
pub fn decode_to_default_output(input_path: &Path) -> Result<(PathBuf, DecodeSummary)> {
    let output_path = decoded_path(input_path)?;
    let summary = decode_file(input_path, &output_path)?;
    Ok((output_path, summary))
}

/// Size of `original` divided by the size of `compressed`.
pub fn compression_ratio(original: &Path, compressed: &Path) -> Result<f64> {
    let original_size = fs::metadata(original)?.len();
    let compressed_size = fs::metadata(compressed)?.len();

    Ok(original_size as f64 / compressed_size as f64)
}
