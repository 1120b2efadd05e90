use std::fs;
use std::path::PathBuf;

use huff::files::{
    compression_ratio, decode_file, decode_to_default_output, encode_file,
    encode_to_default_output,
};
use huff::{FormatError, HuffError};

// A fresh directory per test, so tests can run in parallel.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("huff-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn default_outputs_round_trip() {
    let dir = scratch_dir("default-outputs");
    let input = dir.join("testfile.txt");

    for content in ["", "ABRACADABRA\nalakazam\n! : \u{e5}\u{df}\u{2c6}\n\n"] {
        fs::write(&input, content).unwrap();

        let (compressed, summary) = encode_to_default_output(&input).unwrap();
        assert_eq!(compressed, dir.join("testfile.huff"));
        assert_eq!(summary.symbols, content.chars().count() as u64);

        let (decoded, _) = decode_to_default_output(&compressed).unwrap();
        assert_eq!(decoded, dir.join("testfile_decoded.txt"));
        assert_eq!(fs::read_to_string(&decoded).unwrap(), content);
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn explicit_outputs_round_trip() {
    let dir = scratch_dir("explicit-outputs");
    let input = dir.join("source.md");
    let compressed = dir.join("packed.bin");
    let decoded = dir.join("unpacked.md");

    let content = "the quick brown fox jumps over the lazy dog\n".repeat(50);
    fs::write(&input, &content).unwrap();

    let summary = encode_file(&input, &compressed).unwrap();
    assert_eq!(fs::metadata(&compressed).unwrap().len(), summary.total_bytes());
    assert!(compression_ratio(&input, &compressed).unwrap() > 1.0);

    decode_file(&compressed, &decoded).unwrap();
    assert_eq!(fs::read_to_string(&decoded).unwrap(), content);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn encoding_twice_is_byte_identical() {
    let dir = scratch_dir("deterministic");
    let input = dir.join("input.txt");
    fs::write(&input, "she sells sea shells by the sea shore\n").unwrap();

    let first = dir.join("first.huff");
    let second = dir.join("second.huff");
    encode_file(&input, &first).unwrap();
    encode_file(&input, &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn decode_rejects_wrong_extension_before_touching_files() {
    let dir = scratch_dir("wrong-extension");
    let input = dir.join("notes.txt");
    fs::write(&input, "not compressed").unwrap();

    assert!(matches!(
        decode_to_default_output(&input),
        Err(HuffError::UnsupportedExtension { .. })
    ));
    assert!(!dir.join("notes_decoded.txt").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn decode_rejects_corrupted_header() {
    let dir = scratch_dir("corrupted");
    let input = dir.join("bad.huff");
    fs::write(&input, b"65 10 66 10 1114112 0 \n\x55").unwrap();

    match decode_to_default_output(&input) {
        Err(HuffError::Format(FormatError::DuplicateCode { code })) => assert_eq!(code, "10"),
        other => panic!("unexpected result: {:?}", other),
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn encoding_a_huff_file_in_place_is_refused() {
    let dir = scratch_dir("same-file-encode");
    let input = dir.join("notes.huff");
    fs::write(&input, "precious user text\n").unwrap();

    match encode_to_default_output(&input) {
        Err(HuffError::SameInputAndOutput { path }) => {
            assert_eq!(path, fs::canonicalize(&input).unwrap())
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(fs::read_to_string(&input).unwrap(), "precious user text\n");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn decoding_onto_the_input_is_refused() {
    let dir = scratch_dir("same-file-decode");
    let source = dir.join("source.txt");
    fs::write(&source, "abc\n").unwrap();
    let (compressed, _) = encode_to_default_output(&source).unwrap();
    let before = fs::read(&compressed).unwrap();

    // Same file reached through a different spelling of the path.
    let aliased = dir.join(".").join("source.huff");
    assert!(matches!(
        decode_file(&compressed, &aliased),
        Err(HuffError::SameInputAndOutput { .. })
    ));
    assert_eq!(fs::read(&compressed).unwrap(), before);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = scratch_dir("missing");

    assert!(matches!(
        encode_to_default_output(&dir.join("absent.txt")),
        Err(HuffError::Io(_))
    ));

    fs::remove_dir_all(&dir).unwrap();
}
