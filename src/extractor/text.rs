use crate::extractor::ExtractionError;
use std::fs;
use std::path::Path;

/// Reads a plain-text or source file.
///
/// UTF-8 is tried first; anything else is decoded as Latin-1, which maps
/// every byte to a code point and therefore cannot fail. Line endings are
/// normalized to `\n`.
pub fn read_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = fs::read(path)?;
    Ok(normalize_newlines(decode_text(bytes)))
}

pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => decode_latin1(err.as_bytes()),
    }
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}
