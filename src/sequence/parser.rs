//! Frame path parsing
//!
//! Sequences are named `dir/name####.ext` or `dir/name.####.ext` with any
//! number of leading zeroes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::error::{Result, SequenceError};
use crate::types::SequenceDescriptor;

/// Trailing digit run of a file stem; the lazy prefix keeps every digit in the run
static TRAILING_DIGITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?s)(.*?)([0-9]+)$").unwrap_or_else(|e| panic!("invalid frame regex: {}", e))
});

/// Split a frame path into directory, base name, digit width, index and extension
pub fn parse_item(path: &Path) -> Result<SequenceDescriptor> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SequenceError::parse(path, "missing or non UTF-8 file name"))?;

    let (stem, extension) = match file_name.rfind('.') {
        Some(dot) => file_name.split_at(dot),
        None => (file_name, ""),
    };

    let captures = TRAILING_DIGITS
        .captures(stem)
        .ok_or_else(|| SequenceError::parse(path, "no trailing frame number before the extension"))?;
    let base_name = &captures[1];
    let digits = &captures[2];

    let start_index: i64 = digits
        .parse()
        .map_err(|e| SequenceError::parse(path, format!("frame number '{}': {}", digits, e)))?;

    Ok(SequenceDescriptor {
        directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        base_name: base_name.to_string(),
        digit_width: digits.len(),
        start_index,
        extension: extension.to_string(),
    })
}
