//! Shared types and data structures for sequence handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Sequence Types
// ============================================================================

/// Parsed form of one frame path: `directory/base_name + padded(index) + extension`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDescriptor {
    pub directory: PathBuf,
    /// Everything before the digit run, including any separator ("shot.")
    pub base_name: String,
    pub digit_width: usize,
    pub start_index: i64,
    /// Includes the leading dot (".exr"); empty when the file has none
    pub extension: String,
}

impl SequenceDescriptor {
    /// Path of frame `index` using the parsed digit width
    pub fn frame_path(&self, index: i64) -> PathBuf {
        self.frame_path_in(&self.directory, &self.base_name, index, self.digit_width)
    }

    /// Path of frame `index` projected onto another directory, base name or width
    pub fn frame_path_in(
        &self,
        directory: &Path,
        base_name: &str,
        index: i64,
        digit_width: usize,
    ) -> PathBuf {
        directory.join(format!(
            "{}{}{}",
            base_name,
            pad_index(index, digit_width),
            self.extension
        ))
    }
}

/// Zero-pad an index to at least `digit_width` characters. Never truncates;
/// a minus sign stays in front of the padding.
pub fn pad_index(index: i64, digit_width: usize) -> String {
    format!("{:0width$}", index, width = digit_width)
}

/// Number of frames in `start..=last`; 0 when `last < start`
pub fn frame_count(start: i64, last: i64) -> usize {
    let count = i128::from(last) - i128::from(start) + 1;
    usize::try_from(count.max(0)).unwrap_or(usize::MAX)
}

// ============================================================================
// Result Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SequenceOperationResult {
    pub success: bool,
    pub message: String,
    pub files_processed: usize,
    /// First frame of the sequence after the operation
    pub first_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SequenceReport {
    pub descriptor: SequenceDescriptor,
    pub first_index: i64,
    /// Last contiguous frame; `first_index - 1` when the first frame is missing
    pub last_index: i64,
    pub length: usize,
    pub missing: Vec<i64>,
    /// `missing` collapsed into "1-3, 7" form
    pub missing_ranges: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FixtureSequence {
    pub made: Vec<PathBuf>,
    pub missed: Vec<i64>,
}
