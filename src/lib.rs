//! frameseq - numbered file sequence inspection and manipulation
//!
//! Works on files named `dir/name####.ext` or `dir/name.####.ext`: finds gaps,
//! measures the contiguous run, and renumbers, renames or reverses sequences
//! on disk.

// Module declarations
pub mod config;
pub mod error;
pub mod files;
pub mod sequence;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SequenceError};
pub use files::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use sequence::{
    collapse_list, gap_check, offset_seq, parse_item, rename_seq, reverse_seq, sequence_length,
    sequence_report,
};
pub use types::*;
