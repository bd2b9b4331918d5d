//! Numbered file sequence handling
//!
//! This module covers:
//! - Parsing frame paths into sequence descriptors
//! - Read-only queries (gaps, length, range formatting, reports)
//! - Destructive operations (offset, rename, reverse)
//! - Fixture generation for tests and demos

pub mod fixtures;
mod operations;
mod parser;
mod queries;

pub use fixtures::{make_seq, make_seq_primeholes, make_seq_withholes};
pub use operations::{offset_seq, rename_seq, reverse_seq};
pub use parser::parse_item;
pub use queries::{collapse_list, gap_check, sequence_length, sequence_report};
