//! File system access module
//!
//! Sequence operations go through the `FileSystem` trait so they can target
//! the real disk or an in-memory tree:
//! - `OsFileSystem` wraps `std::fs`
//! - `MemoryFileSystem` keeps files in a concurrent map

mod filesystem;

pub use filesystem::{FileSystem, MemoryFileSystem, OsFileSystem};
