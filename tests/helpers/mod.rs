//! Shared fixtures for on-disk sequence tests

use frameseq::sequence::make_seq;
use frameseq::OsFileSystem;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding `shot.0001.txt ..= shot.<count>.txt`
pub fn shot_sequence(count: i64) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    make_seq(&OsFileSystem, tmp.path(), "shot", count, 4, 1).expect("fixture sequence");
    let first = tmp.path().join("shot.0001.txt");
    (tmp, first)
}

pub fn frame(dir: &Path, name: &str, index: i64) -> PathBuf {
    dir.join(format!("{}.{:04}.txt", name, index))
}

pub fn read_frame(dir: &Path, name: &str, index: i64) -> String {
    fs::read_to_string(frame(dir, name, index)).expect("frame contents")
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read_dir")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
