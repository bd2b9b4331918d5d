//! Filesystem backends used by sequence operations
//!
//! Every sequence operation works against the `FileSystem` trait so it can run
//! on the real disk (`OsFileSystem`) or on an in-memory tree
//! (`MemoryFileSystem`) in tests.

use dashmap::{DashMap, DashSet};
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Primitive file operations. Each call is individually reliable; nothing
/// groups them into transactions.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    /// Move `from` to `to`, replacing any file already at `to`
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    /// Copy file contents, replacing any file already at `to`
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

// ============================================================================
// OS backend
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    /// Falls back to copy + remove when the OS rename fails (e.g. across
    /// filesystems). The fallback's own error is returned; if the copy
    /// succeeded but removing `from` failed, the file exists at both paths.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if from.is_file() => {
                debug!("rename {:?} -> {:?} failed ({}), trying copy", from, to, e);
                copy_then_remove(from, to)
            }
            Err(e) => Err(e),
        }
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map_err(|e| {
        warn!("Move fallback could not copy {:?} to {:?}: {}", from, to, e);
        e
    })?;
    fs::remove_file(from).map_err(|e| {
        warn!(
            "Copied {:?} to {:?} but could not remove the source: {}",
            from, to, e
        );
        e
    })
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory file tree. Parent directories of files are implicit.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: DashMap<PathBuf, Vec<u8>>,
    dirs: DashSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// All file paths, sorted
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
            || self
                .files
                .iter()
                .any(|entry| entry.key().starts_with(path) && entry.key() != path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.is_file(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a file", path.display()),
            ));
        }
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if from == to {
            return if self.is_file(from) {
                Ok(())
            } else {
                Err(Self::not_found(from))
            };
        }
        let (_, contents) = self.files.remove(from).ok_or_else(|| Self::not_found(from))?;
        self.files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        let contents = self.read(from)?;
        self.files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Self::not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== MemoryFileSystem tests ==========

    #[test]
    fn test_memory_write_read() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/seq/a.1.txt"), b"1").unwrap();
        assert!(fs.is_file(Path::new("/seq/a.1.txt")));
        assert_eq!(fs.read(Path::new("/seq/a.1.txt")).unwrap(), b"1");
    }

    #[test]
    fn test_memory_implicit_parent_dir() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/seq/a.1.txt"), b"1").unwrap();
        assert!(fs.is_dir(Path::new("/seq")));
        assert!(fs.exists(Path::new("/seq")));
        assert!(!fs.is_file(Path::new("/seq")));
    }

    #[test]
    fn test_memory_rename_overwrites() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/a"), b"a").unwrap();
        fs.write(Path::new("/b"), b"b").unwrap();
        fs.rename(Path::new("/a"), Path::new("/b")).unwrap();
        assert!(!fs.exists(Path::new("/a")));
        assert_eq!(fs.read(Path::new("/b")).unwrap(), b"a");
        assert_eq!(fs.file_count(), 1);
    }

    #[test]
    fn test_memory_rename_onto_itself() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/a"), b"a").unwrap();
        fs.rename(Path::new("/a"), Path::new("/a")).unwrap();
        assert_eq!(fs.read(Path::new("/a")).unwrap(), b"a");
    }

    #[test]
    fn test_memory_rename_missing_source() {
        let fs = MemoryFileSystem::new();
        let err = fs.rename(Path::new("/a"), Path::new("/b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_copy_keeps_source() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/a"), b"a").unwrap();
        fs.copy(Path::new("/a"), Path::new("/out/a")).unwrap();
        assert_eq!(fs.read(Path::new("/a")).unwrap(), b"a");
        assert_eq!(fs.read(Path::new("/out/a")).unwrap(), b"a");
    }

    #[test]
    fn test_memory_create_dir_all() {
        let fs = MemoryFileSystem::new();
        fs.create_dir_all(Path::new("/x/y/z")).unwrap();
        assert!(fs.is_dir(Path::new("/x/y/z")));
        assert!(fs.is_dir(Path::new("/x")));
        assert_eq!(fs.file_count(), 0);
    }

    #[test]
    fn test_memory_file_paths_sorted() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/b"), b"").unwrap();
        fs.write(Path::new("/a"), b"").unwrap();
        assert_eq!(
            fs.file_paths(),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    // ========== OsFileSystem tests ==========

    #[test]
    fn test_copy_then_remove_moves_file() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let from = tmp.path().join("a.txt");
        let to = tmp.path().join("b.txt");
        fs::write(&from, b"frame").unwrap();

        copy_then_remove(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"frame");
    }

    #[test]
    fn test_copy_then_remove_reports_copy_error() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let from = tmp.path().join("a.txt");
        let to = tmp.path().join("missing-dir").join("b.txt");
        fs::write(&from, b"frame").unwrap();

        let err = copy_then_remove(&from, &to).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read(&from).unwrap(), b"frame");
    }

    #[test]
    fn test_os_rename_missing_source() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let err = OsFileSystem
            .rename(&tmp.path().join("nope.txt"), &tmp.path().join("b.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_os_rename_and_copy() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let fs = OsFileSystem;
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.txt");
        let c = tmp.path().join("sub").join("c.txt");

        fs.write(&a, b"hello").unwrap();
        fs.rename(&a, &b).unwrap();
        assert!(!fs.exists(&a));

        fs.create_dir_all(c.parent().unwrap()).unwrap();
        fs.copy(&b, &c).unwrap();
        assert_eq!(fs.read(&c).unwrap(), b"hello");
        assert!(fs.is_file(&b));
    }
}
