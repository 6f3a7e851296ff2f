//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the linker can be
//! unit-tested without touching the real filesystem, including failures
//! that are hard to provoke on a real disk.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of an existing filesystem entry, determined without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or anything that is neither a directory nor a link).
    File,
    /// Real directory.
    Dir,
    /// Symbolic link, dangling or not.
    Symlink,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "regular file"),
            Self::Dir => write!(f, "directory"),
            Self::Symlink => write!(f, "symlink"),
        }
    }
}

/// Abstraction over the filesystem calls made by the linker.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Names of the immediate subdirectories of `path`, sorted by name.
    ///
    /// Entries are typed without following links, so a symlink to a
    /// directory is not reported.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be read as a directory.
    fn subdirectories(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Kind of the entry at `path`, or `None` if nothing is there.
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a component cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove whatever is at `path`: a directory with its contents, or a
    /// file or link (never the link's target).
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to the directory `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink_dir(&self, source: &Path, link: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn subdirectories(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name());
            }
        }
        names.sort();
        Ok(names)
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let file_type = std::fs::symlink_metadata(path).ok()?.file_type();
        Some(if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        })
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.file_type().is_symlink() {
            remove_link(path, &meta)
        } else if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn symlink_dir(&self, source: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, link)
        }
        #[cfg(windows)]
        {
            std::os::windows::fs::symlink_dir(source, link)
        }
    }
}

/// Remove a symlink without touching its target.
///
/// On Windows, directory symlinks carry `FILE_ATTRIBUTE_DIRECTORY` and must be
/// removed with `remove_dir`.
#[cfg(windows)]
fn remove_link(path: &Path, meta: &std::fs::Metadata) -> io::Result<()> {
    use std::os::windows::fs::MetadataExt as _;
    if meta.file_attributes() & 0x10 != 0 {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

#[cfg(not(windows))]
fn remove_link(path: &Path, _meta: &std::fs::Metadata) -> io::Result<()> {
    std::fs::remove_file(path)
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Pre-configure listings and existing entries with the builder methods,
/// optionally mark paths whose removal, linking or creation must fail, then
/// inspect [`ops`](Self::ops) to see what the code under test did.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    listings: std::collections::HashMap<PathBuf, Vec<OsString>>,
    entries: std::sync::Mutex<std::collections::HashMap<PathBuf, MockEntry>>,
    failing_remove: std::collections::HashSet<PathBuf>,
    failing_link: std::collections::HashSet<PathBuf>,
    failing_create: std::collections::HashSet<PathBuf>,
    ops: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
#[derive(Debug, Clone)]
enum MockEntry {
    File,
    Dir,
    Symlink(PathBuf),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `dir` readable, listing the given subdirectory names.
    #[must_use]
    pub fn with_subdirectories(mut self, dir: impl Into<PathBuf>, names: &[&str]) -> Self {
        self.listings
            .insert(dir.into(), names.iter().map(OsString::from).collect());
        self
    }

    /// Place a regular file at `path`.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::File);
        self
    }

    /// Place a real directory at `path`.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Dir);
        self
    }

    /// Place a symlink at `path` pointing to `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Symlink(target.into()));
        self
    }

    /// Make [`FileSystemOps::remove_all`] fail for `path`.
    #[must_use]
    pub fn failing_remove(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_remove.insert(path.into());
        self
    }

    /// Make [`FileSystemOps::symlink_dir`] fail when creating `link`.
    #[must_use]
    pub fn failing_link(mut self, link: impl Into<PathBuf>) -> Self {
        self.failing_link.insert(link.into());
        self
    }

    /// Make [`FileSystemOps::create_dir_all`] fail for `path`.
    #[must_use]
    pub fn failing_create(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_create.insert(path.into());
        self
    }

    /// Mutating operations performed so far, in order.
    #[must_use]
    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().expect("mock ops poisoned").clone()
    }

    /// Target of the symlink currently at `path`, if any.
    #[must_use]
    pub fn link_target(&self, path: &Path) -> Option<PathBuf> {
        match self.entries.lock().expect("mock entries poisoned").get(path) {
            Some(MockEntry::Symlink(target)) => Some(target.clone()),
            _ => None,
        }
    }

    fn insert(&self, path: PathBuf, entry: MockEntry) {
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .insert(path, entry);
    }

    fn record(&self, op: String) {
        self.ops.lock().expect("mock ops poisoned").push(op);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn subdirectories(&self, path: &Path) -> io::Result<Vec<OsString>> {
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .get(path)
            .map(|entry| match entry {
                MockEntry::File => EntryKind::File,
                MockEntry::Dir => EntryKind::Dir,
                MockEntry::Symlink(_) => EntryKind::Symlink,
            })
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.link_target(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.failing_create.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.record(format!("mkdir {}", path.display()));
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        if self.failing_remove.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .remove(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        self.record(format!("remove {}", path.display()));
        Ok(())
    }

    fn symlink_dir(&self, source: &Path, link: &Path) -> io::Result<()> {
        if self.failing_link.contains(link) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        if self.entry_kind(link).is_some() {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        self.insert(link.to_path_buf(), MockEntry::Symlink(source.to_path_buf()));
        self.record(format!("link {} -> {}", link.display(), source.display()));
        Ok(())
    }
}
