//! Symlink resource.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::operations::{EntryKind, FileSystemOps};

/// A directory symlink that can be checked and applied.
#[derive(Debug)]
pub struct SymlinkResource<'a> {
    /// The directory the symlink points to.
    pub source: PathBuf,
    /// Where the symlink is created.
    pub target: PathBuf,
    fs_ops: &'a dyn FileSystemOps,
}

impl<'a> SymlinkResource<'a> {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, fs_ops: &'a dyn FileSystemOps) -> Self {
        Self {
            source,
            target,
            fs_ops,
        }
    }
}

impl Applicable for SymlinkResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    /// Replace whatever is at the target with a link to the source.
    ///
    /// A target that cannot be removed yields [`ResourceChange::Skipped`];
    /// a link that cannot be created is an error.
    fn apply(&self) -> Result<ResourceChange> {
        if let Some(kind) = self.fs_ops.entry_kind(&self.target)
            && let Err(e) = self.fs_ops.remove_all(&self.target)
        {
            return Ok(ResourceChange::Skipped {
                reason: format!(
                    "could not remove existing {kind} {}: {e}",
                    self.target.display()
                ),
            });
        }

        self.fs_ops
            .symlink_dir(&self.source, &self.target)
            .map_err(|source| ResourceError::Io {
                action: "link",
                path: self.target.clone(),
                source,
            })?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let state = match self.fs_ops.entry_kind(&self.target) {
            None => ResourceState::Missing,
            Some(EntryKind::Symlink) => match self.fs_ops.read_link(&self.target) {
                Ok(existing) if paths_equal(&existing, &self.source) => ResourceState::Correct,
                Ok(existing) => ResourceState::Incorrect {
                    current: format!("points to {}", existing.display()),
                },
                Err(_) => ResourceState::Incorrect {
                    current: "unreadable symlink".to_string(),
                },
            },
            Some(kind) => ResourceState::Incorrect {
                current: format!("target is a {kind}"),
            },
        };
        Ok(state)
    }
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}
