//! Resource primitives following a check + apply pattern.
pub mod error;
pub mod package;
pub mod symlink;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Packages implement only this trait: their state comes from one bulk
/// query rather than a per-resource check.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// A failure that should only skip this resource is reported as
    /// [`ResourceChange::Skipped`]; an `Err` means the change itself failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying command or filesystem call fails.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource before it is applied.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::resources::ResourceState;
///
/// let wrong = ResourceState::Incorrect { current: "target is a regular file".into() };
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists yet.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Something exists but does not match the desired state.
    Incorrect {
        /// Description of what is currently there.
        current: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or replaced.
    Applied,
    /// Resource was left alone.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Resources that can determine their own state.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;
}
