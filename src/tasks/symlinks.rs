//! Link each config directory into the destination root.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::error::BootstrapError;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// Replaces `<dest>/<name>` with a symlink to `<source>/<name>` for every
/// immediate subdirectory of the config source.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkConfigs;

impl Task for LinkConfigs {
    fn name(&self) -> &str {
        "Link configs"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let source_root = ctx.config.config_source();
        let dest_root = &ctx.config.layout.config_dest;

        ctx.log
            .info(&format!("reading configs from {}", source_root.display()));
        let names = ctx.fs_ops.subdirectories(&source_root).map_err(|source| {
            BootstrapError::ConfigSourceUnreadable {
                path: source_root.clone(),
                source,
            }
        })?;

        if ctx.dry_run {
            if ctx.fs_ops.entry_kind(dest_root).is_none() {
                ctx.log
                    .dry_run(&format!("would create {}", dest_root.display()));
            }
        } else {
            ctx.fs_ops
                .create_dir_all(dest_root)
                .map_err(|source| BootstrapError::DestinationRoot {
                    path: dest_root.clone(),
                    source,
                })?;
        }

        let mut stats = TaskStats::new();
        for name in &names {
            let resource = SymlinkResource::new(
                source_root.join(name),
                dest_root.join(name),
                ctx.fs_ops.as_ref(),
            );

            match resource.current_state()? {
                ResourceState::Correct => {
                    ctx.log.debug(&format!("ok: {}", resource.description()));
                    stats.already_ok += 1;
                    continue;
                }
                ResourceState::Incorrect { current } if ctx.dry_run => {
                    ctx.log.dry_run(&format!(
                        "would replace {} ({current})",
                        resource.target.display()
                    ));
                    stats.changed += 1;
                    continue;
                }
                ResourceState::Incorrect { current } => {
                    ctx.log.info(&format!(
                        "replacing {} ({current})",
                        resource.target.display()
                    ));
                }
                ResourceState::Missing if ctx.dry_run => {
                    ctx.log
                        .dry_run(&format!("would link {}", resource.description()));
                    stats.changed += 1;
                    continue;
                }
                ResourceState::Missing => {}
            }

            match resource.apply() {
                Ok(ResourceChange::Applied) => {
                    ctx.log.info(&format!("linked {}", resource.description()));
                    stats.changed += 1;
                }
                Ok(ResourceChange::Skipped { reason }) => {
                    ctx.log.warn(&format!("{reason}; skipping"));
                    stats.skipped += 1;
                }
                Err(e) => {
                    ctx.log.error(&format!(
                        "failed to link {}: {e:#}",
                        name.to_string_lossy()
                    ));
                    stats.failed += 1;
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{Config, Layout, Settings};
    use crate::operations::{MockFileSystemOps, SystemFileSystemOps};
    use crate::tasks::test_helpers::{RecordingExecutor, make_context};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    const HOME: &str = "/home/test";
    const ROOT: &str = "/home/test/dotfiles";

    fn config() -> Config {
        Config {
            layout: Layout::resolve(PathBuf::from(HOME), Some(PathBuf::from(ROOT)), None),
            settings: Settings::default(),
        }
    }

    fn src_root() -> PathBuf {
        Path::new(ROOT).join("config")
    }

    fn dest_root() -> PathBuf {
        Path::new(HOME).join(".config")
    }

    fn src(name: &str) -> PathBuf {
        src_root().join(name)
    }

    fn dest(name: &str) -> PathBuf {
        dest_root().join(name)
    }

    fn run_mock(fs: MockFileSystemOps, dry_run: bool) -> (Result<TaskResult>, Arc<MockFileSystemOps>) {
        let fs = Arc::new(fs);
        let (ctx, _log) = make_context(
            config(),
            Arc::new(RecordingExecutor::new()),
            Arc::clone(&fs) as Arc<dyn crate::operations::FileSystemOps>,
            dry_run,
        );
        (LinkConfigs.run(&ctx), fs)
    }

    #[test]
    fn links_every_subdirectory() {
        let fs = MockFileSystemOps::new().with_subdirectories(src_root(), &["nvim", "zsh"]);
        let (result, fs) = run_mock(fs, false);

        assert!(matches!(result.unwrap(), TaskResult::Ok));
        assert_eq!(fs.link_target(&dest("nvim")), Some(src("nvim")));
        assert_eq!(fs.link_target(&dest("zsh")), Some(src("zsh")));
        assert_eq!(fs.ops()[0], format!("mkdir {}", dest_root().display()));
    }

    #[test]
    fn existing_entry_is_removed_before_linking() {
        let fs = MockFileSystemOps::new()
            .with_subdirectories(src_root(), &["nvim"])
            .with_dir(dest("nvim"));
        let (_, fs) = run_mock(fs, false);

        assert_eq!(
            fs.ops()[1..],
            [
                format!("remove {}", dest("nvim").display()),
                format!("link {} -> {}", dest("nvim").display(), src("nvim").display()),
            ]
        );
    }

    #[test]
    fn correct_link_is_left_alone() {
        let fs = MockFileSystemOps::new()
            .with_subdirectories(src_root(), &["nvim"])
            .with_symlink(dest("nvim"), src("nvim"));
        let (_, fs) = run_mock(fs, false);
        assert_eq!(fs.ops(), vec![format!("mkdir {}", dest_root().display())]);
    }

    #[test]
    fn removal_failure_skips_only_that_entry() {
        let fs = MockFileSystemOps::new()
            .with_subdirectories(src_root(), &["git", "nvim"])
            .with_file(dest("git"))
            .failing_remove(dest("git"));
        let (result, fs) = run_mock(fs, false);

        assert!(result.is_ok());
        assert_eq!(fs.link_target(&dest("git")), None);
        assert_eq!(fs.link_target(&dest("nvim")), Some(src("nvim")));
    }

    #[test]
    fn link_failure_continues_with_next_entry() {
        let fs = MockFileSystemOps::new()
            .with_subdirectories(src_root(), &["alacritty", "zsh"])
            .failing_link(dest("alacritty"));
        let (result, fs) = run_mock(fs, false);

        assert!(result.is_ok());
        assert_eq!(fs.link_target(&dest("zsh")), Some(src("zsh")));
    }

    #[test]
    fn unreadable_source_is_fatal() {
        let (result, fs) = run_mock(MockFileSystemOps::new(), false);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BootstrapError>(),
            Some(BootstrapError::ConfigSourceUnreadable { .. })
        ));
        assert!(fs.ops().is_empty(), "nothing created before the source is read");
    }

    #[test]
    fn uncreatable_destination_is_fatal() {
        let fs = MockFileSystemOps::new()
            .with_subdirectories(src_root(), &["nvim"])
            .failing_create(dest_root());
        let (result, fs) = run_mock(fs, false);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<BootstrapError>(),
            Some(BootstrapError::DestinationRoot { .. })
        ));
        assert!(fs.ops().is_empty());
    }

    #[test]
    fn dry_run_changes_nothing() {
        let fs = MockFileSystemOps::new()
            .with_subdirectories(src_root(), &["nvim", "zsh"])
            .with_file(dest("zsh"));
        let (result, fs) = run_mock(fs, true);

        assert!(matches!(result.unwrap(), TaskResult::DryRun));
        assert!(fs.ops().is_empty());
    }

    #[test]
    fn dry_run_still_fails_on_unreadable_source() {
        let (result, _) = run_mock(MockFileSystemOps::new(), true);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn links_real_tree_and_ignores_loose_files() {
        let home = tempfile::tempdir().unwrap();
        let root = home.path().join("dotfiles");
        let source = root.join("config");
        std::fs::create_dir_all(source.join("nvim")).unwrap();
        std::fs::create_dir_all(source.join("zsh")).unwrap();
        std::fs::write(source.join("README.md"), "docs").unwrap();

        let config = Config {
            layout: Layout::resolve(home.path().to_path_buf(), Some(root), None),
            settings: Settings::default(),
        };
        let (ctx, _log) = make_context(
            config,
            Arc::new(RecordingExecutor::new()),
            Arc::new(SystemFileSystemOps),
            false,
        );
        LinkConfigs.run(&ctx).unwrap();

        let dest = home.path().join(".config");
        assert_eq!(std::fs::read_link(dest.join("nvim")).unwrap(), source.join("nvim"));
        assert_eq!(std::fs::read_link(dest.join("zsh")).unwrap(), source.join("zsh"));
        assert!(!dest.join("README.md").exists());
    }
}
