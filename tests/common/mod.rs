// Shared helpers for integration tests.
//
// Provides a temporary home directory holding a dotfiles checkout, plus an
// executor that records package-manager invocations instead of running them.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotfiles_bootstrap::config::{Config, Layout};
use dotfiles_bootstrap::exec::{ExecResult, Executor};
use dotfiles_bootstrap::logging::{Log, Logger};
use dotfiles_bootstrap::tasks::Context;

/// Executor that records every invocation and reports success.
#[derive(Debug)]
pub struct StubExecutor {
    /// Value returned by [`Executor::which`].
    pub on_path: bool,
    calls: Mutex<Vec<String>>,
}

impl StubExecutor {
    pub fn new(on_path: bool) -> Self {
        Self {
            on_path,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every command line run so far, captured or inherited.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls poisoned").clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> ExecResult {
        let mut line = vec![program];
        line.extend_from_slice(args);
        self.calls
            .lock()
            .expect("calls poisoned")
            .push(line.join(" "));
        ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }
}

impl Executor for StubExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.record(program, args))
    }

    fn run_inherited(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.record(program, args))
    }

    fn which(&self, _: &str) -> bool {
        self.on_path
    }
}

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// The dotfiles checkout lives at `<home>/Workspace/dotfiles`, matching the
/// default layout.
pub struct TestHome {
    pub home: tempfile::TempDir,
}

impl TestHome {
    /// Create a home with an empty dotfiles checkout.
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(home.path().join("Workspace").join("dotfiles"))
            .expect("create dotfiles root");
        Self { home }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    /// The dotfiles checkout.
    pub fn root(&self) -> PathBuf {
        self.path().join("Workspace").join("dotfiles")
    }

    /// The default link destination.
    pub fn config_dest(&self) -> PathBuf {
        self.path().join(".config")
    }

    /// Write `content` to `<root>/<name>`.
    pub fn write(&self, name: &str, content: &str) -> &Self {
        std::fs::write(self.root().join(name), content).expect("write dotfiles file");
        self
    }

    /// Create `<root>/config/<name>` with a single file inside.
    pub fn config_dir(&self, name: &str) -> &Self {
        let dir = self.root().join("config").join(name);
        std::fs::create_dir_all(&dir).expect("create config dir");
        std::fs::write(dir.join("config"), name).expect("write config file");
        self
    }

    /// Load configuration using the default layout for this home.
    pub fn load_config(&self) -> Config {
        let layout = Layout::resolve(self.path().to_path_buf(), None, None);
        Config::load(layout).expect("load config")
    }

    /// Build a real-filesystem context around `executor`.
    pub fn context(&self, executor: Arc<StubExecutor>, dry_run: bool) -> (Context, Arc<Logger>) {
        Self::context_for(self.load_config(), executor, dry_run)
    }

    /// Build a real-filesystem context for an already loaded `config`.
    pub fn context_for(
        config: Config,
        executor: Arc<StubExecutor>,
        dry_run: bool,
    ) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("test"));
        let ctx = Context::new(
            Arc::new(config),
            Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            executor,
        );
        (ctx, log)
    }
}
