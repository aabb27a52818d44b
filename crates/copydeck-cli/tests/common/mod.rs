//! Common test utilities for CLI testing.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// Test context with temporary working directory
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Write `.copydeck/config.yaml` in the working directory
    pub fn with_config(self, yaml: &str) -> Self {
        let dir = self.path().join(".copydeck");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        std::fs::write(dir.join("config.yaml"), yaml).expect("Failed to write config");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.path().join(rel)
    }

    /// Create a command running in this context's directory
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("copydeck").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("COPYDECK_CONFIG")
            .env_remove("COPYDECK_LOG_LEVEL")
            .env_remove("RUST_LOG")
            .env_remove("ANTHROPIC_API_KEY");
        cmd
    }
}
