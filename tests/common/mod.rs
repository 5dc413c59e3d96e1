//! Common test utilities for nagios-api integration tests.
//!
//! Provides `TestEnv`, an isolated home directory with an empty command file,
//! so that tests never read the user's config or touch a real Nagios install.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

const ISOLATED_VARS: &[&str] = &[
    "NAGIOS_API_CONFIG",
    "NAGIOS_API_LISTEN",
    "NAGIOS_API_COMMAND_FILE",
    "NAGIOS_API_OBJECT_CACHE_FILE",
    "NAGIOS_API_STATUS_FILE",
    "NAGIOS_API_WRITE_TIMEOUT_MS",
    "NAGIOS_API_LOG_FORMAT",
    "NAGIOS_API_LOG",
];

/// A test environment with its own home directory and command file.
pub struct TestEnv {
    pub home_dir: TempDir,
    command_file: PathBuf,
}

impl TestEnv {
    /// Create a new environment with an empty command file.
    pub fn new() -> Self {
        let home_dir = TempDir::new().unwrap();
        let command_file = home_dir.path().join("nagios.cmd");
        std::fs::File::create(&command_file).unwrap();
        Self {
            home_dir,
            command_file,
        }
    }

    /// Get a Command for the nagios-api binary, without a `--command-file`.
    pub fn bare(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_nagios-api"));
        cmd.current_dir(self.home_dir.path());
        cmd.env("HOME", self.home_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"));
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a Command for the nagios-api binary pointed at this env's command file.
    pub fn api(&self) -> Command {
        let mut cmd = self.bare();
        cmd.arg("--command-file").arg(&self.command_file);
        cmd
    }

    pub fn command_file(&self) -> &Path {
        &self.command_file
    }

    /// Everything written to the command file so far.
    pub fn written(&self) -> String {
        std::fs::read_to_string(&self.command_file).unwrap()
    }

    /// Write a config.kdl in the isolated home and return its path.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.home_dir.path().join("config.kdl");
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
