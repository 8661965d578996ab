//! Shared helpers for running the built `urilaunch` binary.

// Not every test file uses every helper
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub use tempfile::{tempdir, TempDir};

// ============================================================================
// Test Environment Setup
// ============================================================================

/// Isolated config directory for one test run.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_dir = temp_dir.path().join("urilaunch");
        Self {
            temp_dir,
            config_dir,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn write_config(&self, content: &str) {
        std::fs::create_dir_all(&self.config_dir).expect("Failed to create config dir");
        std::fs::write(self.config_file(), content).expect("Failed to write config");
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// An executable that does nothing, usable as a configured terminal.
    #[cfg(unix)]
    pub fn stub_terminal(&self, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").expect("Failed to write stub terminal");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make stub terminal executable");
        path
    }

    /// Whether the host takes the Linux/Unix emulator path (not WSL).
    pub fn uses_unix_terminals() -> bool {
        if cfg!(target_os = "macos") || cfg!(windows) {
            return false;
        }
        let release = std::fs::read_to_string("/proc/sys/kernel/osrelease").unwrap_or_default();
        !release.to_ascii_lowercase().contains("microsoft")
    }

    /// Run the binary with `args`, feeding `stdin` if given.
    pub fn run(&self, args: &[&str], stdin: Option<&str>) -> Run {
        let mut command = Command::new(env!("CARGO_BIN_EXE_urilaunch"));
        command
            .args(args)
            .env("URILAUNCH_CONFIG_DIR", &self.config_dir)
            .env_remove("URILAUNCH_DEBUG")
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().expect("Failed to start urilaunch");
        {
            let mut pipe = child.stdin.take().expect("stdin is piped");
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes())
                    .expect("Failed to write stdin");
            }
        }
        Run::from(child.wait_with_output().expect("Failed to wait for urilaunch"))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Captured Output
// ============================================================================

pub struct Run {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for Run {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Run {
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_line(&self) -> &str {
        self.stdout.trim_end_matches(['\r', '\n'])
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub struct Fixtures;

impl Fixtures {
    /// Command lines that must survive a trip through the binary.
    pub fn round_trip_commands() -> Vec<Vec<&'static str>> {
        vec![
            vec!["jbang", "run", "Hello.java"],
            vec!["jbang", "run", "Hello World.java"],
            vec!["jbang", "--java=21", "user@host", "#tag"],
            vec!["jbang", "run", "café.java"],
        ]
    }

    pub fn malicious_uris() -> Vec<&'static str> {
        vec![
            "jbang:///run/%3B%20rm%20-rf%20%2F",
            "jbang:///run/$(whoami)",
            "jbang:///run/%60id%60",
            "jbang:///run/a%7Cb",
            "jbang:///run/x%0Aid",
        ]
    }
}
