//! Detached process creation.

use std::fmt;
use std::io;
use std::process::{Command, Stdio};

/// The resolved way to open a terminal on this host: which mechanism was
/// chosen and the exact argv that will be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Terminal emulator or OS mechanism, e.g. `konsole` or `osascript`.
    pub mechanism: String,
    /// Full argv, program first.
    pub argv: Vec<String>,
}

impl LaunchSpec {
    pub fn new(mechanism: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            mechanism: mechanism.into(),
            argv,
        }
    }

    pub fn program(&self) -> &str {
        self.argv.first().map_or("", String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.mechanism, self.argv)
    }
}

/// Starts a process without waiting for it or owning its output.
pub trait Spawner: Send + Sync {
    fn spawn_detached(&self, spec: &LaunchSpec) -> io::Result<()>;
}

/// Spawns real processes with stdio detached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSpawner;

impl Spawner for ProcessSpawner {
    #[allow(clippy::disallowed_methods)] // Fire-and-forget terminal launch
    fn spawn_detached(&self, spec: &LaunchSpec) -> io::Result<()> {
        if spec.argv.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty argv"));
        }

        let mut child = Command::new(spec.program())
            .args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        tracing::info!(pid = child.id(), mechanism = %spec.mechanism, "Terminal launch requested");

        // Reap in the background so a long-lived caller does not collect zombies.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// Records launch specs instead of spawning anything.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingSpawner {
    spawned: parking_lot::Mutex<Vec<LaunchSpec>>,
    failure: Option<io::ErrorKind>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spawner whose every spawn fails with `kind`.
    pub fn failing(kind: io::ErrorKind) -> Self {
        Self {
            spawned: parking_lot::Mutex::new(Vec::new()),
            failure: Some(kind),
        }
    }

    pub fn spawned(&self) -> Vec<LaunchSpec> {
        self.spawned.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Spawner for RecordingSpawner {
    fn spawn_detached(&self, spec: &LaunchSpec) -> io::Result<()> {
        if let Some(kind) = self.failure {
            return Err(io::Error::new(kind, "recording spawner configured to fail"));
        }
        self.spawned.lock().push(spec.clone());
        Ok(())
    }
}
