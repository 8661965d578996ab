//! Host capability probes.
//!
//! Probes run short-lived helper processes (`which`/`where`, `uname -r`)
//! with a bounded wait. A probe that cannot start, fails, or runs past its
//! deadline reports "unavailable"; probe errors never abort a launch.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use settings::constants::probe::POLL_INTERVAL;

/// Questions the launcher asks about the host.
#[cfg_attr(test, mockall::automock)]
pub trait Probe: Send + Sync {
    /// Whether `program` resolves on the executable search path.
    fn is_available(&self, program: &str) -> bool;

    /// Kernel release string (`uname -r`), if it can be determined.
    fn kernel_release(&self) -> Option<String>;
}

/// Probes the real host by running helper processes.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    timeout: Duration,
}

impl SystemProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Probe for SystemProbe {
    fn is_available(&self, program: &str) -> bool {
        let mut command = Command::new(platform::PATH_LOOKUP);
        command.arg(program);
        let available = run_bounded(&mut command, self.timeout).is_some_and(|out| out.success);
        tracing::debug!(program, available, "Probed executable");
        available
    }

    fn kernel_release(&self) -> Option<String> {
        let mut command = Command::new("uname");
        command.arg("-r");
        let output = run_bounded(&mut command, self.timeout).filter(|out| out.success)?;
        let release = output.stdout.trim();
        (!release.is_empty()).then(|| release.to_string())
    }
}

/// Answers probes from a fixed list instead of asking the host.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    pub available: Vec<String>,
    pub kernel_release: Option<String>,
}

#[cfg(any(test, feature = "test-support"))]
impl StaticProbe {
    pub fn with_programs(programs: &[&str]) -> Self {
        Self {
            available: programs.iter().map(|p| p.to_string()).collect(),
            kernel_release: None,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Probe for StaticProbe {
    fn is_available(&self, program: &str) -> bool {
        self.available.iter().any(|p| p == program)
    }

    fn kernel_release(&self) -> Option<String> {
        self.kernel_release.clone()
    }
}

/// Result of a probe process that exited before its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    pub success: bool,
    pub stdout: String,
}

/// Run `command` to completion, giving up after `timeout`.
///
/// Returns `None` if the process cannot be started, cannot be waited on, or
/// is still running at the deadline (in which case it is killed and reaped).
#[allow(clippy::disallowed_methods)] // Short-lived probe, bounded by `timeout`
pub fn run_bounded(command: &mut Command, timeout: Duration) -> Option<ProbeOutput> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!("Probe {:?} could not start: {}", command.get_program(), e);
            return None;
        }
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let mut stdout = String::new();
                if let Some(mut pipe) = child.stdout.take() {
                    let _ = pipe.read_to_string(&mut stdout);
                }
                return Some(ProbeOutput {
                    success: status.success(),
                    stdout,
                });
            }
            Ok(None) if Instant::now() >= deadline => {
                tracing::debug!(
                    "Probe {:?} timed out after {:?}",
                    command.get_program(),
                    timeout
                );
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                tracing::debug!("Probe {:?} wait failed: {}", command.get_program(), e);
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
    }
}
