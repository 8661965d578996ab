//! Open a validated command line in a new, visible terminal window.
//!
//! The launcher validates every argument, quotes it for shell re-entry,
//! picks one platform strategy at construction time, and hands the
//! resulting argv to a [`Spawner`]. Host questions (is `konsole` installed,
//! is this WSL) go through a [`Probe`], so both effects can be replaced in
//! tests.

mod error;
mod probe;
mod spawn;
mod strategy;
mod terminals;

use std::sync::Arc;

use platform::{DesktopHints, Platform};
use settings::Config;

pub use error::LaunchError;
pub use probe::{run_bounded, Probe, ProbeOutput, SystemProbe};
#[cfg(any(test, feature = "test-support"))]
pub use probe::StaticProbe;
#[cfg(any(test, feature = "test-support"))]
pub use spawn::RecordingSpawner;
pub use spawn::{LaunchSpec, ProcessSpawner, Spawner};
pub use strategy::{
    strategy_for, LaunchStrategy, MacOsStrategy, UnixStrategy, WindowsStrategy, WslStrategy,
};
pub use terminals::{choose_preferred_terminals, exec_args, FALLBACK_TERMINALS};

/// Wrap `arg` in single quotes so a POSIX shell reads it back verbatim.
pub fn quote_for_shell(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r#"'"'"'"#))
}

/// The single command string handed to the shell inside the new window.
pub fn shell_command<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| quote_for_shell(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-user launch preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Tried before desktop hints on Linux/Unix.
    pub preferred_terminal: Option<String>,
    pub shell: String,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for LaunchOptions {
    fn from(config: &Config) -> Self {
        Self {
            preferred_terminal: config.terminal.clone(),
            shell: config.shell.clone(),
        }
    }
}

/// Classify the host, asking for the kernel release only where it matters.
pub fn detect_platform(probe: &dyn Probe, os: &str) -> Platform {
    let release = if Platform::needs_kernel_release(os) {
        probe.kernel_release()
    } else {
        None
    };
    let platform = Platform::classify(os, release.as_deref());
    tracing::debug!(os, release = ?release, %platform, "Detected platform");
    if !platform.is_supported() {
        tracing::warn!(%platform, "No way to open a terminal on this host");
    }
    platform
}

pub struct Launcher {
    platform: Platform,
    strategy: Option<Box<dyn LaunchStrategy>>,
    probe: Arc<dyn Probe>,
    spawner: Arc<dyn Spawner>,
    shell: String,
}

impl Launcher {
    pub fn new(
        platform: Platform,
        hints: &DesktopHints,
        options: LaunchOptions,
        probe: Arc<dyn Probe>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        let strategy = strategy_for(&platform, hints, &options);
        Self {
            platform,
            strategy,
            probe,
            spawner,
            shell: options.shell,
        }
    }

    /// A launcher for the real host: system probes, environment hints and
    /// detached process spawning.
    pub fn detect(config: &Config) -> Self {
        let probe: Arc<dyn Probe> = Arc::new(SystemProbe::new(config.probe_timeout()));
        let platform = detect_platform(probe.as_ref(), platform::current_os());
        Self::new(
            platform,
            &DesktopHints::from_env(),
            LaunchOptions::from(config),
            probe,
            Arc::new(ProcessSpawner),
        )
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Validate `args` and resolve how they would be launched, without
    /// spawning anything.
    pub fn plan<S: AsRef<str>>(&self, args: &[S]) -> Result<LaunchSpec, LaunchError> {
        command_guard::validate(args)?;
        command_guard::validate_argument(&self.shell)?;

        let Some(strategy) = self.strategy.as_deref() else {
            return Err(LaunchError::UnsupportedPlatform {
                platform: self.platform.to_string(),
                reason: "no terminal launch strategy for this operating system".to_string(),
            });
        };

        let command = shell_command(args);
        let spec = strategy.plan(&command, self.probe.as_ref())?;
        tracing::debug!(strategy = strategy.name(), %spec, "Planned launch");
        Ok(spec)
    }

    /// Open `args` in a new terminal window. Returns once the window has
    /// been requested; the command's own outcome is not observed.
    pub fn launch<S: AsRef<str>>(&self, args: &[S]) -> Result<LaunchSpec, LaunchError> {
        let spec = self.plan(args)?;
        self.spawner
            .spawn_detached(&spec)
            .map_err(|source| LaunchError::Io {
                program: spec.program().to_string(),
                source,
            })?;
        Ok(spec)
    }
}
