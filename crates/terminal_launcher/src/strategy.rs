//! One launch strategy per platform family.
//!
//! A strategy turns an already validated, already quoted command string into
//! the argv that opens a visible terminal window running it. Strategies only
//! probe and plan; spawning is the launcher's job.

use platform::{DesktopHints, Platform};

use crate::error::LaunchError;
use crate::probe::Probe;
use crate::spawn::LaunchSpec;
use crate::terminals::{choose_preferred_terminals, exec_args};
use crate::LaunchOptions;

const WINDOWS_TERMINAL: &str = "wt.exe";
const POWERSHELL: &str = "powershell.exe";

pub trait LaunchStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn plan(&self, command: &str, probe: &dyn Probe) -> Result<LaunchSpec, LaunchError>;
}

/// Pick the strategy for `platform`, or `None` if it has none.
pub fn strategy_for(
    platform: &Platform,
    hints: &DesktopHints,
    options: &LaunchOptions,
) -> Option<Box<dyn LaunchStrategy>> {
    match platform {
        Platform::Wsl => Some(Box::new(WslStrategy {
            shell: options.shell.clone(),
        })),
        Platform::Windows => Some(Box::new(WindowsStrategy)),
        Platform::MacOs => Some(Box::new(MacOsStrategy)),
        Platform::Unix => Some(Box::new(UnixStrategy::new(
            &options.shell,
            options.preferred_terminal.as_deref(),
            hints,
        ))),
        Platform::Unsupported(_) => None,
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// WSL: open a Windows Terminal tab running the Linux shell.
#[derive(Debug, Clone)]
pub struct WslStrategy {
    shell: String,
}

impl LaunchStrategy for WslStrategy {
    fn name(&self) -> &'static str {
        "wsl"
    }

    fn plan(&self, command: &str, probe: &dyn Probe) -> Result<LaunchSpec, LaunchError> {
        if !probe.is_available(WINDOWS_TERMINAL) {
            return Err(LaunchError::UnsupportedPlatform {
                platform: Platform::Wsl.to_string(),
                reason: "Windows Terminal (wt.exe) not found for WSL launch".to_string(),
            });
        }

        Ok(LaunchSpec::new(
            WINDOWS_TERMINAL,
            argv(&[
                "cmd.exe",
                "/c",
                "start",
                WINDOWS_TERMINAL,
                "wsl",
                "-e",
                self.shell.as_str(),
                "-c",
                command,
            ]),
        ))
    }
}

/// Windows: Windows Terminal, then PowerShell, then the legacy console.
#[derive(Debug, Clone, Copy)]
pub struct WindowsStrategy;

impl LaunchStrategy for WindowsStrategy {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn plan(&self, command: &str, probe: &dyn Probe) -> Result<LaunchSpec, LaunchError> {
        let spec = if probe.is_available(WINDOWS_TERMINAL) {
            LaunchSpec::new(
                WINDOWS_TERMINAL,
                argv(&[
                    "cmd",
                    "/c",
                    "start",
                    WINDOWS_TERMINAL,
                    "powershell",
                    "-NoExit",
                    "-Command",
                    command,
                ]),
            )
        } else if probe.is_available(POWERSHELL) {
            LaunchSpec::new(
                "powershell",
                argv(&[
                    "cmd",
                    "/c",
                    "start",
                    "powershell",
                    "-NoExit",
                    "-Command",
                    command,
                ]),
            )
        } else {
            LaunchSpec::new("cmd", argv(&["cmd", "/c", "start", "cmd", "/k", command]))
        };
        Ok(spec)
    }
}

/// macOS: ask Terminal.app to run the command through AppleScript.
#[derive(Debug, Clone, Copy)]
pub struct MacOsStrategy;

impl LaunchStrategy for MacOsStrategy {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn plan(&self, command: &str, _probe: &dyn Probe) -> Result<LaunchSpec, LaunchError> {
        let script = format!(
            "tell app \"Terminal\" to do script \"{}\"",
            command.replace('"', "\\\"")
        );
        Ok(LaunchSpec::new(
            "osascript",
            vec!["osascript".to_string(), "-e".to_string(), script],
        ))
    }
}

/// Linux/Unix: first available emulator from a preference list.
#[derive(Debug, Clone)]
pub struct UnixStrategy {
    shell: String,
    candidates: Vec<String>,
}

impl UnixStrategy {
    pub fn new(shell: &str, preferred: Option<&str>, hints: &DesktopHints) -> Self {
        let mut candidates: Vec<String> = preferred.map(str::to_string).into_iter().collect();
        for terminal in
            choose_preferred_terminals(hints.desktop.as_deref(), hints.session.as_deref())
        {
            if !candidates.iter().any(|c| c == terminal) {
                candidates.push(terminal.to_string());
            }
        }

        Self {
            shell: shell.to_string(),
            candidates,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

impl LaunchStrategy for UnixStrategy {
    fn name(&self) -> &'static str {
        "unix"
    }

    fn plan(&self, command: &str, probe: &dyn Probe) -> Result<LaunchSpec, LaunchError> {
        let Some(terminal) = self.candidates.iter().find(|t| probe.is_available(t)) else {
            return Err(LaunchError::NoTerminalFound {
                tried: self.candidates.clone(),
            });
        };

        // `exec <shell>` keeps the window open after the command finishes.
        let script = format!("{command}; exec {}", self.shell);

        let mut full = vec![terminal.clone()];
        full.extend(exec_args(terminal).iter().map(|s| s.to_string()));
        full.extend([self.shell.clone(), "-c".to_string(), script]);

        Ok(LaunchSpec::new(terminal.clone(), full))
    }
}
