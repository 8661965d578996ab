use command_guard::GuardError;
use thiserror::Error;

/// Why a terminal could not be opened.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The command failed validation; nothing was probed or spawned.
    #[error("command rejected: {0}")]
    Rejected(#[from] GuardError),

    #[error("unsupported platform {platform}: {reason}")]
    UnsupportedPlatform { platform: String, reason: String },

    #[error("no known terminal emulator found (tried: {})", .tried.join(", "))]
    NoTerminalFound { tried: Vec<String> },

    /// The final spawn call itself failed.
    #[error("failed to start {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Stable identifier for logs and exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rejected(e) => e.kind(),
            Self::UnsupportedPlatform { .. } => "unsupported-platform",
            Self::NoTerminalFound { .. } => "no-terminal-found",
            Self::Io { .. } => "launch-io-failure",
        }
    }

    /// True when the input looked malicious, as opposed to the host being
    /// unable to open a terminal.
    pub fn is_security_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
