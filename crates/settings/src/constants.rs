//! Centralized configuration constants for urilaunch.

/// Availability probes (`which`, `where`, `uname -r`).
pub mod probe {
    use std::time::Duration;

    /// Default upper bound on a single probe, in milliseconds.
    pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;
    /// Smallest accepted `probe-timeout-ms`.
    pub const MIN_TIMEOUT_MS: u64 = 50;
    /// Largest accepted `probe-timeout-ms`.
    pub const MAX_TIMEOUT_MS: u64 = 30_000;
    /// How often a running probe is polled for exit.
    pub const POLL_INTERVAL: Duration = Duration::from_millis(10);
}

/// Shell used inside the new terminal window.
pub mod shell {
    /// Runs the command and is `exec`ed afterwards to keep the window open.
    pub const DEFAULT: &str = "bash";
}

/// Settings file validation limits.
pub mod settings {
    /// Maximum settings file size in bytes (64 KB).
    /// Settings files should be tiny; anything larger is suspicious.
    pub const MAX_FILE_SIZE: u64 = 64 * 1024;

    /// Maximum length for string fields (terminal, shell).
    pub const MAX_STRING_LENGTH: usize = 256;
}
