//! Host platform detection.
//!
//! Classifies the running host into the launch families the terminal
//! launcher knows about, and captures the desktop-environment hints used to
//! pick a terminal emulator. Everything here is a pure function of its
//! inputs; reading the process environment happens once, in `from_env`.

use std::fmt;

/// Program used to resolve an executable on the search path.
#[cfg(target_os = "windows")]
pub const PATH_LOOKUP: &str = "where";
/// Program used to resolve an executable on the search path.
#[cfg(not(target_os = "windows"))]
pub const PATH_LOOKUP: &str = "which";

/// Marker found in the kernel release string of WSL hosts.
const WSL_KERNEL_MARKER: &str = "microsoft";

/// OS names (as in `std::env::consts::OS`) handled by the Linux/Unix launcher.
const UNIX_FAMILIES: &[&str] = &[
    "linux",
    "freebsd",
    "openbsd",
    "netbsd",
    "dragonfly",
    "solaris",
    "illumos",
];

/// A launch family: one strategy for opening a visible terminal window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux running under the Windows Subsystem for Linux.
    Wsl,
    Windows,
    MacOs,
    /// Linux and other X11/Wayland Unix desktops.
    Unix,
    /// Anything else; carries the OS name for reporting.
    Unsupported(String),
}

impl Platform {
    /// Classify a host from its OS name and, when known, its kernel release.
    ///
    /// WSL is checked first since it otherwise looks like plain Linux.
    pub fn classify(os: &str, kernel_release: Option<&str>) -> Self {
        let os = os.to_ascii_lowercase();

        if os == "linux" && kernel_release.is_some_and(is_wsl_kernel) {
            return Self::Wsl;
        }

        match os.as_str() {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            family if UNIX_FAMILIES.contains(&family) => Self::Unix,
            _ => Self::Unsupported(os),
        }
    }

    /// Whether classifying this OS needs a kernel release query.
    pub fn needs_kernel_release(os: &str) -> bool {
        os.eq_ignore_ascii_case("linux")
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wsl => write!(f, "wsl"),
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
            Self::Unix => write!(f, "unix"),
            Self::Unsupported(os) => write!(f, "unsupported ({os})"),
        }
    }
}

/// True if a `uname -r` style release string identifies a WSL kernel.
pub fn is_wsl_kernel(release: &str) -> bool {
    release.to_ascii_lowercase().contains(WSL_KERNEL_MARKER)
}

/// The OS this binary was built for.
pub fn current_os() -> &'static str {
    std::env::consts::OS
}

/// Desktop-environment hints used to prefer a native terminal emulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopHints {
    /// `XDG_CURRENT_DESKTOP`, e.g. `ubuntu:GNOME` or `KDE`.
    pub desktop: Option<String>,
    /// `DESKTOP_SESSION`, e.g. `xfce` or `plasma`.
    pub session: Option<String>,
}

impl DesktopHints {
    pub fn new(desktop: Option<&str>, session: Option<&str>) -> Self {
        Self {
            desktop: non_blank(desktop),
            session: non_blank(session),
        }
    }

    /// Read the hints from the process environment.
    pub fn from_env() -> Self {
        let desktop = std::env::var("XDG_CURRENT_DESKTOP").ok();
        let session = std::env::var("DESKTOP_SESSION").ok();
        let hints = Self::new(desktop.as_deref(), session.as_deref());
        tracing::debug!(desktop = ?hints.desktop, session = ?hints.session, "Desktop hints");
        hints
    }

    pub fn is_empty(&self) -> bool {
        self.desktop.is_none() && self.session.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
