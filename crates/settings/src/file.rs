//! TOML config file support.
//!
//! Config location: `~/.config/urilaunch/config.toml`

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;

/// User-facing config parsed from TOML.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Linux/Unix: terminal emulator tried before any desktop hint.
    pub terminal: Option<String>,
    /// Shell that runs the command inside the new window.
    pub shell: String,
    /// Upper bound on each availability probe, in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terminal: None,
            shell: constants::shell::DEFAULT.to_string(),
            probe_timeout_ms: constants::probe::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Probe timeout clamped to the supported range.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms.clamp(
            constants::probe::MIN_TIMEOUT_MS,
            constants::probe::MAX_TIMEOUT_MS,
        ))
    }

    /// Drop values that are too long or would be unsafe inside a shell
    /// command string, falling back to defaults.
    pub fn sanitized(mut self) -> Self {
        if let Some(terminal) = self.terminal.take() {
            if is_acceptable("terminal", &terminal) {
                self.terminal = Some(terminal);
            }
        }

        if !is_acceptable("shell", &self.shell) {
            self.shell = constants::shell::DEFAULT.to_string();
        }

        self
    }
}

fn is_acceptable(key: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        tracing::warn!("Ignoring empty '{}' setting", key);
        return false;
    }
    if value.len() > constants::settings::MAX_STRING_LENGTH {
        tracing::warn!(
            "Ignoring '{}' setting longer than {} characters",
            key,
            constants::settings::MAX_STRING_LENGTH
        );
        return false;
    }
    if let Err(e) = command_guard::validate_argument(value) {
        tracing::warn!("Ignoring unsafe '{}' setting ({})", key, e.kind());
        tracing::debug!(key, value, "Rejected setting value");
        return false;
    }
    true
}

/// Default config file content with comments (written by `--init-config`).
const DEFAULT_CONFIG: &str = r#"# urilaunch configuration

# Linux/Unix: terminal emulator to try first, before the desktop's own
# terminal and the built-in fallback list.
# terminal = "kitty"

# Shell that runs the command inside the new window. It is re-executed
# afterwards so the window stays open.
shell = "bash"

# Upper bound for each availability probe (`which`, `where`, `uname -r`)
# in milliseconds. Accepted range: 50..=30000.
probe-timeout-ms = 2000
"#;

/// Return the config file path.
pub fn config_path() -> PathBuf {
    urilaunch_paths::config_file()
}

/// Ensure the config file exists, creating a default if missing.
/// Returns the path to the config file.
pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path();
    ensure_config_file_at(&path).then_some(path)
}

/// Write the default config to `path` unless a file is already there.
pub fn ensure_config_file_at(path: &Path) -> bool {
    if path.exists() {
        return true;
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create config directory {:?}: {}", parent, e);
            return false;
        }
    }

    match std::fs::write(path, DEFAULT_CONFIG) {
        Ok(()) => {
            tracing::info!("Created default config at {:?}", path);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to write default config {:?}: {}", path, e);
            false
        }
    }
}

/// Load and parse the config file. Returns default on any error.
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Load and parse a config file at an explicit path. Returns default on any error.
pub fn load_config_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > constants::settings::MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    match toml::from_str::<Config>(&content) {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {:?}", path);
            cfg.sanitized()
        }
        Err(e) => {
            tracing::warn!("Failed to parse config.toml: {}", e);
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    #[test]
    fn default_config_has_sane_values() {
        let cfg = Config::default();
        assert!(cfg.terminal.is_none());
        assert_eq!(cfg.shell, "bash");
        assert_eq!(cfg.probe_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn parses_full_toml() {
        let toml_str = r#"
terminal = "kitty"
shell = "zsh"
probe-timeout-ms = 500
"#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.terminal.as_deref(), Some("kitty"));
        assert_eq!(cfg.shell, "zsh");
        assert_eq!(cfg.probe_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn empty_string_parses_to_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn ignores_unknown_keys() {
        let result: Result<Config, _> = toml::from_str("theme = \"Nord\"\nshell = \"fish\"");
        assert_eq!(result.unwrap().shell, "fish");
    }

    #[test]
    fn default_config_template_is_valid_toml() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn probe_timeout_is_clamped() {
        let low = Config {
            probe_timeout_ms: 0,
            ..Config::default()
        };
        assert_eq!(
            low.probe_timeout(),
            Duration::from_millis(constants::probe::MIN_TIMEOUT_MS)
        );

        let high = Config {
            probe_timeout_ms: u64::MAX,
            ..Config::default()
        };
        assert_eq!(
            high.probe_timeout(),
            Duration::from_millis(constants::probe::MAX_TIMEOUT_MS)
        );
    }

    #[test]
    fn sanitize_rejects_unsafe_shell() {
        let cfg = Config {
            shell: "bash; curl evil".to_string(),
            ..Config::default()
        }
        .sanitized();
        assert_eq!(cfg.shell, "bash");
    }

    #[test]
    #[traced_test]
    fn unsafe_setting_warning_names_the_rule_not_the_value() {
        let cfg = Config {
            terminal: Some("kitty; curl evil".to_string()),
            ..Config::default()
        }
        .sanitized();

        assert!(cfg.terminal.is_none());
        assert!(logs_contain(
            "Ignoring unsafe 'terminal' setting (dangerous-character)"
        ));
        logs_assert(|lines: &[&str]| {
            match lines
                .iter()
                .filter(|line| line.contains(" WARN "))
                .find(|line| line.contains("curl evil"))
            {
                Some(line) => Err(format!("value leaked into warning: {line}")),
                None => Ok(()),
            }
        });
    }

    #[test]
    fn sanitize_rejects_oversized_terminal() {
        let cfg = Config {
            terminal: Some("x".repeat(constants::settings::MAX_STRING_LENGTH + 1)),
            ..Config::default()
        }
        .sanitized();
        assert!(cfg.terminal.is_none());
    }

    #[test]
    fn sanitize_keeps_reasonable_values() {
        let cfg = Config {
            terminal: Some("alacritty".to_string()),
            shell: "/usr/bin/zsh".to_string(),
            probe_timeout_ms: 100,
        };
        assert_eq!(cfg.clone().sanitized(), cfg);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml"));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn unparsable_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shell = [not toml").unwrap();
        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    fn oversized_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let padding = "#".repeat(constants::settings::MAX_FILE_SIZE as usize + 1);
        std::fs::write(&path, format!("shell = \"zsh\"\n{padding}")).unwrap();
        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    fn loads_and_sanitizes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "terminal = \"xterm\"\nshell = \"$(id)\"\n").unwrap();
        let cfg = load_config_from(&path);
        assert_eq!(cfg.terminal.as_deref(), Some("xterm"));
        assert_eq!(cfg.shell, "bash");
    }

    #[test]
    fn ensure_config_file_writes_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(ensure_config_file_at(&path));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);

        std::fs::write(&path, "shell = \"zsh\"\n").unwrap();
        assert!(ensure_config_file_at(&path));
        assert_eq!(load_config_from(&path).shell, "zsh");
    }
}
