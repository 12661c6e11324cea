//! Configuration constants and profile loading for vimline
//!
//! Settings live in an ini file with one section per profile. A missing file
//! or section simply yields the defaults; only malformed values are errors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::session::locator::SelectionPolicy;

/// Default profile file path for vimline
pub const DEFAULT_PROFILE_PATH: &str = "~/.vimline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "VIMLINE_PROFILE_PATH";

/// File name prefix the editor launcher gives its sockets
pub const DEFAULT_SOCKET_PREFIX: &str = "nvim-socket";

pub const DEFAULT_PROMPT: &str = ">> ";

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Editor command template used by `search`
pub const DEFAULT_SEARCH_COMMAND: &str = "!ack {term} {folder}";

pub const DEFAULT_EDITOR: &str = "nvim";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read profile file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: ini::Error,
    },

    #[error("invalid value '{value}' for '{key}' in profile '{profile}'")]
    InvalidValue {
        profile: String,
        key: String,
        value: String,
    },
}

/// Resolved settings for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub socket_dir: PathBuf,
    pub socket_prefix: String,
    pub on_multiple: SelectionPolicy,
    pub timeout: Duration,
    pub prompt: String,
    pub search_command: String,
    pub search_folder: Option<String>,
    pub editor: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_dir: std::env::temp_dir(),
            socket_prefix: DEFAULT_SOCKET_PREFIX.to_string(),
            on_multiple: SelectionPolicy::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            prompt: DEFAULT_PROMPT.to_string(),
            search_command: DEFAULT_SEARCH_COMMAND.to_string(),
            search_folder: None,
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

impl Config {
    /// Load `profile_name` from the ini file at `profile_path` (tilde is expanded)
    pub fn load(profile_path: &str, profile_name: &str) -> Result<Self, ConfigError> {
        let expanded = shellexpand::tilde(profile_path).into_owned();
        let path = Path::new(&expanded);

        if !path.exists() {
            tracing::debug!("Profile file '{}' not found, using defaults", expanded);
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: expanded.clone(),
            source,
        })?;
        Self::from_ini(&ini, profile_name)
    }

    /// Build a config from an already parsed ini document
    pub fn from_ini(ini: &Ini, profile_name: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let Some(section) = ini.section(Some(profile_name)) else {
            tracing::debug!("Profile '{}' not found, using defaults", profile_name);
            return Ok(config);
        };

        let invalid = |key: &str, value: &str| ConfigError::InvalidValue {
            profile: profile_name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        };

        for (key, raw) in section.iter() {
            let value = raw.trim();
            match key {
                "socket_dir" => {
                    config.socket_dir = PathBuf::from(shellexpand::tilde(value).into_owned());
                }
                "socket_prefix" => {
                    if value.is_empty() {
                        return Err(invalid(key, value));
                    }
                    config.socket_prefix = value.to_string();
                }
                "on_multiple" => {
                    config.on_multiple = value.parse().map_err(|_| invalid(key, value))?;
                }
                "timeout_ms" => {
                    let ms: u64 = value.parse().map_err(|_| invalid(key, value))?;
                    if ms == 0 {
                        return Err(invalid(key, value));
                    }
                    config.timeout = Duration::from_millis(ms);
                }
                "prompt" => config.prompt = unquote(raw).to_string(),
                "search_command" => {
                    if !value.contains("{term}") {
                        return Err(invalid(key, value));
                    }
                    config.search_command = value.to_string();
                }
                "search_folder" => {
                    config.search_folder = (!value.is_empty()).then(|| value.to_string());
                }
                "editor" => config.editor = value.to_string(),
                other => tracing::warn!("Ignoring unknown profile key '{}'", other),
            }
        }

        Ok(config)
    }
}

/// Strip one pair of surrounding double quotes so values can keep edge whitespace
fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_profile_path() {
        assert_eq!(DEFAULT_PROFILE_PATH, "~/.vimline/profile");
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(PROFILE_PATH_ENV_VAR, "VIMLINE_PROFILE_PATH");
    }

    #[test]
    fn test_get_profile_path_env_override() {
        // Save current env var state
        let original = std::env::var_os(PROFILE_PATH_ENV_VAR);

        std::env::remove_var(PROFILE_PATH_ENV_VAR);
        assert_eq!(get_profile_path(), DEFAULT_PROFILE_PATH);

        let test_path = "/custom/profile/path";
        std::env::set_var(PROFILE_PATH_ENV_VAR, test_path);
        assert_eq!(get_profile_path(), test_path);

        // Restore original state
        match original {
            Some(val) => std::env::set_var(PROFILE_PATH_ENV_VAR, val),
            None => std::env::remove_var(PROFILE_PATH_ENV_VAR),
        }
    }

    #[test]
    fn load_should_return_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let config = Config::load(path.to_str().unwrap(), "default").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_should_read_profile_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[default]\nprompt = \"nvim> \"\n\n[work]\nsocket_dir = /var/run/nvim\nsocket_prefix = ed\non_multiple = reject\ntimeout_ms = 250\nsearch_command = Rg {{term}} {{folder}}\nsearch_folder = src\neditor = vim"
        )
        .unwrap();

        let work = Config::load(file.path().to_str().unwrap(), "work").unwrap();
        assert_eq!(work.socket_dir, PathBuf::from("/var/run/nvim"));
        assert_eq!(work.socket_prefix, "ed");
        assert_eq!(work.on_multiple, SelectionPolicy::Reject);
        assert_eq!(work.timeout, Duration::from_millis(250));
        assert_eq!(work.search_command, "Rg {term} {folder}");
        assert_eq!(work.search_folder.as_deref(), Some("src"));
        assert_eq!(work.editor, "vim");

        let default = Config::load(file.path().to_str().unwrap(), "default").unwrap();
        assert_eq!(default.prompt, "nvim> ");
        assert_eq!(default.socket_prefix, DEFAULT_SOCKET_PREFIX);
    }

    #[test]
    fn prompt_should_keep_whitespace_inside_quotes() {
        let mut ini = Ini::new();
        ini.with_section(Some("default")).set("prompt", "\">> \"");
        assert_eq!(Config::from_ini(&ini, "default").unwrap().prompt, ">> ");

        let mut ini = Ini::new();
        ini.with_section(Some("default")).set("prompt", "$ ");
        assert_eq!(Config::from_ini(&ini, "default").unwrap().prompt, "$ ");
    }

    #[test]
    fn from_ini_should_fall_back_to_defaults_for_unknown_profile() {
        let ini = Ini::load_from_str("[default]\ntimeout_ms = 10\n").unwrap();
        let config = Config::from_ini(&ini, "other").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn from_ini_should_reject_bad_values() {
        for body in [
            "timeout_ms = soon",
            "timeout_ms = 0",
            "on_multiple = random",
            "socket_prefix = ",
            "search_command = Ack",
        ] {
            let ini = Ini::load_from_str(&format!("[default]\n{body}\n")).unwrap();
            let err = Config::from_ini(&ini, "default").unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { .. }),
                "expected invalid value for '{body}', got {err:?}"
            );
        }
    }
}
