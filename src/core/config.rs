//! User configuration: an optional TOML file merged with command-line
//! overrides into the [`Settings`] the app runs with.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ChatOptions;
use crate::utils::url::normalize_base_url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen3:30b-32k";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Answer in a friendly way and in detail.";
pub const DEFAULT_HISTORY_TURNS: usize = crate::core::app::conversation::DEFAULT_HISTORY_TURNS;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// No config directory could be determined for this platform.
    NoConfigDir,
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine a config directory"),
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// On-disk configuration. Every key is optional.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the model server, e.g. `http://localhost:11434`
    pub server_url: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    /// User/assistant turns kept in the context besides the system prompt
    pub history_turns: Option<usize>,
    pub probe_timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    /// Render assistant replies as markdown
    pub markdown: Option<bool>,
    /// Write diagnostics to this file
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("org", "parley", "parley").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` when given, otherwise from the platform config dir.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_path(&Self::default_path()?),
        }
    }

    /// Merge with command-line overrides, which win over the file.
    pub fn resolve(self, overrides: SettingsOverrides) -> Settings {
        let defaults = Settings::default();
        Settings {
            server_url: normalize_base_url(
                &overrides
                    .server_url
                    .or(self.server_url)
                    .unwrap_or(defaults.server_url),
            ),
            model: overrides.model.or(self.model).unwrap_or(defaults.model),
            system_prompt: overrides
                .system_prompt
                .or(self.system_prompt)
                .filter(|prompt| !prompt.trim().is_empty())
                .unwrap_or(defaults.system_prompt),
            history_turns: self
                .history_turns
                .filter(|turns| *turns > 0)
                .unwrap_or(defaults.history_turns),
            probe_timeout: self
                .probe_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.probe_timeout),
            options: ChatOptions {
                temperature: self.temperature.unwrap_or(defaults.options.temperature),
                top_p: self.top_p.unwrap_or(defaults.options.top_p),
            },
            markdown: self.markdown.unwrap_or(defaults.markdown),
            log_file: overrides.log_file.or(self.log_file),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub server_url: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub model: String,
    pub system_prompt: String,
    pub history_turns: usize,
    pub probe_timeout: Duration,
    pub options: ChatOptions,
    pub markdown: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            history_turns: DEFAULT_HISTORY_TURNS,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            options: ChatOptions {
                temperature: DEFAULT_TEMPERATURE,
                top_p: DEFAULT_TOP_P,
            },
            markdown: true,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = Config::load_from_path(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.resolve(SettingsOverrides::default()), Settings::default());
    }

    #[test]
    fn file_values_are_applied() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(
            &dir,
            r#"
server_url = "http://gpu-box:11434"
model = "llama3:8b"
system_prompt = "Be terse."
history_turns = 4
probe_timeout_secs = 10
temperature = 0.2
top_p = 0.5
markdown = false
log_file = "/tmp/parley.log"
"#,
        );

        let settings = Config::load_from_path(&path)
            .expect("load")
            .resolve(SettingsOverrides::default());

        assert_eq!(settings.server_url, "http://gpu-box:11434");
        assert_eq!(settings.model, "llama3:8b");
        assert_eq!(settings.system_prompt, "Be terse.");
        assert_eq!(settings.history_turns, 4);
        assert_eq!(settings.probe_timeout, Duration::from_secs(10));
        assert_eq!(settings.options.temperature, 0.2);
        assert_eq!(settings.options.top_p, 0.5);
        assert!(!settings.markdown);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/parley.log")));
    }

    #[test]
    fn command_line_overrides_win() {
        let config = Config {
            server_url: Some("http://from-file:11434".into()),
            model: Some("file-model".into()),
            ..Config::default()
        };
        let settings = config.resolve(SettingsOverrides {
            server_url: Some("http://from-cli:11434/".into()),
            model: None,
            system_prompt: Some("cli prompt".into()),
            log_file: Some(PathBuf::from("cli.log")),
        });

        assert_eq!(settings.server_url, "http://from-cli:11434");
        assert_eq!(settings.model, "file-model");
        assert_eq!(settings.system_prompt, "cli prompt");
        assert_eq!(settings.log_file, Some(PathBuf::from("cli.log")));
    }

    #[test]
    fn degenerate_values_fall_back_to_defaults() {
        let config = Config {
            system_prompt: Some("   ".into()),
            history_turns: Some(0),
            probe_timeout_secs: Some(0),
            ..Config::default()
        };
        let settings = config.resolve(SettingsOverrides::default());

        assert_eq!(settings.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(settings.history_turns, DEFAULT_HISTORY_TURNS);
        assert_eq!(
            settings.probe_timeout,
            Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "server_url = [not toml");

        let err = Config::load_from_path(&path).expect_err("parse should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "api_key = \"sk-...\"\n");

        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
