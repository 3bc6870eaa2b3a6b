//! The main config loading module for fm.
//!
//! Handles loading and deserializing settings from `fm.toml`.
//!
//! Provides and manages the main [Config] struct, as well as the internal [RawConfig] used
//! for parsing and processing, and the [ConfigError] returned by the fallible steps.
//!
//! Also implements default config generation when `fm.toml` is not present.

use crate::config::assoc::{AssocRule, Associations, default_assocs};
use crate::config::input::{KeyBinding, default_bindings};
use crate::config::{General, Theme};
use crate::utils::{get_home, shorten_home_path};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::{info, warn};

/// Errors produced while reading the configuration.
///
/// None of them is fatal: the loader falls back to defaults for the affected part.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid binding for key {key:?}: {reason}")]
    Binding { key: String, reason: String },
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Raw configuration as read from the toml file
/// This struct is deserialized directly from the toml file.
/// It uses owned types and is then converted into the main [Config] struct.
/// Tables that are absent keep the built-in defaults; present tables replace them.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    theme: Theme,
    keys: Option<Vec<KeyBinding>>,
    assocs: Option<Vec<AssocRule>>,
}

/// Main configuration struct for fm
/// This struct holds the processed configuration options used by fm.
#[derive(Debug)]
pub struct Config {
    general: General,
    theme: Theme,
    keys: Vec<KeyBinding>,
    assocs: Associations,
}

/// Conversion from RawConfig to Config
/// Compiles the association table and resolves the shell.
impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: raw.general.resolved(),
            theme: raw.theme,
            keys: raw.keys.unwrap_or_else(default_bindings),
            assocs: Associations::from_rules(&raw.assocs.unwrap_or_else(default_assocs)),
        }
    }
}

impl Config {
    /// Load configuration from the default path
    /// If the file does not exist or fails to parse, returns the default configuration.
    ///
    /// Called by entry point to load config at startup.
    pub fn load() -> Self {
        let path = Self::default_path();

        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                info!(path = %path.display(), "config loaded");
                config
            }
            Err(e) => {
                warn!("{e}");
                eprintln!("[fm] {e}. Using internal defaults.");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(raw.into())
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &General {
        &self.general
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn keys(&self) -> &[KeyBinding] {
        &self.keys
    }

    #[inline]
    pub fn assocs(&self) -> &Associations {
        &self.assocs
    }

    /// Determine the default configuration file path.
    /// Checks the FM_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/fm/fm.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("FM_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("fm/fm.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/fm/fm.toml");
        }
        PathBuf::from("fm.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {}", shorten_home_path(path)),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)?;
        println!("Default config generated at {}", shorten_home_path(path));
        Ok(())
    }
}

/// Default configuration options
impl Default for Config {
    fn default() -> Self {
        Config {
            general: General::default(),
            theme: Theme::default(),
            keys: default_bindings(),
            assocs: Associations::default(),
        }
    }
}

pub(crate) const DEFAULT_TOML: &str = r##"# fm.toml - default configuration for fm
#
# Commented values are the internal defaults.
# A [[keys]] or [[assocs]] table, once present, replaces the whole built-in table.

[general]
# show_hidden = false
# case_insensitive = false
# shell = "sh"

# [theme]
# path.fg = "magenta"
# directory.fg = "blue"
# selection = { fg = "black", bg = "yellow" }   # unset: reversed video
# marker.fg = "yellow"
# status.fg = "default"

# Key tokens: a printable character ("j", " "), "^X" for Ctrl+X, "M-x" for Alt+x,
# or a curses-style name ("KEY_UP", "KEY_BACKSPACE", "KEY_F(1)").
# Aliases such as "space", "enter", "up", "<c-x>" and "alt+x" are accepted as well.
# [[keys]]
# key = "j"
# action = "step"    # step, nav, touch, mark, dot, delete, with, quit
# arg = 1

# Openers are chosen by the first case-insensitive regex matching the file name.
# Keep a catch-all pattern last.
# [[assocs]]
# pattern = '\.(pdf)$'
# opener = "zathura"
# [[assocs]]
# pattern = "."
# opener = "less"
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_toml_str("")?;
        assert_eq!(config.keys(), default_bindings().as_slice());
        assert_eq!(config.assocs().resolve("a.pdf"), Some("zathura"));
        assert!(!config.general().show_hidden());
        assert_eq!(config.general().shell(), "sh");
        Ok(())
    }

    #[test]
    fn test_tables_replace_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_toml_str(
            r#"
            [general]
            show_hidden = true

            [[keys]]
            key = "x"
            action = "quit"

            [[assocs]]
            pattern = '\.md$'
            opener = "glow"
            "#,
        )?;
        assert!(config.general().show_hidden());
        assert_eq!(config.keys().len(), 1);
        assert_eq!(config.keys()[0].key(), "x");
        assert_eq!(config.assocs().resolve("README.MD"), Some("glow"));
        assert_eq!(config.assocs().resolve("a.txt"), None);
        Ok(())
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml_str("[general\nshow_hidden = ").err();
        assert!(matches!(err, Some(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_shell_falls_back() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_toml_str(
            r#"
            [general]
            shell = "definitely-not-a-shell-binary"
            "#,
        )?;
        assert_eq!(config.general().shell(), "sh");
        Ok(())
    }

    #[test]
    fn test_generated_default_parses() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("fm/fm.toml");
        Config::generate_default(&path)?;
        let config = Config::from_file(&path)?;
        assert_eq!(config.keys().len(), default_bindings().len());

        let again = Config::generate_default(&path);
        assert!(again.is_err());
        Ok(())
    }

    #[test]
    fn test_read_error_names_path() {
        let err = Config::from_file(Path::new("/path/does/not/exist.toml")).err();
        let msg = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("/path/does/not/exist.toml"), "{msg}");
    }
}
