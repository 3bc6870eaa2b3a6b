//! The general configuration settings for fm.
//!
//! This module defines the [General] struct for deserializing
//! the `[general]` table of the fm.toml configuration file.

use serde::Deserialize;
use tracing::warn;

/// Shell used to run openers when none is configured or the configured one is missing.
pub(crate) const DEFAULT_SHELL: &str = "sh";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct General {
    show_hidden: bool,
    case_insensitive: bool,
    shell: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            show_hidden: false,
            case_insensitive: false,
            shell: DEFAULT_SHELL.into(),
        }
    }
}

impl General {
    /// Falls back to [DEFAULT_SHELL] when the configured shell cannot be found on PATH.
    pub(crate) fn resolved(mut self) -> Self {
        let trimmed = self.shell.trim();
        if trimmed.is_empty() {
            self.shell = DEFAULT_SHELL.into();
        } else if which::which(trimmed).is_err() {
            warn!(shell = trimmed, "configured shell not found, using {DEFAULT_SHELL}");
            eprintln!("[fm] shell '{}' not found, using '{}'", trimmed, DEFAULT_SHELL);
            self.shell = DEFAULT_SHELL.into();
        } else {
            self.shell = trimmed.to_string();
        }
        self
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    #[inline]
    pub fn shell(&self) -> &str {
        &self.shell
    }
}
