//! File association configuration for fm.
//!
//! The `[[assocs]]` table maps a case-insensitive regular expression on the entry name
//! to the opener program. Patterns are tried in table order and the first match wins,
//! so the table should end with a catch-all pattern such as `"."`.

use crate::config::ConfigError;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use tracing::warn;

/// One raw row of the association table as read from the toml file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssocRule {
    pattern: String,
    opener: String,
}

impl AssocRule {
    pub fn new(pattern: &str, opener: &str) -> Self {
        Self {
            pattern: pattern.into(),
            opener: opener.into(),
        }
    }
}

/// The built-in association table.
#[rustfmt::skip]
pub fn default_assocs() -> Vec<AssocRule> {
    vec![
        AssocRule::new(r"\.(avi|mp3|mp4|mkv|ogg|flac|webm)$", "mpv"),
        AssocRule::new(r"\.(png|jpg|gif)$",                   "sxiv"),
        AssocRule::new(r"\.(html)$",                          "firefox"),
        AssocRule::new(r"\.(pdf)$",                           "zathura"),
        AssocRule::new(r"\.(sh)$",                            "sh"),
        AssocRule::new(".",                                   "less"),
    ]
}

/// Compiled association table.
#[derive(Debug, Clone)]
pub struct Associations {
    rules: Vec<(Regex, String)>,
}

impl Associations {
    /// Compiles the rules in order. A rule whose pattern does not compile is skipped
    /// and reported in the returned error list.
    pub fn compile(rules: &[AssocRule]) -> (Self, Vec<ConfigError>) {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut errors = Vec::new();

        for rule in rules {
            match RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
            {
                Ok(re) => compiled.push((re, rule.opener.clone())),
                Err(source) => errors.push(ConfigError::Pattern {
                    pattern: rule.pattern.clone(),
                    source,
                }),
            }
        }
        (Self { rules: compiled }, errors)
    }

    /// Compiles the rules, logging and dropping the invalid ones.
    pub fn from_rules(rules: &[AssocRule]) -> Self {
        let (assocs, errors) = Self::compile(rules);
        for e in errors {
            warn!("skipping association: {e}");
            eprintln!("[fm] skipping association: {e}");
        }
        assocs
    }

    /// Returns the opener of the first rule matching `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(name))
            .map(|(_, opener)| opener.as_str())
    }
}

impl Default for Associations {
    fn default() -> Self {
        Self::from_rules(&default_assocs())
    }
}
