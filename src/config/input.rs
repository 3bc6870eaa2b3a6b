//! Input configuration options for fm
//!
//! This module defines the `[[keys]]` binding table which is read from the fm.toml
//! configuration file. Each binding names a key, an action and an optional argument.
//! Parsing the strings into actions is done by [crate::app::keymap::Keymap].

use serde::Deserialize;

/// Argument of a binding: a step delta / nav direction, or a flag.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum BindArg {
    Int(i64),
    Bool(bool),
}

/// One row of the binding table.
///
/// # Examples
/// ```toml
/// [[keys]]
/// key = "J"
/// action = "step"
/// arg = 10
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    key: String,
    action: String,
    #[serde(default)]
    arg: Option<BindArg>,
}

impl KeyBinding {
    pub fn new(key: &str, action: &str, arg: Option<BindArg>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
            arg,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn action(&self) -> &str {
        &self.action
    }

    #[inline]
    pub fn arg(&self) -> Option<BindArg> {
        self.arg
    }
}

/// The built-in binding table, in lookup order.
#[rustfmt::skip]
pub fn default_bindings() -> Vec<KeyBinding> {
    use BindArg::{Bool, Int};
    vec![
        KeyBinding::new("d", "delete", Some(Bool(false))),  // delete selection
        KeyBinding::new("D", "delete", Some(Bool(true))),   // delete marked
        KeyBinding::new("h", "nav",    Some(Int(-1))),      // leave directory
        KeyBinding::new("j", "step",   Some(Int(1))),
        KeyBinding::new("J", "step",   Some(Int(10))),
        KeyBinding::new("k", "step",   Some(Int(-1))),
        KeyBinding::new("K", "step",   Some(Int(-10))),
        KeyBinding::new("l", "nav",    Some(Int(1))),       // enter directory
        KeyBinding::new("n", "touch",  Some(Bool(false))),  // new file
        KeyBinding::new("N", "touch",  Some(Bool(true))),   // new directory
        KeyBinding::new("o", "with",   None),               // open with the association table
        KeyBinding::new("q", "quit",   None),
        KeyBinding::new("r", "nav",    Some(Int(0))),       // reload
        KeyBinding::new(".", "dot",    None),               // toggle hidden
        KeyBinding::new(" ", "mark",   None),
    ]
}
