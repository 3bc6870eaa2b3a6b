//! Key mapping and action dispatch system for fm
//!
//! Defines key tokens, the parsing of bindings from the config and the [Action] enum
//! with all navigation, file and system actions used by fm.
//!
//! Keys are identified by curses-style tokens: the printable character itself,
//! `^X` for a control character, `M-x` for a meta (alt) key and names such as
//! `KEY_UP` or `KEY_F(1)` for special keys.

use crate::config::{BindArg, Config, ConfigError, KeyBinding};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use tracing::warn;

/// A key as the dispatcher sees it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyToken(String);

impl KeyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts a terminal key event into its token. Keys without a token
    /// (media keys, lone modifiers) yield `None`.
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let base = match key.code {
            KeyCode::Char(c) if ctrl => control_token(c),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "^J".into(),
            KeyCode::Esc => "^[".into(),
            KeyCode::Tab => "^I".into(),
            KeyCode::BackTab => "KEY_BTAB".into(),
            KeyCode::Backspace => "KEY_BACKSPACE".into(),
            KeyCode::Up => "KEY_UP".into(),
            KeyCode::Down => "KEY_DOWN".into(),
            KeyCode::Left => "KEY_LEFT".into(),
            KeyCode::Right => "KEY_RIGHT".into(),
            KeyCode::Home => "KEY_HOME".into(),
            KeyCode::End => "KEY_END".into(),
            KeyCode::PageUp => "KEY_PPAGE".into(),
            KeyCode::PageDown => "KEY_NPAGE".into(),
            KeyCode::Insert => "KEY_IC".into(),
            KeyCode::Delete => "KEY_DC".into(),
            KeyCode::F(n) => format!("KEY_F({n})"),
            _ => return None,
        };

        if key.modifiers.contains(KeyModifiers::ALT) {
            Some(Self(format!("M-{base}")))
        } else {
            Some(Self(base))
        }
    }

    /// Parses a key as written in the config file.
    ///
    /// Accepts raw tokens (`"j"`, `"^D"`, `"M-x"`, `"KEY_UP"`) as well as the
    /// friendlier forms `"space"`, `"enter"`, `"up"`, `"f1"`, `"<c-d>"`, `"ctrl+d"`
    /// and `"alt+x"`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.chars().count() == 1 {
            return Some(Self(s.to_string()));
        }
        if s.starts_with("KEY_") {
            return Some(Self(s.to_string()));
        }
        if let Some(rest) = s.strip_prefix('^')
            && rest.chars().count() == 1
        {
            let c = rest.chars().next()?;
            return Some(Self(control_token(c)));
        }
        if let Some(rest) = s.strip_prefix("M-") {
            let inner = Self::parse(rest)?;
            return Some(Self(format!("M-{}", inner.0)));
        }

        let mut ctrl = false;
        let mut alt = false;
        let mut shift = false;

        let is_bracketed = s.starts_with('<') && s.ends_with('>');
        let mut input = s.trim_start_matches('<').trim_end_matches('>').to_string();

        if is_bracketed && input.contains('-') {
            let parts: Vec<&str> = input.split('-').collect();

            for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
                match prefix.to_lowercase().as_str() {
                    "c" | "ctrl" => ctrl = true,
                    "a" | "m" | "alt" => alt = true,
                    "s" | "shift" => shift = true,
                    _ => return None,
                }
            }
            input = parts.last()?.to_string();
        }

        let mut base: Option<String> = None;
        for part in input.split('+') {
            let p_low = part.to_lowercase();
            match p_low.as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" | "meta" => alt = true,
                "shift" => shift = true,

                "up" => base = Some("KEY_UP".into()),
                "down" => base = Some("KEY_DOWN".into()),
                "left" => base = Some("KEY_LEFT".into()),
                "right" => base = Some("KEY_RIGHT".into()),
                "home" => base = Some("KEY_HOME".into()),
                "end" => base = Some("KEY_END".into()),
                "pageup" | "pgup" => base = Some("KEY_PPAGE".into()),
                "pagedown" | "pgdn" => base = Some("KEY_NPAGE".into()),
                "insert" | "ins" => base = Some("KEY_IC".into()),
                "delete" | "del" => base = Some("KEY_DC".into()),
                "enter" | "return" => base = Some("^J".into()),
                "esc" | "escape" => base = Some("^[".into()),
                "backspace" | "back" => base = Some("KEY_BACKSPACE".into()),
                "tab" => base = Some("^I".into()),
                "space" | "spc" => base = Some(" ".into()),

                _ => {
                    if part.chars().count() == 1 {
                        let mut c = part.chars().next()?;
                        if shift {
                            c = c.to_ascii_uppercase();
                        }
                        base = Some(if ctrl {
                            control_token(c)
                        } else {
                            c.to_string()
                        });
                    } else if p_low.starts_with('f')
                        && p_low.len() > 1
                        && p_low[1..].chars().all(|c| c.is_ascii_digit())
                    {
                        let n: u8 = p_low[1..].parse().ok()?;
                        base = Some(format!("KEY_F({n})"));
                    } else if part.is_empty() {
                        continue;
                    } else {
                        return None;
                    }
                }
            }
        }

        let base = base?;
        if alt {
            Some(Self(format!("M-{base}")))
        } else {
            Some(Self(base))
        }
    }

    /// The character this key types into a text prompt, if it is printable.
    pub fn printable(&self) -> Option<char> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    pub fn is_newline(&self) -> bool {
        matches!(self.0.as_str(), "^J" | "^M")
    }

    pub fn is_backspace(&self) -> bool {
        matches!(self.0.as_str(), "KEY_BACKSPACE" | "^?" | "^H")
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `^X` notation for a control character typed as Ctrl+`c`.
fn control_token(c: char) -> String {
    match c {
        ' ' | '2' => "^@".into(),
        '?' => "^?".into(),
        c if c.is_ascii_alphabetic() || "@[\\]^_".contains(c) => {
            format!("^{}", c.to_ascii_uppercase())
        }
        c => c.to_string(),
    }
}

/// One input event as delivered to the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyToken),
    Resize,
}

impl InputEvent {
    /// Shorthand for a key event carrying `token`.
    pub fn key(token: &str) -> Self {
        InputEvent::Key(KeyToken::new(token))
    }
}

/// Where `nav` goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavTarget {
    Parent,
    Reload,
    Enter,
}

/// What `delete` removes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeleteScope {
    Selected,
    Marked,
}

/// Represents any action bound to a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Step(isize),
    Nav(NavTarget),
    Touch { dir: bool },
    Mark,
    Dot,
    Delete(DeleteScope),
    With,
    Quit,
}

impl Action {
    /// Builds the action of one config binding, validating its argument.
    pub fn from_binding(binding: &KeyBinding) -> Result<Self, ConfigError> {
        let bad = |reason: &str| ConfigError::Binding {
            key: binding.key().to_string(),
            reason: reason.to_string(),
        };

        let action = match binding.action() {
            "step" => match binding.arg() {
                Some(BindArg::Int(n)) => {
                    Action::Step(isize::try_from(n).map_err(|_| bad("step out of range"))?)
                }
                _ => return Err(bad("step needs an integer argument")),
            },
            "nav" => match binding.arg() {
                Some(BindArg::Int(-1)) => Action::Nav(NavTarget::Parent),
                Some(BindArg::Int(0)) => Action::Nav(NavTarget::Reload),
                Some(BindArg::Int(1)) => Action::Nav(NavTarget::Enter),
                _ => return Err(bad("nav needs -1, 0 or 1")),
            },
            "touch" => match binding.arg() {
                None => Action::Touch { dir: false },
                Some(BindArg::Bool(dir)) => Action::Touch { dir },
                Some(BindArg::Int(_)) => return Err(bad("touch takes a boolean")),
            },
            "delete" | "del" => match binding.arg() {
                None | Some(BindArg::Bool(false)) => Action::Delete(DeleteScope::Selected),
                Some(BindArg::Bool(true)) => Action::Delete(DeleteScope::Marked),
                Some(BindArg::Int(_)) => return Err(bad("delete takes a boolean")),
            },
            "mark" => Action::Mark,
            "dot" => Action::Dot,
            "with" => Action::With,
            "quit" => Action::Quit,
            other => return Err(bad(&format!("unknown action {other:?}"))),
        };
        Ok(action)
    }
}

/// The ordered binding table. Lookup is by exact token and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<(KeyToken, Action)>,
}

impl Keymap {
    /// Builds the keymap from the config
    pub fn from_config(config: &Config) -> Self {
        Self::from_bindings(config.keys())
    }

    /// Builds the keymap from raw bindings. Invalid rows are skipped with a warning.
    pub fn from_bindings(keys: &[KeyBinding]) -> Self {
        let mut bindings = Vec::with_capacity(keys.len());
        for binding in keys {
            let Some(token) = KeyToken::parse(binding.key()) else {
                warn!(key = binding.key(), "skipping binding: unrecognized key");
                continue;
            };
            match Action::from_binding(binding) {
                Ok(action) => bindings.push((token, action)),
                Err(e) => warn!("skipping binding: {e}"),
            }
        }
        Keymap { bindings }
    }

    /// Looks up the action for a given key token
    pub fn lookup(&self, token: &KeyToken) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(k, _)| k == token)
            .map(|(_, action)| *action)
    }

    pub fn bindings(&self) -> &[(KeyToken, Action)] {
        &self.bindings
    }
}
