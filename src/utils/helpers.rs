//! Helpers for fm.
//!
//! Provides utility functions used throughout fm:
//! - Color parsing from strings or hex codes
//! - Resolving the start directory from the command line
//! - Installing the file logger
//! - Adopting the locale of the environment
//! - Displaying home directories as "~" in messages

use ratatui::style::Color;
use std::ffi::CStr;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log file path. Logging is off when it is unset.
pub const LOG_ENV: &str = "FM_LOG";
/// Environment variable holding the log filter, in `tracing_subscriber` env-filter syntax.
pub const LOG_LEVEL_ENV: &str = "FM_LOG_LEVEL";

/// Parses a string (color name or hex) into a ratatui::style::color
///
/// Supports standard names (red, green, etc.) as well as hex values (#RRGGBB or #RGB)
pub fn parse_color(s: &str) -> Color {
    match s.to_lowercase().as_str() {
        "default" | "reset" => Color::Reset,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        "blue" => Color::Blue,
        "green" => Color::Green,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "black" => Color::Black,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => {
            if let Some(color) = s.strip_prefix('#') {
                let expanded = match color.len() {
                    6 => Some(color.to_string()),
                    3 => Some(color.chars().flat_map(|c| [c, c]).collect::<String>()),
                    _ => None,
                };
                if let Some(rgb) = expanded.and_then(|hex| u32::from_str_radix(&hex, 16).ok()) {
                    return Color::Rgb(
                        ((rgb >> 16) & 0xFF) as u8,
                        ((rgb >> 8) & 0xFF) as u8,
                        (rgb & 0xFF) as u8,
                    );
                }
            }
            // fallback
            Color::Reset
        }
    }
}

pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expands a leading `~` to the home directory.
pub fn expand_home_path(path: &str) -> PathBuf {
    if let Some(home) = get_home() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolves the PATH argument to an absolute, canonical directory.
///
/// Returns an error if it does not exist, is not a directory, or cannot be listed.
pub fn resolve_initial_dir(arg: &str) -> io::Result<PathBuf> {
    let path = fs::canonicalize(expand_home_path(arg))?;
    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        ));
    }
    fs::read_dir(&path)?;
    Ok(path)
}

/// Util function to shorten home directory to ~.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = get_home()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        } else {
            let mut short = stripped.display().to_string();
            if short.starts_with(MAIN_SEPARATOR) {
                short.remove(0);
            }
            return format!("~{}{}", MAIN_SEPARATOR, short);
        }
    }
    path.display().to_string()
}

/// Installs the file logger when `FM_LOG` names a file.
///
/// The terminal belongs to the UI, so logs only ever go to that file.
/// Returns the log path when logging was enabled.
pub fn init_logging() -> io::Result<Option<PathBuf>> {
    let Some(path) = std::env::var_os(LOG_ENV).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    let path = PathBuf::from(path);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init();

    if let Err(e) = installed {
        return Err(io::Error::other(e));
    }
    Ok(Some(path))
}

/// Helper utils integration tests
/// Adopts the locale of the environment (`LC_ALL`, `LC_COLLATE`, `LANG`) for the whole
/// process, which is what name collation uses.
///
/// Returns the resulting locale name, or `None` when the environment names a locale
/// that is not installed. The process then stays in the C locale.
///
/// Call it before any other thread is started.
pub fn init_locale() -> Option<String> {
    // SAFETY: an empty string asks for the environment locale; the returned pointer is
    // copied out before the next setlocale call can invalidate it
    let name = unsafe { libc::setlocale(libc::LC_ALL, c"".as_ptr()) };
    if name.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
}
