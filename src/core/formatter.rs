//! Sorting, filtering, and display formatting for directory entries in fm.
//!
//! The [Formatter] struct holds the rules for the hidden-file predicate and the entry
//! ordering, based on the `[general]` section of fm.toml.
//!
//! Also formats the permission string and the scaled size label shown in the footer line.

use crate::core::Entry;

use unicode_width::UnicodeWidthChar;

use std::cmp::Ordering;
use std::ffi::{CStr, OsStr};

/// Units used by [format_size], one per division by 1024.
const SIZE_UNITS: [char; 5] = ['B', 'K', 'M', 'G', 'T'];
/// Significant digits of the size label.
const SIZE_DIGITS: usize = 3;

/// Formatter struct to handle filtering and ordering of entries
/// based on user preferences.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    case_insensitive: bool,
}

impl Formatter {
    pub fn new(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    /// Hidden-file predicate: dotfiles are only listed when `show_hidden` is set.
    /// `.` and `..` are never listed.
    pub fn is_listed(&self, name: &OsStr, show_hidden: bool) -> bool {
        if name == "." || name == ".." {
            return false;
        }
        show_hidden || !is_hidden_name(name)
    }

    /// Sorts the entries in place: all directories first, then by name.
    ///
    /// Names collate under the process locale (see [collate]). With `case_insensitive`
    /// the lowercase name decides instead. Raw bytes break ties either way, so the order
    /// stays total.
    pub fn sort_entries(&self, entries: &mut [Entry]) {
        entries.sort_by(|a, b| {
            b.is_dir()
                .cmp(&a.is_dir())
                .then_with(|| self.compare_names(a, b))
        });
    }

    pub fn compare_names(&self, a: &Entry, b: &Entry) -> Ordering {
        let primary = if self.case_insensitive {
            a.lowercase_name().cmp(b.lowercase_name())
        } else {
            collate(a.collation_name(), b.collation_name())
        };
        primary.then_with(|| a.name().cmp(b.name()))
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Compares two names with `strcoll`, i.e. under the `LC_COLLATE` category of the
/// process locale. Until `setlocale` is called that is the C locale (byte order).
pub fn collate(a: &CStr, b: &CStr) -> Ordering {
    // SAFETY: both pointers come from live NUL-terminated CStr values
    let res = unsafe { libc::strcoll(a.as_ptr(), b.as_ptr()) };
    res.cmp(&0)
}

#[inline]
fn is_hidden_name(name: &OsStr) -> bool {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().first() == Some(&b'.')
}

/// Formats the file type and permission bits in the usual unix form, e.g. `drwxr-xr-x`.
///
/// Only directories get a type letter; everything else shows `-`.
pub fn format_permissions(mode: u32, is_dir: bool) -> String {
    let mut chars = [if is_dir { 'd' } else { '-' }, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1 != 0 {
            chars[base + 2] = 'x';
        }
    }
    chars.iter().collect()
}

/// Formats a byte count into a short label like `4.2K`.
///
/// Divides by 1024 while the value exceeds 1024, at most four times, then prints
/// three significant digits the way C's `%.3g` does (so `1023` becomes `1.02e+03B`).
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size > 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    let mut out = format_significant(size, SIZE_DIGITS);
    out.push(SIZE_UNITS[unit]);
    out
}

/// `%.Ng` style formatting: `digits` significant digits, trailing zeros dropped,
/// exponent notation when the exponent is below -4 or at least `digits`.
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return if value == 0.0 {
            "0".to_string()
        } else {
            value.to_string()
        };
    }

    // Rounding to the requested precision first decides the exponent (999.7 -> 1.00e3)
    let sci = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Cleans a name to exactly `width` display columns by removing control characters,
/// expanding tabs to 4 spaces, and truncating or padding the string.
/// # Returns
/// A sanitized string that fits exactly within the specified width.
pub fn sanitize_to_exact_width(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut current_w = 0;

    for char in line.chars() {
        if char == '\t' {
            let space_count = 4 - (current_w % 4);
            if current_w + space_count > width {
                break;
            }
            out.push_str(&" ".repeat(space_count));
            current_w += space_count;
            continue;
        }

        if char.is_control() {
            continue;
        }

        let w = char.width().unwrap_or(0);
        if current_w + w > width {
            break;
        }

        out.push(char);
        current_w += w;
    }

    if current_w < width {
        out.push_str(&" ".repeat(width - current_w));
    }

    out
}
