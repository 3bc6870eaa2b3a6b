//! Miscellaneous utility functions for fm.
//!
//! This modules holds the [helpers] submodule, which provides commonly used utilities such as:
//! - Color parsing
//! - Resolving the start directory
//! - Shortening the home directory path to "~"
//! - Installing the file logger
//! - Adopting the environment locale
//!
//! and the [cli] submodule with the hand-rolled argument handling.

pub mod cli;
pub mod helpers;

pub use helpers::{
    LOG_ENV, LOG_LEVEL_ENV, expand_home_path, get_home, init_locale, init_logging, parse_color,
    resolve_initial_dir, shorten_home_path,
};
