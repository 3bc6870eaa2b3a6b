//! Configuration module for fm
//!
//! This module handles loading, parsing and managing configuration for fm.
//! - [general]: the `[general]` table (hidden files, collation, shell)
//! - [input]: the `[[keys]]` binding table
//! - [assoc]: the `[[assocs]]` opener table
//! - [theme]: the `[theme]` colors
//! - [load]: file discovery, parsing and default generation

pub mod assoc;
pub mod general;
pub mod input;
pub mod load;
pub mod theme;

pub use assoc::{AssocRule, Associations};
pub use general::General;
pub use input::{BindArg, KeyBinding};
pub use load::{Config, ConfigError};
pub use theme::Theme;
