//! Core runtime logic for fm.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [fm]: directory loading and entry metadata (see [load_dir], [Entry], [Snapshot]).
//! - [formatter]: ordering, the hidden-file predicate and display formatting of entries.
//! - [proc]: external program invocations (mkdir, touch, rm, openers).
//! - [terminal]: terminal setup/teardown, the [Console] seam and the main event loop.
//!
//! Most callers will import [load_dir], [Entry], and [Snapshot] from this module.

pub mod fm;
pub mod formatter;
pub mod proc;
pub mod terminal;

pub use fm::{Entry, LoadOutcome, Snapshot, load_dir};
pub use formatter::{Formatter, format_permissions, format_size, sanitize_to_exact_width};
pub use proc::{Launch, run_foreground};
pub use terminal::{Console, TerminalConsole, event_loop, run_terminal};
