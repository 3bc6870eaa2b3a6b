//! Session state and control flags for fm.
//!
//! This module defines the [Session] struct, the single owner of everything the
//! browser mutates while running:
//! - the current directory and its [Snapshot]
//! - the cursor position
//! - the one-line status message
//! - the [ControlFlags] driving the reload/redraw loop
//!
//! The session is passed by `&mut` to the event loop, the dispatcher and every action.

use crate::config::General;
use crate::core::{Entry, Formatter, Snapshot, load_dir};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bit set of pending work for the main loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlFlags(u8);

impl ControlFlags {
    pub(crate) const QUIT: u8 = 1 << 0;
    pub(crate) const LOAD: u8 = 1 << 1;
    pub(crate) const DRAW: u8 = 1 << 2;
    pub(crate) const DOTS: u8 = 1 << 3;

    #[inline]
    pub fn needs_quit(&self) -> bool {
        self.0 & Self::QUIT != 0
    }

    #[inline]
    pub fn needs_reload(&self) -> bool {
        self.0 & Self::LOAD != 0
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.0 & Self::DRAW != 0
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.0 & Self::DOTS != 0
    }

    pub fn request_quit(&mut self) {
        self.0 |= Self::QUIT;
    }

    pub fn request_reload(&mut self) {
        self.0 |= Self::LOAD;
    }

    pub fn request_redraw(&mut self) {
        self.0 |= Self::DRAW;
    }

    pub fn toggle_hidden(&mut self) {
        self.0 ^= Self::DOTS;
    }

    pub(crate) fn clear_reload(&mut self) {
        self.0 &= !Self::LOAD;
    }

    pub(crate) fn clear_redraw(&mut self) {
        self.0 &= !Self::DRAW;
    }
}

/// The browser session.
#[derive(Debug)]
pub struct Session {
    current_path: PathBuf,
    snapshot: Snapshot,
    cursor: usize,
    status: String,
    flags: ControlFlags,
    formatter: Formatter,
}

impl Session {
    /// Creates the session for `path`. Nothing is read until the first [Session::reload].
    pub fn new(path: PathBuf, general: &General) -> Self {
        let mut flags = ControlFlags::default();
        flags.request_reload();
        if general.show_hidden() {
            flags.toggle_hidden();
        }

        Self {
            current_path: path,
            snapshot: Snapshot::default(),
            cursor: 0,
            status: String::new(),
            flags,
            formatter: Formatter::new(general.case_insensitive()),
        }
    }

    // Getters/ accessors

    #[inline]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[inline]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[inline]
    pub fn flags(&self) -> ControlFlags {
        self.flags
    }

    #[inline]
    pub fn flags_mut(&mut self) -> &mut ControlFlags {
        &mut self.flags
    }

    /// Cursor index, absent when the snapshot is empty.
    pub fn cursor(&self) -> Option<usize> {
        if self.snapshot.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.cursor().and_then(|idx| self.snapshot.get(idx))
    }

    pub(crate) fn selected_entry_mut(&mut self) -> Option<&mut Entry> {
        let idx = self.cursor()?;
        self.snapshot.get_mut(idx)
    }

    /// Moves the cursor, clamping into the snapshot.
    pub(crate) fn set_cursor(&mut self, idx: usize) {
        self.cursor = idx.min(self.snapshot.len().saturating_sub(1));
    }

    pub(crate) fn set_current_path(&mut self, path: PathBuf) {
        self.current_path = path;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Replaces the snapshot with a fresh listing of the current directory.
    ///
    /// Marks are lost and the cursor goes back to the first entry.
    pub fn reload(&mut self) {
        match fs::canonicalize(&self.current_path) {
            Ok(path) => self.current_path = path,
            Err(e) => warn!(path = %self.current_path.display(), "canonicalize failed: {e}"),
        }

        let outcome = load_dir(&self.current_path, self.flags.show_hidden(), &self.formatter);
        self.snapshot = outcome.snapshot;
        self.cursor = 0;
        if let Some(msg) = outcome.message {
            self.status = msg;
        }
        debug!(
            path = %self.current_path.display(),
            entries = self.snapshot.len(),
            "reloaded"
        );

        self.flags.clear_reload();
        self.flags.request_redraw();
    }
}
