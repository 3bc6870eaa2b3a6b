//! Directory loading logic for fm.
//!
//! Provides the [Entry] struct which is used throughout fm, the [Snapshot] which holds
//! the entries of one load, and the [load_dir] function which builds a snapshot.

use crate::core::formatter::{Formatter, format_permissions, format_size};

use unicode_width::UnicodeWidthStr;
use uzers::{Groups, Users, UsersCache};

use std::borrow::Cow;
use std::ffi::{CStr, CString, OsStr, OsString};
use std::fs::{self, Metadata};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use tracing::{debug, warn};

/// Represents a single entry in a directory listing.
///
/// Every display field is derived once, when the entry is loaded. Only the mark can
/// change afterwards and it is lost when the snapshot is rebuilt.
#[derive(Debug, Clone)]
pub struct Entry {
    name: Box<OsStr>,
    collation_name: CString,
    lowercase_name: Box<str>,
    flags: u8,
    permissions: String,
    size: String,
    owner: String,
    group: String,
}

impl Entry {
    // Flag bit definitions
    pub(super) const IS_DIR: u8 = 1 << 0;
    pub(super) const IS_MARKED: u8 = 1 << 1;

    /// Builds an entry from the `stat` metadata of a child (symlinks already followed).
    pub(crate) fn from_metadata(name: OsString, md: &Metadata, ids: &mut IdNames) -> Self {
        let is_dir = md.is_dir();
        let flags = if is_dir { Self::IS_DIR } else { 0 };
        let lowercase_name = name.to_string_lossy().to_lowercase().into_boxed_str();
        // file names never hold a NUL byte
        let collation_name = CString::new(name.as_bytes()).unwrap_or_default();

        Entry {
            name: name.into_boxed_os_str(),
            collation_name,
            lowercase_name,
            flags,
            permissions: format_permissions(md.mode(), is_dir),
            size: format_size(md.size()),
            owner: ids.user(md.uid()),
            group: ids.group(md.gid()),
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub(crate) fn collation_name(&self) -> &CStr {
        &self.collation_name
    }

    #[inline]
    pub(crate) fn lowercase_name(&self) -> &str {
        &self.lowercase_name
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Self::IS_DIR != 0
    }

    #[inline]
    pub fn is_marked(&self) -> bool {
        self.flags & Self::IS_MARKED != 0
    }

    #[inline]
    pub fn permissions(&self) -> &str {
        &self.permissions
    }

    #[inline]
    pub fn size(&self) -> &str {
        &self.size
    }

    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    pub(crate) fn toggle_mark(&mut self) {
        self.flags ^= Self::IS_MARKED;
    }
}

/// The full list of entries of one directory load.
///
/// Replaced as a whole on every reload, never patched.
#[derive(Debug, Default)]
pub struct Snapshot {
    entries: Vec<Entry>,
    max_name_width: usize,
}

impl Snapshot {
    pub(crate) fn new(entries: Vec<Entry>) -> Self {
        let max_name_width = entries
            .iter()
            .map(|e| e.name_str().width())
            .max()
            .unwrap_or(0);
        Self {
            entries,
            max_name_width,
        }
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Entry> {
        self.entries.get_mut(idx)
    }

    /// Widest name of the whole snapshot in display columns.
    #[inline]
    pub fn max_name_width(&self) -> usize {
        self.max_name_width
    }

    pub fn marked(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_marked())
    }
}

/// Result of [load_dir]: the new snapshot and an optional message for the status line.
#[derive(Debug)]
pub struct LoadOutcome {
    pub snapshot: Snapshot,
    pub message: Option<String>,
}

/// Resolves numeric owner and group ids to names for one load.
///
/// Falls back to the numeric id when the lookup fails and counts the fallbacks.
pub(crate) struct IdNames {
    cache: UsersCache,
    unresolved: usize,
}

impl IdNames {
    pub(crate) fn new() -> Self {
        Self {
            cache: UsersCache::new(),
            unresolved: 0,
        }
    }

    pub(crate) fn user(&mut self, uid: u32) -> String {
        match self.cache.get_user_by_uid(uid) {
            Some(user) => user.name().to_string_lossy().into_owned(),
            None => {
                self.unresolved += 1;
                uid.to_string()
            }
        }
    }

    pub(crate) fn group(&mut self, gid: u32) -> String {
        match self.cache.get_group_by_gid(gid) {
            Some(group) => group.name().to_string_lossy().into_owned(),
            None => {
                self.unresolved += 1;
                gid.to_string()
            }
        }
    }

    /// Number of lookups that fell back to the numeric id.
    #[inline]
    pub(crate) fn unresolved(&self) -> usize {
        self.unresolved
    }
}

/// Status line text for the problems of one load, if there were any.
fn load_message(skipped: usize, unresolved: usize) -> Option<String> {
    let mut parts = Vec::with_capacity(2);
    match skipped {
        0 => {}
        1 => parts.push("1 entry skipped: metadata unavailable".to_string()),
        n => parts.push(format!("{n} entries skipped: metadata unavailable")),
    }
    match unresolved {
        0 => {}
        1 => parts.push("1 owner/group id shown as a number".to_string()),
        n => parts.push(format!("{n} owner/group ids shown as numbers")),
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

/// Reads the contents of the provided directory and returns them as a sorted [Snapshot].
///
/// Never fails: an unreadable directory gives an empty snapshot and a message. A child
/// whose metadata cannot be read is skipped, and an owner or group without a name is
/// shown as its number. Both are counted in the message.
pub fn load_dir(path: &Path, show_hidden: bool, formatter: &Formatter) -> LoadOutcome {
    let read = match fs::read_dir(path) {
        Ok(read) => read,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open directory");
            return LoadOutcome {
                snapshot: Snapshot::default(),
                message: Some(format!("cannot open {}: {}", path.display(), e)),
            };
        }
    };

    let mut ids = IdNames::new();
    let mut entries = Vec::with_capacity(256);
    let mut skipped = 0usize;

    for entry in read {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "unreadable directory entry");
                skipped += 1;
                continue;
            }
        };

        let name = entry.file_name();
        if !formatter.is_listed(&name, show_hidden) {
            continue;
        }

        // stat, not lstat: a symlink to a directory is listed as a directory
        let md = match fs::metadata(entry.path()) {
            Ok(md) => md,
            Err(e) => {
                debug!(name = %name.to_string_lossy(), error = %e, "skipping entry without metadata");
                skipped += 1;
                continue;
            }
        };

        entries.push(Entry::from_metadata(name, &md, &mut ids));
    }

    formatter.sort_entries(&mut entries);
    let unresolved = ids.unresolved();
    debug!(path = %path.display(), count = entries.len(), skipped, unresolved, "directory loaded");

    LoadOutcome {
        snapshot: Snapshot::new(entries),
        message: load_message(skipped, unresolved),
    }
}
