//! Action methods for fm.
//!
//! This module implements the [Session] methods behind every bindable [Action]:
//! cursor movement, navigation, marks, the hidden-file toggle, and the actions that
//! start external programs (create, delete, open).
//!
//! Cursor-dependent actions do nothing on an empty snapshot.
//!
//! [Action]: crate::app::keymap::Action

use crate::app::keymap::{DeleteScope, NavTarget};
use crate::app::prompt::{DELETE_PROMPT, confirm, read_name};
use crate::app::state::Session;
use crate::config::Associations;
use crate::core::proc::Launch;
use crate::core::terminal::Console;

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

impl Session {
    /// Moves the cursor by `delta`, clamped to the snapshot.
    pub fn action_step(&mut self, delta: isize) {
        let Some(cursor) = self.cursor() else {
            return;
        };
        let last = self.snapshot().len() - 1;
        self.set_cursor(cursor.saturating_add_signed(delta).min(last));
        self.flags_mut().request_redraw();
    }

    /// Changes directory. Always requests a reload, even when the target is not a
    /// directory and the path stays the same.
    pub fn action_nav(&mut self, target: NavTarget) {
        let next = match target {
            NavTarget::Reload => None,
            NavTarget::Parent => self.current_path().parent().map(Path::to_path_buf),
            NavTarget::Enter => {
                let Some(entry) = self.selected_entry() else {
                    return;
                };
                if entry.is_dir() {
                    Some(self.current_path().join(entry.name()))
                } else {
                    debug!(name = %entry.name_str(), "not a directory");
                    None
                }
            }
        };

        if let Some(path) = next {
            match fs::canonicalize(&path) {
                Ok(path) if path.is_dir() => self.set_current_path(path),
                Ok(path) => debug!(path = %path.display(), "not a directory"),
                Err(e) => warn!(path = %path.display(), "cannot enter: {e}"),
            }
        }
        self.flags_mut().request_reload();
    }

    pub fn action_mark(&mut self) {
        if let Some(entry) = self.selected_entry_mut() {
            entry.toggle_mark();
            self.flags_mut().request_redraw();
        }
    }

    /// Toggles hidden entries. The reload drops every mark.
    pub fn action_dot(&mut self) {
        let flags = self.flags_mut();
        flags.toggle_hidden();
        flags.request_reload();
    }

    pub fn action_quit(&mut self) {
        self.flags_mut().request_quit();
    }

    /// Prompts for a name and creates a file (`touch`) or directory (`mkdir`).
    pub fn action_touch<C: Console>(&mut self, console: &mut C, dir: bool) -> io::Result<()> {
        let name = read_name(self, console)?;
        self.flags_mut().request_redraw();
        if name.is_empty() {
            return Ok(());
        }

        let launch = Launch::create(&name, dir, self.current_path());
        self.spawn(console, &launch)?;
        self.flags_mut().request_reload();
        Ok(())
    }

    /// Asks for confirmation, then runs `rm -rf` on the cursor entry or on every
    /// marked entry.
    pub fn action_delete<C: Console>(
        &mut self,
        console: &mut C,
        scope: DeleteScope,
    ) -> io::Result<()> {
        if self.snapshot().is_empty() {
            return Ok(());
        }

        let confirmed = confirm(self, console, DELETE_PROMPT)?;
        self.flags_mut().request_redraw();
        if !confirmed {
            return Ok(());
        }

        let cwd = self.current_path();
        let targets: Vec<Launch> = match scope {
            DeleteScope::Selected => self
                .selected_entry()
                .map(|e| Launch::remove(e.name(), cwd))
                .into_iter()
                .collect(),
            DeleteScope::Marked => self
                .snapshot()
                .marked()
                .map(|e| Launch::remove(e.name(), cwd))
                .collect(),
        };

        self.flags_mut().request_reload();
        for launch in &targets {
            self.spawn(console, launch)?;
        }
        Ok(())
    }

    /// Opens the cursor entry with the opener of the first matching association.
    pub fn action_with<C: Console>(
        &mut self,
        console: &mut C,
        shell: &str,
        assocs: &Associations,
    ) -> io::Result<()> {
        let launch = {
            let Some(entry) = self.selected_entry() else {
                return Ok(());
            };
            let name = entry.name_str();
            let Some(opener) = assocs.resolve(&name) else {
                warn!(name = %name, "no association matches");
                return Ok(());
            };
            Launch::open_with(shell, opener, entry.name(), self.current_path())
        };
        self.spawn(console, &launch)
    }

    fn spawn<C: Console>(&mut self, console: &mut C, launch: &Launch) -> io::Result<()> {
        info!(argv = ?launch.argv(), cwd = %launch.cwd().display(), "spawn");
        console.run(launch)?;
        self.flags_mut().request_redraw();
        Ok(())
    }
}
