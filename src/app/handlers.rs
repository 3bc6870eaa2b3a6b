//! Input dispatch for fm.
//!
//! The [Dispatcher] routes one [InputEvent] to the bound action of the session.
//! Resize events re-initialize the console and force a redraw; unbound keys are ignored.

use crate::app::keymap::{Action, InputEvent, Keymap};
use crate::app::state::Session;
use crate::config::Config;
use crate::core::terminal::Console;

use std::io;
use tracing::{debug, trace};

/// Holds the read-only tables every dispatch consults.
pub struct Dispatcher<'a> {
    keymap: Keymap,
    config: &'a Config,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            keymap: Keymap::from_config(config),
            config,
        }
    }

    /// Handles one input event.
    pub fn dispatch<C: Console>(
        &self,
        session: &mut Session,
        console: &mut C,
        event: &InputEvent,
    ) -> io::Result<()> {
        let token = match event {
            InputEvent::Resize => {
                console.reinit()?;
                session.flags_mut().request_redraw();
                return Ok(());
            }
            InputEvent::Key(token) => token,
        };

        let Some(action) = self.keymap.lookup(token) else {
            trace!(key = %token, "unbound key");
            return Ok(());
        };
        debug!(key = %token, ?action, "dispatch");

        match action {
            Action::Step(delta) => session.action_step(delta),
            Action::Nav(target) => session.action_nav(target),
            Action::Mark => session.action_mark(),
            Action::Dot => session.action_dot(),
            Action::Quit => session.action_quit(),
            Action::Touch { dir } => session.action_touch(console, dir)?,
            Action::Delete(scope) => session.action_delete(console, scope)?,
            Action::With => {
                let general = self.config.general();
                session.action_with(console, general.shell(), self.config.assocs())?
            }
        }
        Ok(())
    }
}
