//! Terminal rendering and event loop for fm.
//!
//! Handles setup/teardown of raw mode, alternate screen, redraws,
//! and events (keypress, resize) to app logic.
//!
//! Everything the loop needs from the terminal goes through the [Console] trait, so the
//! state machine can be driven by a scripted console in tests.

use crate::app::handlers::Dispatcher;
use crate::app::keymap::{InputEvent, KeyToken};
use crate::app::state::Session;
use crate::config::Theme;
use crate::core::proc::{Launch, run_foreground};
use crate::ui;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use tracing::{debug, warn};

/// The terminal as seen by the event loop and the actions.
pub trait Console {
    /// Full redraw of the session.
    fn render(&mut self, session: &Session) -> io::Result<()>;

    /// Blocks until the next key or resize event.
    fn next_event(&mut self) -> io::Result<InputEvent>;

    /// Re-initializes the screen after a resize.
    fn reinit(&mut self) -> io::Result<()>;

    /// Suspends interactive mode, runs `launch` to completion and restores the screen.
    ///
    /// A failure to start the program is logged, not returned: the terminal is
    /// restored either way.
    fn run(&mut self, launch: &Launch) -> io::Result<()>;
}

/// [Console] over the real terminal: crossterm input, ratatui output.
pub struct TerminalConsole<'a> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: &'a Theme,
}

impl<'a> TerminalConsole<'a> {
    /// Enters raw mode and the alternate screen.
    pub fn new(theme: &'a Theme) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal, theme })
    }

    /// Leaves raw mode and the alternate screen.
    pub fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen, Hide)?;
        self.terminal.clear()?;
        Ok(())
    }
}

impl Console for TerminalConsole<'_> {
    fn render(&mut self, session: &Session) -> io::Result<()> {
        let theme = self.theme;
        self.terminal.draw(|f| ui::render(f, session, theme))?;
        Ok(())
    }

    fn next_event(&mut self) -> io::Result<InputEvent> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(token) = KeyToken::from_key_event(&key) {
                        return Ok(InputEvent::Key(token));
                    }
                    debug!(?key, "key without token ignored");
                }
                Event::Resize(_, _) => return Ok(InputEvent::Resize),
                _ => {}
            }
        }
    }

    fn reinit(&mut self) -> io::Result<()> {
        self.terminal.clear()?;
        Ok(())
    }

    fn run(&mut self, launch: &Launch) -> io::Result<()> {
        suspended(
            self,
            |console| console.restore(),
            |_| match run_foreground(launch) {
                Ok(status) => debug!(argv = ?launch.argv(), %status, "child exited"),
                Err(e) => warn!(argv = ?launch.argv(), "failed to run: {e}"),
            },
            |console| console.resume(),
        )
    }
}

/// Runs `child` between `leave` and `enter`.
///
/// A failing `leave` is logged and the child still runs. `enter` always runs and its
/// result is returned.
fn suspended<T>(
    target: &mut T,
    leave: impl FnOnce(&mut T) -> io::Result<()>,
    child: impl FnOnce(&mut T),
    enter: impl FnOnce(&mut T) -> io::Result<()>,
) -> io::Result<()> {
    if let Err(e) = leave(target) {
        warn!("could not leave interactive mode: {e}");
    }
    child(target);
    enter(target)
}

/// Initializes the terminal in raw mode and alternate sceen and runs the main event loop.
///
/// Blocks until quit. Handles all input and UI rendering.
///
/// Returns an std::io::Error if terminal setup or teardown fails.
pub fn run_terminal(
    session: &mut Session,
    dispatcher: &Dispatcher,
    theme: &Theme,
) -> io::Result<()> {
    let mut console = TerminalConsole::new(theme)?;
    let result = event_loop(session, dispatcher, &mut console);
    console.restore()?;
    result
}

/// Main event loop of fm: reloads and draws as the flags request, then blocks for one
/// event and dispatches it.
/// Returns on quit, without flushing another frame.
pub fn event_loop<C: Console>(
    session: &mut Session,
    dispatcher: &Dispatcher,
    console: &mut C,
) -> io::Result<()> {
    loop {
        session.clear_status();

        if session.flags().needs_reload() {
            session.reload();
        }

        if session.flags().needs_redraw() {
            console.render(session)?;
            session.flags_mut().clear_redraw();
        }

        let event = console.next_event()?;
        dispatcher.dispatch(session, console, &event)?;

        if session.flags().needs_quit() {
            debug!("quit requested");
            return Ok(());
        }
    }
}
