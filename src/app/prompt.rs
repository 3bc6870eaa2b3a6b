//! Inline prompts drawn in the status line.
//!
//! Both prompts are modal: they render, block on the console for input and return
//! before the main loop sees another event.

use crate::app::keymap::InputEvent;
use crate::app::state::Session;
use crate::core::terminal::Console;

use std::io;

/// Longest name the create prompt accepts.
pub const MAX_NAME_INPUT: usize = 99;

pub const NAME_PROMPT: &str = "NAME: ";
pub const DELETE_PROMPT: &str = "delete? (Y/n)";

/// Reads a name in the status line.
///
/// Printable keys append, backspace keys remove the last character and a newline
/// confirms. Any other key (or a resize) cancels and yields an empty string.
pub fn read_name<C: Console>(session: &mut Session, console: &mut C) -> io::Result<String> {
    let mut buf = String::new();

    loop {
        session.set_status(format!("{NAME_PROMPT}{buf}"));
        console.render(session)?;

        let token = match console.next_event()? {
            InputEvent::Key(token) => token,
            InputEvent::Resize => return Ok(String::new()),
        };

        if token.is_newline() {
            return Ok(buf);
        }
        if token.is_backspace() {
            buf.pop();
            continue;
        }
        match token.printable() {
            Some(c) => {
                if buf.chars().count() < MAX_NAME_INPUT {
                    buf.push(c);
                }
            }
            None => return Ok(String::new()),
        }
    }
}

/// Shows `question` and reads a single key. Only an uppercase `Y` confirms.
pub fn confirm<C: Console>(
    session: &mut Session,
    console: &mut C,
    question: &str,
) -> io::Result<bool> {
    session.set_status(question);
    console.render(session)?;

    Ok(matches!(console.next_event()?, InputEvent::Key(token) if token.as_str() == "Y"))
}
