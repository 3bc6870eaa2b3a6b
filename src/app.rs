//! Application logic for fm.
//!
//! - [state]: the [Session] and its control flags.
//! - [keymap]: key tokens, the [Action] enum and the binding table.
//! - [handlers]: the [Dispatcher] routing input events to actions.
//! - [actions]: the action methods of [Session].
//! - [prompt]: the inline name and confirmation prompts.

pub mod actions;
pub mod handlers;
pub mod keymap;
pub mod prompt;
pub mod state;

pub use handlers::Dispatcher;
pub use keymap::{Action, DeleteScope, InputEvent, KeyToken, Keymap, NavTarget};
pub use state::{ControlFlags, Session};
