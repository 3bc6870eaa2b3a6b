//! Terminal drawing for fm.
//!
//! - [render]: paints one full frame of the session.
//! - [viewport]: the window of entries that fits on screen.

pub mod render;
pub mod viewport;

pub use render::{CHROME_ROWS, render};
pub use viewport::Viewport;
