//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the console. One frame is
//! the header with the current path, the window of entries chosen by [Viewport],
//! and a footer with either the status message or the cursor entry's details.
//!
//! This module should stay "pure rendering": it reads the session and theme and
//! produces widgets, without owning fm core logic.

use crate::app::state::Session;
use crate::config::Theme;
use crate::core::{Entry, sanitize_to_exact_width};
use crate::ui::viewport::Viewport;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Rows taken by everything but the entry window.
pub const CHROME_ROWS: u16 = 4;

/// Render function which renders the entire terminal UI for fm on each frame.
pub fn render(frame: &mut Frame, session: &Session, theme: &Theme) {
    let area = frame.area();
    let snapshot = session.snapshot();
    let cursor = session.cursor();

    let rows = area.height.saturating_sub(CHROME_ROWS) as usize;
    let view = match cursor {
        Some(cur) => Viewport::compute(snapshot.len(), cur, rows),
        None => Viewport::default(),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(view.len() as u16),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    // Header
    let path = session.current_path().to_string_lossy();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(path, theme.path_style()))),
        chunks[0],
    );

    // Entries
    let width = snapshot.max_name_width().min(area.width as usize);
    let lines: Vec<Line> = view
        .range()
        .filter_map(|idx| snapshot.get(idx).map(|e| (idx, e)))
        .map(|(idx, entry)| entry_line(entry, width, Some(idx) == cursor, theme))
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    // Footer
    let footer = if !session.status().is_empty() {
        Some(session.status().to_string())
    } else {
        session.selected_entry().map(entry_details)
    };
    if let Some(text) = footer {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, theme.status_style()))),
            chunks[2],
        );
    }
}

/// `* name   ` with the name padded to `width` columns and two trailing spaces.
fn entry_line(entry: &Entry, width: usize, selected: bool, theme: &Theme) -> Line<'static> {
    let mut style: Style = if entry.is_dir() {
        theme.directory_style()
    } else {
        theme.entry_style()
    };
    if selected {
        style = theme.selection_style(style);
    }

    let mark = if entry.is_marked() { "*" } else { " " };
    let name = sanitize_to_exact_width(&entry.name_str(), width);

    Line::from(vec![
        Span::styled(mark, style.patch(theme.marker_style())),
        Span::styled(format!(" {name}  "), style),
    ])
}

/// `owner:group size permissions`
pub fn entry_details(entry: &Entry) -> String {
    format!(
        "{}:{} {} {}",
        entry.owner(),
        entry.group(),
        entry.size(),
        entry.permissions()
    )
}
