//! Shared terminal UI pieces used by the wizard steps

pub mod form_field;
pub mod terminal_guard;

pub use form_field::FormField;
pub use terminal_guard::{install_panic_hook, TerminalGuard};

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Line for a transient validation notice
pub fn notice_line(message: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "! ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(message.to_string(), Style::default().fg(Color::Yellow)),
    ])
}

/// Key hint footer, e.g. `[("Ctrl+A", "add"), ("Ctrl+D", "remove")]`
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(
            (*key).to_string(),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw(format!(" {}  ", action)));
    }
    Line::from(spans)
}

/// Marker prefix for the focused row of a list
pub fn focus_marker(focused: bool) -> Span<'static> {
    if focused {
        Span::styled("> ", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("  ")
    }
}
