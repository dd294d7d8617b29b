//! Reusable form field widgets for the wizard steps

use crossterm::event::KeyCode;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use crate::model::ConfigValue;

/// A form field widget that can handle different input types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// Single-line text input; `cursor_pos` counts chars, not bytes
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
    },
    /// Boolean toggle
    Toggle { value: bool },
}

impl FormField {
    /// Empty text input showing `placeholder` until typed into
    pub fn text(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
        }
    }

    /// Text input pre-filled with `value`
    pub fn text_with(value: &str, placeholder: &str) -> Self {
        FormField::TextInput {
            value: value.to_string(),
            cursor_pos: value.chars().count(),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn toggle(value: bool) -> Self {
        FormField::Toggle { value }
    }

    /// Field for an existing config value, toggle for booleans
    pub fn for_config_value(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Flag(flag) => FormField::toggle(*flag),
            ConfigValue::Text(text) => FormField::text_with(text, "value"),
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::Toggle { value } => value.to_string(),
        }
    }

    /// Get the current value as a config override
    pub fn config_value(&self) -> ConfigValue {
        match self {
            FormField::TextInput { value, .. } => ConfigValue::Text(value.clone()),
            FormField::Toggle { value } => ConfigValue::Flag(*value),
        }
    }

    /// Set the value from a string
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::Toggle { value } => {
                *value = new_value == "true" || new_value == "yes";
            }
        }
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => match key {
                KeyCode::Char(c) => {
                    let at = byte_index(value, *cursor_pos);
                    value.insert(at, c);
                    *cursor_pos += 1;
                    true
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        let at = byte_index(value, *cursor_pos);
                        value.remove(at);
                    }
                    true
                }
                KeyCode::Delete => {
                    if *cursor_pos < value.chars().count() {
                        let at = byte_index(value, *cursor_pos);
                        value.remove(at);
                    }
                    true
                }
                KeyCode::Left => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                    }
                    true
                }
                KeyCode::Right => {
                    if *cursor_pos < value.chars().count() {
                        *cursor_pos += 1;
                    }
                    true
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    true
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    true
                }
                _ => false,
            },
            FormField::Toggle { value } => match key {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    *value = !*value;
                    true
                }
                KeyCode::Left => {
                    *value = false;
                    true
                }
                KeyCode::Right => {
                    *value = true;
                    true
                }
                _ => false,
            },
        }
    }

    /// Render the field as an inline span
    pub fn span(&self, focused: bool) -> Span<'static> {
        let style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
            } => {
                if value.is_empty() && !focused {
                    return Span::styled(
                        format!("<{}>", placeholder),
                        Style::default().fg(Color::DarkGray),
                    );
                }
                let mut text = value.clone();
                if focused {
                    text.insert(byte_index(&text, *cursor_pos), '|');
                }
                Span::styled(text, style)
            }
            FormField::Toggle { value } => {
                let label = if *value { "[x] yes" } else { "[ ] no" };
                Span::styled(label.to_string(), style)
            }
        }
    }
}

/// Byte offset of the `char_pos`-th char, or the string length
fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
