//! Editable key/value config rows shared by the create and deploy steps

use std::collections::BTreeMap;

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::model::{ConfigEntry, ConfigValue};
use crate::ui::{focus_marker, FormField};

/// Which half of a row has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPart {
    Key,
    Value,
}

/// One config override row
#[derive(Debug, Clone)]
pub struct ConfigRow {
    pub key: FormField,
    pub value: FormField,
    /// Label of a required-config entry; free-form rows have none
    pub label: Option<String>,
    pub description: Option<String>,
    /// Schema default a required row was seeded with
    pub default: Option<ConfigValue>,
}

impl ConfigRow {
    /// Empty free-form row
    pub fn free() -> Self {
        Self {
            key: FormField::text("key"),
            value: FormField::text("value"),
            label: None,
            description: None,
            default: None,
        }
    }

    /// Free-form row holding an existing override
    pub fn with_value(key: &str, value: &ConfigValue) -> Self {
        Self {
            key: FormField::text_with(key, "key"),
            value: FormField::for_config_value(value),
            label: None,
            description: None,
            default: None,
        }
    }

    /// Row for a required-config entry, seeded with its default
    pub fn required(entry: &ConfigEntry) -> Self {
        let value = if entry.is_boolean() {
            FormField::toggle(entry.default_flag())
        } else {
            FormField::text_with(&entry.default_text(), "value")
        };
        Self {
            key: FormField::text_with(&entry.name, "key"),
            default: Some(value.config_value()),
            value,
            label: entry.label.clone(),
            description: entry.description.clone(),
        }
    }

    /// Whether this is a required row still holding its schema default
    pub fn is_untouched(&self) -> bool {
        self.default.as_ref() == Some(&self.value.config_value())
    }

    /// Turn a required row into a plain override row
    pub fn into_free(mut self) -> Self {
        self.label = None;
        self.description = None;
        self.default = None;
        self
    }

    pub fn key_text(&self) -> String {
        self.key.value().trim().to_string()
    }

    /// Render as `key = value`, or `Label: value` for required rows
    pub fn line(&self, focus: Option<RowPart>) -> Line<'static> {
        let mut spans = vec![focus_marker(focus.is_some())];
        match &self.label {
            Some(label) => {
                spans.push(Span::styled(
                    format!("{}: ", label),
                    Style::default().fg(Color::Cyan),
                ));
            }
            None => {
                spans.push(self.key.span(focus == Some(RowPart::Key)));
                spans.push(Span::raw(" = "));
            }
        }
        spans.push(self.value.span(focus == Some(RowPart::Value)));
        if let Some(description) = &self.description {
            spans.push(Span::styled(
                format!("  {}", description),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }
}

/// Collect rows into overrides. Blank keys are skipped; a later row with
/// the same key replaces an earlier one.
pub fn harvest<'a>(rows: impl IntoIterator<Item = &'a ConfigRow>) -> BTreeMap<String, ConfigValue> {
    let mut map = BTreeMap::new();
    for row in rows {
        let key = row.key_text();
        if key.is_empty() {
            continue;
        }
        map.insert(key, row.value.config_value());
    }
    map
}

/// Collect rows into plain string config, as entities carry it
pub fn harvest_text<'a>(rows: impl IntoIterator<Item = &'a ConfigRow>) -> BTreeMap<String, String> {
    harvest(rows)
        .into_iter()
        .map(|(k, v)| (k, v.as_display()))
        .collect()
}
