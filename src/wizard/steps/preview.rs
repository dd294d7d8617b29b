//! Preview step: show the exact body that will be submitted

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{StepId, WizardStep};
use crate::model::ApplicationSpec;
use crate::ui::{key_hints, notice_line};
use crate::wizard::fetch::FetchRequest;
use crate::wizard::notice::Notice;
use crate::wizard::session::WizardSession;

/// Write the canonical JSON of `spec` to `path`
pub fn export_spec(spec: &ApplicationSpec, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut body = spec.to_pretty_json();
    body.push('\n');
    fs::write(path, body).with_context(|| format!("Failed to write spec to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Exported application spec");
    Ok(())
}

/// Last step of the wizard
pub struct StepPreview {
    text: String,
    scroll: u16,
    notice: Notice,
}

impl StepPreview {
    pub fn new(session: &WizardSession) -> Self {
        Self {
            text: String::new(),
            scroll: 0,
            notice: Notice::new(session.notice_ttl),
        }
    }

    /// The JSON shown to the user
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl WizardStep for StepPreview {
    fn id(&self) -> StepId {
        StepId::Preview
    }

    fn validate(&mut self, session: &mut WizardSession) -> bool {
        match session.spec.check_deployable() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Spec cannot be submitted");
                self.show_failure();
                false
            }
        }
    }

    fn update_for_state(&mut self, session: &mut WizardSession) -> Vec<FetchRequest> {
        self.text = session.spec.to_pretty_json();
        self.scroll = 0;
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _session: &WizardSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let max_scroll = (self.text.lines().count() as u16).saturating_sub(1);
        self.scroll = self.scroll.min(max_scroll);

        let body = Paragraph::new(self.text.as_str())
            .style(Style::default().fg(Color::Green))
            .block(Block::default().borders(Borders::ALL).title(" JSON "))
            .scroll((self.scroll, 0));
        frame.render_widget(body, chunks[0]);

        if let Some(message) = self.notice.visible() {
            frame.render_widget(Paragraph::new(notice_line(message)), chunks[1]);
        }
        frame.render_widget(
            Paragraph::new(key_hints(&[("Up/Down", "scroll"), ("PgUp/PgDn", "page")])),
            chunks[2],
        );
    }

    fn handle_key(&mut self, key: KeyEvent, _session: &mut WizardSession) -> bool {
        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                true
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                true
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                true
            }
            KeyCode::Home => {
                self.scroll = 0;
                true
            }
            _ => false,
        }
    }

    fn show_failure(&mut self) {
        self.notice
            .show("The application needs a definition and at least one location");
    }

    fn notice(&self) -> Option<&str> {
        self.notice.visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityRef;
    use tempfile::TempDir;

    fn deployable_session() -> WizardSession {
        let mut session = WizardSession::default();
        session.spec.set_name("todo");
        session
            .spec
            .select_type("brooklyn.demo.NodeJsTodoApplication");
        session.spec.add_location("/v1/locations/0");
        session
    }

    #[test]
    fn test_preview_shows_canonical_json() {
        let mut session = deployable_session();
        let mut step = StepPreview::new(&session);
        step.update_for_state(&mut session);

        let parsed: serde_json::Value = serde_json::from_str(step.text()).unwrap();
        assert_eq!(parsed, session.spec.to_canonical_json());
        assert!(!step.text().contains("entities"));
    }

    #[test]
    fn test_validate_checks_definition_and_locations() {
        let mut session = deployable_session();
        let mut step = StepPreview::new(&session);
        assert!(step.validate(&mut session));

        session.spec.locations.clear();
        assert!(!step.validate(&mut session));

        session.spec.add_location("/v1/locations/0");
        session.spec.clear_type();
        assert!(!step.validate(&mut session));

        session.spec.add_entity(EntityRef::default());
        assert!(step.validate(&mut session));
    }

    #[test]
    fn test_export_writes_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("app.json");
        let session = deployable_session();

        export_spec(&session.spec, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["name"], "todo");
        assert_eq!(parsed["locations"][0], "/v1/locations/0");
    }
}
