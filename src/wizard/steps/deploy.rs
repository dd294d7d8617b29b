//! Deploy step: name, locations and config overrides

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::config_rows::{harvest, ConfigRow, RowPart};
use super::{StepId, WizardStep};
use crate::model::{ConfigCache, SpecError};
use crate::ui::{focus_marker, key_hints, notice_line, FormField};
use crate::wizard::fetch::FetchRequest;
use crate::wizard::notice::Notice;
use crate::wizard::session::WizardSession;

const FAILURE_MESSAGE: &str = "Add at least one location to deploy to";
const UNAVAILABLE_MESSAGE: &str =
    "Required configuration unavailable; go back and forward again to retry";

/// Focusable rows of the deploy form, in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployFocus {
    Name,
    Location(usize),
    Required(usize),
    Config(usize, RowPart),
}

/// Second step of the wizard
pub struct StepDeploy {
    name: FormField,
    /// Rows for the labeled entries of the selected type's schema
    required_rows: Vec<ConfigRow>,
    /// Type the required rows were built for
    required_for: Option<String>,
    config_rows: Vec<ConfigRow>,
    focus: DeployFocus,
    seeded: bool,
    notice: Notice,
}

impl StepDeploy {
    pub fn new(session: &WizardSession) -> Self {
        Self {
            name: FormField::text("application name"),
            required_rows: Vec::new(),
            required_for: None,
            config_rows: Vec::new(),
            focus: DeployFocus::Name,
            seeded: false,
            notice: Notice::new(session.notice_ttl),
        }
    }

    pub fn name_mut(&mut self) -> &mut FormField {
        &mut self.name
    }

    pub fn required_rows(&self) -> &[ConfigRow] {
        &self.required_rows
    }

    pub fn config_rows(&self) -> &[ConfigRow] {
        &self.config_rows
    }

    pub fn config_rows_mut(&mut self) -> &mut Vec<ConfigRow> {
        &mut self.config_rows
    }

    /// Add a location row defaulting to the first catalog location
    pub fn add_location(&mut self, session: &mut WizardSession) -> bool {
        let Some(first) = session.locations.first() else {
            self.notice.show("No locations are available on the server");
            return false;
        };
        let index = session.spec.add_location(first.uri().to_string());
        self.focus = DeployFocus::Location(index);
        true
    }

    pub fn remove_location(&mut self, index: usize, session: &mut WizardSession) -> bool {
        match session.spec.remove_location(index) {
            Ok(uri) => {
                tracing::debug!(index, uri = %uri, "Removed location");
                self.focus = match session.spec.locations.len() {
                    0 => DeployFocus::Name,
                    len => DeployFocus::Location(index.min(len - 1)),
                };
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot remove location");
                false
            }
        }
    }

    /// Point row `index` at catalog location `uri`
    pub fn set_location(
        &mut self,
        index: usize,
        uri: &str,
        session: &mut WizardSession,
    ) -> Result<(), SpecError> {
        session.locations.resolve(uri)?;
        session.spec.set_location(index, uri)
    }

    /// Move row `index` to the next catalog location
    pub fn cycle_location(&mut self, index: usize, session: &mut WizardSession) -> bool {
        let Some(current) = session.spec.locations.get(index) else {
            return false;
        };
        let Some(next) = session.locations.next_after(current).map(|l| l.uri().to_string())
        else {
            return false;
        };
        match self.set_location(index, &next, session) {
            Ok(()) => true,
            Err(e) => {
                self.notice.show(e.to_string());
                false
            }
        }
    }

    pub fn add_config_row(&mut self) {
        self.config_rows.push(ConfigRow::free());
        self.focus = DeployFocus::Config(self.config_rows.len() - 1, RowPart::Key);
    }

    pub fn remove_config_row(&mut self, index: usize) -> bool {
        if index >= self.config_rows.len() {
            return false;
        }
        self.config_rows.remove(index);
        self.focus = DeployFocus::Name;
        true
    }

    fn ensure_default_location(&mut self, session: &mut WizardSession) {
        if session.locations.is_loaded() && session.spec.locations.is_empty() {
            let focus = self.focus;
            self.add_location(session);
            self.focus = focus;
        }
    }

    /// Drop the required rows of a type that is no longer selected. Rows the
    /// user edited stay on as free-form overrides; untouched defaults go.
    fn release_required_rows(&mut self) {
        let Some(old_type) = self.required_for.take() else {
            return;
        };
        let rows = std::mem::take(&mut self.required_rows);
        let total = rows.len();
        self.config_rows.extend(
            rows.into_iter()
                .filter(|row| !row.is_untouched())
                .map(ConfigRow::into_free),
        );
        if matches!(self.focus, DeployFocus::Required(_)) {
            self.focus = DeployFocus::Name;
        }
        tracing::debug!(type_id = %old_type, rows = total, "Required config rows released");
    }

    /// Rebuild the required rows when the cached schema belongs to another
    /// type than the rows on screen
    fn sync_required_rows(&mut self, session: &WizardSession) {
        let (type_id, schema) = match &session.config_cache {
            ConfigCache::Ready { type_id, schema } => (type_id, schema),
            _ => {
                self.release_required_rows();
                return;
            }
        };
        if self.required_for.as_deref() == Some(type_id.as_str()) {
            return;
        }
        self.release_required_rows();

        let mut rows: Vec<ConfigRow> = schema
            .displayed_entries()
            .into_iter()
            .map(ConfigRow::required)
            .collect();
        for row in rows.iter_mut() {
            let key = row.key_text();
            // A value already entered for this key takes precedence
            if let Some(pos) = self.config_rows.iter().position(|r| r.key_text() == key) {
                let existing = self.config_rows.remove(pos);
                row.value = FormField::for_config_value(&existing.value.config_value());
            } else if let Some(value) = session.spec.config.get(&key) {
                row.value = FormField::for_config_value(value);
            }
        }
        tracing::debug!(type_id = %type_id, rows = rows.len(), "Required config rows built");
        self.required_rows = rows;
        self.required_for = Some(type_id.clone());
        self.focus = DeployFocus::Name;
    }

    fn focus_order(&self, session: &WizardSession) -> Vec<DeployFocus> {
        let mut order = vec![DeployFocus::Name];
        order.extend((0..session.spec.locations.len()).map(DeployFocus::Location));
        order.extend((0..self.required_rows.len()).map(DeployFocus::Required));
        for i in 0..self.config_rows.len() {
            order.push(DeployFocus::Config(i, RowPart::Key));
            order.push(DeployFocus::Config(i, RowPart::Value));
        }
        order
    }

    fn move_focus(&mut self, forward: bool, session: &WizardSession) {
        let order = self.focus_order(session);
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn focused_field(&mut self) -> Option<&mut FormField> {
        match self.focus {
            DeployFocus::Name => Some(&mut self.name),
            DeployFocus::Location(_) => None,
            DeployFocus::Required(i) => self.required_rows.get_mut(i).map(|r| &mut r.value),
            DeployFocus::Config(i, RowPart::Key) => self.config_rows.get_mut(i).map(|r| &mut r.key),
            DeployFocus::Config(i, RowPart::Value) => {
                self.config_rows.get_mut(i).map(|r| &mut r.value)
            }
        }
    }

    /// Form lines in render order: name, locations, required config, then
    /// free-form overrides
    pub fn form_lines(&self, session: &WizardSession) -> Vec<Line<'static>> {
        let heading = |text: &str| {
            Line::from(Span::styled(
                text.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ))
        };
        let mut lines = vec![Line::from(vec![
            focus_marker(self.focus == DeployFocus::Name),
            Span::raw("Name: "),
            self.name.span(self.focus == DeployFocus::Name),
        ])];

        lines.push(Line::from(""));
        lines.push(heading("Locations"));
        if !session.locations.is_loaded() {
            lines.push(Line::from(Span::styled(
                "  Loading locations...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, uri) in session.spec.locations.iter().enumerate() {
            let focused = self.focus == DeployFocus::Location(i);
            let label = session
                .locations
                .find(uri)
                .map_or_else(|| uri.clone(), |loc| loc.pretty_name().to_string());
            let style = if focused {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(vec![
                focus_marker(focused),
                Span::styled(format!("< {} >", label), style),
                Span::styled(format!("  {}", uri), Style::default().fg(Color::DarkGray)),
            ]));
        }

        if session.config_cache.is_pending() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Loading required configuration...",
                Style::default().fg(Color::DarkGray),
            )));
        } else if session.config_cache.has_failed() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                UNAVAILABLE_MESSAGE,
                Style::default().fg(Color::Red),
            )));
        }
        if !self.required_rows.is_empty() {
            lines.push(Line::from(""));
            lines.push(heading("Required configuration"));
            for (i, row) in self.required_rows.iter().enumerate() {
                let part = (self.focus == DeployFocus::Required(i)).then_some(RowPart::Value);
                lines.push(row.line(part));
            }
        }

        lines.push(Line::from(""));
        lines.push(heading("Configuration"));
        for (i, row) in self.config_rows.iter().enumerate() {
            let part = match self.focus {
                DeployFocus::Config(j, part) if j == i => Some(part),
                _ => None,
            };
            lines.push(row.line(part));
        }
        lines
    }
}

impl WizardStep for StepDeploy {
    fn id(&self) -> StepId {
        StepId::Deploy
    }

    fn validate(&mut self, session: &mut WizardSession) -> bool {
        session.spec.set_name(&self.name.value());
        let config = harvest(self.required_rows.iter().chain(self.config_rows.iter()));
        session.spec.set_config(config);
        if session.spec.locations.is_empty() {
            self.show_failure();
            return false;
        }
        true
    }

    fn update_for_state(&mut self, session: &mut WizardSession) -> Vec<FetchRequest> {
        if !self.seeded {
            self.name.set_value(&session.spec.name);
            self.config_rows = session
                .spec
                .config
                .iter()
                .map(|(k, v)| ConfigRow::with_value(k, v))
                .collect();
            self.seeded = true;
        }
        self.sync_required_rows(session);

        let mut requests = Vec::new();
        if session.locations.is_loaded() {
            self.ensure_default_location(session);
        } else {
            requests.push(FetchRequest::Locations);
        }
        if let Some(type_id) = session.config_cache.take_request() {
            requests.push(FetchRequest::EntityConfig(type_id));
        }
        requests
    }

    fn on_fetch(&mut self, request: &FetchRequest, session: &mut WizardSession) {
        match request {
            FetchRequest::Locations => self.ensure_default_location(session),
            FetchRequest::EntityConfig(_) => {
                if session.config_cache.has_failed() {
                    self.notice.show(UNAVAILABLE_MESSAGE);
                }
                self.sync_required_rows(session);
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let form = Paragraph::new(self.form_lines(session))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(form, chunks[0]);

        if let Some(message) = self.notice.visible() {
            frame.render_widget(Paragraph::new(notice_line(message)), chunks[1]);
        }
        frame.render_widget(
            Paragraph::new(key_hints(&[
                ("Tab", "next field"),
                ("Ctrl+A", "add location"),
                ("Right", "change location"),
                ("Ctrl+R", "add config"),
                ("Ctrl+D", "remove"),
            ])),
            chunks[2],
        );
    }

    fn handle_key(&mut self, key: KeyEvent, session: &mut WizardSession) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => self.add_location(session),
                KeyCode::Char('r') => {
                    self.add_config_row();
                    true
                }
                KeyCode::Char('d') => match self.focus {
                    DeployFocus::Location(i) => self.remove_location(i, session),
                    DeployFocus::Config(i, _) => self.remove_config_row(i),
                    _ => false,
                },
                _ => false,
            };
        }

        match (key.code, self.focus) {
            (KeyCode::Tab, _) | (KeyCode::Down, _) => {
                self.move_focus(true, session);
                true
            }
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
                self.move_focus(false, session);
                true
            }
            (KeyCode::Right | KeyCode::Enter | KeyCode::Char(' '), DeployFocus::Location(i)) => {
                self.cycle_location(i, session)
            }
            (code, _) => {
                let consumed = self
                    .focused_field()
                    .is_some_and(|field| field.handle_key(code));
                if consumed && self.focus == DeployFocus::Name {
                    session.spec.set_name(&self.name.value());
                }
                consumed
            }
        }
    }

    fn show_failure(&mut self) {
        self.notice.show(FAILURE_MESSAGE);
    }

    fn notice(&self) -> Option<&str> {
        self.notice.visible()
    }

    fn dispose(&mut self) {
        self.required_rows.clear();
        self.config_rows.clear();
        self.required_for = None;
        self.seeded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ConfigEntry, ConfigSchema, ConfigValue, Location, LocationCatalog, LocationLinks,
    };
    use ratatui::{backend::TestBackend, Terminal};

    const WEB_CLUSTER: &str = "brooklyn.demo.WebClusterDatabaseExample";

    fn location(uri: &str, spec: &str) -> Location {
        Location {
            id: None,
            name: None,
            spec: Some(spec.to_string()),
            links: LocationLinks {
                self_link: uri.to_string(),
            },
        }
    }

    fn session_with_locations() -> WizardSession {
        WizardSession {
            locations: LocationCatalog::from_locations(vec![
                location("/v1/locations/0", "localhost"),
                location("/v1/locations/1", "aws-ec2:us-east-1"),
            ]),
            ..WizardSession::default()
        }
    }

    fn entry(name: &str, priority: f64) -> ConfigEntry {
        ConfigEntry {
            name: name.to_string(),
            value_type: Some("java.lang.String".to_string()),
            label: Some(name.to_uppercase()),
            priority,
            description: None,
            default_value: None,
        }
    }

    #[test]
    fn test_requests_locations_until_loaded() {
        let mut session = WizardSession::default();
        let mut step = StepDeploy::new(&session);

        let requests = step.update_for_state(&mut session);
        assert_eq!(requests, vec![FetchRequest::Locations]);
        assert!(session.spec.locations.is_empty());

        session.locations.load(vec![location("/v1/locations/0", "localhost")]);
        step.on_fetch(&FetchRequest::Locations, &mut session);
        assert_eq!(session.spec.locations, vec!["/v1/locations/0"]);
    }

    #[test]
    fn test_default_location_added_on_entry() {
        let mut session = session_with_locations();
        let mut step = StepDeploy::new(&session);

        let requests = step.update_for_state(&mut session);
        assert!(requests.is_empty());
        assert_eq!(session.spec.locations, vec!["/v1/locations/0"]);
    }

    #[test]
    fn test_add_location_fails_on_empty_catalog() {
        let mut session = WizardSession {
            locations: LocationCatalog::from_locations(Vec::new()),
            ..WizardSession::default()
        };
        let mut step = StepDeploy::new(&session);

        assert!(!step.add_location(&mut session));
        assert!(session.spec.locations.is_empty());
        assert!(step.notice().is_some());
    }

    #[test]
    fn test_validate_requires_a_location() {
        let mut session = session_with_locations();
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);

        assert!(step.remove_location(0, &mut session));
        assert!(!step.validate(&mut session));
        assert!(step.notice().is_some());

        assert!(step.add_location(&mut session));
        assert!(step.validate(&mut session));
    }

    #[test]
    fn test_set_location_rejects_unknown_uri() {
        let mut session = session_with_locations();
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);

        let err = step
            .set_location(0, "/v1/locations/99", &mut session)
            .unwrap_err();
        assert_eq!(err, SpecError::UnknownLocation("/v1/locations/99".to_string()));

        assert!(step.cycle_location(0, &mut session));
        assert_eq!(session.spec.locations, vec!["/v1/locations/1"]);
    }

    #[test]
    fn test_validate_harvests_config_rows() {
        let mut session = session_with_locations();
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);
        step.name_mut().set_value("my-app");

        step.add_config_row();
        step.config_rows_mut()[0].key.set_value("http.port");
        step.config_rows_mut()[0].value.set_value("8080");
        step.add_config_row();
        step.config_rows_mut()[1].value.set_value("no key");
        step.config_rows_mut().push(ConfigRow::with_value("debug", &ConfigValue::Flag(true)));

        assert!(step.validate(&mut session));
        assert_eq!(session.spec.name, "my-app");
        assert_eq!(session.spec.config.len(), 2);
        assert_eq!(session.spec.config["http.port"], ConfigValue::from("8080"));
        assert_eq!(session.spec.config["debug"], ConfigValue::Flag(true));
    }

    #[test]
    fn test_requests_required_config_once() {
        let mut session = session_with_locations();
        session.config_cache.mark_pending("brooklyn.demo.WebClusterDatabaseExample");
        let mut step = StepDeploy::new(&session);

        let requests = step.update_for_state(&mut session);
        assert_eq!(
            requests,
            vec![FetchRequest::EntityConfig(
                "brooklyn.demo.WebClusterDatabaseExample".to_string()
            )]
        );
        assert!(step.update_for_state(&mut session).is_empty());
    }

    #[test]
    fn test_required_rows_follow_priority_order() {
        let mut session = session_with_locations();
        let type_id = "brooklyn.demo.WebClusterDatabaseExample";
        session.config_cache.fill(
            type_id,
            ConfigSchema {
                config: vec![entry("a", 5.0), entry("b", 3.0), entry("c", 5.0)],
            },
        );
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);

        let keys: Vec<String> = step.required_rows().iter().map(|r| r.key_text()).collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_required_row_takes_existing_override() {
        let mut session = session_with_locations();
        session
            .spec
            .config
            .insert("a".to_string(), ConfigValue::from("kept"));
        session.config_cache.mark_pending("app");
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);
        assert_eq!(step.config_rows().len(), 1);

        session.config_cache.fill(
            "app",
            ConfigSchema {
                config: vec![entry("a", 1.0)],
            },
        );
        step.on_fetch(&FetchRequest::EntityConfig("app".to_string()), &mut session);

        assert!(step.config_rows().is_empty());
        assert_eq!(step.required_rows()[0].value.value(), "kept");
    }

    fn screen_text(step: &mut StepDeploy, session: &WizardSession) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                step.render(f, area, session);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn defaulted(name: &str, default: &str) -> ConfigEntry {
        ConfigEntry {
            default_value: Some(serde_json::Value::String(default.to_string())),
            ..entry(name, 1.0)
        }
    }

    #[test]
    fn test_cleared_cache_drops_untouched_required_rows() {
        let mut session = session_with_locations();
        session.config_cache.fill(
            WEB_CLUSTER,
            ConfigSchema {
                config: vec![defaulted("wars.root", "hello.war"), defaulted("http.port", "8080")],
            },
        );
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);
        assert_eq!(step.required_rows().len(), 2);

        let port = step
            .required_rows
            .iter_mut()
            .find(|r| r.key_text() == "http.port")
            .unwrap();
        port.value.set_value("9090");

        // Switching to entities mode leaves no type selected
        session.config_cache.clear();
        step.update_for_state(&mut session);
        assert!(step.required_rows().is_empty());
        assert_eq!(step.config_rows().len(), 1);
        assert!(step.config_rows()[0].label.is_none());

        assert!(step.validate(&mut session));
        assert_eq!(session.spec.config.len(), 1);
        assert_eq!(session.spec.config["http.port"], ConfigValue::from("9090"));
        assert!(!session.spec.config.contains_key("wars.root"));
    }

    #[test]
    fn test_new_type_replaces_required_rows() {
        let mut session = session_with_locations();
        session.config_cache.fill(
            WEB_CLUSTER,
            ConfigSchema {
                config: vec![defaulted("wars.root", "hello.war")],
            },
        );
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);

        session.config_cache.fill(
            "brooklyn.demo.NodeJsTodoApplication",
            ConfigSchema {
                config: vec![defaulted("app.git", "todo.git")],
            },
        );
        step.on_fetch(
            &FetchRequest::EntityConfig("brooklyn.demo.NodeJsTodoApplication".to_string()),
            &mut session,
        );

        let keys: Vec<String> = step.required_rows().iter().map(|r| r.key_text()).collect();
        assert_eq!(keys, vec!["app.git"]);
        assert!(step.config_rows().is_empty());
        assert!(step.validate(&mut session));
        assert!(!session.spec.config.contains_key("wars.root"));
    }

    #[test]
    fn test_failed_config_fetch_is_reported_and_retried() {
        let mut session = session_with_locations();
        session.config_cache.mark_pending(WEB_CLUSTER);
        let mut step = StepDeploy::new(&session);
        let requests = step.update_for_state(&mut session);
        assert_eq!(requests, vec![FetchRequest::EntityConfig(WEB_CLUSTER.to_string())]);

        session.config_cache.fetch_failed(WEB_CLUSTER);
        step.on_fetch(&FetchRequest::EntityConfig(WEB_CLUSTER.to_string()), &mut session);
        assert_eq!(step.notice(), Some(UNAVAILABLE_MESSAGE));
        let text = screen_text(&mut step, &session);
        assert!(text.contains("Required configuration unavailable"));
        assert!(!text.contains("Loading required configuration"));

        // Entering the step again asks once more
        let requests = step.update_for_state(&mut session);
        assert_eq!(requests, vec![FetchRequest::EntityConfig(WEB_CLUSTER.to_string())]);
        assert!(session.config_cache.is_pending());
    }

    #[test]
    fn test_render_follows_config_cache_state() {
        let mut session = session_with_locations();
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);

        let text = screen_text(&mut step, &session);
        assert!(text.contains("localhost"));
        assert!(!text.contains("Loading required configuration"));
        assert!(!text.contains("Required configuration"));

        session.config_cache.mark_pending(WEB_CLUSTER);
        let text = screen_text(&mut step, &session);
        assert!(text.contains("Loading required configuration..."));
        assert!(!text.contains("Required configuration"));

        session.config_cache.fill(
            WEB_CLUSTER,
            ConfigSchema {
                config: vec![defaulted("wars.root", "hello.war")],
            },
        );
        step.on_fetch(&FetchRequest::EntityConfig(WEB_CLUSTER.to_string()), &mut session);
        let text = screen_text(&mut step, &session);
        assert!(!text.contains("Loading required configuration"));
        assert!(text.contains("Required configuration"));
        assert!(text.contains("WARS.ROOT: "));
        assert!(text.contains("hello.war"));
    }

    #[test]
    fn test_name_typing_updates_spec() {
        let mut session = session_with_locations();
        let mut step = StepDeploy::new(&session);
        step.update_for_state(&mut session);

        for c in "web".chars() {
            step.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), &mut session);
        }
        assert_eq!(session.spec.name, "web");
    }
}
