//! Create step: define the application by entities, template or class

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::config_rows::{harvest_text, ConfigRow, RowPart};
use super::{StepId, WizardStep};
use crate::model::{CatalogItem, EntityRef};
use crate::ui::{focus_marker, key_hints, notice_line, FormField};
use crate::wizard::fetch::FetchRequest;
use crate::wizard::notice::Notice;
use crate::wizard::session::WizardSession;

const FAILURE_MESSAGE: &str =
    "Define the application first: save at least one entity, or pick a known template or class";

/// Ways of defining the application, one per tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTab {
    Entities,
    Template,
    AppClass,
    Yaml,
}

impl CreateTab {
    pub fn all() -> &'static [CreateTab] {
        &[
            CreateTab::Entities,
            CreateTab::Template,
            CreateTab::AppClass,
            CreateTab::Yaml,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CreateTab::Entities => "Entities",
            CreateTab::Template => "Template",
            CreateTab::AppClass => "App Class",
            CreateTab::Yaml => "YAML",
        }
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        match self {
            CreateTab::Entities => CreateTab::Template,
            CreateTab::Template => CreateTab::AppClass,
            CreateTab::AppClass => CreateTab::Yaml,
            CreateTab::Yaml => CreateTab::Entities,
        }
    }
}

/// Focused field inside an entity editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityFocus {
    Name,
    Type,
    Config(usize, RowPart),
}

/// Editor for one entity; position `i` in the list edits `spec.entities[i]`
#[derive(Debug, Clone)]
pub struct EntityEditor {
    pub name: FormField,
    pub entity_type: FormField,
    pub config: Vec<ConfigRow>,
    /// Collapsed editors show a one-line summary
    pub expanded: bool,
    notice: Notice,
}

impl EntityEditor {
    fn new(notice: Notice) -> Self {
        Self {
            name: FormField::text("name"),
            entity_type: FormField::text("type"),
            config: Vec::new(),
            expanded: true,
            notice,
        }
    }

    fn from_entity(entity: &EntityRef, notice: Notice) -> Self {
        Self {
            name: FormField::text_with(&entity.name, "name"),
            entity_type: FormField::text_with(&entity.entity_type, "type"),
            config: entity
                .config
                .iter()
                .map(|(k, v)| ConfigRow::with_value(k, &v.as_str().into()))
                .collect(),
            expanded: entity.entity_type.is_empty(),
            notice,
        }
    }

    /// Entity as currently typed into the editor
    pub fn read(&self) -> EntityRef {
        EntityRef {
            name: self.name.value().trim().to_string(),
            entity_type: self.entity_type.value().trim().to_string(),
            config: harvest_text(&self.config),
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.visible()
    }

    fn focus_order(&self) -> Vec<EntityFocus> {
        let mut order = vec![EntityFocus::Name, EntityFocus::Type];
        for i in 0..self.config.len() {
            order.push(EntityFocus::Config(i, RowPart::Key));
            order.push(EntityFocus::Config(i, RowPart::Value));
        }
        order
    }

    fn field_mut(&mut self, focus: EntityFocus) -> Option<&mut FormField> {
        match focus {
            EntityFocus::Name => Some(&mut self.name),
            EntityFocus::Type => Some(&mut self.entity_type),
            EntityFocus::Config(i, RowPart::Key) => self.config.get_mut(i).map(|r| &mut r.key),
            EntityFocus::Config(i, RowPart::Value) => {
                self.config.get_mut(i).map(|r| &mut r.value)
            }
        }
    }

    fn lines(&self, selected: bool, focus: Option<EntityFocus>) -> Vec<Line<'static>> {
        let summary = self.read();
        let header_style = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let mut lines = vec![Line::from(vec![
            focus_marker(selected),
            Span::styled(summary.display_name().to_string(), header_style),
            Span::styled(
                if self.expanded { "" } else { "  (saved)" }.to_string(),
                Style::default().fg(Color::Green),
            ),
        ])];
        if !self.expanded {
            return lines;
        }

        let field_focus = |f: EntityFocus| selected && focus == Some(f);
        lines.push(Line::from(vec![
            Span::raw("    Name: "),
            self.name.span(field_focus(EntityFocus::Name)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    Type: "),
            self.entity_type.span(field_focus(EntityFocus::Type)),
        ]));
        for (i, row) in self.config.iter().enumerate() {
            let part = match focus {
                Some(EntityFocus::Config(j, part)) if selected && j == i => Some(part),
                _ => None,
            };
            let mut line = row.line(part);
            line.spans.insert(0, Span::raw("    "));
            lines.push(line);
        }
        if let Some(message) = self.notice() {
            let mut line = notice_line(message);
            line.spans.insert(0, Span::raw("    "));
            lines.push(line);
        }
        lines
    }
}

/// First step of the wizard
pub struct StepCreate {
    tab: CreateTab,
    editors: Vec<EntityEditor>,
    selected_editor: usize,
    entity_focus: EntityFocus,
    /// Template tile currently selected (toggled with Enter)
    selected_template: Option<String>,
    template_filter: FormField,
    template_state: ListState,
    class_input: FormField,
    notice: Notice,
    template_notice: Notice,
    class_notice: Notice,
}

impl StepCreate {
    /// Build the step and give the spec its first, empty entity
    pub fn new(session: &mut WizardSession) -> Self {
        let notice = Notice::new(session.notice_ttl);
        let mut step = Self {
            tab: CreateTab::Entities,
            editors: Vec::new(),
            selected_editor: 0,
            entity_focus: EntityFocus::Name,
            selected_template: None,
            template_filter: FormField::text("filter"),
            template_state: ListState::default(),
            class_input: FormField::text("fully qualified class name"),
            notice: notice.clone(),
            template_notice: notice.clone(),
            class_notice: notice,
        };
        step.add_entry(session);
        step
    }

    pub fn tab(&self) -> CreateTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: CreateTab) {
        self.tab = tab;
    }

    pub fn editors(&self) -> &[EntityEditor] {
        &self.editors
    }

    pub fn editor_mut(&mut self, index: usize) -> Option<&mut EntityEditor> {
        self.editors.get_mut(index)
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.selected_template.as_deref()
    }

    pub fn class_input_mut(&mut self) -> &mut FormField {
        &mut self.class_input
    }

    pub fn template_filter_mut(&mut self) -> &mut FormField {
        &mut self.template_filter
    }

    /// Append an empty entity and its editor, returning the new index
    pub fn add_entry(&mut self, session: &mut WizardSession) -> usize {
        let index = session.spec.add_entity(EntityRef::default());
        self.editors
            .push(EntityEditor::new(Notice::new(session.notice_ttl)));
        self.selected_editor = index;
        self.entity_focus = EntityFocus::Name;
        index
    }

    /// Remove entity `index` and its editor; later editors shift down so
    /// that editor `i` keeps editing `spec.entities[i]`
    pub fn remove_entry(&mut self, index: usize, session: &mut WizardSession) -> bool {
        match session.spec.remove_entity(index) {
            Ok(removed) => {
                if index < self.editors.len() {
                    self.editors.remove(index);
                }
                tracing::debug!(index, entity = %removed.display_name(), "Removed entity");
                if self.selected_editor >= self.editors.len() {
                    self.selected_editor = self.editors.len().saturating_sub(1);
                }
                self.entity_focus = EntityFocus::Name;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot remove entity");
                false
            }
        }
    }

    /// Write editor `index` into `spec.entities[index]`. The type must be
    /// a known entity type; on success the editor collapses.
    pub fn save_entry(&mut self, index: usize, session: &mut WizardSession) -> bool {
        let Some(editor) = self.editors.get_mut(index) else {
            return false;
        };
        let entity = editor.read();
        if entity.entity_type.is_empty() {
            editor.notice.show("Enter an entity type");
            return false;
        }
        if let Err(e) = session.catalog.check_entity(&entity.entity_type) {
            editor.notice.show(e.to_string());
            return false;
        }
        match session.spec.save_entity(index, entity) {
            Ok(()) => {
                editor.expanded = false;
                editor.notice.dismiss();
                true
            }
            Err(e) => {
                editor.notice.show(e.to_string());
                false
            }
        }
    }

    /// Catalog applications matching the filter text
    pub fn visible_templates<'a>(&self, session: &'a WizardSession) -> Vec<&'a CatalogItem> {
        let filter = self.template_filter.value().trim().to_lowercase();
        session
            .catalog
            .application_items()
            .iter()
            .filter(|item| {
                filter.is_empty()
                    || item.display_name().to_lowercase().contains(&filter)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&filter))
            })
            .collect()
    }

    /// Toggle the selection of template `id`; selecting one deselects the
    /// previous selection
    pub fn select_template(&mut self, id: &str) {
        if self.selected_template.as_deref() == Some(id) {
            self.selected_template = None;
        } else {
            self.selected_template = Some(id.to_string());
        }
    }

    /// Commit the selected template as the application type
    pub fn save_template(&mut self, session: &mut WizardSession) -> bool {
        let Some(id) = self.selected_template.clone() else {
            return false;
        };
        if let Err(e) = session.catalog.check_application(&id) {
            self.template_notice.show(e.to_string());
            return false;
        }
        self.commit_type(id, session);
        true
    }

    /// Commit the typed class name as the application type
    pub fn save_class(&mut self, session: &mut WizardSession) -> bool {
        let class_name = self.class_input.value().trim().to_string();
        if class_name.is_empty() {
            self.class_notice.show("Enter an application class");
            return false;
        }
        if let Err(e) = session.catalog.check_application(&class_name) {
            self.class_notice.show(e.to_string());
            return false;
        }
        self.commit_type(class_name, session);
        true
    }

    fn commit_type(&mut self, type_id: String, session: &mut WizardSession) {
        tracing::info!(type_id = %type_id, "Application type selected");
        session.spec.select_type(type_id.clone());
        session.config_cache.mark_pending(type_id);
        self.editors.clear();
        self.selected_editor = 0;
    }

    /// Rebuild editors from the spec when they no longer line up with it
    fn sync_editors(&mut self, session: &WizardSession) {
        if self.editors.len() == session.spec.entities.len() {
            return;
        }
        self.editors = session
            .spec
            .entities
            .iter()
            .map(|e| EntityEditor::from_entity(e, Notice::new(session.notice_ttl)))
            .collect();
        self.selected_editor = 0;
        self.entity_focus = EntityFocus::Name;
    }

    fn validate_entities(&mut self, session: &mut WizardSession) -> bool {
        let mut all_saved = true;
        for index in 0..self.editors.len() {
            if !self.save_entry(index, session) {
                all_saved = false;
            }
        }
        if !all_saved || session.spec.entities.is_empty() {
            return false;
        }
        session.spec.clear_type();
        session.config_cache.clear();
        true
    }

    fn handle_entities_key(&mut self, key: KeyEvent, session: &mut WizardSession) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl {
            return match key.code {
                KeyCode::Char('a') => {
                    self.add_entry(session);
                    true
                }
                KeyCode::Char('d') => self.remove_entry(self.selected_editor, session),
                KeyCode::Char('s') => self.save_entry(self.selected_editor, session),
                KeyCode::Char('r') => {
                    if let Some(editor) = self.editors.get_mut(self.selected_editor) {
                        editor.config.push(ConfigRow::free());
                        editor.expanded = true;
                        self.entity_focus = EntityFocus::Config(editor.config.len() - 1, RowPart::Key);
                    }
                    true
                }
                KeyCode::Char('x') => {
                    if let EntityFocus::Config(i, _) = self.entity_focus {
                        if let Some(editor) = self.editors.get_mut(self.selected_editor) {
                            if i < editor.config.len() {
                                editor.config.remove(i);
                            }
                        }
                        self.entity_focus = EntityFocus::Type;
                    }
                    true
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Up => {
                self.selected_editor = self.selected_editor.saturating_sub(1);
                self.entity_focus = EntityFocus::Name;
                true
            }
            KeyCode::Down => {
                if self.selected_editor + 1 < self.editors.len() {
                    self.selected_editor += 1;
                    self.entity_focus = EntityFocus::Name;
                }
                true
            }
            KeyCode::Tab | KeyCode::BackTab => {
                if let Some(editor) = self.editors.get(self.selected_editor) {
                    let order = editor.focus_order();
                    let pos = order
                        .iter()
                        .position(|f| *f == self.entity_focus)
                        .unwrap_or(0);
                    let next = if key.code == KeyCode::Tab {
                        (pos + 1) % order.len()
                    } else {
                        (pos + order.len() - 1) % order.len()
                    };
                    self.entity_focus = order[next];
                }
                true
            }
            KeyCode::Enter => {
                if let Some(editor) = self.editors.get_mut(self.selected_editor) {
                    if !editor.expanded {
                        editor.expanded = true;
                        return true;
                    }
                }
                self.save_entry(self.selected_editor, session)
            }
            code => {
                let focus = self.entity_focus;
                match self.editors.get_mut(self.selected_editor) {
                    Some(editor) if editor.expanded => editor
                        .field_mut(focus)
                        .is_some_and(|field| field.handle_key(code)),
                    _ => false,
                }
            }
        }
    }

    fn handle_template_key(&mut self, key: KeyEvent, session: &mut WizardSession) -> bool {
        let count = self.visible_templates(session).len();
        match key.code {
            KeyCode::Up => {
                let i = self.template_state.selected().unwrap_or(0);
                self.template_state.select(Some(i.saturating_sub(1)));
                true
            }
            KeyCode::Down => {
                let i = self.template_state.selected().map_or(0, |i| i + 1);
                if i < count {
                    self.template_state.select(Some(i));
                }
                true
            }
            KeyCode::Enter => {
                let id = self
                    .template_state
                    .selected()
                    .and_then(|i| self.visible_templates(session).get(i).map(|t| t.id.clone()));
                if let Some(id) = id {
                    self.select_template(&id);
                }
                true
            }
            code => {
                let consumed = self.template_filter.handle_key(code);
                if consumed {
                    self.template_state.select(Some(0));
                }
                consumed
            }
        }
    }

    fn render_entities(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        if self.editors.is_empty() {
            lines.push(Line::from(Span::styled(
                "No entities. Press Ctrl+A to add one.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, editor) in self.editors.iter().enumerate() {
            let selected = i == self.selected_editor;
            lines.extend(editor.lines(selected, selected.then_some(self.entity_focus)));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Entities "))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_templates(&mut self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("Filter: "),
                self.template_filter.span(true),
            ])),
            chunks[0],
        );

        let items: Vec<ListItem> = if !session.catalog.applications_loaded() {
            vec![ListItem::new("Loading templates...")]
        } else {
            self.visible_templates(session)
                .into_iter()
                .map(|item| {
                    let chosen = self.selected_template.as_deref() == Some(item.id.as_str());
                    let mark = if chosen { "[x] " } else { "[ ] " };
                    let mut spans = vec![
                        Span::raw(mark),
                        Span::styled(
                            item.display_name().to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ];
                    if let Some(description) = &item.description {
                        spans.push(Span::styled(
                            format!("  {}", description),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect()
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Templates "))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.template_state);

        if let Some(message) = self.template_notice.visible() {
            frame.render_widget(Paragraph::new(notice_line(message)), chunks[2]);
        }
    }

    fn render_class(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from("Enter the type of a catalog application:"),
            Line::from(""),
            Line::from(vec![Span::raw("Class: "), self.class_input.span(true)]),
        ];
        if let Some(message) = self.class_notice.visible() {
            lines.push(Line::from(""));
            lines.push(notice_line(message));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Application Class "));
        frame.render_widget(paragraph, area);
    }

    fn render_yaml(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new("Defining applications from YAML is not supported yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" YAML "));
        frame.render_widget(paragraph, area);
    }

    fn hints(&self) -> Line<'static> {
        match self.tab {
            CreateTab::Entities => key_hints(&[
                ("Ctrl+T", "tab"),
                ("Ctrl+A", "add"),
                ("Ctrl+D", "remove"),
                ("Ctrl+S", "save"),
                ("Ctrl+R", "add config"),
                ("Ctrl+X", "remove config"),
            ]),
            CreateTab::Template => {
                key_hints(&[("Ctrl+T", "tab"), ("Up/Down", "move"), ("Enter", "select")])
            }
            CreateTab::AppClass | CreateTab::Yaml => key_hints(&[("Ctrl+T", "tab")]),
        }
    }
}

impl WizardStep for StepCreate {
    fn id(&self) -> StepId {
        StepId::Create
    }

    fn validate(&mut self, session: &mut WizardSession) -> bool {
        let valid = match self.tab {
            CreateTab::Entities => self.validate_entities(session),
            CreateTab::Template => self.save_template(session),
            CreateTab::AppClass => self.save_class(session),
            CreateTab::Yaml => false,
        };
        if !valid {
            self.show_failure();
        }
        valid
    }

    fn update_for_state(&mut self, session: &mut WizardSession) -> Vec<FetchRequest> {
        self.sync_editors(session);
        vec![FetchRequest::Entities, FetchRequest::Applications]
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let titles: Vec<Line> = CreateTab::all()
            .iter()
            .map(|t| Line::from(t.label()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        match self.tab {
            CreateTab::Entities => self.render_entities(frame, chunks[1]),
            CreateTab::Template => self.render_templates(frame, chunks[1], session),
            CreateTab::AppClass => self.render_class(frame, chunks[1]),
            CreateTab::Yaml => self.render_yaml(frame, chunks[1]),
        }

        if let Some(message) = self.notice.visible() {
            frame.render_widget(Paragraph::new(notice_line(message)), chunks[2]);
        }
        frame.render_widget(Paragraph::new(self.hints()), chunks[3]);
    }

    fn handle_key(&mut self, key: KeyEvent, session: &mut WizardSession) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
            self.tab = self.tab.next();
            return true;
        }
        match self.tab {
            CreateTab::Entities => self.handle_entities_key(key, session),
            CreateTab::Template => self.handle_template_key(key, session),
            CreateTab::AppClass => self.class_input.handle_key(key.code),
            CreateTab::Yaml => false,
        }
    }

    fn show_failure(&mut self) {
        self.notice.show(FAILURE_MESSAGE);
    }

    fn notice(&self) -> Option<&str> {
        self.notice.visible()
    }

    fn dispose(&mut self) {
        self.editors.clear();
        self.selected_template = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogLookup;

    const JBOSS: &str = "brooklyn.entity.webapp.jboss.JBoss7Server";
    const MYSQL: &str = "brooklyn.entity.database.mysql.MySqlNode";
    const WEB_CLUSTER: &str = "brooklyn.demo.WebClusterDatabaseExample";

    fn item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: String::new(),
            description: None,
            icon_url: None,
        }
    }

    fn session() -> WizardSession {
        let mut catalog = CatalogLookup::new();
        catalog.load_entities(vec![item(JBOSS), item(MYSQL)]);
        catalog.load_applications(vec![item(WEB_CLUSTER)]);
        WizardSession {
            catalog,
            ..WizardSession::default()
        }
    }

    fn fill(step: &mut StepCreate, index: usize, name: &str, entity_type: &str) {
        let editor = step.editor_mut(index).unwrap();
        editor.name.set_value(name);
        editor.entity_type.set_value(entity_type);
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_new_step_starts_with_one_empty_entity() {
        let mut session = session();
        let step = StepCreate::new(&mut session);

        assert_eq!(step.editors().len(), 1);
        assert_eq!(session.spec.entities, vec![EntityRef::default()]);
    }

    #[test]
    fn test_remove_keeps_editors_aligned_with_entities() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        step.add_entry(&mut session);
        step.add_entry(&mut session);

        assert!(step.remove_entry(0, &mut session));
        assert_eq!(step.editors().len(), 2);
        assert_eq!(session.spec.entities.len(), 2);

        // The editor formerly at index 2 now writes to entities[1]
        fill(&mut step, 1, "db", MYSQL);
        assert!(step.save_entry(1, &mut session));
        assert_eq!(session.spec.entities[1].name, "db");
        assert_eq!(session.spec.entities[1].entity_type, MYSQL);
        assert_eq!(session.spec.entities[0], EntityRef::default());
    }

    #[test]
    fn test_save_entry_rejects_unknown_type() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        fill(&mut step, 0, "web", "com.example.Nope");

        assert!(!step.save_entry(0, &mut session));
        assert_eq!(session.spec.entities[0], EntityRef::default());
        assert!(step.editors()[0].expanded);
        assert_eq!(
            step.editors()[0].notice(),
            Some("entity type 'com.example.Nope' is not in the catalog")
        );
    }

    #[test]
    fn test_save_entry_collapses_editor_and_clears_type() {
        let mut session = session();
        session.spec.app_type = Some(WEB_CLUSTER.to_string());
        let mut step = StepCreate::new(&mut session);
        fill(&mut step, 0, "web", JBOSS);

        assert!(step.save_entry(0, &mut session));
        assert!(!step.editors()[0].expanded);
        assert_eq!(session.spec.app_type, None);
    }

    #[test]
    fn test_validate_entities_mode() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        fill(&mut step, 0, "web", JBOSS);
        step.add_entry(&mut session);
        fill(&mut step, 1, "db", MYSQL);

        assert!(step.validate(&mut session));
        assert_eq!(session.spec.app_type, None);
        assert_eq!(session.spec.entities.len(), 2);
    }

    #[test]
    fn test_validate_fails_with_unsaved_blank_entity() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);

        assert!(!step.validate(&mut session));
        assert!(step.notice().is_some());
    }

    #[test]
    fn test_save_template_clears_entities() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        fill(&mut step, 0, "web", JBOSS);
        assert!(step.save_entry(0, &mut session));

        step.set_tab(CreateTab::Template);
        step.select_template(WEB_CLUSTER);
        assert!(step.save_template(&mut session));

        assert!(session.spec.entities.is_empty());
        assert_eq!(session.spec.app_type.as_deref(), Some(WEB_CLUSTER));
        assert!(session.config_cache.is_pending());
    }

    #[test]
    fn test_select_template_toggles() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);

        step.select_template(WEB_CLUSTER);
        assert_eq!(step.selected_template(), Some(WEB_CLUSTER));
        step.select_template(WEB_CLUSTER);
        assert_eq!(step.selected_template(), None);
        assert!(!step.save_template(&mut session));
    }

    #[test]
    fn test_save_class_requires_known_type() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        step.set_tab(CreateTab::AppClass);

        step.class_input_mut().set_value("com.example.Missing");
        assert!(!step.validate(&mut session));
        assert!(session.spec.app_type.is_none());

        step.class_input_mut().set_value(WEB_CLUSTER);
        assert!(step.validate(&mut session));
        assert_eq!(session.spec.app_type.as_deref(), Some(WEB_CLUSTER));
        assert!(session.spec.entities.is_empty());
        assert!(session.config_cache.is_pending());
    }

    #[test]
    fn test_yaml_tab_never_validates() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        step.set_tab(CreateTab::Yaml);
        assert!(!step.validate(&mut session));
    }

    #[test]
    fn test_switching_back_to_entities_clears_type() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        step.class_input_mut().set_value(WEB_CLUSTER);
        step.set_tab(CreateTab::AppClass);
        assert!(step.validate(&mut session));

        step.update_for_state(&mut session);
        step.set_tab(CreateTab::Entities);
        step.add_entry(&mut session);
        fill(&mut step, 0, "web", JBOSS);
        assert!(step.validate(&mut session));

        assert_eq!(session.spec.app_type, None);
        assert_eq!(session.spec.entities.len(), 1);
        assert_eq!(session.config_cache, crate::model::ConfigCache::NotFetched);
    }

    #[test]
    fn test_keyboard_add_and_remove() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);

        assert!(step.handle_key(ctrl('a'), &mut session));
        assert_eq!(session.spec.entities.len(), 2);
        assert!(step.handle_key(ctrl('d'), &mut session));
        assert_eq!(session.spec.entities.len(), 1);
        assert!(step.handle_key(ctrl('t'), &mut session));
        assert_eq!(step.tab(), CreateTab::Template);
    }

    #[test]
    fn test_template_filter() {
        let mut session = session();
        let mut step = StepCreate::new(&mut session);
        step.template_filter_mut().set_value("webcluster");
        assert_eq!(step.visible_templates(&session).len(), 1);
        step.template_filter_mut().set_value("nomatch");
        assert!(step.visible_templates(&session).is_empty());
    }
}
