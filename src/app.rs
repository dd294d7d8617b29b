use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use serde_json::Value;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::ApiError;
use crate::config::Config;
use crate::model::ApplicationSpec;
use crate::ui::{install_panic_hook, key_hints, TerminalGuard};
use crate::wizard::{
    FetchOutcome, FinishBlocked, StepId, SubmissionState, WizardController,
};

/// How the wizard ended
#[derive(Debug, Clone)]
pub enum WizardExit {
    /// The server accepted the spec
    Submitted {
        spec: ApplicationSpec,
        response: Value,
    },
    Cancelled,
}

pub struct App {
    controller: WizardController,
    tick_rate: Duration,
    fetch_tx: UnboundedSender<FetchOutcome>,
    fetch_rx: UnboundedReceiver<FetchOutcome>,
    submit_tx: UnboundedSender<Result<Value, ApiError>>,
    submit_rx: UnboundedReceiver<Result<Value, ApiError>>,
    /// One-line message about the last navigation or submission request
    status: Option<String>,
}

impl App {
    pub fn new(controller: WizardController, config: &Config) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            fetch_tx,
            fetch_rx,
            submit_tx,
            submit_rx,
            status: None,
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub async fn run(&mut self) -> Result<WizardExit> {
        install_panic_hook();
        let _guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        while !self.controller.is_closed() {
            // Issue any fetches the current step asked for
            self.controller.dispatch(&self.fetch_tx);

            terminal.draw(|f| self.render(f))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.drain_outcomes();
        }

        terminal.show_cursor()?;

        Ok(match self.controller.submission() {
            SubmissionState::Succeeded(response) => WizardExit::Submitted {
                spec: self.controller.spec().clone(),
                response: response.clone(),
            },
            _ => WizardExit::Cancelled,
        })
    }

    /// Apply fetch and submission results that have arrived
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            self.controller.apply(outcome);
        }
        while let Ok(result) = self.submit_rx.try_recv() {
            let closed = self.controller.complete_submission(result);
            self.status = if closed {
                None
            } else {
                Some("Submission failed. Fix the spec or press Ctrl+F to retry.".to_string())
            };
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.controller.cancel(),
            KeyCode::Char('c') if ctrl => self.controller.cancel(),
            KeyCode::Char('n') if ctrl => {
                self.controller.advance();
            }
            KeyCode::Char('b') if ctrl => {
                self.controller.retreat();
            }
            KeyCode::Char('p') if ctrl => {
                self.controller.preview();
            }
            KeyCode::Char('f') if ctrl => self.start_submission(),
            _ => {
                self.controller.handle_key(key);
            }
        }
    }

    /// Post the spec on a background task; the answer arrives on `submit_rx`
    fn start_submission(&mut self) {
        match self.controller.begin_submission() {
            Ok(body) => {
                let applications = self.controller.applications();
                let tx = self.submit_tx.clone();
                tokio::spawn(async move {
                    let result = applications.create_application(&body).await;
                    let _ = tx.send(result);
                });
                self.status = Some("Submitting...".to_string());
            }
            // The step shows its own notice
            Err(FinishBlocked::Invalid) => {}
            Err(blocked) => {
                tracing::debug!(reason = %blocked, "Finish refused");
                self.status = Some(format!("Cannot finish: {}", blocked));
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.controller.render(frame, chunks[1]);
        self.render_status(frame, chunks[2]);
        self.render_nav(frame, chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let step = self.controller.current_step();
        let title = format!(
            " Step {}/{}: {} ",
            step.index() + 1,
            StepId::all().len(),
            step.title()
        );
        let header = Paragraph::new(step.instructions()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
        );
        frame.render_widget(header, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match self.controller.submission() {
            SubmissionState::Failed(e) => Line::from(vec![
                Span::styled(
                    "Submission failed: ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(e.to_string(), Style::default().fg(Color::Red)),
            ]),
            SubmissionState::InFlight => Line::from(Span::styled(
                "Submitting...",
                Style::default().fg(Color::Yellow),
            )),
            _ => match &self.status {
                Some(message) => Line::from(Span::raw(message.clone())),
                None => Line::from(""),
            },
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let nav = self.controller.nav_state();
        let mut hints = Vec::new();
        if nav.can_retreat {
            hints.push(("Ctrl+B", "back"));
        }
        if nav.can_advance {
            hints.push(("Ctrl+N", "next"));
        }
        if nav.can_preview {
            hints.push(("Ctrl+P", "preview"));
        }
        if nav.can_finish {
            hints.push(("Ctrl+F", "finish"));
        }
        hints.push(("Esc", "cancel"));
        frame.render_widget(Paragraph::new(key_hints(&hints)), area);
    }
}
