//! Step sequencing, catalog fetch dispatch and spec submission

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use super::fetch::{self, FetchOutcome, FetchRequest};
use super::session::WizardSession;
use super::steps::{StepCreate, StepDeploy, StepId, StepPreview, WizardStep};
use crate::api::{ApiError, ApplicationProvider, CatalogProvider};
use crate::model::ApplicationSpec;

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Now showing the given step
    Moved(StepId),
    /// The current step failed validation and shows its notice
    Blocked,
    /// The request is not legal from the current step
    Illegal,
}

/// Which navigation affordances the current step offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub can_retreat: bool,
    pub can_advance: bool,
    pub can_preview: bool,
    pub can_finish: bool,
}

/// Why `begin_submission` refused to produce a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishBlocked {
    /// Finish is not offered on the current step
    NotAvailable,
    /// A previous submission has not completed yet
    InFlight,
    /// The current step failed validation
    Invalid,
    /// The wizard already closed
    Closed,
}

impl fmt::Display for FinishBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishBlocked::NotAvailable => write!(f, "finish is not available on this step"),
            FinishBlocked::InFlight => write!(f, "a submission is already in flight"),
            FinishBlocked::Invalid => write!(f, "the application spec is incomplete"),
            FinishBlocked::Closed => write!(f, "the wizard is closed"),
        }
    }
}

/// Result of `finish`
#[derive(Debug, Clone)]
pub enum FinishOutcome {
    /// The server accepted the spec; carries its response
    Submitted(Value),
    Blocked(FinishBlocked),
    /// The server rejected the spec; the wizard stays open for retry
    Failed(ApiError),
}

/// Submission progress
#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Failed(ApiError),
    Succeeded(Value),
}

/// Invoked once with the server response after a successful submission
pub type CompletionCallback = Box<dyn FnMut(&Value) + Send>;

/// Drives the three wizard steps over a shared session
pub struct WizardController {
    session: WizardSession,
    steps: Vec<Box<dyn WizardStep>>,
    current: usize,
    catalog: Arc<dyn CatalogProvider>,
    applications: Arc<dyn ApplicationProvider>,
    /// Requests returned by steps and not yet dispatched
    queued: Vec<FetchRequest>,
    in_flight: HashSet<FetchRequest>,
    submission: SubmissionState,
    closed: bool,
    on_complete: Option<CompletionCallback>,
}

impl WizardController {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        applications: Arc<dyn ApplicationProvider>,
        session: WizardSession,
    ) -> Self {
        let mut session = session;
        let create = StepCreate::new(&mut session);
        let deploy = StepDeploy::new(&session);
        let preview = StepPreview::new(&session);
        let mut controller = Self {
            session,
            steps: vec![Box::new(create), Box::new(deploy), Box::new(preview)],
            current: 0,
            catalog,
            applications,
            queued: Vec::new(),
            in_flight: HashSet::new(),
            submission: SubmissionState::Idle,
            closed: false,
            on_complete: None,
        };
        controller.enter_current();
        controller
    }

    /// Register the callback run after a successful submission
    pub fn on_complete(mut self, callback: CompletionCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn spec(&self) -> &ApplicationSpec {
        &self.session.spec
    }

    pub fn current_step(&self) -> StepId {
        StepId::from_index(self.current).unwrap_or(StepId::Create)
    }

    pub fn step(&self, id: StepId) -> Option<&dyn WizardStep> {
        self.steps.get(id.index()).map(|s| s.as_ref())
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the last submission failed and the user should look at it
    pub fn needs_attention(&self) -> bool {
        matches!(self.submission, SubmissionState::Failed(_))
    }

    pub fn applications(&self) -> Arc<dyn ApplicationProvider> {
        Arc::clone(&self.applications)
    }

    pub fn nav_state(&self) -> NavState {
        let step = self.current_step();
        NavState {
            can_retreat: step != StepId::Create,
            can_advance: step == StepId::Create,
            can_preview: step == StepId::Deploy,
            can_finish: step != StepId::Create,
        }
    }

    fn enter_current(&mut self) {
        let step_id = self.current_step();
        tracing::debug!(step = ?step_id, "Entering step");
        let requests = self.steps[self.current].update_for_state(&mut self.session);
        self.queued.extend(requests);
    }

    /// Validate the current step and move to the next one
    pub fn advance(&mut self) -> Transition {
        if self.closed || self.current + 1 >= self.steps.len() {
            return Transition::Illegal;
        }
        if !self.steps[self.current].validate(&mut self.session) {
            tracing::debug!(step = ?self.current_step(), "Step validation failed");
            return Transition::Blocked;
        }
        self.current += 1;
        self.enter_current();
        Transition::Moved(self.current_step())
    }

    /// Jump from deploy to preview; same as `advance` there
    pub fn preview(&mut self) -> Transition {
        if self.current_step() != StepId::Deploy {
            return Transition::Illegal;
        }
        self.advance()
    }

    /// Move to the previous step without validating the current one
    pub fn retreat(&mut self) -> Transition {
        if self.closed || self.current == 0 {
            return Transition::Illegal;
        }
        self.current -= 1;
        self.enter_current();
        Transition::Moved(self.current_step())
    }

    /// Validate and produce the body to submit, marking a submission as in
    /// flight. Must be followed by `complete_submission`.
    pub fn begin_submission(&mut self) -> Result<Value, FinishBlocked> {
        if self.closed {
            return Err(FinishBlocked::Closed);
        }
        if !self.nav_state().can_finish {
            return Err(FinishBlocked::NotAvailable);
        }
        if matches!(self.submission, SubmissionState::InFlight) {
            return Err(FinishBlocked::InFlight);
        }
        let step = &mut self.steps[self.current];
        if !step.validate(&mut self.session) {
            return Err(FinishBlocked::Invalid);
        }
        if let Err(e) = self.session.spec.check_deployable() {
            tracing::warn!(error = %e, "Refusing to submit");
            step.show_failure();
            return Err(FinishBlocked::Invalid);
        }
        self.submission = SubmissionState::InFlight;
        let body = self.session.spec.to_canonical_json();
        tracing::info!(body = %body, "Submitting application");
        Ok(body)
    }

    /// Record the server's answer to a submission. Returns true when the
    /// wizard closed.
    pub fn complete_submission(&mut self, result: Result<Value, ApiError>) -> bool {
        match result {
            Ok(response) => {
                tracing::info!(response = %response, "Application created");
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(&response);
                }
                self.submission = SubmissionState::Succeeded(response);
                self.close();
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Application submission failed");
                self.steps[self.current].show_failure();
                self.submission = SubmissionState::Failed(e);
                false
            }
        }
    }

    /// Validate, submit and wait for the server
    pub async fn finish(&mut self) -> FinishOutcome {
        let body = match self.begin_submission() {
            Ok(body) => body,
            Err(blocked) => return FinishOutcome::Blocked(blocked),
        };
        let result = self.applications.create_application(&body).await;
        let outcome = match &result {
            Ok(response) => FinishOutcome::Submitted(response.clone()),
            Err(e) => FinishOutcome::Failed(e.clone()),
        };
        self.complete_submission(result);
        outcome
    }

    /// Close without submitting
    pub fn cancel(&mut self) {
        if !self.closed {
            tracing::info!("Wizard cancelled");
            self.close();
        }
    }

    fn close(&mut self) {
        self.closed = true;
        for step in self.steps.iter_mut() {
            step.dispose();
        }
    }

    /// Queued requests that still need issuing, marked as in flight
    fn take_requests(&mut self) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        for request in std::mem::take(&mut self.queued) {
            if self.in_flight.contains(&request) || !self.session.still_needed(&request) {
                continue;
            }
            self.in_flight.insert(request.clone());
            requests.push(request);
        }
        requests
    }

    /// Whether any fetch is queued or in flight
    pub fn has_pending_fetches(&self) -> bool {
        !self.queued.is_empty() || !self.in_flight.is_empty()
    }

    /// Apply a fetch result to the session and let the current step react
    pub fn apply(&mut self, outcome: FetchOutcome) {
        let request = outcome.request();
        self.in_flight.remove(&request);
        self.session.apply(outcome);
        if !self.closed {
            self.steps[self.current].on_fetch(&request, &mut self.session);
        }
    }

    /// Perform queued fetches inline until none remain
    pub async fn sync(&mut self) {
        loop {
            let requests = self.take_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                let outcome = fetch::perform(self.catalog.as_ref(), request).await;
                self.apply(outcome);
            }
        }
    }

    /// Spawn queued fetches; results arrive on `tx` for `apply`
    pub fn dispatch(&mut self, tx: &UnboundedSender<FetchOutcome>) {
        for request in self.take_requests() {
            tracing::debug!(request = ?request, "Dispatching fetch");
            let catalog = Arc::clone(&self.catalog);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = fetch::perform(catalog.as_ref(), request).await;
                // Receiver gone means the wizard closed
                let _ = tx.send(outcome);
            });
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.closed {
            return false;
        }
        self.steps[self.current].handle_key(key, &mut self.session)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.steps[self.current].render(frame, area, &self.session);
    }
}
