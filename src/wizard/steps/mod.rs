//! The three wizard steps and the interface the controller drives them by

mod config_rows;
mod create;
mod deploy;
mod preview;

pub use config_rows::{ConfigRow, RowPart};
pub use create::{CreateTab, EntityEditor, StepCreate};
pub use deploy::{DeployFocus, StepDeploy};
pub use preview::{export_spec, StepPreview};

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::fetch::FetchRequest;
use super::session::WizardSession;

/// Position of a step in the fixed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    Create,
    Deploy,
    Preview,
}

impl StepId {
    pub fn all() -> &'static [StepId] {
        &[StepId::Create, StepId::Deploy, StepId::Preview]
    }

    pub fn index(&self) -> usize {
        match self {
            StepId::Create => 0,
            StepId::Deploy => 1,
            StepId::Preview => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<StepId> {
        Self::all().get(index).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            StepId::Create => "Create Application",
            StepId::Deploy => "Deploy Application",
            StepId::Preview => "Application Preview",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            StepId::Create => "Choose or build the application to deploy",
            StepId::Deploy => {
                "Specify the locations to deploy to and any additional configuration"
            }
            StepId::Preview => "Confirm the spec which will be sent to the server",
        }
    }
}

/// Capabilities every wizard step provides to the controller
pub trait WizardStep {
    fn id(&self) -> StepId;

    /// Check (and commit) the step's input. On `false` the step shows its
    /// own notice and keeps the input for correction.
    fn validate(&mut self, session: &mut WizardSession) -> bool;

    /// Refresh from session state when the step becomes current.
    /// Returns the catalog reads the step still needs.
    fn update_for_state(&mut self, session: &mut WizardSession) -> Vec<FetchRequest>;

    /// Called after a fetch result has been applied to the session while
    /// this step is current
    fn on_fetch(&mut self, _request: &FetchRequest, _session: &mut WizardSession) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, session: &WizardSession);

    /// Handle a key press, returns true if the key was consumed
    fn handle_key(&mut self, key: KeyEvent, session: &mut WizardSession) -> bool;

    /// Show the step's failure notice
    fn show_failure(&mut self);

    /// Notice currently visible, if any
    fn notice(&self) -> Option<&str>;

    /// Release per-run view state when the wizard closes
    fn dispose(&mut self) {}
}
