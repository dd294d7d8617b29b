//! The three-step application deploy wizard
//!
//! `WizardController` owns a `WizardSession` and lends it to the current
//! step for every call. Steps ask for catalog data by returning
//! `FetchRequest`s; the controller performs them inline or on tokio tasks
//! and feeds the outcomes back through `apply`.

mod controller;
pub mod fetch;
mod notice;
mod session;
pub mod steps;

pub use controller::{
    CompletionCallback, FinishBlocked, FinishOutcome, NavState, SubmissionState, Transition,
    WizardController,
};
pub use fetch::{FetchOutcome, FetchRequest};
pub use notice::Notice;
pub use session::WizardSession;
pub use steps::{StepId, WizardStep};
