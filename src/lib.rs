//! deploy-wizard - guided assembly and submission of application specs
//!
//! The wizard walks a user through defining an application (from catalog
//! entities, a template or a class name), choosing locations and config
//! overrides, and previewing the JSON before posting it to the server.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod model;
pub mod ui;
pub mod wizard;
