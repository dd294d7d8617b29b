//! Shared state of one wizard run
//!
//! Steps never own this; the controller lends it to each step call. Read
//! and write sets per step:
//! - Create reads `catalog`, writes `spec.entities`, `spec.app_type`,
//!   `config_cache`
//! - Deploy reads `locations`, `config_cache`, `spec.app_type`, writes
//!   `spec.name`, `spec.locations`, `spec.config`
//! - Preview reads `spec`

use std::time::Duration;

use super::fetch::{FetchOutcome, FetchRequest};
use crate::model::{ApplicationSpec, CatalogLookup, ConfigCache, LocationCatalog};

#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    pub spec: ApplicationSpec,
    pub catalog: CatalogLookup,
    pub locations: LocationCatalog,
    pub config_cache: ConfigCache,
    /// How long step notices stay visible
    pub notice_ttl: Duration,
}

impl WizardSession {
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            notice_ttl,
            ..Self::default()
        }
    }

    /// Apply a completed fetch. Outcomes are applied in arrival order, so
    /// a late response overwrites an earlier one.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Entities(Ok(items)) => {
                tracing::debug!(count = items.len(), "Entity catalog loaded");
                self.catalog.load_entities(items);
            }
            FetchOutcome::Applications(Ok(items)) => {
                tracing::debug!(count = items.len(), "Application catalog loaded");
                self.catalog.load_applications(items);
            }
            FetchOutcome::Locations(Ok(locations)) => {
                tracing::debug!(count = locations.len(), "Location catalog loaded");
                self.locations.load(locations);
            }
            FetchOutcome::EntityConfig {
                type_id,
                result: Ok(schema),
            } => {
                tracing::debug!(type_id = %type_id, entries = schema.config.len(), "Required config loaded");
                self.config_cache.fill(type_id, schema);
            }
            FetchOutcome::EntityConfig {
                type_id,
                result: Err(e),
            } => {
                tracing::warn!(type_id = %type_id, error = %e, "Failed to fetch required config");
                self.config_cache.fetch_failed(&type_id);
            }
            FetchOutcome::Entities(Err(e))
            | FetchOutcome::Applications(Err(e))
            | FetchOutcome::Locations(Err(e)) => {
                tracing::warn!(error = %e, "Catalog fetch failed");
            }
        }
    }

    /// Whether `request` would still change anything if performed
    pub fn still_needed(&self, request: &FetchRequest) -> bool {
        match request {
            FetchRequest::Entities => !self.catalog.entities_loaded(),
            FetchRequest::Applications => !self.catalog.applications_loaded(),
            FetchRequest::Locations => !self.locations.is_loaded(),
            FetchRequest::EntityConfig(_) => true,
        }
    }
}
