//! Remote reads requested by steps and their results

use crate::api::{ApiError, CatalogProvider};
use crate::model::{CatalogItem, ConfigSchema, Location};

/// A catalog read a step needs before it can render fully
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchRequest {
    Entities,
    Applications,
    Locations,
    /// Required config of the given type
    EntityConfig(String),
}

/// Result of a `FetchRequest`
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Entities(Result<Vec<CatalogItem>, ApiError>),
    Applications(Result<Vec<CatalogItem>, ApiError>),
    Locations(Result<Vec<Location>, ApiError>),
    EntityConfig {
        type_id: String,
        result: Result<ConfigSchema, ApiError>,
    },
}

impl FetchOutcome {
    /// The request this outcome answers
    pub fn request(&self) -> FetchRequest {
        match self {
            FetchOutcome::Entities(_) => FetchRequest::Entities,
            FetchOutcome::Applications(_) => FetchRequest::Applications,
            FetchOutcome::Locations(_) => FetchRequest::Locations,
            FetchOutcome::EntityConfig { type_id, .. } => {
                FetchRequest::EntityConfig(type_id.clone())
            }
        }
    }
}

/// Perform `request` against `catalog`
pub async fn perform(catalog: &dyn CatalogProvider, request: FetchRequest) -> FetchOutcome {
    match request {
        FetchRequest::Entities => FetchOutcome::Entities(catalog.list_entities().await),
        FetchRequest::Applications => {
            FetchOutcome::Applications(catalog.list_applications().await)
        }
        FetchRequest::Locations => FetchOutcome::Locations(catalog.list_locations().await),
        FetchRequest::EntityConfig(type_id) => {
            let result = catalog.entity_config(&type_id).await;
            FetchOutcome::EntityConfig { type_id, result }
        }
    }
}
