//! Server API seams used by the wizard
//!
//! This module provides:
//! - `CatalogProvider` for catalog and location lookups
//! - `ApplicationProvider` for submitting a finished spec
//! - `HttpServerClient`, the reqwest implementation of both
//! - `MockServer`, an in-memory implementation for tests

pub mod error;
mod http;
mod mock;

pub use error::ApiError;
pub use http::HttpServerClient;
pub use mock::{MockServer, RecordedCall};

use async_trait::async_trait;

use crate::model::{CatalogItem, ConfigSchema, Location};

/// Read-only catalog of types, required config and locations
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// `GET /v1/catalog/entities`
    async fn list_entities(&self) -> Result<Vec<CatalogItem>, ApiError>;

    /// `GET /v1/catalog/applications`
    async fn list_applications(&self) -> Result<Vec<CatalogItem>, ApiError>;

    /// `GET /v1/catalog/entities/{type}`
    async fn entity_config(&self, type_id: &str) -> Result<ConfigSchema, ApiError>;

    /// `GET /v1/locations`
    async fn list_locations(&self) -> Result<Vec<Location>, ApiError>;
}

/// Accepts finished application specs
#[async_trait]
pub trait ApplicationProvider: Send + Sync {
    /// `POST /v1/applications` with the canonical spec body.
    ///
    /// The response body is opaque; it is returned as JSON when it parses
    /// and as `Null` otherwise.
    async fn create_application(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError>;
}
