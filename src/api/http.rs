//! reqwest client for the catalog, locations and applications endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::{ApiError, ApplicationProvider, CatalogProvider};
use crate::config::ServerConfig;
use crate::model::{CatalogItem, ConfigSchema, Location};

const CATALOG_PROVIDER: &str = "catalog";
const APPLICATIONS_PROVIDER: &str = "applications";

/// HTTP client for a deployment server
#[derive(Debug, Clone)]
pub struct HttpServerClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpServerClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8081`)
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::network(CATALOG_PROVIDER, format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::network(
                CATALOG_PROVIDER,
                format!("invalid base URL: {base_url}"),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(CATALOG_PROVIDER, e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the `[server]` config section
    pub fn from_config(config: &ServerConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, provider: &str, url: Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::network(provider, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http(provider, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::decode(provider, e.to_string()))
    }
}

#[async_trait]
impl CatalogProvider for HttpServerClient {
    async fn list_entities(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let url = self.endpoint(&["v1", "catalog", "entities"]);
        self.get_json(CATALOG_PROVIDER, url).await
    }

    async fn list_applications(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let url = self.endpoint(&["v1", "catalog", "applications"]);
        self.get_json(CATALOG_PROVIDER, url).await
    }

    async fn entity_config(&self, type_id: &str) -> Result<ConfigSchema, ApiError> {
        let url = self.endpoint(&["v1", "catalog", "entities", type_id]);
        self.get_json(CATALOG_PROVIDER, url).await
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        let url = self.endpoint(&["v1", "locations"]);
        self.get_json(CATALOG_PROVIDER, url).await
    }
}

#[async_trait]
impl ApplicationProvider for HttpServerClient {
    async fn create_application(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(&["v1", "applications"]);
        tracing::info!(%url, "Submitting application");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::network(APPLICATIONS_PROVIDER, e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::http(APPLICATIONS_PROVIDER, status.as_u16(), text));
        }

        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::Null))
    }
}
