//! In-memory server implementing both provider traits, for tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ApiError, ApplicationProvider, CatalogProvider};
use crate::model::{CatalogItem, ConfigSchema, Location, LocationLinks};

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    ListEntities,
    ListApplications,
    EntityConfig(String),
    ListLocations,
    CreateApplication(serde_json::Value),
}

/// Mock implementation for testing
#[derive(Debug, Clone, Default)]
pub struct MockServer {
    pub entities: Arc<Mutex<Vec<CatalogItem>>>,
    pub applications: Arc<Mutex<Vec<CatalogItem>>>,
    pub schemas: Arc<Mutex<HashMap<String, ConfigSchema>>>,
    pub locations: Arc<Mutex<Vec<Location>>>,
    /// Status to fail `create_application` with, if set
    pub fail_create_with: Arc<Mutex<Option<u16>>>,
    /// Whether catalog reads fail with a network error
    pub catalog_offline: Arc<Mutex<bool>>,
    /// Record of calls made
    pub call_log: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server with a small catalog: two entity types, two application
    /// types and two locations
    pub fn with_sample_catalog() -> Self {
        let mock = Self::new();
        *mock.entities.lock().unwrap() = vec![
            item("brooklyn.entity.webapp.jboss.JBoss7Server", "JBoss 7"),
            item("brooklyn.entity.database.mysql.MySqlNode", "MySQL"),
        ];
        *mock.applications.lock().unwrap() = vec![
            item("brooklyn.demo.WebClusterDatabaseExample", "Web Cluster + DB"),
            item("brooklyn.demo.NodeJsTodoApplication", "Node.js Todo"),
        ];
        *mock.locations.lock().unwrap() = vec![
            location("0", "localhost"),
            location("1", "aws-ec2:us-east-1"),
        ];
        mock
    }

    pub fn set_schema(&self, type_id: &str, schema: ConfigSchema) {
        self.schemas
            .lock()
            .unwrap()
            .insert(type_id.to_string(), schema);
    }

    pub fn set_create_failure(&self, status: Option<u16>) {
        *self.fail_create_with.lock().unwrap() = status;
    }

    pub fn set_catalog_offline(&self, offline: bool) {
        *self.catalog_offline.lock().unwrap() = offline;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Bodies of every `create_application` call, in order
    pub fn submitted_bodies(&self) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::CreateApplication(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.call_log.lock().unwrap().push(call);
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if *self.catalog_offline.lock().unwrap() {
            return Err(ApiError::network("catalog", "mock catalog offline"));
        }
        Ok(())
    }
}

fn item(id: &str, name: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        icon_url: None,
    }
}

fn location(id: &str, spec: &str) -> Location {
    Location {
        id: Some(id.to_string()),
        name: None,
        spec: Some(spec.to_string()),
        links: LocationLinks {
            self_link: format!("/v1/locations/{id}"),
        },
    }
}

#[async_trait]
impl CatalogProvider for MockServer {
    async fn list_entities(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.record(RecordedCall::ListEntities);
        self.check_online()?;
        Ok(self.entities.lock().unwrap().clone())
    }

    async fn list_applications(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.record(RecordedCall::ListApplications);
        self.check_online()?;
        Ok(self.applications.lock().unwrap().clone())
    }

    async fn entity_config(&self, type_id: &str) -> Result<ConfigSchema, ApiError> {
        self.record(RecordedCall::EntityConfig(type_id.to_string()));
        self.check_online()?;
        self.schemas
            .lock()
            .unwrap()
            .get(type_id)
            .cloned()
            .ok_or_else(|| ApiError::http("catalog", 404, format!("no such type {type_id}")))
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        self.record(RecordedCall::ListLocations);
        self.check_online()?;
        Ok(self.locations.lock().unwrap().clone())
    }
}

#[async_trait]
impl ApplicationProvider for MockServer {
    async fn create_application(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.record(RecordedCall::CreateApplication(body.clone()));
        if let Some(status) = *self.fail_create_with.lock().unwrap() {
            return Err(ApiError::http("applications", status, "mock failure"));
        }
        Ok(serde_json::json!({ "entityId": "app-1" }))
    }
}
