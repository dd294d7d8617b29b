//! Catalog data fetched from the server: entity and application types,
//! per-type required configuration, and deployable locations.

use serde::{Deserialize, Serialize};

use super::SpecError;

/// An entity or application type listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl CatalogItem {
    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// One configuration key declared by a catalog type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub priority: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
}

impl ConfigEntry {
    /// Whether the entry should be edited as a toggle
    pub fn is_boolean(&self) -> bool {
        self.value_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("boolean") || t.ends_with(".Boolean"))
    }

    /// Default value rendered as text (empty when absent)
    pub fn default_text(&self) -> String {
        match &self.default_value {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Default value interpreted as a toggle
    pub fn default_flag(&self) -> bool {
        match &self.default_value {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Required-configuration schema of a catalog type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSchema {
    #[serde(default)]
    pub config: Vec<ConfigEntry>,
}

impl ConfigSchema {
    /// Labeled entries by descending priority.
    ///
    /// Entries without a label are not shown. Equal priorities keep the
    /// order the server returned them in.
    pub fn displayed_entries(&self) -> Vec<&ConfigEntry> {
        let mut entries: Vec<&ConfigEntry> = self
            .config
            .iter()
            .filter(|entry| entry.label.as_deref().is_some_and(|l| !l.is_empty()))
            .collect();
        // sort_by is stable
        entries.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        entries
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// A deployable location target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spec: Option<String>,
    pub links: LocationLinks,
}

impl Location {
    /// Stable identifier stored in the spec's `locations`
    pub fn uri(&self) -> &str {
        &self.links.self_link
    }

    /// Human-readable name: name, then spec string, then the self link
    pub fn pretty_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.spec.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(&self.links.self_link)
    }
}

/// Locations available to deploy to, fetched once per wizard
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    entries: Option<Vec<Location>>,
}

impl LocationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_locations(locations: Vec<Location>) -> Self {
        Self {
            entries: Some(locations),
        }
    }

    /// Whether the catalog has been fetched
    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    pub fn load(&mut self, locations: Vec<Location>) {
        self.entries = Some(locations);
    }

    pub fn entries(&self) -> &[Location] {
        self.entries.as_deref().unwrap_or_default()
    }

    pub fn first(&self) -> Option<&Location> {
        self.entries().first()
    }

    /// Find a location by exact self-link match
    pub fn find(&self, uri: &str) -> Option<&Location> {
        self.entries().iter().find(|loc| loc.uri() == uri)
    }

    /// Resolve a URI, failing if the catalog has no such entry
    pub fn resolve(&self, uri: &str) -> Result<&Location, SpecError> {
        self.find(uri)
            .ok_or_else(|| SpecError::UnknownLocation(uri.to_string()))
    }

    /// Location following `uri` in catalog order, wrapping around
    pub fn next_after(&self, uri: &str) -> Option<&Location> {
        let entries = self.entries();
        if entries.is_empty() {
            return None;
        }
        let next = entries
            .iter()
            .position(|loc| loc.uri() == uri)
            .map_or(0, |i| (i + 1) % entries.len());
        entries.get(next)
    }
}

/// Known entity and application types
#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    entities: Option<Vec<CatalogItem>>,
    applications: Option<Vec<CatalogItem>>,
}

impl CatalogLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities_loaded(&self) -> bool {
        self.entities.is_some()
    }

    pub fn applications_loaded(&self) -> bool {
        self.applications.is_some()
    }

    pub fn load_entities(&mut self, items: Vec<CatalogItem>) {
        self.entities = Some(items);
    }

    pub fn load_applications(&mut self, items: Vec<CatalogItem>) {
        self.applications = Some(items);
    }

    pub fn entity_items(&self) -> &[CatalogItem] {
        self.entities.as_deref().unwrap_or_default()
    }

    pub fn application_items(&self) -> &[CatalogItem] {
        self.applications.as_deref().unwrap_or_default()
    }

    pub fn is_known_entity(&self, type_id: &str) -> bool {
        !type_id.is_empty() && self.entity_items().iter().any(|item| item.id == type_id)
    }

    pub fn is_known_application(&self, type_id: &str) -> bool {
        !type_id.is_empty()
            && self
                .application_items()
                .iter()
                .any(|item| item.id == type_id)
    }

    /// `Ok` when `type_id` names a catalog entity type
    pub fn check_entity(&self, type_id: &str) -> Result<(), SpecError> {
        if self.is_known_entity(type_id) {
            Ok(())
        } else {
            Err(SpecError::UnknownEntityType(type_id.to_string()))
        }
    }

    /// `Ok` when `type_id` names a catalog application type
    pub fn check_application(&self, type_id: &str) -> Result<(), SpecError> {
        if self.is_known_application(type_id) {
            Ok(())
        } else {
            Err(SpecError::UnknownApplicationType(type_id.to_string()))
        }
    }
}
