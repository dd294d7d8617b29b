//! The application spec assembled by the wizard and posted on finish.
//!
//! Serialization produces the canonical submission shape: empty `name`,
//! `entities` and `config` are omitted, as is an unset `type`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SpecError;

/// A config override value: free text or a toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Text(String),
}

impl ConfigValue {
    /// Render the value for display in an editable row
    pub fn as_display(&self) -> String {
        match self {
            ConfigValue::Flag(value) => value.to_string(),
            ConfigValue::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Flag(value)
    }
}

/// One entity of a composed application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl EntityRef {
    /// Header shown for a collapsed entity editor
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.entity_type.is_empty() {
            &self.entity_type
        } else {
            "(new entity)"
        }
    }
}

/// Which definition mode the spec currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionMode {
    /// Neither `type` nor `entities` is set
    Undefined,
    /// Defined by a template or class identifier
    Type,
    /// Defined by a composed set of entities
    Entities,
}

/// Composite application deployment spec
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityRef>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, ConfigValue>,
}

impl ApplicationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current definition mode
    pub fn mode(&self) -> DefinitionMode {
        match (self.app_type.is_some(), self.entities.is_empty()) {
            (true, _) => DefinitionMode::Type,
            (false, false) => DefinitionMode::Entities,
            (false, true) => DefinitionMode::Undefined,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Define the application by type identifier, dropping any entities
    pub fn select_type(&mut self, type_id: impl Into<String>) {
        self.app_type = Some(type_id.into());
        self.entities.clear();
    }

    /// Switch to entities mode by clearing the type
    pub fn clear_type(&mut self) {
        self.app_type = None;
    }

    /// Append an empty entity, returning its index
    pub fn add_entity(&mut self, entity: EntityRef) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    /// Remove the entity at `index`; later entities shift down by one
    pub fn remove_entity(&mut self, index: usize) -> Result<EntityRef, SpecError> {
        if index >= self.entities.len() {
            return Err(SpecError::IndexOutOfRange {
                kind: "entity",
                index,
                len: self.entities.len(),
            });
        }
        Ok(self.entities.remove(index))
    }

    /// Overwrite the entity at `index` and clear the type (entities mode)
    pub fn save_entity(&mut self, index: usize, entity: EntityRef) -> Result<(), SpecError> {
        let len = self.entities.len();
        let slot = self
            .entities
            .get_mut(index)
            .ok_or(SpecError::IndexOutOfRange {
                kind: "entity",
                index,
                len,
            })?;
        *slot = entity;
        self.app_type = None;
        Ok(())
    }

    pub fn add_location(&mut self, uri: impl Into<String>) -> usize {
        self.locations.push(uri.into());
        self.locations.len() - 1
    }

    pub fn remove_location(&mut self, index: usize) -> Result<String, SpecError> {
        if index >= self.locations.len() {
            return Err(SpecError::IndexOutOfRange {
                kind: "location",
                index,
                len: self.locations.len(),
            });
        }
        Ok(self.locations.remove(index))
    }

    pub fn set_location(&mut self, index: usize, uri: impl Into<String>) -> Result<(), SpecError> {
        let len = self.locations.len();
        let slot = self
            .locations
            .get_mut(index)
            .ok_or(SpecError::IndexOutOfRange {
                kind: "location",
                index,
                len,
            })?;
        *slot = uri.into();
        Ok(())
    }

    /// Replace the config overrides
    pub fn set_config(&mut self, config: BTreeMap<String, ConfigValue>) {
        self.config = config;
    }

    /// Whether the spec defines an application and at least one location
    pub fn check_deployable(&self) -> Result<(), SpecError> {
        if self.locations.is_empty() {
            return Err(SpecError::NoLocations);
        }
        if self.mode() == DefinitionMode::Undefined {
            return Err(SpecError::NoDefinition);
        }
        Ok(())
    }

    /// Canonical JSON body for `POST /v1/applications`
    pub fn to_canonical_json(&self) -> serde_json::Value {
        // Serialization of plain maps, strings and bools cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Pretty-printed canonical JSON for preview and export
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_canonical_json()).unwrap_or_default()
    }
}
