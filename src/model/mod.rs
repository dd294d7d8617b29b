//! Spec data model and the catalog data it is validated against

mod cache;
mod catalog;
mod spec;

pub use cache::ConfigCache;
pub use catalog::{
    CatalogItem, CatalogLookup, ConfigEntry, ConfigSchema, Location, LocationCatalog,
    LocationLinks,
};
pub use spec::{ApplicationSpec, ConfigValue, DefinitionMode, EntityRef};

use thiserror::Error;

/// Errors raised by spec mutators and invariant checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("location '{0}' is not in the location catalog")]
    UnknownLocation(String),

    #[error("entity type '{0}' is not in the catalog")]
    UnknownEntityType(String),

    #[error("application type '{0}' is not in the catalog")]
    UnknownApplicationType(String),

    #[error("spec has neither a type nor any entities")]
    NoDefinition,

    #[error("spec has no locations")]
    NoLocations,
}
