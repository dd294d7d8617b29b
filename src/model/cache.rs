//! Single-slot cache for the required-config schema of the selected type.

use super::ConfigSchema;

/// Fetch state of the selected type's required-config schema
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConfigCache {
    /// Nothing requested; nothing to render
    #[default]
    NotFetched,
    /// A fetch is wanted for `type_id`; `in_flight` once it has been issued
    Pending { type_id: String, in_flight: bool },
    /// The last fetch for `type_id` failed; re-entering the step retries
    Failed { type_id: String },
    /// Schema received for `type_id`
    Ready {
        type_id: String,
        schema: ConfigSchema,
    },
}

impl ConfigCache {
    /// Request a (re)fetch for `type_id`, discarding any previous schema
    pub fn mark_pending(&mut self, type_id: impl Into<String>) {
        *self = ConfigCache::Pending {
            type_id: type_id.into(),
            in_flight: false,
        };
    }

    /// Type that still needs a request issued, flagging it as in flight
    pub fn take_request(&mut self) -> Option<String> {
        match self {
            ConfigCache::Pending { type_id, in_flight } if !*in_flight => {
                *in_flight = true;
                Some(type_id.clone())
            }
            ConfigCache::Failed { type_id } => {
                let type_id = std::mem::take(type_id);
                *self = ConfigCache::Pending {
                    type_id: type_id.clone(),
                    in_flight: true,
                };
                Some(type_id)
            }
            _ => None,
        }
    }

    /// Store a fetched schema. The last response to arrive wins.
    pub fn fill(&mut self, type_id: impl Into<String>, schema: ConfigSchema) {
        *self = ConfigCache::Ready {
            type_id: type_id.into(),
            schema,
        };
    }

    /// Record a failed fetch. A failure for a type no longer pending is
    /// ignored.
    pub fn fetch_failed(&mut self, failed_type: &str) {
        if let ConfigCache::Pending { type_id, .. } = self {
            if type_id == failed_type {
                *self = ConfigCache::Failed {
                    type_id: failed_type.to_string(),
                };
            }
        }
    }

    pub fn clear(&mut self) {
        *self = ConfigCache::NotFetched;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConfigCache::Pending { .. })
    }

    pub fn has_failed(&self) -> bool {
        matches!(self, ConfigCache::Failed { .. })
    }

    pub fn schema(&self) -> Option<&ConfigSchema> {
        match self {
            ConfigCache::Ready { schema, .. } => Some(schema),
            _ => None,
        }
    }
}
