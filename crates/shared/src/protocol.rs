use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wrapper key the content service uses on both reads and writes.
pub const ENVELOPE_KEY: &str = "data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Response body exactly as received; shape is resolved by the normalizer.
pub type RawPayload = Value;

/// Field values submitted by a form, sent as `{"data": {...}}`.
pub type RecordPayload = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub expand_relations: Vec<String>,
}

impl CollectionQuery {
    pub fn populate(relation: impl Into<String>) -> Self {
        Self {
            expand_relations: vec![relation.into()],
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.expand_relations
            .iter()
            .map(|relation| ("populate", relation.as_str()))
            .collect()
    }
}
