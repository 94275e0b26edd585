//! Decodes content-service payloads into uniform entries.
//!
//! The service is inconsistent about shapes: entities arrive flat or wrapped in
//! an `attributes` block, media fields are a single object, a list, or a
//! `{data: ...}` relation, and descriptions are rich-text blocks or plain
//! strings. Every field is decoded through an `untagged` sum type whose last
//! arm accepts anything, so a single odd record never aborts the batch.

use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Deserialize,
};
use serde_json::{Map, Value};
use shared::{
    domain::{CampaignEntry, CatalogEntry},
    protocol::{RawPayload, ENVELOPE_KEY},
};
use thiserror::Error;

use crate::view_model::resolve_media_url;

pub const DESCRIPTION_FALLBACK: &str = "No description available.";

const MEDIA_FIELD: &str = "image";

/// Why a payload carried nothing to show. All variants surface as "empty".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("payload has no `data` envelope")]
    MissingEnvelope,
    #[error("payload `data` is not a sequence")]
    NotASequence,
    #[error("payload `data` is an empty sequence")]
    EmptySequence,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntity {
    Wrapped {
        #[serde(default)]
        id: Value,
        attributes: Map<String, Value>,
    },
    Flat(Map<String, Value>),
    Unknown(IgnoredAny),
}

/// Identity plus attribute block, whichever way the entity was wrapped.
struct EntityFields {
    id: String,
    attributes: Map<String, Value>,
}

impl EntityFields {
    fn decode(raw: &Value) -> Self {
        match RawEntity::deserialize(raw) {
            Ok(RawEntity::Wrapped { id, attributes }) => Self {
                id: render_id(&id),
                attributes,
            },
            Ok(RawEntity::Flat(attributes)) => Self {
                id: attributes.get("id").map(render_id).unwrap_or_default(),
                attributes,
            },
            Ok(RawEntity::Unknown(_)) | Err(_) => Self {
                id: String::new(),
                attributes: Map::new(),
            },
        }
    }

    fn text(&self, key: &str) -> String {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|value| T::deserialize(value).ok())
    }
}

fn render_id(id: &Value) -> String {
    match id {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct MediaAttributes {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MediaObject {
    Wrapped { attributes: MediaAttributes },
    Direct(MediaAttributes),
}

impl MediaObject {
    fn url(&self) -> Option<&str> {
        let attributes = match self {
            Self::Wrapped { attributes } | Self::Direct(attributes) => attributes,
        };
        attributes.url.as_deref()
    }
}

/// Object that carries its own `url`, whatever else it holds.
#[derive(Debug, Deserialize)]
struct MediaLocation {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MediaField {
    Many(Vec<MediaObject>),
    Located(MediaLocation),
    Relation { data: Box<MediaField> },
    One(MediaObject),
    Unknown(IgnoredAny),
}

impl MediaField {
    fn url(&self) -> Option<&str> {
        match self {
            Self::Many(items) => items.first().and_then(MediaObject::url),
            Self::Located(location) => Some(location.url.as_str()),
            Self::Relation { data } => data.url(),
            Self::One(item) => item.url(),
            Self::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RichTextNode {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RichTextBlock {
    #[serde(default)]
    children: Vec<RichTextNode>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionField {
    Blocks(Vec<RichTextBlock>),
    Plain(String),
    Unknown(IgnoredAny),
}

impl DescriptionField {
    /// First text run of the first block, or the plain string.
    fn first_run(&self) -> Option<&str> {
        let text = match self {
            Self::Blocks(blocks) => blocks
                .first()
                .and_then(|block| block.children.first())
                .and_then(|node| node.text.as_deref()),
            Self::Plain(text) => Some(text.as_str()),
            Self::Unknown(_) => None,
        }?;
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceField {
    Number(f64),
    Text(String),
    Unknown(IgnoredAny),
}

impl PriceField {
    fn amount(&self) -> Option<f64> {
        match self {
            Self::Number(amount) => Some(*amount),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Unknown(_) => None,
        }
        .filter(|amount| amount.is_finite())
    }
}

#[derive(Debug, Deserialize)]
struct CategoryAttributes {
    slug: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryField {
    Slug(String),
    Relation { data: Box<CategoryField> },
    Wrapped { attributes: CategoryAttributes },
    Named(CategoryAttributes),
    Unknown(IgnoredAny),
}

impl CategoryField {
    fn slug(&self) -> Option<String> {
        let slug = match self {
            Self::Slug(slug) => Some(slug.clone()),
            Self::Relation { data } => data.slug(),
            Self::Wrapped { attributes } | Self::Named(attributes) => {
                attributes.slug.clone().or_else(|| attributes.name.clone())
            }
            Self::Unknown(_) => None,
        }?;
        let slug = slug.trim().to_string();
        (!slug.is_empty()).then_some(slug)
    }
}

/// Entity list inside the `data` envelope; empty or missing means nothing to show.
pub fn envelope_records(payload: &RawPayload) -> Result<&[Value], NormalizeError> {
    let data = payload
        .get(ENVELOPE_KEY)
        .ok_or(NormalizeError::MissingEnvelope)?;
    let records = data.as_array().ok_or(NormalizeError::NotASequence)?;
    if records.is_empty() {
        return Err(NormalizeError::EmptySequence);
    }
    Ok(records)
}

pub fn normalize_product(raw: &Value, base_url: &str) -> CatalogEntry {
    let entity = EntityFields::decode(raw);
    let description = entity
        .field::<DescriptionField>("description")
        .and_then(|field| field.first_run().map(str::to_string))
        .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string());
    let media_url = entity
        .field::<MediaField>(MEDIA_FIELD)
        .and_then(|field| field.url().and_then(|url| resolve_media_url(base_url, url)));

    CatalogEntry {
        name: entity.text("name"),
        description,
        price: entity
            .field::<PriceField>("price")
            .and_then(|field| field.amount()),
        category: entity
            .field::<CategoryField>("category")
            .and_then(|field| field.slug()),
        media_url,
        id: entity.id,
    }
}

/// One entry per raw record, in response order.
pub fn normalize_products(
    payload: &RawPayload,
    base_url: &str,
) -> Result<Vec<CatalogEntry>, NormalizeError> {
    let records = envelope_records(payload)?;
    Ok(records
        .iter()
        .map(|raw| normalize_product(raw, base_url))
        .collect())
}

pub fn normalize_campaign(raw: &Value) -> CampaignEntry {
    let entity = EntityFields::decode(raw);
    CampaignEntry {
        title: entity.text("title"),
        summary: entity.text("summary"),
        id: entity.id,
    }
}

pub fn normalize_campaigns(payload: &RawPayload) -> Result<Vec<CampaignEntry>, NormalizeError> {
    let records = envelope_records(payload)?;
    Ok(records.iter().map(normalize_campaign).collect())
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
