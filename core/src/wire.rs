//! JSON shapes returned by the remote API.
//!
//! Every field the mapper validates is optional here so a missing value
//! reaches the mapper and becomes a typed error instead of a generic
//! deserialization failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct ActivitiesResponse {
    #[serde(rename = "totalItems")]
    pub total_items: Option<u32>,
    pub summary: Option<String>,
    pub current: Option<ActivitiesPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivitiesPage {
    #[serde(rename = "orderedItems", default)]
    pub ordered_items: Vec<ActivityResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityResponse {
    pub activity_id: Option<String>,
    pub summary: Option<String>,
    pub content: Option<Content>,
    pub name: Option<String>,
    pub actor: Option<Actor>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub generator: Option<Generator>,
    pub is_rewindable: Option<bool>,
    pub rewind_id: Option<String>,
    pub gridicon: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    #[serde(rename = "type")]
    pub actor_type: Option<String>,
    pub name: Option<String>,
    pub external_user_id: Option<i64>,
    pub wpcom_user_id: Option<i64>,
    pub icon: Option<Icon>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Icon {
    #[serde(rename = "type")]
    pub icon_type: Option<String>,
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Generator {
    pub jetpack_version: Option<f32>,
    pub blog_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewindStatusResponse {
    pub state: Option<String>,
    pub reason: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub can_autoconfigure: Option<bool>,
    pub credentials: Option<Vec<CredentialsResponse>>,
    pub rewind: Option<RewindResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsResponse {
    #[serde(rename = "type")]
    pub credential_type: String,
    pub role: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub still_valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewindResponse {
    pub rewind_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub restore_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub site_id: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: u32,
    pub reason: Option<String>,
}

/// Body of a successful rewind trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreResponse {
    #[serde(deserialize_with = "id")]
    pub restore_id: String,
}

/// Identifiers arrive as either JSON strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
