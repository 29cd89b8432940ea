//! Domain records produced by the response mapper.
//!
//! # Design
//! These types are defined independently from the wire DTOs in `wire`.
//! Required fields are non-optional here; the mapper refuses to build a
//! record when the server omitted one. Everything is owned and immutable
//! once constructed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One page of the activity log to fetch.
///
/// `number` is the page size and is never zero, and `offset / number` is
/// below `u32::MAX`, so `page_number` can neither divide by zero nor
/// overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityPage {
    site_id: u64,
    number: u32,
    offset: u32,
}

impl ActivityPage {
    pub fn new(site_id: u64, number: u32, offset: u32) -> Result<Self, ApiError> {
        if number == 0 {
            return Err(ApiError::InvalidPageSize);
        }
        if offset / number == u32::MAX {
            return Err(ApiError::OffsetOutOfRange { number, offset });
        }
        Ok(Self {
            site_id,
            number,
            offset,
        })
    }

    pub fn site_id(&self) -> u64 {
        self.site_id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// 1-based page index for `offset`, rounding down to the page that
    /// contains it.
    pub fn page_number(&self) -> u32 {
        self.offset / self.number + 1
    }
}

/// A single site event from the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub activity_id: String,
    pub summary: String,
    pub text: String,
    pub name: Option<String>,
    pub entry_type: Option<String>,
    pub gridicon: Option<String>,
    pub status: Option<String>,
    pub rewindable: Option<bool>,
    pub rewind_id: Option<String>,
    pub published: DateTime<Utc>,
    pub actor: Option<ActivityActor>,
}

/// Who performed an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityActor {
    pub name: Option<String>,
    pub actor_type: Option<String>,
    pub external_user_id: Option<i64>,
    pub wpcom_user_id: Option<i64>,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
}

/// Overall availability of rewind on a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewindState {
    Active,
    Inactive,
    Unavailable,
    AwaitingCredentials,
    Provisioning,
}

impl RewindState {
    /// Parse the wire value; unknown strings yield `None`.
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "active" => Some(RewindState::Active),
            "inactive" => Some(RewindState::Inactive),
            "unavailable" => Some(RewindState::Unavailable),
            "awaiting_credentials" => Some(RewindState::AwaitingCredentials),
            "provisioning" => Some(RewindState::Provisioning),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RewindState::Active => "active",
            RewindState::Inactive => "inactive",
            RewindState::Unavailable => "unavailable",
            RewindState::AwaitingCredentials => "awaiting_credentials",
            RewindState::Provisioning => "provisioning",
        }
    }
}

/// Progress of an in-flight or finished restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewindProgressStatus {
    Queued,
    Running,
    Finished,
    Fail,
}

impl RewindProgressStatus {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "queued" => Some(RewindProgressStatus::Queued),
            "running" => Some(RewindProgressStatus::Running),
            "finished" => Some(RewindProgressStatus::Finished),
            "fail" => Some(RewindProgressStatus::Fail),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RewindProgressStatus::Queued => "queued",
            RewindProgressStatus::Running => "running",
            RewindProgressStatus::Finished => "finished",
            RewindProgressStatus::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewindStatus {
    pub state: RewindState,
    pub reason: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub can_autoconfigure: Option<bool>,
    pub credentials: Option<Vec<Credentials>>,
    pub rewind: Option<Rewind>,
}

/// Server credentials stored for a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub credential_type: String,
    pub role: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub still_valid: bool,
}

/// The restore currently tracked by a site's rewind status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewind {
    pub rewind_id: String,
    pub restore_id: Option<String>,
    pub status: RewindProgressStatus,
    pub progress: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}
