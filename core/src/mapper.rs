//! Validation and conversion of wire responses into domain records.
//!
//! # Design
//! Mapping fails closed: a record with a missing required field is never
//! built, and one bad activity discards the whole batch. The functions
//! are pure so the same payload always maps to the same result.

use tracing::warn;

use crate::error::{ActivityLogErrorType, RewindStatusErrorType};
use crate::types::{
    ActivityActor, ActivityLogEntry, Credentials, Rewind, RewindProgressStatus, RewindState,
    RewindStatus,
};
use crate::wire::{ActivityResponse, Actor, CredentialsResponse, RewindResponse, RewindStatusResponse};

/// Map an ordered page of activities.
///
/// Every item is checked. Within an item the first missing field decides
/// the kind; across items a later failure replaces an earlier one.
pub fn build_activity_entries(
    items: Vec<ActivityResponse>,
) -> Result<Vec<ActivityLogEntry>, ActivityLogErrorType> {
    let mut error = None;
    let mut entries = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        match build_activity_entry(item) {
            Ok(entry) => entries.push(entry),
            Err(kind) => {
                warn!(index, kind = kind.as_str(), "dropping activity page: invalid item");
                error = Some(kind);
            }
        }
    }

    match error {
        Some(kind) => Err(kind),
        None => Ok(entries),
    }
}

fn build_activity_entry(item: ActivityResponse) -> Result<ActivityLogEntry, ActivityLogErrorType> {
    let activity_id = item.activity_id.ok_or(ActivityLogErrorType::MissingActivityId)?;
    let summary = item.summary.ok_or(ActivityLogErrorType::MissingSummary)?;
    let text = item
        .content
        .and_then(|content| content.text)
        .ok_or(ActivityLogErrorType::MissingContentText)?;
    let published = item.published.ok_or(ActivityLogErrorType::MissingPublishedDate)?;

    Ok(ActivityLogEntry {
        activity_id,
        summary,
        text,
        name: item.name,
        entry_type: item.activity_type,
        gridicon: item.gridicon,
        status: item.status,
        rewindable: item.is_rewindable,
        rewind_id: item.rewind_id,
        published,
        actor: item.actor.map(build_actor),
    })
}

fn build_actor(actor: Actor) -> ActivityActor {
    ActivityActor {
        name: actor.name,
        actor_type: actor.actor_type,
        external_user_id: actor.external_user_id,
        wpcom_user_id: actor.wpcom_user_id,
        avatar_url: actor.icon.and_then(|icon| icon.url),
        role: actor.role,
    }
}

/// Map a rewind status response, stopping at the first invalid field.
pub fn build_rewind_status(
    response: RewindStatusResponse,
) -> Result<RewindStatus, RewindStatusErrorType> {
    let state = response
        .state
        .as_deref()
        .and_then(RewindState::from_value)
        .ok_or(RewindStatusErrorType::InvalidResponse)?;

    let rewind = response.rewind.map(build_rewind).transpose()?;

    let last_updated = response
        .last_updated
        .ok_or(RewindStatusErrorType::InvalidResponse)?;

    Ok(RewindStatus {
        state,
        reason: response.reason,
        last_updated,
        can_autoconfigure: response.can_autoconfigure,
        credentials: response
            .credentials
            .map(|list| list.into_iter().map(build_credentials).collect()),
        rewind,
    })
}

fn build_rewind(rewind: RewindResponse) -> Result<Rewind, RewindStatusErrorType> {
    let rewind_id = rewind.rewind_id.ok_or(RewindStatusErrorType::MissingRewindId)?;
    let status = rewind
        .status
        .as_deref()
        .and_then(RewindProgressStatus::from_value)
        .ok_or(RewindStatusErrorType::InvalidRewindState)?;

    Ok(Rewind {
        rewind_id,
        restore_id: rewind.restore_id,
        status,
        progress: rewind.progress,
        started_at: rewind.started_at,
        reason: rewind.reason,
    })
}

fn build_credentials(credentials: CredentialsResponse) -> Credentials {
    Credentials {
        credential_type: credentials.credential_type,
        role: credentials.role,
        host: credentials.host,
        port: credentials.port,
        still_valid: credentials.still_valid,
    }
}
