//! Result payloads and the sink they are delivered to.
//!
//! # Design
//! Every operation produces exactly one `ActivityLogAction`. The sink is
//! passed into each call instead of living in a global, so tests can use
//! a channel and hosts can forward to whatever event loop they run.

use std::sync::mpsc::{Sender, SyncSender};

use crate::error::{ActivityError, RewindError, RewindStatusError};
use crate::types::{ActivityLogEntry, RewindStatus};

/// Outcome of an activity page fetch. The pagination fields echo the
/// request so a failed page can be retried as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedActivityLogPayload {
    pub site_id: u64,
    pub total_items: u32,
    pub number: u32,
    pub offset: u32,
    pub result: Result<Vec<ActivityLogEntry>, ActivityError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRewindStatePayload {
    pub site_id: u64,
    pub result: Result<RewindStatus, RewindStatusError>,
}

/// Outcome of a rewind trigger; `Ok` holds the restore id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewindResultPayload {
    pub site_id: u64,
    pub result: Result<String, RewindError>,
}

/// One finished call, keyed by operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityLogAction {
    FetchedActivities(FetchedActivityLogPayload),
    FetchedRewindState(FetchedRewindStatePayload),
    RewindResult(RewindResultPayload),
}

impl ActivityLogAction {
    pub fn site_id(&self) -> u64 {
        match self {
            ActivityLogAction::FetchedActivities(p) => p.site_id,
            ActivityLogAction::FetchedRewindState(p) => p.site_id,
            ActivityLogAction::RewindResult(p) => p.site_id,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            ActivityLogAction::FetchedActivities(p) => p.result.is_err(),
            ActivityLogAction::FetchedRewindState(p) => p.result.is_err(),
            ActivityLogAction::RewindResult(p) => p.result.is_err(),
        }
    }
}

/// Receives finished payloads.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, action: ActivityLogAction);
}

impl<F> Dispatcher for F
where
    F: Fn(ActivityLogAction) + Send + Sync,
{
    fn dispatch(&self, action: ActivityLogAction) {
        self(action)
    }
}

impl Dispatcher for SyncSender<ActivityLogAction> {
    fn dispatch(&self, action: ActivityLogAction) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(action);
    }
}

impl Dispatcher for Sender<ActivityLogAction> {
    fn dispatch(&self, action: ActivityLogAction) {
        let _ = self.send(action);
    }
}
