//! Request orchestration: build, execute, parse, dispatch.
//!
//! # Design
//! `ActivityLogRestClient` wires an `ActivityLogClient` to a `Transport`.
//! Each operation runs one round-trip and hands exactly one action to the
//! sink it was given, including when the caller's input was rejected
//! before a request could be built. Nothing is retried and no state is
//! kept between calls, so operations may run concurrently from any thread.

use tracing::warn;

use crate::client::ActivityLogClient;
use crate::config::ClientConfig;
use crate::dispatch::{
    ActivityLogAction, Dispatcher, FetchedActivityLogPayload, RewindResultPayload,
};
use crate::error::{ActivityError, ActivityLogErrorType, RewindError, RewindErrorType};
use crate::http::Transport;
use crate::types::ActivityPage;

pub struct ActivityLogRestClient<T> {
    client: ActivityLogClient,
    transport: T,
}

impl<T: Transport> ActivityLogRestClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ActivityLogClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ActivityLogClient {
        &self.client
    }

    /// Fetch the page of activities containing `offset`.
    pub fn fetch_activity(&self, site_id: u64, number: u32, offset: u32, sink: &dyn Dispatcher) {
        let payload = match ActivityPage::new(site_id, number, offset) {
            Ok(page) => {
                let request = self.client.build_fetch_activity(&page);
                self.client.parse_fetch_activity(&page, self.transport.execute(request))
            }
            Err(error) => {
                warn!(site_id, number, offset, %error, "activity fetch rejected");
                FetchedActivityLogPayload {
                    site_id,
                    total_items: 0,
                    number,
                    offset,
                    result: Err(ActivityError::with_message(
                        ActivityLogErrorType::GenericError,
                        Some(error.to_string()),
                    )),
                }
            }
        };
        sink.dispatch(ActivityLogAction::FetchedActivities(payload));
    }

    pub fn fetch_rewind_status(&self, site_id: u64, sink: &dyn Dispatcher) {
        let request = self.client.build_fetch_rewind_status(site_id);
        let payload = self
            .client
            .parse_fetch_rewind_status(site_id, self.transport.execute(request));
        sink.dispatch(ActivityLogAction::FetchedRewindState(payload));
    }

    /// Start restoring `site_id` to the point identified by `rewind_id`.
    pub fn rewind(&self, site_id: u64, rewind_id: &str, sink: &dyn Dispatcher) {
        let payload = match self.client.build_rewind(site_id, rewind_id) {
            Ok(request) => self.client.parse_rewind(site_id, self.transport.execute(request)),
            Err(error) => {
                warn!(site_id, %error, "rewind rejected");
                RewindResultPayload {
                    site_id,
                    result: Err(RewindError::with_message(
                        RewindErrorType::GenericError,
                        Some(error.to_string()),
                    )),
                }
            }
        };
        sink.dispatch(ActivityLogAction::RewindResult(payload));
    }
}
