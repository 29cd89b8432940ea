//! Client core for a blogging platform's Activity Log and Rewind API.
//!
//! # Overview
//! Fetches pages of site activity, reads a site's rewind (restore) status,
//! and triggers a rewind to an earlier point. Responses are validated into
//! domain records and every call ends with exactly one typed payload handed
//! to a caller-supplied `Dispatcher`.
//!
//! # Design
//! - `ActivityLogClient` is stateless and does no I/O: `build_*` produces an
//!   `HttpRequest`, `parse_*` turns the transport outcome into a payload.
//! - `ActivityLogRestClient` composes the two around a host `Transport`.
//! - Mapping fails closed (`mapper`); transport failures are folded into
//!   each operation's own error kinds by `classify::generic_to_error`.
//! - Wire DTOs (`wire`) are kept apart from domain records (`types`);
//!   integration tests against the mock server catch schema drift.

pub mod classify;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod mapper;
pub mod network;
pub mod rest;
pub mod types;
pub mod wire;

pub use classify::generic_to_error;
pub use client::ActivityLogClient;
pub use config::ClientConfig;
pub use dispatch::{
    ActivityLogAction, Dispatcher, FetchedActivityLogPayload, FetchedRewindStatePayload,
    RewindResultPayload,
};
pub use error::{
    ActivityError, ActivityLogErrorType, ApiError, RewindError, RewindErrorType,
    RewindStatusError, RewindStatusErrorType,
};
pub use http::{HttpMethod, HttpOutcome, HttpRequest, HttpResponse, Transport};
pub use network::{GenericErrorType, NetworkError};
pub use rest::ActivityLogRestClient;
pub use types::{
    ActivityActor, ActivityLogEntry, ActivityPage, Credentials, Rewind, RewindProgressStatus,
    RewindState, RewindStatus,
};
