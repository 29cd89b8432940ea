//! Error types for the activity log client.
//!
//! # Design
//! Each operation has its own error-kind enum so a caller matching on an
//! activity failure never sees a rewind-only kind. The error structs pair
//! a kind with the optional server message and are handed to the dispatch
//! sink inside the result payload rather than returned to the caller.
//! `ApiError` is the one error type returned directly: it rejects caller
//! input before any request is built.

use thiserror::Error;

/// Invalid input passed to a `build_*` method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A page size of zero cannot be turned into a page number.
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// The offset lies past the last page number that fits in a `u32`.
    #[error("offset {offset} is out of range for page size {number}")]
    OffsetOutOfRange { number: u32, offset: u32 },

    /// The rewind point id was empty.
    #[error("rewind id must not be empty")]
    EmptyRewindId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityLogErrorType {
    GenericError,
    AuthorizationRequired,
    InvalidResponse,
    MissingActivityId,
    MissingSummary,
    MissingContentText,
    MissingPublishedDate,
}

impl ActivityLogErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLogErrorType::GenericError => "generic_error",
            ActivityLogErrorType::AuthorizationRequired => "authorization_required",
            ActivityLogErrorType::InvalidResponse => "invalid_response",
            ActivityLogErrorType::MissingActivityId => "missing_activity_id",
            ActivityLogErrorType::MissingSummary => "missing_summary",
            ActivityLogErrorType::MissingContentText => "missing_content_text",
            ActivityLogErrorType::MissingPublishedDate => "missing_published_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewindStatusErrorType {
    GenericError,
    AuthorizationRequired,
    InvalidResponse,
    MissingRewindId,
    InvalidRewindState,
}

impl RewindStatusErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            RewindStatusErrorType::GenericError => "generic_error",
            RewindStatusErrorType::AuthorizationRequired => "authorization_required",
            RewindStatusErrorType::InvalidResponse => "invalid_response",
            RewindStatusErrorType::MissingRewindId => "missing_rewind_id",
            RewindStatusErrorType::InvalidRewindState => "invalid_rewind_state",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewindErrorType {
    GenericError,
    AuthorizationRequired,
    InvalidResponse,
}

impl RewindErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            RewindErrorType::GenericError => "generic_error",
            RewindErrorType::AuthorizationRequired => "authorization_required",
            RewindErrorType::InvalidResponse => "invalid_response",
        }
    }
}

macro_rules! call_error {
    ($(#[$meta:meta])* $name:ident, $kind:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Error)]
        #[error(
            "{}{}",
            .kind.as_str(),
            .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
        )]
        pub struct $name {
            pub kind: $kind,
            pub message: Option<String>,
        }

        impl $name {
            pub fn new(kind: $kind) -> Self {
                Self { kind, message: None }
            }

            pub fn with_message(kind: $kind, message: Option<String>) -> Self {
                Self { kind, message }
            }
        }
    };
}

call_error!(
    /// Failure of an activity page fetch.
    ActivityError,
    ActivityLogErrorType
);
call_error!(
    /// Failure of a rewind status fetch.
    RewindStatusError,
    RewindStatusErrorType
);
call_error!(
    /// Failure of a rewind trigger.
    RewindError,
    RewindErrorType
);
