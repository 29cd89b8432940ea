//! Maps a `NetworkError` onto an operation's own error kind.

use crate::network::{GenericErrorType, NetworkError};

/// API error code the server sends when the token lacks access to a site.
pub const UNAUTHORIZED_API_ERROR: &str = "unauthorized";

/// Pick one of the three call-specific kinds for a transport failure.
///
/// The checks run in sequence and each one overwrites the previous pick,
/// so an `"unauthorized"` API error wins even when the error is also a
/// generic invalid-response failure.
pub fn generic_to_error<T>(
    error: &NetworkError,
    generic: T,
    invalid_response: T,
    authorization_required: T,
) -> T {
    let mut kind = generic;
    if error.is_generic() && error.kind == GenericErrorType::InvalidResponse {
        kind = invalid_response;
    }
    if error.api_error.as_deref() == Some(UNAUTHORIZED_API_ERROR) {
        kind = authorization_required;
    }
    kind
}
