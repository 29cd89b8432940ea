//! C-ABI wrapper around `activity-log-core`.
//!
//! # Overview
//! Exposes the activity log and rewind API through `extern "C"` functions
//! so any language with a C FFI can build requests and parse responses
//! while doing the HTTP itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiActivityResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `activity_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use activity_log_core::{ActivityLogClient, ActivityPage, ClientConfig};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url`. `access_token` may be null for
/// anonymous requests.
///
/// Returns null if `base_url` is null or not valid UTF-8.
/// The caller must free the returned pointer with `activity_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn activity_client_new(
    base_url: *const c_char,
    access_token: *const c_char,
) -> *mut FfiActivityLogClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { read_c_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        let mut config = ClientConfig::new(url);
        if let Some(token) = unsafe { read_c_str(access_token) } {
            config = config.with_access_token(token);
        }
        let client = ActivityLogClient::new(config);
        Box::into_raw(Box::new(FfiActivityLogClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `activity_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn activity_client_free(client: *mut FfiActivityLogClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for one page of a site's activity log.
///
/// Returns null if `client` is null, `number` is zero, or `offset` lies
/// past the last representable page.
/// The caller must free the returned pointer with `activity_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn activity_build_fetch_activity(
    client: *const FfiActivityLogClient,
    site_id: u64,
    number: u32,
    offset: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match ActivityPage::new(site_id, number, offset) {
            Ok(page) => FfiHttpRequest::from_core(client.inner.build_fetch_activity(&page)),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a site's rewind status.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn activity_build_fetch_rewind_status(
    client: *const FfiActivityLogClient,
    site_id: u64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_fetch_rewind_status(site_id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request that restores a site to `rewind_id`.
///
/// Returns null if `client` or `rewind_id` is null, or if `rewind_id` is
/// empty.
#[unsafe(no_mangle)]
pub extern "C" fn activity_build_rewind(
    client: *const FfiActivityLogClient,
    site_id: u64,
    rewind_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(rewind_id) = (unsafe { read_c_str(rewind_id) }) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        match client.inner.build_rewind(site_id, rewind_id) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Parse the response to an activity page request.
///
/// `number` and `offset` must match the values the request was built with.
/// Returns a result with `data_tag = ActivityPage` on success.
#[unsafe(no_mangle)]
pub extern "C" fn activity_parse_fetch_activity(
    client: *const FfiActivityLogClient,
    site_id: u64,
    number: u32,
    offset: u32,
    response: *const FfiHttpResponse,
) -> *mut FfiActivityResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiActivityResult::null_arg("client");
        }
        if response.is_null() {
            return FfiActivityResult::null_arg("response");
        }
        let page = match ActivityPage::new(site_id, number, offset) {
            Ok(page) => page,
            Err(e) => return FfiActivityResult::error(FfiErrorCode::InvalidArgument, Some(e.to_string())),
        };
        let client = unsafe { &*client };
        let outcome = unsafe { (*response).to_outcome() };
        let payload = client.inner.parse_fetch_activity(&page, outcome);
        match payload.result {
            Ok(entries) => FfiActivityResult::ok_activity_page(
                entries,
                payload.total_items,
                payload.number,
                payload.offset,
            ),
            Err(e) => FfiActivityResult::error(e.kind, e.message),
        }
    })
    .unwrap_or_else(|_| FfiActivityResult::panic("panic in activity_parse_fetch_activity"))
}

/// Parse the response to a rewind status request.
///
/// Returns a result with `data_tag = RewindStatus` on success.
#[unsafe(no_mangle)]
pub extern "C" fn activity_parse_fetch_rewind_status(
    client: *const FfiActivityLogClient,
    site_id: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiActivityResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiActivityResult::null_arg("client");
        }
        if response.is_null() {
            return FfiActivityResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = unsafe { (*response).to_outcome() };
        match client.inner.parse_fetch_rewind_status(site_id, outcome).result {
            Ok(status) => FfiActivityResult::ok_rewind_status(status),
            Err(e) => FfiActivityResult::error(e.kind, e.message),
        }
    })
    .unwrap_or_else(|_| FfiActivityResult::panic("panic in activity_parse_fetch_rewind_status"))
}

/// Parse the response to a rewind request.
///
/// Returns a result with `data_tag = RestoreId` on success; `data` is then
/// a `char*` holding the restore id.
#[unsafe(no_mangle)]
pub extern "C" fn activity_parse_rewind(
    client: *const FfiActivityLogClient,
    site_id: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiActivityResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiActivityResult::null_arg("client");
        }
        if response.is_null() {
            return FfiActivityResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = unsafe { (*response).to_outcome() };
        match client.inner.parse_rewind(site_id, outcome).result {
            Ok(restore_id) => FfiActivityResult::ok_restore_id(restore_id),
            Err(e) => FfiActivityResult::error(e.kind, e.message),
        }
    })
    .unwrap_or_else(|_| FfiActivityResult::panic("panic in activity_parse_rewind"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `activity_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn activity_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::free(req) });
}

/// Free an `FfiActivityResult` returned by any `activity_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn activity_free_result(result: *mut FfiActivityResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiActivityResult::free(result) });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    const BASE: &str = "http://localhost:3000";

    fn new_client(token: Option<&str>) -> *mut FfiActivityLogClient {
        let url = CString::new(BASE).unwrap();
        let token = token.map(|t| CString::new(t).unwrap());
        activity_client_new(
            url.as_ptr(),
            token.as_ref().map_or(std::ptr::null(), |t| t.as_ptr()),
        )
    }

    fn text<'a>(ptr: *const c_char) -> &'a str {
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn headers<'a>(req: &FfiHttpRequest) -> Vec<(&'a str, &'a str)> {
        if req.headers_len == 0 {
            return Vec::new();
        }
        let slice = unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) };
        slice.iter().map(|h| (text(h.key), text(h.value))).collect()
    }

    fn response(status: u16, body: &CString) -> FfiHttpResponse {
        FfiHttpResponse {
            status,
            body: body.as_ptr(),
            transport_error: FfiTransportError::None,
        }
    }

    const ACTIVITY_BODY: &str = r#"{
        "totalItems": 2,
        "current": { "orderedItems": [
            {
                "activity_id": "act-2",
                "summary": "Post published",
                "content": { "text": "Hello" },
                "name": "post__published",
                "type": "Announce",
                "gridicon": "posts",
                "status": "success",
                "is_rewindable": true,
                "rewind_id": "1515582000.0",
                "published": "2018-01-10T12:30:00Z",
                "actor": {
                    "type": "Person",
                    "name": "Ana",
                    "wpcom_user_id": 4242,
                    "icon": { "url": "https://example.com/a.png" },
                    "role": "administrator"
                }
            },
            {
                "activity_id": "act-1",
                "summary": "Plugin updated",
                "content": { "text": "Jetpack" },
                "published": "2018-01-10T12:00:00Z"
            }
        ]}
    }"#;

    const REWIND_STATUS_BODY: &str = r#"{
        "state": "active",
        "last_updated": "2018-01-10T12:30:00Z",
        "can_autoconfigure": false,
        "credentials": [
            { "type": "ssh", "role": "main", "host": "example.com", "port": 22, "still_valid": true }
        ],
        "rewind": {
            "rewind_id": "1515582000.0",
            "restore_id": 7,
            "status": "running",
            "progress": 40,
            "started_at": "2018-01-10T12:31:00Z"
        }
    }"#;

    // --- lifecycle ---

    #[test]
    fn client_new_and_free() {
        let client = new_client(None);
        assert!(!client.is_null());
        activity_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let client = activity_client_new(std::ptr::null(), std::ptr::null());
        assert!(client.is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        activity_client_free(std::ptr::null_mut());
    }

    // --- build ---

    #[test]
    fn build_fetch_activity_returns_paged_get() {
        let client = new_client(None);
        let req = activity_build_fetch_activity(client, 42, 20, 40);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        assert_eq!(
            text(req_ref.path),
            "http://localhost:3000/wpcom/v2/sites/42/activity?page=3&number=20"
        );
        assert!(req_ref.body.is_null());

        activity_free_request(req);
        activity_client_free(client);
    }

    #[test]
    fn build_fetch_activity_zero_page_size_returns_null() {
        let client = new_client(None);
        assert!(activity_build_fetch_activity(client, 42, 0, 0).is_null());
        assert!(activity_build_fetch_activity(client, 42, 1, u32::MAX).is_null());
        activity_client_free(client);
    }

    #[test]
    fn build_fetch_activity_null_client_returns_null() {
        assert!(activity_build_fetch_activity(std::ptr::null(), 42, 20, 0).is_null());
    }

    #[test]
    fn build_fetch_rewind_status_carries_bearer_token() {
        let client = new_client(Some("tok"));
        let req = activity_build_fetch_rewind_status(client, 42);
        let req_ref = unsafe { &*req };

        assert_eq!(text(req_ref.path), "http://localhost:3000/wpcom/v2/sites/42/rewind");
        assert!(headers(req_ref).contains(&("authorization", "Bearer tok")));

        activity_free_request(req);
        activity_client_free(client);
    }

    #[test]
    fn build_rewind_produces_post_with_empty_object() {
        let client = new_client(None);
        let rewind_id = CString::new("1515582000.0").unwrap();
        let req = activity_build_rewind(client, 42, rewind_id.as_ptr());
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Post));
        assert_eq!(
            text(req_ref.path),
            "http://localhost:3000/rest/v1/activity-log/42/rewind-to/1515582000.0"
        );
        assert_eq!(text(req_ref.body), "{}");

        activity_free_request(req);
        activity_client_free(client);
    }

    #[test]
    fn build_rewind_rejects_null_and_empty_id() {
        let client = new_client(None);
        let empty = CString::new("").unwrap();
        assert!(activity_build_rewind(client, 42, std::ptr::null()).is_null());
        assert!(activity_build_rewind(client, 42, empty.as_ptr()).is_null());
        activity_client_free(client);
    }

    // --- parse activity ---

    #[test]
    fn parse_fetch_activity_success() {
        let client = new_client(None);
        let body = CString::new(ACTIVITY_BODY).unwrap();
        let resp = response(200, &body);
        let result = activity_parse_fetch_activity(client, 42, 20, 0, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.data_tag, FfiDataTag::ActivityPage);

        let page = unsafe { &*(r.data as *const FfiActivityPage) };
        assert_eq!((page.len, page.total_items, page.number, page.offset), (2, 2, 20, 0));

        let items = unsafe { std::slice::from_raw_parts(page.items, page.len as usize) };
        assert_eq!(text(items[0].activity_id), "act-2");
        assert_eq!(text(items[0].rewind_id), "1515582000.0");
        assert_eq!(items[0].rewindable, 1);
        assert_eq!(items[0].published_ms, 1_515_587_400_000);
        let actor = unsafe { &*items[0].actor };
        assert_eq!(text(actor.name), "Ana");
        assert_eq!(text(actor.avatar_url), "https://example.com/a.png");
        assert!(actor.has_wpcom_user_id);
        assert_eq!(actor.wpcom_user_id, 4242);
        assert!(!actor.has_external_user_id);

        assert_eq!(text(items[1].text), "Jetpack");
        assert!(items[1].rewind_id.is_null());
        assert_eq!(items[1].rewindable, -1);
        assert!(items[1].actor.is_null());

        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn parse_fetch_activity_missing_summary() {
        let client = new_client(None);
        let body = CString::new(
            r#"{"totalItems":1,"current":{"orderedItems":[
                {"activity_id":"a","content":{"text":"t"},"published":"2018-01-10T12:30:00Z"}
            ]}}"#,
        )
        .unwrap();
        let resp = response(200, &body);
        let result = activity_parse_fetch_activity(client, 42, 20, 0, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::MissingSummary);
        assert_eq!(r.data_tag, FfiDataTag::None);
        assert!(r.data.is_null());

        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn parse_fetch_activity_unauthorized_keeps_server_message() {
        let client = new_client(None);
        let body =
            CString::new(r#"{"error":"unauthorized","message":"User cannot access activity"}"#)
                .unwrap();
        let resp = response(403, &body);
        let result = activity_parse_fetch_activity(client, 42, 20, 0, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::AuthorizationRequired);
        assert_eq!(text(r.error_message), "User cannot access activity");

        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn parse_fetch_activity_zero_page_size_is_invalid_argument() {
        let client = new_client(None);
        let body = CString::new(ACTIVITY_BODY).unwrap();
        let resp = response(200, &body);
        let result = activity_parse_fetch_activity(client, 42, 0, 0, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidArgument);
        assert!(!r.error_message.is_null());

        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn parse_transport_failure_is_generic_error() {
        let client = new_client(None);
        let body = CString::new("connection refused").unwrap();
        let resp = FfiHttpResponse {
            status: 0,
            body: body.as_ptr(),
            transport_error: FfiTransportError::NoConnection,
        };
        let result = activity_parse_fetch_activity(client, 42, 20, 0, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::GenericError);
        assert_eq!(text(r.error_message), "connection refused");

        activity_free_result(result);
        activity_client_free(client);
    }

    // --- parse rewind status ---

    #[test]
    fn parse_fetch_rewind_status_success() {
        let client = new_client(None);
        let body = CString::new(REWIND_STATUS_BODY).unwrap();
        let resp = response(200, &body);
        let result = activity_parse_fetch_rewind_status(client, 42, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::RewindStatus);

        let status = unsafe { &*(r.data as *const FfiRewindStatus) };
        assert_eq!(status.state, FfiRewindState::Active);
        assert!(status.reason.is_null());
        assert_eq!(status.can_autoconfigure, 0);
        assert!(status.has_credentials);
        assert_eq!(status.credentials_len, 1);
        let credentials = unsafe { &*status.credentials };
        assert_eq!(text(credentials.credential_type), "ssh");
        assert_eq!(credentials.port, 22);
        assert!(credentials.still_valid);

        let rewind = unsafe { &*status.rewind };
        assert_eq!(text(rewind.rewind_id), "1515582000.0");
        assert_eq!(text(rewind.restore_id), "7");
        assert_eq!(rewind.status, FfiRewindProgressStatus::Running);
        assert_eq!(rewind.progress, 40);
        assert!(rewind.has_started_at);

        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn parse_fetch_rewind_status_unknown_progress_status() {
        let client = new_client(None);
        let body = CString::new(
            r#"{"state":"active","last_updated":"2018-01-10T12:30:00Z",
                "rewind":{"rewind_id":"r1","status":"paused"}}"#,
        )
        .unwrap();
        let resp = response(200, &body);
        let result = activity_parse_fetch_rewind_status(client, 42, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidRewindState);
        assert!(r.data.is_null());

        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn parse_fetch_rewind_status_unknown_state_is_invalid_response() {
        let client = new_client(None);
        let body =
            CString::new(r#"{"state":"sleeping","last_updated":"2018-01-10T12:30:00Z"}"#).unwrap();
        let resp = response(200, &body);
        let result = activity_parse_fetch_rewind_status(client, 42, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidResponse);

        activity_free_result(result);
        activity_client_free(client);
    }

    // --- parse rewind ---

    #[test]
    fn parse_rewind_success_returns_restore_id() {
        let client = new_client(None);
        let body = CString::new(r#"{"restore_id":12}"#).unwrap();
        let resp = response(200, &body);
        let result = activity_parse_rewind(client, 42, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::RestoreId);
        assert_eq!(text(r.data as *const c_char), "12");

        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn parse_rewind_malformed_body_is_invalid_response() {
        let client = new_client(None);
        let body = CString::new("not json").unwrap();
        let resp = response(200, &body);
        let result = activity_parse_rewind(client, 42, &resp);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidResponse);

        activity_free_result(result);
        activity_client_free(client);
    }

    // --- null handling ---

    #[test]
    fn parse_null_client_returns_null_arg() {
        let body = CString::new("{}").unwrap();
        let resp = response(200, &body);
        let result = activity_parse_rewind(std::ptr::null(), 42, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert_eq!(text(r.error_message), "null argument: client");
        activity_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client(None);
        let result = activity_parse_fetch_rewind_status(client, 42, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        activity_free_result(result);
        activity_client_free(client);
    }

    #[test]
    fn free_request_null_is_safe() {
        activity_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        activity_free_result(std::ptr::null_mut());
    }
}
