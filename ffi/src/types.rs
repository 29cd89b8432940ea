//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type using C-compatible representations:
//! `*mut c_char` instead of `String` (null for `None`), pointer + length
//! instead of `Vec`, tri-state `i32` for `Option<bool>` (-1 unknown), and
//! epoch milliseconds for timestamps. Conversions and the matching release
//! code live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use activity_log_core::{
    ActivityActor, ActivityLogEntry, ActivityLogErrorType, Credentials, GenericErrorType,
    HttpMethod, HttpOutcome, HttpResponse, NetworkError, Rewind, RewindErrorType,
    RewindProgressStatus, RewindState, RewindStatus, RewindStatusErrorType,
};

/// Opaque handle to an `ActivityLogClient`.
pub struct FfiActivityLogClient {
    pub(crate) inner: activity_log_core::ActivityLogClient,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Move `s` onto the C heap. Interior NUL bytes are dropped.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|e| {
            let mut bytes = e.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default()
        })
        .into_raw()
}

pub(crate) fn opt_c_string(s: Option<String>) -> *mut c_char {
    s.map(c_string).unwrap_or(std::ptr::null_mut())
}

/// Read a caller-owned C string. Null or invalid UTF-8 yields `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn read_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// # Safety
/// `ptr` must be null or come from `c_string`.
pub(crate) unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

fn tri_state(value: Option<bool>) -> i32 {
    match value {
        None => -1,
        Some(false) => 0,
        Some(true) => 1,
    }
}

fn boxed_slice<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// # Safety
/// `ptr`/`len` must come from `boxed_slice`.
unsafe fn take_boxed_slice<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `activity_build_*` functions. The C caller executes the
/// request and passes the response back through `activity_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: activity_log_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = boxed_slice(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body: opt_c_string(req.body),
        }))
    }

    /// # Safety
    /// `req` must come from `from_core` and not have been freed.
    pub(crate) unsafe fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.path);
            free_c_string(req.body);
            for h in take_boxed_slice(req.headers, req.headers_len) {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// Why no HTTP response is available. `None` means `status` and `body`
/// hold a real response.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FfiTransportError {
    None = 0,
    Timeout = 1,
    NoConnection = 2,
    Network = 3,
}

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this after executing a request. For a transport
/// failure it sets `transport_error` and may put a message in `body`. The
/// FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
    pub transport_error: FfiTransportError,
}

impl FfiHttpResponse {
    /// # Safety
    /// `body` must be null or a NUL-terminated string.
    pub(crate) unsafe fn to_outcome(&self) -> HttpOutcome {
        let body = unsafe { read_c_str(self.body) }.unwrap_or("").to_string();
        let kind = match self.transport_error {
            FfiTransportError::None => {
                return Ok(HttpResponse {
                    status: self.status,
                    headers: Vec::new(),
                    body,
                })
            }
            FfiTransportError::Timeout => GenericErrorType::Timeout,
            FfiTransportError::NoConnection => GenericErrorType::NoConnection,
            FfiTransportError::Network => GenericErrorType::NetworkError,
        };
        Err(NetworkError::generic(kind, body))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiActivityResult`, one per error kind across
/// all three operations.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    GenericError = 1,
    AuthorizationRequired = 2,
    InvalidResponse = 3,
    MissingActivityId = 4,
    MissingSummary = 5,
    MissingContentText = 6,
    MissingPublishedDate = 7,
    MissingRewindId = 8,
    InvalidRewindState = 9,
    InvalidArgument = 10,
    Panic = 11,
    NullArg = 12,
}

impl From<ActivityLogErrorType> for FfiErrorCode {
    fn from(kind: ActivityLogErrorType) -> Self {
        match kind {
            ActivityLogErrorType::GenericError => FfiErrorCode::GenericError,
            ActivityLogErrorType::AuthorizationRequired => FfiErrorCode::AuthorizationRequired,
            ActivityLogErrorType::InvalidResponse => FfiErrorCode::InvalidResponse,
            ActivityLogErrorType::MissingActivityId => FfiErrorCode::MissingActivityId,
            ActivityLogErrorType::MissingSummary => FfiErrorCode::MissingSummary,
            ActivityLogErrorType::MissingContentText => FfiErrorCode::MissingContentText,
            ActivityLogErrorType::MissingPublishedDate => FfiErrorCode::MissingPublishedDate,
        }
    }
}

impl From<RewindStatusErrorType> for FfiErrorCode {
    fn from(kind: RewindStatusErrorType) -> Self {
        match kind {
            RewindStatusErrorType::GenericError => FfiErrorCode::GenericError,
            RewindStatusErrorType::AuthorizationRequired => FfiErrorCode::AuthorizationRequired,
            RewindStatusErrorType::InvalidResponse => FfiErrorCode::InvalidResponse,
            RewindStatusErrorType::MissingRewindId => FfiErrorCode::MissingRewindId,
            RewindStatusErrorType::InvalidRewindState => FfiErrorCode::InvalidRewindState,
        }
    }
}

impl From<RewindErrorType> for FfiErrorCode {
    fn from(kind: RewindErrorType) -> Self {
        match kind {
            RewindErrorType::GenericError => FfiErrorCode::GenericError,
            RewindErrorType::AuthorizationRequired => FfiErrorCode::AuthorizationRequired,
            RewindErrorType::InvalidResponse => FfiErrorCode::InvalidResponse,
        }
    }
}

/// Tag that tells `activity_free_result` what `FfiActivityResult::data`
/// points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    ActivityPage = 1,
    RewindStatus = 2,
    /// `data` is a `char*` holding the restore id.
    RestoreId = 3,
}

#[repr(C)]
pub struct FfiActivityActor {
    pub name: *mut c_char,
    pub actor_type: *mut c_char,
    pub avatar_url: *mut c_char,
    pub role: *mut c_char,
    pub has_external_user_id: bool,
    pub external_user_id: i64,
    pub has_wpcom_user_id: bool,
    pub wpcom_user_id: i64,
}

impl FfiActivityActor {
    fn from_core(actor: ActivityActor) -> *mut Self {
        Box::into_raw(Box::new(FfiActivityActor {
            name: opt_c_string(actor.name),
            actor_type: opt_c_string(actor.actor_type),
            avatar_url: opt_c_string(actor.avatar_url),
            role: opt_c_string(actor.role),
            has_external_user_id: actor.external_user_id.is_some(),
            external_user_id: actor.external_user_id.unwrap_or_default(),
            has_wpcom_user_id: actor.wpcom_user_id.is_some(),
            wpcom_user_id: actor.wpcom_user_id.unwrap_or_default(),
        }))
    }

    unsafe fn free(actor: *mut Self) {
        if actor.is_null() {
            return;
        }
        let actor = unsafe { Box::from_raw(actor) };
        unsafe {
            free_c_string(actor.name);
            free_c_string(actor.actor_type);
            free_c_string(actor.avatar_url);
            free_c_string(actor.role);
        }
    }
}

/// A single activity log entry exposed to C. Optional strings are null
/// when absent; `actor` is null when the event has no actor.
#[repr(C)]
pub struct FfiActivityEntry {
    pub activity_id: *mut c_char,
    pub summary: *mut c_char,
    pub text: *mut c_char,
    pub name: *mut c_char,
    pub entry_type: *mut c_char,
    pub gridicon: *mut c_char,
    pub status: *mut c_char,
    pub rewind_id: *mut c_char,
    pub rewindable: i32,
    pub published_ms: i64,
    pub actor: *mut FfiActivityActor,
}

impl FfiActivityEntry {
    fn from_core(entry: ActivityLogEntry) -> Self {
        FfiActivityEntry {
            activity_id: c_string(entry.activity_id),
            summary: c_string(entry.summary),
            text: c_string(entry.text),
            name: opt_c_string(entry.name),
            entry_type: opt_c_string(entry.entry_type),
            gridicon: opt_c_string(entry.gridicon),
            status: opt_c_string(entry.status),
            rewind_id: opt_c_string(entry.rewind_id),
            rewindable: tri_state(entry.rewindable),
            published_ms: entry.published.timestamp_millis(),
            actor: entry
                .actor
                .map(FfiActivityActor::from_core)
                .unwrap_or(std::ptr::null_mut()),
        }
    }

    unsafe fn free_fields(&self) {
        unsafe {
            free_c_string(self.activity_id);
            free_c_string(self.summary);
            free_c_string(self.text);
            free_c_string(self.name);
            free_c_string(self.entry_type);
            free_c_string(self.gridicon);
            free_c_string(self.status);
            free_c_string(self.rewind_id);
            FfiActivityActor::free(self.actor);
        }
    }
}

/// One fetched page of activities plus the pagination it answers.
#[repr(C)]
pub struct FfiActivityPage {
    pub items: *mut FfiActivityEntry,
    pub len: u32,
    pub total_items: u32,
    pub number: u32,
    pub offset: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiRewindState {
    Active = 0,
    Inactive = 1,
    Unavailable = 2,
    AwaitingCredentials = 3,
    Provisioning = 4,
}

impl From<RewindState> for FfiRewindState {
    fn from(state: RewindState) -> Self {
        match state {
            RewindState::Active => FfiRewindState::Active,
            RewindState::Inactive => FfiRewindState::Inactive,
            RewindState::Unavailable => FfiRewindState::Unavailable,
            RewindState::AwaitingCredentials => FfiRewindState::AwaitingCredentials,
            RewindState::Provisioning => FfiRewindState::Provisioning,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiRewindProgressStatus {
    Queued = 0,
    Running = 1,
    Finished = 2,
    Fail = 3,
}

impl From<RewindProgressStatus> for FfiRewindProgressStatus {
    fn from(status: RewindProgressStatus) -> Self {
        match status {
            RewindProgressStatus::Queued => FfiRewindProgressStatus::Queued,
            RewindProgressStatus::Running => FfiRewindProgressStatus::Running,
            RewindProgressStatus::Finished => FfiRewindProgressStatus::Finished,
            RewindProgressStatus::Fail => FfiRewindProgressStatus::Fail,
        }
    }
}

/// Stored server credentials. `port` is -1 when absent.
#[repr(C)]
pub struct FfiCredentials {
    pub credential_type: *mut c_char,
    pub role: *mut c_char,
    pub host: *mut c_char,
    pub port: i32,
    pub still_valid: bool,
}

impl FfiCredentials {
    fn from_core(credentials: Credentials) -> Self {
        FfiCredentials {
            credential_type: c_string(credentials.credential_type),
            role: c_string(credentials.role),
            host: opt_c_string(credentials.host),
            port: credentials.port.map(i32::from).unwrap_or(-1),
            still_valid: credentials.still_valid,
        }
    }
}

#[repr(C)]
pub struct FfiRewind {
    pub rewind_id: *mut c_char,
    pub restore_id: *mut c_char,
    pub reason: *mut c_char,
    pub status: FfiRewindProgressStatus,
    pub progress: u32,
    pub has_started_at: bool,
    pub started_at_ms: i64,
}

impl FfiRewind {
    fn from_core(rewind: Rewind) -> *mut Self {
        Box::into_raw(Box::new(FfiRewind {
            rewind_id: c_string(rewind.rewind_id),
            restore_id: opt_c_string(rewind.restore_id),
            reason: opt_c_string(rewind.reason),
            status: rewind.status.into(),
            progress: rewind.progress,
            has_started_at: rewind.started_at.is_some(),
            started_at_ms: rewind.started_at.map(|t| t.timestamp_millis()).unwrap_or_default(),
        }))
    }
}

/// A site's rewind status. `credentials` is null with `has_credentials`
/// false when the server sent no list; `rewind` is null when no restore
/// is tracked.
#[repr(C)]
pub struct FfiRewindStatus {
    pub state: FfiRewindState,
    pub reason: *mut c_char,
    pub last_updated_ms: i64,
    pub can_autoconfigure: i32,
    pub has_credentials: bool,
    pub credentials: *mut FfiCredentials,
    pub credentials_len: u32,
    pub rewind: *mut FfiRewind,
}

impl FfiRewindStatus {
    fn from_core(status: RewindStatus) -> *mut Self {
        let has_credentials = status.credentials.is_some();
        let credentials: Vec<FfiCredentials> = status
            .credentials
            .unwrap_or_default()
            .into_iter()
            .map(FfiCredentials::from_core)
            .collect();
        let (credentials, credentials_len) = boxed_slice(credentials);

        Box::into_raw(Box::new(FfiRewindStatus {
            state: status.state.into(),
            reason: opt_c_string(status.reason),
            last_updated_ms: status.last_updated.timestamp_millis(),
            can_autoconfigure: tri_state(status.can_autoconfigure),
            has_credentials,
            credentials,
            credentials_len,
            rewind: status.rewind.map(FfiRewind::from_core).unwrap_or(std::ptr::null_mut()),
        }))
    }

    unsafe fn free(status: *mut Self) {
        let status = unsafe { Box::from_raw(status) };
        unsafe {
            free_c_string(status.reason);
            for c in take_boxed_slice(status.credentials, status.credentials_len) {
                free_c_string(c.credential_type);
                free_c_string(c.role);
                free_c_string(c.host);
            }
            if !status.rewind.is_null() {
                let rewind = Box::from_raw(status.rewind);
                free_c_string(rewind.rewind_id);
                free_c_string(rewind.restore_id);
                free_c_string(rewind.reason);
            }
        }
    }
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag`. On failure `error_code`
/// names the kind, `error_message` carries the server's message when it
/// sent one, and `data` is null.
#[repr(C)]
pub struct FfiActivityResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiActivityResult {
    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiActivityResult {
            error_code,
            error_message,
            data_tag,
            data,
        }))
    }

    pub(crate) fn ok_activity_page(
        entries: Vec<ActivityLogEntry>,
        total_items: u32,
        number: u32,
        offset: u32,
    ) -> *mut Self {
        let items: Vec<FfiActivityEntry> = entries.into_iter().map(FfiActivityEntry::from_core).collect();
        let (items, len) = boxed_slice(items);
        let page = Box::new(FfiActivityPage {
            items,
            len,
            total_items,
            number,
            offset,
        });
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            FfiDataTag::ActivityPage,
            Box::into_raw(page) as *mut c_void,
        )
    }

    pub(crate) fn ok_rewind_status(status: RewindStatus) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            FfiDataTag::RewindStatus,
            FfiRewindStatus::from_core(status) as *mut c_void,
        )
    }

    pub(crate) fn ok_restore_id(restore_id: String) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            FfiDataTag::RestoreId,
            c_string(restore_id) as *mut c_void,
        )
    }

    /// Build an error result from any per-operation error kind.
    pub(crate) fn error(code: impl Into<FfiErrorCode>, message: Option<String>) -> *mut Self {
        Self::boxed(code.into(), opt_c_string(message), FfiDataTag::None, std::ptr::null_mut())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, Some(format!("null argument: {name}")))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, Some(msg.to_string()))
    }

    /// # Safety
    /// `result` must come from one of the constructors above.
    pub(crate) unsafe fn free(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        unsafe {
            free_c_string(result.error_message);
            if result.data.is_null() {
                return;
            }
            match result.data_tag {
                FfiDataTag::ActivityPage => {
                    let page = Box::from_raw(result.data as *mut FfiActivityPage);
                    for entry in take_boxed_slice(page.items, page.len) {
                        entry.free_fields();
                    }
                }
                FfiDataTag::RewindStatus => FfiRewindStatus::free(result.data as *mut FfiRewindStatus),
                FfiDataTag::RestoreId => free_c_string(result.data as *mut c_char),
                FfiDataTag::None => {}
            }
        }
    }
}
