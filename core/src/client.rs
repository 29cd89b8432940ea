//! Stateless request builder and response parser for the activity log API.
//!
//! # Design
//! `ActivityLogClient` holds only its `ClientConfig`. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that turns the transport outcome into the payload for
//! the dispatch sink. Parse methods never fail: every problem ends up in
//! the payload's `result`.

use tracing::{debug, warn};

use crate::classify::generic_to_error;
use crate::config::ClientConfig;
use crate::dispatch::{FetchedActivityLogPayload, FetchedRewindStatePayload, RewindResultPayload};
use crate::error::{
    ActivityError, ActivityLogErrorType, ApiError, RewindError, RewindErrorType,
    RewindStatusError, RewindStatusErrorType,
};
use crate::http::{HttpMethod, HttpOutcome, HttpRequest};
use crate::mapper::{build_activity_entries, build_rewind_status};
use crate::network::decode_response;
use crate::types::ActivityPage;
use crate::wire::{ActivitiesResponse, RestoreResponse, RewindStatusResponse};

const REST_V1: &str = "/rest/v1";
const WPCOM_V2: &str = "/wpcom/v2";

#[derive(Debug, Clone)]
pub struct ActivityLogClient {
    config: ClientConfig,
}

impl ActivityLogClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_fetch_activity(&self, page: &ActivityPage) -> HttpRequest {
        let page_number = page.page_number();
        debug!(site_id = page.site_id(), page = page_number, number = page.number(), "building activity request");
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}{WPCOM_V2}/sites/{}/activity?page={page_number}&number={}",
                self.config.base_url(),
                page.site_id(),
                page.number()
            ),
            headers: self.config.default_headers(),
            body: None,
        }
    }

    pub fn build_fetch_rewind_status(&self, site_id: u64) -> HttpRequest {
        debug!(site_id, "building rewind status request");
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{WPCOM_V2}/sites/{site_id}/rewind", self.config.base_url()),
            headers: self.config.default_headers(),
            body: None,
        }
    }

    pub fn build_rewind(&self, site_id: u64, rewind_id: &str) -> Result<HttpRequest, ApiError> {
        if rewind_id.is_empty() {
            return Err(ApiError::EmptyRewindId);
        }
        debug!(site_id, rewind_id, "building rewind request");
        let mut headers = self.config.default_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!(
                "{}{REST_V1}/activity-log/{site_id}/rewind-to/{}",
                self.config.base_url(),
                urlencoding::encode(rewind_id)
            ),
            headers,
            body: Some("{}".to_string()),
        })
    }

    pub fn parse_fetch_activity(
        &self,
        page: &ActivityPage,
        outcome: HttpOutcome,
    ) -> FetchedActivityLogPayload {
        let (total_items, result) = match decode_response::<ActivitiesResponse>(outcome) {
            Ok(response) => {
                let total_items = response.total_items.unwrap_or(0);
                let items = response.current.map(|page| page.ordered_items).unwrap_or_default();
                debug!(site_id = page.site_id(), total_items, items = items.len(), "decoded activity page");
                let result = build_activity_entries(items).map_err(ActivityError::new);
                (total_items, result)
            }
            Err(error) => {
                let kind = generic_to_error(
                    &error,
                    ActivityLogErrorType::GenericError,
                    ActivityLogErrorType::InvalidResponse,
                    ActivityLogErrorType::AuthorizationRequired,
                );
                warn!(site_id = page.site_id(), kind = kind.as_str(), %error, "activity fetch failed");
                (0, Err(ActivityError::with_message(kind, error.message)))
            }
        };
        FetchedActivityLogPayload {
            site_id: page.site_id(),
            total_items,
            number: page.number(),
            offset: page.offset(),
            result,
        }
    }

    pub fn parse_fetch_rewind_status(
        &self,
        site_id: u64,
        outcome: HttpOutcome,
    ) -> FetchedRewindStatePayload {
        let result = match decode_response::<RewindStatusResponse>(outcome) {
            Ok(response) => {
                debug!(site_id, state = response.state.as_deref(), "decoded rewind status");
                build_rewind_status(response).map_err(|kind| {
                    warn!(site_id, kind = kind.as_str(), "invalid rewind status");
                    RewindStatusError::new(kind)
                })
            }
            Err(error) => {
                let kind = generic_to_error(
                    &error,
                    RewindStatusErrorType::GenericError,
                    RewindStatusErrorType::InvalidResponse,
                    RewindStatusErrorType::AuthorizationRequired,
                );
                warn!(site_id, kind = kind.as_str(), %error, "rewind status fetch failed");
                Err(RewindStatusError::with_message(kind, error.message))
            }
        };
        FetchedRewindStatePayload { site_id, result }
    }

    pub fn parse_rewind(&self, site_id: u64, outcome: HttpOutcome) -> RewindResultPayload {
        let result = match decode_response::<RestoreResponse>(outcome) {
            Ok(response) => {
                debug!(site_id, restore_id = %response.restore_id, "rewind accepted");
                Ok(response.restore_id)
            }
            Err(error) => {
                let kind = generic_to_error(
                    &error,
                    RewindErrorType::GenericError,
                    RewindErrorType::InvalidResponse,
                    RewindErrorType::AuthorizationRequired,
                );
                warn!(site_id, kind = kind.as_str(), %error, "rewind failed");
                Err(RewindError::with_message(kind, error.message))
            }
        };
        RewindResultPayload { site_id, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::network::{GenericErrorType, NetworkError};
    use crate::types::RewindState;

    fn client() -> ActivityLogClient {
        ActivityLogClient::new(ClientConfig::new("http://localhost:3000"))
    }

    fn ok(body: &str) -> HttpOutcome {
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    fn status(status: u16, body: &str) -> HttpOutcome {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn build_fetch_activity_produces_correct_request() {
        let page = ActivityPage::new(123, 10, 15).unwrap();
        let req = client().build_fetch_activity(&page);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/wpcom/v2/sites/123/activity?page=2&number=10"
        );
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_fetch_rewind_status_produces_correct_request() {
        let req = client().build_fetch_rewind_status(123);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/wpcom/v2/sites/123/rewind");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_rewind_produces_post_with_json_body() {
        let req = client().build_rewind(123, "1515587400.0").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.path,
            "http://localhost:3000/rest/v1/activity-log/123/rewind-to/1515587400.0"
        );
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn build_rewind_escapes_the_rewind_id() {
        let req = client().build_rewind(1, "a/b c").unwrap();
        assert!(req.path.ends_with("/rewind-to/a%2Fb%20c"), "{}", req.path);
    }

    #[test]
    fn build_rewind_rejects_empty_id() {
        assert_eq!(client().build_rewind(1, ""), Err(ApiError::EmptyRewindId));
    }

    #[test]
    fn requests_carry_configured_headers() {
        let client = ActivityLogClient::new(
            ClientConfig::new("http://localhost:3000").with_access_token("tok"),
        );
        let req = client.build_fetch_rewind_status(1);
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn parse_fetch_activity_success_echoes_pagination() {
        let page = ActivityPage::new(5, 20, 40).unwrap();
        let body = r#"{
            "totalItems": 41,
            "summary": "Activity log",
            "current": { "orderedItems": [{
                "activity_id": "a1",
                "summary": "Plugin updated",
                "content": { "text": "Jetpack was updated" },
                "published": "2018-02-01T08:00:00+00:00"
            }] }
        }"#;
        let payload = client().parse_fetch_activity(&page, ok(body));
        assert_eq!(payload.site_id, 5);
        assert_eq!(payload.total_items, 41);
        assert_eq!(payload.number, 20);
        assert_eq!(payload.offset, 40);
        let entries = payload.result.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Jetpack was updated");
    }

    #[test]
    fn parse_fetch_activity_without_page_is_empty() {
        let page = ActivityPage::new(5, 20, 0).unwrap();
        let payload = client().parse_fetch_activity(&page, ok("{}"));
        assert_eq!(payload.total_items, 0);
        assert_eq!(payload.result, Ok(Vec::new()));
    }

    #[test]
    fn parse_fetch_activity_validation_error_keeps_total() {
        let page = ActivityPage::new(5, 20, 0).unwrap();
        let body = r#"{"totalItems": 2, "current": {"orderedItems": [{"summary": "x"}]}}"#;
        let payload = client().parse_fetch_activity(&page, ok(body));
        assert_eq!(payload.total_items, 2);
        let err = payload.result.unwrap_err();
        assert_eq!(err.kind, ActivityLogErrorType::MissingActivityId);
        assert!(err.message.is_none());
    }

    #[test]
    fn parse_fetch_activity_unauthorized() {
        let page = ActivityPage::new(5, 20, 60).unwrap();
        let body = r#"{"error":"unauthorized","message":"Not allowed"}"#;
        let payload = client().parse_fetch_activity(&page, status(403, body));
        assert_eq!(payload.offset, 60);
        let err = payload.result.unwrap_err();
        assert_eq!(err.kind, ActivityLogErrorType::AuthorizationRequired);
        assert_eq!(err.message.as_deref(), Some("Not allowed"));
    }

    #[test]
    fn parse_fetch_activity_malformed_body() {
        let page = ActivityPage::new(5, 20, 0).unwrap();
        let payload = client().parse_fetch_activity(&page, ok("<html>"));
        assert_eq!(payload.result.unwrap_err().kind, ActivityLogErrorType::InvalidResponse);
    }

    #[test]
    fn parse_fetch_rewind_status_success() {
        let body = r#"{"state":"active","last_updated":"2018-02-01T08:00:00Z"}"#;
        let payload = client().parse_fetch_rewind_status(9, ok(body));
        assert_eq!(payload.site_id, 9);
        assert_eq!(payload.result.unwrap().state, RewindState::Active);
    }

    #[test]
    fn parse_fetch_rewind_status_bad_state() {
        let body = r#"{"state":"nope","last_updated":"2018-02-01T08:00:00Z"}"#;
        let payload = client().parse_fetch_rewind_status(9, ok(body));
        assert_eq!(
            payload.result.unwrap_err(),
            RewindStatusError::new(RewindStatusErrorType::InvalidResponse)
        );
    }

    #[test]
    fn parse_fetch_rewind_status_transport_failure() {
        let failure = NetworkError::generic(GenericErrorType::NoConnection, "connection refused");
        let payload = client().parse_fetch_rewind_status(9, Err(failure));
        let err = payload.result.unwrap_err();
        assert_eq!(err.kind, RewindStatusErrorType::GenericError);
        assert_eq!(err.message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn parse_rewind_success() {
        let payload = client().parse_rewind(9, ok(r#"{"restore_id": 31}"#));
        assert_eq!(payload.result, Ok("31".to_string()));
    }

    #[test]
    fn parse_rewind_missing_restore_id_is_invalid_response() {
        let payload = client().parse_rewind(9, ok("{}"));
        assert_eq!(payload.result.unwrap_err().kind, RewindErrorType::InvalidResponse);
    }

    #[test]
    fn parse_rewind_server_error_is_generic() {
        let payload = client().parse_rewind(9, status(500, "oops"));
        let err = payload.result.unwrap_err();
        assert_eq!(err.kind, RewindErrorType::GenericError);
        assert_eq!(err.message.as_deref(), Some("oops"));
    }
}
