use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const DEMO_SITE_ID: u64 = 1001;
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Everything the server knows about one site. Activities are stored as
/// raw JSON so tests can seed malformed items.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteFixture {
    pub activities: Vec<Value>,
    pub rewind: Value,
}

#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    /// When set, every request must carry `Authorization: Bearer <token>`.
    pub access_token: Option<String>,
}

pub struct AppState {
    sites: RwLock<HashMap<u64, SiteFixture>>,
    config: MockConfig,
    next_restore_id: AtomicU64,
}

pub type Db = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub page: Option<usize>,
    pub number: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

type ApiFailure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, error: &str, message: &str) -> ApiFailure {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.to_string(),
        }),
    )
}

pub fn app() -> Router {
    app_with(demo_sites(), MockConfig::default())
}

pub fn app_with(sites: HashMap<u64, SiteFixture>, config: MockConfig) -> Router {
    let db: Db = Arc::new(AppState {
        sites: RwLock::new(sites),
        config,
        next_restore_id: AtomicU64::new(1),
    });
    Router::new()
        .route("/wpcom/v2/sites/{site_id}/activity", get(list_activity))
        .route("/wpcom/v2/sites/{site_id}/rewind", get(get_rewind_status))
        .route(
            "/rest/v1/activity-log/{site_id}/rewind-to/{rewind_id}",
            post(rewind_to),
        )
        .with_state(db)
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

/// One site with three rewindable activities and an active rewind state.
pub fn demo_sites() -> HashMap<u64, SiteFixture> {
    let activities = (1..=3)
        .rev()
        .map(|n| {
            json!({
                "activity_id": format!("act-{n}"),
                "summary": "Post published",
                "content": { "text": format!("Post #{n} was published") },
                "name": "post__published",
                "type": "Announce",
                "published": format!("2018-01-1{n}T09:00:00+00:00"),
                "generator": { "jetpack_version": 5.8, "blog_id": DEMO_SITE_ID },
                "is_rewindable": true,
                "rewind_id": format!("151558{n}000.0"),
                "gridicon": "posts",
                "status": "success",
                "actor": {
                    "type": "Person",
                    "name": "Site Admin",
                    "external_user_id": 1,
                    "wpcom_user_id": 4242,
                    "icon": { "type": "Image", "url": "https://example.com/avatar.png", "width": 96, "height": 96 },
                    "role": "administrator"
                }
            })
        })
        .collect();
    let rewind = json!({
        "state": "active",
        "last_updated": "2018-01-13T10:00:00+00:00",
        "can_autoconfigure": false,
        "credentials": [
            { "type": "ssh", "role": "main", "host": "example.com", "port": 22, "still_valid": true }
        ]
    });
    HashMap::from([(DEMO_SITE_ID, SiteFixture { activities, rewind })])
}

fn authorize(db: &AppState, headers: &HeaderMap) -> Result<(), ApiFailure> {
    let Some(expected) = &db.config.access_token else {
        return Ok(());
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(failure(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "An active access token must be used to query information about the current user.",
        ))
    }
}

fn unknown_blog() -> ApiFailure {
    failure(StatusCode::NOT_FOUND, "unknown_blog", "Unknown blog")
}

async fn list_activity(
    State(db): State<Db>,
    Path(site_id): Path<u64>,
    Query(query): Query<ActivityQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiFailure> {
    authorize(&db, &headers)?;
    let sites = db.sites.read().await;
    let site = sites.get(&site_id).ok_or_else(unknown_blog)?;

    let number = query.number.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let page = query.page.unwrap_or(1).max(1);
    let items: Vec<Value> = site
        .activities
        .iter()
        .skip((page - 1).saturating_mul(number))
        .take(number)
        .cloned()
        .collect();

    Ok(Json(json!({
        "totalItems": site.activities.len(),
        "page": page,
        "itemsPerPage": number,
        "summary": "Activity log",
        "current": { "orderedItems": items }
    })))
}

async fn get_rewind_status(
    State(db): State<Db>,
    Path(site_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiFailure> {
    authorize(&db, &headers)?;
    let sites = db.sites.read().await;
    let site = sites.get(&site_id).ok_or_else(unknown_blog)?;
    Ok(Json(site.rewind.clone()))
}

async fn rewind_to(
    State(db): State<Db>,
    Path((site_id, rewind_id)): Path<(u64, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(err) = authorize(&db, &headers) {
        return err.into_response();
    }
    let mut sites = db.sites.write().await;
    let Some(site) = sites.get_mut(&site_id) else {
        return unknown_blog().into_response();
    };

    let known = site
        .activities
        .iter()
        .any(|activity| activity["rewind_id"].as_str() == Some(rewind_id.as_str()));
    if !known {
        return failure(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "The rewind id does not match a rewindable event",
        )
        .into_response();
    }

    let restore_id = db.next_restore_id.fetch_add(1, Ordering::Relaxed);
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    if let Some(status) = site.rewind.as_object_mut() {
        status.insert("last_updated".to_string(), json!(now));
        status.insert(
            "rewind".to_string(),
            json!({
                "rewind_id": rewind_id,
                "restore_id": restore_id,
                "site_id": site_id,
                "status": "queued",
                "started_at": now,
                "progress": 0
            }),
        );
    }
    info!(site_id, %rewind_id, restore_id, "rewind queued");

    Json(json!({ "restore_id": restore_id })).into_response()
}
