// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: an in-process fake Strety API.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strety_bridge::config::Config;
use strety_bridge::services::{CredentialStore, StretyService};
use tempfile::TempDir;

pub const INITIAL_ACCESS: &str = "initial_access";
pub const INITIAL_REFRESH: &str = "initial_refresh";
pub const REFRESHED_ACCESS: &str = "refreshed_access";
pub const REFRESHED_REFRESH: &str = "refreshed_refresh";

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub if_match: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

/// Fake Strety API state. Configure fields before spawning.
pub struct FakeStrety {
    /// Bearer tokens the API accepts.
    pub valid_tokens: Mutex<HashSet<String>>,
    /// Whether a token issued by the refresh endpoint is accepted afterwards.
    pub accept_refreshed: bool,
    /// Whether the refresh endpoint succeeds.
    pub refresh_succeeds: bool,
    /// Whether the refresh endpoint rotates the refresh token.
    pub rotate_refresh: bool,
    /// Delay before answering a refresh (to let concurrent callers queue up).
    pub refresh_delay: Duration,
    pub refresh_calls: AtomicUsize,
    pub refresh_forms: Mutex<Vec<HashMap<String, String>>>,

    pub people: Vec<Value>,
    /// Pages of `/todos`, 1-indexed by `page[number]`.
    pub todo_pages: Vec<Vec<Value>>,
    pub goal_pages: Vec<Vec<Value>>,
    /// Single resources keyed by path (e.g. `/todos/t1`).
    pub resources: HashMap<String, Value>,
    /// ETag returned on single-resource GETs.
    pub etag: Option<String>,
    /// Status for PATCH requests.
    pub patch_status: StatusCode,
    /// Force every API (non-token) request to fail with this status/body.
    pub fail_with: Option<(StatusCode, String)>,

    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for FakeStrety {
    fn default() -> Self {
        Self {
            valid_tokens: Mutex::new(HashSet::from([INITIAL_ACCESS.to_string()])),
            accept_refreshed: true,
            refresh_succeeds: true,
            rotate_refresh: true,
            refresh_delay: Duration::ZERO,
            refresh_calls: AtomicUsize::new(0),
            refresh_forms: Mutex::new(Vec::new()),
            people: Vec::new(),
            todo_pages: Vec::new(),
            goal_pages: Vec::new(),
            resources: HashMap::new(),
            etag: Some("\"v1\"".to_string()),
            patch_status: StatusCode::OK,
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl FakeStrety {
    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests matching a method and exact path.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.recorded()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

pub fn person_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "type": "people",
        "attributes": { "id": id, "name": name, "email": format!("{}@example.com", id) }
    })
}

pub fn todo_json(id: &str, due_date: Option<&str>, completed: bool, assignee: Option<&str>) -> Value {
    json!({
        "id": id,
        "type": "todos",
        "attributes": {
            "id": id,
            "title": format!("Todo {}", id),
            "due_date": due_date,
            "priority": "medium",
            "completed_at": if completed { json!("2026-01-02T00:00:00Z") } else { Value::Null },
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "description": null,
            "description_html": null
        },
        "relationships": {
            "assignee": { "data": assignee.map(|id| json!({ "id": id, "type": "people" })) },
            "space": { "data": null }
        }
    })
}

pub fn goal_json(id: &str, due_date: Option<&str>, completed: bool) -> Value {
    json!({
        "id": id,
        "type": "goals",
        "attributes": {
            "title": format!("Goal {}", id),
            "due_date": due_date,
            "status": "on_track",
            "completed_at": if completed { json!("2026-01-02T00:00:00Z") } else { Value::Null },
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        },
        "relationships": { "assignee": { "data": null } }
    })
}

fn page_response(pages: &[Vec<Value>], query: &HashMap<String, String>) -> Value {
    let number: usize = query
        .get("page[number]")
        .and_then(|n| n.parse().ok())
        .unwrap_or(1);
    let data = pages.get(number.wrapping_sub(1)).cloned().unwrap_or_default();
    let next = (number < pages.len()).then(|| format!("/next?page={}", number + 1));
    json!({
        "data": data,
        "meta": { "total_count": pages.iter().map(Vec::len).sum::<usize>(), "page_size": 20, "page_number": number },
        "links": { "first": "/first", "last": "/last", "prev": null, "next": next }
    })
}

async fn handle(
    State(fake): State<Arc<FakeStrety>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();

    if path.ends_with("/oauth/token") {
        return handle_refresh(&fake, &body).await;
    }

    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header_str(header::AUTHORIZATION);
    fake.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        authorization: authorization.clone(),
        if_match: header_str(header::IF_MATCH),
        accept: header_str(header::ACCEPT),
        content_type: header_str(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    });

    let token = authorization
        .as_deref()
        .and_then(|h| h.strip_prefix("Bearer "))
        .unwrap_or_default();
    if !fake.valid_tokens.lock().unwrap().contains(token) {
        return (StatusCode::UNAUTHORIZED, r#"{"error":"invalid_token"}"#).into_response();
    }

    if let Some((status, body)) = &fake.fail_with {
        return (*status, body.clone()).into_response();
    }

    match (method, path.as_str()) {
        (Method::GET, "/people") => Json(page_response(&[fake.people.clone()], &query)).into_response(),
        (Method::GET, "/todos") => Json(page_response(&fake.todo_pages, &query)).into_response(),
        (Method::GET, "/goals") => Json(page_response(&fake.goal_pages, &query)).into_response(),
        (Method::POST, "/todos") => {
            let mut created = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
            created["data"]["id"] = json!("new1");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        (Method::GET, p) => match fake.resources.get(p) {
            Some(resource) => {
                let mut response = Json(json!({ "data": resource })).into_response();
                if let Some(etag) = &fake.etag {
                    response
                        .headers_mut()
                        .insert(header::ETAG, etag.parse().unwrap());
                }
                response
            }
            None => (StatusCode::NOT_FOUND, r#"{"errors":[{"title":"Not found"}]}"#).into_response(),
        },
        (Method::PATCH, p) => {
            if !fake.patch_status.is_success() {
                return (fake.patch_status, r#"{"errors":[{"title":"Precondition failed"}]}"#)
                    .into_response();
            }
            match fake.resources.get(p) {
                Some(resource) => Json(json!({ "data": resource })).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
        (Method::DELETE, _) => StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn handle_refresh(fake: &FakeStrety, body: &[u8]) -> Response {
    fake.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let form: HashMap<String, String> = String::from_utf8_lossy(body)
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    fake.refresh_forms.lock().unwrap().push(form);

    if !fake.refresh_delay.is_zero() {
        tokio::time::sleep(fake.refresh_delay).await;
    }

    if !fake.refresh_succeeds {
        return (StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#).into_response();
    }

    if fake.accept_refreshed {
        fake.valid_tokens
            .lock()
            .unwrap()
            .insert(REFRESHED_ACCESS.to_string());
    }

    let mut response = json!({ "access_token": REFRESHED_ACCESS, "token_type": "Bearer" });
    if fake.rotate_refresh {
        response["refresh_token"] = json!(REFRESHED_REFRESH);
    }
    Json(response).into_response()
}

/// Serve a fake Strety API on a random local port; returns its base URL.
pub async fn spawn_fake(fake: Arc<FakeStrety>) -> String {
    let app = Router::new().fallback(handle).with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Strety");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A service wired to a fake Strety API with a scratch token directory.
pub struct TestEnv {
    pub fake: Arc<FakeStrety>,
    pub config: Config,
    pub service: StretyService,
    pub dir: TempDir,
}

/// Spawn `fake` and build a service holding `access`/`refresh`.
pub async fn setup_with_tokens(fake: FakeStrety, access: &str, refresh: Option<&str>) -> TestEnv {
    let fake = Arc::new(fake);
    let base = spawn_fake(fake.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::test_default();
    config.api_base = base;
    config.config_dir = dir.path().to_path_buf();

    let credentials = CredentialStore::with_tokens(config.token_path(), access, refresh);
    let service = StretyService::new(&config, credentials).expect("Failed to build service");

    TestEnv {
        fake,
        config,
        service,
        dir,
    }
}

pub async fn setup(fake: FakeStrety) -> TestEnv {
    setup_with_tokens(fake, INITIAL_ACCESS, Some(INITIAL_REFRESH)).await
}
