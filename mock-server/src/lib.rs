//! In-memory stand-in for the Directus items API.
//!
//! # Design
//! Collections are created on first insert and hold items in insertion
//! order. Item ids are taken from the payload when present, otherwise the
//! next unused integer is assigned. Ids are unique per collection. Every response uses the Directus
//! envelopes: `{data, meta}` on success and `{errors: [..]}` on failure.
//!
//! When built with a token, `/items` routes require
//! `Authorization: Bearer <token>`; `/server` routes stay public.

pub mod query;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use query::Item;
use query::{matches, project, search_matches, sort_items, ListQuery};

pub type Db = Arc<RwLock<HashMap<String, Vec<Item>>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    token: Option<Arc<str>>,
    next_id: Arc<AtomicU64>,
    service_id: Uuid,
}

impl AppState {
    fn new(token: Option<String>) -> Self {
        Self {
            db: Arc::new(RwLock::new(HashMap::new())),
            token: token.map(Arc::from),
            next_id: Arc::new(AtomicU64::new(1)),
            service_id: Uuid::new_v4(),
        }
    }

    /// A supplied id is kept; otherwise the next counter value that is not
    /// in `taken`.
    fn assign_id(&self, item: &mut Item, taken: &HashSet<String>) -> Value {
        if let Some(id) = item.get("id").filter(|id| !id.is_null()) {
            return id.clone();
        }
        let id = loop {
            let candidate = self.next_id.fetch_add(1, Ordering::Relaxed);
            if !taken.contains(&candidate.to_string()) {
                break Value::from(candidate);
            }
        };
        item.insert("id".to_string(), id.clone());
        id
    }
}

/// Directus error envelope with a single entry.
#[derive(Debug)]
pub struct ErrorResponse {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ErrorResponse {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", message)
    }

    fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_QUERY", message)
    }

    fn item_not_found(collection: &str, id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Item \"{id}\" not found in collection \"{collection}\"."),
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let body = json!({
            "errors": [{
                "message": self.message,
                "extensions": {"code": self.code}
            }]
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_payload(rejection.body_text())
    }
}

pub fn app() -> Router {
    app_with_token(None)
}

/// `token`, when set, is the only accepted static access token.
pub fn app_with_token(token: Option<String>) -> Router {
    let state = AppState::new(token);
    let items = Router::new()
        .route(
            "/items/{collection}",
            get(list_items)
                .post(create_items)
                .patch(update_items)
                .delete(delete_items),
        )
        .route(
            "/items/{collection}/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .merge(items)
        .route("/server/ping", get(ping))
        .route("/server/health", get(health))
        .fallback(route_not_found)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_token(listener, None).await
}

pub async fn run_with_token(listener: TcpListener, token: Option<String>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.token.as_deref() else {
        return next.run(request).await;
    };
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(expected);
    if authorized {
        return next.run(request).await;
    }
    tracing::warn!(path = %request.uri().path(), "rejected request without a valid token");
    ErrorResponse::new(
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
        "Invalid user credentials.",
    )
    .into_response()
}

/// Ids in path form: strings as-is, numbers in decimal.
fn id_key(id: &Value) -> String {
    id.as_str().map(str::to_string).unwrap_or_else(|| id.to_string())
}

fn id_matches(item: &Item, id: &str) -> bool {
    match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn object(value: Value) -> Result<Item, ErrorResponse> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ErrorResponse::invalid_payload(format!(
            "Expected an object, got {other}"
        ))),
    }
}

async fn list_items(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ErrorResponse> {
    let query = ListQuery::parse(&params).map_err(ErrorResponse::invalid_query)?;
    let db = state.db.read().await;
    let all = db.get(&collection).map(Vec::as_slice).unwrap_or_default();

    let mut selected = Vec::new();
    for item in all {
        if let Some(filter) = &query.filter {
            if !matches(item, filter).map_err(ErrorResponse::invalid_query)? {
                continue;
            }
        }
        if let Some(search) = &query.search {
            if !search_matches(item, search) {
                continue;
            }
        }
        selected.push(item.clone());
    }
    let filter_count = selected.len();
    sort_items(&mut selected, &query.sort);

    let page: Vec<Value> = selected
        .iter()
        .skip(query.offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .map(|item| Value::Object(project(item, &query.fields)))
        .collect();
    tracing::debug!(%collection, matched = filter_count, returned = page.len(), "listed items");

    let mut body = Map::new();
    body.insert("data".to_string(), Value::Array(page));
    if !query.meta.is_empty() {
        let mut meta = Map::new();
        if query.wants_meta("total_count") {
            meta.insert("total_count".to_string(), Value::from(all.len()));
        }
        if query.wants_meta("filter_count") {
            meta.insert("filter_count".to_string(), Value::from(filter_count));
        }
        body.insert("meta".to_string(), Value::Object(meta));
    }
    Ok(Json(Value::Object(body)))
}

async fn get_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ErrorResponse> {
    let query = ListQuery::parse(&params).map_err(ErrorResponse::invalid_query)?;
    let db = state.db.read().await;
    let item = db
        .get(&collection)
        .and_then(|items| items.iter().find(|item| id_matches(item, &id)))
        .ok_or_else(|| ErrorResponse::item_not_found(&collection, &id))?;
    Ok(Json(json!({ "data": project(item, &query.fields) })))
}

/// A single object creates one item, an array creates several.
async fn create_items(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ErrorResponse> {
    let Json(payload) = payload?;
    let (inputs, many) = match payload {
        Value::Array(values) => (values, true),
        single => (vec![single], false),
    };
    let mut inputs = inputs.into_iter().map(object).collect::<Result<Vec<_>, _>>()?;

    let mut db = state.db.write().await;
    let items = db.entry(collection.clone()).or_default();
    let mut taken: HashSet<String> = items.iter().filter_map(|item| item.get("id")).map(id_key).collect();
    for input in &mut inputs {
        let id = state.assign_id(input, &taken);
        if !taken.insert(id_key(&id)) {
            return Err(ErrorResponse::invalid_payload(format!(
                "Value for field \"id\" in collection \"{collection}\" has to be unique."
            )));
        }
    }
    items.extend(inputs.iter().cloned());
    tracing::info!(%collection, created = inputs.len(), "created items");

    let data = if many {
        Value::Array(inputs.into_iter().map(Value::Object).collect())
    } else {
        inputs.pop().map(Value::Object).unwrap_or(Value::Null)
    };
    Ok(Json(json!({ "data": data })))
}

/// Shallow merge; `null` values clear fields. The id cannot change.
fn merge(item: &mut Item, changes: &Item) {
    for (key, value) in changes {
        if key != "id" {
            item.insert(key.clone(), value.clone());
        }
    }
}

async fn update_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ErrorResponse> {
    let Json(payload) = payload?;
    let changes = object(payload)?;

    let mut db = state.db.write().await;
    let item = db
        .get_mut(&collection)
        .and_then(|items| items.iter_mut().find(|item| id_matches(item, &id)))
        .ok_or_else(|| ErrorResponse::item_not_found(&collection, &id))?;
    merge(item, &changes);
    Ok(Json(json!({ "data": item.clone() })))
}

/// Body is `{"keys": [..], "data": {..}}`; every listed item gets the same
/// changes. Unknown keys are ignored.
async fn update_items(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ErrorResponse> {
    let Json(payload) = payload?;
    let mut body = object(payload)?;
    let keys = match body.remove("keys") {
        Some(Value::Array(keys)) => keys.iter().map(id_key).collect::<Vec<_>>(),
        _ => return Err(ErrorResponse::invalid_payload("\"keys\" has to be an array")),
    };
    let changes = object(body.remove("data").unwrap_or(Value::Null))?;

    let mut db = state.db.write().await;
    let mut updated = Vec::new();
    if let Some(items) = db.get_mut(&collection) {
        for item in items.iter_mut().filter(|item| keys.iter().any(|k| id_matches(item, k))) {
            merge(item, &changes);
            updated.push(Value::Object(item.clone()));
        }
    }
    tracing::info!(%collection, updated = updated.len(), "updated items");
    Ok(Json(json!({ "data": updated })))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, ErrorResponse> {
    let mut db = state.db.write().await;
    let items = db
        .get_mut(&collection)
        .ok_or_else(|| ErrorResponse::item_not_found(&collection, &id))?;
    let before = items.len();
    items.retain(|item| !id_matches(item, &id));
    if items.len() == before {
        return Err(ErrorResponse::item_not_found(&collection, &id));
    }
    tracing::info!(%collection, %id, "deleted item");
    Ok(StatusCode::NO_CONTENT)
}

/// Body is `{"keys": [..]}` or a bare array of keys. Unknown keys are ignored.
async fn delete_items(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ErrorResponse> {
    let Json(payload) = payload?;
    let keys = match payload {
        Value::Array(keys) => keys,
        Value::Object(mut body) => match body.remove("keys") {
            Some(Value::Array(keys)) => keys,
            _ => return Err(ErrorResponse::invalid_payload("\"keys\" has to be an array")),
        },
        _ => return Err(ErrorResponse::invalid_payload("Expected an array of keys")),
    };
    let keys: Vec<String> = keys.iter().map(id_key).collect();

    let mut db = state.db.write().await;
    if let Some(items) = db.get_mut(&collection) {
        items.retain(|item| !keys.iter().any(|k| id_matches(item, k)));
    }
    tracing::info!(%collection, keys = keys.len(), "deleted items");
    Ok(StatusCode::NO_CONTENT)
}

async fn ping() -> &'static str {
    "pong"
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "releaseId": env!("CARGO_PKG_VERSION"),
        "serviceId": state.service_id,
        "checks": {}
    }))
}

async fn route_not_found(request: Request) -> ErrorResponse {
    ErrorResponse::new(
        StatusCode::NOT_FOUND,
        "ROUTE_NOT_FOUND",
        format!("Route {} doesn't exist.", request.uri().path()),
    )
}
