//! In-memory stand-in for the GREYHOUND REST API.
//!
//! Serves `/rest/colors`, `/rest/groups` and `/rest/items` behind HTTP basic
//! auth, with seeded data and 101-record pages like the real service.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

/// Records per page when no offset is given.
pub const PAGE_SIZE: usize = 101;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "secret";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Color {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    pub path: String,
}

/// Item fields selectable through `listValues`, by flag bit.
const LIST_VALUE_KEYS: [(u64, &str); 9] = [
    (1, "GroupRef"),
    (256, "ColorRef"),
    (2048, "State"),
    (8192, "Priority"),
    (16384, "Flags"),
    (65536, "From"),
    (131072, "Recipients"),
    (262144, "Subject"),
    (524288, "Number"),
];

#[derive(Debug)]
pub struct Store {
    pub colors: Vec<Color>,
    pub groups: Vec<Group>,
    pub items: BTreeMap<i64, Value>,
    next_item_id: i64,
}

impl Store {
    pub fn empty() -> Self {
        Self {
            colors: Vec::new(),
            groups: Vec::new(),
            items: BTreeMap::new(),
            next_item_id: 1,
        }
    }

    /// Three colors, two groups, three items (IDs 1001..=1003).
    pub fn seeded() -> Self {
        let colors = vec![
            color(1, "Red", "#e53935"),
            color(2, "Green", "#43a047"),
            color(3, "Blue", "#1e88e5"),
        ];
        let groups = vec![
            Group { id: 1, name: "Inbox".into(), path: "/Inbox".into() },
            Group { id: 2, name: "Support".into(), path: "/Inbox/Support".into() },
        ];
        let mut store = Self {
            colors,
            groups,
            items: BTreeMap::new(),
            next_item_id: 1001,
        };
        for (subject, group_ref, color_ref) in
            [("Welcome", 1, 1), ("Invoice 2024-17", 2, 2), ("Outage report", 2, 3)]
        {
            let mut item = Map::new();
            item.insert("GroupRef".into(), group_ref.into());
            item.insert("Subject".into(), subject.into());
            item.insert("ColorRef".into(), color_ref.into());
            item.insert("State".into(), 3.into());
            item.insert("Priority".into(), 2.into());
            store.insert_item(item);
        }
        store
    }

    fn insert_item(&mut self, mut item: Map<String, Value>) -> Value {
        let id = self.next_item_id;
        self.next_item_id += 1;
        item.insert("ID".into(), id.into());
        let item = Value::Object(item);
        self.items.insert(id, item.clone());
        item
    }
}

fn color(id: i64, name: &str, code: &str) -> Color {
    Color {
        id,
        name: name.to_string(),
        code: code.to_string(),
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    credentials: Arc<String>,
}

/// Router with the default credentials and seeded data.
pub fn app() -> Router {
    app_with(DEFAULT_USERNAME, DEFAULT_PASSWORD, Store::seeded())
}

pub fn app_with(username: &str, password: &str, store: Store) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(store)),
        credentials: Arc::new(format!("{username}:{password}")),
    };
    let api = Router::new()
        .route("/colors", get(list_colors))
        .route("/colors/{id}", get(get_color))
        .route("/groups", get(list_groups))
        .route("/groups/{id}", get(get_group))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state);
    Router::new()
        .nest("/rest", api)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|token| STANDARD.decode(token).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .is_some_and(|pair| pair == *state.credentials);
    if !authorized {
        tracing::warn!(uri = %request.uri(), "rejected request with bad credentials");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub offset: Option<usize>,
    pub filter: Option<String>,
    pub list_values: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ItemFilter {
    #[serde(rename = "ColorRefs", default)]
    color_refs: Vec<i64>,
}

fn page<T: Clone>(records: &[T], offset: Option<usize>) -> Vec<T> {
    records
        .iter()
        .skip(offset.unwrap_or(0))
        .take(PAGE_SIZE)
        .cloned()
        .collect()
}

async fn list_colors(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Json<Vec<Color>> {
    let store = state.db.read().await;
    Json(page(&store.colors, q.offset))
}

async fn get_color(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Color>, StatusCode> {
    let store = state.db.read().await;
    store
        .colors
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_groups(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Json<Vec<Group>> {
    let store = state.db.read().await;
    Json(page(&store.groups, q.offset))
}

async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Group>, StatusCode> {
    let store = state.db.read().await;
    store
        .groups
        .iter()
        .find(|g| g.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_items(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let color_refs = match q.filter.as_deref() {
        Some(raw) => {
            let filter: ItemFilter = serde_json::from_str(raw).map_err(|_| StatusCode::BAD_REQUEST)?;
            filter.color_refs
        }
        None => Vec::new(),
    };

    let store = state.db.read().await;
    let matching: Vec<Value> = store
        .items
        .values()
        .filter(|item| {
            color_refs.is_empty()
                || item["ColorRef"]
                    .as_i64()
                    .is_some_and(|c| color_refs.contains(&c))
        })
        .map(|item| match q.list_values {
            Some(mask) => select_fields(item, mask),
            None => item.clone(),
        })
        .collect();
    Ok(Json(page(&matching, q.offset)))
}

/// Keep `ID` plus the fields whose flag bit is set in `mask`.
fn select_fields(item: &Value, mask: u64) -> Value {
    let mut selected = Map::new();
    if let Some(id) = item.get("ID") {
        selected.insert("ID".into(), id.clone());
    }
    for (bit, key) in LIST_VALUE_KEYS {
        if mask & bit != 0 {
            if let Some(value) = item.get(key) {
                selected.insert(key.into(), value.clone());
            }
        }
    }
    Value::Object(selected)
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    let store = state.db.read().await;
    store.items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let Some(Value::Object(item)) = body.get("Item").cloned() else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let valid = item.get("GroupRef").is_some_and(Value::is_i64)
        && item.get("Subject").is_some_and(Value::is_string);
    if !valid {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let created = state.db.write().await.insert_item(item);
    tracing::info!(id = %created["ID"], "item created");
    Ok((StatusCode::CREATED, Json(created)))
}
