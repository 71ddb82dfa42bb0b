use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Databases by name; each one is a JSON object of collections.
pub type Db = Arc<RwLock<HashMap<String, Map<String, Value>>>>;

#[derive(Clone)]
struct AppState {
    token: Arc<str>,
    db: Db,
}

type Failure = (StatusCode, Json<Value>);

/// An empty server that accepts `Bearer <token>`.
pub fn app(token: &str) -> Router {
    app_with(token, Value::Object(Map::new()))
}

/// A server pre-loaded from `seed`, an object mapping database names to
/// database documents. Entries that are not objects are ignored.
pub fn app_with(token: &str, seed: Value) -> Router {
    let databases = match seed {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(name, doc)| match doc {
                Value::Object(doc) => Some((name, doc)),
                _ => None,
            })
            .collect(),
        _ => HashMap::new(),
    };
    let state = AppState {
        token: Arc::from(token),
        db: Arc::new(RwLock::new(databases)),
    };
    Router::new()
        .route("/api/{db}", get(get_database))
        .route("/api/{db}/{collection}", get(list_items).post(create_item))
        .route(
            "/api/{db}/{collection}/{id}",
            get(get_item)
                .put(replace_item)
                .patch(patch_item)
                .delete(delete_item),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == &*state.token);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    next.run(request).await
}

async fn get_database(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<Json<Value>, Failure> {
    let databases = state.db.read().await;
    let doc = databases.get(&db).ok_or_else(not_found)?;
    Ok(Json(Value::Object(doc.clone())))
}

async fn list_items(
    State(state): State<AppState>,
    Path((db, collection)): Path<(String, String)>,
) -> Result<Json<Value>, Failure> {
    let databases = state.db.read().await;
    let doc = databases.get(&db).ok_or_else(not_found)?;
    match doc.get(&collection) {
        Some(Value::Array(items)) => Ok(Json(Value::Array(items.clone()))),
        Some(_) => Err(not_an_array()),
        None => Err(not_found()),
    }
}

async fn create_item(
    State(state): State<AppState>,
    Path((db, collection)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut item = object_body(body)?;
    let mut databases = state.db.write().await;
    let doc = databases.entry(db).or_default();
    let items = match doc
        .entry(collection)
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(items) => items,
        _ => return Err(not_an_array()),
    };
    let id = next_id(items);
    debug!(%id, "creating item");
    item.insert("id".to_string(), id);
    items.push(Value::Object(item.clone()));
    Ok((StatusCode::CREATED, Json(Value::Object(item))))
}

async fn get_item(
    State(state): State<AppState>,
    Path((db, collection, id)): Path<(String, String, String)>,
) -> Result<Json<Value>, Failure> {
    let databases = state.db.read().await;
    let doc = databases.get(&db).ok_or_else(not_found)?;
    let items = match doc.get(&collection) {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(not_an_array()),
        None => return Err(not_found()),
    };
    items
        .iter()
        .find(|item| has_id(item, &id))
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn replace_item(
    State(state): State<AppState>,
    Path((db, collection, id)): Path<(String, String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, Failure> {
    let mut replacement = object_body(body)?;
    let mut databases = state.db.write().await;
    let item = find_item_mut(&mut databases, &db, &collection, &id)?;
    if let Some(existing) = item.get("id").cloned() {
        replacement.insert("id".to_string(), existing);
    }
    *item = Value::Object(replacement);
    Ok(Json(item.clone()))
}

async fn patch_item(
    State(state): State<AppState>,
    Path((db, collection, id)): Path<(String, String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, Failure> {
    let changes = object_body(body)?;
    let mut databases = state.db.write().await;
    let item = find_item_mut(&mut databases, &db, &collection, &id)?;
    if let Value::Object(fields) = item {
        for (key, value) in changes {
            if key != "id" {
                fields.insert(key, value);
            }
        }
    }
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((db, collection, id)): Path<(String, String, String)>,
) -> Result<StatusCode, Failure> {
    let mut databases = state.db.write().await;
    let doc = databases.get_mut(&db).ok_or_else(not_found)?;
    let items = match doc.get_mut(&collection) {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(not_an_array()),
        None => return Err(not_found()),
    };
    let index = items
        .iter()
        .position(|item| has_id(item, &id))
        .ok_or_else(not_found)?;
    items.remove(index);
    debug!(%id, "deleted item");
    Ok(StatusCode::NO_CONTENT)
}

fn find_item_mut<'a>(
    databases: &'a mut HashMap<String, Map<String, Value>>,
    db: &str,
    collection: &str,
    id: &str,
) -> Result<&'a mut Value, Failure> {
    let doc = databases.get_mut(db).ok_or_else(not_found)?;
    let items = match doc.get_mut(collection) {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(not_an_array()),
        None => return Err(not_found()),
    };
    items
        .iter_mut()
        .find(|item| has_id(item, id))
        .ok_or_else(not_found)
}

/// Request bodies must be JSON objects. Malformed JSON keeps axum's rejection
/// status (400, or 415 without a JSON content type).
fn object_body(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, Failure> {
    match body {
        Ok(Json(Value::Object(fields))) => Ok(fields),
        Ok(Json(_)) => Err(failure(StatusCode::BAD_REQUEST, "body must be a JSON object")),
        Err(rejection) => Err(failure(rejection.status(), &rejection.body_text())),
    }
}

/// Next id for a collection: max numeric id + 1, or a UUID string once the
/// collection holds any id that is not a non-negative integer.
fn next_id(items: &[Value]) -> Value {
    let mut max = 0;
    for item in items {
        match item.get("id") {
            None => {}
            Some(Value::Number(n)) => match n.as_u64() {
                Some(n) => max = max.max(n),
                None => return Value::String(Uuid::new_v4().to_string()),
            },
            Some(_) => return Value::String(Uuid::new_v4().to_string()),
        }
    }
    json!(max + 1)
}

fn has_id(item: &Value, id: &str) -> bool {
    match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "error": message })))
}

fn not_found() -> Failure {
    failure(StatusCode::NOT_FOUND, "not found")
}

fn not_an_array() -> Failure {
    failure(StatusCode::BAD_REQUEST, "collection is not an array")
}
