//! In-process mock of the document store's REST surface.
//!
//! Binds to an ephemeral port, captures every request for assertions,
//! and serves list / get / create / patch / delete / runQuery over a
//! shared in-memory set of wire documents. Query evaluation here is an
//! independent wire-level implementation so parity tests do not reuse
//! the client's own filter code.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use alquistore::client::{AuthContext, Session, StoreClient, StoreConfig};

pub const PROJECT_ID: &str = "test-project";
pub const DATABASE_ID: &str = "test-db";
pub const API_KEY: &str = "test-key";
pub const BEARER_TOKEN: &str = "test-token";

const DOCUMENTS_PREFIX: &str = "/projects/test-project/databases/test-db/documents";

/// One captured request, path relative to the documents root.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct MockStore {
    hits: Arc<Mutex<u32>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    documents: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<u32>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a wire document with the given fields map.
    pub fn seed(&self, collection: &str, id: &str, fields: Value) {
        self.documents.lock().unwrap().push(json!({
            "name": format!("{}/{}/{}", documents_root(), collection, id),
            "fields": fields,
        }));
    }

    pub fn hit_count(&self) -> u32 {
        *self.hits.lock().unwrap()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one request captured")
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    fn docs_in(&self, collection: &str) -> Vec<Value> {
        let prefix = format!("{}/{}/", documents_root(), collection);
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| doc["name"].as_str().unwrap_or("").starts_with(&prefix))
            .cloned()
            .collect()
    }
}

fn documents_root() -> String {
    format!("projects/{}/databases/{}/documents", PROJECT_ID, DATABASE_ID)
}

/// Spawn the mock store and return a client pointed at it.
pub async fn start_client(store: MockStore, scan_page_size: u32) -> StoreClient {
    let base_url = spawn_mock_store(store).await;
    let config = StoreConfig {
        project_id: PROJECT_ID.to_string(),
        database_id: DATABASE_ID.to_string(),
        api_key: API_KEY.to_string(),
        base_url,
        scan_page_size,
    };
    StoreClient::new(config).expect("create store client")
}

/// Context carrying a valid session for authenticated calls.
pub fn admin_ctx() -> AuthContext {
    AuthContext::authenticated(Session::new("admin-1", BEARER_TOKEN))
}

/// Extract the id of every record, in order.
pub fn ids(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["id"].as_str().unwrap_or("").to_string())
        .collect()
}

async fn spawn_mock_store(store: MockStore) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock store");
    let addr = listener.local_addr().expect("resolve local addr");
    let app = Router::new().fallback(handle).with_state(store);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock store");
    });

    format!("http://{}", addr)
}

async fn handle(
    State(store): State<MockStore>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    *store.hits.lock().unwrap() += 1;

    let rel = uri
        .path()
        .strip_prefix(DOCUMENTS_PREFIX)
        .unwrap_or(uri.path())
        .to_string();
    let parsed_body: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    store.requests.lock().unwrap().push(CapturedRequest {
        method: method.to_string(),
        path: rel.clone(),
        query: params.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: parsed_body.clone(),
    });

    let segments: Vec<&str> = rel.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("POST", [":runQuery"]) => run_query(&store, parsed_body.unwrap_or(Value::Null)),
        ("GET", [collection]) => list_collection(&store, collection, &params),
        ("POST", [collection]) => create_document(&store, collection, parsed_body),
        ("GET", [collection, id]) => get_document(&store, collection, id),
        ("PATCH", [collection, id]) => patch_document(&store, collection, id, parsed_body, &params),
        ("DELETE", [collection, id]) => delete_document(&store, collection, id),
        _ => error_response(StatusCode::NOT_FOUND, "Unknown route"),
    }
}

fn list_collection(
    store: &MockStore,
    collection: &str,
    params: &HashMap<String, String>,
) -> Response {
    let mut docs = store.docs_in(collection);
    if let Some(size) = params.get("pageSize").and_then(|s| s.parse::<usize>().ok()) {
        docs.truncate(size);
    }
    Json(json!({ "documents": docs })).into_response()
}

fn create_document(store: &MockStore, collection: &str, body: Option<Value>) -> Response {
    let fields = body
        .and_then(|b| b.get("fields").cloned())
        .unwrap_or_else(|| json!({}));
    let id = {
        let mut next = store.next_id.lock().unwrap();
        *next += 1;
        format!("gen-{}", next)
    };
    let doc = json!({
        "name": format!("{}/{}/{}", documents_root(), collection, id),
        "fields": fields,
    });
    store.documents.lock().unwrap().push(doc.clone());
    Json(doc).into_response()
}

fn get_document(store: &MockStore, collection: &str, id: &str) -> Response {
    let name = json!(format!("{}/{}/{}", documents_root(), collection, id));
    let documents = store.documents.lock().unwrap();
    match documents.iter().find(|doc| doc["name"] == name) {
        Some(doc) => Json(doc.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Document not found"),
    }
}

fn patch_document(
    store: &MockStore,
    collection: &str,
    id: &str,
    body: Option<Value>,
    params: &HashMap<String, String>,
) -> Response {
    let incoming = body
        .and_then(|b| b.get("fields").cloned())
        .unwrap_or_else(|| json!({}));
    let name = format!("{}/{}/{}", documents_root(), collection, id);
    let name_value = json!(name.clone());
    let mask: Option<Vec<String>> = params
        .get("updateMask.fieldPaths")
        .map(|m| m.split(',').map(str::to_string).collect());

    let mut documents = store.documents.lock().unwrap();
    if let Some(doc) = documents.iter_mut().find(|doc| doc["name"] == name_value) {
        match &mask {
            Some(paths) => {
                for path in paths {
                    if let Some(value) = incoming.get(path) {
                        doc["fields"][path.as_str()] = value.clone();
                    }
                }
            }
            None => doc["fields"] = incoming,
        }
        return Json(doc.clone()).into_response();
    }

    let doc = json!({ "name": name, "fields": incoming });
    documents.push(doc.clone());
    Json(doc).into_response()
}

fn delete_document(store: &MockStore, collection: &str, id: &str) -> Response {
    let name = json!(format!("{}/{}/{}", documents_root(), collection, id));
    let mut documents = store.documents.lock().unwrap();
    let before = documents.len();
    documents.retain(|doc| doc["name"] != name);
    if documents.len() == before {
        return error_response(StatusCode::NOT_FOUND, "Document not found");
    }
    StatusCode::OK.into_response()
}

fn run_query(store: &MockStore, body: Value) -> Response {
    let query = &body["structuredQuery"];
    let collection = query["from"][0]["collectionId"].as_str().unwrap_or("");
    let clauses = query_clauses(&query["where"]);
    let limit = query["limit"].as_u64().map(|l| l as usize);

    // The real endpoint streams envelopes and interleaves document-less
    // skip markers; lead with one so clients must cope.
    let mut envelopes = vec![json!({ "readTime": "2024-01-01T00:00:00Z" })];
    let mut matched = 0usize;
    for doc in store.docs_in(collection) {
        if clauses.iter().all(|clause| clause_matches(&doc["fields"], clause)) {
            if let Some(limit) = limit {
                if matched >= limit {
                    break;
                }
            }
            matched += 1;
            envelopes.push(json!({
                "document": doc,
                "readTime": "2024-01-01T00:00:00Z",
            }));
        }
    }
    Json(Value::Array(envelopes)).into_response()
}

fn query_clauses(where_clause: &Value) -> Vec<Value> {
    if where_clause.get("compositeFilter").is_some() {
        return where_clause["compositeFilter"]["filters"]
            .as_array()
            .cloned()
            .unwrap_or_default();
    }
    if where_clause.get("fieldFilter").is_some() {
        return vec![where_clause.clone()];
    }
    vec![]
}

fn clause_matches(fields: &Value, clause: &Value) -> bool {
    let filter = &clause["fieldFilter"];
    let path = filter["field"]["fieldPath"].as_str().unwrap_or("");
    let op = filter["op"].as_str().unwrap_or("");
    let expected = &filter["value"];
    let actual = match fields.get(path) {
        Some(v) => v,
        None => return false,
    };

    match op {
        "EQUAL" => wire_eq(actual, expected),
        "NOT_EQUAL" => !is_wire_null(actual) && !wire_eq(actual, expected),
        "GREATER_THAN" => wire_cmp(actual, expected) == Some(Ordering::Greater),
        "LESS_THAN" => wire_cmp(actual, expected) == Some(Ordering::Less),
        _ => false,
    }
}

fn is_wire_null(v: &Value) -> bool {
    v.as_object()
        .map(|o| o.contains_key("nullValue"))
        .unwrap_or(false)
}

fn wire_number(v: &Value) -> Option<f64> {
    if let Some(i) = v.get("integerValue") {
        return match i {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
    }
    v.get("doubleValue").and_then(Value::as_f64)
}

fn wire_eq(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (wire_number(a), wire_number(b)) {
        return x == y;
    }
    a == b
}

fn wire_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (wire_number(a), wire_number(b)) {
        return x.partial_cmp(&y);
    }
    let (Some(x), Some(y)) = (
        a.get("stringValue").and_then(Value::as_str),
        b.get("stringValue").and_then(Value::as_str),
    ) else {
        return None;
    };
    Some(x.cmp(y))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
                "status": "ERROR",
            }
        })),
    )
        .into_response()
}
