//! Access-mode client
//!
//! One client, two access modes. Authenticated operations carry the
//! session's bearer token and may filter server-side through the
//! structured-query endpoint; public operations carry the API key and,
//! for reads, scan the collection and filter locally. Each operation
//! issues exactly one outbound call, holds no state between calls, and
//! never retries — callers decide what a failure means.

pub mod config;
pub mod errors;
pub mod session;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use session::{AuthContext, ReadStrategy, Session};

use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::document::{self, Document};
use crate::observability::{Logger, Severity};
use crate::query::{self, Filter, StoreRequest};

/// REST client for the document store.
pub struct StoreClient {
    http: reqwest::Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Build a client over the given configuration.
    ///
    /// No explicit timeout is installed; the transport default applies.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built over.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ==================
    // Authenticated access mode
    // ==================

    /// Fetch records from a collection, filtering server-side.
    ///
    /// With no filters this is a plain collection list (the limit
    /// travels as the page size); with filters it goes through the
    /// structured-query endpoint so the store evaluates them.
    pub async fn get_all(
        &self,
        ctx: &AuthContext,
        collection: &str,
        filters: &[Filter],
        limit: Option<u32>,
    ) -> StoreResult<Vec<Value>> {
        let session = ctx.require_session()?;
        match query::build_query_request(collection, filters, limit) {
            StoreRequest::List {
                collection,
                page_size,
            } => {
                let mut request = self.http.get(self.config.collection_url(&collection));
                if let Some(size) = page_size {
                    request = request.query(&[("pageSize", size.to_string())]);
                }
                let body = self
                    .execute("get_all", &collection, request.bearer_auth(session.bearer_token()))
                    .await?;
                Ok(records_from_list(&body))
            }
            StoreRequest::RunQuery { collection, body } => {
                let request = self
                    .http
                    .post(self.config.run_query_url())
                    .json(&body)
                    .bearer_auth(session.bearer_token());
                let response = self.execute("get_all", &collection, request).await?;
                Ok(records_from_query(&response))
            }
        }
    }

    /// Fetch one document by id.
    pub async fn get_one(
        &self,
        ctx: &AuthContext,
        collection: &str,
        id: &str,
    ) -> StoreResult<Value> {
        let session = ctx.require_session()?;
        let request = self
            .http
            .get(self.config.document_url(collection, id))
            .bearer_auth(session.bearer_token());
        let body = self.execute("get_one", collection, request).await?;
        record_from_document(&body)
    }

    /// Create a document; the store assigns the id.
    pub async fn add(
        &self,
        ctx: &AuthContext,
        collection: &str,
        payload: &Map<String, Value>,
    ) -> StoreResult<Value> {
        let session = ctx.require_session()?;
        let body = document::fields_body(&document::wire_fields(payload));
        let request = self
            .http
            .post(self.config.collection_url(collection))
            .json(&body)
            .bearer_auth(session.bearer_token());
        let response = self.execute("add", collection, request).await?;
        record_from_document(&response)
    }

    /// Full replace at a caller-chosen id.
    ///
    /// Upsert semantics: creates the document when absent, replaces it
    /// when present. No field mask travels, so fields missing from the
    /// payload are dropped from the stored document.
    pub async fn set(
        &self,
        ctx: &AuthContext,
        collection: &str,
        id: &str,
        payload: &Map<String, Value>,
    ) -> StoreResult<Value> {
        let session = ctx.require_session()?;
        let body = document::fields_body(&document::wire_fields(payload));
        let request = self
            .http
            .patch(self.config.document_url(collection, id))
            .json(&body)
            .bearer_auth(session.bearer_token());
        let response = self.execute("set", collection, request).await?;
        record_from_document(&response)
    }

    /// Partial update: only the supplied fields travel, and the field
    /// mask instructs the store to touch exactly those paths.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        collection: &str,
        id: &str,
        payload: &Map<String, Value>,
    ) -> StoreResult<Value> {
        let session = ctx.require_session()?;
        let request = self
            .update_request(collection, id, payload)
            .bearer_auth(session.bearer_token());
        let response = self.execute("update", collection, request).await?;
        record_from_document(&response)
    }

    /// Delete a document. The store answers with no body.
    pub async fn delete(&self, ctx: &AuthContext, collection: &str, id: &str) -> StoreResult<()> {
        let session = ctx.require_session()?;
        let request = self
            .http
            .delete(self.config.document_url(collection, id))
            .bearer_auth(session.bearer_token());
        self.execute("delete", collection, request).await?;
        Ok(())
    }

    // ==================
    // Public access mode
    // ==================

    /// Public read of a collection.
    ///
    /// The structured-query endpoint is unreachable without an identity
    /// token, so this fetches the whole collection (bounded by the
    /// configured scan cap), filters client-side with the same
    /// predicate semantics as the authenticated path, and truncates to
    /// `limit`. One outbound call regardless of filters. When the scan
    /// comes back at the cap the result may be incomplete; that is
    /// flagged with a `PUBLIC_SCAN_CAP` warning, never silently.
    pub async fn public_get_all(
        &self,
        collection: &str,
        filters: &[Filter],
        limit: Option<u32>,
    ) -> StoreResult<Vec<Value>> {
        let page_size = self.config.scan_page_size.to_string();
        let request = self.keyed(
            self.http
                .get(self.config.collection_url(collection))
                .query(&[("pageSize", page_size.as_str())]),
        );
        let body = self.execute("public_get_all", collection, request).await?;

        let fetched = query::collect_listed_documents(&body);
        if fetched.len() as u32 >= self.config.scan_page_size {
            Logger::warn(
                "PUBLIC_SCAN_CAP",
                &[("collection", collection), ("cap", page_size.as_str())],
            );
        }

        let mut records: Vec<Value> = fetched
            .into_iter()
            .map(Document::into_record)
            .filter(|record| query::matches_all(filters, record))
            .collect();
        if let Some(limit) = limit {
            records.truncate(limit as usize);
        }
        Ok(records)
    }

    /// Public variant of [`StoreClient::get_one`].
    pub async fn public_get_one(&self, collection: &str, id: &str) -> StoreResult<Value> {
        let request = self.keyed(self.http.get(self.config.document_url(collection, id)));
        let body = self.execute("public_get_one", collection, request).await?;
        record_from_document(&body)
    }

    /// Public variant of [`StoreClient::add`]. Used by the one public
    /// write path, support ticket submission.
    pub async fn public_add(
        &self,
        collection: &str,
        payload: &Map<String, Value>,
    ) -> StoreResult<Value> {
        let body = document::fields_body(&document::wire_fields(payload));
        let request = self.keyed(
            self.http
                .post(self.config.collection_url(collection))
                .json(&body),
        );
        let response = self.execute("public_add", collection, request).await?;
        record_from_document(&response)
    }

    /// Public variant of [`StoreClient::set`].
    pub async fn public_set(
        &self,
        collection: &str,
        id: &str,
        payload: &Map<String, Value>,
    ) -> StoreResult<Value> {
        let body = document::fields_body(&document::wire_fields(payload));
        let request = self.keyed(
            self.http
                .patch(self.config.document_url(collection, id))
                .json(&body),
        );
        let response = self.execute("public_set", collection, request).await?;
        record_from_document(&response)
    }

    /// Public variant of [`StoreClient::update`].
    pub async fn public_update(
        &self,
        collection: &str,
        id: &str,
        payload: &Map<String, Value>,
    ) -> StoreResult<Value> {
        let request = self.keyed(self.update_request(collection, id, payload));
        let response = self.execute("public_update", collection, request).await?;
        record_from_document(&response)
    }

    /// Public variant of [`StoreClient::delete`].
    pub async fn public_delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let request = self.keyed(self.http.delete(self.config.document_url(collection, id)));
        self.execute("public_delete", collection, request).await?;
        Ok(())
    }

    // ==================
    // Plumbing
    // ==================

    fn update_request(
        &self,
        collection: &str,
        id: &str,
        payload: &Map<String, Value>,
    ) -> RequestBuilder {
        let body = document::fields_body(&document::wire_fields(payload));
        self.http
            .patch(self.config.document_url(collection, id))
            .query(&[("updateMask.fieldPaths", field_mask(payload))])
            .json(&body)
    }

    fn keyed(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[("key", self.config.api_key.as_str())])
    }

    async fn execute(
        &self,
        op: &'static str,
        collection: &str,
        request: RequestBuilder,
    ) -> StoreResult<Value> {
        let request_id = Uuid::new_v4().to_string();
        let outcome = dispatch(request).await;
        if let Err(err) = &outcome {
            let severity = if err.is_client_error() {
                Severity::Warn
            } else {
                Severity::Error
            };
            let error = err.to_string();
            Logger::log(
                severity,
                "STORE_REQUEST_FAILED",
                &[
                    ("op", op),
                    ("collection", collection),
                    ("error", error.as_str()),
                    ("request_id", request_id.as_str()),
                ],
            );
        }
        outcome
    }
}

async fn dispatch(request: RequestBuilder) -> StoreResult<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    read_body(response).await
}

async fn read_body(response: Response) -> StoreResult<Value> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(upstream_error(status, &bytes));
    }
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Extract the store's structured error message, falling back to a
/// generic status-derived one.
fn upstream_error(status: StatusCode, bytes: &[u8]) -> StoreError {
    let parsed: Option<Value> = serde_json::from_slice(bytes).ok();
    let message = parsed
        .as_ref()
        .and_then(|body| body.get("error"))
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    StoreError::Upstream {
        status: status.as_u16(),
        message,
    }
}

/// Comma-separated field paths derived from the payload keys.
fn field_mask(payload: &Map<String, Value>) -> String {
    payload.keys().cloned().collect::<Vec<_>>().join(",")
}

fn records_from_list(body: &Value) -> Vec<Value> {
    query::collect_listed_documents(body)
        .into_iter()
        .map(Document::into_record)
        .collect()
}

fn records_from_query(body: &Value) -> Vec<Value> {
    query::collect_query_documents(body)
        .into_iter()
        .map(Document::into_record)
        .collect()
}

fn record_from_document(body: &Value) -> StoreResult<Value> {
    Document::from_json(body)
        .map(Document::into_record)
        .ok_or_else(|| StoreError::Decode("response carried no document".to_string()))
}
