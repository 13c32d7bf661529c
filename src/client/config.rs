//! Client configuration
//!
//! One config per project/database pair. The base URL is overridable
//! so tests can point the client at a local mock store.

use serde::{Deserialize, Serialize};

/// Default endpoint of the hosted document store.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default page-size cap for public collection scans.
///
/// The public read path fetches the whole collection up to this cap
/// before filtering client-side; collections larger than the cap yield
/// incomplete filtered results, which the client flags with a warning.
pub const DEFAULT_SCAN_PAGE_SIZE: u32 = 100;

/// Connection settings for one project/database pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Cloud project id, e.g. `alquilala-77`.
    pub project_id: String,

    /// Database id within the project.
    pub database_id: String,

    /// API key used by the public (unauthenticated) access mode.
    pub api_key: String,

    /// Endpoint base (overridable for tests).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page-size cap applied to public collection scans.
    #[serde(default = "default_scan_page_size")]
    pub scan_page_size: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_scan_page_size() -> u32 {
    DEFAULT_SCAN_PAGE_SIZE
}

impl StoreConfig {
    /// Config with default endpoint and scan cap.
    pub fn new(
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
            api_key: api_key.into(),
            base_url: default_base_url(),
            scan_page_size: default_scan_page_size(),
        }
    }

    /// Root path of the documents resource.
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database_id
        )
    }

    /// URL of a collection.
    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_url(), collection)
    }

    /// URL of a single document.
    pub fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url(), collection, id)
    }

    /// URL of the structured-query endpoint.
    pub fn run_query_url(&self) -> String {
        format!("{}:runQuery", self.documents_url())
    }
}
