//! CLI command implementations
//!
//! Thin wrappers over [`StoreClient`]: load the config file, build an
//! identity context from the environment, run one operation, print the
//! result. The bearer token comes from `ALQUISTORE_ID_TOKEN`; commands
//! run without it fall back to the public access mode where one exists
//! and fail with an auth error where it does not.

use std::env;
use std::fs;
use std::path::Path;

use chrono::Utc;
use futures_util::future;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{
    config::{DEFAULT_BASE_URL, DEFAULT_SCAN_PAGE_SIZE},
    AuthContext, ReadStrategy, Session, StoreClient, StoreConfig,
};
use crate::query::{Filter, FilterOperator};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_json, write_line, write_records};

/// Environment variable holding the bearer token for authenticated
/// commands.
pub const TOKEN_ENV: &str = "ALQUISTORE_ID_TOKEN";

/// Environment variable holding the user id paired with the token.
pub const USER_ENV: &str = "ALQUISTORE_USER_ID";

/// The platform's collections, as surfaced on the admin dashboard.
pub const KNOWN_COLLECTIONS: [&str; 5] =
    ["propiedades", "reservas", "tickets-soporte", "tareas", "users"];

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cloud project id (required)
    pub project_id: String,

    /// Database id within the project (required)
    pub database_id: String,

    /// API key for the public access mode (required)
    pub api_key: String,

    /// Endpoint base (optional, defaults to the hosted store)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public-scan page-size cap (optional, default 100)
    #[serde(default = "default_scan_page_size")]
    pub scan_page_size: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_scan_page_size() -> u32 {
    DEFAULT_SCAN_PAGE_SIZE
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.project_id.is_empty() {
            return Err(CliError::config_error("project_id must not be empty"));
        }
        if self.database_id.is_empty() {
            return Err(CliError::config_error("database_id must not be empty"));
        }
        if self.api_key.is_empty() {
            return Err(CliError::config_error("api_key must not be empty"));
        }
        if self.scan_page_size == 0 {
            return Err(CliError::config_error("scan_page_size must be > 0"));
        }
        Ok(())
    }

    /// Convert to the client's connection settings
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            project_id: self.project_id.clone(),
            database_id: self.database_id.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            scan_page_size: self.scan_page_size,
        }
    }
}

/// Parse CLI arguments and run the selected command to completion.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io_error(format!("Failed to start runtime: {}", e)))?;
    runtime.block_on(dispatch(cli.command))
}

async fn dispatch(command: Command) -> CliResult<()> {
    match command {
        Command::List {
            collection,
            filters,
            limit,
            config,
        } => {
            let client = client_from(&config)?;
            let ctx = auth_context();
            let filters = parse_filters(&filters)?;
            let records = fetch_records(&client, &ctx, &collection, &filters, limit).await?;
            write_records(&records)
        }

        Command::Get {
            collection,
            id,
            config,
        } => {
            let client = client_from(&config)?;
            let ctx = auth_context();
            let record = match ctx.read_strategy() {
                ReadStrategy::ServerFilteredQuery => client.get_one(&ctx, &collection, &id).await?,
                ReadStrategy::ClientFilteredScan => client.public_get_one(&collection, &id).await?,
            };
            write_json(&record)
        }

        Command::Add {
            collection,
            data,
            config,
        } => {
            let client = client_from(&config)?;
            let ctx = auth_context();
            let payload = parse_payload(&data)?;
            let record = client.add(&ctx, &collection, &payload).await?;
            write_json(&record)
        }

        Command::Set {
            collection,
            id,
            data,
            config,
        } => {
            let client = client_from(&config)?;
            let ctx = auth_context();
            let payload = parse_payload(&data)?;
            let record = client.set(&ctx, &collection, &id, &payload).await?;
            write_json(&record)
        }

        Command::Update {
            collection,
            id,
            data,
            config,
        } => {
            let client = client_from(&config)?;
            let ctx = auth_context();
            let payload = parse_payload(&data)?;
            let record = client.update(&ctx, &collection, &id, &payload).await?;
            write_json(&record)
        }

        Command::Delete {
            collection,
            id,
            config,
        } => {
            let client = client_from(&config)?;
            let ctx = auth_context();
            client.delete(&ctx, &collection, &id).await?;
            write_line(&format!("Deleted {}/{}", collection, id))
        }

        Command::Dashboard { config } => {
            let client = client_from(&config)?;
            let ctx = auth_context();
            let counts = future::try_join_all(
                KNOWN_COLLECTIONS
                    .iter()
                    .copied()
                    .map(|collection| collection_count(&client, &ctx, collection)),
            )
            .await?;
            for (collection, count) in counts {
                write_line(&format!("{:<16} {}", collection, count))?;
            }
            Ok(())
        }

        Command::Ticket {
            nombre,
            email,
            asunto,
            mensaje,
            config,
        } => {
            let client = client_from(&config)?;
            let mut payload = Map::new();
            payload.insert("nombre".to_string(), Value::String(nombre));
            payload.insert("email".to_string(), Value::String(email));
            payload.insert("asunto".to_string(), Value::String(asunto));
            payload.insert("mensaje".to_string(), Value::String(mensaje));
            payload.insert("fecha".to_string(), Value::String(Utc::now().to_rfc3339()));
            payload.insert("estado".to_string(), Value::String("pendiente".to_string()));

            let record = client.public_add("tickets-soporte", &payload).await?;
            write_json(&record)
        }
    }
}

fn client_from(config_path: &Path) -> CliResult<StoreClient> {
    let config = Config::load(config_path)?;
    StoreClient::new(config.to_store_config()).map_err(CliError::from)
}

/// Identity context from the environment: a bearer token makes the
/// session, its absence selects the public access mode.
fn auth_context() -> AuthContext {
    match env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            let user_id = env::var(USER_ENV).unwrap_or_else(|_| "admin".to_string());
            AuthContext::authenticated(Session::new(user_id, token))
        }
        _ => AuthContext::anonymous(),
    }
}

/// Read a collection under whichever tier the context allows.
async fn fetch_records(
    client: &StoreClient,
    ctx: &AuthContext,
    collection: &str,
    filters: &[Filter],
    limit: Option<u32>,
) -> CliResult<Vec<Value>> {
    let records = match ctx.read_strategy() {
        ReadStrategy::ServerFilteredQuery => client.get_all(ctx, collection, filters, limit).await?,
        ReadStrategy::ClientFilteredScan => {
            client.public_get_all(collection, filters, limit).await?
        }
    };
    Ok(records)
}

async fn collection_count(
    client: &StoreClient,
    ctx: &AuthContext,
    collection: &'static str,
) -> CliResult<(&'static str, usize)> {
    let records = fetch_records(client, ctx, collection, &[], None).await?;
    Ok((collection, records.len()))
}

fn parse_filters(raw: &[String]) -> CliResult<Vec<Filter>> {
    raw.iter().map(|spec| parse_filter(spec)).collect()
}

/// Parse one filter spec: `campo=valor`, `campo!=valor`, `campo>valor`
/// or `campo<valor`. Values that parse as JSON are typed; anything
/// else is a string.
pub fn parse_filter(raw: &str) -> CliResult<Filter> {
    const TOKENS: [(&str, FilterOperator); 4] = [
        ("!=", FilterOperator::NotEqual),
        (">", FilterOperator::GreaterThan),
        ("<", FilterOperator::LessThan),
        ("=", FilterOperator::Equal),
    ];

    for (token, operator) in TOKENS {
        if let Some((field, value)) = raw.split_once(token) {
            let field = field.trim();
            if field.is_empty() {
                return Err(CliError::input_error(format!(
                    "Filter '{}' has no field name",
                    raw
                )));
            }
            return Ok(Filter::new(field, operator, parse_filter_value(value.trim())));
        }
    }

    Err(CliError::input_error(format!(
        "Invalid filter '{}': expected campo=valor, campo!=valor, campo>valor or campo<valor",
        raw
    )))
}

fn parse_filter_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse a `--data` argument into a field payload.
fn parse_payload(raw: &str) -> CliResult<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::input_error(format!("Invalid JSON payload: {}", e)))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::input_error("Payload must be a JSON object")),
    }
}
