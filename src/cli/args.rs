//! CLI argument definitions using clap
//!
//! Commands:
//! - alquistore list <collection> [--filter campo=valor] [--limit N]
//! - alquistore get <collection> <id>
//! - alquistore add <collection> --data '<json>'
//! - alquistore set <collection> <id> --data '<json>'
//! - alquistore update <collection> <id> --data '<json>'
//! - alquistore delete <collection> <id>
//! - alquistore dashboard
//! - alquistore ticket --nombre <n> --email <e> --mensaje <m>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// alquistore - typed REST client for the Alquilala document store
#[derive(Parser, Debug)]
#[command(name = "alquistore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List records in a collection, optionally filtered
    List {
        /// Collection name, e.g. propiedades
        collection: String,

        /// Filter: campo=valor, campo!=valor, campo>valor, campo<valor
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Maximum number of records to return
        #[arg(long)]
        limit: Option<u32>,

        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },

    /// Fetch one record by id
    Get {
        collection: String,
        id: String,

        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },

    /// Create a record; the store assigns the id
    Add {
        collection: String,

        /// Record fields as a JSON object
        #[arg(long)]
        data: String,

        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },

    /// Full replace (upsert) at a chosen id
    Set {
        collection: String,
        id: String,

        /// Record fields as a JSON object
        #[arg(long)]
        data: String,

        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },

    /// Partial update: only the supplied fields are touched
    Update {
        collection: String,
        id: String,

        /// Fields to change as a JSON object
        #[arg(long)]
        data: String,

        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },

    /// Delete a record
    Delete {
        collection: String,
        id: String,

        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },

    /// Record counts across the platform collections
    Dashboard {
        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },

    /// Submit a support ticket through the public access mode
    Ticket {
        /// Full name of the requester
        #[arg(long)]
        nombre: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Subject line
        #[arg(long, default_value = "Consulta general")]
        asunto: String,

        /// Message body
        #[arg(long)]
        mensaje: String,

        /// Path to configuration file
        #[arg(long, default_value = "./alquistore.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
