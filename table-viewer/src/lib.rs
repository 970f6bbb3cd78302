//! # table-viewer
//!
//! A read-only HTML viewer for a fixed whitelist of PostgreSQL tables and views,
//! easily integrable as an Axum layer.
//!
//! ## Features
//!
//! - Whitelisted table/view selection through a single `?tabla=` query parameter
//! - One `SELECT *` per request over a short-lived connection
//! - Server-rendered HTML page with navigation, status banner and data table
//! - Configuration from a `DATABASE_URL` or discrete `DB_*` variables
//!
//! ## Security Notes
//!
//! - No authentication/authorization built-in
//! - Only names present in the registry ever reach the database, and they are
//!   quoted as identifiers before interpolation
//! - Every piece of database- or request-derived text is HTML-escaped
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use table_viewer::{DatabaseConfig, TableRegistry, TableViewerLayer};
//!
//! #[tokio::main]
//! async fn main() -> table_viewer::Result<()> {
//!     let config = DatabaseConfig::from_env()?;
//!     let registry = TableRegistry::new(["empleado", "departamento"])?;
//!
//!     let app: Router = Router::new()
//!         .route("/health", get(|| async { "ok" }))
//!         .merge(TableViewerLayer::postgres("/viewer", registry, config).into_router());
//!
//!     // Serve the application...
//!     Ok(())
//! }
//! ```

// Public modules
pub mod assets;
pub mod config;
pub mod database;
pub mod handlers;
pub mod layer;
pub mod registry;
pub mod render;
pub mod schema;

// Public exports
pub use config::{ConnectionConfig, DatabaseConfig, ViewerConfig};
pub use layer::TableViewerLayer;
pub use registry::{TableName, TableRegistry};
pub use schema::{ConnectionStatus, QueryResult, Row, StatusKind, TableQuery};

// Re-export database providers
pub use database::gateway::{fetch_for_display, GatewayOutcome};
pub use database::postgres::PostgresProvider;
pub use database::traits::{DatabaseError, DatabaseProvider};

// Error type
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The requested name is not part of the table registry
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// A server-level setting could not be parsed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
