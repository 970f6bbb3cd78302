//! Database provider trait
//!
//! This trait defines the single read operation the viewer needs.

use crate::registry::TableName;
use crate::schema::QueryResult;
use async_trait::async_trait;
use thiserror::Error;

/// Database provider trait for fetching whole tables
#[async_trait]
pub trait DatabaseProvider: Send + Sync + 'static {
    /// Fetch every row of a validated table or view
    ///
    /// Implementations make at most one connection attempt and issue at most
    /// one query, releasing the connection before returning on every path.
    ///
    /// # Arguments
    ///
    /// * `table` - Registry entry to read
    ///
    /// # Returns
    ///
    /// Column names and rows, with "no rows" as an empty vector
    async fn fetch_table(&self, table: &TableName) -> Result<QueryResult, DatabaseError>;

    /// Whether the provider has everything it needs to attempt a connection
    fn is_configured(&self) -> bool;
}

/// Database error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseError {
    /// Required settings are empty; no connection was attempted
    #[error("Database configuration incomplete (missing {})", .0.join(", "))]
    ConfigurationIncomplete(Vec<String>),

    /// The single connection attempt failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Connected, but the query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl DatabaseError {
    pub fn connection(error: sqlx::Error) -> Self {
        DatabaseError::ConnectionFailed(error.to_string())
    }

    pub fn query(error: sqlx::Error) -> Self {
        DatabaseError::QueryFailed(error.to_string())
    }
}
