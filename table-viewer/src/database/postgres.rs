//! PostgreSQL database provider implementation

use crate::config::DatabaseConfig;
use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::registry::TableName;
use crate::schema::{QueryResult, Row};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, Column, Connection, Executor, PgConnection, Row as _};
use tracing::{debug, warn};

/// PostgreSQL database provider
///
/// Opens one connection per request and closes it before returning. There is
/// no pool; every page view is an independent attempt.
pub struct PostgresProvider {
    config: DatabaseConfig,
}

impl PostgresProvider {
    /// Create a new PostgreSQL provider
    ///
    /// # Arguments
    ///
    /// * `config` - Connection settings loaded at startup
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Quote an identifier to prevent SQL injection
    fn quote_identifier(identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// The single statement issued for a table
    fn select_all_statement(table: &TableName) -> String {
        format!("SELECT * FROM {}", Self::quote_identifier(table.as_str()))
    }

    /// Convert a row from the simple-query protocol into text values
    ///
    /// Simple queries return every column in PostgreSQL's text format, so the
    /// raw value is decoded as a string regardless of its declared type.
    fn row_to_text(row: &PgRow) -> Result<Row, DatabaseError> {
        (0..row.len())
            .map(|index| {
                row.try_get_unchecked::<Option<String>, _>(index)
                    .map_err(DatabaseError::query)
            })
            .collect()
    }

    fn column_names(row: &PgRow) -> Vec<String> {
        row.columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect()
    }
}

#[async_trait]
impl DatabaseProvider for PostgresProvider {
    async fn fetch_table(&self, table: &TableName) -> Result<QueryResult, DatabaseError> {
        let missing = self.config.connection.missing_fields();
        if !missing.is_empty() {
            return Err(DatabaseError::ConfigurationIncomplete(missing));
        }

        let options = self
            .config
            .connect_options()
            .map_err(DatabaseError::connection)?;
        let mut connection = PgConnection::connect_with(&options)
            .await
            .map_err(DatabaseError::connection)?;

        let statement = Self::select_all_statement(table);
        debug!(sql = %statement, "Executing table query");

        // A plain string without arguments goes through the simple-query protocol
        let fetched = Executor::fetch_all(&mut connection, statement.as_str()).await;

        // Release the connection on both the success and the failure path
        if let Err(error) = connection.close().await {
            warn!(table = %table, %error, "Failed to close database connection cleanly");
        }

        let rows = fetched.map_err(DatabaseError::query)?;
        let columns = rows.first().map(Self::column_names).unwrap_or_default();
        let values = rows
            .iter()
            .map(Self::row_to_text)
            .collect::<Result<Vec<_>, _>>()?;

        QueryResult::new(columns, values).ok_or_else(|| {
            DatabaseError::QueryFailed("rows returned with differing column counts".to_string())
        })
    }

    fn is_configured(&self) -> bool {
        self.config.connection.is_complete()
    }
}
