//! Turning a provider call into something the page can show

use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::registry::TableName;
use crate::schema::{ConnectionStatus, QueryResult};
use tracing::{error, info, warn};

pub const CONNECTED_MESSAGE: &str = "Database connection established.";

/// Status banner plus the data to display, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOutcome {
    pub status: ConnectionStatus,

    /// `None` when the query never ran or failed
    pub result: Option<QueryResult>,
}

/// Fetch a table and classify the outcome
///
/// Every failure degrades to a status message; nothing is retried.
pub async fn fetch_for_display<DB: DatabaseProvider + ?Sized>(
    database: &DB,
    table: &TableName,
) -> GatewayOutcome {
    match database.fetch_table(table).await {
        Ok(result) => {
            info!(table = %table, rows = result.rows.len(), "Fetched table");
            GatewayOutcome {
                status: ConnectionStatus::success(CONNECTED_MESSAGE),
                result: Some(result),
            }
        }
        Err(DatabaseError::ConfigurationIncomplete(missing)) => {
            warn!(missing = ?missing, "Database is not configured, skipping query");
            GatewayOutcome {
                status: ConnectionStatus::warning(format!(
                    "Warning: the database connection is not configured (missing {}).",
                    missing.join(", ")
                )),
                result: None,
            }
        }
        Err(DatabaseError::ConnectionFailed(detail)) => {
            error!(table = %table, error = %detail, "Could not connect to the database");
            GatewayOutcome {
                status: ConnectionStatus::error(format!(
                    "Error: could not connect to the database. Detail: {}",
                    detail
                )),
                result: None,
            }
        }
        Err(DatabaseError::QueryFailed(detail)) => {
            error!(table = %table, error = %detail, "Table query failed");
            let mut status = ConnectionStatus::success(CONNECTED_MESSAGE);
            status.append_error(&format!("Error: the query failed. Detail: {}", detail));
            GatewayOutcome {
                status,
                result: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TableRegistry;
    use crate::schema::StatusKind;
    use async_trait::async_trait;

    struct FixedProvider(Result<QueryResult, DatabaseError>);

    #[async_trait]
    impl DatabaseProvider for FixedProvider {
        async fn fetch_table(&self, _table: &TableName) -> Result<QueryResult, DatabaseError> {
            self.0.clone()
        }

        fn is_configured(&self) -> bool {
            !matches!(self.0, Err(DatabaseError::ConfigurationIncomplete(_)))
        }
    }

    fn table() -> TableName {
        TableRegistry::new(["empleados"]).unwrap().default_table().clone()
    }

    #[tokio::test]
    async fn test_success() {
        let result = QueryResult::new(
            vec!["id".to_string()],
            vec![vec![Some("1".to_string())]],
        )
        .unwrap();
        let outcome = fetch_for_display(&FixedProvider(Ok(result.clone())), &table()).await;

        assert_eq!(outcome.status.kind, StatusKind::Success);
        assert!(!outcome.status.message.contains("Error"));
        assert_eq!(outcome.result, Some(result));
    }

    #[tokio::test]
    async fn test_configuration_incomplete_is_a_warning() {
        let provider = FixedProvider(Err(DatabaseError::ConfigurationIncomplete(vec![
            "DB_HOST".to_string(),
        ])));
        let outcome = fetch_for_display(&provider, &table()).await;

        assert_eq!(outcome.status.kind, StatusKind::Warning);
        assert!(outcome.status.message.contains("DB_HOST"));
        assert!(outcome.result.is_none());
    }

    #[tokio::test]
    async fn test_connection_failure_carries_driver_text() {
        let provider = FixedProvider(Err(DatabaseError::ConnectionFailed(
            "connection refused".to_string(),
        )));
        let outcome = fetch_for_display(&provider, &table()).await;

        assert_eq!(outcome.status.kind, StatusKind::Error);
        assert!(outcome.status.message.contains("connection refused"));
        assert!(outcome.result.is_none());
    }

    #[tokio::test]
    async fn test_query_failure_is_appended_to_connection_message() {
        let provider = FixedProvider(Err(DatabaseError::QueryFailed(
            "relation \"empleados\" does not exist".to_string(),
        )));
        let outcome = fetch_for_display(&provider, &table()).await;

        assert_eq!(outcome.status.kind, StatusKind::Error);
        assert!(outcome.status.message.starts_with(CONNECTED_MESSAGE));
        assert!(outcome
            .status
            .message
            .ends_with("relation \"empleados\" does not exist"));
        assert!(outcome.result.is_none());
    }

    #[tokio::test]
    async fn test_empty_table_is_an_empty_result() {
        let provider = FixedProvider(Ok(QueryResult::default()));
        let outcome = fetch_for_display(&provider, &table()).await;

        assert_eq!(outcome.status.kind, StatusKind::Success);
        assert_eq!(outcome.result.map(|result| result.is_empty()), Some(true));
    }
}
