//! TableViewerLayer - Main Axum integration layer
//!
//! This module provides the main entry point for integrating the table viewer
//! into an Axum application.

use crate::config::{normalize_base_path, DatabaseConfig};
use crate::database::postgres::PostgresProvider;
use crate::database::traits::DatabaseProvider;
use crate::handlers::{view_table_handler, ViewerState};
use crate::registry::TableRegistry;
use axum::{routing::get, Router};
use std::sync::Arc;

use crate::assets::create_assets_router;

const DEFAULT_TITLE: &str = "Company Asset Viewer";

/// Main layer for integrating the table viewer into an Axum application
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use table_viewer::{DatabaseConfig, TableRegistry, TableViewerLayer};
///
/// # fn example() -> table_viewer::Result<()> {
/// let registry = TableRegistry::new(["empleado", "computadora"])?;
/// let viewer = TableViewerLayer::postgres("/viewer", registry, DatabaseConfig::from_env()?);
/// let app: Router = Router::new().merge(viewer.into_router());
/// # Ok(())
/// # }
/// ```
pub struct TableViewerLayer<DB: DatabaseProvider> {
    base_path: String,
    registry: TableRegistry,
    title: String,
    database: Arc<DB>,
}

impl<DB: DatabaseProvider> TableViewerLayer<DB> {
    /// Create a new table viewer at the given base path
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the viewer will be mounted (e.g., "/viewer"); "/" mounts at the root
    /// * `registry` - The tables and views that may be displayed
    /// * `database` - The database provider implementation
    pub fn new(base_path: impl AsRef<str>, registry: TableRegistry, database: DB) -> Self {
        Self::with_shared_database(base_path, registry, Arc::new(database))
    }

    /// Like [`TableViewerLayer::new`], for a provider that is also used elsewhere
    pub fn with_shared_database(
        base_path: impl AsRef<str>,
        registry: TableRegistry,
        database: Arc<DB>,
    ) -> Self {
        Self {
            base_path: normalize_base_path(base_path.as_ref()),
            registry,
            title: DEFAULT_TITLE.to_string(),
            database,
        }
    }

    /// Set the heading shown on every page
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Convert into an Axum Router that can be merged
    ///
    /// This method consumes the layer and returns a Router that can be merged
    /// into your main application router.
    ///
    /// The returned router includes:
    /// - The page at `{base_path}` and `{base_path}/`
    /// - The embedded stylesheet at `{base_path}/assets/*`
    pub fn into_router(self) -> Router {
        let state = Arc::new(ViewerState {
            registry: self.registry,
            database: self.database,
            title: self.title,
            base_path: self.base_path.clone(),
        });

        // Full paths instead of nest(): both `{base}` and `{base}/` must answer
        let mut page_router =
            Router::new().route(&format!("{}/", self.base_path), get(view_table_handler::<DB>));
        if !self.base_path.is_empty() {
            page_router = page_router.route(&self.base_path, get(view_table_handler::<DB>));
        }

        page_router
            .with_state(state)
            .merge(create_assets_router(&self.base_path))
    }
}

impl TableViewerLayer<PostgresProvider> {
    /// Create a new table viewer backed by PostgreSQL
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the viewer will be mounted
    /// * `registry` - The tables and views that may be displayed
    /// * `config` - Connection settings used for every request
    pub fn postgres(
        base_path: impl AsRef<str>,
        registry: TableRegistry,
        config: DatabaseConfig,
    ) -> Self {
        Self::new(base_path, registry, PostgresProvider::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::traits::DatabaseError;
    use crate::registry::TableName;
    use crate::render::REJECTION_MESSAGE;
    use crate::schema::QueryResult;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Test double recording every table it was asked for
    struct RecordingProvider {
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
        response: Result<QueryResult, DatabaseError>,
    }

    impl RecordingProvider {
        fn returning(response: Result<QueryResult, DatabaseError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl DatabaseProvider for RecordingProvider {
        async fn fetch_table(&self, table: &TableName) -> Result<QueryResult, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(table.as_str().to_string());
            self.response.clone()
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn registry() -> TableRegistry {
        TableRegistry::new(["empleados", "computadoras", "impresoras"]).unwrap()
    }

    fn sample_result() -> QueryResult {
        QueryResult::new(
            vec!["id".to_string(), "nombre".to_string()],
            vec![vec![Some("1".to_string()), Some("Ana".to_string())]],
        )
        .unwrap()
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| value.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_default_table_is_selected() {
        let provider = Arc::new(RecordingProvider::returning(Ok(sample_result())));
        let router =
            TableViewerLayer::with_shared_database("/", registry(), provider.clone()).into_router();

        let (status, content_type, body) = get(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert!(body.contains("<a href=\"?tabla=empleados\" class=\"active\">Empleados</a>"));
        assert!(body.contains("<div class=\"status success\">"));
        assert!(body.contains("<td>Ana</td>"));
        assert_eq!(*provider.requested.lock().unwrap(), vec!["empleados".to_string()]);
    }

    #[tokio::test]
    async fn test_each_registered_table_is_selectable() {
        for name in ["empleados", "computadoras", "impresoras"] {
            let provider = Arc::new(RecordingProvider::returning(Ok(QueryResult::default())));
            let router = TableViewerLayer::with_shared_database("", registry(), provider.clone())
                .into_router();

            let (status, _, body) = get(router, &format!("/?tabla={}", name)).await;

            assert_eq!(status, StatusCode::OK);
            assert!(body.contains(&format!("<a href=\"?tabla={}\" class=\"active\">", name)));
            assert_eq!(body.matches("class=\"active\"").count(), 1);
            assert!(body.contains(&format!("The table &quot;{}&quot; has no records.", name)));
            assert_eq!(*provider.requested.lock().unwrap(), vec![name.to_string()]);
        }
    }

    #[tokio::test]
    async fn test_unknown_table_is_rejected_without_database_call() {
        let provider = Arc::new(RecordingProvider::returning(Ok(sample_result())));
        let router =
            TableViewerLayer::with_shared_database("/", registry(), provider.clone()).into_router();

        let (status, content_type, body) = get(router, "/?tabla=drop_table").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(body, REJECTION_MESSAGE);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_injection_attempt_is_rejected() {
        let provider = Arc::new(RecordingProvider::returning(Ok(sample_result())));
        let router =
            TableViewerLayer::with_shared_database("/", registry(), provider.clone()).into_router();

        let (status, _, body) =
            get(router, "/?tabla=empleados%3B%20DROP%20TABLE%20empleados").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.contains("DROP"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connection_failure_is_shown_escaped() {
        let provider = Arc::new(RecordingProvider::returning(Err(
            DatabaseError::ConnectionFailed("could not reach <db-host>".to_string()),
        )));
        let router =
            TableViewerLayer::with_shared_database("/", registry(), provider.clone()).into_router();

        let (status, _, body) = get(router, "/?tabla=impresoras").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<div class=\"status error\">"));
        assert!(body.contains("could not reach &lt;db-host&gt;"));
        assert!(!body.contains("<db-host>"));
        assert!(body.contains("The data cannot be displayed."));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_database_is_a_warning() {
        let registry = registry();
        let router = TableViewerLayer::postgres(
            "/",
            registry,
            DatabaseConfig::from_lookup(|_| None).unwrap(),
        )
        .with_title("Inventario")
        .into_router();

        let (status, _, body) = get(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<div class=\"status warning\">"));
        assert!(body.contains("<h1>Inventario</h1>"));
        assert!(body.contains("The data cannot be displayed."));
    }

    #[tokio::test]
    async fn test_page_is_served_under_the_base_path() {
        for uri in [
            "/visor",
            "/visor/",
            "/visor?tabla=computadoras",
            "/visor/?tabla=computadoras",
        ] {
            let provider = Arc::new(RecordingProvider::returning(Ok(sample_result())));
            let router = TableViewerLayer::with_shared_database("/visor", registry(), provider.clone())
                .into_router();

            let (status, content_type, body) = get(router, uri).await;

            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
            assert!(body.contains("href=\"/visor/assets/viewer.css\""));
            assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        }

        let provider = RecordingProvider::returning(Ok(sample_result()));
        let router = TableViewerLayer::new("/visor", registry(), provider).into_router();
        let (status, _, _) = get(router, "/visor/?tabla=drop_table").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assets_are_served_under_the_base_path() {
        let provider = RecordingProvider::returning(Ok(QueryResult::default()));
        let router = TableViewerLayer::new("/visor", registry(), provider).into_router();

        let (status, content_type, _) = get(router, "/visor/assets/viewer.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/css"));
    }
}
