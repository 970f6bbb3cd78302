use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::sync::Arc;
use table_viewer::{
    DatabaseConfig, DatabaseProvider, PostgresProvider, TableRegistry, TableViewerLayer,
    ViewerConfig,
};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Tables and views offered in the navigation; the first one is the default
const TABLES: [&str; 7] = [
    "v_empleados_completos",
    "v_departamentos_completos",
    "v_equipos_asignados",
    "computadora",
    "nobreak",
    "telefono",
    "impresora",
];

#[derive(Clone)]
struct ApplicationState {
    database: Arc<PostgresProvider>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Configuration is read once; every request reuses it
    let viewer_config = ViewerConfig::from_env().context("Invalid viewer configuration")?;
    let database_config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    let registry = TableRegistry::new(TABLES).context("Invalid table registry")?;

    let database = Arc::new(PostgresProvider::new(database_config));
    if database.is_configured() {
        info!(connection = ?database.config().connection, "Database configured");
    } else {
        info!(
            missing = ?database.config().connection.missing_fields(),
            "Database not configured, pages will show a warning"
        );
    }

    let application_state = ApplicationState {
        database: database.clone(),
    };

    // Note: the viewer router is merged after with_state() since it carries its own state
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(application_state)
        .merge(
            TableViewerLayer::with_shared_database(&viewer_config.base_path, registry, database)
                .with_title(viewer_config.title.clone())
                .into_router(),
        )
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(viewer_config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", viewer_config.bind_address))?;

    info!(
        address = %viewer_config.bind_address,
        base_path = %viewer_config.base_path,
        "Table viewer listening"
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Liveness plus configuration state; never opens a database connection
async fn health_handler(State(state): State<ApplicationState>) -> (StatusCode, &'static str) {
    if state.database.is_configured() {
        (StatusCode::OK, "ok: configured")
    } else {
        (StatusCode::OK, "ok: not configured")
    }
}
