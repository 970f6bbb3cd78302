//! Page endpoint

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::database::gateway::fetch_for_display;
use crate::database::traits::DatabaseProvider;
use crate::registry::TableRegistry;
use crate::render::{render_page, render_rejection, PageContext};
use crate::schema::TableQuery;

/// Shared, read-only state of the viewer
pub struct ViewerState<DB: DatabaseProvider> {
    pub registry: TableRegistry,
    pub database: Arc<DB>,
    pub title: String,
    pub base_path: String,
}

/// Handler for GET /?tabla=<name>
///
/// Resolves the requested table against the registry, fetches it and renders
/// the page. An unknown name is answered with a plaintext rejection before
/// the database is involved.
///
/// # Arguments
///
/// * `state` - Registry, provider and page settings
/// * `query` - Optional `tabla` parameter
///
/// # Returns
///
/// An HTML page, or `400 Bad Request` for a name outside the registry
pub async fn view_table_handler<DB: DatabaseProvider>(
    State(state): State<Arc<ViewerState<DB>>>,
    Query(query): Query<TableQuery>,
) -> Response {
    let selected = match state.registry.resolve(query.table.as_deref()) {
        Ok(table) => table,
        Err(error) => {
            warn!(%error, "Rejected table request");
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                render_rejection(),
            )
                .into_response();
        }
    };

    let outcome = fetch_for_display(state.database.as_ref(), selected).await;

    let html = render_page(&PageContext {
        title: &state.title,
        base_path: &state.base_path,
        registry: &state.registry,
        selected,
        status: &outcome.status,
        result: outcome.result.as_ref(),
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        html,
    )
        .into_response()
}
