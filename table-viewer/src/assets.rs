//! Static asset serving
//!
//! The page stylesheet is embedded at compile time and served with its MIME
//! type and a long-lived cache header.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use include_dir::{include_dir, Dir};

// Embed the assets directory at compile time
static ASSETS: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Create a router for serving embedded assets
///
/// This returns a Router that serves:
/// - GET {base_path}/assets/* -> embedded files with long-term caching
///
/// # Arguments
///
/// * `base_path` - Normalised mount path, `""` for the root
pub fn create_assets_router(base_path: &str) -> Router {
    // Note: Axum 0.8 uses {*wildcard} syntax for wildcard captures
    Router::new().route(
        &format!("{}/assets/{{*path}}", base_path),
        get(serve_static_asset),
    )
}

/// Serve an embedded asset with its MIME type
///
/// Caching: max-age=86400 (1 day); the stylesheet is not content-hashed
async fn serve_static_asset(Path(path): Path<String>) -> Response {
    match ASSETS.get_file(&path) {
        Some(file) => {
            let mime_type = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime_type),
                    (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
                ],
                file.contents(),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Asset not found: {}", path),
        )
            .into_response(),
    }
}
