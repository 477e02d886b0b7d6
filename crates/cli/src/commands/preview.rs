use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use folio_core::RedirectsConfig;
use folio_generator::{ContentSource, respond};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::error;

use super::load_site;

#[derive(Clone)]
struct AppState {
    source: Arc<dyn ContentSource>,
    redirects: RedirectsConfig,
}

/// Serve the redirect manifest locally.
///
/// The manifest is rebuilt from the content directory on every request, so
/// edits show up without restarting the server.
///
/// # Arguments
///
/// * `path` - Path to site directory containing site.toml
/// * `port` - Port to serve on (default: 8080)
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("🌐 Starting preview server...");
    println!("   Site: {}", path.display());

    let (site, source) = load_site(&path)?;
    println!("   ✓ Loaded: {}", site.site.title);

    let manifest_path = site.redirects.path.clone();
    let app = router(Arc::new(source), site.redirects);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Manifest: http://localhost:{}/{}", port, manifest_path);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(source: Arc<dyn ContentSource>, redirects: RedirectsConfig) -> Router {
    Router::new()
        .route("/{*path}", get(manifest_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { source, redirects })
}

/// Answers with the manifest for its synthetic path, 404 for anything else
async fn manifest_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match respond(state.source.as_ref(), &state.redirects, &path).await {
        Ok(Some(manifest)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            manifest,
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("failed to build redirect manifest: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use folio_core::Collection;
    use folio_core::testing::entry;
    use folio_generator::StaticContentSource;
    use tower::ServiceExt;

    fn app(source: StaticContentSource) -> Router {
        router(Arc::new(source), RedirectsConfig::default())
    }

    async fn get_path(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serves_manifest() {
        let source = StaticContentSource::new()
            .with_collection(Collection::Blog, vec![entry("hello", Collection::Blog)])
            .with_collection(
                Collection::Portfolio,
                vec![entry("site", Collection::Portfolio)],
            );

        let (status, content_type, body) = get_path(app(source), "/_redirects").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(
            body,
            "/hello/ /blog/hello/ 301\n/site/ /portfolio/site/ 301\n"
        );
    }

    #[tokio::test]
    async fn test_other_paths_not_found() {
        let source = StaticContentSource::new()
            .with_collection(Collection::Blog, vec![])
            .with_collection(Collection::Portfolio, vec![]);

        let (status, _, body) = get_path(app(source), "/hello/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_collection_is_server_error() {
        let source = StaticContentSource::new().with_collection(Collection::Blog, vec![]);

        let (status, _, _) = get_path(app(source), "/_redirects").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
