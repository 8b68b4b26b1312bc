//! WebAPI - read-only gallery endpoints
//!
//! ## Responsibilities
//!
//! - HTTP routes over the image store
//! - Response formatting
//!
//! Handlers are stateless per request and take a fresh store snapshot every
//! time; nothing here ever writes to the store.

pub mod gallery;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::Result;
use crate::state::AppState;

/// Create the gallery router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/", get(gallery_page))
        .route("/images/:filename", get(get_image))
        .with_state(state)
}

/// Health check endpoint
async fn ping() -> impl IntoResponse {
    Json(json!({ "message": "pong" }))
}

/// Gallery page, newest first
async fn gallery_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let images = state.store.list().await?;
    // no-store so the page always reflects the latest capture
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Html(gallery::render(&images)),
    ))
}

/// Raw image bytes, 404 for anything not in the store
async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = state.store.open(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::image_store::ImageStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn test_app(dir: &std::path::Path) -> Router {
        let store = ImageStore::new(dir);
        store.ensure_ready().await.unwrap();
        create_router(AppState {
            settings: Settings::default(),
            store,
        })
    }

    async fn send_get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn test_ping_pongs_regardless_of_store() {
        let dir = tempfile::tempdir().unwrap();
        let response = send_get(test_app(dir.path()).await, "/ping").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json, json!({ "message": "pong" }));
    }

    #[tokio::test]
    async fn test_gallery_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let response = send_get(test_app(dir.path()).await, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let page = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(page.contains("No images captured yet"));
        assert!(!page.contains("newest:"));
    }

    #[tokio::test]
    async fn test_gallery_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "2024-01-01_09-00-00.png",
            "2024-01-02_08-00-00.png",
            "2024-01-01_10-00-00.png",
        ] {
            std::fs::write(dir.path().join(name), b"png").unwrap();
        }

        let response = send_get(test_app(dir.path()).await, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let page = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(page.contains("3 images"));
        assert!(page.contains("newest: 2024-01-02_08-00-00.png"));

        let newest = page.find("/images/2024-01-02_08-00-00.png").unwrap();
        let middle = page.find("/images/2024-01-01_10-00-00.png").unwrap();
        let oldest = page.find("/images/2024-01-01_09-00-00.png").unwrap();
        assert!(newest < middle);
        assert!(middle < oldest);
    }

    #[tokio::test]
    async fn test_get_image_serves_png_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("2024-01-01_10-00-00.png"), b"png bytes").unwrap();

        let response = send_get(
            test_app(dir.path()).await,
            "/images/2024-01-01_10-00-00.png",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        assert_eq!(body_bytes(response).await, b"png bytes");
    }

    #[tokio::test]
    async fn test_get_image_missing_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = send_get(
            test_app(dir.path()).await,
            "/images/2024-01-01_10-00-00.png",
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_image_rejects_invalid_names() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let response = send_get(app.clone(), "/images/not-an-image.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send_get(app, "/images/..%2F..%2Fetc%2Fpasswd").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
