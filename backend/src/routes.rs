use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/posts", get(handlers::list_posts))
        .route("/api/posts/:slug", get(handlers::get_post))
        .route("/api/tags", get(handlers::list_tags))
        .route("/api/projects", get(handlers::list_projects))
        .route("/api/projects/:id", get(handlers::get_project))
        .route("/api/projects/:id/posts", get(handlers::list_project_posts))
        .with_state(state)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    fn write(root: &Path, relative: &str, body: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent dir")).expect("create dir");
        fs::write(path, body).expect("write post");
    }

    fn content() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        write(
            dir.path(),
            "general/hello.mdx",
            "---\ntitle: Hello\ndate: 2024-01-01\ntags: [Rust]\n---\nHi.\n",
        );
        write(
            dir.path(),
            "car-price/drift-notes.mdx",
            "---\ntitle: Drift notes\ndate: 2024-03-01\nproject: car-price\ntags: [mlops, rust]\n---\nKS test.\n",
        );
        dir
    }

    async fn get_json(dir: &TempDir, uri: &str) -> (StatusCode, Value) {
        let app = create_router(AppState::new(&dir.path().to_string_lossy()));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn lists_posts_newest_first_with_filters() {
        let dir = content();
        let (status, body) = get_json(&dir, "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["posts"][0]["slug"], "drift-notes");
        assert_eq!(body["posts"][0]["readTime"], 1);
        assert!(body["posts"][0].get("content").is_none());

        let (_, body) = get_json(&dir, "/api/posts?tag=rust&project=car-price").await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn post_detail_and_missing_post() {
        let dir = content();
        let (status, body) = get_json(&dir, "/api/posts/drift-notes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["title"], "Drift notes");
        assert_eq!(body["backLink"]["href"], "/projects/car-price/blog");

        let (status, body) = get_json(&dir, "/api/posts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn malformed_post_is_not_found() {
        let dir = content();
        write(dir.path(), "general/broken.mdx", "No header here.\n");
        let (_, body) = get_json(&dir, "/api/posts").await;
        assert_eq!(body["total"], 2);

        let (status, body) = get_json(&dir, "/api/posts/broken").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn duplicate_slugs_are_a_server_error() {
        let dir = content();
        write(dir.path(), "other/hello.mdx", "---\ntitle: Again\ndate: 2024-02-01\n---\n");
        let (status, body) = get_json(&dir, "/api/posts").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 500);
    }

    #[tokio::test]
    async fn tags_and_projects() {
        let dir = content();
        let (_, body) = get_json(&dir, "/api/tags").await;
        assert_eq!(body["tags"][0]["name"], "rust");
        assert_eq!(body["tags"][0]["count"], 2);
        assert_eq!(body["tags"].as_array().map(Vec::len), Some(2));
        let (_, body) = get_json(&dir, "/api/posts?tag=RUST").await;
        assert_eq!(body["total"], 2);

        let (status, body) = get_json(&dir, "/api/projects").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["projects"][0]["id"], "car-price");

        let (_, body) = get_json(&dir, "/api/projects/car-price").await;
        assert_eq!(body["nav"].as_array().map(Vec::len), Some(5));

        let (status, _) = get_json(&dir, "/api/projects/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = get_json(&dir, "/api/projects/car-price/posts").await;
        assert_eq!(body["total"], 1);
        let (_, body) = get_json(&dir, "/api/projects/unknown/posts").await;
        assert_eq!(body["total"], 0);
    }
}
