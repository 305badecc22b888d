mod api;
mod error;
mod pages;

use crate::config::Config;
use crate::prelude::{eprintln, *};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "MARKNOTE_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

/// Shared handler state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::index))
        .route("/todos/{id}", get(pages::todo_page))
        .route("/posts/{id}", get(pages::post_page))
        .route("/api/render", post(api::render_markdown))
        .route("/api/todos", get(api::list_todos).post(api::create_todo))
        .route(
            "/api/todos/{id}",
            get(api::get_todo)
                .post(api::update_todo)
                .delete(api::delete_todo),
        )
        .route("/api/todos/{id}/toggle", post(api::toggle_todo))
        .route("/api/posts", get(api::list_posts).post(api::create_post))
        .route(
            "/api/posts/{id}",
            get(api::get_post)
                .post(api::update_post)
                .delete(api::delete_post),
        )
        .layer(cors)
        .with_state(state)
}

pub async fn run(options: ServeOptions, config: Config) -> Result<()> {
    let addr = format!("{}:{}", options.host, options.port);
    let verbose = config.verbose;

    if verbose {
        eprintln!("Serving records from {}", config.data_dir.display());
    }

    let app_router = router(Arc::new(AppState { config }));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("listening on http://{addr}");
    if verbose {
        eprintln!("marknote listening on http://{}", addr);
    }

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    async fn spawn_server(temp_dir: &TempDir) -> String {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            utc_offset: chrono::FixedOffset::east_opt(9 * 3600).unwrap(),
            verbose: false,
        };
        let app = router(Arc::new(AppState { config }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_render_endpoint() {
        let temp_dir = TempDir::new().unwrap();
        let base = spawn_server(&temp_dir).await;
        let client = reqwest::Client::new();
        let markdown = "   # Title\n<script>alert(1)</script>";

        let response = client
            .post(format!("{base}/api/render"))
            .json(&json!({ "markdown": markdown }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        let html = body["html"].as_str().unwrap();
        assert!(html.starts_with("<h1>Title</h1>"));
        assert!(!html.contains("script"));
    }

    #[tokio::test]
    async fn test_todo_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let base = spawn_server(&temp_dir).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/api/todos"))
            .json(&json!({
                "title": "Groceries",
                "description": "- [ ] milk\n- [x] eggs",
                "priority": "high",
                "due_date": "2025-06-01"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = response.json().await.unwrap();
        assert_eq!(created["id"], 1);
        assert_eq!(created["priority"], "high");
        assert!(created["description"]["html"]
            .as_str()
            .unwrap()
            .contains("checkbox"));

        let response = client
            .post(format!("{base}/api/todos/1"))
            .json(&json!({ "description": "", "due_date": null }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Value = response.json().await.unwrap();
        assert_eq!(updated["description"]["html"], "");
        assert_eq!(updated["due_date"], Value::Null);

        let response = client
            .post(format!("{base}/api/todos/1/toggle"))
            .send()
            .await
            .unwrap();
        let toggled: Value = response.json().await.unwrap();
        assert_eq!(toggled["completed"], true);

        let done: Value = client
            .get(format!("{base}/api/todos?status=done"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(done.as_array().unwrap().len(), 1);

        let pending: Value = client
            .get(format!("{base}/api/todos?status=pending"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(pending.as_array().unwrap().is_empty());

        let response = client
            .delete(format!("{base}/api/todos/1"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = client
            .get(format!("{base}/api/todos/1"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "To-do not found: 1");
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_requests() {
        let temp_dir = TempDir::new().unwrap();
        let base = spawn_server(&temp_dir).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/api/todos"))
            .json(&json!({ "title": "   " }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Title is required");

        let response = client
            .post(format!("{base}/api/posts"))
            .json(&json!({ "title": "Empty", "content": "" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(!temp_dir.path().join("todos.json").exists());
    }

    #[tokio::test]
    async fn test_post_pages_escape_titles() {
        let temp_dir = TempDir::new().unwrap();
        let base = spawn_server(&temp_dir).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/api/posts"))
            .json(&json!({
                "title": "<b>Bold</b> & co",
                "content": "Hello <img src=x onerror=alert(1)>"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let page = client
            .get(format!("{base}/posts/1"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("<h1>&lt;b&gt;Bold&lt;/b&gt; &amp; co</h1>"));
        assert!(!page.contains("onerror"));

        let index = client
            .get(&base)
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        let link = "<a href=\"/posts/1\">&lt;b&gt;Bold&lt;/b&gt; &amp; co</a>";
        assert!(index.contains(link));

        let response = client
            .get(format!("{base}/posts/9"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
