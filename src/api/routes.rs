use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::path::Path;
use tower_http::services::ServeDir;

use crate::api::handlers::{self, AppState};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>(media_dir: &Path) -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Page state
        .route("/page", get(handlers::get_page::<S>))
        .route("/page/reload", post(handlers::reload_page::<S>))
        .route("/modal/open", post(handlers::open_modal::<S>))
        .route("/modal/close", post(handlers::close_modal::<S>))
        // Products
        .route("/products", get(handlers::list_products::<S>))
        .route("/products", post(handlers::create_product::<S>))
        // The handler streams the file part and keeps at most the upload cap in memory
        .route(
            "/products/upload",
            post(handlers::upload_product::<S>).layer(DefaultBodyLimit::disable()),
        )
        .route("/products/:product_id", delete(handlers::delete_product::<S>))
        // Selection and bulk actions
        .route("/selection", get(handlers::get_selection::<S>))
        .route("/selection", delete(handlers::clear_selection::<S>))
        .route("/selection/delete", post(handlers::delete_selected::<S>))
        .route("/selection/:product_id", put(handlers::toggle_selection::<S>))
        // Groups
        .route("/groups", get(handlers::list_groups::<S>))
        .route("/groups", post(handlers::create_group::<S>))
        // Uploaded images
        .nest_service("/media", ServeDir::new(media_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::PageController;
    use crate::store::{LocalBlobStore, MemoryStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const LIMIT: usize = 1024;

    fn app(dir: &Path) -> Router {
        let blobs = LocalBlobStore::new(dir, "http://localhost/media");
        let controller = PageController::new(Arc::new(MemoryStore::new()), Arc::new(blobs), LIMIT);
        create_router::<MemoryStore>(dir).with_state(Arc::new(Mutex::new(controller)))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(&app(dir.path()), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_create_product_validation_returns_field_codes() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = call(
            &app,
            Method::POST,
            "/products",
            Some(json!({"title": " ", "image": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let codes: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["title_required", "image_required"]);

        let (_, products) = call(&app, Method::GET, "/products", None).await;
        assert_eq!(products, json!([]));
    }

    #[tokio::test]
    async fn test_select_group_and_delete_flow() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let mut ids = Vec::new();
        for title in ["Sandals", "Hat"] {
            let (status, product) = call(
                &app,
                Method::POST,
                "/products",
                Some(json!({"title": title, "notes": "", "image": "https://img.example/x.png"})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            ids.push(product["id"].as_str().unwrap().to_string());
        }

        for id in &ids {
            let (status, body) = call(
                &app,
                Method::PUT,
                &format!("/selection/{}", id),
                Some(json!({"included": true})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["bulk_actions_visible"], true);
        }

        let (status, group) = call(
            &app,
            Method::POST,
            "/groups",
            Some(json!({"name": "Summer", "notes": "beach"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(group["products"], json!(ids));

        let (_, selection) = call(&app, Method::GET, "/selection", None).await;
        assert_eq!(selection["selection"], json!([]));
        assert_eq!(selection["bulk_actions_visible"], false);

        call(
            &app,
            Method::PUT,
            &format!("/selection/{}", ids[0]),
            Some(json!({"included": true})),
        )
        .await;
        let (status, outcome) = call(&app, Method::POST, "/selection/delete", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["deleted"], json!([ids[0]]));
        assert_eq!(outcome["failed"], json!([]));

        let (_, groups) = call(&app, Method::GET, "/groups", None).await;
        assert_eq!(groups[0]["product_count"], 2);
        assert_eq!(groups[0]["stale_count"], 1);
        assert_eq!(groups[0]["members"][0]["stale"], true);

        let (_, page) = call(&app, Method::GET, "/page", None).await;
        assert_eq!(page["products"].as_array().unwrap().len(), 1);
        assert_eq!(page["products"][0]["title"], "Hat");
        assert!(!page["notifications"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_group_without_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let (_, product) = call(
            &app,
            Method::POST,
            "/products",
            Some(json!({"title": "Hat", "image": "https://img.example/hat.png"})),
        )
        .await;
        let uri = format!("/selection/{}", product["id"].as_str().unwrap());
        call(&app, Method::PUT, &uri, Some(json!({"included": true}))).await;

        let (status, body) = call(&app, Method::POST, "/groups", Some(json!({"name": "  "}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["fields"], json!([{"code": "group_name_required"}]));
    }

    #[tokio::test]
    async fn test_selecting_unknown_product_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = call(
            &app,
            Method::PUT,
            "/selection/ghost",
            Some(json!({"included": true})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["fields"][0]["code"], "unknown_product");
        assert_eq!(body["fields"][0]["id"], "ghost");

        let (_, selection) = call(&app, Method::GET, "/selection", None).await;
        assert_eq!(selection["selection"], json!([]));
    }

    #[tokio::test]
    async fn test_modal_close_resets_form() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (_, body) = call(&app, Method::POST, "/modal/open", None).await;
        assert_eq!(body["modal_open"], true);
        call(&app, Method::POST, "/products", Some(json!({"title": "Half filled"}))).await;

        let (_, page) = call(&app, Method::GET, "/page", None).await;
        assert_eq!(page["modal_open"], true);
        assert_eq!(page["product_form"]["title"], "Half filled");

        call(&app, Method::POST, "/modal/close", None).await;
        let (_, page) = call(&app, Method::GET, "/page", None).await;
        assert_eq!(page["modal_open"], false);
        assert_eq!(page["product_form"]["title"], "");
    }
}
