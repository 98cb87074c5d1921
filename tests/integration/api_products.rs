//! REST API tests against a file-backed database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use storefront::data::{Database, Product, ProductStore};
use storefront::web::{build_router, AppState};

fn file_backed_state(dir: &tempfile::TempDir) -> (AppState, ProductStore) {
    let db = Database::open(dir.path().join("catalog.db")).unwrap();
    let store = ProductStore::new(db.connection());
    (AppState::new(store.clone()), store)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn listing_includes_created_rows_in_id_order() {
    let dir = tempfile::tempdir().unwrap();
    let (state, store) = file_backed_state(&dir);

    let created = store
        .create(&Product::new(
            "Integration Widget",
            "added by test",
            "99.95",
            None,
        ))
        .unwrap();

    let app = build_router(state, true);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    // Six seeded rows plus the created one, id-ascending.
    assert_eq!(rows.len(), 7);
    assert_eq!(rows.last().unwrap()["id"].as_i64(), Some(created.id));
    assert_eq!(rows.last().unwrap()["price"], serde_json::json!("99.95"));
}

#[tokio::test]
async fn detail_roundtrips_a_created_product() {
    let dir = tempfile::tempdir().unwrap();
    let (state, store) = file_backed_state(&dir);

    let created = store
        .create(&Product::new(
            "Detail Widget",
            "fetched by id",
            "12.00",
            Some("https://example.com/detail.png".into()),
        ))
        .unwrap();

    let app = build_router(state, true);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{}", created.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], serde_json::json!("Detail Widget"));
    assert_eq!(
        json["image_url"],
        serde_json::json!("https://example.com/detail.png")
    );
    assert_eq!(json["price"], serde_json::json!("12.00"));
}

#[tokio::test]
async fn missing_product_yields_404_with_error_body() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _store) = file_backed_state(&dir);

    let app = build_router(state, true);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/products/424242")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _store) = file_backed_state(&dir);

    let app = build_router(state, true);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], serde_json::json!("ok"));
}
