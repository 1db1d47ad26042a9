//! Integration tests for the public storefront routes.

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{body_bytes, body_json, MultipartForm, TestHarness, PHOTO_PREFIX};
use tower::ServiceExt;

async fn add(h: &TestHarness, name: &str, category: &str, photo: Option<&str>) -> i64 {
    let mut form = MultipartForm::new()
        .text("name", name)
        .text("price", "10")
        .text("category", category);
    if let Some(filename) = photo {
        form = form.file("photo", filename, b"fake image");
    }

    let response = h
        .router()
        .oneshot(form.request(Method::POST, "/api/admin/products"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["product"]["id"]
        .as_i64()
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let h = TestHarness::new();
    let response = h.router().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_empty() {
    let h = TestHarness::new();
    let response = h.router().oneshot(get("/api/catalog")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_categories() {
    let h = TestHarness::new();
    let response = h.router().oneshot(get("/api/categories")).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!(["Зефир", "Букеты", "Торты", "Выпечка", "Другое"])
    );
}

#[tokio::test]
async fn test_catalog_lists_products_with_photos() {
    let h = TestHarness::new();
    let with_photo = add(&h, "Cake", "Торты", Some("cake.jpg")).await;
    let without_photo = add(&h, "Roses", "Букеты", None).await;

    let response = h.router().oneshot(get("/api/catalog")).await.unwrap();
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], with_photo);
    assert_eq!(entries[0]["name"], "Cake");
    assert_eq!(entries[0]["is_available"], true);
    assert_eq!(
        entries[0]["photo_url"],
        format!("{}/{}.jpg", PHOTO_PREFIX, with_photo)
    );
    assert_eq!(entries[1]["id"], without_photo);
    assert!(entries[1]["photo_url"].is_null());
}

#[tokio::test]
async fn test_catalog_category_filter() {
    let h = TestHarness::new();
    add(&h, "Cake", "Торты", None).await;
    add(&h, "Vanilla", "Зефир", None).await;
    add(&h, "Cheesecake", "Торты", None).await;

    let uri = "/api/catalog?category=%D0%A2%D0%BE%D1%80%D1%82%D1%8B"; // Торты
    let response = h.router().oneshot(get(uri)).await.unwrap();
    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cake", "Cheesecake"]);

    let response = h
        .router()
        .oneshot(get("/api/catalog?category=unknown"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_photo_is_served() {
    let h = TestHarness::new();
    let id = add(&h, "Cake", "Торты", Some("cake.png")).await;

    let uri = format!("{}/{}.png", PHOTO_PREFIX, id);
    let response = h.router().oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"fake image");
}

#[tokio::test]
async fn test_missing_photo_is_not_found() {
    let h = TestHarness::new();
    let uri = format!("{}/99.jpg", PHOTO_PREFIX);
    let response = h.router().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
