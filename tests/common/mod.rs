//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary database and photo
//! directory, an admin login, and the full [`AppContext`].

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use sweetshop::catalog::CatalogService;
use sweetshop::config::Config;
use sweetshop::photos::PhotoRepository;
use sweetshop::server::{create_router, AppContext};
use sweetshop_db::pool::init_pool;
use sweetshop_db::store::ProductStore;
use tempfile::TempDir;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "marshmallow";
pub const API_KEY: &str = "test-api-key";
pub const PHOTO_PREFIX: &str = "/static/images/products";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Harness with auth enabled, an admin login and an API key.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.auth.enabled = true;
        config.server.auth.username = Some(ADMIN_USER.to_string());
        config.server.auth.password_hash =
            Some(bcrypt::hash(ADMIN_PASSWORD, 4).expect("failed to hash password"));
        config.server.auth.api_key = Some(API_KEY.to_string());
        config.server.auth.session_secret = Some("test-session-secret".to_string());
        Self::with_config(config)
    }

    /// Harness with a custom configuration. Storage paths are replaced with
    /// paths inside a fresh temporary directory.
    pub fn with_config(mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        config.storage.database_path = dir.path().join("products.db");
        config.storage.photo_dir = dir.path().join("photos");
        config.storage.photo_url_prefix = PHOTO_PREFIX.to_string();

        let pool = init_pool(&config.storage.database_path).expect("failed to create pool");
        let photos = PhotoRepository::open(&config.storage.photo_dir, PHOTO_PREFIX)
            .expect("failed to open photo directory");
        let catalog = CatalogService::new(ProductStore::new(pool), photos);

        Self {
            ctx: AppContext::new(config, catalog),
            dir,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.ctx.catalog
    }

    pub fn product_count(&self) -> u64 {
        self.catalog().products().count().expect("count failed")
    }

    /// Names of the files in the photo directory, sorted.
    pub fn photo_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.catalog().photos().root())
            .expect("failed to read photo dir")
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

/// Hand-built `multipart/form-data` request body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "sweetshop-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Build a request authenticated with the API key.
    pub fn request(self, method: Method, uri: &str) -> Request<Body> {
        self.request_with_auth(method, uri, Some(API_KEY))
    }

    pub fn request_with_auth(
        mut self,
        method: Method,
        uri: &str,
        api_key: Option<&str>,
    ) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        let mut builder = Request::builder().method(method).uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", self.boundary),
        );
        if let Some(key) = api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }
        builder.body(Body::from(self.body)).unwrap()
    }
}

/// Request without a body, authenticated with the API key.
pub fn admin_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", API_KEY))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
