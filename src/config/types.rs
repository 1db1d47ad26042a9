use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory with a built storefront UI, served for unmatched paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Maximum request body size, which bounds photo uploads (default: 10 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Require an admin login for catalog changes (default: true)
    #[serde(default = "default_auth_enabled")]
    pub enabled: bool,

    /// API key for programmatic access (used with Authorization: Bearer header)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Admin username for login
    #[serde(default)]
    pub username: Option<String>,

    /// Bcrypt hash of the password (generate with `sweetshop hash-password`)
    #[serde(default)]
    pub password_hash: Option<String>,

    /// Key for signing session cookies. A random key is used when unset,
    /// so sessions do not survive a restart.
    #[serde(default)]
    pub session_secret: Option<String>,

    /// Session timeout in hours (default: 168)
    #[serde(default = "default_session_timeout")]
    pub session_timeout_hours: u64,
}

fn default_auth_enabled() -> bool {
    true
}

fn default_session_timeout() -> u64 {
    24 * 7
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_auth_enabled(),
            api_key: None,
            username: None,
            password_hash: None,
            session_secret: None,
            session_timeout_hours: default_session_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory holding product photos
    #[serde(default = "default_photo_dir")]
    pub photo_dir: PathBuf,

    /// Public path the photo directory is served under
    #[serde(default = "default_photo_url_prefix")]
    pub photo_url_prefix: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("products.db")
}

fn default_photo_dir() -> PathBuf {
    PathBuf::from("static/images/products")
}

fn default_photo_url_prefix() -> String {
    "/static/images/products".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            photo_dir: default_photo_dir(),
            photo_url_prefix: default_photo_url_prefix(),
        }
    }
}
