mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./sweetshop.toml",
        "~/.config/sweetshop/config.toml",
        "/etc/sweetshop/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    // Validate server config
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if let Some(ref dir) = config.server.static_dir {
        if !dir.exists() {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    let auth = &config.server.auth;
    if auth.enabled && auth.username.is_some() && auth.password_hash.is_none() {
        anyhow::bail!("Auth username is set but no password_hash is configured");
    }
    if matches!(auth.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
        anyhow::bail!("Auth api_key cannot be empty");
    }

    // Validate storage config
    let prefix = &config.storage.photo_url_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        anyhow::bail!(
            "photo_url_prefix must start with '/' and not end with '/': {:?}",
            prefix
        );
    }

    Ok(())
}
