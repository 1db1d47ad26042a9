mod cli;

use sweetshop::{
    catalog::CatalogService,
    config::{self, Config},
    photos::PhotoRepository,
    server::{self, auth},
};
use sweetshop_db::{pool::init_pool, store::ProductStore};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

/// Open the database and photo directory named in the config.
fn open_catalog(config: &Config) -> Result<CatalogService> {
    let storage = &config.storage;

    tracing::info!("Initializing database at {}", storage.database_path.display());
    let pool = init_pool(&storage.database_path).with_context(|| {
        format!(
            "Failed to open database {}",
            storage.database_path.display()
        )
    })?;

    let photos = PhotoRepository::open(&storage.photo_dir, storage.photo_url_prefix.as_str())
        .with_context(|| {
            format!(
                "Failed to open photo directory {}",
                storage.photo_dir.display()
            )
        })?;

    Ok(CatalogService::new(ProductStore::new(pool), photos))
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Sweetshop server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let catalog = open_catalog(&config)?;
    server::start_server(config, catalog).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "sweetshop=trace,sweetshop_db=debug,sweetshop_common=debug,tower_http=debug".to_string()
        } else {
            "sweetshop=debug,sweetshop_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Catalog { json } => print_catalog(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("sweetshop {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::HashPassword { password } => hash_password(&password),
        Commands::GenerateApiKey => generate_api_key(),
        Commands::GenerateSecret => generate_secret(),
    }
}

fn print_catalog(config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let catalog = open_catalog(&config)?;
    let entries = catalog.list_with_photos()?;

    if json {
        let json_str = serde_json::to_string_pretty(&entries)?;
        println!("{}", json_str);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Catalog is empty");
        return Ok(());
    }

    for entry in &entries {
        let product = &entry.product;
        print!(
            "[{}] {} - {:.2} ({})",
            product.id, product.name, product.price, product.category
        );
        if !product.is_available {
            print!(" [unavailable]");
        }
        println!();
        if let Some(ref description) = product.description {
            println!("      {}", description);
        }
        match entry.photo_url {
            Some(ref url) => println!("      Photo: {}", url),
            None => println!("      Photo: none"),
        }
    }

    println!("\n{} products", entries.len());
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Auth enabled: {}", config.server.auth.enabled);
            println!(
                "  Admin login: {}",
                if config.server.auth.password_hash.is_some() {
                    "configured"
                } else {
                    "not configured"
                }
            );
            println!("  Database: {}", config.storage.database_path.display());
            println!(
                "  Photos: {} (served at {})",
                config.storage.photo_dir.display(),
                config.storage.photo_url_prefix
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {}", config.storage.database_path.display());
        }
    }

    Ok(())
}

fn hash_password(password: &str) -> Result<()> {
    let hash = auth::hash_password(password)?;
    println!("{}", hash);
    Ok(())
}

fn generate_api_key() -> Result<()> {
    let key = auth::generate_api_key();
    println!("{}", key);
    Ok(())
}

fn generate_secret() -> Result<()> {
    let secret = auth::generate_secret();
    println!("{}", secret);
    Ok(())
}
