use std::path::Path;

use tracing::{info, warn};

use anonboard::web::WebServer;
use anonboard::{BoardService, Config, Database};

/// Default configuration file, used when no path is given.
const DEFAULT_CONFIG_PATH: &str = "anonboard.toml";

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config_missing = !Path::new(&config_path).exists();
    let mut config = if config_missing {
        Config::default()
    } else {
        match Config::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {config_path}: {e}");
                std::process::exit(1);
            }
        }
    };
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = anonboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        anonboard::logging::init_console_only(&config.logging.level);
    }

    if config_missing {
        warn!("{} not found, using default configuration", config_path);
    }

    if let Err(e) = run(config).await {
        tracing::error!("{}", e);
        eprintln!("anonboard: {e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anonboard::Result<()> {
    config.validate()?;

    info!("anonboard - anonymous message board");

    let db = Database::open(&config.database.url, config.database.max_connections).await?;
    let service = BoardService::from_config(db.clone(), &config)?;

    let server = WebServer::new(&config.server, &config.web, service)?;
    info!("Server configured on {}", server.addr());
    server.run().await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}
