//! Pascabill CLI server
//!
//! Headless postpaid electricity billing server suitable for deployment
//! as a systemd service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/pascabill/config.toml)
//! pascabill
//!
//! # Custom config path
//! pascabill --config /etc/pascabill/config.toml
//!
//! # Override port
//! pascabill --api-port 8080
//!
//! # Validate config without starting
//! pascabill --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use pascabill::config::AppConfig;
use pascabill::server::{init_tracing, ServerHandle, ServerOptions};

/// Pascabill, a postpaid electricity billing server.
#[derive(Parser, Debug)]
#[command(
    name = "pascabill",
    version,
    about = "Postpaid electricity billing server",
    long_about = "Pascabill, a REST API server for postpaid electricity billing: \
                  tariff catalog, customer directory, monthly bills and reports.\n\n\
                  Default config: ~/.config/pascabill/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PASCABILL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip seeding demo data into an empty store.
    #[arg(long)]
    no_seed: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ──────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(pascabill::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            // Fallback tracing init
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ─────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
        config.logging.level = level.clone();
    }

    // ── Config validation mode ──────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!(
            "   API address : {}:{}",
            config.server.api_host, config.server.api_port
        );
        println!(
            "   Storage     : {} ({})",
            config.storage.backend,
            config.storage.path.display()
        );
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ────────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        seed_demo_data: !cli.no_seed,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
