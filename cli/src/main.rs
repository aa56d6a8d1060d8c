//! Salon booking service - CLI server
//!
//! Headless REST backend suitable for a systemd unit, a container or a
//! plain process.
//!
//! ```sh
//! # Default config (~/.config/salon-booking/config.toml)
//! salon-service
//!
//! # Custom config path and port
//! salon-service --config /etc/salon/config.toml --api-port 8080
//!
//! # Validate config without starting
//! salon-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use salon_booking::config::{resolve_config_path, AppConfig};
use salon_booking::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "salon-service",
    version,
    about = "Appointment booking and catalog backend for a beauty salon",
    long_about = "Salon booking service: public booking, service catalog, price list \
                  and a JWT-protected admin API.\n\n\
                  Default config: ~/.config/salon-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SALON_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Start with an empty service catalog.
    #[arg(long)]
    no_seed: bool,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(resolve_config_path);
    let mut config = AppConfig::load(&config_path)?;
    config.apply_env_overrides();

    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.no_seed {
        config.catalog.seed_defaults = false;
    }
    config.validate()?;

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}:{}", config.server.api_host, config.server.api_port);
        println!("   Uploads dir : {}", config.uploads.dir.display());
        println!("   SMTP        : {}", config.smtp.as_ref().map_or("disabled (log only)", |s| s.host.as_str()));
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = ServerHandle::start(ServerOptions { config }).await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");

    handle.wait().await;
    Ok(())
}
