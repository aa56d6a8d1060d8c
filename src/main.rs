//! Salon booking service
//!
//! Reads configuration from TOML (`$SALON_CONFIG` or
//! ~/.config/salon-booking/config.toml), then environment overrides.

use tracing::{error, info};

use salon_booking::config::{resolve_config_path, AppConfig};
use salon_booking::{init_tracing, ServerHandle, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path();
    let mut config = AppConfig::load(&config_path)?;
    config.apply_env_overrides();
    config.validate()?;

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions { config }).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");
    handle.wait().await;
    Ok(())
}
