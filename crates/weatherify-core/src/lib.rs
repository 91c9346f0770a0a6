pub mod config;
pub mod error;
pub mod navigator;
pub mod notification;
pub mod op_state;

pub use config::{
    AppConfig, BackendConfig, Config, LocationConfig, NotificationConfig, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
pub use navigator::{NavigationError, Navigator, SystemBrowser};
pub use notification::{Notification, NotificationId, NotificationPresenter};
pub use op_state::OpState;

use anyhow::Result;

/// Initialize tracing/logging.
///
/// `default_level` is used when `RUST_LOG` is not set.
pub fn init(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Weatherify core initialized");
    Ok(())
}
