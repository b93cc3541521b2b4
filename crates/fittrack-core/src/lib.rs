pub mod config;
pub mod error;

pub use config::{
    ApiConfig, Config, DistanceUnit, FriendsConfig, TimeUnit, UnitSettings, ValidationResult,
    API_URL_ENV, DEFAULT_API_URL,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging for the application.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("FitTrack core initialized");
    Ok(())
}
