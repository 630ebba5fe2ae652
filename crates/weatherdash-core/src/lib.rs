pub mod config;
pub mod dashboard_state;
pub mod error;
pub mod theme;

pub use config::{
    Config, DashboardConfig, DefaultLocationConfig, DeviceLocationConfig, LoggingConfig,
    ValidationResult, WeatherConfig,
};
pub use dashboard_state::DashboardState;
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, WeatherError};
pub use theme::{Theme, ThemeStore};

use anyhow::Result;

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins over `default_level`. Output goes to stderr so it never
/// interleaves with the dashboard panels on stdout.
pub fn init_logging(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("weatherdash logging initialized at {}", default_level);
    Ok(())
}
