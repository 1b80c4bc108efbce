//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use mall_core::MallError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration loader over layered sources.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `MALL__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, MallError> {
        let config = Self::load_config(&config_dir.into())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, MallError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, MallError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("MALL_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MALL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_mall_error)?;
        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_mall_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Gets a specific configuration value by dotted key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

/// Validates a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), MallError> {
    if config.database.url.is_empty() {
        return Err(MallError::Configuration("Database URL is required".to_string()));
    }

    if config.cache.size_limit == 0 {
        return Err(MallError::Configuration(
            "cache.size_limit must be greater than 0".to_string(),
        ));
    }

    let pct = config.cache.compaction_percentage;
    if !(pct > 0.0 && pct <= 1.0) {
        return Err(MallError::Configuration(format!(
            "cache.compaction_percentage must be in (0, 1], got {}",
            pct
        )));
    }

    if !config.cache.enabled {
        warn!("Catalog cache is disabled; every read goes to the database");
    }

    Ok(())
}

fn config_error_to_mall_error(err: ConfigError) -> MallError {
    MallError::Configuration(err.to_string())
}
