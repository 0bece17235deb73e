//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `REACTIVE_HUB` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use reactive_hub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Delivering on {}", config.bridge.delivery_thread_name);
//! ```

mod bridge;
mod error;
mod logging;

pub use bridge::BridgeConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Event bridge behavior (arity policy, delivery thread)
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REACTIVE_HUB` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `REACTIVE_HUB__BRIDGE__ARITY_POLICY=lenient` -> `bridge.arity_policy`
    /// - `REACTIVE_HUB__LOGGING__FORMAT=json` -> `logging.format`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REACTIVE_HUB")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty delivery thread name or log level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bridge.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ArityPolicy;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("REACTIVE_HUB__BRIDGE__ARITY_POLICY");
        env::remove_var("REACTIVE_HUB__BRIDGE__DELIVERY_THREAD_NAME");
        env::remove_var("REACTIVE_HUB__LOGGING__LEVEL");
        env::remove_var("REACTIVE_HUB__LOGGING__FORMAT");
    }

    #[test]
    fn test_load_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.bridge.arity_policy, ArityPolicy::Strict);
        assert_eq!(config.bridge.delivery_thread_name, "hub-delivery");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REACTIVE_HUB__BRIDGE__ARITY_POLICY", "lenient");
        env::set_var("REACTIVE_HUB__BRIDGE__DELIVERY_THREAD_NAME", "ui");
        env::set_var("REACTIVE_HUB__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.bridge.arity_policy, ArityPolicy::Lenient);
        assert_eq!(config.bridge.delivery_thread_name, "ui");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_arity_policy_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REACTIVE_HUB__BRIDGE__ARITY_POLICY", "sloppy");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_validate_rejects_empty_level() {
        let mut config = AppConfig::default();
        config.logging.level = " ".to_string();

        assert_eq!(config.validate(), Err(ValidationError::EmptyLogLevel));
    }
}
