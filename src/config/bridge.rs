//! Bridge configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::ArityPolicy;

/// Bridge behavior shared by every event subscription
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// How argument counts that differ from the declared arity are handled
    #[serde(default)]
    pub arity_policy: ArityPolicy,

    /// Name of the dedicated delivery thread
    #[serde(default = "default_delivery_thread_name")]
    pub delivery_thread_name: String,
}

impl BridgeConfig {
    /// Validate bridge configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.delivery_thread_name.trim().is_empty() {
            return Err(ValidationError::EmptyThreadName);
        }
        // std::thread::Builder panics on interior NUL
        if self.delivery_thread_name.contains('\0') {
            return Err(ValidationError::InvalidThreadName);
        }
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            arity_policy: ArityPolicy::default(),
            delivery_thread_name: default_delivery_thread_name(),
        }
    }
}

fn default_delivery_thread_name() -> String {
    "hub-delivery".to_string()
}
