//! Service configuration schema and YAML loading.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::config::error::ConfigError;
use crate::guard::{DEFAULT_SAFETY_TIMEOUT, DEFAULT_TAG};

/// Configuration for a [`ScreenService`](crate::service::ScreenService).
///
/// Every field has a default, so an empty YAML document (or no file at
/// all) yields a working configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Tag the wake lock is acquired under.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Safety timeout in seconds: the upper bound on any single hold.
    #[serde(default = "default_safety_timeout_secs")]
    pub safety_timeout_secs: u64,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_safety_timeout_secs() -> u64 {
    DEFAULT_SAFETY_TIMEOUT.as_secs()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            safety_timeout_secs: default_safety_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Builder: set the wake-lock tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Builder: set the safety timeout.
    pub fn with_safety_timeout(mut self, timeout: Duration) -> Self {
        self.safety_timeout_secs = timeout.as_secs();
        self
    }

    /// The safety timeout as a [`Duration`].
    pub fn safety_timeout(&self) -> Duration {
        Duration::from_secs(self.safety_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tag.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "tag must not be empty".to_string(),
            ));
        }
        if self.safety_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "safety_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a configuration from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}

/// Load and validate a service configuration from a YAML file.
pub fn load_service_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ServiceConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::YamlFileError {
            path: path.to_path_buf(),
            source,
        })?;

    config.validate()?;
    Ok(config)
}
