//! Service configuration.
//!
//! This module provides YAML-based configuration for the wake-lock tag
//! and safety timeout.

mod error;
mod yaml;

pub use error::ConfigError;
pub use yaml::{ServiceConfig, load_service_config};
