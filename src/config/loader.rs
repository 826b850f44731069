//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouteConfiguration;
use crate::routing::{Extensions, RouteConfigError, RouteMatcher};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid route configuration: {0}")]
    Route(#[from] RouteConfigError),
}

/// Parse a route configuration document. `.json` files are read as JSON, anything else as TOML.
pub fn load_config(path: &Path) -> Result<RouteConfiguration, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let config = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    Ok(config)
}

/// Parse and compile a route configuration file.
pub fn load_route_matcher(
    path: &Path,
    extensions: &Extensions,
) -> Result<RouteMatcher, ConfigError> {
    let config = load_config(path)?;
    Ok(RouteMatcher::new(&config, extensions)?)
}
