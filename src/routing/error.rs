//! Route configuration errors.
//!
//! Every variant names the route configuration being built so the operator
//! can tell which pending version was rejected.

use thiserror::Error;

/// Boxed error returned by extension factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Reasons a route configuration is rejected at build time.
#[derive(Debug, Error)]
pub enum RouteConfigError {
    #[error("Only unique values for host are permitted. Duplicate entry of domain {domain} in route {route}")]
    DuplicateHost { domain: String, route: String },

    #[error("Only a single wildcard domain is permitted in route {route}")]
    MultipleWildcard { route: String },

    #[error("'routes' cannot be specified at the same time as a catch-all ('*') virtual host in route {route}")]
    RoutesWithCatchAll { route: String },

    #[error("Invalid empty host name in route {route}")]
    EmptyHost { route: String },

    #[error("Unsupported wildcard domain {domain} in route {route}: only a single leading or trailing '*' is permitted")]
    UnsupportedHostPattern { domain: String, route: String },

    #[error("Didn't find a registered implementation for '{input}' data input in route {route}")]
    UnknownDataInput { input: String, route: String },

    #[error("Invalid configuration for '{input}' data input in route {route}: {source}")]
    InvalidDataInput {
        input: String,
        route: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid value matcher in route {route}: {reason}")]
    InvalidValueMatcher { reason: String, route: String },

    #[error("Didn't find a registered implementation for '{action}' action in route {route}")]
    UnknownAction { action: String, route: String },

    #[error("Route action without cluster in route {route}")]
    EmptyCluster { route: String },
}

/// Errors raised while populating an extension registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Double registration for name '{0}'")]
    Duplicate(String),
}
