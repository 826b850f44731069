//! Protocol-agnostic request routing library.
//!
//! Resolves one route entry (target cluster, metadata, per-filter config)
//! per request from a declarative route configuration.

pub mod config;
pub mod observability;
pub mod request;
pub mod routing;

pub use config::schema::RouteConfiguration;
pub use request::{Request, StreamRequest};
pub use routing::{Extensions, RouteConfigProvider, RouteEntry, RouteMatcher};
