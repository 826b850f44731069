//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → RouteConfiguration (declarative document)
//!     → routing::RouteMatcher::new (semantic checks + compilation)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new document
//!     → routing::RouteConfigProvider::update builds and validates
//!     → atomic swap of Arc<RouteMatcher>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Serde handles syntactic checks; the router performs semantic ones

pub mod loader;
pub mod schema;
pub mod watcher;

pub use loader::{load_config, load_route_matcher, ConfigError};
pub use schema::RouteConfiguration;
pub use schema::VirtualHostConfig;
pub use schema::MatcherConfig;
pub use schema::RouteActionConfig;
