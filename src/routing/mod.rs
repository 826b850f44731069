//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, method, path, properties)
//!     → router.rs (route lookup)
//!     → domain.rs (resolve virtual host by host)
//!     → matcher.rs (evaluate predicate tree)
//!     → Return: Arc<RouteEntry> or None
//!
//! Route Compilation (at config load):
//!     RouteConfiguration
//!     → registry.rs (resolve data inputs and filter configs by name)
//!     → Validate domains, build domain index
//!     → Compile matcher trees, build each RouteEntry once
//!     → Freeze as immutable RouteMatcher
//!     → provider.rs (atomic swap into the serving slot)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at load time, immutable at runtime
//! - Any configuration error rejects the whole configuration
//! - Deterministic: same input always matches same route
//! - First match wins within a matcher list

pub mod domain;
pub mod entry;
pub mod error;
pub mod input;
pub mod matcher;
pub mod provider;
pub mod registry;
pub mod router;

pub use domain::{DomainPattern, VirtualHost};
pub use entry::{FilterConfigFactory, RouteEntry, RouteMatchAction, RouteSpecificFilterConfig};
pub use error::{BoxError, RegistryError, RouteConfigError};
pub use input::{DataInput, DataInputFactory};
pub use provider::RouteConfigProvider;
pub use registry::Extensions;
pub use router::RouteMatcher;
