//! Active route configuration slot.
//!
//! # Responsibilities
//! - Hold the route matcher currently serving traffic
//! - Build and publish replacements atomically
//!
//! # Design Decisions
//! - Readers take an `Arc` snapshot and keep it for the whole request
//! - A rejected update leaves the serving matcher untouched
//! - Matchers are replaced wholesale, never patched

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::RouteConfiguration;
use crate::observability::metrics;
use crate::request::StreamRequest;
use crate::routing::entry::RouteEntry;
use crate::routing::error::RouteConfigError;
use crate::routing::registry::Extensions;
use crate::routing::router::RouteMatcher;

/// Reloadable holder of the active [`RouteMatcher`].
pub struct RouteConfigProvider {
    current: ArcSwap<RouteMatcher>,
    extensions: Arc<Extensions>,
    version: AtomicU64,
}

impl RouteConfigProvider {
    /// Build the initial matcher. Fails if the first configuration is invalid.
    pub fn new(
        config: &RouteConfiguration,
        extensions: Arc<Extensions>,
    ) -> Result<Self, RouteConfigError> {
        let matcher = RouteMatcher::new(config, &extensions)?;
        Ok(Self {
            current: ArcSwap::from_pointee(matcher),
            extensions,
            version: AtomicU64::new(1),
        })
    }

    /// Snapshot of the serving matcher.
    pub fn snapshot(&self) -> Arc<RouteMatcher> {
        self.current.load_full()
    }

    /// Number of configurations published so far, including the initial one.
    ///
    /// The counter is bumped before the new matcher is stored, so it may run one
    /// ahead of [`snapshot`](Self::snapshot) during a swap. Never behind.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Build `config` and publish it. On error the current matcher stays in force.
    pub fn update(&self, config: &RouteConfiguration) -> Result<u64, RouteConfigError> {
        match RouteMatcher::new(config, &self.extensions) {
            Ok(matcher) => {
                let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
                self.current.store(Arc::new(matcher));
                metrics::record_config_update(true);
                tracing::info!(route = %config.name, version, "Route configuration updated");
                Ok(version)
            }
            Err(e) => {
                metrics::record_config_update(false);
                tracing::error!(
                    route = %config.name,
                    error = %e,
                    "Route configuration rejected. Keeping current configuration."
                );
                Err(e)
            }
        }
    }

    /// Route `request` against the serving matcher.
    pub fn route_entry(&self, request: &dyn StreamRequest) -> Option<Arc<RouteEntry>> {
        self.current.load().route_entry(request)
    }
}

impl std::fmt::Debug for RouteConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteConfigProvider")
            .field("route", &self.current.load().name())
            .field("version", &self.version())
            .finish()
    }
}
