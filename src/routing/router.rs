//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Build the virtual host index and matcher trees from a route configuration
//! - Look up the route entry for a request
//! - Return the matched entry or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Construction either fully succeeds or produces no router at all
//! - Explicit `None` rather than a silent default

use std::sync::Arc;

use crate::config::schema::RouteConfiguration;
use crate::observability::metrics;
use crate::request::StreamRequest;
use crate::routing::domain::{VirtualHost, VirtualHostIndex};
use crate::routing::entry::RouteEntry;
use crate::routing::error::RouteConfigError;
use crate::routing::matcher::BuildContext;
use crate::routing::registry::Extensions;

/// Compiled route configuration.
#[derive(Debug)]
pub struct RouteMatcher {
    name: String,
    virtual_hosts: VirtualHostIndex,
}

impl RouteMatcher {
    /// Validate `config` and compile it. Any error rejects the whole configuration.
    pub fn new(
        config: &RouteConfiguration,
        extensions: &Extensions,
    ) -> Result<Self, RouteConfigError> {
        let ctx = BuildContext {
            extensions,
            route_config_name: &config.name,
        };
        let virtual_hosts =
            VirtualHostIndex::build(&config.virtual_hosts, config.routes.as_ref(), ctx)?;

        tracing::info!(
            route = %config.name,
            virtual_hosts = config.virtual_hosts.len(),
            default_routes = config.routes.is_some(),
            "Route configuration built"
        );

        Ok(Self {
            name: config.name.clone(),
            virtual_hosts,
        })
    }

    /// Name of the route configuration this matcher was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn find_virtual_host(&self, host: &str) -> Option<&VirtualHost> {
        self.virtual_hosts.find(host).map(|vh| vh.as_ref())
    }

    /// Find the route entry for `request`.
    pub fn route_entry(&self, request: &dyn StreamRequest) -> Option<Arc<RouteEntry>> {
        let Some(virtual_host) = self.find_virtual_host(request.host()) else {
            tracing::trace!(route = %self.name, host = %request.host(), "No virtual host matched");
            metrics::record_route_lookup(metrics::LookupResult::NoVirtualHost);
            return None;
        };

        match virtual_host.route(request) {
            Some(action) => {
                metrics::record_route_lookup(metrics::LookupResult::Matched);
                Some(action.route().clone())
            }
            None => {
                tracing::trace!(
                    route = %self.name,
                    virtual_host = %virtual_host.name(),
                    "No route matched"
                );
                metrics::record_route_lookup(metrics::LookupResult::NoRoute);
                None
            }
        }
    }
}
