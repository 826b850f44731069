//! Routing metrics.
//!
//! # Metrics
//! - `proxy_router_lookups_total` (counter): route lookups by result
//! - `proxy_router_config_updates_total` (counter): configuration updates by result
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op until a recorder is installed
//! - Static label values only, so the lookup path never allocates

/// Outcome of a single route lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    Matched,
    NoVirtualHost,
    NoRoute,
}

impl LookupResult {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupResult::Matched => "matched",
            LookupResult::NoVirtualHost => "no_virtual_host",
            LookupResult::NoRoute => "no_route",
        }
    }
}

pub fn record_route_lookup(result: LookupResult) {
    ::metrics::counter!("proxy_router_lookups_total", "result" => result.as_str()).increment(1);
}

pub fn record_config_update(applied: bool) {
    let result = if applied { "applied" } else { "rejected" };
    ::metrics::counter!("proxy_router_config_updates_total", "result" => result).increment(1);
}
