//! Virtual host dispatch by request host.
//!
//! # Responsibilities
//! - Classify domain patterns (exact, `*suffix`, `prefix*`, `*`)
//! - Validate domains across the whole route configuration
//! - Resolve one virtual host per request host
//!
//! # Design Decisions
//! - Lookup order: exact, leading wildcard, trailing wildcard, catch-all
//! - Wildcard tables are grouped by literal length, longest first, so the
//!   longest matching literal wins
//! - A wildcard must cover at least one character of the host
//! - Host comparison is case-sensitive

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::schema::{MatcherConfig, VirtualHostConfig};
use crate::request::StreamRequest;
use crate::routing::entry::RouteMatchAction;
use crate::routing::error::RouteConfigError;
use crate::routing::matcher::{BuildContext, MatchTree};

/// Classified domain pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPattern {
    Exact(String),
    /// `*suffix`: matches hosts ending with the literal.
    LeadingWildcard(String),
    /// `prefix*`: matches hosts starting with the literal.
    TrailingWildcard(String),
    CatchAll,
}

impl DomainPattern {
    pub(crate) fn parse(host: &str, route: &str) -> Result<Self, RouteConfigError> {
        if host.is_empty() {
            return Err(RouteConfigError::EmptyHost {
                route: route.to_string(),
            });
        }
        if host == "*" {
            return Ok(Self::CatchAll);
        }

        let (pattern, literal) = if let Some(suffix) = host.strip_prefix('*') {
            (Self::LeadingWildcard(suffix.to_string()), suffix)
        } else if let Some(prefix) = host.strip_suffix('*') {
            (Self::TrailingWildcard(prefix.to_string()), prefix)
        } else {
            (Self::Exact(host.to_string()), host)
        };

        if literal.contains('*') {
            return Err(RouteConfigError::UnsupportedHostPattern {
                domain: host.to_string(),
                route: route.to_string(),
            });
        }
        Ok(pattern)
    }
}

/// A named group of domains sharing one matcher.
#[derive(Debug)]
pub struct VirtualHost {
    name: String,
    domains: Vec<DomainPattern>,
    matcher: Option<MatchTree>,
}

impl VirtualHost {
    pub(crate) fn from_config(
        config: &VirtualHostConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        let domains = config
            .hosts
            .iter()
            .map(|host| DomainPattern::parse(host, ctx.route_config_name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: config.name.clone(),
            domains,
            matcher: build_matcher(config.routes.as_ref(), ctx)?,
        })
    }

    /// Virtual host standing in for the top-level `routes` matcher.
    pub(crate) fn default_routes(
        routes: &MatcherConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        Ok(Self {
            name: String::new(),
            domains: vec![DomainPattern::CatchAll],
            matcher: Some(MatchTree::from_config(routes, ctx)?),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domains(&self) -> &[DomainPattern] {
        &self.domains
    }

    /// Evaluate this host's matcher. A virtual host without routes never matches.
    pub fn route(&self, request: &dyn StreamRequest) -> Option<&Arc<RouteMatchAction>> {
        self.matcher.as_ref().and_then(|m| m.evaluate(request))
    }
}

fn build_matcher(
    routes: Option<&MatcherConfig>,
    ctx: BuildContext<'_>,
) -> Result<Option<MatchTree>, RouteConfigError> {
    routes.map(|r| MatchTree::from_config(r, ctx)).transpose()
}

type WildcardTable = BTreeMap<Reverse<usize>, HashMap<String, Arc<VirtualHost>>>;

/// Domain index over all virtual hosts of one route configuration.
#[derive(Debug, Default)]
pub struct VirtualHostIndex {
    exact: HashMap<String, Arc<VirtualHost>>,
    leading_wildcards: WildcardTable,
    trailing_wildcards: WildcardTable,
    default_host: Option<Arc<VirtualHost>>,
}

impl VirtualHostIndex {
    pub(crate) fn build(
        virtual_hosts: &[VirtualHostConfig],
        default_routes: Option<&MatcherConfig>,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        let route = ctx.route_config_name;
        let mut index = Self::default();

        for config in virtual_hosts {
            let virtual_host = Arc::new(VirtualHost::from_config(config, ctx)?);

            for (host, pattern) in config.hosts.iter().zip(virtual_host.domains()) {
                let (table, key) = match pattern {
                    DomainPattern::CatchAll => {
                        if index.default_host.is_some() {
                            return Err(RouteConfigError::MultipleWildcard {
                                route: route.to_string(),
                            });
                        }
                        index.default_host = Some(virtual_host.clone());
                        continue;
                    }
                    DomainPattern::Exact(literal) => (&mut index.exact, literal),
                    DomainPattern::LeadingWildcard(literal) => (
                        index
                            .leading_wildcards
                            .entry(Reverse(literal.len()))
                            .or_default(),
                        literal,
                    ),
                    DomainPattern::TrailingWildcard(literal) => (
                        index
                            .trailing_wildcards
                            .entry(Reverse(literal.len()))
                            .or_default(),
                        literal,
                    ),
                };

                if table.insert(key.clone(), virtual_host.clone()).is_some() {
                    return Err(RouteConfigError::DuplicateHost {
                        domain: host.clone(),
                        route: route.to_string(),
                    });
                }
            }
        }

        if let Some(routes) = default_routes {
            if index.default_host.is_some() {
                return Err(RouteConfigError::RoutesWithCatchAll {
                    route: route.to_string(),
                });
            }
            index.default_host = Some(Arc::new(VirtualHost::default_routes(routes, ctx)?));
        }

        tracing::debug!(
            route = %route,
            exact = index.exact.len(),
            leading_wildcards = index.leading_wildcards.values().map(HashMap::len).sum::<usize>(),
            trailing_wildcards = index.trailing_wildcards.values().map(HashMap::len).sum::<usize>(),
            has_default = index.default_host.is_some(),
            "Virtual host index built"
        );

        Ok(index)
    }

    /// Resolve the virtual host serving `host`.
    pub fn find(&self, host: &str) -> Option<&Arc<VirtualHost>> {
        // 1. Exact
        if let Some(virtual_host) = self.exact.get(host) {
            return Some(virtual_host);
        }

        // 2. `*suffix`, longest suffix first
        let by_suffix = find_wildcard(&self.leading_wildcards, host, |len| {
            host.get(host.len() - len..)
        });
        if by_suffix.is_some() {
            return by_suffix;
        }

        // 3. `prefix*`, longest prefix first
        let by_prefix = find_wildcard(&self.trailing_wildcards, host, |len| host.get(..len));
        if by_prefix.is_some() {
            return by_prefix;
        }

        // 4. Catch-all
        self.default_host.as_ref()
    }
}

fn find_wildcard<'a, 'h>(
    table: &'a WildcardTable,
    host: &'h str,
    literal_of: impl Fn(usize) -> Option<&'h str>,
) -> Option<&'a Arc<VirtualHost>> {
    table
        .iter()
        // The wildcard has to stand for at least one character.
        .filter(|(Reverse(len), _)| *len < host.len())
        .find_map(|(Reverse(len), hosts)| literal_of(*len).and_then(|literal| hosts.get(literal)))
}
