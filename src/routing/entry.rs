//! Route entries and the route action wrapper.
//!
//! # Responsibilities
//! - Build an immutable [`RouteEntry`] from a declarative route action
//! - Resolve per-filter route configuration through registered factories
//! - Wrap each entry in a [`RouteMatchAction`] exactly once
//!
//! # Design Decisions
//! - Missing per-filter configuration is normal, not an error
//! - Filter configs are opaque here; only the owning filter downcasts them

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::config::schema::{Metadata, RouteActionConfig};
use crate::routing::error::RouteConfigError;
use crate::routing::registry::Extensions;

/// Name of the only action understood by the route matcher.
pub const ROUTE_ACTION: &str = "matching.action.route";

/// Route-level configuration object owned by one filter extension.
pub trait RouteSpecificFilterConfig: Any + Send + Sync + Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync + Debug> RouteSpecificFilterConfig for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Filter extension able to build route-level configuration.
pub trait FilterConfigFactory: Send + Sync {
    fn name(&self) -> &str;

    /// Empty configuration the payload is merged into.
    /// `None` means the filter has no route-level configuration.
    fn empty_route_config(&self) -> Option<Value> {
        None
    }

    /// Build the route config from the prototype with the payload applied.
    fn create_route_config(&self, _config: Value) -> Option<Arc<dyn RouteSpecificFilterConfig>> {
        None
    }
}

/// Resolved routing outcome for a matched request.
#[derive(Debug)]
pub struct RouteEntry {
    name: String,
    cluster_name: String,
    metadata: Metadata,
    per_filter_configs: HashMap<String, Arc<dyn RouteSpecificFilterConfig>>,
}

impl RouteEntry {
    pub fn new(
        config: &RouteActionConfig,
        extensions: &Extensions,
        route_config_name: &str,
    ) -> Result<Self, RouteConfigError> {
        if config.cluster.is_empty() {
            return Err(RouteConfigError::EmptyCluster {
                route: route_config_name.to_string(),
            });
        }

        let mut per_filter_configs = HashMap::new();
        for (filter_name, payload) in &config.per_filter_config {
            if let Some(filter_config) = build_filter_config(filter_name, payload, extensions) {
                per_filter_configs.insert(filter_name.clone(), filter_config);
            }
        }

        Ok(Self {
            name: config.name.clone(),
            cluster_name: config.cluster.clone(),
            metadata: config.metadata.clone(),
            per_filter_configs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn per_filter_config(
        &self,
        filter_name: &str,
    ) -> Option<&Arc<dyn RouteSpecificFilterConfig>> {
        self.per_filter_configs.get(filter_name)
    }

    /// Typed access for the filter that owns the configuration.
    pub fn per_filter_config_typed<T: Any>(&self, filter_name: &str) -> Option<&T> {
        self.per_filter_config(filter_name)
            .and_then(|config| (**config).as_any().downcast_ref::<T>())
    }
}

fn build_filter_config(
    filter_name: &str,
    payload: &Value,
    extensions: &Extensions,
) -> Option<Arc<dyn RouteSpecificFilterConfig>> {
    let Some(factory) = extensions.filter_config(filter_name) else {
        tracing::debug!(
            filter = %filter_name,
            "No registered filter for per-filter config, ignoring"
        );
        return None;
    };

    let Some(mut prototype) = factory.empty_route_config() else {
        tracing::debug!(filter = %filter_name, "Filter has no route-level config, ignoring");
        return None;
    };
    merge_payload(&mut prototype, payload);

    let config = factory.create_route_config(prototype);
    if config.is_none() {
        tracing::debug!(filter = %filter_name, "Filter declined to build route-level config");
    }
    config
}

/// Overlay `payload` onto `prototype`: objects merge key by key, anything else replaces.
fn merge_payload(prototype: &mut Value, payload: &Value) {
    match (prototype, payload) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge_payload(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// Action produced by the matcher tree; the same instance is returned for every match.
#[derive(Debug)]
pub struct RouteMatchAction {
    route: Arc<RouteEntry>,
}

impl RouteMatchAction {
    pub fn new(route: Arc<RouteEntry>) -> Self {
        Self { route }
    }

    pub fn route(&self) -> &Arc<RouteEntry> {
        &self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockRouteConfig {
        config: Value,
    }

    /// Filter factory whose behaviour is chosen per test.
    #[derive(Default)]
    struct MockFilter {
        has_prototype: bool,
        builds_config: bool,
        created: Mutex<Option<Arc<dyn RouteSpecificFilterConfig>>>,
    }

    impl FilterConfigFactory for MockFilter {
        fn name(&self) -> &str {
            "mock_filter"
        }

        fn empty_route_config(&self) -> Option<Value> {
            self.has_prototype.then(|| json!({ "enabled": true }))
        }

        fn create_route_config(&self, config: Value) -> Option<Arc<dyn RouteSpecificFilterConfig>> {
            if !self.builds_config {
                return None;
            }
            let created: Arc<dyn RouteSpecificFilterConfig> = Arc::new(MockRouteConfig { config });
            *self.created.lock().unwrap() = Some(created.clone());
            Some(created)
        }
    }

    fn action(doc: Value) -> RouteActionConfig {
        serde_json::from_value(doc).unwrap()
    }

    fn extensions_with(filter: Arc<MockFilter>) -> Extensions {
        let mut extensions = Extensions::new();
        extensions.register_filter_config(filter).unwrap();
        extensions
    }

    fn mock_filter_action() -> RouteActionConfig {
        action(json!({
            "cluster": "cluster_0",
            "per_filter_config": { "mock_filter": { "key_0": "value_0" } }
        }))
    }

    #[test]
    fn test_simple_cluster_name() {
        let entry = RouteEntry::new(
            &action(json!({ "cluster": "cluster_0" })),
            &Extensions::new(),
            "test",
        )
        .unwrap();
        assert_eq!(entry.cluster_name(), "cluster_0");
        assert_eq!(entry.name(), "");
    }

    #[test]
    fn test_route_metadata() {
        let entry = RouteEntry::new(
            &action(json!({
                "name": "route_0",
                "cluster": "cluster_0",
                "metadata": { "filter_metadata": { "mock_filter": { "key_0": "value_0" } } }
            })),
            &Extensions::new(),
            "test",
        )
        .unwrap();

        assert_eq!(entry.name(), "route_0");
        assert_eq!(
            entry.metadata().value("mock_filter", "key_0"),
            Some(&json!("value_0"))
        );
    }

    #[test]
    fn test_empty_cluster_rejected() {
        let err = RouteEntry::new(&action(json!({ "cluster": "" })), &Extensions::new(), "test")
            .unwrap_err();
        assert_eq!(err.to_string(), "Route action without cluster in route test");
    }

    #[test]
    fn test_route_per_filter_config() {
        let filter = Arc::new(MockFilter {
            has_prototype: true,
            builds_config: true,
            ..Default::default()
        });
        let entry =
            RouteEntry::new(&mock_filter_action(), &extensions_with(filter.clone()), "test")
                .unwrap();

        let created = filter.created.lock().unwrap().clone().unwrap();
        let stored = entry.per_filter_config("mock_filter").unwrap();
        assert!(Arc::ptr_eq(stored, &created));

        let typed = entry.per_filter_config_typed::<MockRouteConfig>("mock_filter").unwrap();
        assert_eq!(typed.config, json!({ "enabled": true, "key_0": "value_0" }));
    }

    #[test]
    fn test_null_route_empty_proto() {
        let filter = Arc::new(MockFilter {
            has_prototype: false,
            builds_config: true,
            ..Default::default()
        });
        let entry =
            RouteEntry::new(&mock_filter_action(), &extensions_with(filter.clone()), "test")
                .unwrap();

        assert!(entry.per_filter_config("mock_filter").is_none());
        assert!(filter.created.lock().unwrap().is_none());
    }

    #[test]
    fn test_null_route_specific_config() {
        let filter = Arc::new(MockFilter {
            has_prototype: true,
            builds_config: false,
            ..Default::default()
        });
        let entry =
            RouteEntry::new(&mock_filter_action(), &extensions_with(filter), "test").unwrap();

        assert!(entry.per_filter_config("mock_filter").is_none());
    }

    #[test]
    fn test_unregistered_filter_ignored() {
        let entry = RouteEntry::new(&mock_filter_action(), &Extensions::new(), "test").unwrap();
        assert!(entry.per_filter_config("mock_filter").is_none());
        assert!(entry.per_filter_config_typed::<MockRouteConfig>("mock_filter").is_none());
    }

    #[test]
    fn test_route_match_action() {
        let entry = Arc::new(
            RouteEntry::new(&action(json!({ "cluster": "cluster_0" })), &Extensions::new(), "test")
                .unwrap(),
        );
        let action = RouteMatchAction::new(entry.clone());
        assert!(Arc::ptr_eq(action.route(), &entry));
    }

    #[test]
    fn test_merge_payload() {
        let mut base = json!({ "a": 1, "nested": { "x": 1, "y": 2 } });
        merge_payload(&mut base, &json!({ "b": 2, "nested": { "y": 3 } }));
        assert_eq!(base, json!({ "a": 1, "b": 2, "nested": { "x": 1, "y": 3 } }));

        let mut scalar = json!({});
        merge_payload(&mut scalar, &json!("value"));
        assert_eq!(scalar, json!("value"));
    }
}
