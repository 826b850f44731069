//! Configuration schema definitions.
//!
//! This module defines the declarative route configuration document.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of a route configuration document.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfiguration {
    /// Configuration name, used in error messages and logs.
    pub name: String,

    /// Virtual hosts, in declaration order.
    pub virtual_hosts: Vec<VirtualHostConfig>,

    /// Default matcher used when no virtual host matches the request host.
    /// Cannot be combined with a catch-all (`*`) virtual host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<MatcherConfig>,
}

/// A named group of domain patterns sharing one matcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VirtualHostConfig {
    pub name: String,

    /// Domain patterns: `exact`, `*suffix`, `prefix*` or `*`.
    pub hosts: Vec<String>,

    /// Matcher evaluated for requests resolved to this virtual host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<MatcherConfig>,
}

/// Ordered matcher list with an optional fallback.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatcherConfig {
    pub matcher_list: MatcherListConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_no_match: Option<Box<OnMatchConfig>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MatcherListConfig {
    pub matchers: Vec<FieldMatcherConfig>,
}

/// A predicate paired with what to do when it holds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldMatcherConfig {
    pub predicate: PredicateConfig,
    pub on_match: OnMatchConfig,
}

/// Boolean expression over request attributes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateConfig {
    SinglePredicate(SinglePredicateConfig),
    AndMatcher(PredicateListConfig),
    OrMatcher(PredicateListConfig),
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PredicateListConfig {
    pub predicate: Vec<PredicateConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SinglePredicateConfig {
    pub input: TypedExtensionConfig,
    pub value_match: ValueMatchConfig,
}

/// Reference to a registered extension plus its typed sub-configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypedExtensionConfig {
    pub name: String,

    #[serde(default)]
    pub typed_config: Value,
}

/// String matcher applied to an extracted value.
///
/// Exactly one of `exact`, `prefix`, `suffix` or `contains` must be set; the
/// routing build rejects anything else.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValueMatchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    #[serde(default)]
    pub ignore_case: bool,
}

/// Outcome of a successful predicate: a route action or a nested matcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnMatchConfig {
    Action(ActionConfig),
    Matcher(Box<MatcherConfig>),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionConfig {
    /// Action extension name. Defaults to the route action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub typed_config: RouteActionConfig,
}

/// Declarative route action.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteActionConfig {
    /// Route identifier for logging.
    #[serde(default)]
    pub name: String,

    /// Target cluster.
    pub cluster: String,

    #[serde(default)]
    pub metadata: Metadata,

    /// Per-extension route configuration, keyed by extension name.
    #[serde(default)]
    pub per_filter_config: BTreeMap<String, Value>,
}

/// Scoped key/value metadata, opaque to the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Metadata {
    pub filter_metadata: BTreeMap<String, serde_json::Map<String, Value>>,
}

impl Metadata {
    /// Look up `key` within the `scope` namespace.
    pub fn value(&self, scope: &str, key: &str) -> Option<&Value> {
        self.filter_metadata.get(scope).and_then(|fields| fields.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_predicate_tree() {
        let doc = json!({
            "name": "routes",
            "virtual_hosts": [{
                "name": "service",
                "hosts": ["service_0"],
                "routes": {
                    "matcher_list": {
                        "matchers": [{
                            "predicate": {
                                "or_matcher": {
                                    "predicate": [
                                        { "single_predicate": {
                                            "input": { "name": "matching.input.method" },
                                            "value_match": { "exact": "method_0" }
                                        }},
                                        { "single_predicate": {
                                            "input": { "name": "matching.input.path" },
                                            "value_match": { "prefix": "/api", "ignore_case": true }
                                        }}
                                    ]
                                }
                            },
                            "on_match": { "action": { "typed_config": { "cluster": "cluster_0" } } }
                        }]
                    }
                }
            }]
        });

        let config: RouteConfiguration = serde_json::from_value(doc).unwrap();
        let vhost = &config.virtual_hosts[0];
        let matcher = vhost.routes.as_ref().unwrap();
        let field = &matcher.matcher_list.matchers[0];

        match &field.predicate {
            PredicateConfig::OrMatcher(list) => {
                assert_eq!(list.predicate.len(), 2);
                match &list.predicate[1] {
                    PredicateConfig::SinglePredicate(single) => {
                        assert_eq!(single.value_match.prefix.as_deref(), Some("/api"));
                        assert!(single.value_match.ignore_case);
                        assert!(single.input.typed_config.is_null());
                    }
                    other => panic!("unexpected predicate {:?}", other),
                }
            }
            other => panic!("unexpected predicate {:?}", other),
        }

        match &field.on_match {
            OnMatchConfig::Action(action) => {
                assert_eq!(action.name, None);
                assert_eq!(action.typed_config.cluster, "cluster_0");
                assert!(action.typed_config.per_filter_config.is_empty());
            }
            other => panic!("unexpected on_match {:?}", other),
        }
    }

    #[test]
    fn test_value_match_rejects_unknown_keys() {
        let err =
            serde_json::from_value::<ValueMatchConfig>(json!({ "exakt": "GET" })).unwrap_err();
        assert!(err.to_string().contains("exakt"));
    }

    #[test]
    fn test_metadata_lookup() {
        let metadata: Metadata = serde_json::from_value(json!({
            "filter_metadata": { "mock_filter": { "key_0": "value_0" } }
        }))
        .unwrap();

        assert_eq!(metadata.value("mock_filter", "key_0"), Some(&json!("value_0")));
        assert_eq!(metadata.value("mock_filter", "key_1"), None);
        assert_eq!(metadata.value("other", "key_0"), None);
    }

    #[test]
    fn test_route_action_requires_cluster() {
        let result: Result<RouteActionConfig, _> =
            serde_json::from_value(json!({ "name": "no_cluster" }));
        assert!(result.is_err());
    }
}
