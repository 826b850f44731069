//! Shared fixtures for integration tests.

use proxy_router::RouteConfiguration;
use serde_json::{json, Value};

pub const HOST_INPUT: &str = "matching.input.host";
pub const METHOD_INPUT: &str = "matching.input.method";
pub const PROPERTY_INPUT: &str = "matching.input.property";

pub fn single(input: &str, typed_config: Value, exact: &str) -> Value {
    json!({ "single_predicate": {
        "input": { "name": input, "typed_config": typed_config },
        "value_match": { "exact": exact }
    }})
}

pub fn property(key: &str, value: &str) -> Value {
    single(PROPERTY_INPUT, json!({ "property_name": key }), value)
}

pub fn route_action(cluster: &str, metadata_key: &str) -> Value {
    json!({ "action": { "typed_config": {
        "cluster": cluster,
        "metadata": { "filter_metadata": { "mock_filter": { metadata_key: metadata_key } } }
    }}})
}

/// Host + method + (key_0=value_0 OR key_1=value_1).
fn service_routes(host: &str, cluster: &str, metadata_key: &str) -> Value {
    json!({
        "matcher_list": { "matchers": [{
            "predicate": { "and_matcher": { "predicate": [
                single(HOST_INPUT, Value::Null, host),
                single(METHOD_INPUT, Value::Null, "method_0"),
                { "or_matcher": { "predicate": [
                    property("key_0", "value_0"),
                    property("key_1", "value_1")
                ]}}
            ]}},
            "on_match": route_action(cluster, metadata_key)
        }]}
    })
}

/// Exact, `prefix*`, `*suffix` and catch-all virtual hosts.
pub fn route_configuration() -> Value {
    json!({
        "name": "test_matcher_tree",
        "virtual_hosts": [
            {
                "name": "service",
                "hosts": ["service_0"],
                "routes": service_routes("service_0", "cluster_0", "match_service")
            },
            {
                "name": "prefix",
                "hosts": ["prefix*"],
                "routes": service_routes("prefix_service_0", "cluster_1", "match_prefix")
            },
            {
                "name": "suffix",
                "hosts": ["*suffix"],
                "routes": service_routes("service_0_suffix", "cluster_2", "match_suffix")
            },
            {
                "name": "catch_all",
                "hosts": ["*"],
                "routes": {
                    "matcher_list": { "matchers": [{
                        "predicate": property("catch_all", "catch_all"),
                        "on_match": route_action("cluster_3", "catch_all")
                    }]}
                }
            }
        ]
    })
}

/// Single virtual host with one host-matching route, for validation tests.
pub fn single_host_configuration(hosts: &[&str]) -> Value {
    json!({
        "name": "test_matcher_tree",
        "virtual_hosts": [{
            "hosts": hosts,
            "routes": {
                "matcher_list": { "matchers": [{
                    "predicate": single(HOST_INPUT, Value::Null, "service_0"),
                    "on_match": route_action("cluster_0", "key_0")
                }]}
            }
        }]
    })
}

pub fn parse(doc: Value) -> RouteConfiguration {
    serde_json::from_value(doc).unwrap()
}
