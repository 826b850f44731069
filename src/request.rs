//! Request attributes consumed by the routing engine.
//!
//! # Responsibilities
//! - Define the protocol-agnostic view of a decoded request
//! - Provide a plain in-memory request for tools and tests
//!
//! # Design Decisions
//! - Codecs implement [`StreamRequest`]; the router never sees wire bytes
//! - Properties are arbitrary string key/value pairs (headers, frame fields)

use std::collections::HashMap;

/// Read-only view of a request as produced by a protocol codec.
pub trait StreamRequest {
    /// Target host (or service name) of the request.
    fn host(&self) -> &str;

    /// Request path. Protocols without a path return an empty string.
    fn path(&self) -> &str;

    /// Request method (or operation name).
    fn method(&self) -> &str;

    /// Look up a named request property.
    fn get(&self, key: &str) -> Option<&str>;
}

/// Owned request with explicit attributes.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub host: String,
    pub path: String,
    pub method: String,
    pub properties: HashMap<String, String>,
}

impl Request {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl StreamRequest for Request {
    fn host(&self) -> &str {
        &self.host
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = Request::new("service_0")
            .with_method("method_0")
            .with_path("/api")
            .with_property("key_0", "value_0");

        assert_eq!(req.host(), "service_0");
        assert_eq!(req.method(), "method_0");
        assert_eq!(req.path(), "/api");
        assert_eq!(req.get("key_0"), Some("value_0"));
        assert_eq!(req.get("key_1"), None);
    }
}
