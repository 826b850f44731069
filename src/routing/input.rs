//! Request attribute extractors ("data inputs").
//!
//! # Responsibilities
//! - Define the extractor and extractor-factory traits
//! - Provide the built-in host, path, method and property inputs
//!
//! # Design Decisions
//! - Factories are resolved by name when the route table is built, never per request
//! - An extractor returns `None` when the attribute is absent; predicates treat that as no match

use std::fmt::Debug;

use serde::Deserialize;
use serde_json::Value;

use crate::request::StreamRequest;
use crate::routing::error::BoxError;

pub const HOST_INPUT: &str = "matching.input.host";
pub const PATH_INPUT: &str = "matching.input.path";
pub const METHOD_INPUT: &str = "matching.input.method";
pub const PROPERTY_INPUT: &str = "matching.input.property";

/// Extracts one string attribute from a request.
pub trait DataInput: Send + Sync + Debug {
    fn get<'a>(&self, request: &'a dyn StreamRequest) -> Option<&'a str>;
}

/// Named factory producing a [`DataInput`] bound to its typed configuration.
pub trait DataInputFactory: Send + Sync {
    /// Name used by `single_predicate.input.name`.
    fn name(&self) -> &str;

    fn create_data_input(&self, typed_config: &Value) -> Result<Box<dyn DataInput>, BoxError>;
}

#[derive(Debug, Clone, Copy)]
pub struct HostInput;

impl DataInput for HostInput {
    fn get<'a>(&self, request: &'a dyn StreamRequest) -> Option<&'a str> {
        Some(request.host())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PathInput;

impl DataInput for PathInput {
    fn get<'a>(&self, request: &'a dyn StreamRequest) -> Option<&'a str> {
        Some(request.path())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MethodInput;

impl DataInput for MethodInput {
    fn get<'a>(&self, request: &'a dyn StreamRequest) -> Option<&'a str> {
        Some(request.method())
    }
}

/// Reads a named request property.
#[derive(Debug, Clone)]
pub struct PropertyInput {
    property_name: String,
}

impl PropertyInput {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
        }
    }
}

impl DataInput for PropertyInput {
    fn get<'a>(&self, request: &'a dyn StreamRequest) -> Option<&'a str> {
        request.get(&self.property_name)
    }
}

/// Factory for the inputs that take no configuration.
struct StaticInputFactory {
    name: &'static str,
    make: fn() -> Box<dyn DataInput>,
}

impl DataInputFactory for StaticInputFactory {
    fn name(&self) -> &str {
        self.name
    }

    fn create_data_input(&self, _typed_config: &Value) -> Result<Box<dyn DataInput>, BoxError> {
        Ok((self.make)())
    }
}

#[derive(Debug, Deserialize)]
struct PropertyInputConfig {
    property_name: String,
}

struct PropertyInputFactory;

impl DataInputFactory for PropertyInputFactory {
    fn name(&self) -> &str {
        PROPERTY_INPUT
    }

    fn create_data_input(&self, typed_config: &Value) -> Result<Box<dyn DataInput>, BoxError> {
        let config = PropertyInputConfig::deserialize(typed_config)?;
        if config.property_name.is_empty() {
            return Err("property_name must not be empty".into());
        }
        Ok(Box::new(PropertyInput::new(config.property_name)))
    }
}

/// The factories registered by [`crate::routing::Extensions::with_builtin_inputs`].
pub fn builtin_factories() -> Vec<Box<dyn DataInputFactory>> {
    vec![
        Box::new(StaticInputFactory {
            name: HOST_INPUT,
            make: || Box::new(HostInput),
        }),
        Box::new(StaticInputFactory {
            name: PATH_INPUT,
            make: || Box::new(PathInput),
        }),
        Box::new(StaticInputFactory {
            name: METHOD_INPUT,
            make: || Box::new(MethodInput),
        }),
        Box::new(PropertyInputFactory),
    ]
}
