//! Name-keyed extension tables.
//!
//! # Responsibilities
//! - Hold the data-input factories referenced by predicates
//! - Hold the per-filter route config factories referenced by route actions
//!
//! # Design Decisions
//! - Populated once during process start, then frozen behind an `Arc`
//! - Lookups are plain map reads; no locking after init
//! - Registering the same name twice is an init-time bug and is reported

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::entry::FilterConfigFactory;
use crate::routing::error::RegistryError;
use crate::routing::input::{builtin_factories, DataInputFactory};

/// Extension registry consulted while building a route table.
#[derive(Default)]
pub struct Extensions {
    data_inputs: HashMap<String, Arc<dyn DataInputFactory>>,
    filter_configs: HashMap<String, Arc<dyn FilterConfigFactory>>,
}

impl Extensions {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in host, path, method and property inputs.
    pub fn with_builtin_inputs() -> Self {
        let mut extensions = Self::new();
        for factory in builtin_factories() {
            let name = factory.name().to_string();
            extensions.data_inputs.insert(name, Arc::from(factory));
        }
        extensions
    }

    pub fn register_data_input(
        &mut self,
        factory: impl DataInputFactory + 'static,
    ) -> Result<(), RegistryError> {
        let name = factory.name().to_string();
        if self.data_inputs.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.data_inputs.insert(name, Arc::new(factory));
        Ok(())
    }

    pub fn register_filter_config(
        &mut self,
        factory: Arc<dyn FilterConfigFactory>,
    ) -> Result<(), RegistryError> {
        let name = factory.name().to_string();
        if self.filter_configs.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.filter_configs.insert(name, factory);
        Ok(())
    }

    pub fn data_input(&self, name: &str) -> Option<&dyn DataInputFactory> {
        self.data_inputs.get(name).map(|f| f.as_ref())
    }

    pub fn filter_config(&self, name: &str) -> Option<&dyn FilterConfigFactory> {
        self.filter_configs.get(name).map(|f| f.as_ref())
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut inputs: Vec<_> = self.data_inputs.keys().collect();
        inputs.sort();
        let mut filters: Vec<_> = self.filter_configs.keys().collect();
        filters.sort();
        f.debug_struct("Extensions")
            .field("data_inputs", &inputs)
            .field("filter_configs", &filters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::error::BoxError;
    use crate::routing::input::{DataInput, HostInput, HOST_INPUT, PROPERTY_INPUT};
    use serde_json::Value;

    struct CustomInput(&'static str);

    impl DataInputFactory for CustomInput {
        fn name(&self) -> &str {
            self.0
        }

        fn create_data_input(&self, _: &Value) -> Result<Box<dyn DataInput>, BoxError> {
            Ok(Box::new(HostInput))
        }
    }

    #[test]
    fn test_builtin_inputs_registered() {
        let extensions = Extensions::with_builtin_inputs();
        assert!(extensions.data_input(HOST_INPUT).is_some());
        assert!(extensions.data_input(PROPERTY_INPUT).is_some());
        assert!(extensions.data_input("unknown").is_none());
        assert!(Extensions::new().data_input(HOST_INPUT).is_none());
    }

    #[test]
    fn test_duplicate_registration() {
        let mut extensions = Extensions::with_builtin_inputs();
        extensions.register_data_input(CustomInput("custom")).unwrap();

        let err = extensions
            .register_data_input(CustomInput(HOST_INPUT))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Double registration for name '{}'", HOST_INPUT)
        );
        assert!(extensions.register_data_input(CustomInput("custom")).is_err());
    }
}
