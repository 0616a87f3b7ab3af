//! Adaptor factory registry
//!
//! Adaptor construction is pluggable: each adaptor module identifier maps
//! to a factory, and a group whose module has no factory registered is
//! skipped by the loaders instead of aborting the load. Callers register
//! factories at startup; [`FactoryRegistry::with_defaults`] covers every
//! catalogued module with the stock factory.

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::adapters::query_runner::QueryRunner;
use crate::app::models::{AdaptorSpec, DbAdaptor, Group, TypedAdaptor};
use crate::app::services::group_catalog;
use crate::Result;

/// Builds adaptors for one adaptor module.
pub trait AdaptorFactory: Send + Sync {
    /// Build the database adaptor for a decoded spec
    fn create(&self, spec: &AdaptorSpec, runner: Arc<dyn QueryRunner>) -> Result<DbAdaptor>;

    /// Build a specialized query adaptor on top of a database adaptor.
    ///
    /// Returns `None` when the module does not serve the object type.
    fn create_typed(&self, dba: &Arc<DbAdaptor>, object_type: &str) -> Option<TypedAdaptor> {
        Some(TypedAdaptor::new(Arc::clone(dba), object_type))
    }
}

/// Stock factory: wraps the spec and runner without any module-specific
/// behavior. Suitable for every group whose adaptor is schema-agnostic at
/// the registry level.
pub struct GenericAdaptorFactory;

impl AdaptorFactory for GenericAdaptorFactory {
    fn create(&self, spec: &AdaptorSpec, runner: Arc<dyn QueryRunner>) -> Result<DbAdaptor> {
        Ok(DbAdaptor::new(spec, runner))
    }
}

/// Mapping from adaptor module identifier to factory.
pub struct FactoryRegistry {
    factories: HashMap<String, Arc<dyn AdaptorFactory>>,
}

impl FactoryRegistry {
    /// An empty registry: every group counts as unavailable
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the stock factory registered for every catalogued
    /// module
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let stock: Arc<dyn AdaptorFactory> = Arc::new(GenericAdaptorFactory);
        for group in Group::ALL {
            registry
                .factories
                .entry(group_catalog::module_for(*group).to_string())
                .or_insert_with(|| Arc::clone(&stock));
        }
        registry
    }

    /// Register (or replace) the factory for a module
    pub fn register(&mut self, module: impl Into<String>, factory: Arc<dyn AdaptorFactory>) {
        self.factories.insert(module.into(), factory);
    }

    /// Remove the factory for a module, making its groups unavailable
    pub fn unregister(&mut self, module: &str) {
        self.factories.remove(module);
    }

    /// The factory for a module, if one is registered
    pub fn get(&self, module: &str) -> Option<&Arc<dyn AdaptorFactory>> {
        self.factories.get(module)
    }

    /// Whether the module can build adaptors
    pub fn is_available(&self, module: &str) -> bool {
        self.factories.contains_key(module)
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_groups() {
        let registry = FactoryRegistry::with_defaults();
        for group in Group::ALL {
            assert!(registry.is_available(group_catalog::module_for(*group)));
        }
    }

    #[test]
    fn test_unregister_marks_unavailable() {
        let mut registry = FactoryRegistry::with_defaults();
        registry.unregister("variation");
        assert!(!registry.is_available("variation"));
        assert!(registry.is_available("generic"));
    }

    #[test]
    fn test_empty_registry_has_nothing() {
        let registry = FactoryRegistry::new();
        assert!(!registry.is_available("generic"));
    }
}
