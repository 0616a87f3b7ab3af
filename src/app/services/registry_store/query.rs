//! Read-side adaptor queries over the flat adaptor list

use std::sync::Arc;

use super::{resolve_alias, Registry};
use crate::app::models::{ConnectionLocator, DbAdaptor, Group};

impl Registry {
    /// Adaptors matching an optional species and optional group filter, in
    /// registration order.
    ///
    /// The species filter resolves through the alias map, so any synonym
    /// selects its canonical species' adaptors.
    pub fn get_all_db_adaptors(
        &self,
        species: Option<&str>,
        group: Option<Group>,
    ) -> Vec<Arc<DbAdaptor>> {
        let inner = self.read();
        let canonical = species.map(|s| resolve_alias(&inner, s).unwrap_or_else(|| s.to_string()));
        inner
            .flat
            .iter()
            .filter(|dba| {
                canonical
                    .as_deref()
                    .is_none_or(|want| dba.species == want)
                    && group.is_none_or(|want| dba.group == want)
            })
            .cloned()
            .collect()
    }

    /// Adaptors whose underlying connection compares equal to `locator`
    pub fn get_all_db_adaptors_by_connection(
        &self,
        locator: &ConnectionLocator,
    ) -> Vec<Arc<DbAdaptor>> {
        let inner = self.read();
        inner
            .flat
            .iter()
            .filter(|dba| &dba.locator() == locator)
            .cloned()
            .collect()
    }

    /// Number of registered adaptors
    pub fn adaptor_count(&self) -> usize {
        self.read().flat.len()
    }

    /// Whether the registry holds no adaptors
    pub fn is_empty(&self) -> bool {
        self.read().flat.is_empty()
    }

    /// Every canonical species with at least one adaptor, sorted
    pub fn all_species(&self) -> Vec<String> {
        let inner = self.read();
        let mut species: Vec<String> = inner.slots.keys().cloned().collect();
        species.sort();
        species
    }
}
