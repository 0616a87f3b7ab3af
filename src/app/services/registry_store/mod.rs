//! In-memory registry of database adaptors and species aliases
//!
//! The store indexes adaptors by (species, group), specialized query
//! adaptors by (species, group, object type), species aliases, and DNA
//! redirection targets. One process-wide instance is available through
//! [`Registry::global`]; private instances behave identically.
//!
//! All mutation is serialized behind a single lock; the read-heavy lookup
//! paths take the shared side.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

pub mod aliases;
pub mod merge;
pub mod query;

#[cfg(test)]
pub mod tests;

use crate::app::adapters::factory::FactoryRegistry;
use crate::app::models::{normalize_species_key, DbAdaptor, Group, TypedAdaptor};
use crate::app::services::group_catalog;
use crate::{RegistryError, Result};

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// The normalized index behind a registry instance.
#[derive(Default)]
pub(crate) struct StoreInner {
    /// Normalized alias -> canonical species
    pub(crate) aliases: HashMap<String, String>,

    /// Canonical species -> group -> adaptor
    pub(crate) slots: HashMap<String, HashMap<Group, Arc<DbAdaptor>>>,

    /// Every registered adaptor exactly once, in registration order
    pub(crate) flat: Vec<Arc<DbAdaptor>>,

    /// (species, group, object type) -> lazily built query adaptor
    pub(crate) typed: HashMap<(String, Group, String), Arc<TypedAdaptor>>,

    /// Species -> object types instantiated for it
    pub(crate) species_types: HashMap<String, Vec<String>>,

    /// Object type -> query adaptors instantiated for it
    pub(crate) type_species: HashMap<String, Vec<Arc<TypedAdaptor>>>,

    /// (species, group) -> (dna species, dna group) redirection
    pub(crate) dna_overrides: HashMap<(String, Group), (String, Group)>,
}

/// Registry of database adaptors, aliases, and typed adaptor slots.
pub struct Registry {
    pub(crate) inner: RwLock<StoreInner>,
    factories: Arc<FactoryRegistry>,
}

impl Registry {
    /// A private registry with the stock adaptor factories
    pub fn new() -> Self {
        Self::with_factories(Arc::new(FactoryRegistry::with_defaults()))
    }

    /// A private registry with an explicit factory registry
    pub fn with_factories(factories: Arc<FactoryRegistry>) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            factories,
        }
    }

    /// The process-wide registry, constructed on first use
    pub fn global() -> &'static Registry {
        &GLOBAL_REGISTRY
    }

    /// The adaptor factories this registry builds typed adaptors with
    pub fn factories(&self) -> &Arc<FactoryRegistry> {
        &self.factories
    }

    /// Register a database adaptor under its (species, group) slot.
    ///
    /// Creates the species' self alias when missing. A second insertion
    /// into an occupied slot fails unless `reset` is set, in which case the
    /// previous adaptor is replaced.
    pub fn add_adaptor(&self, adaptor: DbAdaptor, reset: bool) -> Result<()> {
        let mut inner = self.write();
        let species = adaptor.species.clone();
        let group = adaptor.group;

        let occupied = inner
            .slots
            .get(&species)
            .is_some_and(|groups| groups.contains_key(&group));
        if occupied {
            if !reset {
                return Err(RegistryError::already_exists(species, group.as_str()));
            }
            if let Some(old) = inner
                .slots
                .get_mut(&species)
                .and_then(|groups| groups.remove(&group))
            {
                inner.flat.retain(|d| !Arc::ptr_eq(d, &old));
            }
        }

        inner
            .aliases
            .entry(normalize_species_key(&species))
            .or_insert_with(|| species.clone());

        let adaptor = Arc::new(adaptor);
        inner
            .slots
            .entry(species)
            .or_default()
            .insert(group, Arc::clone(&adaptor));
        inner.flat.push(adaptor);
        Ok(())
    }

    /// Look up the adaptor for a species (or one of its aliases) and group
    pub fn get_db_adaptor(&self, species: &str, group: Group) -> Option<Arc<DbAdaptor>> {
        let inner = self.read();
        let canonical = resolve_alias(&inner, species)?;
        inner
            .slots
            .get(&canonical)
            .and_then(|groups| groups.get(&group))
            .cloned()
    }

    /// Remove the adaptor under a (species, group) slot, returning it.
    ///
    /// Typed adaptors and DNA redirection built on the slot go with it, and
    /// the auto-created self alias is dropped with the species' last slot.
    pub fn remove_db_adaptor(&self, species: &str, group: Group) -> Option<Arc<DbAdaptor>> {
        let mut inner = self.write();
        let canonical = resolve_alias(&inner, species)?;
        let removed = inner.slots.get_mut(&canonical)?.remove(&group)?;
        inner.flat.retain(|d| !Arc::ptr_eq(d, &removed));

        let mut stale_types = Vec::new();
        inner.typed.retain(|(s, g, t), adaptor| {
            if s == &canonical && *g == group {
                stale_types.push((t.clone(), Arc::clone(adaptor)));
                false
            } else {
                true
            }
        });
        for (object_type, adaptor) in stale_types {
            if let Some(list) = inner.type_species.get_mut(&object_type) {
                list.retain(|a| !Arc::ptr_eq(a, &adaptor));
            }
            // The species may still serve the type through another group.
            let still_used = inner
                .typed
                .keys()
                .any(|(s, _, t)| s == &canonical && t == &object_type);
            if !still_used {
                if let Some(types) = inner.species_types.get_mut(&canonical) {
                    types.retain(|t| t != &object_type);
                }
            }
        }
        inner.dna_overrides.remove(&(canonical.clone(), group));

        if inner.slots.get(&canonical).is_some_and(HashMap::is_empty) {
            inner.slots.remove(&canonical);
            let key = normalize_species_key(&canonical);
            let only_self_alias = !inner
                .aliases
                .iter()
                .any(|(alias, target)| target == &canonical && alias != &key);
            if only_self_alias {
                inner.aliases.remove(&key);
            }
        }
        Some(removed)
    }

    /// Register a typed adaptor under its (species, group, type) slot
    pub fn add_typed_adaptor(&self, adaptor: TypedAdaptor, reset: bool) -> Result<()> {
        let mut inner = self.write();
        let key = (
            adaptor.species.clone(),
            adaptor.group,
            adaptor.object_type.clone(),
        );
        if inner.typed.contains_key(&key) {
            if !reset {
                return Err(RegistryError::already_exists(
                    format!("{} [{}]", key.0, key.2),
                    key.1.as_str(),
                ));
            }
            remove_typed(&mut inner, &key);
        }
        insert_typed(&mut inner, key, Arc::new(adaptor));
        Ok(())
    }

    /// Fetch the typed adaptor for (species, group, object type), building
    /// it through the group's factory on first use.
    pub fn get_adaptor(
        &self,
        species: &str,
        group: Group,
        object_type: &str,
    ) -> Result<Arc<TypedAdaptor>> {
        let mut inner = self.write();
        let canonical = resolve_alias(&inner, species).ok_or_else(|| {
            RegistryError::not_found(format!("no alias resolves for species '{species}'"))
        })?;

        let key = (canonical.clone(), group, object_type.to_string());
        if let Some(existing) = inner.typed.get(&key) {
            return Ok(Arc::clone(existing));
        }

        let dba = inner
            .slots
            .get(&canonical)
            .and_then(|groups| groups.get(&group))
            .cloned()
            .ok_or_else(|| {
                RegistryError::not_found(format!(
                    "no '{group}' adaptor registered for species '{canonical}'"
                ))
            })?;

        let module = group_catalog::module_for(group);
        let factory = self
            .factories
            .get(module)
            .ok_or_else(|| RegistryError::unavailable_module(module))?;
        let typed = factory.create_typed(&dba, object_type).ok_or_else(|| {
            RegistryError::not_found(format!(
                "object type '{object_type}' is not served by module '{module}'"
            ))
        })?;

        let typed = Arc::new(typed);
        insert_typed(&mut inner, key, Arc::clone(&typed));
        Ok(typed)
    }

    /// Like [`Registry::get_adaptor`] but silent: `None` instead of errors
    pub fn get_adaptor_or_none(
        &self,
        species: &str,
        group: Group,
        object_type: &str,
    ) -> Option<Arc<TypedAdaptor>> {
        self.get_adaptor(species, group, object_type).ok()
    }

    /// Redirect sequence-type requests for (species, group) to another slot
    pub fn add_dna_adaptor(
        &self,
        species: &str,
        group: Group,
        dna_species: &str,
        dna_group: Group,
    ) {
        let mut inner = self.write();
        let canonical = resolve_alias(&inner, species).unwrap_or_else(|| species.to_string());
        inner.dna_overrides.insert(
            (canonical, group),
            (dna_species.to_string(), dna_group),
        );
    }

    /// Resolve the adaptor serving sequence requests for (species, group).
    ///
    /// A redirection target that no longer resolves to a registered adaptor
    /// falls back to the original slot.
    pub fn get_dna_adaptor(&self, species: &str, group: Group) -> Option<Arc<DbAdaptor>> {
        let target = {
            let inner = self.read();
            let canonical = resolve_alias(&inner, species)?;
            inner.dna_overrides.get(&(canonical, group)).cloned()
        };
        if let Some((dna_species, dna_group)) = target {
            if let Some(dba) = self.get_db_adaptor(&dna_species, dna_group) {
                return Some(dba);
            }
            debug!(
                species,
                group = group.as_str(),
                "DNA redirection target is not registered, falling back"
            );
        }
        self.get_db_adaptor(species, group)
    }

    /// Object types instantiated for a species so far
    pub fn object_types(&self, species: &str) -> Vec<String> {
        let inner = self.read();
        resolve_alias(&inner, species)
            .and_then(|canonical| inner.species_types.get(&canonical).cloned())
            .unwrap_or_default()
    }

    /// Typed adaptors instantiated for an object type, across species
    pub fn adaptors_of_type(&self, object_type: &str) -> Vec<Arc<TypedAdaptor>> {
        let inner = self.read();
        inner
            .type_species
            .get(object_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop every adaptor and alias, disconnecting idle connections first
    pub fn clear(&self) {
        let mut inner = self.write();
        for adaptor in &inner.flat {
            let runner = adaptor.runner();
            if runner.is_idle() {
                runner.disconnect();
            }
        }
        *inner = StoreInner::default();
    }

    pub(crate) fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().expect("registry lock poisoned")
    }

    pub(crate) fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().expect("registry lock poisoned")
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a name to its canonical species: through the alias map first,
/// then accepting an exact canonical key that lost its alias entry.
pub(crate) fn resolve_alias(inner: &StoreInner, name: &str) -> Option<String> {
    let key = normalize_species_key(name);
    if let Some(canonical) = inner.aliases.get(&key) {
        return Some(canonical.clone());
    }
    if inner.slots.contains_key(name) {
        return Some(name.to_string());
    }
    None
}

fn insert_typed(inner: &mut StoreInner, key: (String, Group, String), typed: Arc<TypedAdaptor>) {
    let types = inner.species_types.entry(key.0.clone()).or_default();
    if !types.contains(&key.2) {
        types.push(key.2.clone());
    }
    inner
        .type_species
        .entry(key.2.clone())
        .or_default()
        .push(Arc::clone(&typed));
    inner.typed.insert(key, typed);
}

fn remove_typed(inner: &mut StoreInner, key: &(String, Group, String)) {
    if let Some(old) = inner.typed.remove(key) {
        if let Some(list) = inner.type_species.get_mut(&key.2) {
            list.retain(|a| !Arc::ptr_eq(a, &old));
        }
    }
}
