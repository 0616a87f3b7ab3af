//! Species alias bookkeeping
//!
//! Aliases map a normalized synonym to its canonical species. The canonical
//! species is always its own alias once an adaptor is registered for it.

use super::{resolve_alias, Registry};
use crate::app::models::normalize_species_key;

impl Registry {
    /// Record an alias for a canonical species
    pub fn add_alias(&self, species: &str, alias: &str) {
        let mut inner = self.write();
        inner
            .aliases
            .insert(normalize_species_key(alias), species.to_string());
    }

    /// Record several aliases for a canonical species
    pub fn add_aliases<S: AsRef<str>>(&self, species: &str, aliases: &[S]) {
        let mut inner = self.write();
        for alias in aliases {
            inner
                .aliases
                .insert(normalize_species_key(alias.as_ref()), species.to_string());
        }
    }

    /// Resolve a name to its canonical species.
    ///
    /// A name that is already a canonical species resolves to itself even
    /// when no alias entry survives for it.
    pub fn get_alias(&self, name: &str) -> Option<String> {
        let inner = self.read();
        resolve_alias(&inner, name)
    }

    /// Every alias resolving to the same canonical species as `name`,
    /// excluding `name` itself
    pub fn get_all_aliases(&self, name: &str) -> Vec<String> {
        let inner = self.read();
        let Some(canonical) = resolve_alias(&inner, name) else {
            return Vec::new();
        };
        let input_key = normalize_species_key(name);
        let mut found: Vec<String> = inner
            .aliases
            .iter()
            .filter(|(alias, target)| *target == &canonical && **alias != input_key)
            .map(|(alias, _)| alias.clone())
            .collect();
        found.sort();
        found
    }

    /// Forget one alias, returning the species it pointed at
    pub fn remove_alias(&self, alias: &str) -> Option<String> {
        let mut inner = self.write();
        inner.aliases.remove(&normalize_species_key(alias))
    }

    /// Canonical species -> sorted aliases, self entries excluded.
    ///
    /// Species whose only alias is themselves do not appear.
    pub fn alias_table(&self) -> std::collections::HashMap<String, Vec<String>> {
        let inner = self.read();
        let mut table: std::collections::HashMap<String, Vec<String>> =
            std::collections::HashMap::new();
        for (alias, species) in &inner.aliases {
            if alias != &normalize_species_key(species) {
                table.entry(species.clone()).or_default().push(alias.clone());
            }
        }
        for aliases in table.values_mut() {
            aliases.sort();
        }
        table
    }
}
