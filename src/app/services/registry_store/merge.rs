//! Merging one registry into another
//!
//! Used when several servers are loaded into temporary stores and folded
//! into a main registry. Whatever the destination already holds wins;
//! duplicates never fail the merge.

use std::sync::Arc;

use tracing::debug;

use crate::app::models::normalize_species_key;

use super::Registry;

impl Registry {
    /// Copy every adaptor and alias from `other` that this registry does
    /// not already hold. Existing entries win; duplicates are logged when
    /// `verbose` is set.
    pub fn merge(&self, other: &Registry, verbose: bool) {
        if std::ptr::eq(self, other) {
            return;
        }
        let source = other.read();
        let mut dest = self.write();

        for adaptor in &source.flat {
            let occupied = dest
                .slots
                .get(&adaptor.species)
                .is_some_and(|groups| groups.contains_key(&adaptor.group));
            if occupied {
                if verbose {
                    debug!(
                        species = %adaptor.species,
                        group = adaptor.group.as_str(),
                        dbname = adaptor.dbname(),
                        "adaptor already present, keeping first-seen"
                    );
                }
                continue;
            }
            dest.aliases
                .entry(normalize_species_key(&adaptor.species))
                .or_insert_with(|| adaptor.species.clone());
            dest.slots
                .entry(adaptor.species.clone())
                .or_default()
                .insert(adaptor.group, Arc::clone(adaptor));
            dest.flat.push(Arc::clone(adaptor));
        }

        for (alias, species) in &source.aliases {
            if dest.aliases.contains_key(alias) {
                if verbose && dest.aliases.get(alias) != Some(species) {
                    debug!(%alias, %species, "alias already present, keeping first-seen");
                }
                continue;
            }
            dest.aliases.insert(alias.clone(), species.clone());
        }
    }
}
