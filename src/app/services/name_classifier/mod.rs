//! Database-name classification
//!
//! Decides, from a database name and a target release version, which group
//! a database belongs to, whether it is a multi-species collection, and
//! what species and version it encodes.

mod patterns;

#[cfg(test)]
pub mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

use self::patterns::{compile_group, GroupPatterns};
use crate::app::models::Group;
use crate::app::services::group_catalog::GROUP_ORDER;
use crate::constants::{ANCESTRAL_SPECIES, MULTI_SPECIES};

/// Result of classifying one database name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub group: Group,
    pub multispecies: bool,
    /// The captured leading string: a species name, a collection prefix,
    /// or a compara-style database stem
    pub encoded_name: String,
    pub version: u32,
}

/// Where a classified database is registered: the canonical species key and
/// the group written into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTarget {
    pub species: String,
    pub group: Group,
}

/// Classifier with the per-group pattern pairs compiled once, indexed in
/// classification order.
pub struct NameClassifier {
    table: Vec<GroupPatterns>,
}

impl NameClassifier {
    pub fn new() -> Self {
        Self {
            table: GROUP_ORDER.iter().map(|g| compile_group(*g)).collect(),
        }
    }

    /// Classify a name against every group in classification order.
    ///
    /// For each group the collection pattern is tried before the single
    /// pattern, so a collection database never binds as a single-species
    /// match of the same group.
    pub fn classify(&self, dbname: &str, version: u32) -> Option<Classification> {
        self.table
            .iter()
            .find_map(|patterns| try_patterns(patterns, dbname, version))
    }

    /// Classify a name against one group only
    pub fn classify_for_group(
        &self,
        dbname: &str,
        group: Group,
        version: u32,
    ) -> Option<Classification> {
        self.table
            .iter()
            .find(|p| p.group == group)
            .and_then(|patterns| try_patterns(patterns, dbname, version))
    }
}

impl Default for NameClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn try_patterns(patterns: &GroupPatterns, dbname: &str, version: u32) -> Option<Classification> {
    if let Some(collection) = &patterns.collection {
        if let Some(hit) = try_match(collection, patterns, dbname, version, true) {
            return Some(hit);
        }
    }
    try_match(&patterns.single, patterns, dbname, version, false)
}

fn try_match(
    regex: &Regex,
    patterns: &GroupPatterns,
    dbname: &str,
    version: u32,
    multispecies: bool,
) -> Option<Classification> {
    let captures = regex.captures(dbname)?;
    let encoded_name = captures.get(1)?.as_str().to_string();
    if patterns.versioned {
        let captured: u32 = captures.get(2)?.as_str().parse().ok()?;
        if captured != version {
            return None;
        }
    }
    Some(Classification {
        group: patterns.group,
        multispecies,
        encoded_name,
        version,
    })
}

static COMPARA_SUBNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ensembl_compara_([a-z][a-z_]*)_\d+$").expect("static compara subname pattern")
});

/// Resolve the canonical species and stored group for a classification.
///
/// Compara stems with a subname register under that subname, bare compara
/// and the utility databases under the reserved multi species, and
/// ancestral databases under the ancestral pseudo-species with group core.
pub fn canonical_target(classification: &Classification) -> CanonicalTarget {
    match classification.group {
        Group::Compara => {
            let species = COMPARA_SUBNAME
                .captures(&classification.encoded_name)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| MULTI_SPECIES.to_string());
            CanonicalTarget {
                species,
                group: Group::Compara,
            }
        }
        Group::Ontology | Group::StableIds => CanonicalTarget {
            species: MULTI_SPECIES.to_string(),
            group: classification.group,
        },
        Group::Ancestral => CanonicalTarget {
            species: ANCESTRAL_SPECIES.to_string(),
            group: Group::Core,
        },
        _ => CanonicalTarget {
            species: classification.encoded_name.clone(),
            group: classification.group,
        },
    }
}
