//! Static catalog of database groups
//!
//! Maps each group to the adaptor module implementing it, and records which
//! groups harvest aliases and which accept species filtering during an
//! enumeration load.

use crate::app::models::Group;

/// Fixed order groups are classified in during an enumeration load.
///
/// The order is observable: a database name matching more than one group
/// binds to the earliest match, and later groups never see it.
pub const GROUP_ORDER: &[Group] = &[
    Group::Core,
    Group::OtherFeatures,
    Group::Cdna,
    Group::Vega,
    Group::RnaSeq,
    Group::Variation,
    Group::Funcgen,
    Group::UserUpload,
    Group::Compara,
    Group::Ancestral,
    Group::Ontology,
    Group::StableIds,
];

/// Identifier of the adaptor module serving a group.
///
/// Core-like groups share the generic module; the specialised schemas get
/// their own. An adaptor factory registered under the returned identifier
/// makes the group loadable.
pub fn module_for(group: Group) -> &'static str {
    match group {
        Group::Core
        | Group::Cdna
        | Group::OtherFeatures
        | Group::RnaSeq
        | Group::Vega
        | Group::Ancestral
        | Group::UserUpload
        | Group::StableIds => "generic",
        Group::Variation => "variation",
        Group::Funcgen => "funcgen",
        Group::Compara => "compara",
        Group::Ontology => "ontology",
        Group::Hive => "hive",
        Group::Pipeline => "pipeline",
        Group::Blast => "blast",
        Group::Haplotype => "haplotype",
        Group::Snp => "snp",
    }
}

/// Module identifier for a group given by name, `None` for unknown groups
pub fn module_for_name(name: &str) -> Option<&'static str> {
    Group::parse(name).map(module_for)
}

/// Whether alias harvesting runs for the group after an enumeration load
pub fn alias_available(group: Group) -> bool {
    matches!(group, Group::Core | Group::Compara)
}

/// Whether a species filter applies to the group during enumeration
pub fn filterable(group: Group) -> bool {
    matches!(
        group,
        Group::Core
            | Group::OtherFeatures
            | Group::Cdna
            | Group::Vega
            | Group::RnaSeq
            | Group::Variation
            | Group::Funcgen
            | Group::UserUpload
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_order_starts_with_core() {
        assert_eq!(GROUP_ORDER[0], Group::Core);
        assert_eq!(GROUP_ORDER.len(), 12);
        // Every ordered group resolves to a module.
        for group in GROUP_ORDER {
            assert!(!module_for(*group).is_empty());
        }
    }

    #[test]
    fn test_module_for_name() {
        assert_eq!(module_for_name("core"), Some("generic"));
        assert_eq!(module_for_name("variation"), Some("variation"));
        assert_eq!(module_for_name("nonsense"), None);
    }

    #[test]
    fn test_alias_and_filter_tables() {
        assert!(alias_available(Group::Core));
        assert!(alias_available(Group::Compara));
        assert!(!alias_available(Group::Variation));

        assert!(filterable(Group::UserUpload));
        assert!(!filterable(Group::Compara));
        assert!(!filterable(Group::Ontology));
    }
}
