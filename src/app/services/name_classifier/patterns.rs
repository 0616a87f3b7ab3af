//! Database-name grammar
//!
//! The compatibility surface with deployed servers: per-group regular
//! expressions built from shared NAME / COLLECTION / END fragments. Three
//! groups deviate from the common shape (userupload carries no version,
//! compara and the ensembl-prefixed utility databases have their own
//! grammars).

use regex::Regex;

use crate::app::models::Group;

/// Binomial or trinomial species name: lowercase letters, then one or two
/// lowercase alphanumeric words
const NAME: &str = "[a-z]+_[a-z0-9]+(?:_[a-z0-9]+)?";

/// Collection prefix of a multi-species database
const COLLECTION: &str = r"\w+_collection";

/// Version tail: optional inner build number, the captured release, the
/// assembly digits with an optional trailing letter
const END: &str = r"(?:_\d+)?_(\d+)_\d+[a-z]?";

/// Compiled single/collection pair for one group.
///
/// Capture 1 is the encoded name (species, collection prefix, or the whole
/// leading string for compara-style names); capture 2, where present, is
/// the release version.
pub(crate) struct GroupPatterns {
    pub group: Group,
    pub single: Regex,
    pub collection: Option<Regex>,
    /// Whether the patterns capture a release version to check
    pub versioned: bool,
}

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).expect("static database-name pattern")
}

/// Compile the pattern pair for one group.
pub(crate) fn compile_group(group: Group) -> GroupPatterns {
    match group {
        Group::UserUpload => GroupPatterns {
            group,
            single: compile(format!("^({NAME})_userdata$")),
            collection: Some(compile(format!("^({COLLECTION})_userdata$"))),
            versioned: false,
        },
        Group::Compara => GroupPatterns {
            group,
            single: compile(
                r"^(ensembl_compara(?:_[a-z][a-z_]*?)?(?:_\d+)?)_(\d+)$".to_string(),
            ),
            collection: None,
            versioned: true,
        },
        Group::Ancestral | Group::Ontology | Group::StableIds => GroupPatterns {
            group,
            single: compile(format!(
                r"^(ensembl[a-z]*_{})(?:_\d+)?_(\d+)$",
                group.as_str()
            )),
            collection: None,
            versioned: true,
        },
        _ => GroupPatterns {
            group,
            single: compile(format!("^({NAME})_{}{END}$", group.as_str())),
            collection: Some(compile(format!("^({COLLECTION})_{}{END}$", group.as_str()))),
            versioned: true,
        },
    }
}
