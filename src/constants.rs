//! Application constants for the genome database registry
//!
//! This module contains the connection defaults, reserved species names,
//! meta-table keys, and alias tables used throughout the registry.

// =============================================================================
// Connection Defaults
// =============================================================================

/// Default MySQL-compatible server port
pub const DEFAULT_PORT: u16 = 3306;

/// Default read-only enumeration user
pub const DEFAULT_USER: &str = "ensro";

/// Default connection driver name
pub const DEFAULT_DRIVER: &str = "mysql";

/// Release version assumed when a loader is given none
pub const SOFTWARE_VERSION: u32 = 74;

/// Public archive host that moved its old releases to a non-standard port
pub const ARCHIVE_HOST: &str = "ensembldb.ensembl.org";

/// Port serving releases older than [`ARCHIVE_PORT_CUTOFF`] on the archive host
pub const ARCHIVE_PORT: u16 = 4306;

/// First release served on the standard port of the archive host
pub const ARCHIVE_PORT_CUTOFF: u32 = 48;

// =============================================================================
// Reserved Species Names
// =============================================================================

/// Canonical species owning cross-species databases (compara, ontology, ...)
pub const MULTI_SPECIES: &str = "multi";

/// Canonical species owning ancestral-sequence databases
pub const ANCESTRAL_SPECIES: &str = "Ancestral sequences";

/// Alias injected for [`ANCESTRAL_SPECIES`] after every enumeration load
pub const ANCESTRAL_ALIAS: &str = "ancestral_sequences";

/// Aliases injected for [`MULTI_SPECIES`] after every enumeration load
pub const MULTI_ALIASES: &[&str] = &["compara", "ontology", "stable_ids"];

// =============================================================================
// Meta-Table Contract
// =============================================================================

/// Keys every core-like database exposes in its `meta` table
pub mod meta_keys {
    /// Canonical machine name of a species, scoped by species_id
    pub const PRODUCTION_NAME: &str = "species.production_name";

    /// Synonym for a species, scoped by species_id
    pub const SPECIES_ALIAS: &str = "species.alias";
}

// =============================================================================
// Database Enumeration Patterns
// =============================================================================

/// SHOW DATABASES pattern matching user-uploaded databases
pub const USERDATA_LIKE_PATTERN: &str = "userdata%";

/// Build the SHOW DATABASES pattern matching a release version.
///
/// The underscore is escaped so it matches literally rather than as the
/// single-character LIKE wildcard.
pub fn version_like_pattern(version: u32) -> String {
    format!("%\\_{}%", version)
}

// =============================================================================
// Configuration Discovery
// =============================================================================

/// Environment variable naming a configuration file to load
pub const REGISTRY_ENV_VAR: &str = "ENSEMBL_REGISTRY";

/// Configuration file looked up in the home directory as a last resort
pub const DEFAULT_CONFIG_BASENAME: &str = ".ensembl_init";
