//! Domain model types for the registry
//!
//! Defines the closed set of database groups, connection parameter records,
//! and the adaptor handles stored in the registry.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::app::adapters::query_runner::QueryRunner;
use crate::constants::{DEFAULT_DRIVER, DEFAULT_PORT};

/// Role a database plays in the ecosystem.
///
/// The set is closed: every registered adaptor carries exactly one of these
/// groups, and configuration records naming anything else are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Group {
    #[serde(rename = "core")]
    Core,
    #[serde(rename = "cdna")]
    Cdna,
    #[serde(rename = "otherfeatures")]
    OtherFeatures,
    #[serde(rename = "rnaseq")]
    RnaSeq,
    #[serde(rename = "vega")]
    Vega,
    #[serde(rename = "variation")]
    Variation,
    #[serde(rename = "funcgen")]
    Funcgen,
    #[serde(rename = "compara")]
    Compara,
    #[serde(rename = "ancestral")]
    Ancestral,
    #[serde(rename = "ontology")]
    Ontology,
    #[serde(rename = "stable_ids")]
    StableIds,
    #[serde(rename = "userupload")]
    UserUpload,
    #[serde(rename = "hive")]
    Hive,
    #[serde(rename = "pipeline")]
    Pipeline,
    #[serde(rename = "blast")]
    Blast,
    #[serde(rename = "haplotype")]
    Haplotype,
    #[serde(rename = "snp")]
    Snp,
}

impl Group {
    /// Every group in the closed set
    pub const ALL: &'static [Group] = &[
        Group::Core,
        Group::Cdna,
        Group::OtherFeatures,
        Group::RnaSeq,
        Group::Vega,
        Group::Variation,
        Group::Funcgen,
        Group::Compara,
        Group::Ancestral,
        Group::Ontology,
        Group::StableIds,
        Group::UserUpload,
        Group::Hive,
        Group::Pipeline,
        Group::Blast,
        Group::Haplotype,
        Group::Snp,
    ];

    /// The wire name of the group as it appears in database names and configs
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Core => "core",
            Group::Cdna => "cdna",
            Group::OtherFeatures => "otherfeatures",
            Group::RnaSeq => "rnaseq",
            Group::Vega => "vega",
            Group::Variation => "variation",
            Group::Funcgen => "funcgen",
            Group::Compara => "compara",
            Group::Ancestral => "ancestral",
            Group::Ontology => "ontology",
            Group::StableIds => "stable_ids",
            Group::UserUpload => "userupload",
            Group::Hive => "hive",
            Group::Pipeline => "pipeline",
            Group::Blast => "blast",
            Group::Haplotype => "haplotype",
            Group::Snp => "snp",
        }
    }

    /// Parse a group name, returning `None` for anything outside the set
    pub fn parse(name: &str) -> Option<Group> {
        Group::ALL.iter().copied().find(|g| g.as_str() == name)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a user-supplied species name for alias comparison.
///
/// Comparison is case-insensitive and spaces and dashes count as
/// underscores.
pub fn normalize_species_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// Parameters describing one database binding on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: Option<String>,
    pub dbname: String,
    pub driver: String,
    pub wait_timeout: u64,
    pub disconnect_when_inactive: bool,
    pub reconnect_when_lost: bool,
}

impl ConnectionParams {
    /// Parameters for a server-level connection with no database selected
    pub fn server(host: impl Into<String>, port: u16, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            pass: None,
            dbname: String::new(),
            driver: DEFAULT_DRIVER.to_string(),
            wait_timeout: 0,
            disconnect_when_inactive: false,
            reconnect_when_lost: false,
        }
    }

    /// The identity of the connection these parameters describe
    pub fn locator(&self) -> ConnectionLocator {
        ConnectionLocator {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            dbname: self.dbname.clone(),
        }
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self::server("localhost", DEFAULT_PORT, "")
    }
}

/// Identity of a database connection: two adaptors compare as sharing a
/// connection when their locators are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionLocator {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub dbname: String,
}

/// One decoded adaptor record, as produced by configuration loading or
/// database enumeration, ready to hand to an adaptor factory.
#[derive(Debug, Clone)]
pub struct AdaptorSpec {
    pub species: String,
    pub group: Group,
    pub species_id: u32,
    pub multispecies_db: bool,
    pub params: ConnectionParams,
    pub no_cache: bool,
}

impl AdaptorSpec {
    pub fn new(species: impl Into<String>, group: Group, params: ConnectionParams) -> Self {
        Self {
            species: species.into(),
            group,
            species_id: 1,
            multispecies_db: false,
            params,
            no_cache: false,
        }
    }
}

/// Handle to one database binding, owned by the registry after registration.
///
/// The handle pairs the connection parameters with the query runner used for
/// any SQL issued on the adaptor's behalf. Runners are shared between
/// adaptors living on the same server; table references are therefore always
/// qualified with the adaptor's own database name.
#[derive(Clone)]
pub struct DbAdaptor {
    pub species: String,
    pub species_id: u32,
    pub group: Group,
    pub is_multispecies: bool,
    pub no_cache: bool,
    pub params: ConnectionParams,
    runner: Arc<dyn QueryRunner>,
}

impl DbAdaptor {
    pub fn new(spec: &AdaptorSpec, runner: Arc<dyn QueryRunner>) -> Self {
        Self {
            species: spec.species.clone(),
            species_id: spec.species_id,
            group: spec.group,
            is_multispecies: spec.multispecies_db,
            no_cache: spec.no_cache,
            params: spec.params.clone(),
            runner,
        }
    }

    /// Name of the database this adaptor is bound to
    pub fn dbname(&self) -> &str {
        &self.params.dbname
    }

    /// The identity of this adaptor's connection
    pub fn locator(&self) -> ConnectionLocator {
        self.params.locator()
    }

    /// The runner carrying this adaptor's SQL
    pub fn runner(&self) -> &Arc<dyn QueryRunner> {
        &self.runner
    }
}

impl fmt::Debug for DbAdaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbAdaptor")
            .field("species", &self.species)
            .field("species_id", &self.species_id)
            .field("group", &self.group)
            .field("is_multispecies", &self.is_multispecies)
            .field("dbname", &self.params.dbname)
            .field("host", &self.params.host)
            .finish()
    }
}

/// A specialized query adaptor living under a (species, group, type) slot.
///
/// Typed adaptors are instantiated lazily on first lookup and keep a handle
/// to the database adaptor they query through.
#[derive(Clone)]
pub struct TypedAdaptor {
    pub species: String,
    pub group: Group,
    pub object_type: String,
    dba: Arc<DbAdaptor>,
}

impl TypedAdaptor {
    pub fn new(dba: Arc<DbAdaptor>, object_type: impl Into<String>) -> Self {
        Self {
            species: dba.species.clone(),
            group: dba.group,
            object_type: object_type.into(),
            dba,
        }
    }

    /// The database adaptor this typed adaptor queries through
    pub fn db_adaptor(&self) -> &Arc<DbAdaptor> {
        &self.dba
    }
}

impl fmt::Debug for TypedAdaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedAdaptor")
            .field("species", &self.species)
            .field("group", &self.group)
            .field("object_type", &self.object_type)
            .finish()
    }
}
