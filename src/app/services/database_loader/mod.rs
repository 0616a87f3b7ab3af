//! Database enumeration loading
//!
//! Derives a full registry from one server connection: lists candidate
//! databases, classifies them group by group in catalog order, expands
//! multi-species collections through their meta tables, registers adaptors,
//! and harvests species aliases.

pub mod aliases;
pub mod stats;
pub mod url;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::app::adapters::query_runner::{Connector, SqlValue};
use crate::app::models::{
    normalize_species_key, AdaptorSpec, ConnectionParams, Group,
};
use crate::app::services::group_catalog::{self, GROUP_ORDER};
use crate::app::services::name_classifier::{canonical_target, NameClassifier};
use crate::app::services::registry_store::Registry;
use crate::constants::{
    ANCESTRAL_ALIAS, ANCESTRAL_SPECIES, ARCHIVE_HOST, ARCHIVE_PORT, ARCHIVE_PORT_CUTOFF,
    DEFAULT_PORT, DEFAULT_USER, MULTI_ALIASES, MULTI_SPECIES, SOFTWARE_VERSION,
    USERDATA_LIKE_PATTERN,
};
use crate::{RegistryError, Result};

pub use self::stats::LoadStats;
use self::aliases::HarvestSource;

/// Options for one enumeration load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub host: String,
    /// Explicit port; `None` picks the default, with the archive-host rule
    /// for old releases
    pub port: Option<u16>,
    pub user: String,
    pub pass: Option<String>,
    /// Release to load; `None` means the crate's own release
    pub db_version: Option<u32>,
    pub wait_timeout: u64,
    /// Restrict core-like groups to species whose name starts with this
    pub species_filter: Option<String>,
    /// Appended to every species and alias registered by this load
    pub species_suffix: String,
    pub no_cache: bool,
    pub verbose: bool,
}

impl LoadOptions {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: DEFAULT_USER.to_string(),
            pass: None,
            db_version: None,
            wait_timeout: 0,
            species_filter: None,
            species_suffix: String::new(),
            no_cache: false,
            verbose: false,
        }
    }

    /// The release version this load targets
    pub fn effective_version(&self) -> u32 {
        self.db_version.unwrap_or(SOFTWARE_VERSION)
    }

    /// The port to connect to.
    ///
    /// The public archive host serves releases older than 48 on a
    /// non-standard port.
    pub fn effective_port(&self) -> u16 {
        if let Some(port) = self.port {
            return port;
        }
        if self.host == ARCHIVE_HOST && self.effective_version() < ARCHIVE_PORT_CUTOFF {
            return ARCHIVE_PORT;
        }
        DEFAULT_PORT
    }

    /// Server-level connection parameters for this load
    pub fn server_params(&self) -> ConnectionParams {
        let mut params = ConnectionParams::server(
            self.host.clone(),
            self.effective_port(),
            self.user.clone(),
        );
        params.pass = self.pass.clone();
        params.wait_timeout = self.wait_timeout;
        params
    }

    /// Tolerant key/value parser for the boundary where options arrive as
    /// text (URLs, command lines).
    ///
    /// Historical misspellings of `db_version` are accepted with a
    /// correction warning.
    pub fn from_key_values<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut host = None;
        let mut options = Self::new("");
        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref();
            match key {
                "host" => host = Some(value.to_string()),
                "port" => options.port = value.parse().ok(),
                "user" => options.user = value.to_string(),
                "pass" => options.pass = Some(value.to_string()),
                "db_version" => options.db_version = value.parse().ok(),
                "version" | "verion" | "verison" | "dbversion" => {
                    warn!(key, "accepting misspelled option, use 'db_version'");
                    options.db_version = value.parse().ok();
                }
                "wait_timeout" => options.wait_timeout = value.parse().unwrap_or(0),
                "species_filter" => options.species_filter = Some(value.to_string()),
                "species_suffix" => options.species_suffix = value.to_string(),
                "no_cache" => options.no_cache = matches!(value, "1" | "true" | "yes"),
                "verbose" => options.verbose = matches!(value, "1" | "true" | "yes"),
                _ => warn!(key, "unknown loader option, ignored"),
            }
        }
        options.host =
            host.ok_or_else(|| RegistryError::bad_input("loader options name no host"))?;
        Ok(options)
    }
}

/// Loads a registry by enumerating the databases visible on one server.
#[derive(Clone)]
pub struct DatabaseLoader {
    connector: Arc<dyn Connector>,
}

impl DatabaseLoader {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Enumerate one server and register everything that classifies at the
    /// requested release.
    pub async fn load(&self, registry: &Registry, options: &LoadOptions) -> Result<LoadStats> {
        let started = Instant::now();
        let version = options.effective_version();
        let mut stats = LoadStats::new(version);

        // One connection for the whole load; connecting now surfaces
        // authentication problems before any enumeration work.
        let runner = self.connector.connect(&options.server_params()).await?;
        info!(host = %options.host, version, "enumerating databases");

        let mut candidates: Vec<String> = Vec::new();
        for pattern in [
            crate::constants::version_like_pattern(version),
            USERDATA_LIKE_PATTERN.to_string(),
        ] {
            let rows = runner
                .query(&format!("SHOW DATABASES LIKE '{pattern}'"), &[])
                .await?;
            for row in rows {
                if let Some(name) = row.first().and_then(SqlValue::as_str) {
                    if !candidates.iter().any(|c| c == name) {
                        candidates.push(name.to_string());
                    }
                }
            }
        }
        stats.databases_seen = candidates.len();
        let mut consumed = vec![false; candidates.len()];

        let classifier = NameClassifier::new();
        let filter = options
            .species_filter
            .as_deref()
            .map(normalize_species_key);

        for &group in GROUP_ORDER {
            let module = group_catalog::module_for(group);
            let Some(factory) = registry.factories().get(module) else {
                warn!(
                    group = group.as_str(),
                    module, "adaptor module unavailable, skipping group"
                );
                stats.groups_skipped.push(group.as_str().to_string());
                continue;
            };

            let mut harvest: Vec<HarvestSource> = Vec::new();

            for index in 0..candidates.len() {
                if consumed[index] {
                    continue;
                }
                let dbname = candidates[index].clone();
                let Some(classification) = classifier.classify_for_group(&dbname, group, version)
                else {
                    continue;
                };

                if let Some(filter) = &filter {
                    if group_catalog::filterable(group)
                        && !classification.encoded_name.starts_with(filter.as_str())
                    {
                        debug!(dbname = %dbname, "species filter excludes database");
                        continue;
                    }
                }

                // (species_id, species, stored group) triples to register.
                let mut members: Vec<(u32, String, Group)> = Vec::new();
                if classification.multispecies {
                    for (species_id, name) in
                        aliases::fetch_production_names(runner.as_ref(), &dbname).await?
                    {
                        members.push((species_id, name, group));
                    }
                } else {
                    let target = canonical_target(&classification);
                    members.push((1, target.species, target.group));
                }

                let mut source = HarvestSource {
                    dbname: dbname.clone(),
                    multispecies: classification.multispecies,
                    species: Vec::new(),
                };

                for (species_id, species, stored_group) in members {
                    let species = format!("{}{}", species, options.species_suffix);
                    let mut params = options.server_params();
                    params.dbname = dbname.clone();
                    let mut spec = AdaptorSpec::new(species.clone(), stored_group, params);
                    spec.species_id = species_id;
                    spec.multispecies_db = classification.multispecies;
                    spec.no_cache = options.no_cache;

                    let adaptor = factory.create(&spec, Arc::clone(&runner))?;
                    match registry.add_adaptor(adaptor, false) {
                        Ok(()) => {
                            stats.adaptors_registered += 1;
                            source.species.push((species_id, species.clone()));
                            if options.verbose {
                                info!(
                                    dbname = %dbname,
                                    species = %species,
                                    group = stored_group.as_str(),
                                    "registered adaptor"
                                );
                            }
                        }
                        Err(e) => {
                            warn!(dbname = %dbname, species = %species, "registration failed: {e}");
                            stats.errors.push(format!("{dbname}: {e}"));
                        }
                    }
                }

                harvest.push(source);
                consumed[index] = true;
                stats.databases_registered += 1;
            }

            if group_catalog::alias_available(group) {
                for source in &harvest {
                    stats.aliases_registered += aliases::harvest_aliases(
                        runner.as_ref(),
                        registry,
                        source,
                        &options.species_suffix,
                    )
                    .await?;
                }
            }

            inject_default_aliases(registry, &options.species_suffix);
        }

        for (index, name) in candidates.iter().enumerate() {
            if !consumed[index] {
                debug!(dbname = %name, "database matched no group, dropped");
                stats.unclassified.push(name.clone());
            }
        }

        if runner.is_idle() {
            runner.disconnect();
        }

        stats.load_duration = started.elapsed();
        info!("{}", stats.summary());
        Ok(stats)
    }
}

/// Register the standing aliases every enumeration load guarantees.
///
/// The ancestral alias uses the `ancestral_sequences` spelling; the
/// misspelled variant that circulated in old configurations is not
/// registered.
pub(crate) fn inject_default_aliases(registry: &Registry, suffix: &str) {
    let multi = format!("{MULTI_SPECIES}{suffix}");
    for alias in MULTI_ALIASES {
        registry.add_alias(&multi, &format!("{alias}{suffix}"));
    }
    registry.add_alias(
        &format!("{ANCESTRAL_SPECIES}{suffix}"),
        &format!("{ANCESTRAL_ALIAS}{suffix}"),
    );
}
