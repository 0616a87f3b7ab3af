//! Canonical configuration ingestion
//!
//! Every configuration format funnels through here: a normalized document
//! of the shape `{adaptors: [...], aliases: {species: [alias, ...]}}` is
//! validated and pushed into a registry. Field values are coerced
//! tolerantly because INI sections carry everything as text.

use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

use crate::app::adapters::query_runner::{Connector, QueryRunner};
use crate::app::models::{AdaptorSpec, ConnectionLocator, ConnectionParams, Group};
use crate::app::services::group_catalog;
use crate::app::services::registry_store::Registry;
use crate::constants::{DEFAULT_DRIVER, DEFAULT_PORT};
use crate::{RegistryError, Result};

/// Pushes normalized configuration documents into a registry.
pub struct StructLoader {
    connector: Arc<dyn Connector>,
    no_cache: bool,
}

impl StructLoader {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            no_cache: false,
        }
    }

    /// Force `no_cache` on every adaptor this loader registers
    pub fn no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    /// Validate a document and register its adaptors and aliases.
    ///
    /// A missing `adaptors` or `aliases` key is a no-op for that half; a
    /// key of the wrong shape aborts the load. Records in groups whose
    /// adaptor module is unknown or unavailable are skipped with a warning,
    /// and the group stays skipped for the remainder of the call.
    pub async fn load(&self, registry: &Registry, document: &Value) -> Result<()> {
        let document = document
            .as_object()
            .ok_or_else(|| RegistryError::type_mismatch("configuration document must be a map"))?;

        if let Some(adaptors) = document.get("adaptors") {
            let adaptors = adaptors.as_array().ok_or_else(|| {
                RegistryError::type_mismatch("'adaptors' must be a list of adaptor records")
            })?;
            self.load_adaptors(registry, adaptors).await?;
        }

        if let Some(aliases) = document.get("aliases") {
            let aliases = aliases.as_object().ok_or_else(|| {
                RegistryError::type_mismatch("'aliases' must map species to alias lists")
            })?;
            load_aliases(registry, aliases)?;
        }

        Ok(())
    }

    async fn load_adaptors(&self, registry: &Registry, records: &[Value]) -> Result<()> {
        let mut blacklist: HashSet<String> = HashSet::new();
        let mut runners: HashMap<ConnectionLocator, Arc<dyn QueryRunner>> = HashMap::new();

        for record in records {
            let Some(record) = record.as_object() else {
                warn!("adaptor record is not a map, skipped");
                continue;
            };

            let Some(group_name) = get_str(record, "group") else {
                warn!("adaptor record has no group, skipped");
                continue;
            };
            if blacklist.contains(&group_name) {
                continue;
            }

            let Some(group) = Group::parse(&group_name) else {
                warn!(group = %group_name, "unknown group, skipping its adaptors");
                blacklist.insert(group_name);
                continue;
            };
            let module = group_catalog::module_for(group);
            let Some(factory) = registry.factories().get(module) else {
                warn!(
                    group = group.as_str(),
                    module, "adaptor module unavailable, skipping its adaptors"
                );
                blacklist.insert(group_name);
                continue;
            };

            let Some(species) = get_str(record, "species") else {
                warn!(group = group.as_str(), "adaptor record has no species, skipped");
                continue;
            };

            let params = connection_params(record);
            let mut spec = AdaptorSpec::new(species, group, params);
            spec.species_id = get_u64(record, "species_id").unwrap_or(1) as u32;
            spec.multispecies_db = get_bool(record, "multispecies_db").unwrap_or(false);
            spec.no_cache = self.no_cache || get_bool(record, "no_cache").unwrap_or(false);

            let locator = spec.params.locator();
            let runner = match runners.get(&locator) {
                Some(runner) => Arc::clone(runner),
                None => {
                    let runner = self.connector.connect(&spec.params).await?;
                    runners.insert(locator, Arc::clone(&runner));
                    runner
                }
            };

            let adaptor = factory.create(&spec, runner)?;
            registry.add_adaptor(adaptor, false)?;
        }
        Ok(())
    }
}

fn load_aliases(registry: &Registry, aliases: &Map<String, Value>) -> Result<()> {
    for (species, list) in aliases {
        let list = list.as_array().ok_or_else(|| {
            RegistryError::type_mismatch(format!(
                "aliases for species '{species}' must be a list"
            ))
        })?;
        for alias in list {
            match value_as_string(alias) {
                Some(alias) => registry.add_alias(species, &alias),
                None => warn!(species = %species, "alias is not text, skipped"),
            }
        }
    }
    Ok(())
}

fn connection_params(record: &Map<String, Value>) -> ConnectionParams {
    ConnectionParams {
        host: get_str(record, "host").unwrap_or_else(|| "localhost".to_string()),
        port: get_u64(record, "port")
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or(DEFAULT_PORT),
        user: get_str(record, "user").unwrap_or_default(),
        pass: get_str(record, "pass"),
        dbname: get_str(record, "dbname").unwrap_or_default(),
        driver: get_str(record, "driver").unwrap_or_else(|| DEFAULT_DRIVER.to_string()),
        wait_timeout: get_u64(record, "wait_timeout").unwrap_or(0),
        disconnect_when_inactive: get_bool(record, "disconnect_when_inactive").unwrap_or(false),
        // INI files historically spell this key out in full.
        reconnect_when_lost: get_bool(record, "reconnect_when_lost")
            .or_else(|| get_bool(record, "reconnect_when_connection_lost"))
            .unwrap_or(false),
    }
}

/// Serialize a registry back into the normalized document shape.
///
/// Keys come out sorted, so loading the result reproduces the registry and
/// canonical documents round-trip.
pub fn serialise_registry(registry: &Registry) -> Value {
    let mut adaptors = Vec::new();
    for dba in registry.get_all_db_adaptors(None, None) {
        let mut record = Map::new();
        record.insert("species".into(), json!(dba.species));
        record.insert("group".into(), json!(dba.group.as_str()));
        record.insert("host".into(), json!(dba.params.host));
        record.insert("port".into(), json!(dba.params.port));
        record.insert("user".into(), json!(dba.params.user));
        record.insert("dbname".into(), json!(dba.params.dbname));
        record.insert("driver".into(), json!(dba.params.driver));
        if let Some(pass) = &dba.params.pass {
            record.insert("pass".into(), json!(pass));
        }
        if dba.params.disconnect_when_inactive {
            record.insert("disconnect_when_inactive".into(), json!(true));
        }
        if dba.params.wait_timeout != 0 {
            record.insert("wait_timeout".into(), json!(dba.params.wait_timeout));
        }
        if dba.params.reconnect_when_lost {
            record.insert("reconnect_when_lost".into(), json!(true));
        }
        if dba.is_multispecies {
            record.insert("multispecies_db".into(), json!(true));
        }
        if dba.is_multispecies || dba.species_id != 1 {
            record.insert("species_id".into(), json!(dba.species_id));
        }
        adaptors.push(Value::Object(record));
    }

    let mut aliases = Map::new();
    let table = registry.alias_table();
    let mut species: Vec<&String> = table.keys().collect();
    species.sort();
    for name in species {
        aliases.insert(name.clone(), json!(table[name]));
    }

    json!({ "adaptors": adaptors, "aliases": aliases })
}

// Tolerant field coercion: INI sections carry text, JSON carries types.

fn get_str(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(value_as_string)
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn get_u64(record: &Map<String, Value>, key: &str) -> Option<u64> {
    match record.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn get_bool(record: &Map<String, Value>, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_i64().unwrap_or(0) != 0),
        Value::String(s) => match s.trim() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
