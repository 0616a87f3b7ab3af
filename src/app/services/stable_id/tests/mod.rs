//! Shared fixtures for stable-identifier locator tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::app::adapters::query_runner::{QueryRunner, Row, SqlValue};
use crate::app::models::{
    AdaptorSpec, ConnectionLocator, ConnectionParams, DbAdaptor, Group,
};
use crate::{RegistryError, Result};


/// One row of a scripted stable-id lookup database.
#[derive(Clone)]
pub struct LookupRow {
    pub stable_id: String,
    pub name: String,
    pub object_type: String,
    pub db_type: String,
}

/// Runner for a scripted lookup database.
pub struct LookupRunner {
    locator: ConnectionLocator,
    rows: Vec<LookupRow>,
}

#[async_trait]
impl QueryRunner for LookupRunner {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        if !sql.contains("stable_id_lookup") {
            return Err(RegistryError::backend(format!(
                "lookup database got a feature query: {sql}"
            )));
        }
        let stable_id = params
            .first()
            .and_then(SqlValue::as_str)
            .unwrap_or_default();

        // Optional filters arrive in clause order after the identifier.
        let mut extra = params.iter().skip(1);
        let name = sql.contains("AND name = ?").then(|| extra.next()).flatten();
        let db_type = sql
            .contains("AND db_type = ?")
            .then(|| extra.next())
            .flatten();
        let object_type = sql
            .contains("AND object_type = ?")
            .then(|| extra.next())
            .flatten();

        Ok(self
            .rows
            .iter()
            .filter(|row| row.stable_id == stable_id)
            .filter(|row| name.and_then(SqlValue::as_str).is_none_or(|n| row.name == n))
            .filter(|row| {
                db_type
                    .and_then(SqlValue::as_str)
                    .is_none_or(|t| row.db_type == t)
            })
            .filter(|row| {
                object_type
                    .and_then(SqlValue::as_str)
                    .is_none_or(|t| row.object_type == t)
            })
            .map(|row| {
                vec![
                    SqlValue::Text(row.name.clone()),
                    SqlValue::Text(row.object_type.clone()),
                    SqlValue::Text(row.db_type.clone()),
                ]
            })
            .collect())
    }

    fn locator(&self) -> ConnectionLocator {
        self.locator.clone()
    }
}

/// Runner answering feature-table probes from scripted rows keyed by
/// (database, table, stable id).
pub struct ScanRunner {
    locator: ConnectionLocator,
    rows: HashMap<(String, String, String), SqlValue>,
    pub log: Mutex<Vec<String>>,
}

impl ScanRunner {
    pub fn new(host: &str) -> Self {
        let params = ConnectionParams::server(host, 3306, "ensro");
        Self {
            locator: params.locator(),
            rows: HashMap::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Script a hit: probing `table` in `dbname` for `stable_id` answers
    /// `value`
    pub fn with_row(mut self, dbname: &str, table: &str, stable_id: &str, value: SqlValue) -> Self {
        self.rows.insert(
            (dbname.to_string(), table.to_string(), stable_id.to_string()),
            value,
        );
        self
    }

    pub fn query_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

#[async_trait]
impl QueryRunner for ScanRunner {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        self.log.lock().unwrap().push(sql.to_string());

        let target = sql
            .split(" FROM ")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|qualified| qualified.split_once('.'))
            .map(|(db, table)| (db.to_string(), table.to_string()))
            .ok_or_else(|| RegistryError::backend(format!("unqualified probe: {sql}")))?;
        let stable_id = params
            .first()
            .and_then(SqlValue::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(self
            .rows
            .get(&(target.0, target.1, stable_id))
            .map(|value| vec![vec![value.clone()]])
            .unwrap_or_default())
    }

    fn locator(&self) -> ConnectionLocator {
        self.locator.clone()
    }
}

/// Register an adaptor built over an explicit runner
pub fn adaptor_over(
    species: &str,
    group: Group,
    dbname: &str,
    runner: Arc<dyn QueryRunner>,
    multispecies: bool,
    species_id: u32,
) -> DbAdaptor {
    let mut params = ConnectionParams::server("db.test", 3306, "ensro");
    params.dbname = dbname.to_string();
    let mut spec = AdaptorSpec::new(species, group, params);
    spec.multispecies_db = multispecies;
    spec.species_id = species_id;
    DbAdaptor::new(&spec, runner)
}

/// A lookup database adaptor over scripted rows
pub fn lookup_adaptor(rows: Vec<LookupRow>) -> DbAdaptor {
    let mut params = ConnectionParams::server("lookup.test", 3306, "ensro");
    params.dbname = "ensembl_stable_ids_65".to_string();
    let runner = Arc::new(LookupRunner {
        locator: params.locator(),
        rows,
    });
    let spec = AdaptorSpec::new("multi", Group::StableIds, params);
    DbAdaptor::new(&spec, runner)
}
