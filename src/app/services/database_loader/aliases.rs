//! Species name and alias harvesting from meta tables

use std::collections::HashMap;
use tracing::debug;

use crate::app::adapters::query_runner::{QueryRunner, SqlValue};
use crate::app::services::registry_store::Registry;
use crate::constants::meta_keys;
use crate::Result;

/// One consumed database, remembered for alias harvesting after its group
/// finishes.
pub(crate) struct HarvestSource {
    pub dbname: String,
    pub multispecies: bool,
    /// (species_id, registered species) pairs, suffix already applied
    pub species: Vec<(u32, String)>,
}

/// Species members of a collection database: (species_id, production name)
pub(crate) async fn fetch_production_names(
    runner: &dyn QueryRunner,
    dbname: &str,
) -> Result<Vec<(u32, String)>> {
    let sql = format!(
        "SELECT species_id, meta_value FROM {dbname}.meta WHERE meta_key = '{}'",
        meta_keys::PRODUCTION_NAME
    );
    let rows = runner.query(&sql, &[]).await?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let species_id = row.first()?.as_i64()? as u32;
            let name = row.get(1)?.as_str()?.to_string();
            Some((species_id, name))
        })
        .collect())
}

/// Alias values from one database's meta table, optionally scoped to one
/// species of a collection.
pub(crate) async fn fetch_aliases(
    runner: &dyn QueryRunner,
    dbname: &str,
    species_id: Option<u32>,
) -> Result<Vec<String>> {
    let mut sql = format!(
        "SELECT meta_value FROM {dbname}.meta WHERE meta_key = '{}'",
        meta_keys::SPECIES_ALIAS
    );
    let mut params = Vec::new();
    if let Some(species_id) = species_id {
        sql.push_str(" AND species_id = ?");
        params.push(SqlValue::Int(i64::from(species_id)));
    }
    let rows = runner.query(&sql, &params).await?;
    Ok(rows
        .iter()
        .filter_map(|row| row.first()?.as_str().map(str::to_string))
        .collect())
}

/// Aliases of every member of a collection in one pass, grouped by
/// production name.
async fn fetch_collection_aliases(
    runner: &dyn QueryRunner,
    dbname: &str,
) -> Result<HashMap<String, Vec<String>>> {
    let sql = format!(
        "SELECT p.meta_value, a.meta_value FROM {dbname}.meta p \
         JOIN {dbname}.meta a ON p.species_id = a.species_id \
         WHERE p.meta_key = '{}' AND a.meta_key = '{}'",
        meta_keys::PRODUCTION_NAME,
        meta_keys::SPECIES_ALIAS
    );
    let rows = runner.query(&sql, &[]).await?;
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let (Some(name), Some(alias)) = (
            row.first().and_then(SqlValue::as_str),
            row.get(1).and_then(SqlValue::as_str),
        ) else {
            continue;
        };
        grouped.entry(name.to_string()).or_default().push(alias.to_string());
    }
    Ok(grouped)
}

/// Harvest and register the aliases of one consumed database.
///
/// Returns how many aliases were added. Collections use one batch query
/// joining the meta table to itself; single-species databases read their
/// alias rows whole.
pub(crate) async fn harvest_aliases(
    runner: &dyn QueryRunner,
    registry: &Registry,
    source: &HarvestSource,
    suffix: &str,
) -> Result<usize> {
    let mut added = 0;

    if source.multispecies {
        let grouped = fetch_collection_aliases(runner, &source.dbname).await?;
        for (production_name, aliases) in grouped {
            let species = format!("{production_name}{suffix}");
            for alias in aliases {
                registry.add_alias(&species, &format!("{alias}{suffix}"));
                added += 1;
            }
        }
    } else {
        for (_, species) in &source.species {
            for alias in fetch_aliases(runner, &source.dbname, None).await? {
                registry.add_alias(species, &format!("{alias}{suffix}"));
                added += 1;
            }
        }
    }

    debug!(dbname = %source.dbname, added, "harvested aliases");
    Ok(added)
}
