//! Stable-identifier location
//!
//! Resolves an opaque stable identifier to the species, object type, and
//! group owning it. A dedicated lookup database answers in one statement
//! when registered; otherwise candidate adaptors are scanned in
//! registration order, probing the applicable object types.

pub mod sql;

#[cfg(test)]
pub mod tests;

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::app::adapters::query_runner::SqlValue;
use crate::app::models::{ConnectionLocator, DbAdaptor, Group};
use crate::app::services::registry_store::Registry;
use crate::constants::MULTI_SPECIES;
use crate::{RegistryError, Result};

/// Typed adaptor slot marking a usable lookup database
pub const LOOKUP_ADAPTOR_TYPE: &str = "StableIdsLookup";

/// One location request.
#[derive(Debug, Clone, Default)]
pub struct LocateRequest {
    pub stable_id: String,
    /// Restrict the search to one species
    pub species: Option<String>,
    /// Probe only this object type
    pub object_type: Option<String>,
    /// Search this group's adaptors instead of core
    pub group: Option<Group>,
    /// Skip the indexed fast path even when a lookup database exists
    pub force_long_lookup: bool,
}

impl LocateRequest {
    pub fn new(stable_id: impl Into<String>) -> Self {
        Self {
            stable_id: stable_id.into(),
            ..Self::default()
        }
    }
}

/// Where a stable identifier lives.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Location {
    pub species: String,
    pub object_type: String,
    pub group: String,
}

/// Resolves stable identifiers against a populated registry.
#[derive(Default)]
pub struct StableIdLocator;

impl StableIdLocator {
    pub fn new() -> Self {
        Self
    }

    /// Find the owner of a stable identifier, or `None` when nothing
    /// matches anywhere.
    pub async fn locate(
        &self,
        registry: &Registry,
        request: &LocateRequest,
    ) -> Result<Option<Location>> {
        if request.stable_id.is_empty() {
            return Err(RegistryError::bad_input("no stable identifier given"));
        }

        if !request.force_long_lookup {
            if registry
                .get_db_adaptor(MULTI_SPECIES, Group::StableIds)
                .is_some()
            {
                if let Some(lookup) =
                    registry.get_adaptor_or_none(MULTI_SPECIES, Group::StableIds, LOOKUP_ADAPTOR_TYPE)
                {
                    return indexed_lookup(lookup.db_adaptor(), request).await;
                }
            }
        }

        let group = request.group.unwrap_or(Group::Core);
        let candidates = registry.get_all_db_adaptors(request.species.as_deref(), Some(group));
        scan_candidates(&candidates, request, group).await
    }
}

/// One statement against the dedicated lookup database. Terminal: a miss
/// here is a miss overall.
async fn indexed_lookup(
    dba: &Arc<DbAdaptor>,
    request: &LocateRequest,
) -> Result<Option<Location>> {
    let mut statement = sql::LOOKUP_SQL.replace("%s", dba.dbname());
    let mut params = vec![SqlValue::Text(request.stable_id.clone())];
    if let Some(species) = &request.species {
        statement.push_str(" AND name = ?");
        params.push(SqlValue::Text(species.clone()));
    }
    if let Some(group) = request.group {
        statement.push_str(" AND db_type = ?");
        params.push(SqlValue::Text(group.as_str().to_string()));
    }
    if let Some(object_type) = &request.object_type {
        statement.push_str(" AND object_type = ?");
        params.push(SqlValue::Text(object_type.clone()));
    }

    let rows = dba.runner().query(&statement, &params).await?;
    Ok(rows.first().and_then(|row| {
        Some(Location {
            species: row.first()?.as_str()?.to_string(),
            object_type: row.get(1)?.as_str()?.to_string(),
            group: row.get(2)?.as_str()?.to_string(),
        })
    }))
}

/// Visit each candidate adaptor, probing the applicable object types in
/// order. Collection databases are probed once per connection no matter
/// how many member species are registered from them.
async fn scan_candidates(
    candidates: &[Arc<DbAdaptor>],
    request: &LocateRequest,
    group: Group,
) -> Result<Option<Location>> {
    let object_types: Vec<String> = match (&request.object_type, group) {
        (Some(object_type), _) => vec![object_type.clone()],
        (None, Group::Compara) => vec![sql::COMPARA_DEFAULT_TYPE.to_string()],
        (None, _) => sql::DEFAULT_OBJECT_TYPES
            .iter()
            .map(|t| t.to_string())
            .collect(),
    };

    let mut visited: HashSet<ConnectionLocator> = HashSet::new();
    for dba in candidates {
        if dba.is_multispecies && !visited.insert(dba.locator()) {
            debug!(dbname = dba.dbname(), "collection already scanned");
            continue;
        }

        for object_type in &object_types {
            let Some(template) = sql::template_for(object_type) else {
                continue;
            };
            let statement = template.replace("%s", dba.dbname());
            let rows = dba
                .runner()
                .query(&statement, &[SqlValue::Text(request.stable_id.clone())])
                .await?;
            let Some(value) = rows.first().and_then(|row| row.first()) else {
                continue;
            };

            // A bare numeric hit carries no name; the adaptor's own species
            // is the answer.
            let species = if value.is_numeric() {
                dba.species.clone()
            } else {
                match value.as_str() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => continue,
                }
            };
            return Ok(Some(Location {
                species,
                object_type: object_type.clone(),
                group: dba.group.as_str().to_string(),
            }));
        }
    }
    Ok(None)
}
