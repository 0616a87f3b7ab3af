//! Shared fixtures for enumeration loader tests
//!
//! A scripted in-memory server answers the handful of statement shapes the
//! loader issues: SHOW DATABASES, production-name listing, and the two
//! alias queries.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::app::adapters::query_runner::{Connector, QueryRunner, Row, SqlValue};
use crate::app::models::{ConnectionLocator, ConnectionParams};
use crate::{RegistryError, Result};


/// Meta-table contents of one scripted database.
#[derive(Default, Clone)]
pub struct MetaTable {
    /// (species_id, production name) rows
    pub production_names: Vec<(u32, String)>,
    /// (species_id, alias) rows
    pub aliases: Vec<(u32, String)>,
}

/// Scripted server shared by every runner a [`MockConnector`] opens.
#[derive(Default)]
pub struct MockServer {
    pub databases: Vec<String>,
    pub meta: HashMap<String, MetaTable>,
}

impl MockServer {
    pub fn new(databases: &[&str]) -> Self {
        Self {
            databases: databases.iter().map(|s| s.to_string()).collect(),
            meta: HashMap::new(),
        }
    }

    pub fn with_meta(mut self, dbname: &str, meta: MetaTable) -> Self {
        self.meta.insert(dbname.to_string(), meta);
        self
    }
}

/// Connector handing out runners over one scripted server, counting how
/// often it was asked to connect.
pub struct MockConnector {
    server: Arc<MockServer>,
    pub connects: AtomicUsize,
    /// When set, `connect` fails with this backend message
    pub refuse: Option<String>,
}

impl MockConnector {
    pub fn new(server: MockServer) -> Arc<Self> {
        Arc::new(Self {
            server: Arc::new(server),
            connects: AtomicUsize::new(0),
            refuse: None,
        })
    }

    pub fn refusing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            server: Arc::new(MockServer::default()),
            connects: AtomicUsize::new(0),
            refuse: Some(message.to_string()),
        })
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, params: &ConnectionParams) -> Result<Arc<dyn QueryRunner>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.refuse {
            return Err(RegistryError::backend(message.clone()));
        }
        Ok(Arc::new(MockRunner {
            server: Arc::clone(&self.server),
            locator: params.locator(),
            log: Mutex::new(Vec::new()),
        }))
    }
}

/// Runner answering the loader's statement shapes from scripted data.
pub struct MockRunner {
    server: Arc<MockServer>,
    locator: ConnectionLocator,
    pub log: Mutex<Vec<String>>,
}

#[async_trait]
impl QueryRunner for MockRunner {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        self.log.lock().unwrap().push(sql.to_string());

        if let Some(pattern) = sql
            .strip_prefix("SHOW DATABASES LIKE '")
            .and_then(|rest| rest.strip_suffix('\''))
        {
            let regex = like_to_regex(pattern);
            return Ok(self
                .server
                .databases
                .iter()
                .filter(|name| regex.is_match(name))
                .map(|name| vec![SqlValue::Text(name.clone())])
                .collect());
        }

        if sql.contains(".meta p JOIN ") {
            let dbname = table_owner(sql, ".meta")?;
            let meta = self.server.meta.get(&dbname).cloned().unwrap_or_default();
            let mut rows = Vec::new();
            for (species_id, alias) in &meta.aliases {
                if let Some((_, name)) = meta
                    .production_names
                    .iter()
                    .find(|(id, _)| id == species_id)
                {
                    rows.push(vec![
                        SqlValue::Text(name.clone()),
                        SqlValue::Text(alias.clone()),
                    ]);
                }
            }
            return Ok(rows);
        }

        if sql.starts_with("SELECT species_id, meta_value FROM ") {
            let dbname = table_owner(sql, ".meta")?;
            let meta = self.server.meta.get(&dbname).cloned().unwrap_or_default();
            return Ok(meta
                .production_names
                .iter()
                .map(|(id, name)| {
                    vec![SqlValue::Int(i64::from(*id)), SqlValue::Text(name.clone())]
                })
                .collect());
        }

        if sql.starts_with("SELECT meta_value FROM ") && sql.contains("species.alias") {
            let dbname = table_owner(sql, ".meta")?;
            let meta = self.server.meta.get(&dbname).cloned().unwrap_or_default();
            let wanted = if sql.contains("species_id = ?") {
                params.first().and_then(SqlValue::as_i64)
            } else {
                None
            };
            return Ok(meta
                .aliases
                .iter()
                .filter(|(id, _)| wanted.is_none_or(|w| i64::from(*id) == w))
                .map(|(_, alias)| vec![SqlValue::Text(alias.clone())])
                .collect());
        }

        Err(RegistryError::backend(format!(
            "mock server does not understand: {sql}"
        )))
    }

    fn locator(&self) -> ConnectionLocator {
        self.locator.clone()
    }
}

/// Extract the database qualifying a table reference like `<db>.meta`
fn table_owner(sql: &str, suffix: &str) -> Result<String> {
    sql.split_whitespace()
        .find_map(|token| token.strip_suffix(suffix))
        .map(str::to_string)
        .ok_or_else(|| RegistryError::backend(format!("no table owner in: {sql}")))
}

/// Translate a SQL LIKE pattern into an anchored regex
fn like_to_regex(pattern: &str) -> Regex {
    let mut out = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push_str(&regex::escape(&next.to_string()));
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');
    Regex::new(&out).expect("translated LIKE pattern")
}

/// The three-database server of the canonical enumeration scenario
pub fn scenario_server() -> MockServer {
    // "mysql" matches neither SHOW DATABASES pattern and never becomes a
    // candidate; the backup database does but classifies into no group.
    MockServer::new(&[
        "homo_sapiens_core_65_37",
        "homo_sapiens_variation_65_37",
        "escherichia_shigella_collection_core_10_65_1",
        "homo_sapiens_core_65_37_backup",
        "mysql",
    ])
    .with_meta(
        "escherichia_shigella_collection_core_10_65_1",
        MetaTable {
            production_names: vec![
                (1, "escherichia_coli_1".to_string()),
                (2, "escherichia_coli_2".to_string()),
            ],
            aliases: vec![
                (1, "e_coli_one".to_string()),
                (2, "e_coli_two".to_string()),
            ],
        },
    )
    .with_meta(
        "homo_sapiens_core_65_37",
        MetaTable {
            production_names: vec![(1, "homo_sapiens".to_string())],
            aliases: vec![(1, "9606".to_string()), (1, "human".to_string())],
        },
    )
}
