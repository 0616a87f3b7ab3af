//! Shared fixtures for registry store tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::adapters::query_runner::{QueryRunner, Row, SqlValue};
use crate::app::models::{AdaptorSpec, ConnectionLocator, ConnectionParams, DbAdaptor, Group};
use crate::{RegistryError, Result};


/// Runner for store-level tests: carries a locator, accepts no SQL, and
/// remembers whether it was disconnected.
pub struct StubRunner {
    locator: ConnectionLocator,
    pub disconnected: AtomicBool,
}

impl StubRunner {
    pub fn new(locator: ConnectionLocator) -> Self {
        Self {
            locator,
            disconnected: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl QueryRunner for StubRunner {
    async fn query(&self, sql: &str, _params: &[SqlValue]) -> Result<Vec<Row>> {
        Err(RegistryError::backend(format!(
            "no SQL expected in store tests, got: {sql}"
        )))
    }

    fn locator(&self) -> ConnectionLocator {
        self.locator.clone()
    }

    fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

/// Build an adaptor on a fixed test server
pub fn test_adaptor(species: &str, group: Group, dbname: &str) -> DbAdaptor {
    test_adaptor_on(species, group, "db.test", dbname)
}

/// Build an adaptor on an explicit host
pub fn test_adaptor_on(species: &str, group: Group, host: &str, dbname: &str) -> DbAdaptor {
    let mut params = ConnectionParams::server(host, 3306, "ensro");
    params.dbname = dbname.to_string();
    let spec = AdaptorSpec::new(species, group, params.clone());
    DbAdaptor::new(&spec, Arc::new(StubRunner::new(params.locator())))
}
