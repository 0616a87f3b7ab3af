//! Shared fixtures for configuration loader tests

use async_trait::async_trait;
use std::sync::Arc;

use crate::app::adapters::query_runner::{Connector, QueryRunner};
use crate::app::models::ConnectionParams;
use crate::app::services::config_loader::ConfigLoader;
use crate::app::services::registry_store::tests::StubRunner;
use crate::Result;

pub mod discovery_tests;
pub mod json_tests;

pub struct StubConnector;

#[async_trait]
impl Connector for StubConnector {
    async fn connect(&self, params: &ConnectionParams) -> Result<Arc<dyn QueryRunner>> {
        Ok(Arc::new(StubRunner::new(params.locator())))
    }
}

pub fn loader() -> ConfigLoader {
    ConfigLoader::new(Arc::new(StubConnector))
}
