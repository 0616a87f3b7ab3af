//! Genome Database Registry
//!
//! A registry for a large, versioned collection of genome databases. Given
//! a species name (or any of its synonyms) and a group such as `core` or
//! `variation`, the registry answers with a handle to the backing
//! database; given an opaque stable identifier, it finds the species,
//! object type, and group that own it.
//!
//! This library provides tools for:
//! - Indexing database adaptors and species aliases with lookup and merge
//!   operations
//! - Deriving a full registry from one server connection by classifying
//!   database names and reading meta tables
//! - Loading declarative INI or JSON configurations
//! - Folding several server loads together, first-seen wins
//! - Locating stable identifiers through a dedicated lookup database or a
//!   linear scan

pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod adapters {
        pub mod factory;
        pub mod query_runner;
    }
    pub mod services {
        pub mod config_loader;
        pub mod database_loader;
        pub mod group_catalog;
        pub mod multi_server;
        pub mod name_classifier;
        pub mod registry_store;
        pub mod stable_id;
        pub mod struct_loader;
    }
}

// Re-export commonly used types
pub use app::adapters::factory::{AdaptorFactory, FactoryRegistry, GenericAdaptorFactory};
pub use app::adapters::query_runner::{Connector, QueryRunner, Row, SqlValue};
pub use app::models::{
    AdaptorSpec, ConnectionLocator, ConnectionParams, DbAdaptor, Group, TypedAdaptor,
};
pub use app::services::config_loader::{ConfigFormat, ConfigLoader};
pub use app::services::database_loader::{DatabaseLoader, LoadOptions, LoadStats};
pub use app::services::multi_server::MultiServerMerger;
pub use app::services::registry_store::Registry;
pub use app::services::stable_id::{LocateRequest, Location, StableIdLocator};
pub use app::services::struct_loader::{serialise_registry, StructLoader};
pub use error::{RegistryError, Result};
