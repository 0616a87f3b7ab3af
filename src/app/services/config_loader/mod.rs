//! Declarative configuration loading
//!
//! Reads an INI or JSON document into the normalized structure accepted by
//! the struct loader, and resolves which file to read when the caller does
//! not say: explicit argument, then the `ENSEMBL_REGISTRY` environment
//! variable, then `$HOME/.ensembl_init`.

pub mod ini;

#[cfg(test)]
pub mod tests;

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::app::adapters::query_runner::Connector;
use crate::app::services::registry_store::Registry;
use crate::app::services::struct_loader::StructLoader;
use crate::constants::{DEFAULT_CONFIG_BASENAME, REGISTRY_ENV_VAR};
use crate::{RegistryError, Result};

pub use ini::parse_ini;

/// Structured configuration formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Ini,
    Json,
}

/// Decode JSON text into the normalized document.
///
/// The document must be an object carrying `adaptors`, `aliases`, or both;
/// a bare `{}` configures nothing and is rejected as bad input.
pub fn parse_json(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;
    let object = value
        .as_object()
        .ok_or_else(|| RegistryError::type_mismatch("configuration document must be a map"))?;
    if !object.contains_key("adaptors") && !object.contains_key("aliases") {
        return Err(RegistryError::bad_input(
            "configuration document has neither adaptors nor aliases",
        ));
    }
    Ok(value)
}

/// Loads configuration files into a registry through the struct loader.
pub struct ConfigLoader {
    struct_loader: StructLoader,
}

impl ConfigLoader {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            struct_loader: StructLoader::new(connector),
        }
    }

    /// Use a pre-configured struct loader (e.g. with `no_cache` forced)
    pub fn with_struct_loader(struct_loader: StructLoader) -> Self {
        Self { struct_loader }
    }

    /// Decode `text` in the given format and load it
    pub async fn load_str(
        &self,
        registry: &Registry,
        text: &str,
        format: ConfigFormat,
    ) -> Result<()> {
        let document = match format {
            ConfigFormat::Ini => parse_ini(text)?,
            ConfigFormat::Json => parse_json(text)?,
        };
        self.struct_loader.load(registry, &document).await
    }

    /// Load one configuration file, dispatching on its extension
    pub async fn load_file(&self, registry: &Registry, path: &Path) -> Result<()> {
        let format = format_for_path(path)?;
        let text = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::io(format!("reading {}", path.display()), e))?;
        info!(path = %path.display(), ?format, "loading registry configuration");
        self.load_str(registry, &text, format).await
    }

    /// Load the discovered configuration file (argument, environment
    /// variable, then home directory)
    pub async fn load_default(&self, registry: &Registry, explicit: Option<PathBuf>) -> Result<()> {
        let path = resolve_config_path(explicit)?;
        self.load_file(registry, &path).await
    }
}

/// Resolve which configuration file to load.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Ok(path) = std::env::var(REGISTRY_ENV_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        let candidate = Path::new(&home).join(DEFAULT_CONFIG_BASENAME);
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(RegistryError::bad_input(
        "no configuration file given, none in ENSEMBL_REGISTRY, none in the home directory",
    ))
}

/// Decide the format of a configuration file from its extension.
///
/// Anything that is not `.ini` or `.json` would be a scripted
/// configuration, which this loader does not execute.
pub fn format_for_path(path: &Path) -> Result<ConfigFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ini") => Ok(ConfigFormat::Ini),
        Some("json") => Ok(ConfigFormat::Json),
        _ => Err(RegistryError::bad_input(format!(
            "unsupported configuration file '{}': only .ini and .json are structured formats",
            path.display()
        ))),
    }
}
