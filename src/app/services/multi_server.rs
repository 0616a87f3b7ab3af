//! Loading several servers into one registry
//!
//! Each server is enumerated into its own temporary store, concurrently,
//! and the results are folded into the main registry in declaration order.
//! Whatever an earlier server registered wins.

use std::sync::Arc;
use tracing::{info, warn};

use crate::app::services::database_loader::{DatabaseLoader, LoadOptions, LoadStats};
use crate::app::services::registry_store::Registry;
use crate::Result;

/// Runs one enumeration load per server configuration and merges the
/// results, first-seen wins.
pub struct MultiServerMerger {
    loader: DatabaseLoader,
    verbose: bool,
}

impl MultiServerMerger {
    pub fn new(loader: DatabaseLoader) -> Self {
        Self {
            loader,
            verbose: false,
        }
    }

    /// Log duplicate adaptors and aliases dropped during merging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enumerate every server concurrently, then merge into `registry` in
    /// the order the configurations were given.
    pub async fn load_and_merge(
        &self,
        registry: &Registry,
        sources: &[LoadOptions],
    ) -> Result<Vec<LoadStats>> {
        let mut handles = Vec::with_capacity(sources.len());
        for options in sources {
            let loader = self.loader.clone();
            let options = options.clone();
            let factories = Arc::clone(registry.factories());
            handles.push(tokio::spawn(async move {
                let temporary = Registry::with_factories(factories);
                let stats = loader.load(&temporary, &options).await?;
                Ok::<_, crate::RegistryError>((temporary, stats))
            }));
        }

        let mut collected = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok((temporary, stats))) => collected.push((temporary, stats)),
                Ok(Err(e)) => {
                    warn!(server = %sources[index].host, "server load failed: {e}");
                    return Err(e);
                }
                Err(e) => {
                    warn!(server = %sources[index].host, "server load panicked: {e}");
                    return Err(crate::RegistryError::backend(e.to_string()));
                }
            }
        }

        let mut all_stats = Vec::with_capacity(collected.len());
        for (temporary, stats) in collected {
            registry.merge(&temporary, self.verbose);
            all_stats.push(stats);
        }
        info!(
            servers = sources.len(),
            adaptors = registry.adaptor_count(),
            "merged server loads"
        );
        Ok(all_stats)
    }
}
