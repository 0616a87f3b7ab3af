//! Enumeration load statistics

use std::time::Duration;

/// Statistics about one database enumeration load.
#[derive(Debug, Clone)]
pub struct LoadStats {
    /// Release version the load targeted
    pub version: u32,

    /// Candidate databases returned by the server
    pub databases_seen: usize,

    /// Databases classified into a group and consumed
    pub databases_registered: usize,

    /// Adaptors registered (collections register one per member species)
    pub adaptors_registered: usize,

    /// Aliases harvested from meta tables
    pub aliases_registered: usize,

    /// Groups skipped because their adaptor module was unavailable
    pub groups_skipped: Vec<String>,

    /// Databases matching no group pattern, dropped at end of pass
    pub unclassified: Vec<String>,

    /// Time taken for the whole load
    pub load_duration: Duration,

    /// Per-database problems that did not abort the load
    pub errors: Vec<String>,
}

impl LoadStats {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            databases_seen: 0,
            databases_registered: 0,
            adaptors_registered: 0,
            aliases_registered: 0,
            groups_skipped: Vec::new(),
            unclassified: Vec::new(),
            load_duration: Duration::ZERO,
            errors: Vec::new(),
        }
    }

    /// Whether any non-fatal problems were recorded
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One-line account of the load
    pub fn summary(&self) -> String {
        format!(
            "release {}: {} databases seen, {} consumed, {} adaptors and {} aliases registered in {:.2}s",
            self.version,
            self.databases_seen,
            self.databases_registered,
            self.adaptors_registered,
            self.aliases_registered,
            self.load_duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_and_errors() {
        let mut stats = LoadStats::new(65);
        assert!(!stats.has_errors());
        stats.errors.push("boom".to_string());
        assert!(stats.has_errors());
        assert!(stats.summary().contains("release 65"));
    }
}
