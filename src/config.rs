//! Harvest configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ExportError, HarvestResult};

/// Default cap on records classified per page.
pub const DEFAULT_PER_PAGE_LIMIT: usize = 100;

/// Default cap on records accumulated across pages.
pub const DEFAULT_MAX_CANDIDATES: usize = 9000;

/// Tunables for one harvest run.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Maximum accepted records kept per page, applied before sanitation.
    pub per_page_limit: usize,
    /// Accumulation stops taking pages once this many records are held.
    pub max_candidates: usize,
    /// Threads used to classify and sanitize pages.
    pub workers: usize,
    /// Skip blocks whose fingerprint was already seen on the same page.
    pub dedupe_blocks: bool,
    /// Optional vocabulary file replacing the built-in tables.
    pub vocabulary_path: Option<PathBuf>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            per_page_limit: DEFAULT_PER_PAGE_LIMIT,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            workers: 1,
            dedupe_blocks: true,
            vocabulary_path: None,
        }
    }
}

impl HarvestConfig {
    /// Loads a config from a JSON file and validates it.
    pub fn from_file(path: impl AsRef<Path>) -> HarvestResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| ExportError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the per-page limit.
    #[must_use]
    pub fn with_per_page_limit(mut self, limit: usize) -> Self {
        self.per_page_limit = limit;
        self
    }

    /// Sets the accumulation cap.
    #[must_use]
    pub fn with_max_candidates(mut self, cap: usize) -> Self {
        self.max_candidates = cap;
        self
    }

    /// Sets the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enables or disables per-page block deduplication.
    #[must_use]
    pub fn with_dedupe_blocks(mut self, dedupe: bool) -> Self {
        self.dedupe_blocks = dedupe;
        self
    }

    /// Sets the vocabulary file.
    #[must_use]
    pub fn with_vocabulary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vocabulary_path = Some(path.into());
        self
    }

    /// Rejects zero limits and a zero worker count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("per_page_limit", self.per_page_limit),
            ("max_candidates", self.max_candidates),
            ("workers", self.workers),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarvestConfig::default();
        assert_eq!(config.per_page_limit, 100);
        assert_eq!(config.max_candidates, 9000);
        assert_eq!(config.workers, 1);
        assert!(config.dedupe_blocks);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HarvestConfig = serde_json::from_str(r#"{"workers": 4}"#).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.per_page_limit, DEFAULT_PER_PAGE_LIMIT);
        assert!(config.vocabulary_path.is_none());
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = HarvestConfig::default().with_workers(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "workers", .. }));

        let err = HarvestConfig::default()
            .with_max_candidates(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("max_candidates"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.json");
        std::fs::write(&path, r#"{"per_page_limit": 20, "dedupe_blocks": false}"#).unwrap();

        let config = HarvestConfig::from_file(&path).unwrap();
        assert_eq!(config.per_page_limit, 20);
        assert!(!config.dedupe_blocks);
    }

    #[test]
    fn test_from_file_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.json");
        std::fs::write(&path, r#"{"per_page_limit": 0}"#).unwrap();

        let err = HarvestConfig::from_file(&path).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = HarvestConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_export());
    }
}
