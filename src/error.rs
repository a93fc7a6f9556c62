//! Error types for candidate-harvest.
//!
//! The extraction core (classifier, sanitizer, resolver) never fails: missing
//! signal degrades to rejection or a low-information record. Errors only come
//! from the edges: vocabulary compilation, configuration, and file I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating or compiling a vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Vocabulary version {version} is not supported (expected {supported})")]
    UnsupportedVersion {
        version: u32,
        supported: u32,
    },

    #[error("Vocabulary table '{table}' cannot be empty")]
    EmptyTable {
        table: &'static str,
    },

    #[error("Vocabulary table '{table}' contains a blank entry at index {index}")]
    BlankEntry {
        table: &'static str,
        index: usize,
    },

    #[error("Invalid pattern for table '{table}': {reason}")]
    InvalidPattern {
        table: &'static str,
        reason: String,
    },
}

/// Errors raised while validating a harvest configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

/// Errors raised while reading blocks or writing candidates.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Top-level error type for candidate-harvest.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl HarvestError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a vocabulary error.
    #[must_use]
    pub const fn is_vocabulary(&self) -> bool {
        matches!(self, Self::Vocabulary(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this is an export error.
    #[must_use]
    pub const fn is_export(&self) -> bool {
        matches!(self, Self::Export(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for candidate-harvest operations.
pub type HarvestResult<T> = Result<T, HarvestError>;
