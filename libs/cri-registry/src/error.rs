//! Error types for registry config generation.

use thiserror::Error;

/// Errors raised while generating registry artifacts.
///
/// Missing optional material (no CA, no client identity, no auth fields) is
/// never an error; only input that would produce a broken path or section
/// name is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryConfigError {
    /// The registry host identifier cannot be used in paths or section names.
    #[error("invalid registry host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },
}

impl RegistryConfigError {
    pub(crate) fn invalid_host(host: &str, reason: impl Into<String>) -> Self {
        Self::InvalidHost {
            host: host.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the offending host identifier.
    pub fn host(&self) -> &str {
        match self {
            Self::InvalidHost { host, .. } => host,
        }
    }
}

/// Result alias for generator operations.
pub type Result<T, E = RegistryConfigError> = std::result::Result<T, E>;
