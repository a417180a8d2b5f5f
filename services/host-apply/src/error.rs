//! Error types for the apply pipeline.

use colored::Colorize;
use hostcfg_cri_registry::RegistryConfigError;
use thiserror::Error;

/// Apply errors with standardized reason codes.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Could not read the registries file.
    #[error("config_read_failed: {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Could not parse the registries file.
    #[error("config_parse_failed: {0}")]
    ConfigParse(String),

    /// Generator rejected the configuration.
    #[error("generate_failed: {0}")]
    Generate(#[from] RegistryConfigError),

    /// Could not write an artifact.
    #[error("write_failed: {path}: {detail}")]
    WriteFailed { path: String, detail: String },
}

impl ApplyError {
    /// Get the standardized reason code for this error.
    pub fn reason_code(&self) -> &'static str {
        match self {
            ApplyError::ConfigRead { .. } => "config_read_failed",
            ApplyError::ConfigParse(_) => "config_parse_failed",
            ApplyError::Generate(_) => "generate_failed",
            ApplyError::WriteFailed { .. } => "write_failed",
        }
    }

    pub(crate) fn write_failed(path: &std::path::Path, detail: impl std::fmt::Display) -> Self {
        Self::WriteFailed {
            path: path.display().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Print an error and its cause chain to stderr.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }

    if let Some(ApplyError::Generate(RegistryConfigError::InvalidHost { .. })) =
        err.downcast_ref::<ApplyError>()
    {
        eprintln!(
            "\n{}",
            "Hint: registry host keys must be non-empty names like `docker.io` or `host:5000`."
                .yellow()
        );
    }
}
