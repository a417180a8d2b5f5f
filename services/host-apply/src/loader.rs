//! Loading the declarative registries file.
//!
//! The file carries the `mirrors` and `config` maps of the machine config's
//! registries section, as JSON or TOML. Certificates and keys are base64.

use std::fs;
use std::path::Path;

use hostcfg_cri_registry::RegistryAccessConfig;
use tracing::debug;

use crate::error::ApplyError;

/// Serialization of the registries file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Guess the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Read and parse a registries file.
pub fn load_from_path(path: &Path) -> Result<RegistryAccessConfig, ApplyError> {
    let contents = fs::read_to_string(path).map_err(|source| ApplyError::ConfigRead {
        path: path.display().to_string(),
        source,
    })?;

    let config = parse_str(&contents, ConfigFormat::from_path(path))?;
    debug!(
        path = %path.display(),
        mirrors = config.mirrors.len(),
        hosts = config.config.len(),
        "registries file loaded"
    );
    Ok(config)
}

/// Parse registries from a string.
///
/// Without a known format, JSON is tried first and then TOML.
pub fn parse_str(
    contents: &str,
    format: Option<ConfigFormat>,
) -> Result<RegistryAccessConfig, ApplyError> {
    match format {
        Some(ConfigFormat::Json) => parse_json(contents),
        Some(ConfigFormat::Toml) => parse_toml(contents),
        None => parse_json(contents).or_else(|json_err| {
            parse_toml(contents).map_err(|toml_err| {
                ApplyError::ConfigParse(format!(
                    "not valid JSON ({}) or TOML ({})",
                    strip_reason(&json_err),
                    strip_reason(&toml_err)
                ))
            })
        }),
    }
}

fn parse_json(contents: &str) -> Result<RegistryAccessConfig, ApplyError> {
    serde_json::from_str(contents).map_err(|e| ApplyError::ConfigParse(format!("json: {}", e)))
}

fn parse_toml(contents: &str) -> Result<RegistryAccessConfig, ApplyError> {
    toml::from_str(contents).map_err(|e| ApplyError::ConfigParse(format!("toml: {}", e)))
}

fn strip_reason(err: &ApplyError) -> String {
    match err {
        ApplyError::ConfigParse(detail) => detail.clone(),
        other => other.to_string(),
    }
}
