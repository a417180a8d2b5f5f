//! Well-known locations and path derivation for extracted registry material.

use crate::error::{RegistryConfigError, Result};

/// Directory holding per-registry CA certificates.
pub const DEFAULT_CA_ROOT: &str = "/etc/cri/ca";

/// Directory holding per-registry client certificates and keys.
pub const DEFAULT_CLIENT_ROOT: &str = "/etc/cri/client";

/// Shared runtime configuration file the fragment is appended to.
pub const DEFAULT_RUNTIME_CONFIG: &str = "/var/cri/conf.d/cri.toml";

/// Roots used when deriving artifact paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPaths {
    /// Root for `<host>.crt` CA files.
    pub ca_root: String,

    /// Root for `<host>.crt` / `<host>.key` client identity files.
    pub client_root: String,

    /// Destination of the appended configuration fragment.
    pub runtime_config: String,
}

impl Default for RegistryPaths {
    fn default() -> Self {
        Self {
            ca_root: DEFAULT_CA_ROOT.to_string(),
            client_root: DEFAULT_CLIENT_ROOT.to_string(),
            runtime_config: DEFAULT_RUNTIME_CONFIG.to_string(),
        }
    }
}

impl RegistryPaths {
    /// Create a set of paths with custom roots.
    pub fn new(
        ca_root: impl Into<String>,
        client_root: impl Into<String>,
        runtime_config: impl Into<String>,
    ) -> Self {
        Self {
            ca_root: ca_root.into(),
            client_root: client_root.into(),
            runtime_config: runtime_config.into(),
        }
    }

    /// Path of the CA certificate extracted for `host`.
    pub fn ca_file(&self, host: &str) -> String {
        join(&self.ca_root, host, "crt")
    }

    /// Path of the client certificate extracted for `host`.
    pub fn client_cert_file(&self, host: &str) -> String {
        join(&self.client_root, host, "crt")
    }

    /// Path of the client key extracted for `host`.
    pub fn client_key_file(&self, host: &str) -> String {
        join(&self.client_root, host, "key")
    }
}

fn join(root: &str, host: &str, extension: &str) -> String {
    format!("{}/{}.{}", root.trim_end_matches('/'), host, extension)
}

/// Check that a host identifier can be used verbatim as a file name stem.
///
/// The identifier is otherwise taken as-is: `some.host:123` is accepted and
/// lands in paths unchanged.
pub(crate) fn validate_host(host: &str) -> Result<()> {
    if host.is_empty() {
        return Err(RegistryConfigError::invalid_host(
            host,
            "host cannot be empty",
        ));
    }

    if host == "." || host == ".." {
        return Err(RegistryConfigError::invalid_host(
            host,
            "host cannot be a relative path component",
        ));
    }

    if let Some(c) = host.chars().find(|c| *c == '/' || *c == '\0') {
        return Err(RegistryConfigError::invalid_host(
            host,
            format!("invalid character {:?} in host", c),
        ));
    }

    Ok(())
}
