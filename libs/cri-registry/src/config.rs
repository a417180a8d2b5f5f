//! Declarative registry-access configuration.
//!
//! These types mirror the machine config `registries` section. Binary TLS
//! material is carried as base64 strings when serialized.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Input contract for the generator.
///
/// Implemented by [`RegistryAccessConfig`]; anything else that can expose the
/// two maps (a test double, a view into a larger machine config) works too.
pub trait Registries {
    /// Mirror endpoints keyed by registry host.
    fn mirrors(&self) -> &HashMap<String, MirrorSpec>;

    /// Auth and TLS settings keyed by registry host.
    fn config(&self) -> &HashMap<String, HostConfig>;
}

/// Registry access configuration as loaded from a machine config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryAccessConfig {
    /// Mirror endpoints per registry host.
    #[serde(default)]
    pub mirrors: HashMap<String, MirrorSpec>,

    /// Per-host auth and TLS settings.
    #[serde(default)]
    pub config: HashMap<String, HostConfig>,
}

impl Registries for RegistryAccessConfig {
    fn mirrors(&self) -> &HashMap<String, MirrorSpec> {
        &self.mirrors
    }

    fn config(&self) -> &HashMap<String, HostConfig> {
        &self.config
    }
}

impl RegistryAccessConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mirror for a registry host.
    pub fn with_mirror(mut self, host: impl Into<String>, mirror: MirrorSpec) -> Self {
        self.mirrors.insert(host.into(), mirror);
        self
    }

    /// Add per-host settings for a registry host.
    pub fn with_host(mut self, host: impl Into<String>, config: HostConfig) -> Self {
        self.config.insert(host.into(), config);
        self
    }
}

/// Mirror endpoints for one registry, in preference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorSpec {
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl MirrorSpec {
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
        }
    }
}

/// Auth and TLS settings for one registry host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsSpec>,
}

impl HostConfig {
    /// Set the auth settings.
    pub fn with_auth(mut self, auth: AuthSpec) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the TLS settings.
    pub fn with_tls(mut self, tls: TlsSpec) -> Self {
        self.tls = Some(tls);
        self
    }
}

/// Registry credentials. Any subset may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Pre-encoded auth token (base64 `user:password`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<String>,
}

impl AuthSpec {
    /// Non-empty fields as `(runtime key, value)` pairs, in runtime order.
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("username", &self.username),
            ("password", &self.password),
            ("auth", &self.auth),
            ("identitytoken", &self.identity_token),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((key, v)),
            _ => None,
        })
        .collect()
    }
}

/// TLS settings for a registry host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsSpec {
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// PEM-encoded CA bundle.
    #[serde(
        default,
        with = "base64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub ca: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_identity: Option<ClientIdentity>,
}

impl TlsSpec {
    /// CA bytes, if set and non-empty.
    pub fn ca_bytes(&self) -> Option<&[u8]> {
        self.ca.as_deref().filter(|ca| !ca.is_empty())
    }
}

/// PEM-encoded client certificate and key for mutual TLS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    #[serde(with = "base64_bytes")]
    pub crt: Vec<u8>,

    #[serde(default, with = "base64_bytes")]
    pub key: Vec<u8>,
}

impl ClientIdentity {
    pub fn new(crt: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            crt: crt.into(),
            key: key.into(),
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}

mod base64_opt {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let Some(encoded) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        STANDARD
            .decode(encoded.trim())
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
