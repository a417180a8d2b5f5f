//! Per-host credential extraction.
//!
//! For every configured registry host, TLS material is split out into files
//! under the CA and client roots, and a reference block is recorded that
//! points the runtime at exactly the files that were emitted.

use std::collections::{BTreeMap, HashMap};

use crate::artifact::FileArtifact;
use crate::config::HostConfig;
use crate::error::Result;
use crate::paths::{validate_host, RegistryPaths};

/// One `configs."<host>"` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock<'a> {
    pub host: &'a str,

    /// Non-empty auth fields; `None` when the host has no auth section.
    pub auth: Option<Vec<(&'static str, &'a str)>>,

    pub insecure_skip_verify: bool,
    pub ca_file: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
}

impl HostBlock<'_> {
    /// File references in runtime order, skipping ones not emitted.
    pub fn tls_files(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("ca_file", &self.ca_file),
            ("cert_file", &self.cert_file),
            ("key_file", &self.key_file),
        ]
        .into_iter()
        .filter_map(|(key, path)| path.as_deref().map(|p| (key, p)))
    }
}

/// Output of credential extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractedCredentials<'a> {
    /// `create` artifacts, in host order then ca, cert, key.
    pub artifacts: Vec<FileArtifact>,

    /// Reference blocks, in host order.
    pub blocks: Vec<HostBlock<'a>>,
}

/// Extract TLS material and build reference blocks for every host.
pub fn extract_credentials<'a>(
    configs: &'a HashMap<String, HostConfig>,
    paths: &RegistryPaths,
) -> Result<ExtractedCredentials<'a>> {
    let sorted: BTreeMap<&str, &HostConfig> =
        configs.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let mut out = ExtractedCredentials::default();

    for (host, config) in sorted {
        validate_host(host)?;

        let mut block = HostBlock {
            host,
            auth: config.auth.as_ref().map(|auth| auth.present_fields()),
            insecure_skip_verify: false,
            ca_file: None,
            cert_file: None,
            key_file: None,
        };

        if let Some(tls) = &config.tls {
            block.insecure_skip_verify = tls.insecure_skip_verify;

            if let Some(ca) = tls.ca_bytes() {
                let path = paths.ca_file(host);
                out.artifacts.push(FileArtifact::secret(path.clone(), ca));
                block.ca_file = Some(path);
            }

            // Cert and key always travel together, even if one is empty.
            if let Some(identity) = &tls.client_identity {
                let cert_path = paths.client_cert_file(host);
                let key_path = paths.client_key_file(host);
                out.artifacts
                    .push(FileArtifact::secret(cert_path.clone(), identity.crt.clone()));
                out.artifacts
                    .push(FileArtifact::secret(key_path.clone(), identity.key.clone()));
                block.cert_file = Some(cert_path);
                block.key_file = Some(key_path);
            }
        }

        out.blocks.push(block);
    }

    Ok(out)
}
