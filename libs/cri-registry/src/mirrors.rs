//! Mirror resolution.

use std::collections::{BTreeMap, HashMap};

use crate::config::MirrorSpec;
use crate::error::{RegistryConfigError, Result};

/// One `mirrors."<host>"` block: a registry bound to its endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorBlock<'a> {
    pub host: &'a str,
    pub endpoints: &'a [String],
}

/// Produce one block per registry host, ordered by host.
///
/// Endpoint order within a host is kept as given.
pub fn resolve_mirrors(mirrors: &HashMap<String, MirrorSpec>) -> Result<Vec<MirrorBlock<'_>>> {
    let sorted: BTreeMap<&str, &MirrorSpec> =
        mirrors.iter().map(|(k, v)| (k.as_str(), v)).collect();

    sorted
        .into_iter()
        .map(|(host, spec)| {
            if host.is_empty() {
                return Err(RegistryConfigError::invalid_host(
                    host,
                    "mirror host cannot be empty",
                ));
            }
            Ok(MirrorBlock {
                host,
                endpoints: &spec.endpoints,
            })
        })
        .collect()
}
