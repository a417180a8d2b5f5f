//! Registry config generation entry point.

use crate::artifact::FileArtifact;
use crate::config::Registries;
use crate::credentials::extract_credentials;
use crate::error::Result;
use crate::fragment::assemble;
use crate::mirrors::resolve_mirrors;
use crate::paths::RegistryPaths;

/// Generates runtime artifacts from a registry access configuration.
///
/// Holds only the well-known roots, so a single generator can be shared
/// across threads and calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfigGenerator {
    paths: RegistryPaths,
}

impl RegistryConfigGenerator {
    /// Create a generator with custom roots.
    pub fn new(paths: RegistryPaths) -> Self {
        Self { paths }
    }

    /// Roots used for derived paths.
    pub fn paths(&self) -> &RegistryPaths {
        &self.paths
    }

    /// Produce the ordered artifact list.
    ///
    /// Extracted certificates and keys come first, in host order; the
    /// configuration fragment is always last. On error nothing is returned.
    pub fn generate<R>(&self, registries: &R) -> Result<Vec<FileArtifact>>
    where
        R: Registries + ?Sized,
    {
        let mirrors = resolve_mirrors(registries.mirrors())?;
        let credentials = extract_credentials(registries.config(), &self.paths)?;

        let fragment = assemble(&mirrors, &credentials.blocks, &self.paths.runtime_config);

        let mut files = credentials.artifacts;
        files.push(fragment);
        Ok(files)
    }
}

/// Generate artifacts using the default runtime paths.
pub fn generate_registries_config<R>(registries: &R) -> Result<Vec<FileArtifact>>
where
    R: Registries + ?Sized,
{
    RegistryConfigGenerator::default().generate(registries)
}
