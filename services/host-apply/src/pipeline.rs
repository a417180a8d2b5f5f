//! Load, generate, write.

use std::path::Path;

use hostcfg_cri_registry::{FileArtifact, RegistryConfigGenerator};
use tracing::{debug, info};

use crate::error::ApplyError;
use crate::loader;
use crate::writer::{ApplySummary, ArtifactWriter};

/// Load the registries file and generate the artifact list without writing.
pub fn plan(
    registries_path: &Path,
    generator: &RegistryConfigGenerator,
) -> Result<Vec<FileArtifact>, ApplyError> {
    let config = loader::load_from_path(registries_path)?;
    let roots = generator.paths();
    debug!(
        ca_root = %roots.ca_root,
        client_root = %roots.client_root,
        runtime_config = %roots.runtime_config,
        "generating registry artifacts"
    );
    let artifacts = generator.generate(&config)?;

    info!(
        path = %registries_path.display(),
        mirrors = config.mirrors.len(),
        hosts = config.config.len(),
        artifacts = artifacts.len(),
        "registry artifacts generated"
    );

    Ok(artifacts)
}

/// Generate artifacts and hand them to the writer.
pub fn apply(
    registries_path: &Path,
    generator: &RegistryConfigGenerator,
    writer: &ArtifactWriter,
) -> Result<ApplySummary, ApplyError> {
    let artifacts = plan(registries_path, generator)?;
    let summary = writer.apply(&artifacts)?;

    info!(
        created = summary.created,
        appended = summary.appended,
        bytes = summary.bytes,
        "registry config applied"
    );

    Ok(summary)
}
