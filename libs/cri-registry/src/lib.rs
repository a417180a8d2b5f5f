//! CRI registry configuration generator.
//!
//! Turns a declarative registry-access configuration (mirror endpoints per
//! registry plus per-host auth and TLS material) into the files the container
//! runtime needs: extracted CA/client certificates and keys, and a
//! configuration fragment appended to the runtime's shared config file.
//!
//! The transformation is pure. It builds [`FileArtifact`] descriptors in
//! memory and leaves writing them to the caller.
//!
//! ```text
//! Registries ──┬─> mirrors::resolve_mirrors ──────────┐
//!              └─> credentials::extract_credentials ──┼─> fragment::assemble
//!                        │                            │
//!                        └── ca/cert/key artifacts ───┴─> Vec<FileArtifact>
//! ```
//!
//! Hosts are always visited in lexicographic order so that repeated runs
//! produce byte-identical output.

pub mod artifact;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fragment;
pub mod generator;
pub mod mirrors;
pub mod paths;

pub use artifact::{FileArtifact, FileOp, FRAGMENT_FILE_MODE, SECRET_FILE_MODE};
pub use config::{
    AuthSpec, ClientIdentity, HostConfig, MirrorSpec, Registries, RegistryAccessConfig, TlsSpec,
};
pub use error::{RegistryConfigError, Result};
pub use generator::{generate_registries_config, RegistryConfigGenerator};
pub use paths::{RegistryPaths, DEFAULT_CA_ROOT, DEFAULT_CLIENT_ROOT, DEFAULT_RUNTIME_CONFIG};
