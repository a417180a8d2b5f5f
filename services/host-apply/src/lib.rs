//! Host apply pipeline for CRI registry configuration.
//!
//! Runs on the host before the container runtime starts (or reloads). It
//! reads the declarative registries file, generates the runtime artifacts
//! with `hostcfg-cri-registry`, and writes them out.
//!
//! ## Modules
//!
//! - `loader`: registries file parsing (JSON / TOML)
//! - `pipeline`: load + generate + write
//! - `writer`: `create` / `append` materialization with file modes
//! - `cli`: `host-apply` command line

pub mod cli;
pub mod error;
pub mod loader;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod writer;

pub use error::ApplyError;
pub use writer::{ApplySummary, ArtifactWriter};
