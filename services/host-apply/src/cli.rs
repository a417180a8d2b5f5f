//! Command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hostcfg_cri_registry::{
    RegistryConfigGenerator, RegistryPaths, DEFAULT_CA_ROOT, DEFAULT_CLIENT_ROOT,
    DEFAULT_RUNTIME_CONFIG,
};

use crate::logging::LogFormat;
use crate::output::{self, OutputFormat};
use crate::pipeline;
use crate::writer::ArtifactWriter;

/// Default location of the declarative registries file.
pub const DEFAULT_REGISTRIES_PATH: &str = "/etc/hostcfg/registries.toml";

/// host-apply - materialize registry mirrors and credentials for the CRI runtime.
#[derive(Debug, Parser)]
#[command(name = "host-apply")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Declarative registries file (JSON or TOML).
    #[arg(long, global = true, env = "HOSTCFG_REGISTRIES", default_value = DEFAULT_REGISTRIES_PATH)]
    pub config: PathBuf,

    /// Directory for extracted registry CA certificates.
    #[arg(long, global = true, env = "HOSTCFG_CA_ROOT", default_value = DEFAULT_CA_ROOT)]
    pub ca_root: String,

    /// Directory for extracted client certificates and keys.
    #[arg(long, global = true, env = "HOSTCFG_CLIENT_ROOT", default_value = DEFAULT_CLIENT_ROOT)]
    pub client_root: String,

    /// Runtime configuration file the fragment is appended to.
    #[arg(long, global = true, env = "HOSTCFG_RUNTIME_CONFIG", default_value = DEFAULT_RUNTIME_CONFIG)]
    pub runtime_config: String,

    /// Log line format.
    #[arg(long, global = true, env = "HOSTCFG_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate artifacts and write them to disk.
    Apply(ApplyArgs),

    /// Show the artifacts that would be written.
    Plan(PlanArgs),

    /// Show version.
    Version,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Write under this directory instead of `/`.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Log what would be written without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Output format for the artifact list.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print the generated runtime config fragment instead of the list.
    #[arg(long)]
    pub show_fragment: bool,
}

impl Cli {
    /// Roots for derived artifact paths.
    pub fn registry_paths(&self) -> RegistryPaths {
        RegistryPaths::new(
            self.ca_root.clone(),
            self.client_root.clone(),
            self.runtime_config.clone(),
        )
    }

    /// Run the selected command.
    pub fn run(self) -> Result<()> {
        let generator = RegistryConfigGenerator::new(self.registry_paths());

        match self.command {
            Commands::Apply(args) => {
                let mut writer = ArtifactWriter::new().with_dry_run(args.dry_run);
                if let Some(root) = args.root {
                    writer = writer.with_root(root);
                }

                let summary = pipeline::apply(&self.config, &generator, &writer)
                    .with_context(|| format!("failed to apply {}", self.config.display()))?;

                let verb = if args.dry_run { "would write" } else { "wrote" };
                output::print_success(&format!(
                    "{} {} file(s), appended {} fragment(s), {} bytes",
                    verb, summary.created, summary.appended, summary.bytes
                ));
                Ok(())
            }
            Commands::Plan(args) => {
                let artifacts = pipeline::plan(&self.config, &generator)
                    .with_context(|| format!("failed to plan {}", self.config.display()))?;

                if args.show_fragment {
                    if let Some(text) = artifacts.last().and_then(|a| a.content_str()) {
                        print!("{}", text);
                    }
                } else {
                    println!("{}", output::render_plan(&artifacts, args.format));
                }
                Ok(())
            }
            Commands::Version => {
                println!("host-apply {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}
