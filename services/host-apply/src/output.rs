//! Plan output formatting.

use colored::Colorize;
use hostcfg_cri_registry::FileArtifact;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// One row of `host-apply plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct PlanRow {
    #[tabled(rename = "PATH")]
    pub path: String,
    #[tabled(rename = "OP")]
    pub op: String,
    #[tabled(rename = "MODE")]
    pub mode: String,
    #[tabled(rename = "BYTES")]
    pub bytes: usize,
    #[tabled(rename = "DIGEST")]
    pub digest: String,
}

impl From<&FileArtifact> for PlanRow {
    fn from(artifact: &FileArtifact) -> Self {
        Self {
            path: artifact.path.clone(),
            op: artifact.op.to_string(),
            mode: format!("{:04o}", artifact.permissions),
            bytes: artifact.len(),
            digest: artifact.content_digest(),
        }
    }
}

/// Render the artifact list.
pub fn render_plan(artifacts: &[FileArtifact], format: OutputFormat) -> String {
    let rows: Vec<PlanRow> = artifacts.iter().map(PlanRow::from).collect();
    match format {
        OutputFormat::Table => Table::new(&rows).to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}
