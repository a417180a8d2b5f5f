//! host-apply
//!
//! Materializes registry mirrors, credentials and TLS material for the CRI
//! runtime from a declarative registries file.

use std::process::ExitCode;

use clap::Parser;
use hostcfg_apply::cli::Cli;
use hostcfg_apply::error::{print_error, ApplyError};
use hostcfg_apply::logging;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(1);
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let reason = e
                .downcast_ref::<ApplyError>()
                .map(ApplyError::reason_code)
                .unwrap_or("unknown");
            error!(reason, error = %e, "host-apply failed");
            print_error(&e);
            ExitCode::from(1)
        }
    }
}
