//! SDK release orchestrator
//!
//! Generates client SDKs from an OpenAPI specification and commits and tags
//! the result in each SDK's repository. Meant to run from a CI job, but it
//! can be run by hand with the same environment variables.

mod conversion;
mod core;
mod models;
mod release;

use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::runner::SystemRunner;
use crate::release::pipeline::{Orchestrator, RunOutcome};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    info!(
        sdks = ?config.sdks,
        org = %config.org_name,
        dry_run = config.dry_run,
        push = config.push,
        "Starting SDK release"
    );

    let orchestrator = match Orchestrator::new(config, Arc::new(SystemRunner)) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("{}", e.report());
            std::process::exit(1);
        }
    };

    match orchestrator.run().await {
        Ok(RunOutcome::NothingToDo) => {}
        Ok(RunOutcome::DryRun(release)) => {
            info!("Dry run finished after {} ({})", release.sdk, release.repo_name);
        }
        Ok(RunOutcome::Completed(released)) => {
            for release in &released {
                info!("{} -> {} [{}]", release.sdk, release.repo_name, release.stage);
            }
            info!("Released {} SDK(s)", released.len());
        }
        Err(e) => {
            error!("{}", e.report());
            std::process::exit(1);
        }
    }
}

/// Print help message
fn print_help() {
    println!("SDK Release v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: sdk-release [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -h, --help    Display this help message");
    println!();
    println!("Required environment variables:");
    println!("  YML - Path or URL of the OpenAPI specification");
    println!("  DEFINITION_FILE - Path or URL of the SDK definitions JSON");
    println!("  SDKS - Comma separated SDK identifiers (empty: nothing to do)");
    println!("  ORG_NAME - GitHub organization of the SDK repositories");
    println!();
    println!("Optional settings:");
    println!("  DRY_RUN - Any non-empty value stops after the first SDK is tagged");
    println!("  OPENAPI_GENERATOR - Generator binary (default: openapi-generator)");
    println!("  WORKSPACE_DIR - Directory repositories are cloned into (default: .)");
    println!("  PUSH - Push branches and tags after tagging (default: false)");
    println!("  LOG_LEVEL - Logging level (default: info)");
    println!("  HTTP_TIMEOUT - Timeout for fetching URLs in seconds (default: 60)");
    println!("  CONFIG_PATH - TOML settings file (default: release.toml if present)");
    println!();
    println!("A .env file in the current directory is read first.");
}
