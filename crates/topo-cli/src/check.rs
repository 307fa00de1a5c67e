//! # Check Subcommand
//!
//! Loads an optimizer block, prints it with every default filled in, and
//! logs advisory warnings. Warnings do not change the exit code; a block
//! that fails to load does.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use topo_core::OptimizerSettings;

use crate::document::{load_document, select};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to a JSON or YAML case document.
    pub path: PathBuf,

    /// JSON pointer to the optimizer block (e.g. /optimizer).
    #[arg(long, default_value = "")]
    pub pointer: String,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let settings = load_settings(&args.path, &args.pointer)?;
    let warnings = settings.check();
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(
        compliance = %settings.compliance,
        warnings = warnings.len(),
        "optimizer block loaded"
    );
    println!("{}", settings.to_json_string_pretty()?);
    Ok(0)
}

/// Load `path` and parse the optimizer block at `pointer`.
pub fn load_settings(path: &Path, pointer: &str) -> Result<OptimizerSettings> {
    let document = load_document(path)?;
    let block = select(&document, pointer)?;
    OptimizerSettings::from_value(block.clone())
        .with_context(|| format!("invalid optimizer block in {}", path.display()))
}
