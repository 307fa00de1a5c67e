//! # Inspect Subcommand
//!
//! Resolves the compliance record inside a case document and prints its
//! normalized form. Undeclared extra parameters are dropped from the output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use topo_core::Compliance;

use crate::document::{load_document, select};

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a JSON or YAML case document.
    pub path: PathBuf,

    /// JSON pointer to the compliance record (e.g. /optimizer/compliance).
    #[arg(long, default_value = "")]
    pub pointer: String,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let compliance = resolve_compliance(&args.path, &args.pointer)?;
    tracing::info!(%compliance, "compliance resolved");
    println!("{}", serde_json::to_string_pretty(&compliance.to_record())?);
    Ok(0)
}

/// Load `path` and reconstruct the compliance record at `pointer`.
pub fn resolve_compliance(path: &Path, pointer: &str) -> Result<Compliance> {
    let document = load_document(path)?;
    let record = select(&document, pointer)?;
    Compliance::from_record(record)
        .with_context(|| format!("invalid compliance record in {}", path.display()))
}
