//! # Keys and Defaults Subcommands
//!
//! `topo keys` lists the registered compliance variants.
//! `topo defaults [KEY]` prints their default records as JSON.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use topo_core::ComplianceKind;

/// Arguments for the defaults subcommand.
#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// Variant key (nominal, mu, p_norm, smooth_theta). All variants if omitted.
    pub key: Option<String>,
}

/// Execute the keys subcommand.
pub fn run_keys() -> Result<u8> {
    for kind in ComplianceKind::all() {
        let defaults = kind.default_compliance().parameters();
        let rendered: Vec<String> = kind
            .declared_parameters()
            .iter()
            .map(|name| match defaults.get(*name) {
                Some(value) => format!("{name}={value}"),
                None => (*name).to_owned(),
            })
            .collect();
        println!("  {:<14} {}", kind.as_str(), rendered.join(", "));
    }
    Ok(0)
}

/// Execute the defaults subcommand.
pub fn run_defaults(args: &DefaultsArgs) -> Result<u8> {
    let out = default_records(args.key.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(0)
}

/// Default record of one variant, or an array of all of them.
pub fn default_records(key: Option<&str>) -> Result<Value> {
    match key {
        Some(key) => {
            let kind: ComplianceKind = key.parse().context("cannot print defaults")?;
            Ok(kind.default_compliance().to_record())
        }
        None => Ok(Value::Array(
            ComplianceKind::all()
                .iter()
                .map(|k| k.default_compliance().to_record())
                .collect(),
        )),
    }
}
