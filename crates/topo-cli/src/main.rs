//! # topo CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use topo_cli::check::{run_check, CheckArgs};
use topo_cli::inspect::{run_inspect, InspectArgs};
use topo_cli::keys::{run_defaults, run_keys, DefaultsArgs};

/// Topology-optimization run configuration tool.
///
/// Lists compliance formulations, prints their default records, and
/// validates the compliance and optimizer blocks of case documents.
#[derive(Parser, Debug)]
#[command(name = "topo", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List compliance variant keys with their parameters and defaults.
    Keys,

    /// Print default compliance records as JSON.
    Defaults(DefaultsArgs),

    /// Resolve and print the compliance record in a case document.
    Inspect(InspectArgs),

    /// Load an optimizer block and report suspicious settings.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Keys => run_keys(),
        Commands::Defaults(args) => run_defaults(&args),
        Commands::Inspect(args) => run_inspect(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_keys() {
        let cli = Cli::try_parse_from(["topo", "keys"]).unwrap();
        assert!(matches!(cli.command, Commands::Keys));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_defaults_with_key() {
        let cli = Cli::try_parse_from(["topo", "defaults", "mu"]).unwrap();
        if let Commands::Defaults(args) = cli.command {
            assert_eq!(args.key.as_deref(), Some("mu"));
        } else {
            panic!("expected defaults");
        }
    }

    #[test]
    fn cli_parse_inspect_with_pointer() {
        let cli = Cli::try_parse_from([
            "topo",
            "-vv",
            "inspect",
            "case.json",
            "--pointer",
            "/optimizer/compliance",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Inspect(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("case.json"));
            assert_eq!(args.pointer, "/optimizer/compliance");
        } else {
            panic!("expected inspect");
        }
    }

    #[test]
    fn cli_parse_check_default_pointer() {
        let cli = Cli::try_parse_from(["topo", "check", "case.yaml"]).unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.pointer, "");
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["topo"]).is_err());
    }
}
