//! # topo-cli — Run Configuration Tool
//!
//! Provides the `topo` command-line interface over `topo-core`. Handlers
//! load documents and print results; every decision about records is made
//! by the core crate.
//!
//! ## Subcommands
//!
//! - `topo keys` — List compliance variants, their parameters and defaults.
//! - `topo defaults` — Print default compliance records.
//! - `topo inspect` — Resolve the compliance record in a case document.
//! - `topo check` — Load an optimizer block and report advisory warnings.
//!
//! ```bash
//! topo defaults smooth_theta
//! topo inspect examples/hook/case_4.json --pointer /optimizer/compliance
//! topo check examples/hook/case_4.yaml --pointer /optimizer
//! ```

pub mod check;
pub mod document;
pub mod inspect;
pub mod keys;
