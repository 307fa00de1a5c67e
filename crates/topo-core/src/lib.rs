//! # topo-core — Compliance Formulations for Topology Optimization
//!
//! Declares which compliance measure an optimization run minimizes, and
//! carries that choice through a plain key/value record so a run can be
//! saved, reloaded, and re-run with identical parameters.
//!
//! ## Key Design Principles
//!
//! 1. **Closed variant set.** `Compliance` is an enum over four value
//!    structs. Adding a formulation forces every `match` to handle it.
//!
//! 2. **Static dispatch table.** Record keys resolve through a `static`
//!    key→constructor array. No runtime registration, no locking.
//!
//! 3. **No silent fallback.** An unknown key or a missing parameter is a
//!    `RecordError`. Extra, undeclared parameters are ignored.
//!
//! 4. **Named defaults.** Default parameter values are associated constants
//!    on each variant struct.
//!
//! ## Crate Policy
//!
//! - No I/O. Documents are read and written by the caller.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod compliance;
pub mod error;
pub mod registry;
pub mod settings;

// Re-export primary types for ergonomic imports.
pub use compliance::{
    Compliance, ComplianceMu, ComplianceNominal, CompliancePNorm, ComplianceSmoothTheta,
    ComplianceVariant, ParameterReader, Parameters,
};
pub use error::{ConfigError, RecordError};
pub use registry::{from_record, ComplianceKind};
pub use settings::{OptimizerSettings, SaveSettings, SettingsWarning};
