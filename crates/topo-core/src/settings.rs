//! # Run Settings
//!
//! The optimizer block of an optimization-case document, which owns the
//! [`Compliance`] by composition, and the save block that selects which
//! per-iteration histories the external solver records.
//!
//! Missing fields fall back to their defaults. An invalid `compliance`
//! record is never defaulted: it fails the whole block.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compliance::Compliance;
use crate::error::ConfigError;

/// Optimizer configuration handed to the external solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Objective formulation.
    pub compliance: Compliance,
    /// Upper bound on total material volume.
    pub volume_max: f64,
    /// Iterations run before convergence is checked.
    pub min_iterations: u32,
    /// Hard iteration limit.
    pub max_iterations: u32,
    /// Adapt the move limit between iterations.
    pub use_adaptive_move: bool,
    /// Initial move limit as a multiple of the design variable.
    pub initial_move_multiplier: f64,
    /// Adapt the damping factor between iterations.
    pub use_adaptive_damping: bool,
    /// Initial damping factor (0.0 = none).
    pub initial_damping: f64,
    /// Enforce the layout constraint on grouped members.
    pub use_layout_constraint: bool,
    /// Lower bound on member areas.
    pub x_min: f64,
    /// Convergence tolerance on the relative objective change.
    pub tolerance: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            compliance: Compliance::default(),
            volume_max: 1.0,
            min_iterations: 20,
            max_iterations: 15_000,
            use_adaptive_move: false,
            initial_move_multiplier: 1.0,
            use_adaptive_damping: false,
            initial_damping: 0.7,
            use_layout_constraint: false,
            x_min: 1e-12,
            tolerance: 1e-8,
        }
    }
}

impl OptimizerSettings {
    /// Defaults with the given compliance formulation.
    pub fn with_compliance(compliance: impl Into<Compliance>) -> Self {
        Self {
            compliance: compliance.into(),
            ..Default::default()
        }
    }

    /// Load from a JSON value.
    ///
    /// # Errors
    ///
    /// `ConfigError::Record` if the embedded compliance record does not
    /// resolve, `ConfigError::Serialization` for any other shape error.
    pub fn from_value(mut value: Value) -> Result<Self, ConfigError> {
        // The record is taken out and resolved here so the caller gets the
        // typed error, not serde's flattened message.
        let record = value.as_object_mut().and_then(|block| block.remove("compliance"));
        let mut settings: Self = serde_json::from_value(value)?;
        if let Some(record) = record {
            settings.compliance = Compliance::from_record(&record)?;
        }
        Ok(settings)
    }

    /// Render as a JSON value.
    ///
    /// # Errors
    ///
    /// `ConfigError::Record` with `NonFiniteParameter` if the compliance
    /// could not be reloaded from what would be written.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        self.compliance.check_finite()?;
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_value(serde_json::from_str(s)?)
    }

    /// Render as indented JSON text. Fails like [`to_value`](Self::to_value).
    pub fn to_json_string_pretty(&self) -> Result<String, ConfigError> {
        self.compliance.check_finite()?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Advisory findings for values the solver is unlikely to accept.
    ///
    /// Nothing here is an error; range policy belongs to the caller.
    pub fn check(&self) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();
        for (field, value) in self.compliance.parameters() {
            if !value.is_finite() {
                warnings.push(SettingsWarning::NonFiniteParameter {
                    variant_key: self.compliance.key(),
                    field,
                    value,
                });
            }
        }
        if self.min_iterations > self.max_iterations {
            warnings.push(SettingsWarning::IterationBoundsInverted {
                min_iterations: self.min_iterations,
                max_iterations: self.max_iterations,
            });
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            warnings.push(SettingsWarning::NonPositiveTolerance(self.tolerance));
        }
        if self.x_min.is_nan() || self.x_min <= 0.0 {
            warnings.push(SettingsWarning::NonPositiveAreaFloor(self.x_min));
        }
        warnings
    }
}

/// A suspicious but loadable optimizer setting.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsWarning {
    /// A compliance parameter is NaN or infinite. JSON cannot carry it, so
    /// saving the block will fail.
    NonFiniteParameter {
        variant_key: &'static str,
        field: String,
        value: f64,
    },
    /// `min_iterations` exceeds `max_iterations`.
    IterationBoundsInverted {
        min_iterations: u32,
        max_iterations: u32,
    },
    /// `tolerance` is zero, negative, or NaN.
    NonPositiveTolerance(f64),
    /// `x_min` is zero, negative, or NaN.
    NonPositiveAreaFloor(f64),
}

impl std::fmt::Display for SettingsWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteParameter {
                variant_key,
                field,
                value,
            } => write!(f, "compliance {variant_key:?} parameter {field:?} is not finite ({value})"),
            Self::IterationBoundsInverted {
                min_iterations,
                max_iterations,
            } => write!(
                f,
                "min_iterations ({min_iterations}) exceeds max_iterations ({max_iterations})"
            ),
            Self::NonPositiveTolerance(v) => write!(f, "tolerance must be positive, got {v}"),
            Self::NonPositiveAreaFloor(v) => write!(f, "x_min must be positive, got {v}"),
        }
    }
}

/// Per-iteration histories the solver writes back into the case document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// Record every `step`-th iteration.
    pub step: u32,
    pub save_angles: bool,
    pub save_areas: bool,
    pub save_forces: bool,
    pub save_compliance: bool,
    pub save_move: bool,
    pub save_volume: bool,
    pub save_error: bool,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            step: 1,
            save_angles: false,
            save_areas: false,
            save_forces: false,
            save_compliance: false,
            save_move: false,
            save_volume: false,
            save_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{ComplianceMu, CompliancePNorm, ComplianceSmoothTheta};
    use crate::error::RecordError;
    use serde_json::json;

    #[test]
    fn empty_block_uses_defaults() {
        let s = OptimizerSettings::from_value(json!({})).unwrap();
        assert_eq!(s, OptimizerSettings::default());
        assert_eq!(s.compliance.key(), "nominal");
    }

    #[test]
    fn compliance_survives_document_cycle() {
        let original = OptimizerSettings {
            max_iterations: 5000,
            initial_damping: 0.0,
            ..OptimizerSettings::with_compliance(ComplianceSmoothTheta::new(0.0174, 0.01))
        };
        let text = original.to_json_string_pretty().unwrap();
        let restored = OptimizerSettings::from_json_str(&text).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn compliance_rendered_as_record() {
        let s = OptimizerSettings::with_compliance(CompliancePNorm::new(20.0));
        let v = s.to_value().unwrap();
        assert_eq!(v["compliance"], json!({"key": "p_norm", "parameters": {"p": 20.0}}));
        assert_eq!(v["max_iterations"], json!(15000));
    }

    #[test]
    fn unknown_compliance_key_fails_whole_block() {
        let err = OptimizerSettings::from_value(json!({
            "compliance": {"key": "bogus"},
            "volume_max": 2.0
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Record(RecordError::UnknownVariantKey { ref key }) if key == "bogus"
        ));
    }

    #[test]
    fn missing_compliance_parameter_fails_whole_block() {
        let err = OptimizerSettings::from_value(json!({
            "compliance": {"key": "mu", "parameters": {}}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Record(RecordError::MissingParameter { field: "beta", .. })
        ));
    }

    #[test]
    fn saving_non_finite_parameter_fails() {
        let s = OptimizerSettings::with_compliance(ComplianceMu::new(f64::NAN));
        assert!(matches!(
            s.to_json_string_pretty(),
            Err(ConfigError::Record(RecordError::NonFiniteParameter {
                variant_key: "mu",
                field: "beta",
                ..
            }))
        ));
        assert!(matches!(
            OptimizerSettings::with_compliance(CompliancePNorm::new(f64::NEG_INFINITY)).to_value(),
            Err(ConfigError::Record(RecordError::NonFiniteParameter { field: "p", .. }))
        ));
        assert!(serde_json::to_string(&s).is_err());
    }

    #[test]
    fn compliance_record_resolved_once_and_kept() {
        let block = json!({
            "compliance": {"key": "p_norm", "parameters": {"p": 6.0, "unused": 1.0}},
            "tolerance": 1e-6
        });
        let s = OptimizerSettings::from_value(block).unwrap();
        assert_eq!(s.compliance, Compliance::PNorm(CompliancePNorm::new(6.0)));
        assert_eq!(s.tolerance, 1e-6);
    }

    #[test]
    fn non_object_block_is_serialization_error() {
        let err = OptimizerSettings::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn wrong_field_type_is_serialization_error() {
        let err = OptimizerSettings::from_value(json!({"max_iterations": "many"})).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn defaults_pass_check() {
        assert!(OptimizerSettings::default().check().is_empty());
    }

    #[test]
    fn check_flags_suspicious_values() {
        let s = OptimizerSettings {
            min_iterations: 50,
            max_iterations: 10,
            tolerance: 0.0,
            x_min: -1.0,
            ..OptimizerSettings::with_compliance(ComplianceMu::new(f64::NAN))
        };
        let warnings = s.check();
        assert_eq!(warnings.len(), 4);
        assert!(matches!(
            warnings[0],
            SettingsWarning::NonFiniteParameter { variant_key: "mu", ref field, .. } if field == "beta"
        ));
        assert_eq!(
            warnings[1],
            SettingsWarning::IterationBoundsInverted {
                min_iterations: 50,
                max_iterations: 10
            }
        );
        assert_eq!(warnings[2], SettingsWarning::NonPositiveTolerance(0.0));
        assert_eq!(warnings[3], SettingsWarning::NonPositiveAreaFloor(-1.0));
    }

    #[test]
    fn save_settings_defaults_and_partial_load() {
        let s: SaveSettings =
            serde_json::from_value(json!({"save_compliance": true, "step": 5})).unwrap();
        assert_eq!(
            s,
            SaveSettings {
                step: 5,
                save_compliance: true,
                ..SaveSettings::default()
            }
        );
    }
}
