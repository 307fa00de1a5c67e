//! # Compliance Formulations
//!
//! The closed set of compliance measures an optimization run can minimize.
//! Each formulation is a small `Copy` value struct holding its parameters;
//! the [`Compliance`] enum wraps them so every consumer matches exhaustively.
//!
//! ## Record Form
//!
//! ```json
//! { "key": "smooth_theta", "parameters": { "beta": 0.1, "theta_r": 1.5707963267948966 } }
//! ```
//!
//! `nominal` has no parameters and renders without the `parameters` field.
//! Reading accepts an absent, `null`, or empty `parameters` field as the
//! empty mapping.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::registry::{self, ComplianceKind};

/// Parameter name to value, ordered by name.
pub type Parameters = BTreeMap<String, f64>;

/// Behaviour shared by every compliance formulation.
///
/// `KEY` and `PARAMETERS` are fixed per type. `from_parameters` must read
/// exactly the names listed in `PARAMETERS`.
pub trait ComplianceVariant: Sized {
    /// Stable serialization key.
    const KEY: &'static str;

    /// Names of the parameters this variant reads and writes, in record order.
    const PARAMETERS: &'static [&'static str];

    /// Tunable numeric parameters by name.
    fn parameters(&self) -> Parameters;

    /// Rebuild the variant from the `parameters` field of its record.
    fn from_parameters(reader: &ParameterReader<'_>) -> Result<Self, RecordError>;

    /// Fail on the first NaN or infinite parameter. JSON has no encoding
    /// for them, so a record carrying one cannot be reloaded.
    fn check_finite(&self) -> Result<(), RecordError> {
        let params = self.parameters();
        for &field in Self::PARAMETERS {
            if let Some(&value) = params.get(field) {
                if !value.is_finite() {
                    return Err(RecordError::NonFiniteParameter {
                        variant_key: Self::KEY,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// [`to_record`](Self::to_record) for records that will be written.
    ///
    /// # Errors
    ///
    /// `NonFiniteParameter` if any parameter is NaN or infinite.
    fn try_to_record(&self) -> Result<Value, RecordError> {
        self.check_finite()?;
        Ok(self.to_record())
    }

    /// Render `{"key": .., "parameters": {..}}`. Parameterless variants
    /// omit the `parameters` field. Non-finite values render as `null`.
    fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("key".to_owned(), Value::from(Self::KEY));
        if !Self::PARAMETERS.is_empty() {
            let params: Map<String, Value> = self
                .parameters()
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect();
            record.insert("parameters".to_owned(), Value::Object(params));
        }
        Value::Object(record)
    }
}

/// Read access to the `parameters` field of a record being dispatched.
#[derive(Debug, Clone, Copy)]
pub struct ParameterReader<'a> {
    variant_key: &'static str,
    params: Option<&'a Map<String, Value>>,
}

impl<'a> ParameterReader<'a> {
    /// Wrap the `parameters` object of a record matched to `variant_key`.
    /// `None` stands for an absent or `null` field.
    pub fn new(variant_key: &'static str, params: Option<&'a Map<String, Value>>) -> Self {
        Self {
            variant_key,
            params,
        }
    }

    /// Fetch a declared parameter as `f64`.
    ///
    /// # Errors
    ///
    /// `MissingParameter` if the name is absent, `InvalidParameter` if the
    /// value is not a JSON number.
    pub fn require(&self, field: &'static str) -> Result<f64, RecordError> {
        let value = self
            .params
            .and_then(|p| p.get(field))
            .ok_or(RecordError::MissingParameter {
                variant_key: self.variant_key,
                field,
            })?;
        value.as_f64().ok_or_else(|| RecordError::InvalidParameter {
            variant_key: self.variant_key,
            field,
            reason: format!("expected a number, found {}", json_type_name(value)),
        })
    }

    /// Names present in the record that `declared` does not list.
    pub fn undeclared(&self, declared: &[&str]) -> Vec<&'a str> {
        self.params
            .into_iter()
            .flat_map(|p| p.keys())
            .map(String::as_str)
            .filter(|name| !declared.iter().any(|d| d == name))
            .collect()
    }
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─────────────────────────────────────────────────────────────
//  Variants
// ─────────────────────────────────────────────────────────────

/// Unmodified compliance, no relaxation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComplianceNominal;

impl ComplianceVariant for ComplianceNominal {
    const KEY: &'static str = "nominal";
    const PARAMETERS: &'static [&'static str] = &[];

    fn parameters(&self) -> Parameters {
        Parameters::new()
    }

    fn from_parameters(_reader: &ParameterReader<'_>) -> Result<Self, RecordError> {
        Ok(Self)
    }
}

/// Mu-scheme compliance penalty with relaxation factor `beta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceMu {
    pub beta: f64,
}

impl ComplianceMu {
    pub const DEFAULT_BETA: f64 = 0.1;

    pub fn new(beta: f64) -> Self {
        Self { beta }
    }
}

impl Default for ComplianceMu {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BETA)
    }
}

impl ComplianceVariant for ComplianceMu {
    const KEY: &'static str = "mu";
    const PARAMETERS: &'static [&'static str] = &["beta"];

    fn parameters(&self) -> Parameters {
        Parameters::from([("beta".to_owned(), self.beta)])
    }

    fn from_parameters(reader: &ParameterReader<'_>) -> Result<Self, RecordError> {
        Ok(Self::new(reader.require("beta")?))
    }
}

/// P-norm aggregation of local compliance with exponent `p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompliancePNorm {
    pub p: f64,
}

impl CompliancePNorm {
    pub const DEFAULT_P: f64 = 20.0;

    pub fn new(p: f64) -> Self {
        Self { p }
    }
}

impl Default for CompliancePNorm {
    fn default() -> Self {
        Self::new(Self::DEFAULT_P)
    }
}

impl ComplianceVariant for CompliancePNorm {
    const KEY: &'static str = "p_norm";
    const PARAMETERS: &'static [&'static str] = &["p"];

    fn parameters(&self) -> Parameters {
        Parameters::from([("p".to_owned(), self.p)])
    }

    fn from_parameters(reader: &ParameterReader<'_>) -> Result<Self, RecordError> {
        Ok(Self::new(reader.require("p")?))
    }
}

/// Angle-dependent relaxation around reference angle `theta_r` (radians)
/// with smoothing factor `beta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceSmoothTheta {
    pub theta_r: f64,
    pub beta: f64,
}

impl ComplianceSmoothTheta {
    pub const DEFAULT_THETA_R: f64 = FRAC_PI_2;
    pub const DEFAULT_BETA: f64 = 0.1;

    pub fn new(theta_r: f64, beta: f64) -> Self {
        Self { theta_r, beta }
    }
}

impl Default for ComplianceSmoothTheta {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THETA_R, Self::DEFAULT_BETA)
    }
}

impl ComplianceVariant for ComplianceSmoothTheta {
    const KEY: &'static str = "smooth_theta";
    const PARAMETERS: &'static [&'static str] = &["theta_r", "beta"];

    fn parameters(&self) -> Parameters {
        Parameters::from([
            ("theta_r".to_owned(), self.theta_r),
            ("beta".to_owned(), self.beta),
        ])
    }

    fn from_parameters(reader: &ParameterReader<'_>) -> Result<Self, RecordError> {
        Ok(Self::new(reader.require("theta_r")?, reader.require("beta")?))
    }
}

// ─────────────────────────────────────────────────────────────
//  Compliance
// ─────────────────────────────────────────────────────────────

/// One compliance formulation, as owned by an optimizer configuration.
///
/// Serializes through its record form, so it can be embedded in any serde
/// document. Both directions fail with the [`RecordError`] message instead
/// of writing or defaulting a different value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum Compliance {
    Nominal(ComplianceNominal),
    Mu(ComplianceMu),
    PNorm(CompliancePNorm),
    SmoothTheta(ComplianceSmoothTheta),
}

impl Compliance {
    /// Which formulation this is.
    pub fn kind(&self) -> ComplianceKind {
        match self {
            Self::Nominal(_) => ComplianceKind::Nominal,
            Self::Mu(_) => ComplianceKind::Mu,
            Self::PNorm(_) => ComplianceKind::PNorm,
            Self::SmoothTheta(_) => ComplianceKind::SmoothTheta,
        }
    }

    /// Stable serialization key.
    pub fn key(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn parameters(&self) -> Parameters {
        match self {
            Self::Nominal(v) => v.parameters(),
            Self::Mu(v) => v.parameters(),
            Self::PNorm(v) => v.parameters(),
            Self::SmoothTheta(v) => v.parameters(),
        }
    }

    pub fn to_record(&self) -> Value {
        match self {
            Self::Nominal(v) => v.to_record(),
            Self::Mu(v) => v.to_record(),
            Self::PNorm(v) => v.to_record(),
            Self::SmoothTheta(v) => v.to_record(),
        }
    }

    pub fn check_finite(&self) -> Result<(), RecordError> {
        match self {
            Self::Nominal(v) => v.check_finite(),
            Self::Mu(v) => v.check_finite(),
            Self::PNorm(v) => v.check_finite(),
            Self::SmoothTheta(v) => v.check_finite(),
        }
    }

    /// The record, or `NonFiniteParameter` if it could not be reloaded.
    pub fn try_to_record(&self) -> Result<Value, RecordError> {
        self.check_finite()?;
        Ok(self.to_record())
    }

    /// Reconstruct a formulation from its record.
    ///
    /// # Errors
    ///
    /// See [`registry::from_record`].
    pub fn from_record(record: &Value) -> Result<Self, RecordError> {
        registry::from_record(record)
    }
}

impl Default for Compliance {
    fn default() -> Self {
        Self::Nominal(ComplianceNominal)
    }
}

impl From<ComplianceNominal> for Compliance {
    fn from(v: ComplianceNominal) -> Self {
        Self::Nominal(v)
    }
}

impl From<ComplianceMu> for Compliance {
    fn from(v: ComplianceMu) -> Self {
        Self::Mu(v)
    }
}

impl From<CompliancePNorm> for Compliance {
    fn from(v: CompliancePNorm) -> Self {
        Self::PNorm(v)
    }
}

impl From<ComplianceSmoothTheta> for Compliance {
    fn from(v: ComplianceSmoothTheta) -> Self {
        Self::SmoothTheta(v)
    }
}

impl Serialize for Compliance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.try_to_record()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl TryFrom<Value> for Compliance {
    type Error = RecordError;

    fn try_from(record: Value) -> Result<Self, Self::Error> {
        Self::from_record(&record)
    }
}

impl std::fmt::Display for Compliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())?;
        let params = self.parameters();
        if !params.is_empty() {
            let rendered: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "({})", rendered.join(", "))?;
        }
        Ok(())
    }
}
