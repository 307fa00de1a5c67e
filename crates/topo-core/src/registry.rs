//! # Variant Registry — Key-Based Dispatch
//!
//! Maps the stable key of a compliance record to the constructor of the
//! matching variant. The table is a `static` array fixed at compile time;
//! it is never mutated and needs no locking.
//!
//! ## Dispatch Rules
//!
//! 1. The record must be a JSON object with a string `key`.
//! 2. The key must be registered. Unknown keys are an error, never a
//!    fallback to `nominal`.
//! 3. The variant reads exactly its declared parameters. A missing declared
//!    parameter is an error.
//! 4. Undeclared extra parameters are ignored (logged at `debug`).

use std::str::FromStr;

use serde_json::Value;

use crate::compliance::{
    json_type_name, Compliance, ComplianceMu, ComplianceNominal, CompliancePNorm,
    ComplianceSmoothTheta, ComplianceVariant, ParameterReader,
};
use crate::error::RecordError;

/// The registered compliance formulations.
///
/// | Kind | Key | Parameters |
/// |------|-----|------------|
/// | Nominal | `nominal` | — |
/// | Mu | `mu` | `beta` |
/// | PNorm | `p_norm` | `p` |
/// | SmoothTheta | `smooth_theta` | `theta_r`, `beta` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplianceKind {
    Nominal,
    Mu,
    PNorm,
    SmoothTheta,
}

type Constructor = fn(&ParameterReader<'_>) -> Result<Compliance, RecordError>;

fn construct<V>(reader: &ParameterReader<'_>) -> Result<Compliance, RecordError>
where
    V: ComplianceVariant + Into<Compliance>,
{
    V::from_parameters(reader).map(Into::into)
}

static REGISTRY: [(ComplianceKind, Constructor); 4] = [
    (ComplianceKind::Nominal, construct::<ComplianceNominal>),
    (ComplianceKind::Mu, construct::<ComplianceMu>),
    (ComplianceKind::PNorm, construct::<CompliancePNorm>),
    (ComplianceKind::SmoothTheta, construct::<ComplianceSmoothTheta>),
];

impl ComplianceKind {
    /// All kinds in registry order.
    pub fn all() -> &'static [ComplianceKind] {
        &[Self::Nominal, Self::Mu, Self::PNorm, Self::SmoothTheta]
    }

    /// The record key for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nominal => ComplianceNominal::KEY,
            Self::Mu => ComplianceMu::KEY,
            Self::PNorm => CompliancePNorm::KEY,
            Self::SmoothTheta => ComplianceSmoothTheta::KEY,
        }
    }

    /// Parameter names the variant reads, in record order.
    pub fn declared_parameters(&self) -> &'static [&'static str] {
        match self {
            Self::Nominal => ComplianceNominal::PARAMETERS,
            Self::Mu => ComplianceMu::PARAMETERS,
            Self::PNorm => CompliancePNorm::PARAMETERS,
            Self::SmoothTheta => ComplianceSmoothTheta::PARAMETERS,
        }
    }

    /// The variant with its default parameters.
    pub fn default_compliance(&self) -> Compliance {
        match self {
            Self::Nominal => ComplianceNominal.into(),
            Self::Mu => ComplianceMu::default().into(),
            Self::PNorm => CompliancePNorm::default().into(),
            Self::SmoothTheta => ComplianceSmoothTheta::default().into(),
        }
    }
}

impl std::fmt::Display for ComplianceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceKind {
    type Err = RecordError;

    /// Case-sensitive; accepts exactly the strings produced by [`ComplianceKind::as_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).map(|(kind, _)| kind)
    }
}

fn lookup(key: &str) -> Result<(ComplianceKind, Constructor), RecordError> {
    REGISTRY
        .iter()
        .copied()
        .find(|(kind, _)| kind.as_str() == key)
        .ok_or_else(|| RecordError::UnknownVariantKey {
            key: key.to_owned(),
        })
}

/// Reconstruct a compliance formulation from its record.
///
/// # Errors
///
/// - `MalformedRecord` if the record or its `parameters` field is not an object.
/// - `MissingKey` if there is no string `key`.
/// - `UnknownVariantKey` if the key is not registered.
/// - `MissingParameter` / `InvalidParameter` from the matched variant.
pub fn from_record(record: &Value) -> Result<Compliance, RecordError> {
    let fields = record
        .as_object()
        .ok_or_else(|| RecordError::MalformedRecord {
            reason: format!("expected an object, found {}", json_type_name(record)),
        })?;

    let key = match fields.get("key") {
        Some(Value::String(key)) => key.as_str(),
        _ => return Err(RecordError::MissingKey),
    };
    let (kind, constructor) = lookup(key)?;

    let params = match fields.get("parameters") {
        None | Some(Value::Null) => None,
        Some(Value::Object(params)) => Some(params),
        Some(other) => {
            return Err(RecordError::MalformedRecord {
                reason: format!(
                    "\"parameters\" of {key:?} must be an object, found {}",
                    json_type_name(other)
                ),
            })
        }
    };

    let reader = ParameterReader::new(kind.as_str(), params);
    let compliance = constructor(&reader)?;

    for field in reader.undeclared(kind.declared_parameters()) {
        tracing::debug!(key, field, "ignoring undeclared compliance parameter");
    }
    tracing::trace!(%compliance, "compliance record resolved");

    Ok(compliance)
}
