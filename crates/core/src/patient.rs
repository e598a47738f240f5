//! Patient record types and form coercion.
//!
//! A [`PatientRecord`] is the only entity the dashboard manages. Forms arrive
//! from the browser as loosely typed text; [`PatientForm::into_fields`] coerces
//! them into [`PatientFields`] and reports the first field that fails.

use crate::constants::DEFAULT_MEDICATION_HISTORY;
use crate::{PatientError, PatientResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the store on creation.
pub type PatientId = u64;

/// A systolic/diastolic pair, written as `"130/85"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
}

impl FromStr for BloodPressure {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sys, dia) = s.trim().split_once('/').ok_or_else(|| {
            PatientError::validation("blood_pressure", "expected \"systolic/diastolic\"")
        })?;

        let systolic = parse_positive_u32("systolic", sys)?;
        let diastolic = parse_positive_u32("diastolic", dia)?;

        Ok(Self {
            systolic,
            diastolic,
        })
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Everything about a patient except the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFields {
    pub age: u32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Supplied or derived; not kept consistent with height and weight.
    pub bmi: f64,
    pub systolic: u32,
    pub diastolic: u32,
    pub symptoms: String,
    pub medication_history: String,
}

impl PatientFields {
    /// Checks the numeric ranges the store relies on.
    ///
    /// Ages are unsigned so only the floating-point and blood pressure fields
    /// need checking here. No cross-field checks are made.
    pub fn validate(&self) -> PatientResult<()> {
        check_positive_f64("height_cm", self.height_cm)?;
        check_positive_f64("weight_kg", self.weight_kg)?;
        if !self.bmi.is_finite() {
            return Err(PatientError::validation("bmi", "must be a finite number"));
        }
        if self.systolic == 0 {
            return Err(PatientError::validation("systolic", "must be greater than zero"));
        }
        if self.diastolic == 0 {
            return Err(PatientError::validation("diastolic", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn blood_pressure(&self) -> BloodPressure {
        BloodPressure {
            systolic: self.systolic,
            diastolic: self.diastolic,
        }
    }
}

/// A stored patient: the assigned identifier plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: PatientId,
    #[serde(flatten)]
    pub fields: PatientFields,
}

/// Raw create/edit form as submitted by the dashboard.
///
/// Every field is text; JSON numbers are accepted and turned into text so API
/// callers may send either. Missing fields deserialise as blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct PatientForm {
    #[serde(deserialize_with = "lenient_text")]
    pub age: String,
    #[serde(deserialize_with = "lenient_text")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_text")]
    pub height_cm: String,
    #[serde(deserialize_with = "lenient_text")]
    pub weight_kg: String,
    /// Blank means "derive from height and weight".
    #[serde(deserialize_with = "lenient_text")]
    pub bmi: String,
    /// `"systolic/diastolic"`.
    #[serde(deserialize_with = "lenient_text")]
    pub blood_pressure: String,
    #[serde(deserialize_with = "lenient_text")]
    pub symptoms: String,
    #[serde(deserialize_with = "lenient_text")]
    pub medication_history: String,
}

impl PatientForm {
    /// Coerces the form into typed fields.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` naming the first field that cannot be
    /// coerced or is out of range.
    pub fn into_fields(self) -> PatientResult<PatientFields> {
        let age = parse_u32("age", &self.age)?;
        let height_cm = parse_positive_f64("height_cm", &self.height_cm)?;
        let weight_kg = parse_positive_f64("weight_kg", &self.weight_kg)?;

        let bmi = if self.bmi.trim().is_empty() {
            compute_bmi(height_cm, weight_kg)
        } else {
            parse_f64("bmi", &self.bmi)?
        };

        let bp: BloodPressure = self.blood_pressure.parse()?;

        let medication_history = match self.medication_history.trim() {
            "" => DEFAULT_MEDICATION_HISTORY.to_string(),
            meds => meds.to_string(),
        };

        let fields = PatientFields {
            age,
            gender: self.gender.trim().to_string(),
            height_cm,
            weight_kg,
            bmi,
            systolic: bp.systolic,
            diastolic: bp.diastolic,
            symptoms: self.symptoms.trim().to_string(),
            medication_history,
        };
        fields.validate()?;
        Ok(fields)
    }
}

/// Body mass index from height in centimetres and weight in kilograms,
/// rounded to two decimal places.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 100.0).round() / 100.0
}

pub(crate) fn parse_u32(field: &'static str, raw: &str) -> PatientResult<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PatientError::validation(field, "is required"));
    }
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(value);
    }

    // Numeric inputs in browsers often submit "45.0".
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => {
            Ok(v as u32)
        }
        _ => Err(PatientError::validation(
            field,
            format!("expected a non-negative whole number, got {raw:?}"),
        )),
    }
}

pub(crate) fn parse_positive_u32(field: &'static str, raw: &str) -> PatientResult<u32> {
    let value = parse_u32(field, raw)?;
    if value == 0 {
        return Err(PatientError::validation(field, "must be greater than zero"));
    }
    Ok(value)
}

pub(crate) fn parse_f64(field: &'static str, raw: &str) -> PatientResult<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PatientError::validation(field, "is required"));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PatientError::validation(
            field,
            format!("expected a number, got {raw:?}"),
        )),
    }
}

pub(crate) fn parse_positive_f64(field: &'static str, raw: &str) -> PatientResult<f64> {
    let value = parse_f64(field, raw)?;
    check_positive_f64(field, value)?;
    Ok(value)
}

fn check_positive_f64(field: &'static str, value: f64) -> PatientResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PatientError::validation(
            field,
            "must be a positive number",
        ))
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(i)) => i.to_string(),
        Some(Raw::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
