//! Card data for the patient detail panel.
//!
//! The dashboard draws its gauge and bars from these numbers so the
//! thresholds live in one place.

use api_shared::Patient;
use dxassist_core::PatientRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const BMI_AXIS_MIN: f64 = 10.0;
pub const BMI_AXIS_MAX: f64 = 40.0;

/// Full-scale values for the blood pressure bars.
pub const SYSTOLIC_SCALE: f64 = 200.0;
pub const DIASTOLIC_SCALE: f64 = 120.0;

const GREEN: &str = "#28a745";
const AMBER: &str = "#ffc107";
const RED: &str = "#dc3545";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn of(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BmiGauge {
    pub value: f64,
    pub axis_min: f64,
    pub axis_max: f64,
    /// Needle position along the axis, 0 to 100.
    pub percent: f64,
    pub category: BmiCategory,
    pub bar_color: String,
}

impl BmiGauge {
    pub fn new(bmi: f64) -> Self {
        let span = BMI_AXIS_MAX - BMI_AXIS_MIN;
        let percent = ((bmi - BMI_AXIS_MIN) / span * 100.0).clamp(0.0, 100.0);
        Self {
            value: bmi,
            axis_min: BMI_AXIS_MIN,
            axis_max: BMI_AXIS_MAX,
            percent,
            category: BmiCategory::of(bmi),
            bar_color: bar_color(bmi).to_string(),
        }
    }
}

/// Green inside 18.5..=24.9, amber inside 25..=29.9, red anywhere else
/// (including the small gaps between bands).
fn bar_color(bmi: f64) -> &'static str {
    if (18.5..=24.9).contains(&bmi) {
        GREEN
    } else if (25.0..=29.9).contains(&bmi) {
        AMBER
    } else {
        RED
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BloodPressureBars {
    pub systolic: u32,
    pub diastolic: u32,
    pub systolic_percent: f64,
    pub diastolic_percent: f64,
}

impl BloodPressureBars {
    pub fn new(systolic: u32, diastolic: u32) -> Self {
        Self {
            systolic,
            diastolic,
            systolic_percent: scale_percent(systolic, SYSTOLIC_SCALE),
            diastolic_percent: scale_percent(diastolic, DIASTOLIC_SCALE),
        }
    }
}

fn scale_percent(value: u32, full: f64) -> f64 {
    (f64::from(value) / full * 100.0).min(100.0)
}

/// Font Awesome icon name for the gender card.
pub fn gender_icon(gender: &str) -> &'static str {
    match gender.trim().to_ascii_lowercase().as_str() {
        "male" => "mars",
        "female" => "venus",
        _ => "neuter",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientView {
    pub bmi: BmiGauge,
    pub blood_pressure: BloodPressureBars,
    pub gender_icon: String,
}

impl From<&PatientRecord> for PatientView {
    fn from(record: &PatientRecord) -> Self {
        let f = &record.fields;
        Self {
            bmi: BmiGauge::new(f.bmi),
            blood_pressure: BloodPressureBars::new(f.systolic, f.diastolic),
            gender_icon: gender_icon(&f.gender).to_string(),
        }
    }
}

/// Response of `GET /api/patients/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDetailRes {
    pub patient: Patient,
    pub view: PatientView,
}

impl From<&PatientRecord> for PatientDetailRes {
    fn from(record: &PatientRecord) -> Self {
        Self {
            patient: Patient::from(record),
            view: PatientView::from(record),
        }
    }
}
