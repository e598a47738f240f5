//! Request and response bodies for the dashboard's JSON endpoints.

use dxassist_core::{PatientId, PatientRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use dxassist_core::PatientForm;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub patients: usize,
    pub suggestions_enabled: bool,
}

/// One patient as shown in lists and detail panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: PatientId,
    pub age: u32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub systolic: u32,
    pub diastolic: u32,
    /// `"systolic/diastolic"`, ready for form prefill.
    pub blood_pressure: String,
    pub symptoms: String,
    pub medication_history: String,
}

impl From<&PatientRecord> for Patient {
    fn from(record: &PatientRecord) -> Self {
        let f = &record.fields;
        Self {
            id: record.id,
            age: f.age,
            gender: f.gender.clone(),
            height_cm: f.height_cm,
            weight_kg: f.weight_kg,
            bmi: f.bmi,
            systolic: f.systolic,
            diastolic: f.diastolic,
            blood_pressure: f.blood_pressure().to_string(),
            symptoms: f.symptoms.clone(),
            medication_history: f.medication_history.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletePatientRes {
    pub id: PatientId,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuggestionRes {
    pub patient_id: PatientId,
    pub diagnosis: String,
    pub medication: String,
    /// Provider that produced the reply, e.g. "gemini".
    pub provider: String,
}

impl SuggestionRes {
    pub fn new(
        patient_id: PatientId,
        provider: &str,
        diagnosis: String,
        medication: String,
    ) -> Self {
        Self {
            patient_id,
            diagnosis,
            medication,
            provider: provider.to_string(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    /// Form field at fault, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
