//! Constants used throughout the dxassist core crate.
//!
//! Column headers for the initial patient CSV and defaults applied when a form
//! leaves an optional field blank.

/// Default file name for the initial patient data load.
pub const DEFAULT_PATIENT_CSV: &str = "hypothetical_patient_data.csv";

/// CSV header for the patient identifier column.
pub const COL_ID: &str = "ID";
pub const COL_AGE: &str = "Age";
pub const COL_GENDER: &str = "Gender";
pub const COL_HEIGHT: &str = "Height (cm)";
pub const COL_WEIGHT: &str = "Weight (kg)";
pub const COL_BMI: &str = "BMI";
/// Composite "systolic/diastolic" blood pressure column.
pub const COL_BP: &str = "BP";
pub const COL_SYMPTOMS: &str = "Symptoms";
pub const COL_MEDICATION_HISTORY: &str = "Medication History";

/// Every column of the patient CSV, in the order the data generator writes
/// them.
pub const CSV_HEADERS: [&str; 9] = [
    COL_ID,
    COL_AGE,
    COL_GENDER,
    COL_HEIGHT,
    COL_WEIGHT,
    COL_BMI,
    COL_BP,
    COL_SYMPTOMS,
    COL_MEDICATION_HISTORY,
];

/// Medication history stored when a form leaves the field blank.
pub const DEFAULT_MEDICATION_HISTORY: &str = "None";

/// First identifier handed out by an empty store.
pub const FIRST_PATIENT_ID: u64 = 1;
