//! # dxassist Core
//!
//! Patient record model and the in-memory patient store.
//!
//! This crate contains pure data operations:
//! - Patient records, blood pressure parsing and form coercion
//! - The insertion-ordered [`PatientStore`] with monotonic identifiers
//! - Optional initial load from a CSV file
//!
//! **No API concerns**: HTTP handlers, AI provider calls and rendering belong in
//! `api-rest` and `dxassist-suggest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod patient;
pub mod store;

pub use config::CoreConfig;
pub use constants::{CSV_HEADERS, DEFAULT_PATIENT_CSV};
pub use error::{PatientError, PatientResult};
pub use loader::load_patients_csv;
pub use patient::{compute_bmi, BloodPressure, PatientFields, PatientForm, PatientId, PatientRecord};
pub use store::PatientStore;
