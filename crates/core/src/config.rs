//! Core runtime configuration.
//!
//! Resolved once at process startup and passed into the store loader. Request
//! handlers never read environment variables.

use crate::constants::DEFAULT_PATIENT_CSV;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_csv: PathBuf,
}

impl CoreConfig {
    pub fn new(patient_csv: PathBuf) -> Self {
        Self { patient_csv }
    }

    /// Builds the config from an optional `PATIENT_CSV` value.
    ///
    /// Blank or absent values fall back to [`DEFAULT_PATIENT_CSV`] in the
    /// working directory.
    pub fn from_env_value(patient_csv: Option<String>) -> Self {
        let path = patient_csv
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PATIENT_CSV.into());

        Self::new(PathBuf::from(path))
    }

    /// Path of the optional initial data file.
    pub fn patient_csv(&self) -> &Path {
        &self.patient_csv
    }
}
