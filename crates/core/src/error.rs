use crate::patient::PatientId;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("patient {0} not found")]
    NotFound(PatientId),
    #[error("no patient identifiers left")]
    IdsExhausted,
    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to parse patient CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl PatientError {
    /// Shorthand for a [`PatientError::Validation`] on a named form field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
