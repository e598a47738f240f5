use api_shared::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use dxassist_core::{PatientError, PatientId};
use dxassist_suggest::ProviderError;

/// Everything a handler can fail with, mapped to an HTTP status in
/// [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Patient(#[from] PatientError),
    #[error("suggestion provider failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("a suggestion for patient {0} is already in progress")]
    InFlight(PatientId),
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Patient(PatientError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Patient(PatientError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Patient(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Provider(ProviderError::NotConfigured(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
            ApiError::InFlight(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Patient(PatientError::Validation { field, .. }) => ErrorRes {
                error: self.to_string(),
                field: Some((*field).to_string()),
            },
            // File and CSV failures only happen at startup; never echo them.
            ApiError::Patient(PatientError::FileRead(_) | PatientError::Csv(_)) => ErrorRes {
                error: "Internal error".into(),
                field: None,
            },
            _ => ErrorRes {
                error: self.to_string(),
                field: None,
            },
        };

        if status.is_server_error() {
            tracing::error!("{} {}", status.as_u16(), self);
        } else {
            tracing::warn!("{} {}", status.as_u16(), self);
        }

        (status, Json(body)).into_response()
    }
}
