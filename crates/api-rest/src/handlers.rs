//! JSON endpoints behind the dashboard.

use crate::error::ApiError;
use crate::state::AppState;
use crate::view::PatientDetailRes;
use api_shared::{
    DeletePatientRes, ErrorRes, HealthRes, HealthService, ListPatientsRes, Patient, PatientForm,
    SuggestionRes,
};
use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};
use dxassist_core::PatientId;
use dxassist_suggest::ProviderError;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness plus the number of loaded patients and whether the AI button
/// will work.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthRes>, ApiError> {
    let patients = state.read_store()?.len();
    Ok(Json(HealthService::check_health(
        patients,
        state.requester().is_some(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "All patients in insertion order", body = ListPatientsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<ListPatientsRes>, ApiError> {
    let patients = state.read_store()?.list().map(Patient::from).collect();
    Ok(Json(ListPatientsRes { patients }))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = PatientForm,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 422, description = "A form field failed validation", body = ErrorRes)
    )
)]
/// Create a patient from the "+ New" or "copy" form
///
/// Blank BMI is derived from height and weight; blank medication history is
/// stored as "None".
///
/// # Errors
/// Returns `422 Unprocessable Entity` naming the first invalid field.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(form): Json<PatientForm>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let fields = form.into_fields()?;
    let mut store = state.write_store()?;
    let id = store.add(fields)?;
    let patient = Patient::from(store.get(id)?);
    tracing::info!("created patient {}", id);
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = u64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient with card data", body = PatientDetailRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<PatientId>,
) -> Result<Json<PatientDetailRes>, ApiError> {
    let store = state.read_store()?;
    let record = store.get(id)?;
    Ok(Json(PatientDetailRes::from(record)))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(("id" = u64, Path, description = "Patient identifier")),
    request_body = PatientForm,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 422, description = "A form field failed validation", body = ErrorRes)
    )
)]
/// Replace every field of an existing patient; the id never changes.
///
/// # Errors
/// Returns `404 Not Found` before looking at the form if `id` is unknown,
/// otherwise `422` for an invalid form.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<PatientId>,
    Json(form): Json<PatientForm>,
) -> Result<Json<Patient>, ApiError> {
    let mut store = state.write_store()?;
    store.get(id)?;
    let fields = form.into_fields()?;
    let record = store.update(id, fields)?;
    tracing::info!("updated patient {}", id);
    Ok(Json(Patient::from(record)))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(("id" = u64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient deleted", body = DeletePatientRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<PatientId>,
) -> Result<Json<DeletePatientRes>, ApiError> {
    let removed = state.write_store()?.delete(id)?;
    tracing::info!("deleted patient {}", removed.id);
    Ok(Json(DeletePatientRes {
        id: removed.id,
        deleted: true,
    }))
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/suggestion",
    params(("id" = u64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Suggested diagnosis and medication", body = SuggestionRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 409, description = "A suggestion for this patient is already running", body = ErrorRes),
        (status = 502, description = "The AI provider failed", body = ErrorRes),
        (status = 503, description = "No AI provider is configured", body = ErrorRes)
    )
)]
/// Ask the AI provider for a diagnosis and medication suggestion
///
/// The record is copied out of the store before the provider is called, so
/// edits made while waiting do not affect this request and a failed call
/// leaves the store as it was. Suggestions are returned, never stored.
///
/// # Errors
/// - `404` if the patient does not exist,
/// - `409` if a request for the same patient is still outstanding,
/// - `502` for any provider failure, `503` if no provider is configured.
#[axum::debug_handler]
pub async fn request_suggestion(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<PatientId>,
) -> Result<Json<SuggestionRes>, ApiError> {
    let record = state.read_store()?.get(id)?.clone();

    let requester = state.requester().ok_or_else(|| {
        ProviderError::NotConfigured("GOOGLE_API_KEY is not set".into())
    })?;

    let _busy = state
        .in_flight()
        .try_acquire(id)
        .ok_or(ApiError::InFlight(id))?;

    tracing::info!("requesting suggestion for patient {}", id);
    let result = requester.request_suggestion(&record).await?;

    Ok(Json(SuggestionRes::new(
        id,
        requester.provider_name(),
        result.diagnosis,
        result.medication,
    )))
}
