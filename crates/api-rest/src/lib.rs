//! # API REST
//!
//! HTTP surface of the patient dashboard.
//!
//! Handles:
//! - The embedded single-page dashboard at `/`
//! - JSON endpoints for patient CRUD and AI suggestions
//! - OpenAPI document and Swagger UI (utoipa)
//! - Error-to-status mapping and CORS
//!
//! Uses `api-shared` for wire types, `dxassist-core` for the store and
//! `dxassist-suggest` for the provider call.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod state;
mod ui;
pub mod view;

pub use error::ApiError;
pub use state::{AppState, InFlight, InFlightGuard};

use api_shared::{
    DeletePatientRes, ErrorRes, HealthRes, ListPatientsRes, Patient, PatientForm, SuggestionRes,
};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use view::{BloodPressureBars, BmiCategory, BmiGauge, PatientDetailRes, PatientView};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_patients,
        handlers::create_patient,
        handlers::get_patient,
        handlers::update_patient,
        handlers::delete_patient,
        handlers::request_suggestion,
    ),
    components(schemas(
        HealthRes,
        ListPatientsRes,
        Patient,
        PatientForm,
        PatientDetailRes,
        PatientView,
        BmiGauge,
        BmiCategory,
        BloodPressureBars,
        DeletePatientRes,
        SuggestionRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the dashboard router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::serve_dashboard))
        .route("/health", get(handlers::health))
        .route(
            "/api/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/api/patients/:id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route(
            "/api/patients/:id/suggestion",
            post(handlers::request_suggestion),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
