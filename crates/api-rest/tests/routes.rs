use api_rest::{router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use dxassist_core::{PatientForm, PatientStore};
use dxassist_suggest::{LlmProvider, ProviderError, SuggestionRequester};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct CannedLlm {
    reply: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl LlmProvider for CannedLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
    fn name(&self) -> &str {
        "canned"
    }
}

struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 500,
            body: "upstream exploded".into(),
        })
    }
    fn name(&self) -> &str {
        "failing"
    }
}

/// Holds every call open long enough for a second request to collide.
struct SlowLlm;

#[async_trait]
impl LlmProvider for SlowLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok("Diagnosis: Flu\nMedication: Rest".into())
    }
    fn name(&self) -> &str {
        "slow"
    }
}

fn form(age: &str, symptoms: &str) -> PatientForm {
    PatientForm {
        age: age.into(),
        gender: "Female".into(),
        height_cm: "165".into(),
        weight_kg: "60".into(),
        bmi: String::new(),
        blood_pressure: "120/80".into(),
        symptoms: symptoms.into(),
        medication_history: "None".into(),
    }
}

fn seeded_store() -> PatientStore {
    let mut store = PatientStore::new();
    store
        .add(form("45", "fatigue").into_fields().unwrap())
        .unwrap();
    store
        .add(form("60", "chest pain").into_fields().unwrap())
        .unwrap();
    store
}

fn app_with(provider: Option<Arc<dyn LlmProvider>>) -> Router {
    let requester = provider.map(SuggestionRequester::new);
    router(AppState::new(seeded_store(), requester))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_patients_and_provider() {
    let app = app_with(None);
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["patients"], 2);
    assert_eq!(body["suggestions_enabled"], false);
}

#[tokio::test]
async fn dashboard_is_served() {
    let app = app_with(None);
    let res = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Patient Dashboard"));
}

#[tokio::test]
async fn create_then_list_keeps_insertion_order() {
    let app = app_with(None);
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(json!({
            "age": 30, "gender": "Male", "height_cm": 180, "weight_kg": 81,
            "blood_pressure": "118/76", "symptoms": "cough", "medication_history": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 3);
    assert_eq!(created["bmi"], 25.0);
    assert_eq!(created["medication_history"], "None");

    let (_, list) = send(&app, Method::GET, "/api/patients", None).await;
    let ids: Vec<u64> = list["patients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn invalid_form_names_the_field() {
    let app = app_with(None);
    let bad = serde_json::to_value(form("forty", "x")).unwrap();
    let (status, body) = send(&app, Method::POST, "/api/patients", Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "age");

    let (_, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health["patients"], 2);
}

#[tokio::test]
async fn get_includes_card_view() {
    let app = app_with(None);
    let (status, body) = send(&app, Method::GET, "/api/patients/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["blood_pressure"], "120/80");
    assert_eq!(body["view"]["gender_icon"], "venus");
    assert_eq!(body["view"]["bmi"]["category"], "normal");
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() {
    let app = app_with(None);
    let body = serde_json::to_value(form("46", "fatigue, dizziness")).unwrap();
    let (status, updated) = send(&app, Method::PUT, "/api/patients/1", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["age"], 46);
    assert_eq!(updated["symptoms"], "fatigue, dizziness");
}

#[tokio::test]
async fn update_keeps_free_text_gender() {
    let app = app_with(None);
    let mut body = serde_json::to_value(form("45", "fatigue")).unwrap();
    body["gender"] = json!("M");
    let (status, updated) = send(&app, Method::PUT, "/api/patients/1", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["gender"], "M");

    let (_, detail) = send(&app, Method::GET, "/api/patients/1", None).await;
    assert_eq!(detail["patient"]["gender"], "M");
    assert_eq!(detail["view"]["gender_icon"], "neuter");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app_with(None);
    let body = serde_json::to_value(form("46", "x")).unwrap();

    let (status, _) = send(&app, Method::GET, "/api/patients/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::PUT, "/api/patients/99", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, err) = send(&app, Method::DELETE, "/api/patients/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "patient 99 not found");
}

#[tokio::test]
async fn delete_then_ids_are_not_reused() {
    let app = app_with(None);
    let (status, body) = send(&app, Method::DELETE, "/api/patients/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = send(&app, Method::GET, "/api/patients/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let new = serde_json::to_value(form("20", "rash")).unwrap();
    let (_, created) = send(&app, Method::POST, "/api/patients", Some(new)).await;
    assert_eq!(created["id"], 3);
}

#[tokio::test]
async fn suggestion_is_parsed_and_not_stored() {
    let llm = Arc::new(CannedLlm {
        reply: "**Suggested Diagnosis:** Iron deficiency anemia\n**Suggested Medication:** Ferrous sulfate",
        calls: AtomicUsize::new(0),
    });
    let app = app_with(Some(llm.clone() as Arc<dyn LlmProvider>));

    let (_, before) = send(&app, Method::GET, "/api/patients/1", None).await;
    let (status, body) = send(&app, Method::POST, "/api/patients/1/suggestion", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient_id"], 1);
    assert_eq!(body["diagnosis"], "Iron deficiency anemia");
    assert_eq!(body["medication"], "Ferrous sulfate");
    assert_eq!(body["provider"], "canned");
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);

    let (_, after) = send(&app, Method::GET, "/api/patients/1", None).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn provider_failure_is_bad_gateway_and_store_unchanged() {
    let app = app_with(Some(Arc::new(FailingLlm)));
    let (_, before) = send(&app, Method::GET, "/api/patients", None).await;

    let (status, body) = send(&app, Method::POST, "/api/patients/2/suggestion", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("500"));

    let (_, after) = send(&app, Method::GET, "/api/patients", None).await;
    assert_eq!(before, after);

    // The in-flight mark is released on failure.
    let (status, _) = send(&app, Method::POST, "/api/patients/2/suggestion", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn suggestion_without_provider_is_unavailable() {
    let app = app_with(None);
    let (status, _) = send(&app, Method::POST, "/api/patients/1/suggestion", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn suggestion_for_unknown_patient_is_not_found() {
    let app = app_with(Some(Arc::new(FailingLlm)));
    let (status, _) = send(&app, Method::POST, "/api/patients/42/suggestion", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_suggestion_for_same_patient_conflicts() {
    let app = app_with(Some(Arc::new(SlowLlm)));

    let first = {
        let app = app.clone();
        tokio::spawn(async move {
            send(&app, Method::POST, "/api/patients/1/suggestion", None).await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, _) = send(&app, Method::POST, "/api/patients/1/suggestion", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A different patient is not blocked.
    let (status, body) = send(&app, Method::POST, "/api/patients/2/suggestion", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diagnosis"], "Flu");

    let (status, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = app_with(None);
    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/patients/{id}/suggestion"].is_object());
    assert!(doc["paths"]["/api/patients"].is_object());
}
