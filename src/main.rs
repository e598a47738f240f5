use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use dxassist_core::{load_patients_csv, CoreConfig};
use dxassist_suggest::{ProviderError, SuggestConfig, SuggestionRequester};

/// Main entry point for the dxassist dashboard
///
/// Loads the initial patient CSV, configures the Gemini client and serves
/// the dashboard plus its JSON API until Ctrl-C.
///
/// # Environment Variables
/// - `DXASSIST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENT_CSV`: Initial patient data (default: "hypothetical_patient_data.csv")
/// - `GOOGLE_API_KEY`: Gemini credential; suggestions are disabled without it
/// - `GEMINI_MODEL`, `GEMINI_BASE_URL`, `GEMINI_TIMEOUT_SECS`: provider overrides
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the patient file exists but cannot be read,
/// - a provider setting is malformed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dxassist=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("DXASSIST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let core_cfg = CoreConfig::from_env_value(std::env::var("PATIENT_CSV").ok());
    let store = load_patients_csv(core_cfg.patient_csv())?;

    let suggest_cfg = SuggestConfig::from_env_values(
        std::env::var("GOOGLE_API_KEY").ok(),
        std::env::var("GEMINI_MODEL").ok(),
        std::env::var("GEMINI_BASE_URL").ok(),
        std::env::var("GEMINI_TIMEOUT_SECS").ok(),
    )?;
    tracing::debug!("suggestion config: {:?}", suggest_cfg);

    let requester = match SuggestionRequester::gemini(&suggest_cfg) {
        Ok(requester) => {
            tracing::info!("AI suggestions enabled ({})", suggest_cfg.model());
            Some(requester)
        }
        Err(ProviderError::NotConfigured(reason)) => {
            tracing::warn!("AI suggestions disabled: {}", reason);
            None
        }
        Err(e) => return Err(e.into()),
    };

    let app = router(AppState::new(store, requester));

    tracing::info!("++ Starting dxassist on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("dxassist stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
