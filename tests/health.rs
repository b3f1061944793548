use std::sync::Arc;

use axum::extract::State;
use nutthings_storefront::{mail::RecordingMailer, routes::health::health_check, state::AppState};

#[tokio::test]
async fn health_check_returns_ok() -> anyhow::Result<()> {
    let state = AppState::for_tests("postgres://localhost/none", Arc::new(RecordingMailer::new()))?;
    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.cached_pages, 0);
    assert!(data.mail_configured);
    Ok(())
}
