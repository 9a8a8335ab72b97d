//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;

use crate::state::AppState;

/// `GET /ready`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Ping MongoDB; 503 while it is unreachable
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let client = state.mongo_client.clone();
    let mongodb: HealthCheckFuture<'_> = Box::pin(async move {
        let status = check_health_detailed(&client).await;
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
        }
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}
