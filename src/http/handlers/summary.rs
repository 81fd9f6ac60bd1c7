use crate::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn payments_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> impl IntoResponse {
    // Settle delay: give in-flight ledger writes a chance to land before the
    // snapshot is taken.
    tokio::time::sleep(std::time::Duration::from_millis(state.summary_settle_ms)).await;

    match state.ledger.summarize(params.from, params.to).await {
        Ok(summary) => (axum::http::StatusCode::OK, Json(summary)).into_response(),
        Err(err) => {
            tracing::error!("summary query failed: {}", err);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
