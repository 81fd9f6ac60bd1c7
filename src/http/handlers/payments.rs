use crate::domain::payment::PaymentRequest;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

/// Acceptance is decoupled from delivery: the payment is handed to the
/// router in the background and the caller always gets 204. Beyond JSON
/// shape, no inbound validation is enforced here; see DESIGN.md.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<PaymentRequest>,
) -> impl IntoResponse {
    let router = state.router.clone();
    tokio::spawn(async move {
        router.process(req).await;
    });
    axum::http::StatusCode::NO_CONTENT
}
