use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    divisions::{advance_bracket, draw_division, get_division, list_divisions, start_match},
    intake::receive_sms,
    reports::{approve_report, list_pending, reject_report, request_clarification},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sms", post(receive_sms))
        .route("/api/reports/pending", get(list_pending))
        .route("/api/reports/:id/approve", post(approve_report))
        .route("/api/reports/:id/reject", post(reject_report))
        .route("/api/reports/:id/clarify", post(request_clarification))
        .route("/api/divisions", get(list_divisions))
        .route("/api/divisions/:id", get(get_division))
        .route("/api/divisions/:id/draw", post(draw_division))
        .route("/api/brackets/:id/advance", post(advance_bracket))
        .route("/api/matches/:id/start", post(start_match))
        .with_state(state)
}
