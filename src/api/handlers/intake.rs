use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{SmsReply, SmsRequest};
use crate::errors::TournamentError;
use crate::workflow::messages;

/// SMS gateway webhook. Sender-facing failures still answer 200 so the
/// gateway relays the reply text.
pub async fn receive_sms(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SmsRequest>,
) -> impl IntoResponse {
    let reply = match state.reports.submit(request.from.trim(), &request.body) {
        Ok(submission) => SmsReply {
            reply: submission.message,
            report_id: Some(submission.report.id),
            applied: submission.applied,
        },
        Err(e) if e.is_user_facing() => SmsReply {
            reply: sender_message(&e),
            report_id: None,
            applied: false,
        },
        Err(e) => return error_response(e),
    };

    Json(reply).into_response()
}

fn sender_message(err: &TournamentError) -> String {
    match err {
        TournamentError::MatchAlreadyRecorded { .. } => messages::already_recorded(),
        _ => messages::no_active_match(),
    }
}
