use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{AdvanceResponse, ApprovalResponse, ApproveRequest, MatchItem, RejectRequest, ReportItem};
use crate::errors::TournamentError;

pub async fn list_pending(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.reports.open_reports() {
        Ok(open) => Json(open.into_iter().map(ReportItem::from).collect::<Vec<_>>()).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn approve_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<i64>,
    body: Option<Json<ApproveRequest>>,
) -> impl IntoResponse {
    let Json(request) = body.unwrap_or_default();

    let override_scores = match (request.player1_score, request.player2_score) {
        (Some(a), Some(b)) => Some((a, b)),
        (None, None) => None,
        _ => {
            return error_response(TournamentError::InvalidInput(
                "Override needs both scores".to_string(),
            ));
        }
    };

    let result = if request.correction {
        state.reports.approve_correction(report_id, override_scores)
    } else {
        state.reports.approve(report_id, override_scores)
    };

    match result {
        Ok(approval) => Json(ApprovalResponse {
            report: approval.report.into(),
            match_record: MatchItem::from(approval.match_record),
            correction: approval.correction,
            advance: approval.advance.map(AdvanceResponse::from),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn reject_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<i64>,
    body: Option<Json<RejectRequest>>,
) -> impl IntoResponse {
    let Json(request) = body.unwrap_or_default();

    match state.reports.reject(report_id, request.reason.as_deref()) {
        Ok(report) => Json(ReportItem::from(report)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn request_clarification(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<i64>,
) -> impl IntoResponse {
    match state.reports.request_clarification(report_id) {
        Ok(report) => Json(ReportItem::from(report)).into_response(),
        Err(e) => error_response(e),
    }
}
