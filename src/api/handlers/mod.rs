use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;

use crate::api::models::ErrorResponse;
use crate::database::DbPool;
use crate::errors::TournamentError;
use crate::services::draw::DrawService;
use crate::services::progression::ProgressionService;
use crate::services::reports::ReportService;

pub mod divisions;
pub mod intake;
pub mod reports;

pub struct AppState {
    pub pool: DbPool,
    pub reports: ReportService,
    pub draw: DrawService,
    pub progression: ProgressionService,
}

pub fn status_for(err: &TournamentError) -> StatusCode {
    match err {
        TournamentError::NotFound { .. } | TournamentError::NoActiveMatch { .. } => StatusCode::NOT_FOUND,
        TournamentError::MatchAlreadyRecorded { .. } | TournamentError::ReportAlreadyResolved { .. } => {
            StatusCode::CONFLICT
        }
        TournamentError::RoundIncomplete { .. }
        | TournamentError::InvalidScore(_)
        | TournamentError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TournamentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: TournamentError) -> Response {
    let status = status_for(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {:?}", err);
    }
    (status, Json(ErrorResponse { error: err.to_string() })).into_response()
}
