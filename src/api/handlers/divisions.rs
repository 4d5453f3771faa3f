use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{
    AdvanceRequest, AdvanceResponse, DivisionItem, DivisionResponse, DrawRequest, MatchItem, StartMatchRequest,
};
use crate::database::{self, divisions};
use crate::errors::TournamentError;
use crate::services::overview::load_overview;

pub async fn list_divisions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let listed = database::get_connection(&state.pool).and_then(|conn| divisions::list_all(&conn));

    match listed {
        Ok(all) => Json(all.into_iter().map(DivisionItem::from).collect::<Vec<_>>()).into_response(),
        Err(e) => error_response(TournamentError::Storage(e)),
    }
}

pub async fn get_division(
    State(state): State<Arc<AppState>>,
    Path(division_id): Path<i64>,
) -> impl IntoResponse {
    match load_overview(&state.pool, division_id) {
        Ok(overview) => Json(DivisionResponse::from(overview)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn draw_division(
    State(state): State<Arc<AppState>>,
    Path(division_id): Path<i64>,
    body: Option<Json<DrawRequest>>,
) -> impl IntoResponse {
    let Json(request) = body.unwrap_or_default();

    match state.draw.draw_division(division_id, request.seed) {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(outcome.matches.into_iter().map(MatchItem::from).collect::<Vec<_>>()),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn advance_bracket(
    State(state): State<Arc<AppState>>,
    Path(bracket_id): Path<i64>,
    body: Option<Json<AdvanceRequest>>,
) -> impl IntoResponse {
    let Json(request) = body.unwrap_or_default();

    match state.progression.advance_round(bracket_id, request.from_round) {
        Ok(outcome) => Json(AdvanceResponse::from(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn start_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    body: Option<Json<StartMatchRequest>>,
) -> impl IntoResponse {
    let Json(request) = body.unwrap_or_default();

    match state.progression.start_match(match_id, request.table_number) {
        Ok(started) => Json(MatchItem::from(started)).into_response(),
        Err(e) => error_response(e),
    }
}
