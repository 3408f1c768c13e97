//! Match endpoints

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
};

use super::extract::{ApiJson, ApiPath};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::MatchId;
use crate::error::AppError;
use crate::metrics::{MATCHES_CREATED_TOTAL, MATCHES_DELETED_TOTAL};
use crate::service::{CreateMatchRequest, DeleteMatchRequest, FindMatchByIdRequest, MatchResponse};

/// Create match router
///
/// Reads are public; create and delete resolve the caller from the
/// session token before touching the store.
pub fn matches_router() -> Router<AppState> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route("/matches/:id", get(get_match).delete(delete_match))
}

/// GET /api/matches
async fn list_matches(State(state): State<AppState>) -> Result<Json<Vec<MatchResponse>>, AppError> {
    let matches = state.matches.find_all_matches().await?;
    Ok(Json(matches))
}

/// GET /api/matches/:id
async fn get_match(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MatchId>,
) -> Result<Json<MatchResponse>, AppError> {
    let found = state
        .matches
        .find_match_by_id(FindMatchByIdRequest { match_id: id })
        .await?;
    Ok(Json(found))
}

/// POST /api/matches
async fn create_match(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ApiJson(request): ApiJson<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>), AppError> {
    let created = state.matches.create_match(&caller, request).await?;

    MATCHES_CREATED_TOTAL
        .with_label_values(&[created.category.as_str()])
        .inc();

    Ok((StatusCode::CREATED, Json(MatchResponse::from(created))))
}

/// DELETE /api/matches/:id
async fn delete_match(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ApiPath(id): ApiPath<MatchId>,
) -> Result<StatusCode, AppError> {
    state
        .matches
        .delete_match(&caller, DeleteMatchRequest { match_id: id })
        .await?;

    MATCHES_DELETED_TOTAL.inc();

    Ok(StatusCode::NO_CONTENT)
}
