use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::{
    dto::{common::ErrorResponse, filter::FilterQuery, game::GameResponse, report::GroupStatsResponse},
    error::AppError,
    services::catalog_service,
    state::SharedState,
};

/// Read-only reporting endpoints, mounted under `/api`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/top-rated", get(top_rated))
        .route("/top-worst", get(worst_rated))
        .route("/filter", get(filter_games))
        .route("/stats/developers", get(developer_stats))
        .route("/stats/publishers", get(publisher_stats))
}

/// Highest rated games, best first.
#[utoipa::path(
    get,
    path = "/api/top-rated",
    tag = "reports",
    responses((status = 200, description = "Best rated games", body = [GameResponse]))
)]
pub async fn top_rated(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(catalog_service::top_rated(&state).await?))
}

/// Lowest rated games, worst first.
#[utoipa::path(
    get,
    path = "/api/top-worst",
    tag = "reports",
    responses((status = 200, description = "Worst rated games", body = [GameResponse]))
)]
pub async fn worst_rated(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(catalog_service::worst_rated(&state).await?))
}

/// Games matching every supplied query parameter; no parameters returns the whole catalog.
#[utoipa::path(
    get,
    path = "/api/filter",
    tag = "reports",
    params(FilterQuery),
    responses(
        (status = 200, description = "Matching games", body = [GameResponse]),
        (status = 400, description = "Malformed parameter", body = ErrorResponse)
    )
)]
pub async fn filter_games(
    State(state): State<SharedState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(Json(catalog_service::filter_games(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/developers",
    tag = "reports",
    responses((status = 200, description = "Per-developer statistics", body = [GroupStatsResponse]))
)]
pub async fn developer_stats(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GroupStatsResponse>>, AppError> {
    Ok(Json(catalog_service::developer_stats(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/publishers",
    tag = "reports",
    responses((status = 200, description = "Per-publisher statistics", body = [GroupStatsResponse]))
)]
pub async fn publisher_stats(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GroupStatsResponse>>, AppError> {
    Ok(Json(catalog_service::publisher_stats(&state).await?))
}
