use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        common::{ErrorResponse, MessageResponse},
        game::{GamePatchRequest, GameResponse, NewGameRequest},
    },
    error::AppError,
    services::catalog_service,
    state::SharedState,
};

/// CRUD endpoints over the catalog, mounted under `/api`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
}

/// Return every game in the catalog.
#[utoipa::path(
    get,
    path = "/api/games",
    tag = "games",
    responses(
        (status = 200, description = "All games", body = [GameResponse]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(catalog_service::list_games(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/games",
    tag = "games",
    request_body = NewGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameResponse),
        (status = 400, description = "Invalid payload or failed insert", body = ErrorResponse)
    )
)]
/// Add a game; the response carries the identifier assigned by storage.
pub async fn create_game(
    State(state): State<SharedState>,
    payload: Result<Json<NewGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let created = catalog_service::create_game(&state, request)
        .await
        .map_err(AppError::rejected_write)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game to retrieve")),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 404, description = "Unknown identifier", body = MessageResponse)
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(catalog_service::get_game(&state, id).await?))
}

/// Overwrite the fields present in the body, leaving the others untouched.
#[utoipa::path(
    put,
    path = "/api/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game to update")),
    request_body = GamePatchRequest,
    responses(
        (status = 200, description = "Updated game", body = GameResponse),
        (status = 400, description = "Invalid payload or failed update", body = ErrorResponse),
        (status = 404, description = "Unknown identifier", body = MessageResponse)
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<GamePatchRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let updated = catalog_service::update_game(&state, id, request)
        .await
        .map_err(AppError::rejected_write)?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game to delete")),
    responses(
        (status = 200, description = "Game deleted", body = MessageResponse),
        (status = 404, description = "Unknown identifier", body = MessageResponse)
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    catalog_service::delete_game(&state, id).await?;
    Ok(Json(MessageResponse::new("DELETED")))
}
