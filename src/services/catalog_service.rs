//! One function per catalog operation, each issuing a single storage call.

use tracing::{debug, info};
use validator::Validate;

use crate::{
    dao::models::{GameId, GamePatchEntity, NewGameEntity, ReleaseYear, ReleaseYearKind},
    dto::{
        filter::FilterQuery,
        game::{GamePatchRequest, GameResponse, NewGameRequest},
        report::GroupStatsResponse,
        validation::validate_release_year,
    },
    error::{GAME_NOT_FOUND, ServiceError},
    services::filter::GameFilter,
    state::SharedState,
};

/// Every game in storage order.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameResponse>, ServiceError> {
    let store = state.require_game_store().await?;
    let games = store.list_games().await?;
    Ok(games.into_iter().map(Into::into).collect())
}

pub async fn get_game(state: &SharedState, id: String) -> Result<GameResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(game) = store.find_game(GameId::new(id)).await? else {
        return Err(not_found());
    };
    Ok(game.into())
}

/// Validate and insert a new game; the backend assigns its identifier.
pub async fn create_game(
    state: &SharedState,
    request: NewGameRequest,
) -> Result<GameResponse, ServiceError> {
    request.validate()?;

    let mut game: NewGameEntity = request.into();
    game.release_year = canonical_year(game.release_year, state.config().release_year_kind)?;

    let store = state.require_game_store().await?;
    let created = store.insert_game(game).await?;
    info!(id = %created.id, title = %created.game_title, "game created");
    Ok(created.into())
}

/// Overwrite the provided fields of an existing game.
pub async fn update_game(
    state: &SharedState,
    id: String,
    request: GamePatchRequest,
) -> Result<GameResponse, ServiceError> {
    request.validate()?;

    let mut patch: GamePatchEntity = request.into();
    patch.release_year = canonical_year(patch.release_year, state.config().release_year_kind)?;

    let store = state.require_game_store().await?;
    let Some(updated) = store.update_game(GameId::new(id), patch).await? else {
        return Err(not_found());
    };
    info!(id = %updated.id, "game updated");
    Ok(updated.into())
}

pub async fn delete_game(state: &SharedState, id: String) -> Result<(), ServiceError> {
    let store = state.require_game_store().await?;
    let id = GameId::new(id);
    if store.delete_game(id.clone()).await? {
        info!(%id, "game deleted");
        Ok(())
    } else {
        Err(not_found())
    }
}

/// Best rated games, capped at the configured report size.
pub async fn top_rated(state: &SharedState) -> Result<Vec<GameResponse>, ServiceError> {
    let store = state.require_game_store().await?;
    let games = store.top_rated(state.config().report_limit).await?;
    Ok(games.into_iter().map(Into::into).collect())
}

/// Worst rated games, capped at the configured report size.
pub async fn worst_rated(state: &SharedState) -> Result<Vec<GameResponse>, ServiceError> {
    let store = state.require_game_store().await?;
    let games = store.worst_rated(state.config().report_limit).await?;
    Ok(games.into_iter().map(Into::into).collect())
}

/// Games matching the ad-hoc query parameters of `/api/filter`.
pub async fn filter_games(
    state: &SharedState,
    query: FilterQuery,
) -> Result<Vec<GameResponse>, ServiceError> {
    let predicate =
        GameFilter::parse(&query, state.config().release_year_kind)?.into_predicate();
    debug!(?predicate, "built catalog filter");

    let store = state.require_game_store().await?;
    let games = store.find_by_filter(predicate).await?;
    Ok(games.into_iter().map(Into::into).collect())
}

pub async fn developer_stats(state: &SharedState) -> Result<Vec<GroupStatsResponse>, ServiceError> {
    let store = state.require_game_store().await?;
    let rows = store.developer_stats().await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn publisher_stats(state: &SharedState) -> Result<Vec<GroupStatsResponse>, ServiceError> {
    let store = state.require_game_store().await?;
    let rows = store.publisher_stats().await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

fn not_found() -> ServiceError {
    ServiceError::NotFound(GAME_NOT_FOUND.into())
}

/// Convert to the configured type, then re-check bounds: a text year may only become a
/// number here.
fn canonical_year(
    year: Option<ReleaseYear>,
    kind: ReleaseYearKind,
) -> Result<Option<ReleaseYear>, ServiceError> {
    let Some(year) = year else {
        return Ok(None);
    };
    let year = year.normalized(kind).map_err(ServiceError::InvalidInput)?;
    validate_release_year(&year).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    Ok(Some(year))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState,
    };

    fn state_with(config: AppConfig) -> SharedState {
        AppState::with_store(config, Arc::new(MemoryGameStore::new()))
    }

    fn new_game(json: &str) -> NewGameRequest {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let state = state_with(AppConfig::default());
        let created = create_game(
            &state,
            new_game(
                r#"{"game_title": "Hollow Knight", "release_year": "2017", "developer": "Team Cherry",
                    "publisher": "Team Cherry", "genres": ["metroidvania"], "metacritic_rating": 87}"#,
            ),
        )
        .await
        .unwrap();

        assert_eq!(created.release_year, Some(ReleaseYear::Number(2017)));
        let fetched = get_game(&state, created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn text_year_configuration_stores_strings() {
        let config = AppConfig {
            release_year_kind: ReleaseYearKind::Text,
            ..AppConfig::default()
        };
        let state = state_with(config);
        let created = create_game(
            &state,
            new_game(r#"{"game_title": "Quake", "release_year": 1996}"#),
        )
        .await
        .unwrap();
        assert_eq!(created.release_year, Some(ReleaseYear::Text("1996".into())));
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload() {
        let state = state_with(AppConfig::default());
        let err = create_game(
            &state,
            new_game(r#"{"game_title": "Hades", "metacritic_rating": 140}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = create_game(
            &state,
            new_game(r#"{"game_title": "Hades", "release_year": "soon"}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn textual_years_are_range_checked_after_conversion() {
        let state = state_with(AppConfig::default());
        for year in ["-5", "123456"] {
            let err = create_game(
                &state,
                new_game(&format!(r#"{{"game_title": "Doom", "release_year": "{year}"}}"#)),
            )
            .await
            .unwrap_err();
            assert!(
                matches!(&err, ServiceError::InvalidInput(message) if message.contains("between 0 and 9999")),
                "{year}: {err:?}"
            );
        }

        let created = create_game(&state, new_game(r#"{"game_title": "Doom"}"#))
            .await
            .unwrap();
        let patch = GamePatchRequest {
            release_year: Some(ReleaseYear::Text("-5".into())),
            ..Default::default()
        };
        let err = update_game(&state, created.id.to_string(), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let stored = get_game(&state, created.id.to_string()).await.unwrap();
        assert_eq!(stored.release_year, None);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let state = state_with(AppConfig::default());

        assert!(matches!(
            get_game(&state, "nope".into()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            delete_game(&state, "nope".into()).await,
            Err(ServiceError::NotFound(_))
        ));
        let patch = GamePatchRequest {
            metacritic_rating: Some(50),
            ..Default::default()
        };
        assert!(matches!(
            update_game(&state, "nope".into(), patch).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn degraded_state_reports_unavailable_storage() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            list_games(&state).await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn reports_respect_configured_limit() {
        let config = AppConfig {
            report_limit: 2,
            ..AppConfig::default()
        };
        let state = state_with(config);
        for (title, rating) in [("A", 40), ("B", 90), ("C", 70)] {
            create_game(
                &state,
                new_game(&format!(
                    r#"{{"game_title": "{title}", "metacritic_rating": {rating}}}"#
                )),
            )
            .await
            .unwrap();
        }

        let best: Vec<_> = top_rated(&state)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.game_title)
            .collect();
        let worst: Vec<_> = worst_rated(&state)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.game_title)
            .collect();
        assert_eq!(best, vec!["B", "C"]);
        assert_eq!(worst, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn filter_surfaces_invalid_parameters() {
        let state = state_with(AppConfig::default());
        let query = FilterQuery {
            max_rate: Some("ninety".into()),
            ..Default::default()
        };
        let err = filter_games(&state, query).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(message) if message.contains("maxRate")));
    }
}
