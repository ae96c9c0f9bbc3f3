use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{GameEntity, GameId, GamePatchEntity, NewGameEntity, ReleaseYear},
    dto::validation::{validate_genres, validate_not_blank, validate_release_year},
};

/// Payload used to add a game to the catalog.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct NewGameRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub game_title: String,
    /// Number or string; converted to the configured canonical type.
    #[serde(default)]
    #[validate(custom(function = "validate_release_year"))]
    pub release_year: Option<ReleaseYear>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_genres"))]
    pub genres: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub metacritic_rating: Option<i32>,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GamePatchRequest {
    #[serde(default)]
    pub game_title: Option<String>,
    #[serde(default)]
    pub release_year: Option<ReleaseYear>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub metacritic_rating: Option<i32>,
}

impl Validate for GamePatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref title) = self.game_title {
            if let Err(e) = validate_not_blank(title) {
                errors.add("game_title", e);
            }
        }

        if let Some(ref year) = self.release_year {
            if let Err(e) = validate_release_year(year) {
                errors.add("release_year", e);
            }
        }

        if let Some(ref genres) = self.genres {
            if let Err(e) = validate_genres(genres) {
                errors.add("genres", e);
            }
        }

        if let Some(rating) = self.metacritic_rating {
            if !(0..=100).contains(&rating) {
                let mut err = ValidationError::new("range");
                err.message = Some(format!("must be between 0 and 100 (got {rating})").into());
                errors.add("metacritic_rating", err);
            }
        }

        if self.is_empty() {
            let mut err = ValidationError::new("empty_update");
            err.message = Some("update must set at least one field".into());
            errors.add("__all__", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl GamePatchRequest {
    fn is_empty(&self) -> bool {
        self.game_title.is_none()
            && self.release_year.is_none()
            && self.developer.is_none()
            && self.publisher.is_none()
            && self.genres.is_none()
            && self.metacritic_rating.is_none()
    }
}

/// Catalog entry as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GameResponse {
    #[serde(rename = "_id")]
    pub id: GameId,
    pub game_title: String,
    pub release_year: Option<ReleaseYear>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genres: Vec<String>,
    pub metacritic_rating: Option<i32>,
}

impl From<NewGameRequest> for NewGameEntity {
    fn from(request: NewGameRequest) -> Self {
        Self {
            game_title: request.game_title.trim().to_owned(),
            release_year: request.release_year,
            developer: request.developer,
            publisher: request.publisher,
            genres: trimmed(request.genres),
            metacritic_rating: request.metacritic_rating,
        }
    }
}

impl From<GamePatchRequest> for GamePatchEntity {
    fn from(request: GamePatchRequest) -> Self {
        Self {
            game_title: request.game_title.map(|title| title.trim().to_owned()),
            release_year: request.release_year,
            developer: request.developer,
            publisher: request.publisher,
            genres: request.genres.map(trimmed),
            metacritic_rating: request.metacritic_rating,
        }
    }
}

impl From<GameEntity> for GameResponse {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            game_title: entity.game_title,
            release_year: entity.release_year,
            developer: entity.developer,
            publisher: entity.publisher,
            genres: entity.genres,
            metacritic_rating: entity.metacritic_rating,
        }
    }
}

fn trimmed(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|genre| genre.trim().to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> NewGameRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn new_game_requires_a_title() {
        assert!(request(r#"{"game_title": "Hades"}"#).validate().is_ok());
        assert!(request(r#"{"game_title": "  "}"#).validate().is_err());
        assert!(serde_json::from_str::<NewGameRequest>("{}").is_err());
    }

    #[test]
    fn new_game_rating_is_bounded() {
        assert!(
            request(r#"{"game_title": "Hades", "metacritic_rating": 101}"#)
                .validate()
                .is_err()
        );
        assert!(
            request(r#"{"game_title": "Hades", "metacritic_rating": 0}"#)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn patch_must_change_something() {
        let patch: GamePatchRequest = serde_json::from_str("{}").unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));
    }

    #[test]
    fn patch_rejects_out_of_range_rating() {
        let patch: GamePatchRequest =
            serde_json::from_str(r#"{"metacritic_rating": -5}"#).unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("metacritic_rating"));
    }

    #[test]
    fn response_exposes_mongo_style_id() {
        let response = GameResponse {
            id: GameId::new("abc"),
            game_title: "Hades".into(),
            release_year: Some(ReleaseYear::Number(2020)),
            developer: None,
            publisher: None,
            genres: vec![],
            metacritic_rating: Some(93),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["release_year"], 2020);
    }
}
