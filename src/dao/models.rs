use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque identifier assigned by the storage backend when a game is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct GameId(String);

impl GameId {
    /// Wrap a backend-issued identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How `release_year` is stored and matched by exact filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseYearKind {
    /// Years are integers (`1998`).
    #[default]
    Number,
    /// Years are free text (`"1998"`).
    Text,
}

/// Release year as found in the catalog, which mixes numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ReleaseYear {
    /// Numeric year.
    Number(i32),
    /// Textual year.
    Text(String),
}

impl ReleaseYear {
    /// Convert the value to the configured canonical representation.
    pub fn normalized(self, kind: ReleaseYearKind) -> Result<Self, String> {
        match (self, kind) {
            (ReleaseYear::Number(year), ReleaseYearKind::Number) => Ok(ReleaseYear::Number(year)),
            (ReleaseYear::Number(year), ReleaseYearKind::Text) => {
                Ok(ReleaseYear::Text(year.to_string()))
            }
            (ReleaseYear::Text(text), ReleaseYearKind::Number) => text
                .trim()
                .parse::<i32>()
                .map(ReleaseYear::Number)
                .map_err(|_| format!("release_year `{text}` is not a number")),
            (ReleaseYear::Text(text), ReleaseYearKind::Text) => {
                Ok(ReleaseYear::Text(text.trim().to_owned()))
            }
        }
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseYear::Number(year) => write!(f, "{year}"),
            ReleaseYear::Text(text) => f.write_str(text),
        }
    }
}

/// A catalog entry as persisted by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntity {
    /// Identifier assigned on insert.
    pub id: GameId,
    /// Display title.
    pub game_title: String,
    /// Year of first release.
    pub release_year: Option<ReleaseYear>,
    /// Studio that built the game.
    pub developer: Option<String>,
    /// Company that published the game.
    pub publisher: Option<String>,
    /// Genre tags, in display order.
    pub genres: Vec<String>,
    /// Metacritic score in `0..=100`.
    pub metacritic_rating: Option<i32>,
}

/// Fields of a game about to be inserted; the backend assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGameEntity {
    pub game_title: String,
    pub release_year: Option<ReleaseYear>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genres: Vec<String>,
    pub metacritic_rating: Option<i32>,
}

impl NewGameEntity {
    /// Attach the identifier chosen by the backend.
    pub fn with_id(self, id: GameId) -> GameEntity {
        GameEntity {
            id,
            game_title: self.game_title,
            release_year: self.release_year,
            developer: self.developer,
            publisher: self.publisher,
            genres: self.genres,
            metacritic_rating: self.metacritic_rating,
        }
    }
}

/// Partial overwrite of a stored game. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatchEntity {
    pub game_title: Option<String>,
    pub release_year: Option<ReleaseYear>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genres: Option<Vec<String>>,
    pub metacritic_rating: Option<i32>,
}

impl GamePatchEntity {
    /// Apply the patch in place.
    pub fn apply_to(self, game: &mut GameEntity) {
        if let Some(title) = self.game_title {
            game.game_title = title;
        }
        if let Some(year) = self.release_year {
            game.release_year = Some(year);
        }
        if let Some(developer) = self.developer {
            game.developer = Some(developer);
        }
        if let Some(publisher) = self.publisher {
            game.publisher = Some(publisher);
        }
        if let Some(genres) = self.genres {
            game.genres = genres;
        }
        if let Some(rating) = self.metacritic_rating {
            game.metacritic_rating = Some(rating);
        }
    }
}

/// Grouping key for the stats reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsGroup {
    Developer,
    Publisher,
}

impl StatsGroup {
    /// Name of the stored field the report groups on.
    pub fn field_name(self) -> &'static str {
        match self {
            StatsGroup::Developer => "developer",
            StatsGroup::Publisher => "publisher",
        }
    }

    /// Value of the grouping field for `game`.
    pub fn key_of(self, game: &GameEntity) -> Option<&str> {
        match self {
            StatsGroup::Developer => game.developer.as_deref(),
            StatsGroup::Publisher => game.publisher.as_deref(),
        }
    }
}

/// One row of the developer/publisher stats report.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatsEntity {
    /// Developer or publisher name.
    pub name: String,
    pub game_count: u64,
    /// Mean rating over games that carry one.
    pub average_rating: Option<f64>,
    pub highest_rating: Option<i32>,
    pub lowest_rating: Option<i32>,
}
