//! Backend-neutral selection predicate over catalog games.
//!
//! Services build a [`Predicate`] and hand it to the [`GameStore`](super::game_store::GameStore);
//! each backend either renders it to its native query language or evaluates it in memory with
//! [`Predicate::matches`].

use std::borrow::Cow;

use crate::dao::models::{GameEntity, ReleaseYear};

/// Fields of a game that a predicate can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    GameTitle,
    ReleaseYear,
    Developer,
    Publisher,
    Genres,
    MetacriticRating,
}

impl GameField {
    /// Stored field name.
    pub fn as_str(self) -> &'static str {
        match self {
            GameField::GameTitle => "game_title",
            GameField::ReleaseYear => "release_year",
            GameField::Developer => "developer",
            GameField::Publisher => "publisher",
            GameField::Genres => "genres",
            GameField::MetacriticRating => "metacritic_rating",
        }
    }
}

/// Scalar compared by an equality clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
}

/// Condition tree combining the clauses produced by the filter builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every game.
    All,
    /// Every child must match.
    And(Vec<Predicate>),
    /// At least one child must match.
    Or(Vec<Predicate>),
    /// Field equals the value, with no type coercion.
    Equals { field: GameField, value: FieldValue },
    /// Textual form of the field contains `term`, ignoring case.
    Contains { field: GameField, term: String },
    /// Numeric field lies within the inclusive bounds that are present.
    InRange {
        field: GameField,
        min: Option<i32>,
        max: Option<i32>,
    },
    /// Multi-valued field holds every listed value.
    HasAllOf { field: GameField, values: Vec<String> },
    /// Multi-valued field holds at least one listed value.
    HasAnyOf { field: GameField, values: Vec<String> },
}

impl Predicate {
    /// Combine clauses with AND, collapsing the trivial cases.
    pub fn all_of(mut clauses: Vec<Predicate>) -> Predicate {
        match clauses.len() {
            0 => Predicate::All,
            1 => clauses.remove(0),
            _ => Predicate::And(clauses),
        }
    }

    /// Evaluate the predicate against a single game.
    pub fn matches(&self, game: &GameEntity) -> bool {
        match self {
            Predicate::All => true,
            Predicate::And(children) => children.iter().all(|child| child.matches(game)),
            Predicate::Or(children) => children.iter().any(|child| child.matches(game)),
            Predicate::Equals { field, value } => scalar(game, *field).as_ref() == Some(value),
            Predicate::Contains { field, term } => text(game, *field)
                .map(|haystack| haystack.to_lowercase().contains(&term.to_lowercase()))
                .unwrap_or(false),
            Predicate::InRange { field, min, max } => match scalar(game, *field) {
                Some(FieldValue::Integer(value)) => {
                    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
                }
                _ => false,
            },
            Predicate::HasAllOf { field, values } => {
                let held = tags(game, *field);
                values.iter().all(|value| held.contains(value))
            }
            Predicate::HasAnyOf { field, values } => {
                let held = tags(game, *field);
                values.iter().any(|value| held.contains(value))
            }
        }
    }
}

fn scalar(game: &GameEntity, field: GameField) -> Option<FieldValue> {
    match field {
        GameField::GameTitle => Some(FieldValue::Text(game.game_title.clone())),
        GameField::ReleaseYear => game.release_year.as_ref().map(|year| match year {
            ReleaseYear::Number(year) => FieldValue::Integer(*year),
            ReleaseYear::Text(text) => FieldValue::Text(text.clone()),
        }),
        GameField::Developer => game.developer.clone().map(FieldValue::Text),
        GameField::Publisher => game.publisher.clone().map(FieldValue::Text),
        GameField::MetacriticRating => game.metacritic_rating.map(FieldValue::Integer),
        GameField::Genres => None,
    }
}

fn text(game: &GameEntity, field: GameField) -> Option<Cow<'_, str>> {
    match field {
        GameField::GameTitle => Some(Cow::Borrowed(game.game_title.as_str())),
        GameField::ReleaseYear => game
            .release_year
            .as_ref()
            .map(|year| Cow::Owned(year.to_string())),
        GameField::Developer => game.developer.as_deref().map(Cow::Borrowed),
        GameField::Publisher => game.publisher.as_deref().map(Cow::Borrowed),
        GameField::MetacriticRating => game
            .metacritic_rating
            .map(|rating| Cow::Owned(rating.to_string())),
        GameField::Genres => None,
    }
}

fn tags(game: &GameEntity, field: GameField) -> &[String] {
    match field {
        GameField::Genres => &game.genres,
        _ => &[],
    }
}
