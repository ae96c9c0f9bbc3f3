//! Translation of `/api/filter` query parameters into a storage [`Predicate`].
//!
//! Parsing and building are split: [`GameFilter::parse`] types and validates the raw strings,
//! [`GameFilter::into_predicate`] is infallible. Clause semantics:
//!
//! | Parameter | Clause |
//! |---|---|
//! | `game_title`, `developer`, `publisher` | exact equality |
//! | `release_year` | exact equality, typed per [`ReleaseYearKind`] |
//! | `genres=a,b` | genre set holds **all** of `a`, `b` |
//! | `search=t,g1,g2` | `t` is a case-insensitive substring of title, developer, publisher **or** release year; genre set holds **any** of `g1`, `g2` |
//! | `metacritic_rating` | exact rating |
//! | `minRate`, `maxRate` | inclusive rating range, both bounds applied together |
//!
//! Top-level clauses are ANDed. `metacritic_rating` and the range are independent clauses and
//! both apply when given together.

use thiserror::Error;

use crate::{
    dao::{
        models::ReleaseYearKind,
        predicate::{FieldValue, GameField, Predicate},
    },
    dto::filter::FilterQuery,
};

/// Fields the free-text search term is matched against.
const SEARCH_FIELDS: [GameField; 4] = [
    GameField::GameTitle,
    GameField::Developer,
    GameField::Publisher,
    GameField::ReleaseYear,
];

/// A query parameter that could not be typed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("{param} must be an integer (got `{value}`)")]
    NotAnInteger { param: &'static str, value: String },
}

/// Free-text part of the filter: `search=term,genre,...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSearch {
    /// Substring looked up across [`SEARCH_FIELDS`].
    pub term: Option<String>,
    /// Genres of which a game must carry at least one.
    pub genres_any: Vec<String>,
}

/// Inclusive bounds on `metacritic_rating`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

/// Strongly typed form of every filter the catalog understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFilter {
    pub game_title: Option<String>,
    pub release_year: Option<FieldValue>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    /// Genres a game must all carry.
    pub genres_all: Vec<String>,
    pub search: Option<TextSearch>,
    pub rating: Option<i32>,
    pub rating_range: Option<RatingRange>,
}

impl GameFilter {
    /// Type the raw query. Empty or blank parameters are treated as absent.
    pub fn parse(query: &FilterQuery, year_kind: ReleaseYearKind) -> Result<Self, FilterError> {
        let release_year = match (present(&query.release_year), year_kind) {
            (None, _) => None,
            (Some(year), ReleaseYearKind::Number) => {
                Some(FieldValue::Integer(parse_integer("release_year", year)?))
            }
            (Some(year), ReleaseYearKind::Text) => Some(FieldValue::Text(year.to_owned())),
        };

        let min = present(&query.min_rate)
            .map(|value| parse_integer("minRate", value))
            .transpose()?;
        let max = present(&query.max_rate)
            .map(|value| parse_integer("maxRate", value))
            .transpose()?;
        let rating_range = (min.is_some() || max.is_some()).then_some(RatingRange { min, max });

        Ok(Self {
            game_title: present(&query.game_title).map(str::to_owned),
            release_year,
            developer: present(&query.developer).map(str::to_owned),
            publisher: present(&query.publisher).map(str::to_owned),
            genres_all: present(&query.genres).map(split_list).unwrap_or_default(),
            search: present(&query.search).map(parse_search),
            rating: present(&query.metacritic_rating)
                .map(|value| parse_integer("metacritic_rating", value))
                .transpose()?,
            rating_range,
        })
    }

    /// Build the predicate; an empty filter yields [`Predicate::All`].
    pub fn into_predicate(self) -> Predicate {
        let mut clauses = Vec::new();

        let exact = [
            (GameField::GameTitle, self.game_title.map(FieldValue::Text)),
            (GameField::ReleaseYear, self.release_year),
            (GameField::Developer, self.developer.map(FieldValue::Text)),
            (GameField::Publisher, self.publisher.map(FieldValue::Text)),
        ];
        for (field, value) in exact {
            if let Some(value) = value {
                clauses.push(Predicate::Equals { field, value });
            }
        }

        if !self.genres_all.is_empty() {
            clauses.push(Predicate::HasAllOf {
                field: GameField::Genres,
                values: self.genres_all,
            });
        }

        if let Some(TextSearch { term, genres_any }) = self.search {
            if let Some(term) = term {
                clauses.push(Predicate::Or(
                    SEARCH_FIELDS
                        .iter()
                        .map(|field| Predicate::Contains {
                            field: *field,
                            term: term.clone(),
                        })
                        .collect(),
                ));
            }
            if !genres_any.is_empty() {
                clauses.push(Predicate::HasAnyOf {
                    field: GameField::Genres,
                    values: genres_any,
                });
            }
        }

        if let Some(rating) = self.rating {
            clauses.push(Predicate::Equals {
                field: GameField::MetacriticRating,
                value: FieldValue::Integer(rating),
            });
        }

        if let Some(RatingRange { min, max }) = self.rating_range {
            clauses.push(Predicate::InRange {
                field: GameField::MetacriticRating,
                min,
                max,
            });
        }

        Predicate::all_of(clauses)
    }
}

/// Trimmed value of a parameter, or `None` when missing or blank.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_integer(param: &'static str, value: &str) -> Result<i32, FilterError> {
    value.parse().map_err(|_| FilterError::NotAnInteger {
        param,
        value: value.to_owned(),
    })
}

/// Split on commas, trimming entries and dropping empty ones.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_search(value: &str) -> TextSearch {
    let mut parts = value.split(',').map(str::trim);
    let term = parts
        .next()
        .filter(|term| !term.is_empty())
        .map(str::to_owned);
    let genres_any = parts
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect();
    TextSearch { term, genres_any }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{GameEntity, GameId, NewGameEntity, ReleaseYear};

    fn query() -> FilterQuery {
        FilterQuery::default()
    }

    fn build(query: FilterQuery) -> Predicate {
        GameFilter::parse(&query, ReleaseYearKind::Number)
            .unwrap()
            .into_predicate()
    }

    fn game(title: &str, genres: &[&str], rating: i32) -> GameEntity {
        NewGameEntity {
            game_title: title.into(),
            release_year: Some(ReleaseYear::Number(2017)),
            developer: Some("Nintendo EPD".into()),
            publisher: Some("Nintendo".into()),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            metacritic_rating: Some(rating),
        }
        .with_id(GameId::new(title))
    }

    fn clauses(predicate: &Predicate) -> Vec<&Predicate> {
        match predicate {
            Predicate::All => vec![],
            Predicate::And(children) => children.iter().collect(),
            other => vec![other],
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(build(query()), Predicate::All);
    }

    #[test]
    fn blank_parameters_are_ignored() {
        let predicate = build(FilterQuery {
            game_title: Some("".into()),
            developer: Some("   ".into()),
            min_rate: Some(" ".into()),
            ..query()
        });
        assert_eq!(predicate, Predicate::All);
    }

    #[test]
    fn one_equality_clause_per_exact_field() {
        let predicate = build(FilterQuery {
            game_title: Some("Celeste".into()),
            developer: Some("Maddy Makes Games".into()),
            publisher: Some("Matt Makes Games".into()),
            release_year: Some("2018".into()),
            ..query()
        });

        assert_eq!(
            clauses(&predicate),
            vec![
                &Predicate::Equals {
                    field: GameField::GameTitle,
                    value: FieldValue::Text("Celeste".into()),
                },
                &Predicate::Equals {
                    field: GameField::ReleaseYear,
                    value: FieldValue::Integer(2018),
                },
                &Predicate::Equals {
                    field: GameField::Developer,
                    value: FieldValue::Text("Maddy Makes Games".into()),
                },
                &Predicate::Equals {
                    field: GameField::Publisher,
                    value: FieldValue::Text("Matt Makes Games".into()),
                },
            ]
        );
    }

    #[test]
    fn single_clause_is_not_wrapped() {
        let predicate = build(FilterQuery {
            developer: Some("Nintendo EPD".into()),
            ..query()
        });
        assert_eq!(
            predicate,
            Predicate::Equals {
                field: GameField::Developer,
                value: FieldValue::Text("Nintendo EPD".into()),
            }
        );
    }

    #[test]
    fn genres_require_every_value() {
        let predicate = build(FilterQuery {
            genres: Some("a,b".into()),
            ..query()
        });

        assert!(predicate.matches(&game("both", &["a", "b", "c"], 80)));
        assert!(!predicate.matches(&game("only a", &["a"], 80)));
    }

    #[test]
    fn search_matches_term_across_fields_and_any_genre() {
        let predicate = build(FilterQuery {
            search: Some("zelda, action ,rpg".into()),
            ..query()
        });

        let parts = clauses(&predicate);
        assert_eq!(parts.len(), 2);
        match parts[0] {
            Predicate::Or(children) => {
                let fields: Vec<_> = children
                    .iter()
                    .map(|child| match child {
                        Predicate::Contains { field, term } => {
                            assert_eq!(term, "zelda");
                            *field
                        }
                        other => panic!("unexpected clause {other:?}"),
                    })
                    .collect();
                assert_eq!(fields, SEARCH_FIELDS.to_vec());
            }
            other => panic!("expected OR clause, got {other:?}"),
        }
        assert_eq!(
            parts[1],
            &Predicate::HasAnyOf {
                field: GameField::Genres,
                values: vec!["action".into(), "rpg".into()],
            }
        );

        assert!(predicate.matches(&game("The Legend of ZELDA", &["rpg"], 90)));
        assert!(predicate.matches(&game("Legend of Zelda", &["action", "puzzle"], 90)));
        assert!(!predicate.matches(&game("Legend of Zelda", &["puzzle"], 90)));
        assert!(!predicate.matches(&game("Metroid", &["action"], 90)));
    }

    #[test]
    fn search_term_hits_developer_and_year() {
        let by_developer = build(FilterQuery {
            search: Some("epd".into()),
            ..query()
        });
        let by_year = build(FilterQuery {
            search: Some("201".into()),
            ..query()
        });
        assert!(by_developer.matches(&game("Splatoon", &[], 83)));
        assert!(by_year.matches(&game("Splatoon", &[], 83)));
    }

    #[test]
    fn search_with_blank_term_keeps_genres() {
        let predicate = build(FilterQuery {
            search: Some(" ,rpg".into()),
            ..query()
        });
        assert_eq!(
            predicate,
            Predicate::HasAnyOf {
                field: GameField::Genres,
                values: vec!["rpg".into()],
            }
        );
    }

    #[test]
    fn rating_range_is_inclusive() {
        let predicate = build(FilterQuery {
            min_rate: Some("70".into()),
            max_rate: Some("90".into()),
            ..query()
        });

        for (rating, expected) in [(69, false), (70, true), (85, true), (90, true), (91, false)] {
            assert_eq!(
                predicate.matches(&game("g", &[], rating)),
                expected,
                "rating {rating}"
            );
        }
    }

    #[test]
    fn single_bound_leaves_other_side_open() {
        let predicate = build(FilterQuery {
            max_rate: Some("50".into()),
            ..query()
        });
        assert_eq!(
            predicate,
            Predicate::InRange {
                field: GameField::MetacriticRating,
                min: None,
                max: Some(50),
            }
        );
    }

    #[test]
    fn exact_rating_and_range_coexist() {
        let predicate = build(FilterQuery {
            metacritic_rating: Some("85".into()),
            min_rate: Some("70".into()),
            ..query()
        });

        assert_eq!(
            clauses(&predicate),
            vec![
                &Predicate::Equals {
                    field: GameField::MetacriticRating,
                    value: FieldValue::Integer(85),
                },
                &Predicate::InRange {
                    field: GameField::MetacriticRating,
                    min: Some(70),
                    max: None,
                },
            ]
        );
        assert!(predicate.matches(&game("g", &[], 85)));
        assert!(!predicate.matches(&game("g", &[], 80)));
    }

    #[test]
    fn non_numeric_rating_parameters_are_rejected() {
        let err = GameFilter::parse(
            &FilterQuery {
                min_rate: Some("high".into()),
                ..query()
            },
            ReleaseYearKind::Number,
        )
        .unwrap_err();
        assert_eq!(
            err,
            FilterError::NotAnInteger {
                param: "minRate",
                value: "high".into(),
            }
        );

        assert!(
            GameFilter::parse(
                &FilterQuery {
                    metacritic_rating: Some("8.5".into()),
                    ..query()
                },
                ReleaseYearKind::Number,
            )
            .is_err()
        );
    }

    #[test]
    fn release_year_typing_follows_configuration() {
        let year = FilterQuery {
            release_year: Some("1998".into()),
            ..query()
        };

        let numeric = GameFilter::parse(&year, ReleaseYearKind::Number).unwrap();
        let textual = GameFilter::parse(&year, ReleaseYearKind::Text).unwrap();
        assert_eq!(numeric.release_year, Some(FieldValue::Integer(1998)));
        assert_eq!(textual.release_year, Some(FieldValue::Text("1998".into())));

        let bad = FilterQuery {
            release_year: Some("nineties".into()),
            ..query()
        };
        assert!(GameFilter::parse(&bad, ReleaseYearKind::Number).is_err());
        assert!(GameFilter::parse(&bad, ReleaseYearKind::Text).is_ok());
    }

    #[test]
    fn all_clauses_combine_with_and() {
        let predicate = build(FilterQuery {
            publisher: Some("Nintendo".into()),
            genres: Some("action".into()),
            search: Some("zelda".into()),
            max_rate: Some("95".into()),
            ..query()
        });

        assert_eq!(clauses(&predicate).len(), 4);
        assert!(predicate.matches(&game("Zelda", &["action"], 90)));
        assert!(!predicate.matches(&game("Zelda", &["action"], 97)));
    }
}
