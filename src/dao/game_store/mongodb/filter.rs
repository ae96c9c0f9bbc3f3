//! Rendering of [`Predicate`] trees into MongoDB query documents.

use mongodb::bson::{Bson, Document, doc};

use crate::dao::predicate::{FieldValue, GameField, Predicate};

/// Translate a predicate into a `find` filter document.
pub fn to_document(predicate: &Predicate) -> Document {
    match predicate {
        Predicate::All => Document::new(),
        Predicate::And(children) => match children.as_slice() {
            [] => Document::new(),
            [only] => to_document(only),
            _ => doc! {"$and": children.iter().map(to_document).collect::<Vec<_>>()},
        },
        Predicate::Or(children) => {
            doc! {"$or": children.iter().map(to_document).collect::<Vec<_>>()}
        }
        Predicate::Equals { field, value } => {
            let mut document = Document::new();
            document.insert(field.as_str(), value_to_bson(value));
            document
        }
        Predicate::Contains { field, term } => contains_document(*field, term),
        Predicate::InRange { field, min, max } => {
            let mut bounds = Document::new();
            if let Some(min) = min {
                bounds.insert("$gte", *min);
            }
            if let Some(max) = max {
                bounds.insert("$lte", *max);
            }
            let mut document = Document::new();
            document.insert(field.as_str(), bounds);
            document
        }
        Predicate::HasAllOf { field, values } => {
            let mut document = Document::new();
            document.insert(field.as_str(), doc! {"$all": values.clone()});
            document
        }
        Predicate::HasAnyOf { field, values } => {
            let mut document = Document::new();
            document.insert(field.as_str(), doc! {"$in": values.clone()});
            document
        }
    }
}

fn value_to_bson(value: &FieldValue) -> Bson {
    match value {
        FieldValue::Text(text) => Bson::String(text.clone()),
        FieldValue::Integer(number) => Bson::Int32(*number),
    }
}

/// Literal, case-insensitive substring match.
///
/// String fields use `$regex` directly; other fields are stringified with `$toString` so a
/// numeric `release_year` can still be searched as text.
fn contains_document(field: GameField, term: &str) -> Document {
    let pattern = regex::escape(term);
    match field {
        GameField::GameTitle | GameField::Developer | GameField::Publisher => {
            let mut document = Document::new();
            document.insert(field.as_str(), doc! {"$regex": pattern, "$options": "i"});
            document
        }
        _ => doc! {
            "$expr": {
                "$regexMatch": {
                    "input": {"$toString": format!("${}", field.as_str())},
                    "regex": pattern,
                    "options": "i"
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_all_renders_empty_filter() {
        assert_eq!(to_document(&Predicate::All), doc! {});
    }

    #[test]
    fn clauses_are_joined_with_and() {
        let predicate = Predicate::And(vec![
            Predicate::Equals {
                field: GameField::MetacriticRating,
                value: FieldValue::Integer(85),
            },
            Predicate::InRange {
                field: GameField::MetacriticRating,
                min: Some(70),
                max: None,
            },
        ]);

        assert_eq!(
            to_document(&predicate),
            doc! {"$and": [
                {"metacritic_rating": 85},
                {"metacritic_rating": {"$gte": 70}}
            ]}
        );
    }

    #[test]
    fn genre_clauses_use_all_and_in() {
        let all = Predicate::HasAllOf {
            field: GameField::Genres,
            values: vec!["a".into(), "b".into()],
        };
        let any = Predicate::HasAnyOf {
            field: GameField::Genres,
            values: vec!["action".into(), "rpg".into()],
        };
        assert_eq!(to_document(&all), doc! {"genres": {"$all": ["a", "b"]}});
        assert_eq!(to_document(&any), doc! {"genres": {"$in": ["action", "rpg"]}});
    }

    #[test]
    fn text_search_escapes_the_term() {
        let clause = Predicate::Contains {
            field: GameField::GameTitle,
            term: "f.e.a.r.".into(),
        };
        assert_eq!(
            to_document(&clause),
            doc! {"game_title": {"$regex": r"f\.e\.a\.r\.", "$options": "i"}}
        );
    }

    #[test]
    fn release_year_search_stringifies_the_field() {
        let clause = Predicate::Contains {
            field: GameField::ReleaseYear,
            term: "199".into(),
        };
        assert_eq!(
            to_document(&clause),
            doc! {"$expr": {"$regexMatch": {
                "input": {"$toString": "$release_year"},
                "regex": "199",
                "options": "i"
            }}}
        );
    }
}
