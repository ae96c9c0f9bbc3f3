use mongodb::bson::{Bson, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::dao::models::{
    GameEntity, GameId, GamePatchEntity, GroupStatsEntity, NewGameEntity, ReleaseYear,
};

/// Shape of a game inside the `games` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    game_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    release_year: Option<ReleaseYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publisher: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metacritic_rating: Option<i32>,
}

impl MongoGameDocument {
    /// Pair a new game with the object id it will be stored under.
    pub fn new(id: ObjectId, game: NewGameEntity) -> Self {
        Self {
            id,
            game_title: game.game_title,
            release_year: game.release_year,
            developer: game.developer,
            publisher: game.publisher,
            genres: game.genres,
            metacritic_rating: game.metacritic_rating,
        }
    }
}

impl From<MongoGameDocument> for GameEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            id: GameId::new(value.id.to_hex()),
            game_title: value.game_title,
            release_year: value.release_year,
            developer: value.developer,
            publisher: value.publisher,
            genres: value.genres,
            metacritic_rating: value.metacritic_rating,
        }
    }
}

/// Row produced by the `$group` stage of the stats pipelines.
#[derive(Debug, Deserialize)]
pub struct MongoGroupStatsDocument {
    #[serde(rename = "_id")]
    name: String,
    game_count: u64,
    average_rating: Option<f64>,
    highest_rating: Option<i32>,
    lowest_rating: Option<i32>,
}

impl From<MongoGroupStatsDocument> for GroupStatsEntity {
    fn from(value: MongoGroupStatsDocument) -> Self {
        Self {
            name: value.name,
            game_count: value.game_count,
            average_rating: value.average_rating,
            highest_rating: value.highest_rating,
            lowest_rating: value.lowest_rating,
        }
    }
}

impl From<&ReleaseYear> for Bson {
    fn from(value: &ReleaseYear) -> Self {
        match value {
            ReleaseYear::Number(year) => Bson::Int32(*year),
            ReleaseYear::Text(text) => Bson::String(text.clone()),
        }
    }
}

/// Object id behind a catalog identifier, if it could have been issued by this backend.
pub fn object_id(id: &GameId) -> Option<ObjectId> {
    ObjectId::parse_str(id.as_str()).ok()
}

pub fn doc_id(id: ObjectId) -> Document {
    doc! {"_id": id}
}

/// `$set` update document for the fields carried by the patch.
pub fn set_document(patch: &GamePatchEntity) -> Document {
    let mut set = Document::new();
    if let Some(title) = &patch.game_title {
        set.insert("game_title", title.as_str());
    }
    if let Some(year) = &patch.release_year {
        set.insert("release_year", Bson::from(year));
    }
    if let Some(developer) = &patch.developer {
        set.insert("developer", developer.as_str());
    }
    if let Some(publisher) = &patch.publisher {
        set.insert("publisher", publisher.as_str());
    }
    if let Some(genres) = &patch.genres {
        set.insert("genres", genres.clone());
    }
    if let Some(rating) = patch.metacritic_rating {
        set.insert("metacritic_rating", rating);
    }
    doc! {"$set": set}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_document_only_carries_patched_fields() {
        let patch = GamePatchEntity {
            release_year: Some(ReleaseYear::Text("1998".into())),
            metacritic_rating: Some(99),
            ..Default::default()
        };
        assert_eq!(
            set_document(&patch),
            doc! {"$set": {"release_year": "1998", "metacritic_rating": 99}}
        );
    }

    #[test]
    fn only_object_ids_resolve() {
        let oid = ObjectId::new();
        assert_eq!(object_id(&GameId::new(oid.to_hex())), Some(oid));
        assert_eq!(object_id(&GameId::new("not-an-id")), None);
    }
}
