use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::GroupStatsEntity;

/// One developer or publisher with aggregate rating figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroupStatsResponse {
    pub name: String,
    pub game_count: u64,
    /// Mean over rated games, rounded to two decimals.
    pub average_rating: Option<f64>,
    pub highest_rating: Option<i32>,
    pub lowest_rating: Option<i32>,
}

impl From<GroupStatsEntity> for GroupStatsResponse {
    fn from(entity: GroupStatsEntity) -> Self {
        Self {
            name: entity.name,
            game_count: entity.game_count,
            average_rating: entity
                .average_rating
                .map(|average| (average * 100.0).round() / 100.0),
            highest_rating: entity.highest_rating,
            lowest_rating: entity.lowest_rating,
        }
    }
}
