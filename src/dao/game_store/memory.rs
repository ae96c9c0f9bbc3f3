//! Process-local catalog used for development runs and tests.

use std::{cmp::Reverse, sync::Arc};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameId, GamePatchEntity, GroupStatsEntity, NewGameEntity, StatsGroup},
    predicate::Predicate,
    storage::StorageResult,
};

/// In-memory [`GameStore`] keeping games in insertion order.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    games: Arc<RwLock<IndexMap<GameId, GameEntity>>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `games`, assigning identifiers as on insert.
    pub fn seeded(games: impl IntoIterator<Item = NewGameEntity>) -> Self {
        let games = games
            .into_iter()
            .map(|game| {
                let game = game.with_id(next_id());
                (game.id.clone(), game)
            })
            .collect();
        Self {
            games: Arc::new(RwLock::new(games)),
        }
    }

    async fn snapshot(&self) -> Vec<GameEntity> {
        self.games.read().await.values().cloned().collect()
    }

    async fn ranked(&self, limit: usize, best_first: bool) -> Vec<GameEntity> {
        let mut rated: Vec<(i32, GameEntity)> = self
            .snapshot()
            .await
            .into_iter()
            .filter_map(|game| game.metacritic_rating.map(|rating| (rating, game)))
            .collect();

        // Stable sorts keep insertion order among equal ratings.
        if best_first {
            rated.sort_by_key(|(rating, _)| Reverse(*rating));
        } else {
            rated.sort_by_key(|(rating, _)| *rating);
        }

        rated
            .into_iter()
            .take(limit)
            .map(|(_, game)| game)
            .collect()
    }
}

fn next_id() -> GameId {
    GameId::new(Uuid::new_v4().simple().to_string())
}

/// Aggregate per-group counts and rating statistics.
fn group_stats(games: &[GameEntity], group: StatsGroup) -> Vec<GroupStatsEntity> {
    let mut rows: IndexMap<&str, (u64, Vec<i32>)> = IndexMap::new();
    for game in games {
        let Some(key) = group.key_of(game) else {
            continue;
        };
        let entry = rows.entry(key).or_default();
        entry.0 += 1;
        entry.1.extend(game.metacritic_rating);
    }

    let mut stats: Vec<GroupStatsEntity> = rows
        .into_iter()
        .map(|(name, (game_count, ratings))| GroupStatsEntity {
            name: name.to_owned(),
            game_count,
            average_rating: (!ratings.is_empty())
                .then(|| ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64),
            highest_rating: ratings.iter().copied().max(),
            lowest_rating: ratings.iter().copied().min(),
        })
        .collect();

    stats.sort_by(|a, b| {
        b.game_count
            .cmp(&a.game_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}

impl GameStore for MemoryGameStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.snapshot().await) })
    }

    fn find_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.games.read().await.get(&id).cloned()) })
    }

    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let game = game.with_id(next_id());
            store
                .games
                .write()
                .await
                .insert(game.id.clone(), game.clone());
            Ok(game)
        })
    }

    fn update_game(
        &self,
        id: GameId,
        patch: GamePatchEntity,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut games = store.games.write().await;
            let Some(game) = games.get_mut(&id) else {
                return Ok(None);
            };
            patch.apply_to(game);
            Ok(Some(game.clone()))
        })
    }

    fn delete_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.games.write().await.shift_remove(&id).is_some()) })
    }

    fn find_by_filter(
        &self,
        predicate: Predicate,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let games = store.games.read().await;
            Ok(games
                .values()
                .filter(|game| predicate.matches(game))
                .cloned()
                .collect())
        })
    }

    fn top_rated(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.ranked(limit, true).await) })
    }

    fn worst_rated(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.ranked(limit, false).await) })
    }

    fn developer_stats(&self) -> BoxFuture<'static, StorageResult<Vec<GroupStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(group_stats(&store.snapshot().await, StatsGroup::Developer)) })
    }

    fn publisher_stats(&self) -> BoxFuture<'static, StorageResult<Vec<GroupStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(group_stats(&store.snapshot().await, StatsGroup::Publisher)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
