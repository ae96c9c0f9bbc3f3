pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{GameEntity, GameId, GamePatchEntity, GroupStatsEntity, NewGameEntity};
use crate::dao::predicate::Predicate;
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer holding the game catalog.
///
/// Lookups by id resolve to `Ok(None)` (or `Ok(false)` for deletes) when the record does not
/// exist, including when the identifier is not one the backend could ever have issued.
pub trait GameStore: Send + Sync {
    /// Short backend name reported by the health check.
    fn backend_name(&self) -> &'static str;
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    fn find_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Persist a new game and return it with its freshly assigned identifier.
    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Overwrite the provided fields and return the updated game.
    fn update_game(
        &self,
        id: GameId,
        patch: GamePatchEntity,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    fn delete_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<bool>>;
    fn find_by_filter(
        &self,
        predicate: Predicate,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Rated games, best first.
    fn top_rated(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Rated games, worst first.
    fn worst_rated(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    fn developer_stats(&self) -> BoxFuture<'static, StorageResult<Vec<GroupStatsEntity>>>;
    fn publisher_stats(&self) -> BoxFuture<'static, StorageResult<Vec<GroupStatsEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
