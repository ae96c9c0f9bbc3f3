use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    filter::to_document,
    models::{MongoGameDocument, MongoGroupStatsDocument, doc_id, object_id, set_document},
};
use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameId, GamePatchEntity, GroupStatsEntity, NewGameEntity, StatsGroup},
    predicate::Predicate,
    storage::StorageResult,
};

const GAME_COLLECTION_NAME: &str = "games";
/// Fields indexed for the exact filters and the rating reports.
const INDEXED_FIELDS: [&str; 4] = ["game_title", "developer", "publisher", "metacritic_rating"];

#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    // Held so the connection pool lives as long as the database handle.
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;
        for field in INDEXED_FIELDS {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(Some(format!("{field}_idx")))
                        .build(),
                )
                .build();

            collection
                .create_index(index)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection: GAME_COLLECTION_NAME,
                    index: field,
                    source,
                })?;
        }
        Ok(())
    }

    async fn collection(&self) -> Collection<MongoGameDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn list_games(&self) -> MongoResult<Vec<GameEntity>> {
        let documents: Vec<MongoGameDocument> = self
            .collection()
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn find_game(&self, id: GameId) -> MongoResult<Option<GameEntity>> {
        let Some(oid) = object_id(&id) else {
            return Ok(None);
        };

        let document = self
            .collection()
            .await
            .find_one(doc_id(oid))
            .await
            .map_err(|source| MongoDaoError::LoadGame {
                id: id.to_string(),
                source,
            })?;

        Ok(document.map(Into::into))
    }

    async fn insert_game(&self, game: NewGameEntity) -> MongoResult<GameEntity> {
        let title = game.game_title.clone();
        let document = MongoGameDocument::new(ObjectId::new(), game);

        self.collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertGame { title, source })?;

        Ok(document.into())
    }

    async fn update_game(
        &self,
        id: GameId,
        patch: GamePatchEntity,
    ) -> MongoResult<Option<GameEntity>> {
        let Some(oid) = object_id(&id) else {
            return Ok(None);
        };

        let document = self
            .collection()
            .await
            .find_one_and_update(doc_id(oid), set_document(&patch))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::UpdateGame {
                id: id.to_string(),
                source,
            })?;

        Ok(document.map(Into::into))
    }

    async fn delete_game(&self, id: GameId) -> MongoResult<bool> {
        let Some(oid) = object_id(&id) else {
            return Ok(false);
        };

        let result = self
            .collection()
            .await
            .delete_one(doc_id(oid))
            .await
            .map_err(|source| MongoDaoError::DeleteGame {
                id: id.to_string(),
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_by_filter(&self, predicate: Predicate) -> MongoResult<Vec<GameEntity>> {
        let filter = to_document(&predicate);
        debug!(%filter, "querying games by filter");

        let documents: Vec<MongoGameDocument> = self
            .collection()
            .await
            .find(filter)
            .await
            .map_err(|source| MongoDaoError::FilterGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::FilterGames { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    /// Rated games ordered by rating; `direction` is `-1` for best first, `1` for worst first.
    async fn ranked(&self, limit: usize, direction: i32) -> MongoResult<Vec<GameEntity>> {
        let documents: Vec<MongoGameDocument> = self
            .collection()
            .await
            .find(doc! {"metacritic_rating": {"$type": "number"}})
            .sort(doc! {"metacritic_rating": direction, "_id": 1})
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await
            .map_err(|source| MongoDaoError::RankGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::RankGames { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn group_stats(&self, group: StatsGroup) -> MongoResult<Vec<GroupStatsEntity>> {
        let field = group.field_name();
        let key = format!("${field}");
        let mut matcher = Document::new();
        matcher.insert(field, doc! {"$type": "string"});

        let pipeline = vec![
            doc! {"$match": matcher},
            doc! {"$group": {
                "_id": key,
                "game_count": {"$sum": 1},
                "average_rating": {"$avg": "$metacritic_rating"},
                "highest_rating": {"$max": "$metacritic_rating"},
                "lowest_rating": {"$min": "$metacritic_rating"}
            }},
            doc! {"$sort": {"game_count": -1, "_id": 1}},
        ];

        let rows: Vec<MongoGroupStatsDocument> = self
            .collection()
            .await
            .aggregate(pipeline)
            .with_type::<MongoGroupStatsDocument>()
            .await
            .map_err(|source| MongoDaoError::AggregateStats {
                group: field,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::AggregateStats {
                group: field,
                source,
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl GameStore for MongoGameStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await.map_err(Into::into) })
    }

    fn find_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_game(game).await.map_err(Into::into) })
    }

    fn update_game(
        &self,
        id: GameId,
        patch: GamePatchEntity,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update_game(id, patch).await.map_err(Into::into) })
    }

    fn delete_game(&self, id: GameId) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await.map_err(Into::into) })
    }

    fn find_by_filter(
        &self,
        predicate: Predicate,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_by_filter(predicate).await.map_err(Into::into) })
    }

    fn top_rated(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.ranked(limit, -1).await.map_err(Into::into) })
    }

    fn worst_rated(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.ranked(limit, 1).await.map_err(Into::into) })
    }

    fn developer_stats(&self) -> BoxFuture<'static, StorageResult<Vec<GroupStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .group_stats(StatsGroup::Developer)
                .await
                .map_err(Into::into)
        })
    }

    fn publisher_stats(&self) -> BoxFuture<'static, StorageResult<Vec<GroupStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .group_stats(StatsGroup::Publisher)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
