use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoMatchDocument, MongoRoleDocument, MongoSnapshotDocument, doc_id, uuid_as_binary,
    },
};
use crate::dao::{
    match_store::MatchStore,
    models::{MatchRecordEntity, MatchSnapshotEntity, RoleAssignmentEntity},
    storage::StorageResult,
};

const MATCH_COLLECTION_NAME: &str = "matches";
const SNAPSHOT_COLLECTION_NAME: &str = "snapshots";
const ROLE_COLLECTION_NAME: &str = "roles";

/// [`MatchStore`] backed by MongoDB.
#[derive(Clone)]
pub struct MongoMatchStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
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

impl MongoMatchStore {
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
        let database = self.database().await;

        let matches = database.collection::<mongodb::bson::Document>(MATCH_COLLECTION_NAME);
        let match_index = mongodb::IndexModel::builder()
            .keys(doc! {"tournament_name": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("match_tournament_idx".to_owned()))
                    .build(),
            )
            .build();
        matches
            .create_index(match_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: MATCH_COLLECTION_NAME,
                index: "tournament_name",
                source,
            })?;

        // Role lookups are always by (match_id, user_id).
        let roles = database.collection::<MongoRoleDocument>(ROLE_COLLECTION_NAME);
        let role_index = mongodb::IndexModel::builder()
            .keys(doc! {"match_id": 1, "user_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("role_match_user_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        roles
            .create_index(role_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ROLE_COLLECTION_NAME,
                index: "match_id,user_id",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn match_collection(&self) -> Collection<MongoMatchDocument> {
        self.database()
            .await
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
    }

    async fn snapshot_collection(&self) -> Collection<MongoSnapshotDocument> {
        self.database()
            .await
            .collection::<MongoSnapshotDocument>(SNAPSHOT_COLLECTION_NAME)
    }

    async fn role_collection(&self) -> Collection<MongoRoleDocument> {
        self.database()
            .await
            .collection::<MongoRoleDocument>(ROLE_COLLECTION_NAME)
    }

    async fn save_match(&self, record: MatchRecordEntity) -> MongoResult<()> {
        let id = record.id;
        let document: MongoMatchDocument = record.into();
        let collection = self.match_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveMatch { id, source })?;
        Ok(())
    }

    async fn find_match(&self, id: Uuid) -> MongoResult<Option<MatchRecordEntity>> {
        let collection = self.match_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadMatch { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_matches(&self) -> MongoResult<Vec<MatchRecordEntity>> {
        let collection = self.match_collection().await;
        let documents: Vec<MongoMatchDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_snapshot(&self, snapshot: MatchSnapshotEntity) -> MongoResult<()> {
        let id = snapshot.match_id;
        let document = MongoSnapshotDocument::from_entity(snapshot)?;
        let collection = self.snapshot_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveSnapshot { id, source })?;
        Ok(())
    }

    async fn find_snapshot(&self, id: Uuid) -> MongoResult<Option<MatchSnapshotEntity>> {
        let collection = self.snapshot_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadSnapshot { id, source })?;
        document.map(MongoSnapshotDocument::into_entity).transpose()
    }

    async fn save_role(&self, role: RoleAssignmentEntity) -> MongoResult<()> {
        let id = role.match_id;
        let document: MongoRoleDocument = role.into();
        let collection = self.role_collection().await;
        collection
            .replace_one(
                doc! {
                    "match_id": uuid_as_binary(document.match_id),
                    "user_id": uuid_as_binary(document.user_id),
                },
                &document,
            )
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRole { id, source })?;
        Ok(())
    }

    async fn find_role(
        &self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> MongoResult<Option<RoleAssignmentEntity>> {
        let collection = self.role_collection().await;
        let document = collection
            .find_one(doc! {
                "match_id": uuid_as_binary(match_id),
                "user_id": uuid_as_binary(user_id),
            })
            .await
            .map_err(|source| MongoDaoError::LoadRole {
                id: match_id,
                source,
            })?;
        Ok(document.map(Into::into))
    }
}

impl MatchStore for MongoMatchStore {
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_match(id).await.map_err(Into::into) })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches().await.map_err(Into::into) })
    }

    fn save_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_match(record).await.map_err(Into::into) })
    }

    fn find_snapshot(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<MatchSnapshotEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_snapshot(match_id).await.map_err(Into::into) })
    }

    fn save_snapshot(
        &self,
        snapshot: MatchSnapshotEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_snapshot(snapshot).await.map_err(Into::into) })
    }

    fn find_role(
        &self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<RoleAssignmentEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_role(match_id, user_id).await.map_err(Into::into) })
    }

    fn save_role(&self, role: RoleAssignmentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_role(role).await.map_err(Into::into) })
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
