use super::core::{CollectionApi, WriteOp, WriteSummary};
use crate::errors::UsageError;
use crate::explain::{ExplainModel, ExplainVerbosity};
use futures::stream::TryStreamExt;
use mongodb::bson::{Bson, Document};
use mongodb::options::{
    AggregateOptions, BulkWriteOptions, CountOptions, CursorType, DeleteManyModel, DeleteOneModel,
    DistinctOptions, FindOneAndDeleteOptions, FindOneAndReplaceOptions, FindOneAndUpdateOptions,
    FindOptions, InsertManyOptions, InsertOneModel, InsertOneOptions, ReplaceOptions, UpdateManyModel,
    UpdateModifications, UpdateOneModel, UpdateOptions, WriteModel,
};
use mongodb::results::UpdateResult;
use mongodb::{Client, Collection, Cursor, Database, Namespace};
use std::time::Duration;

/// How long a tailable find waits for its first document before giving up.
const TAIL_WAIT: Duration = Duration::from_secs(1);

/// Most documents a find or aggregate hands back; the rest of the cursor is dropped.
pub const MAX_RESULT_DOCS: usize = 1_000;

/// `CollectionApi` over a live driver collection.
///
/// Holds the client (bulk writes are client-level) and the database (explain
/// is a database command) next to the typed collection handle.
#[derive(Clone, Debug)]
pub struct MongoCollection {
    client: Client,
    database: Database,
    inner: Collection<Document>,
}

impl MongoCollection {
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        let inner = database.collection::<Document>(collection);
        MongoCollection { client, database, inner }
    }

    pub fn namespace(&self) -> Namespace {
        self.inner.namespace()
    }

    pub fn inner(&self) -> &Collection<Document> {
        &self.inner
    }

    fn write_model(&self, op: WriteOp) -> WriteModel {
        let ns = self.namespace();
        match op {
            WriteOp::InsertOne { document } => {
                WriteModel::InsertOne(InsertOneModel::builder().namespace(ns).document(document).build())
            }
            WriteOp::UpdateOne { filter, update, upsert } => {
                let mut model = UpdateOneModel::builder().namespace(ns).filter(filter).update(update).build();
                model.upsert = upsert;
                WriteModel::UpdateOne(model)
            }
            WriteOp::UpdateMany { filter, update, upsert } => {
                let mut model = UpdateManyModel::builder().namespace(ns).filter(filter).update(update).build();
                model.upsert = upsert;
                WriteModel::UpdateMany(model)
            }
            WriteOp::DeleteOne { filter } => {
                WriteModel::DeleteOne(DeleteOneModel::builder().namespace(ns).filter(filter).build())
            }
            WriteOp::DeleteMany { filter } => {
                WriteModel::DeleteMany(DeleteManyModel::builder().namespace(ns).filter(filter).build())
            }
        }
    }
}

fn is_tailable(options: &Option<FindOptions>) -> bool {
    matches!(
        options.as_ref().and_then(|o| o.cursor_type.clone()),
        Some(CursorType::Tailable | CursorType::TailableAwait)
    )
}

async fn drain(mut cursor: Cursor<Document>, what: &str) -> Result<Vec<Document>, UsageError> {
    let mut docs = Vec::new();
    while docs.len() < MAX_RESULT_DOCS {
        match cursor.try_next().await? {
            Some(doc) => docs.push(doc),
            None => return Ok(docs),
        }
    }
    log::debug!("{what} stopped reading after {MAX_RESULT_DOCS} documents");
    Ok(docs)
}

fn update_summary(r: UpdateResult) -> WriteSummary {
    WriteSummary::updated(r.matched_count, r.modified_count, r.upserted_id.is_some())
}

fn non_negative(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

impl CollectionApi for MongoCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn find(&self, filter: Document, options: Option<FindOptions>) -> Result<Vec<Document>, UsageError> {
        let tailable = is_tailable(&options);
        let mut cursor = self.inner.find(filter).with_options(options).await?;
        if !tailable {
            return drain(cursor, "find").await;
        }
        // A tailable cursor never ends on its own.
        match tokio::time::timeout(TAIL_WAIT, cursor.try_next()).await {
            Ok(next) => Ok(next?.into_iter().collect()),
            Err(_) => {
                log::debug!("tailable find on {} produced nothing within {TAIL_WAIT:?}", self.name());
                Ok(Vec::new())
            }
        }
    }

    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        options: Option<AggregateOptions>,
    ) -> Result<Vec<Document>, UsageError> {
        let cursor = self.inner.aggregate(pipeline).with_options(options).await?;
        drain(cursor, "aggregate").await
    }

    async fn count(&self, filter: Document, options: Option<CountOptions>) -> Result<u64, UsageError> {
        Ok(self.inner.count_documents(filter).with_options(options).await?)
    }

    async fn distinct(
        &self,
        field: &str,
        filter: Document,
        options: Option<DistinctOptions>,
    ) -> Result<Vec<Bson>, UsageError> {
        Ok(self.inner.distinct(field, filter).with_options(options).await?)
    }

    async fn delete_one(&self, filter: Document) -> Result<WriteSummary, UsageError> {
        let r = self.inner.delete_one(filter).await?;
        Ok(WriteSummary::deleted(r.deleted_count))
    }

    async fn delete_many(&self, filter: Document) -> Result<WriteSummary, UsageError> {
        let r = self.inner.delete_many(filter).await?;
        Ok(WriteSummary::deleted(r.deleted_count))
    }

    async fn insert_one(
        &self,
        document: Document,
        options: Option<InsertOneOptions>,
    ) -> Result<WriteSummary, UsageError> {
        self.inner.insert_one(document).with_options(options).await?;
        Ok(WriteSummary::inserted(1))
    }

    async fn insert_many(
        &self,
        documents: Vec<Document>,
        options: Option<InsertManyOptions>,
    ) -> Result<WriteSummary, UsageError> {
        let r = self.inner.insert_many(documents).with_options(options).await?;
        Ok(WriteSummary::inserted(r.inserted_ids.len() as u64))
    }

    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
        options: Option<ReplaceOptions>,
    ) -> Result<WriteSummary, UsageError> {
        let r = self.inner.replace_one(filter, replacement).with_options(options).await?;
        Ok(update_summary(r))
    }

    async fn update_one(
        &self,
        filter: Document,
        update: UpdateModifications,
        options: Option<UpdateOptions>,
    ) -> Result<WriteSummary, UsageError> {
        let r = self.inner.update_one(filter, update).with_options(options).await?;
        Ok(update_summary(r))
    }

    async fn update_many(
        &self,
        filter: Document,
        update: UpdateModifications,
        options: Option<UpdateOptions>,
    ) -> Result<WriteSummary, UsageError> {
        let r = self.inner.update_many(filter, update).with_options(options).await?;
        Ok(update_summary(r))
    }

    async fn bulk_write(
        &self,
        requests: Vec<WriteOp>,
        options: Option<BulkWriteOptions>,
    ) -> Result<WriteSummary, UsageError> {
        let models: Vec<WriteModel> = requests.into_iter().map(|op| self.write_model(op)).collect();
        let r = self.client.bulk_write(models).with_options(options).await?;
        Ok(WriteSummary {
            inserted: non_negative(r.inserted_count),
            matched: non_negative(r.matched_count),
            modified: non_negative(r.modified_count),
            deleted: non_negative(r.deleted_count),
            upserted: non_negative(r.upserted_count),
        })
    }

    async fn find_one_and_delete(
        &self,
        filter: Document,
        options: Option<FindOneAndDeleteOptions>,
    ) -> Result<Option<Document>, UsageError> {
        Ok(self.inner.find_one_and_delete(filter).with_options(options).await?)
    }

    async fn find_one_and_replace(
        &self,
        filter: Document,
        replacement: Document,
        options: Option<FindOneAndReplaceOptions>,
    ) -> Result<Option<Document>, UsageError> {
        Ok(self.inner.find_one_and_replace(filter, replacement).with_options(options).await?)
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: UpdateModifications,
        options: Option<FindOneAndUpdateOptions>,
    ) -> Result<Option<Document>, UsageError> {
        Ok(self.inner.find_one_and_update(filter, update).with_options(options).await?)
    }

    async fn explain(&self, model: ExplainModel, verbosity: ExplainVerbosity) -> Result<Document, UsageError> {
        let command = model.to_command(self.name(), verbosity);
        log::debug!("explain {} on {}: {command}", model.kind(), self.name());
        Ok(self.database.run_command(command).await?)
    }
}
