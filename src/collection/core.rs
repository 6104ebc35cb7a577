use crate::errors::UsageError;
use crate::explain::{ExplainModel, ExplainVerbosity};
use mongodb::bson::{Bson, Document};
use mongodb::options::{
    AggregateOptions, BulkWriteOptions, CountOptions, DistinctOptions, FindOneAndDeleteOptions,
    FindOneAndReplaceOptions, FindOneAndUpdateOptions, FindOptions, InsertManyOptions,
    InsertOneOptions, ReplaceOptions, UpdateModifications, UpdateOptions,
};
use serde::Serialize;

/// Counts reported by a write. Fields a given write cannot affect stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub inserted: u64,
    pub matched: u64,
    pub modified: u64,
    pub deleted: u64,
    pub upserted: u64,
}

impl WriteSummary {
    pub fn inserted(n: u64) -> Self {
        WriteSummary { inserted: n, ..Default::default() }
    }

    pub fn deleted(n: u64) -> Self {
        WriteSummary { deleted: n, ..Default::default() }
    }

    pub fn updated(matched: u64, modified: u64, upserted: bool) -> Self {
        WriteSummary { matched, modified, upserted: u64::from(upserted), ..Default::default() }
    }
}

/// One request inside a bulk write. The namespace is supplied by the collection.
#[derive(Debug, Clone)]
pub enum WriteOp {
    InsertOne { document: Document },
    UpdateOne { filter: Document, update: UpdateModifications, upsert: Option<bool> },
    UpdateMany { filter: Document, update: UpdateModifications, upsert: Option<bool> },
    DeleteOne { filter: Document },
    DeleteMany { filter: Document },
}

impl WriteOp {
    pub fn name(&self) -> &'static str {
        match self {
            WriteOp::InsertOne { .. } => "insertOne",
            WriteOp::UpdateOne { .. } => "updateOne",
            WriteOp::UpdateMany { .. } => "updateMany",
            WriteOp::DeleteOne { .. } => "deleteOne",
            WriteOp::DeleteMany { .. } => "deleteMany",
        }
    }
}

/// The collection surface the usage catalogue calls into.
///
/// Required parameters are positional; everything optional travels in a single
/// driver options value. An empty filter document means "no criteria".
#[allow(async_fn_in_trait)]
pub trait CollectionApi {
    /// Collection name, as used in explain commands.
    fn name(&self) -> &str;

    async fn find(&self, filter: Document, options: Option<FindOptions>) -> Result<Vec<Document>, UsageError>;

    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        options: Option<AggregateOptions>,
    ) -> Result<Vec<Document>, UsageError>;

    async fn count(&self, filter: Document, options: Option<CountOptions>) -> Result<u64, UsageError>;

    async fn distinct(
        &self,
        field: &str,
        filter: Document,
        options: Option<DistinctOptions>,
    ) -> Result<Vec<Bson>, UsageError>;

    async fn delete_one(&self, filter: Document) -> Result<WriteSummary, UsageError>;

    async fn delete_many(&self, filter: Document) -> Result<WriteSummary, UsageError>;

    async fn insert_one(
        &self,
        document: Document,
        options: Option<InsertOneOptions>,
    ) -> Result<WriteSummary, UsageError>;

    async fn insert_many(
        &self,
        documents: Vec<Document>,
        options: Option<InsertManyOptions>,
    ) -> Result<WriteSummary, UsageError>;

    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
        options: Option<ReplaceOptions>,
    ) -> Result<WriteSummary, UsageError>;

    async fn update_one(
        &self,
        filter: Document,
        update: UpdateModifications,
        options: Option<UpdateOptions>,
    ) -> Result<WriteSummary, UsageError>;

    async fn update_many(
        &self,
        filter: Document,
        update: UpdateModifications,
        options: Option<UpdateOptions>,
    ) -> Result<WriteSummary, UsageError>;

    async fn bulk_write(
        &self,
        requests: Vec<WriteOp>,
        options: Option<BulkWriteOptions>,
    ) -> Result<WriteSummary, UsageError>;

    async fn find_one_and_delete(
        &self,
        filter: Document,
        options: Option<FindOneAndDeleteOptions>,
    ) -> Result<Option<Document>, UsageError>;

    async fn find_one_and_replace(
        &self,
        filter: Document,
        replacement: Document,
        options: Option<FindOneAndReplaceOptions>,
    ) -> Result<Option<Document>, UsageError>;

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: UpdateModifications,
        options: Option<FindOneAndUpdateOptions>,
    ) -> Result<Option<Document>, UsageError>;

    async fn explain(&self, model: ExplainModel, verbosity: ExplainVerbosity) -> Result<Document, UsageError>;
}
