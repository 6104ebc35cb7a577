use crate::collection::{CollectionApi, WriteOp, WriteSummary};
use crate::errors::UsageError;
use crate::explain::{ExplainModel, ExplainVerbosity};
use mongodb::bson::{Bson, Document};
use mongodb::options::{
    AggregateOptions, BulkWriteOptions, CountOptions, DistinctOptions, FindOneAndDeleteOptions,
    FindOneAndReplaceOptions, FindOneAndUpdateOptions, FindOptions, InsertManyOptions,
    InsertOneOptions, ReplaceOptions, UpdateModifications, UpdateOptions,
};
use serde::Serialize;

/// One call shape against the collection, with its arguments.
#[derive(Debug, Clone)]
pub enum Operation {
    Find { filter: Document, options: Option<FindOptions> },
    Aggregate { pipeline: Vec<Document>, options: Option<AggregateOptions> },
    Count { filter: Document, options: Option<CountOptions> },
    Distinct { field: String, filter: Document, options: Option<DistinctOptions> },
    DeleteOne { filter: Document },
    DeleteMany { filter: Document },
    InsertOne { document: Document, options: Option<InsertOneOptions> },
    InsertMany { documents: Vec<Document>, options: Option<InsertManyOptions> },
    ReplaceOne { filter: Document, replacement: Document, options: Option<ReplaceOptions> },
    UpdateOne { filter: Document, update: UpdateModifications, options: Option<UpdateOptions> },
    UpdateMany { filter: Document, update: UpdateModifications, options: Option<UpdateOptions> },
    BulkWrite { requests: Vec<WriteOp>, options: Option<BulkWriteOptions> },
    FindOneAndDelete { filter: Document, options: Option<FindOneAndDeleteOptions> },
    FindOneAndReplace { filter: Document, replacement: Document, options: Option<FindOneAndReplaceOptions> },
    FindOneAndUpdate { filter: Document, update: UpdateModifications, options: Option<FindOneAndUpdateOptions> },
    Explain { model: ExplainModel, verbosity: ExplainVerbosity },
}

impl Operation {
    /// Collection method this operation calls.
    pub fn method(&self) -> &'static str {
        match self {
            Operation::Find { .. } => "find",
            Operation::Aggregate { .. } => "aggregate",
            Operation::Count { .. } => "count",
            Operation::Distinct { .. } => "distinct",
            Operation::DeleteOne { .. } => "delete_one",
            Operation::DeleteMany { .. } => "delete_many",
            Operation::InsertOne { .. } => "insert_one",
            Operation::InsertMany { .. } => "insert_many",
            Operation::ReplaceOne { .. } => "replace_one",
            Operation::UpdateOne { .. } => "update_one",
            Operation::UpdateMany { .. } => "update_many",
            Operation::BulkWrite { .. } => "bulk_write",
            Operation::FindOneAndDelete { .. } => "find_one_and_delete",
            Operation::FindOneAndReplace { .. } => "find_one_and_replace",
            Operation::FindOneAndUpdate { .. } => "find_one_and_update",
            Operation::Explain { .. } => "explain",
        }
    }

    /// Whether an options value accompanies the required arguments.
    pub fn has_options(&self) -> bool {
        match self {
            Operation::Find { options, .. } => options.is_some(),
            Operation::Aggregate { options, .. } => options.is_some(),
            Operation::Count { options, .. } => options.is_some(),
            Operation::Distinct { options, .. } => options.is_some(),
            Operation::DeleteOne { .. } | Operation::DeleteMany { .. } => false,
            Operation::InsertOne { options, .. } => options.is_some(),
            Operation::InsertMany { options, .. } => options.is_some(),
            Operation::ReplaceOne { options, .. } => options.is_some(),
            Operation::UpdateOne { options, .. } => options.is_some(),
            Operation::UpdateMany { options, .. } => options.is_some(),
            Operation::BulkWrite { options, .. } => options.is_some(),
            Operation::FindOneAndDelete { options, .. } => options.is_some(),
            Operation::FindOneAndReplace { options, .. } => options.is_some(),
            Operation::FindOneAndUpdate { options, .. } => options.is_some(),
            Operation::Explain { .. } => true,
        }
    }
}

/// What a call handed back. Only ever summarised, never branched on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Documents(Vec<Document>),
    Count(u64),
    Values(Vec<Bson>),
    Write(WriteSummary),
    Document(Option<Document>),
    Explain(Document),
}

impl Outcome {
    pub fn summary(&self) -> String {
        match self {
            Outcome::Documents(docs) => format!("{} document(s)", docs.len()),
            Outcome::Count(n) => format!("count={n}"),
            Outcome::Values(v) => format!("{} distinct value(s)", v.len()),
            Outcome::Write(w) => format!(
                "inserted={} matched={} modified={} deleted={} upserted={}",
                w.inserted, w.matched, w.modified, w.deleted, w.upserted
            ),
            Outcome::Document(Some(_)) => "1 document".to_string(),
            Outcome::Document(None) => "no document".to_string(),
            Outcome::Explain(plan) => {
                let keys: Vec<&str> = plan.keys().map(String::as_str).take(4).collect();
                format!("plan keys: {}", keys.join(","))
            }
        }
    }
}

/// Dispatches `op` to the matching collection method.
pub async fn execute<C: CollectionApi>(col: &C, op: &Operation) -> Result<Outcome, UsageError> {
    let outcome = match op.clone() {
        Operation::Find { filter, options } => Outcome::Documents(col.find(filter, options).await?),
        Operation::Aggregate { pipeline, options } => {
            Outcome::Documents(col.aggregate(pipeline, options).await?)
        }
        Operation::Count { filter, options } => Outcome::Count(col.count(filter, options).await?),
        Operation::Distinct { field, filter, options } => {
            Outcome::Values(col.distinct(&field, filter, options).await?)
        }
        Operation::DeleteOne { filter } => Outcome::Write(col.delete_one(filter).await?),
        Operation::DeleteMany { filter } => Outcome::Write(col.delete_many(filter).await?),
        Operation::InsertOne { document, options } => {
            Outcome::Write(col.insert_one(document, options).await?)
        }
        Operation::InsertMany { documents, options } => {
            Outcome::Write(col.insert_many(documents, options).await?)
        }
        Operation::ReplaceOne { filter, replacement, options } => {
            Outcome::Write(col.replace_one(filter, replacement, options).await?)
        }
        Operation::UpdateOne { filter, update, options } => {
            Outcome::Write(col.update_one(filter, update, options).await?)
        }
        Operation::UpdateMany { filter, update, options } => {
            Outcome::Write(col.update_many(filter, update, options).await?)
        }
        Operation::BulkWrite { requests, options } => {
            Outcome::Write(col.bulk_write(requests, options).await?)
        }
        Operation::FindOneAndDelete { filter, options } => {
            Outcome::Document(col.find_one_and_delete(filter, options).await?)
        }
        Operation::FindOneAndReplace { filter, replacement, options } => {
            Outcome::Document(col.find_one_and_replace(filter, replacement, options).await?)
        }
        Operation::FindOneAndUpdate { filter, update, options } => {
            Outcome::Document(col.find_one_and_update(filter, update, options).await?)
        }
        Operation::Explain { model, verbosity } => Outcome::Explain(col.explain(model, verbosity).await?),
    };
    Ok(outcome)
}
