#![allow(dead_code)]

use crud_usage::collection::{CollectionApi, WriteOp, WriteSummary};
use crud_usage::errors::UsageError;
use crud_usage::explain::{ExplainModel, ExplainVerbosity};
use crud_usage::usage::Operation;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{
    AggregateOptions, BulkWriteOptions, CountOptions, DistinctOptions, FindOneAndDeleteOptions,
    FindOneAndReplaceOptions, FindOneAndUpdateOptions, FindOptions, InsertManyOptions,
    InsertOneOptions, ReplaceOptions, UpdateModifications, UpdateOptions,
};
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory `CollectionApi` that records every call as the `Operation` it
/// corresponds to and answers with canned results.
pub struct RecordingCollection {
    name: String,
    calls: Mutex<Vec<Operation>>,
    fail_on: HashSet<&'static str>,
}

impl RecordingCollection {
    pub fn new(name: &str) -> Self {
        RecordingCollection { name: name.to_string(), calls: Mutex::new(Vec::new()), fail_on: HashSet::new() }
    }

    /// Makes every call to `method` fail.
    pub fn failing(mut self, method: &'static str) -> Self {
        self.fail_on.insert(method);
        self
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls().iter().map(|op| op.method()).collect()
    }

    fn record(&self, op: Operation) -> Result<(), UsageError> {
        let method = op.method();
        self.calls.lock().unwrap().push(op);
        if self.fail_on.contains(method) {
            return Err(UsageError::Operation(format!("{method} refused")));
        }
        Ok(())
    }
}

impl CollectionApi for RecordingCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, filter: Document, options: Option<FindOptions>) -> Result<Vec<Document>, UsageError> {
        self.record(Operation::Find { filter, options })?;
        Ok(vec![doc! { "x": 1 }])
    }

    async fn aggregate(&self, pipeline: Vec<Document>, options: Option<AggregateOptions>) -> Result<Vec<Document>, UsageError> {
        self.record(Operation::Aggregate { pipeline, options })?;
        Ok(vec![])
    }

    async fn count(&self, filter: Document, options: Option<CountOptions>) -> Result<u64, UsageError> {
        self.record(Operation::Count { filter, options })?;
        Ok(3)
    }

    async fn distinct(&self, field: &str, filter: Document, options: Option<DistinctOptions>) -> Result<Vec<Bson>, UsageError> {
        self.record(Operation::Distinct { field: field.to_string(), filter, options })?;
        Ok(vec![Bson::Int32(1), Bson::Int32(2)])
    }

    async fn delete_one(&self, filter: Document) -> Result<WriteSummary, UsageError> {
        self.record(Operation::DeleteOne { filter })?;
        Ok(WriteSummary::deleted(1))
    }

    async fn delete_many(&self, filter: Document) -> Result<WriteSummary, UsageError> {
        self.record(Operation::DeleteMany { filter })?;
        Ok(WriteSummary::deleted(2))
    }

    async fn insert_one(&self, document: Document, options: Option<InsertOneOptions>) -> Result<WriteSummary, UsageError> {
        self.record(Operation::InsertOne { document, options })?;
        Ok(WriteSummary::inserted(1))
    }

    async fn insert_many(&self, documents: Vec<Document>, options: Option<InsertManyOptions>) -> Result<WriteSummary, UsageError> {
        let n = documents.len() as u64;
        self.record(Operation::InsertMany { documents, options })?;
        Ok(WriteSummary::inserted(n))
    }

    async fn replace_one(&self, filter: Document, replacement: Document, options: Option<ReplaceOptions>) -> Result<WriteSummary, UsageError> {
        self.record(Operation::ReplaceOne { filter, replacement, options })?;
        Ok(WriteSummary::updated(1, 1, false))
    }

    async fn update_one(&self, filter: Document, update: UpdateModifications, options: Option<UpdateOptions>) -> Result<WriteSummary, UsageError> {
        self.record(Operation::UpdateOne { filter, update, options })?;
        Ok(WriteSummary::updated(1, 1, false))
    }

    async fn update_many(&self, filter: Document, update: UpdateModifications, options: Option<UpdateOptions>) -> Result<WriteSummary, UsageError> {
        self.record(Operation::UpdateMany { filter, update, options })?;
        Ok(WriteSummary::updated(2, 2, false))
    }

    async fn bulk_write(&self, requests: Vec<WriteOp>, options: Option<BulkWriteOptions>) -> Result<WriteSummary, UsageError> {
        self.record(Operation::BulkWrite { requests, options })?;
        Ok(WriteSummary { inserted: 1, matched: 1, modified: 1, deleted: 1, upserted: 0 })
    }

    async fn find_one_and_delete(&self, filter: Document, options: Option<FindOneAndDeleteOptions>) -> Result<Option<Document>, UsageError> {
        self.record(Operation::FindOneAndDelete { filter, options })?;
        Ok(Some(doc! { "x": 1, "y": 5 }))
    }

    async fn find_one_and_replace(&self, filter: Document, replacement: Document, options: Option<FindOneAndReplaceOptions>) -> Result<Option<Document>, UsageError> {
        self.record(Operation::FindOneAndReplace { filter, replacement, options })?;
        Ok(None)
    }

    async fn find_one_and_update(&self, filter: Document, update: UpdateModifications, options: Option<FindOneAndUpdateOptions>) -> Result<Option<Document>, UsageError> {
        self.record(Operation::FindOneAndUpdate { filter, update, options })?;
        Ok(Some(doc! { "x": 2 }))
    }

    async fn explain(&self, model: ExplainModel, verbosity: ExplainVerbosity) -> Result<Document, UsageError> {
        let command = model.to_command(&self.name, verbosity);
        self.record(Operation::Explain { model, verbosity })?;
        Ok(doc! { "queryPlanner": { "namespace": format!("test.{}", self.name) }, "command": command, "ok": 1.0 })
    }
}
