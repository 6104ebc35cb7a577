use super::exec::Operation;
use crate::collection::WriteOp;
use crate::errors::UsageError;
use crate::explain::{CountModel, ExplainModel, ExplainVerbosity, FindModel, UpdateModel};
use mongodb::bson::{Document, doc};
use mongodb::options::{
    Acknowledgment, AggregateOptions, BulkWriteOptions, CountOptions, CursorType, DistinctOptions,
    FindOneAndDeleteOptions, FindOneAndReplaceOptions, FindOneAndUpdateOptions, FindOptions,
    InsertManyOptions, InsertOneOptions, ReplaceOptions, ReturnDocument, UpdateModifications,
    UpdateOptions, WriteConcern,
};
use std::time::Duration;

/// One named example invocation.
#[derive(Debug, Clone)]
pub struct Step {
    pub name: &'static str,
    pub group: &'static str,
    pub operation: Operation,
}

impl Step {
    fn new(group: &'static str, name: &'static str, operation: Operation) -> Self {
        Step { name, group, operation }
    }
}

fn x1() -> Document {
    doc! { "x": 1 }
}

fn set_x2() -> UpdateModifications {
    UpdateModifications::Document(doc! { "$set": { "x": 2 } })
}

fn set_x2_pipeline() -> UpdateModifications {
    UpdateModifications::Pipeline(vec![doc! { "$set": { "x": 2 } }])
}

fn match_skip_pipeline() -> Vec<Document> {
    vec![doc! { "$match": { "x": 1 } }, doc! { "$skip": 10 }]
}

fn majority() -> WriteConcern {
    WriteConcern::builder().w(Acknowledgment::Majority).build()
}

fn unordered() -> BulkWriteOptions {
    let mut options = BulkWriteOptions::default();
    options.ordered = Some(false);
    options
}

fn mixed_writes() -> Vec<WriteOp> {
    vec![
        WriteOp::InsertOne { document: x1() },
        WriteOp::UpdateMany { filter: x1(), update: set_x2(), upsert: None },
        WriteOp::DeleteOne { filter: x1() },
    ]
}

/// Every request kind, with an upsert and an empty-criteria delete.
fn all_request_kinds() -> Vec<WriteOp> {
    vec![
        WriteOp::InsertOne { document: x1() },
        WriteOp::UpdateMany { filter: x1(), update: set_x2(), upsert: None },
        WriteOp::UpdateOne {
            filter: doc! { "x": 3 },
            update: UpdateModifications::Document(doc! { "$set": { "x": 4 } }),
            upsert: Some(true),
        },
        WriteOp::DeleteOne { filter: x1() },
        WriteOp::DeleteMany { filter: doc! {} },
    ]
}

fn find_steps() -> Vec<Step> {
    vec![
        // no criteria at all
        Step::new("find", "find", Operation::Find { filter: doc! {}, options: None }),
        Step::new("find", "find-with-criteria", Operation::Find { filter: x1(), options: None }),
        Step::new(
            "find",
            "find-with-limit",
            Operation::Find { filter: x1(), options: Some(FindOptions::builder().limit(10_i64).build()) },
        ),
        Step::new(
            "find",
            "find-tailable",
            Operation::Find {
                filter: doc! {},
                options: Some(FindOptions::builder().cursor_type(CursorType::TailableAwait).build()),
            },
        ),
        Step::new(
            "find",
            "find-skip-tailable",
            Operation::Find {
                filter: doc! {},
                options: Some(
                    FindOptions::builder().skip(20_u64).cursor_type(CursorType::TailableAwait).build(),
                ),
            },
        ),
    ]
}

fn aggregate_steps() -> Vec<Step> {
    vec![
        Step::new(
            "aggregate",
            "aggregate",
            Operation::Aggregate { pipeline: match_skip_pipeline(), options: None },
        ),
        Step::new(
            "aggregate",
            "aggregate-with-options",
            Operation::Aggregate {
                pipeline: match_skip_pipeline(),
                options: Some(
                    AggregateOptions::builder()
                        .allow_disk_use(true)
                        .max_time(Duration::from_secs(1))
                        .build(),
                ),
            },
        ),
    ]
}

fn count_and_distinct_steps() -> Vec<Step> {
    vec![
        Step::new("count", "count", Operation::Count { filter: doc! {}, options: None }),
        Step::new(
            "count",
            "count-with-options",
            Operation::Count {
                filter: x1(),
                options: Some(CountOptions::builder().max_time(Duration::from_secs(1)).build()),
            },
        ),
        Step::new(
            "count",
            "count-all-with-max-time",
            Operation::Count {
                filter: doc! {},
                options: Some(CountOptions::builder().max_time(Duration::from_secs(2)).build()),
            },
        ),
        Step::new(
            "distinct",
            "distinct",
            Operation::Distinct { field: "y".into(), filter: doc! {}, options: None },
        ),
        Step::new(
            "distinct",
            "distinct-with-criteria",
            Operation::Distinct { field: "y".into(), filter: x1(), options: None },
        ),
        Step::new(
            "distinct",
            "distinct-with-max-time",
            Operation::Distinct {
                field: "y".into(),
                filter: x1(),
                options: Some(DistinctOptions::builder().max_time(Duration::from_secs(2)).build()),
            },
        ),
    ]
}

fn write_steps() -> Vec<Step> {
    vec![
        // delete has no options value
        Step::new("delete", "delete-one", Operation::DeleteOne { filter: x1() }),
        Step::new("delete", "delete-one-any", Operation::DeleteOne { filter: doc! {} }),
        Step::new("delete", "delete-many", Operation::DeleteMany { filter: x1() }),
        Step::new("insert", "insert-one", Operation::InsertOne { document: x1(), options: None }),
        Step::new(
            "insert",
            "insert-one-majority",
            Operation::InsertOne {
                document: x1(),
                options: Some(InsertOneOptions::builder().write_concern(majority()).build()),
            },
        ),
        Step::new(
            "insert",
            "insert-many",
            Operation::InsertMany { documents: vec![x1(), doc! { "x": 2 }], options: None },
        ),
        Step::new(
            "insert",
            "insert-many-unordered",
            Operation::InsertMany {
                documents: vec![x1(), doc! { "x": 2 }],
                options: Some(InsertManyOptions::builder().ordered(false).build()),
            },
        ),
        Step::new(
            "insert",
            "insert-many-majority",
            Operation::InsertMany {
                documents: vec![x1(), doc! { "x": 2 }],
                options: Some(InsertManyOptions::builder().ordered(true).write_concern(majority()).build()),
            },
        ),
        Step::new(
            "replace",
            "replace-one",
            Operation::ReplaceOne { filter: x1(), replacement: doc! { "x": 2 }, options: None },
        ),
        Step::new(
            "replace",
            "replace-one-upsert",
            Operation::ReplaceOne {
                filter: x1(),
                replacement: doc! { "x": 2 },
                options: Some(ReplaceOptions::builder().upsert(true).build()),
            },
        ),
        Step::new(
            "update",
            "update-one",
            Operation::UpdateOne { filter: x1(), update: set_x2(), options: None },
        ),
        Step::new(
            "update",
            "update-one-upsert",
            Operation::UpdateOne {
                filter: x1(),
                update: set_x2(),
                options: Some(UpdateOptions::builder().upsert(true).build()),
            },
        ),
        Step::new(
            "update",
            "update-one-pipeline",
            Operation::UpdateOne {
                filter: x1(),
                update: set_x2_pipeline(),
                options: Some(UpdateOptions::builder().upsert(true).build()),
            },
        ),
        Step::new(
            "update",
            "update-many",
            Operation::UpdateMany { filter: x1(), update: set_x2(), options: None },
        ),
        Step::new(
            "update",
            "update-many-upsert",
            Operation::UpdateMany {
                filter: x1(),
                update: set_x2(),
                options: Some(UpdateOptions::builder().upsert(true).build()),
            },
        ),
        Step::new(
            "update",
            "update-many-pipeline",
            Operation::UpdateMany {
                filter: x1(),
                update: set_x2_pipeline(),
                options: Some(UpdateOptions::builder().upsert(true).build()),
            },
        ),
        Step::new(
            "bulk-write",
            "bulk-write",
            Operation::BulkWrite { requests: mixed_writes(), options: None },
        ),
        Step::new(
            "bulk-write",
            "bulk-write-unordered",
            Operation::BulkWrite {
                requests: mixed_writes(),
                options: Some(unordered()),
            },
        ),
        Step::new(
            "bulk-write",
            "bulk-write-mixed",
            Operation::BulkWrite { requests: all_request_kinds(), options: Some(unordered()) },
        ),
    ]
}

fn find_and_modify_steps() -> Vec<Step> {
    vec![
        Step::new(
            "find-one-and-delete",
            "find-one-and-delete",
            Operation::FindOneAndDelete { filter: x1(), options: None },
        ),
        Step::new(
            "find-one-and-delete",
            "find-one-and-delete-projection",
            Operation::FindOneAndDelete {
                filter: x1(),
                options: Some(FindOneAndDeleteOptions::builder().projection(doc! { "y": 1 }).build()),
            },
        ),
        Step::new(
            "find-one-and-replace",
            "find-one-and-replace",
            Operation::FindOneAndReplace { filter: x1(), replacement: doc! { "_id": 3, "x": 2 }, options: None },
        ),
        Step::new(
            "find-one-and-replace",
            "find-one-and-replace-after",
            Operation::FindOneAndReplace {
                filter: x1(),
                replacement: doc! { "_id": 3, "x": 2 },
                options: Some(
                    FindOneAndReplaceOptions::builder().return_document(ReturnDocument::After).build(),
                ),
            },
        ),
        Step::new(
            "find-one-and-update",
            "find-one-and-update",
            Operation::FindOneAndUpdate { filter: x1(), update: set_x2(), options: None },
        ),
        Step::new(
            "find-one-and-update",
            "find-one-and-update-after",
            Operation::FindOneAndUpdate {
                filter: x1(),
                update: set_x2(),
                options: Some(
                    FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build(),
                ),
            },
        ),
        Step::new(
            "find-one-and-update",
            "find-one-and-update-pipeline",
            Operation::FindOneAndUpdate {
                filter: x1(),
                update: set_x2_pipeline(),
                options: Some(
                    FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build(),
                ),
            },
        ),
    ]
}

fn explain_steps() -> Vec<Step> {
    vec![
        Step::new(
            "explain",
            "explain-count",
            Operation::Explain {
                model: ExplainModel::Count(CountModel::new(x1())),
                verbosity: ExplainVerbosity::QueryPlanner,
            },
        ),
        Step::new(
            "explain",
            "explain-find",
            Operation::Explain {
                model: ExplainModel::Find(FindModel::new(x1())),
                verbosity: ExplainVerbosity::AllPlansExecution,
            },
        ),
        Step::new(
            "explain",
            "explain-update-one",
            Operation::Explain {
                model: ExplainModel::Update(
                    UpdateModel::new(x1(), UpdateModifications::Document(doc! { "$inc": { "x": 2 } }))
                        .upsert(false),
                ),
                verbosity: ExplainVerbosity::QueryPlanner,
            },
        ),
    ]
}

/// The full usage example, in execution order.
pub fn catalogue() -> Vec<Step> {
    let mut steps = find_steps();
    steps.extend(aggregate_steps());
    steps.extend(count_and_distinct_steps());
    steps.extend(write_steps());
    steps.extend(find_and_modify_steps());
    steps.extend(explain_steps());
    steps
}

/// Keeps the steps whose name or group appears in `names`, preserving order.
/// No names keeps everything.
pub fn select(steps: Vec<Step>, names: &[String]) -> Result<Vec<Step>, UsageError> {
    if names.is_empty() {
        return Ok(steps);
    }
    for n in names {
        if !steps.iter().any(|s| s.name == n || s.group == n) {
            return Err(UsageError::UnknownStep(n.clone()));
        }
    }
    Ok(steps
        .into_iter()
        .filter(|s| names.iter().any(|n| s.name == n || s.group == n))
        .collect())
}
