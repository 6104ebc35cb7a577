//! Explain support.
//!
//! The driver has no explain helper, so an explained operation is described by
//! a model carrying its required and optional parameters, rendered into an
//! `explain` command and run against the collection's database.

use crate::errors::UsageError;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{CountOptions, FindOptions, UpdateModifications};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExplainVerbosity {
    #[default]
    QueryPlanner,
    ExecutionStats,
    AllPlansExecution,
}

impl ExplainVerbosity {
    pub const ALL: [ExplainVerbosity; 3] = [
        ExplainVerbosity::QueryPlanner,
        ExplainVerbosity::ExecutionStats,
        ExplainVerbosity::AllPlansExecution,
    ];

    /// Server-side spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplainVerbosity::QueryPlanner => "queryPlanner",
            ExplainVerbosity::ExecutionStats => "executionStats",
            ExplainVerbosity::AllPlansExecution => "allPlansExecution",
        }
    }
}

impl fmt::Display for ExplainVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExplainVerbosity {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "queryplanner" => Ok(ExplainVerbosity::QueryPlanner),
            "executionstats" => Ok(ExplainVerbosity::ExecutionStats),
            "allplansexecution" => Ok(ExplainVerbosity::AllPlansExecution),
            _ => Err(UsageError::UnknownVerbosity(s.to_string())),
        }
    }
}

/// An explained `count`.
#[derive(Debug, Clone, Default)]
pub struct CountModel {
    pub filter: Document,
    pub options: Option<CountOptions>,
}

impl CountModel {
    pub fn new(filter: Document) -> Self {
        CountModel { filter, options: None }
    }

    pub fn with_options(mut self, options: CountOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// An explained `find`.
#[derive(Debug, Clone, Default)]
pub struct FindModel {
    pub filter: Document,
    pub options: Option<FindOptions>,
}

impl FindModel {
    pub fn new(filter: Document) -> Self {
        FindModel { filter, options: None }
    }

    pub fn with_options(mut self, options: FindOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// An explained `updateOne`.
#[derive(Debug, Clone)]
pub struct UpdateModel {
    pub filter: Document,
    pub update: UpdateModifications,
    pub upsert: Option<bool>,
}

impl UpdateModel {
    pub fn new(filter: Document, update: UpdateModifications) -> Self {
        UpdateModel { filter, update, upsert: None }
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }
}

#[derive(Debug, Clone)]
pub enum ExplainModel {
    Count(CountModel),
    Find(FindModel),
    Update(UpdateModel),
}

impl ExplainModel {
    pub fn kind(&self) -> &'static str {
        match self {
            ExplainModel::Count(_) => "count",
            ExplainModel::Find(_) => "find",
            ExplainModel::Update(_) => "update",
        }
    }

    /// Renders the `explain` command for `collection`.
    pub fn to_command(&self, collection: &str, verbosity: ExplainVerbosity) -> Document {
        let inner = match self {
            ExplainModel::Count(m) => count_command(collection, m),
            ExplainModel::Find(m) => find_command(collection, m),
            ExplainModel::Update(m) => update_command(collection, m),
        };
        doc! { "explain": inner, "verbosity": verbosity.as_str() }
    }
}

fn saturating_i64(n: u64) -> Bson {
    Bson::Int64(i64::try_from(n).unwrap_or(i64::MAX))
}

fn max_time_ms(d: Duration) -> Bson {
    Bson::Int64(i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

fn count_command(collection: &str, m: &CountModel) -> Document {
    let mut cmd = doc! { "count": collection, "query": m.filter.clone() };
    if let Some(o) = &m.options {
        if let Some(limit) = o.limit {
            cmd.insert("limit", saturating_i64(limit));
        }
        if let Some(skip) = o.skip {
            cmd.insert("skip", saturating_i64(skip));
        }
        if let Some(d) = o.max_time {
            cmd.insert("maxTimeMS", max_time_ms(d));
        }
    }
    cmd
}

fn find_command(collection: &str, m: &FindModel) -> Document {
    let mut cmd = doc! { "find": collection, "filter": m.filter.clone() };
    if let Some(o) = &m.options {
        if let Some(p) = &o.projection {
            cmd.insert("projection", p.clone());
        }
        if let Some(s) = &o.sort {
            cmd.insert("sort", s.clone());
        }
        if let Some(skip) = o.skip {
            cmd.insert("skip", saturating_i64(skip));
        }
        if let Some(limit) = o.limit {
            cmd.insert("limit", Bson::Int64(limit));
        }
        if let Some(d) = o.max_time {
            cmd.insert("maxTimeMS", max_time_ms(d));
        }
    }
    cmd
}

fn update_command(collection: &str, m: &UpdateModel) -> Document {
    let update = mongodb::bson::to_bson(&m.update).unwrap_or(Bson::Null);
    let mut statement = doc! { "q": m.filter.clone(), "u": update, "multi": false };
    if let Some(upsert) = m.upsert {
        statement.insert("upsert", upsert);
    }
    doc! { "update": collection, "updates": [statement] }
}
