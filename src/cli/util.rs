use super::runner::OutputMode;
use crate::errors::UsageError;
use crate::explain::{CountModel, ExplainModel, FindModel};
use mongodb::bson::Document;

pub fn parse_output_mode(s: &Option<String>) -> OutputMode {
    match s.as_ref().map(|x| x.to_lowercase()).as_deref() {
        Some("json") => OutputMode::Json,
        Some("plain") => OutputMode::Plain,
        _ => OutputMode::Human,
    }
}

/// Parses a JSON object into a filter document; empty input means `{}`.
pub fn parse_filter_json(s: &str) -> Result<Document, UsageError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Document::new());
    }
    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    if !value.is_object() {
        return Err(UsageError::InvalidFilter(format!("expected a JSON object, got: {trimmed}")));
    }
    Ok(serde_json::from_value::<Document>(value)?)
}

/// Splits repeated and comma-separated name lists, dropping blanks.
pub fn split_names(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn build_explain_model(kind: &str, filter: Document) -> Result<ExplainModel, UsageError> {
    match kind.to_ascii_lowercase().as_str() {
        "count" => Ok(ExplainModel::Count(CountModel::new(filter))),
        "find" => Ok(ExplainModel::Find(FindModel::new(filter))),
        other => Err(UsageError::InvalidFilter(format!("cannot explain `{other}`; expected count or find"))),
    }
}
