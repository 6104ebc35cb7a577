mod common;

use common::RecordingCollection;
use crud_usage::cli::{Command, OutputMode, run_offline_to, run_to};
use crud_usage::errors::UsageError;
use crud_usage::explain::{ExplainModel, ExplainVerbosity};
use crud_usage::usage::{self, Operation};

async fn capture(col: &RecordingCollection, cmd: Command, mode: OutputMode) -> (Result<(), String>, String) {
    let mut buf: Vec<u8> = Vec::new();
    let res = run_to(col, cmd, mode, &mut buf).await.map_err(|e| e.to_string());
    (res, String::from_utf8(buf).unwrap())
}

#[tokio::test]
async fn list_plain_prints_one_name_per_line() {
    let col = RecordingCollection::new("test");
    let (res, out) = capture(&col, Command::List, OutputMode::Plain).await;
    assert!(res.is_ok());
    let lines: Vec<&str> = out.lines().collect();
    let names: Vec<&str> = usage::catalogue().iter().map(|s| s.name).collect();
    assert_eq!(lines, names);
    // listing never touches the collection
    assert!(col.calls().is_empty());
}

#[tokio::test]
async fn list_json_describes_each_step() {
    let col = RecordingCollection::new("test");
    let (_, out) = capture(&col, Command::List, OutputMode::Json).await;
    let rows: Vec<serde_json::Value> = serde_json::from_str(out.trim()).unwrap();
    let first = &rows[0];
    assert_eq!(first["name"], "find");
    assert_eq!(first["method"], "find");
    assert_eq!(first["with_options"], false);
    let limit = rows.iter().find(|r| r["name"] == "find-with-limit").unwrap();
    assert_eq!(limit["with_options"], true);
}

#[tokio::test]
async fn run_selected_groups() {
    let col = RecordingCollection::new("test");
    let cmd = Command::Run { only: vec!["insert".into()], fail_fast: false };
    let (res, out) = capture(&col, cmd, OutputMode::Plain).await;
    assert!(res.is_ok());
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![
            "insert-one ok",
            "insert-one-majority ok",
            "insert-many ok",
            "insert-many-unordered ok",
            "insert-many-majority ok",
        ]
    );
    assert!(col.methods().iter().all(|m| m.starts_with("insert")));
}

#[tokio::test]
async fn run_reports_failure_as_error() {
    let col = RecordingCollection::new("test").failing("aggregate");
    let cmd = Command::Run { only: vec!["aggregate".into()], fail_fast: false };
    let (res, out) = capture(&col, cmd, OutputMode::Human).await;
    let err = res.unwrap_err();
    assert!(err.contains("2 of 2 step(s) failed"), "{err}");
    assert!(out.contains("FAILED  aggregate "));
    assert!(out.contains("ok=0 failed=2 skipped=0"));
}

#[tokio::test]
async fn run_unknown_step_is_rejected() {
    let col = RecordingCollection::new("test");
    let mut buf = Vec::new();
    let err = run_to(&col, Command::Run { only: vec!["nope".into()], fail_fast: false }, OutputMode::Human, &mut buf)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<UsageError>(), Some(UsageError::UnknownStep(n)) if n == "nope"));
    assert!(col.calls().is_empty());
}

#[tokio::test]
async fn explain_parses_filter_and_verbosity() {
    let col = RecordingCollection::new("things");
    let cmd = Command::Explain {
        kind: "find".into(),
        filter_json: Some(r#"{"x": 1}"#.into()),
        verbosity: ExplainVerbosity::ExecutionStats,
    };
    let (res, out) = capture(&col, cmd, OutputMode::Json).await;
    assert!(res.is_ok());
    let plan: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(plan["command"]["verbosity"], "executionStats");
    assert_eq!(plan["command"]["explain"]["find"], "things");

    match &col.calls()[0] {
        Operation::Explain { model: ExplainModel::Find(m), verbosity } => {
            assert_eq!(*verbosity, ExplainVerbosity::ExecutionStats);
            assert!(m.filter.contains_key("x"));
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn explain_rejects_bad_filter() {
    let col = RecordingCollection::new("test");
    let cmd = Command::Explain { kind: "count".into(), filter_json: Some("[]".into()), verbosity: ExplainVerbosity::QueryPlanner };
    let (res, _) = capture(&col, cmd, OutputMode::Human).await;
    assert!(res.unwrap_err().contains("Invalid filter"));
    assert!(col.calls().is_empty());
}

#[tokio::test]
async fn version_plain() {
    let col = RecordingCollection::new("test");
    let (res, out) = capture(&col, Command::Version, OutputMode::Plain).await;
    assert!(res.is_ok());
    assert!(out.starts_with(&format!("package: crud-usage {}", env!("CARGO_PKG_VERSION"))));
    assert!(out.contains("compiled_features:"));
}

#[test]
fn only_run_and_explain_need_the_collection() {
    assert!(!Command::List.needs_collection());
    assert!(!Command::Version.needs_collection());
    assert!(Command::Run { only: vec![], fail_fast: false }.needs_collection());
    assert!(
        Command::Explain { kind: "find".into(), filter_json: None, verbosity: ExplainVerbosity::QueryPlanner }
            .needs_collection()
    );
}

#[test]
fn offline_commands_match_the_collection_path() {
    let mut buf: Vec<u8> = Vec::new();
    run_offline_to(Command::Version, OutputMode::Plain, &mut buf).unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert!(out.starts_with("package: crud-usage "));

    let mut buf: Vec<u8> = Vec::new();
    run_offline_to(Command::List, OutputMode::Plain, &mut buf).unwrap();
    let listed = String::from_utf8(buf).unwrap();
    assert_eq!(listed.lines().count(), usage::catalogue().len());
    assert!(listed.lines().any(|l| l == "bulk-write-mixed"));
}

#[test]
fn offline_refuses_collection_commands() {
    let mut buf: Vec<u8> = Vec::new();
    let err = run_offline_to(Command::Run { only: vec![], fail_fast: false }, OutputMode::Plain, &mut buf).unwrap_err();
    assert!(matches!(err.downcast_ref::<UsageError>(), Some(UsageError::Operation(_))));
    assert!(buf.is_empty());
}
