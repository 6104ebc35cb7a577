use crate::collection::CollectionApi;
use crate::errors::UsageError;
use crate::usage::{self, RunPolicy, RunReport, StepStatus};
use std::io::Write;

use super::command::Command;
use super::util::{build_explain_model, parse_filter_json};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Human,
    Plain,
    Json,
}

pub async fn run<C: CollectionApi>(col: &C, cmd: Command) -> Result<(), Box<dyn std::error::Error>> {
    run_with_format(col, cmd, OutputMode::Human).await
}

pub async fn run_with_format<C: CollectionApi>(
    col: &C,
    cmd: Command,
    mode: OutputMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_to(col, cmd, mode, &mut out).await
}

/// Runs a command that needs no collection, writing to stdout.
pub fn run_offline(cmd: Command, mode: OutputMode) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_offline_to(cmd, mode, &mut out)
}

/// `List` and `Version`; anything else is refused since no collection is at hand.
pub fn run_offline_to<W: Write>(cmd: Command, mode: OutputMode, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::List => {
            let steps = usage::catalogue();
            match mode {
                OutputMode::Json => {
                    let rows: Vec<serde_json::Value> = steps
                        .iter()
                        .map(|s| {
                            serde_json::json!({
                                "name": s.name,
                                "group": s.group,
                                "method": s.operation.method(),
                                "with_options": s.operation.has_options(),
                            })
                        })
                        .collect();
                    writeln!(out, "{}", serde_json::to_string(&rows)?)?;
                }
                OutputMode::Plain => {
                    for s in steps {
                        writeln!(out, "{}", s.name)?;
                    }
                }
                OutputMode::Human => {
                    for s in steps {
                        let opts = if s.operation.has_options() { " +options" } else { "" };
                        writeln!(out, "{:<22} {:<32} {}{opts}", s.group, s.name, s.operation.method())?;
                    }
                }
            }
            Ok(())
        }
        Command::Version => {
            let report = crate::info::version();
            match mode {
                OutputMode::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
                _ => {
                    writeln!(out, "package: {} {}", report.package_name, report.package_version)?;
                    writeln!(
                        out,
                        "compiled_features: {}",
                        if report.compiled_features.is_empty() {
                            "<none>".into()
                        } else {
                            report.compiled_features.join(",")
                        }
                    )?;
                }
            }
            Ok(())
        }
        Command::Run { .. } | Command::Explain { .. } => {
            Err(Box::new(UsageError::Operation("command needs a collection".into())))
        }
    }
}

/// Like [`run_with_format`], writing to `out` instead of stdout.
pub async fn run_to<C: CollectionApi, W: Write>(
    col: &C,
    cmd: Command,
    mode: OutputMode,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::Run { only, fail_fast } => {
            let steps = usage::select(usage::catalogue(), &only)?;
            let report = usage::run_steps(col, &steps, RunPolicy { fail_fast }).await;
            write_report(out, &report, mode)?;
            let failed = report.failed();
            if failed > 0 {
                return Err(Box::new(UsageError::Operation(format!(
                    "{failed} of {} step(s) failed",
                    report.steps.len()
                ))));
            }
            Ok(())
        }
        Command::Explain { kind, filter_json, verbosity } => {
            let filter = parse_filter_json(filter_json.as_deref().unwrap_or(""))?;
            let model = build_explain_model(&kind, filter)?;
            let plan = col.explain(model, verbosity).await?;
            match mode {
                OutputMode::Human => writeln!(out, "{}", serde_json::to_string_pretty(&plan)?)?,
                _ => writeln!(out, "{}", serde_json::to_string(&plan)?)?,
            }
            Ok(())
        }
        Command::List | Command::Version => run_offline_to(cmd, mode, out),
    }
}

fn write_report<W: Write>(out: &mut W, report: &RunReport, mode: OutputMode) -> Result<(), Box<dyn std::error::Error>> {
    match mode {
        OutputMode::Json => writeln!(out, "{}", serde_json::to_string_pretty(report)?)?,
        OutputMode::Plain => {
            for s in &report.steps {
                let status = match &s.status {
                    StepStatus::Ok { .. } => "ok",
                    StepStatus::Failed { .. } => "failed",
                    StepStatus::Skipped => "skipped",
                };
                writeln!(out, "{} {status}", s.name)?;
            }
        }
        OutputMode::Human => {
            writeln!(out, "run {} on {} ({})", report.run_id, report.collection, report.started_at)?;
            for s in &report.steps {
                match &s.status {
                    StepStatus::Ok { summary } => {
                        writeln!(out, "  ok      {:<32} {summary} [{} ms]", s.name, s.elapsed_ms)?
                    }
                    StepStatus::Failed { error } => writeln!(out, "  FAILED  {:<32} {error}", s.name)?,
                    StepStatus::Skipped => writeln!(out, "  skipped {}", s.name)?,
                }
            }
            writeln!(
                out,
                "ok={} failed={} skipped={}",
                report.succeeded(),
                report.failed(),
                report.skipped()
            )?;
        }
    }
    Ok(())
}
