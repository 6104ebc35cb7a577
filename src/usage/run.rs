use super::exec::execute;
use super::steps::Step;
use crate::collection::CollectionApi;
use crate::logger::{AUDIT_TARGET, METRICS_TARGET};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunPolicy {
    /// Stop at the first failing step; the rest are reported as skipped.
    pub fail_fast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Ok { summary: String },
    Failed { error: String },
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub name: String,
    pub group: String,
    pub method: String,
    #[serde(flatten)]
    pub status: StepStatus,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub collection: String,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s.status, StepStatus::Ok { .. })).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s.status, StepStatus::Failed { .. })).count()
    }

    pub fn skipped(&self) -> usize {
        self.steps.iter().filter(|s| s.status == StepStatus::Skipped).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }
}

/// Runs `steps` in order against `col`.
///
/// Step failures never abort the call itself; they are recorded in the report.
pub async fn run_steps<C: CollectionApi>(col: &C, steps: &[Step], policy: RunPolicy) -> RunReport {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    log::info!("run {run_id}: {} step(s) against {}", steps.len(), col.name());

    let mut reports = Vec::with_capacity(steps.len());
    let mut stopped = false;
    for step in steps {
        let method = step.operation.method();
        if stopped {
            reports.push(StepReport {
                name: step.name.to_string(),
                group: step.group.to_string(),
                method: method.to_string(),
                status: StepStatus::Skipped,
                elapsed_ms: 0,
            });
            continue;
        }
        let t0 = Instant::now();
        let result = execute(col, &step.operation).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;
        let status = match result {
            Ok(outcome) => {
                let summary = outcome.summary();
                log::info!(target: AUDIT_TARGET, "run={run_id} step={} method={method} ok {summary}", step.name);
                StepStatus::Ok { summary }
            }
            Err(e) => {
                log::warn!(target: AUDIT_TARGET, "run={run_id} step={} method={method} failed: {e}", step.name);
                log::warn!("step {} failed: {e}", step.name);
                if policy.fail_fast {
                    stopped = true;
                }
                StepStatus::Failed { error: e.to_string() }
            }
        };
        log::info!(target: METRICS_TARGET, "run={run_id} step={} elapsed_ms={elapsed_ms}", step.name);
        reports.push(StepReport {
            name: step.name.to_string(),
            group: step.group.to_string(),
            method: method.to_string(),
            status,
            elapsed_ms,
        });
    }

    let report = RunReport { run_id, started_at, collection: col.name().to_string(), steps: reports };
    log::info!(
        "run {run_id} finished: ok={} failed={} skipped={}",
        report.succeeded(),
        report.failed(),
        report.skipped()
    );
    report
}
