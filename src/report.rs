//! Tabular output and run statistics.
//!
//! Maps a `RunResult` onto the two external datasets:
//!
//! | Dataset  | Columns |
//! |----------|---------|
//! | Executed | `Job, Machine, Start, Duration, End` (actual values) |
//! | Undone   | `Job, Machine, Planned Duration, Start` (`Start` empty if never begun) |
//!
//! plus a `RunSummary` of aggregate robustness indicators.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ExecutedOperation, RunResult, UndoneOperation};

/// One row of the Executed dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedRow {
    /// Job identifier.
    #[serde(rename = "Job")]
    pub job: String,
    /// Machine identifier.
    #[serde(rename = "Machine")]
    pub machine: String,
    /// Actual start (minutes).
    #[serde(rename = "Start")]
    pub start: f64,
    /// Actual duration (minutes).
    #[serde(rename = "Duration")]
    pub duration: f64,
    /// Actual end (minutes).
    #[serde(rename = "End")]
    pub end: f64,
}

/// One row of the Undone dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoneRow {
    /// Job identifier.
    #[serde(rename = "Job")]
    pub job: String,
    /// Machine identifier.
    #[serde(rename = "Machine")]
    pub machine: String,
    /// Planned duration from the input plan (minutes).
    #[serde(rename = "Planned Duration")]
    pub planned_duration: f64,
    /// Observed start, empty when the operation never began.
    #[serde(rename = "Start")]
    pub start: Option<f64>,
}

impl From<&ExecutedOperation> for ExecutedRow {
    fn from(op: &ExecutedOperation) -> Self {
        Self {
            job: op.job.clone(),
            machine: op.machine.clone(),
            start: op.start,
            duration: op.duration,
            end: op.end,
        }
    }
}

impl From<&UndoneOperation> for UndoneRow {
    fn from(op: &UndoneOperation) -> Self {
        Self {
            job: op.job.clone(),
            machine: op.machine.clone(),
            planned_duration: op.planned_duration,
            start: op.observed_start,
        }
    }
}

/// The Executed dataset, in completion order.
pub fn executed_table(result: &RunResult) -> Vec<ExecutedRow> {
    result.executed.iter().map(ExecutedRow::from).collect()
}

/// The Undone dataset, in input-plan order.
pub fn undone_table(result: &RunResult) -> Vec<UndoneRow> {
    result.undone.iter().map(UndoneRow::from).collect()
}

/// Aggregate robustness indicators for one run.
///
/// All time values are in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Operations that ran to completion.
    pub executed_count: usize,
    /// Operations that did not complete.
    pub undone_count: usize,
    /// Fraction of planned operations completed (0.0..1.0).
    pub completed_fraction: f64,
    /// Latest actual end across executed operations.
    pub makespan: f64,
    /// Busy time per machine (sum of executed durations).
    pub busy_by_machine: HashMap<String, f64>,
    /// Busy time / horizon per machine (0.0..1.0 under a valid plan).
    pub utilization_by_machine: HashMap<String, f64>,
}

impl RunSummary {
    /// Computes the summary from a run result against a horizon.
    pub fn from_result(result: &RunResult, horizon: f64) -> Self {
        let executed_count = result.executed.len();
        let undone_count = result.undone.len();
        let total = executed_count + undone_count;
        let completed_fraction = if total == 0 {
            1.0
        } else {
            executed_count as f64 / total as f64
        };

        let mut busy_by_machine: HashMap<String, f64> = HashMap::new();
        for op in &result.executed {
            *busy_by_machine.entry(op.machine.clone()).or_insert(0.0) += op.duration;
        }
        let utilization_by_machine = if horizon > 0.0 {
            busy_by_machine
                .iter()
                .map(|(m, busy)| (m.clone(), busy / horizon))
                .collect()
        } else {
            HashMap::new()
        };

        Self {
            executed_count,
            undone_count,
            completed_fraction,
            makespan: result.makespan(),
            busy_by_machine,
            utilization_by_machine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> RunResult {
        RunResult {
            executed: vec![
                ExecutedOperation::new("J1", "M1", 0.0, 20.0, 20.0),
                ExecutedOperation::new("J2", "M1", 20.0, 16.0, 36.0),
            ],
            undone: vec![UndoneOperation {
                job: "J2".into(),
                machine: "M2".into(),
                planned_duration: 30.0,
                observed_start: Some(35.0),
            }],
            final_time: 1440.0,
        }
    }

    #[test]
    fn test_executed_table_column_names() {
        let rows = executed_table(&sample_result());
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["Job"], "J1");
        assert_eq!(json["Machine"], "M1");
        assert_eq!(json["Start"], 0.0);
        assert_eq!(json["Duration"], 20.0);
        assert_eq!(json["End"], 20.0);
    }

    #[test]
    fn test_undone_table_column_names() {
        let rows = undone_table(&sample_result());
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["Planned Duration"], 30.0);
        assert_eq!(json["Start"], 35.0);

        // Never-begun operations serialize an empty Start.
        let never_begun = UndoneRow {
            job: "J9".into(),
            machine: "M9".into(),
            planned_duration: 5.0,
            start: None,
        };
        let json = serde_json::to_value(&never_begun).unwrap();
        assert!(json["Start"].is_null());
    }

    #[test]
    fn test_summary_counts_and_utilization() {
        let summary = RunSummary::from_result(&sample_result(), 1440.0);
        assert_eq!(summary.executed_count, 2);
        assert_eq!(summary.undone_count, 1);
        assert!((summary.completed_fraction - 2.0 / 3.0).abs() < 1e-10);
        assert!((summary.makespan - 36.0).abs() < 1e-10);
        assert!((summary.busy_by_machine["M1"] - 36.0).abs() < 1e-10);
        assert!((summary.utilization_by_machine["M1"] - 36.0 / 1440.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_empty_result() {
        let empty = RunResult {
            executed: vec![],
            undone: vec![],
            final_time: 0.0,
        };
        let summary = RunSummary::from_result(&empty, 1440.0);
        assert_eq!(summary.completed_fraction, 1.0);
        assert!(summary.busy_by_machine.is_empty());
    }
}
