//! Simulation outcome model.
//!
//! A run partitions the input plan into executed operations (ran to
//! completion within the day) and undone operations (aborted, still
//! in flight at cutoff, or never reached). Every input entry lands in
//! exactly one of the two buckets.

use serde::{Deserialize, Serialize};

/// An operation that ran to completion, with its actual times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedOperation {
    /// Job identifier.
    pub job: String,
    /// Machine identifier.
    pub machine: String,
    /// Actual start (minutes).
    pub start: f64,
    /// Actual (sampled) duration (minutes).
    pub duration: f64,
    /// Actual end (minutes): start + duration.
    pub end: f64,
}

impl ExecutedOperation {
    /// Creates a record for a completed operation.
    pub fn new(
        job: impl Into<String>,
        machine: impl Into<String>,
        start: f64,
        duration: f64,
        end: f64,
    ) -> Self {
        Self {
            job: job.into(),
            machine: machine.into(),
            start,
            duration,
            end,
        }
    }
}

/// A planned operation that did not run to completion.
///
/// `observed_start` is set when the operation had begun but was still
/// running when the day ended; it stays `None` for operations that were
/// aborted at grant time or never reached at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoneOperation {
    /// Job identifier.
    pub job: String,
    /// Machine identifier.
    pub machine: String,
    /// Planned duration from the input plan (minutes).
    pub planned_duration: f64,
    /// Actual start, if the operation began but did not finish.
    pub observed_start: Option<f64>,
}

/// The result of one day simulation.
///
/// Invariant: `executed` and `undone` together cover every input
/// `ScheduleEntry` exactly once, keyed by (job, machine) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Operations that ran to completion, in completion order.
    pub executed: Vec<ExecutedOperation>,
    /// Operations that did not complete, in input-plan order.
    pub undone: Vec<UndoneOperation>,
    /// Simulated time when the run stopped (minutes).
    pub final_time: f64,
}

impl RunResult {
    /// Total number of operations across both buckets.
    pub fn operation_count(&self) -> usize {
        self.executed.len() + self.undone.len()
    }

    /// Executed records for a given machine.
    pub fn executed_on_machine(&self, machine: &str) -> Vec<&ExecutedOperation> {
        self.executed
            .iter()
            .filter(|op| op.machine == machine)
            .collect()
    }

    /// Executed records for a given job.
    pub fn executed_for_job(&self, job: &str) -> Vec<&ExecutedOperation> {
        self.executed.iter().filter(|op| op.job == job).collect()
    }

    /// Finds the executed record for a (job, machine) pair.
    pub fn executed_for_pair(&self, job: &str, machine: &str) -> Option<&ExecutedOperation> {
        self.executed
            .iter()
            .find(|op| op.job == job && op.machine == machine)
    }

    /// Finds the undone entry for a (job, machine) pair.
    pub fn undone_for_pair(&self, job: &str, machine: &str) -> Option<&UndoneOperation> {
        self.undone
            .iter()
            .find(|op| op.job == job && op.machine == machine)
    }

    /// Makespan of the executed work: latest actual end (minutes).
    pub fn makespan(&self) -> f64 {
        self.executed.iter().map(|op| op.end).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> RunResult {
        RunResult {
            executed: vec![
                ExecutedOperation::new("J1", "M1", 0.0, 10.5, 10.5),
                ExecutedOperation::new("J2", "M1", 10.5, 8.0, 18.5),
                ExecutedOperation::new("J1", "M2", 12.0, 4.0, 16.0),
            ],
            undone: vec![UndoneOperation {
                job: "J2".into(),
                machine: "M2".into(),
                planned_duration: 30.0,
                observed_start: None,
            }],
            final_time: 1440.0,
        }
    }

    #[test]
    fn test_bucket_queries() {
        let r = sample_result();
        assert_eq!(r.operation_count(), 4);
        assert_eq!(r.executed_on_machine("M1").len(), 2);
        assert_eq!(r.executed_for_job("J1").len(), 2);
        assert!(r.executed_for_pair("J2", "M1").is_some());
        assert!(r.executed_for_pair("J2", "M2").is_none());
        assert!(r.undone_for_pair("J2", "M2").is_some());
    }

    #[test]
    fn test_makespan() {
        let r = sample_result();
        assert!((r.makespan() - 18.5).abs() < 1e-10);

        let empty = RunResult {
            executed: vec![],
            undone: vec![],
            final_time: 0.0,
        };
        assert_eq!(empty.makespan(), 0.0);
    }
}
