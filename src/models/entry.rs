//! Planned schedule entries and jobs.
//!
//! A `ScheduleEntry` is one planned operation of the input day plan:
//! a (job, machine) pair with a planned start and duration. A `Job`
//! groups the entries belonging to one job id, ordered by planned start.
//!
//! # Time Representation
//! All times are in minutes from the start of the simulated day (t=0).
//! Planned values are usually integral minutes; simulated values carry
//! two decimal places.

use serde::{Deserialize, Serialize};

/// One planned operation of the input day plan.
///
/// Immutable once constructed; the engine never reorders or reassigns
/// entries, it only decides whether they execute within the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Job this operation belongs to.
    pub job: String,
    /// Machine this operation must run on.
    pub machine: String,
    /// Planned start (minutes from day start).
    pub start: f64,
    /// Planned duration (minutes).
    pub duration: f64,
}

impl ScheduleEntry {
    /// Creates a new entry.
    pub fn new(
        job: impl Into<String>,
        machine: impl Into<String>,
        start: f64,
        duration: f64,
    ) -> Self {
        Self {
            job: job.into(),
            machine: machine.into(),
            start,
            duration,
        }
    }

    /// Planned end (minutes): `start + duration`.
    #[inline]
    pub fn planned_end(&self) -> f64 {
        self.start + self.duration
    }

    /// The (job, machine) pair identifying this entry in the day plan.
    ///
    /// Pairs are unique within a valid plan, so this is the key used
    /// by the executed/undone diff and the in-flight start lookup.
    pub fn pair(&self) -> (String, String) {
        (self.job.clone(), self.machine.clone())
    }
}

/// A job: an ordered sequence of planned operations sharing a job id.
///
/// Entries are kept sorted ascending by planned start; the simulation
/// executes them strictly in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Operations of this job, sorted ascending by planned start.
    pub operations: Vec<ScheduleEntry>,
}

impl Job {
    /// Creates a job from its entries, sorting them by planned start.
    ///
    /// Ties keep the original relative order (stable sort).
    pub fn new(id: impl Into<String>, mut operations: Vec<ScheduleEntry>) -> Self {
        operations.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            id: id.into(),
            operations,
        }
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Total planned processing time (minutes).
    pub fn total_planned_duration(&self) -> f64 {
        self.operations.iter().map(|op| op.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_planned_end() {
        let e = ScheduleEntry::new("J1", "M1", 10.0, 25.0);
        assert!((e.planned_end() - 35.0).abs() < 1e-10);
        assert_eq!(e.pair(), ("J1".to_string(), "M1".to_string()));
    }

    #[test]
    fn test_job_sorts_by_planned_start() {
        let job = Job::new(
            "J1",
            vec![
                ScheduleEntry::new("J1", "M3", 50.0, 10.0),
                ScheduleEntry::new("J1", "M1", 0.0, 20.0),
                ScheduleEntry::new("J1", "M2", 20.0, 30.0),
            ],
        );

        let machines: Vec<&str> = job.operations.iter().map(|op| op.machine.as_str()).collect();
        assert_eq!(machines, vec!["M1", "M2", "M3"]);
        assert_eq!(job.operation_count(), 3);
        assert!((job.total_planned_duration() - 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_entry_serde_roundtrip() {
        let e = ScheduleEntry::new("J2", "M1", 120.0, 15.5);
        let json = serde_json::to_string(&e).unwrap();
        let back: ScheduleEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
