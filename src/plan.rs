//! Plan ingestion and validation.
//!
//! Converts loosely-typed tabular rows (`Job`, `Machine`, `Start`,
//! `Duration`, optional `End`) into a validated `SchedulePlan` before any
//! engine logic runs. Detects:
//! - Duplicate (job, machine) pairs
//! - Non-positive planned durations
//! - Negative planned starts
//! - References to machines outside an explicitly supplied machine set
//!
//! All problems are collected and reported together rather than failing
//! on the first one.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

use crate::models::{Job, ScheduleEntry};

/// Validation result for plan construction.
pub type PlanResult<T> = Result<T, Vec<PlanError>>;

/// A plan validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct PlanError {
    /// Error category.
    pub kind: PlanErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of plan validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanErrorKind {
    /// The same (job, machine) pair appears more than once.
    DuplicatePair,
    /// A planned duration is zero or negative.
    NonPositiveDuration,
    /// A planned start is negative.
    NegativeStart,
    /// An entry references a machine not in the supplied machine set.
    UnknownMachine,
}

impl PlanError {
    fn new(kind: PlanErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// One row of the tabular input plan.
///
/// Column names match the external dataset: `Job`, `Machine`, `Start`
/// (minutes from day start), `Duration` (planned minutes). An `End`
/// column is accepted but not used — the simulation recomputes ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Job identifier.
    #[serde(rename = "Job")]
    pub job: String,
    /// Machine identifier.
    #[serde(rename = "Machine")]
    pub machine: String,
    /// Planned start (minutes).
    #[serde(rename = "Start")]
    pub start: f64,
    /// Planned duration (minutes).
    #[serde(rename = "Duration")]
    pub duration: f64,
    /// Planned end (minutes). Accepted for compatibility, ignored.
    #[serde(rename = "End", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

/// A validated day plan, ready for simulation.
///
/// Holds the entries in input order (for the executed/undone diff),
/// the jobs grouped and sorted by id, and the distinct machine ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePlan {
    entries: Vec<ScheduleEntry>,
    jobs: Vec<Job>,
    machines: Vec<String>,
}

impl SchedulePlan {
    /// Builds a plan from entries, deriving the machine set from them.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> PlanResult<Self> {
        Self::build(entries, None)
    }

    /// Builds a plan from entries against an explicit machine set.
    ///
    /// Entries referencing a machine outside the set are rejected.
    pub fn from_entries_with_machines(
        entries: Vec<ScheduleEntry>,
        machines: Vec<String>,
    ) -> PlanResult<Self> {
        Self::build(entries, Some(machines))
    }

    /// Builds a plan from tabular rows (the ingestion boundary).
    pub fn from_rows(rows: Vec<PlanRow>) -> PlanResult<Self> {
        let entries = rows
            .into_iter()
            .map(|r| ScheduleEntry::new(r.job, r.machine, r.start, r.duration))
            .collect();
        Self::build(entries, None)
    }

    fn build(entries: Vec<ScheduleEntry>, machines: Option<Vec<String>>) -> PlanResult<Self> {
        let mut errors = Vec::new();

        let known: Option<HashSet<&str>> =
            machines.as_ref().map(|m| m.iter().map(String::as_str).collect());

        let mut pairs = HashSet::new();
        for entry in &entries {
            if !pairs.insert((entry.job.as_str(), entry.machine.as_str())) {
                errors.push(PlanError::new(
                    PlanErrorKind::DuplicatePair,
                    format!(
                        "Duplicate operation for job '{}' on machine '{}'",
                        entry.job, entry.machine
                    ),
                ));
            }
            if entry.duration <= 0.0 {
                errors.push(PlanError::new(
                    PlanErrorKind::NonPositiveDuration,
                    format!(
                        "Job '{}' on machine '{}' has non-positive duration {}",
                        entry.job, entry.machine, entry.duration
                    ),
                ));
            }
            if entry.start < 0.0 {
                errors.push(PlanError::new(
                    PlanErrorKind::NegativeStart,
                    format!(
                        "Job '{}' on machine '{}' has negative start {}",
                        entry.job, entry.machine, entry.start
                    ),
                ));
            }
            if let Some(known) = &known {
                if !known.contains(entry.machine.as_str()) {
                    errors.push(PlanError::new(
                        PlanErrorKind::UnknownMachine,
                        format!(
                            "Job '{}' references unknown machine '{}'",
                            entry.job, entry.machine
                        ),
                    ));
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let machine_set: Vec<String> = match machines {
            Some(m) => {
                let set: BTreeSet<String> = m.into_iter().collect();
                set.into_iter().collect()
            }
            None => {
                let set: BTreeSet<String> =
                    entries.iter().map(|e| e.machine.clone()).collect();
                set.into_iter().collect()
            }
        };

        // Group by job id; BTreeMap gives a deterministic job order.
        let mut grouped: BTreeMap<String, Vec<ScheduleEntry>> = BTreeMap::new();
        for entry in &entries {
            grouped
                .entry(entry.job.clone())
                .or_default()
                .push(entry.clone());
        }
        let jobs = grouped
            .into_iter()
            .map(|(id, ops)| Job::new(id, ops))
            .collect();

        Ok(Self {
            entries,
            jobs,
            machines: machine_set,
        })
    }

    /// Entries in original input order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Jobs, sorted by job id, each with operations sorted by planned start.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Distinct job ids, sorted (for legend/colour assignment at setup).
    pub fn job_ids(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.id.as_str()).collect()
    }

    /// Distinct machine ids, sorted (for visualizer layout at setup).
    pub fn machine_ids(&self) -> Vec<&str> {
        self.machines.iter().map(String::as_str).collect()
    }

    /// Number of planned operations.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<PlanRow> {
        vec![
            PlanRow {
                job: "J2".into(),
                machine: "M1".into(),
                start: 30.0,
                duration: 15.0,
                end: Some(45.0),
            },
            PlanRow {
                job: "J1".into(),
                machine: "M2".into(),
                start: 20.0,
                duration: 10.0,
                end: None,
            },
            PlanRow {
                job: "J1".into(),
                machine: "M1".into(),
                start: 0.0,
                duration: 20.0,
                end: None,
            },
        ]
    }

    #[test]
    fn test_from_rows_groups_and_sorts() {
        let plan = SchedulePlan::from_rows(sample_rows()).unwrap();

        assert_eq!(plan.entry_count(), 3);
        assert_eq!(plan.job_ids(), vec!["J1", "J2"]);
        assert_eq!(plan.machine_ids(), vec!["M1", "M2"]);

        // J1's operations sorted by planned start: M1 (0) before M2 (20).
        let j1 = &plan.jobs()[0];
        assert_eq!(j1.id, "J1");
        assert_eq!(j1.operations[0].machine, "M1");
        assert_eq!(j1.operations[1].machine, "M2");
    }

    #[test]
    fn test_entries_keep_input_order() {
        let plan = SchedulePlan::from_rows(sample_rows()).unwrap();
        assert_eq!(plan.entries()[0].job, "J2");
        assert_eq!(plan.entries()[1].machine, "M2");
    }

    #[test]
    fn test_duplicate_pair_rejected() {
        let entries = vec![
            ScheduleEntry::new("J1", "M1", 0.0, 10.0),
            ScheduleEntry::new("J1", "M1", 50.0, 10.0),
        ];
        let errors = SchedulePlan::from_entries(entries).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == PlanErrorKind::DuplicatePair));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let entries = vec![ScheduleEntry::new("J1", "M1", 0.0, 0.0)];
        let errors = SchedulePlan::from_entries(entries).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == PlanErrorKind::NonPositiveDuration));
    }

    #[test]
    fn test_negative_start_rejected() {
        let entries = vec![ScheduleEntry::new("J1", "M1", -5.0, 10.0)];
        let errors = SchedulePlan::from_entries(entries).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == PlanErrorKind::NegativeStart));
    }

    #[test]
    fn test_unknown_machine_rejected() {
        let entries = vec![ScheduleEntry::new("J1", "M9", 0.0, 10.0)];
        let errors =
            SchedulePlan::from_entries_with_machines(entries, vec!["M1".into(), "M2".into()])
                .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == PlanErrorKind::UnknownMachine));
    }

    #[test]
    fn test_explicit_machines_can_exceed_plan() {
        // Idle machines are fine; the visualizer still lays them out.
        let entries = vec![ScheduleEntry::new("J1", "M1", 0.0, 10.0)];
        let plan = SchedulePlan::from_entries_with_machines(
            entries,
            vec!["M1".into(), "M2".into(), "M3".into()],
        )
        .unwrap();
        assert_eq!(plan.machine_ids(), vec!["M1", "M2", "M3"]);
    }

    #[test]
    fn test_multiple_errors_accumulated() {
        let entries = vec![
            ScheduleEntry::new("J1", "M1", -1.0, 0.0),
            ScheduleEntry::new("J1", "M1", 10.0, 5.0),
        ];
        let errors = SchedulePlan::from_entries(entries).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_plan_row_column_names() {
        let json = r#"{"Job":"J1","Machine":"M1","Start":0,"Duration":20,"End":20}"#;
        let row: PlanRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.job, "J1");
        assert_eq!(row.end, Some(20.0));

        // End column is optional.
        let json = r#"{"Job":"J1","Machine":"M1","Start":0,"Duration":20}"#;
        let row: PlanRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.end, None);
    }

    #[test]
    fn test_empty_plan_is_valid() {
        let plan = SchedulePlan::from_entries(Vec::new()).unwrap();
        assert_eq!(plan.entry_count(), 0);
        assert!(plan.job_ids().is_empty());
    }
}
