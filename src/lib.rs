//! Re-simulation of precomputed job-shop day plans.
//!
//! Takes a one-day schedule (job, machine, planned start, planned
//! duration per operation) and replays it through a discrete-event
//! engine with capacity-1 machine contention and log-normal
//! processing-time variation, to stress-test the plan's robustness and
//! drive a live progress view. The run partitions the plan into
//! operations that actually completed within the day and operations
//! that did not.
//!
//! This is not an optimizer: operations are never reordered or
//! reassigned, only executed or abandoned.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `ScheduleEntry`, `Job`,
//!   `ExecutedOperation`, `UndoneOperation`, `RunResult`
//! - **`plan`**: Ingestion boundary — tabular rows to a validated
//!   `SchedulePlan`
//! - **`sampler`**: Log-normal actual-duration sampling with an
//!   injectable random source
//! - **`simulation`**: The `DaySimulation` orchestrator
//! - **`observer`**: The `SimulationObserver` notification port
//! - **`report`**: Executed/Undone tables and run statistics
//!
//! # Example
//!
//! ```
//! use jobshop_replay::{DaySimulation, ScheduleEntry, SchedulePlan, SimulationConfig};
//!
//! let plan = SchedulePlan::from_entries(vec![
//!     ScheduleEntry::new("J1", "M1", 0.0, 20.0),
//!     ScheduleEntry::new("J2", "M1", 10.0, 15.0),
//! ])
//! .expect("valid plan");
//!
//! let result = DaySimulation::new(plan)
//!     .with_config(SimulationConfig::new().with_seed(42))
//!     .run()
//!     .unwrap();
//! assert_eq!(result.operation_count(), 2);
//! ```

mod engine;

pub mod error;
pub mod models;
pub mod observer;
pub mod plan;
pub mod report;
pub mod sampler;
pub mod simulation;

pub use error::SimulationError;
pub use models::{ExecutedOperation, Job, RunResult, ScheduleEntry, UndoneOperation};
pub use observer::{
    NullObserver, PacedObserver, RecordingObserver, SimulationEvent, SimulationObserver,
};
pub use plan::{PlanError, PlanErrorKind, PlanRow, SchedulePlan};
pub use report::{executed_table, undone_table, ExecutedRow, RunSummary, UndoneRow};
pub use sampler::{lognormal_duration, DurationSampler, LogNormalSampler};
pub use simulation::{DaySimulation, SimulationConfig, DAY_MINUTES};
