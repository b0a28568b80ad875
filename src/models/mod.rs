//! Domain models for day-plan replay.
//!
//! Input side: `ScheduleEntry` (one planned operation) and `Job`
//! (ordered entries sharing a job id). Output side: `ExecutedOperation`,
//! `UndoneOperation`, and the `RunResult` partition.

mod entry;
mod outcome;

pub use entry::{Job, ScheduleEntry};
pub use outcome::{ExecutedOperation, RunResult, UndoneOperation};
