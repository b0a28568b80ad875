//! Per-job process state machine.
//!
//! Rather than capturing suspension in coroutine control flow, each job
//! is an explicit state value plus a `resume(wake, ctx)` transition
//! function driven by the event queue, so a suspended job is an
//! inspectable program state.
//!
//! Per operation, in planned-start order: wait until the planned start,
//! request the machine (FIFO under contention), and at grant time check
//! feasibility against the day end. An infeasible grant aborts the
//! *entire remaining job*: the machine is released immediately, an
//! interruption is emitted, and nothing is recorded as executed for this
//! or any later operation of the job. Feasibility is checked at grant
//! time, not at request time, because queueing delay depends on
//! contention that is unknown when the request is made.

use std::collections::HashMap;

use super::machine::MachineGrant;
use super::{SimContext, SimTime, TaskId, Wake};
use crate::error::SimulationError;
use crate::models::{ExecutedOperation, Job};

#[derive(Debug)]
struct PlannedOp {
    machine: usize,
    machine_id: String,
    start: SimTime,
    planned_minutes: f64,
}

/// Lifecycle of a job process.
#[derive(Debug)]
pub enum ProcessState {
    /// Waiting for operation `op`'s planned start time.
    WaitingForStart {
        /// Index of the pending operation.
        op: usize,
    },
    /// Queued on operation `op`'s machine.
    WaitingForMachine {
        /// Index of the pending operation.
        op: usize,
    },
    /// Holding the machine, processing operation `op`.
    Running {
        /// Index of the running operation.
        op: usize,
        /// Exclusive access to the operation's machine.
        grant: MachineGrant,
        /// Actual start time.
        started: SimTime,
        /// Sampled actual duration (minutes).
        actual_minutes: f64,
    },
    /// All operations completed.
    Finished,
    /// Cut off at grant time; remaining operations abandoned.
    Aborted,
}

/// A job's cooperative task: its operations plus its current state.
#[derive(Debug)]
pub struct JobProcess {
    id: TaskId,
    job: String,
    ops: Vec<PlannedOp>,
    state: ProcessState,
}

impl JobProcess {
    /// Builds the process for `job`. Operations keep the job's
    /// planned-start order; machine ids resolve through `machine_index`.
    ///
    /// The caller guarantees every machine id is present (plan
    /// validation and arena construction both derive from the same set).
    pub fn new(id: TaskId, job: &Job, machine_index: &HashMap<String, usize>) -> Self {
        let ops = job
            .operations
            .iter()
            .map(|entry| PlannedOp {
                machine: machine_index[&entry.machine],
                machine_id: entry.machine.clone(),
                start: SimTime::from_minutes(entry.start),
                planned_minutes: entry.duration,
            })
            .collect();
        Self {
            id,
            job: job.id.clone(),
            ops,
            state: ProcessState::Finished,
        }
    }

    /// Job identifier.
    pub fn job_id(&self) -> &str {
        &self.job
    }

    /// Current state.
    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    /// Schedules the first wake-up (at the first operation's planned
    /// start). A job with no operations finishes immediately.
    pub fn start(&mut self, ctx: &mut SimContext<'_>) {
        match self.ops.first() {
            Some(first) => {
                // Suspend for max(planned_start - now, 0).
                let at = first.start.max(ctx.now);
                ctx.queue.schedule(at, self.id, Wake::Timer);
                self.state = ProcessState::WaitingForStart { op: 0 };
            }
            None => self.state = ProcessState::Finished,
        }
    }

    /// Drives the state machine with one wake event.
    pub fn resume(&mut self, wake: Wake, ctx: &mut SimContext<'_>) -> Result<(), SimulationError> {
        let state = std::mem::replace(&mut self.state, ProcessState::Finished);
        match (state, wake) {
            (ProcessState::WaitingForStart { op }, Wake::Timer) => {
                let machine = self.ops[op].machine;
                match ctx.machines[machine].acquire(self.id) {
                    Some(grant) => self.begin_operation(op, grant, ctx)?,
                    None => self.state = ProcessState::WaitingForMachine { op },
                }
            }
            (ProcessState::WaitingForMachine { op }, Wake::Grant(grant)) => {
                self.begin_operation(op, grant, ctx)?;
            }
            (
                ProcessState::Running {
                    op,
                    grant,
                    started,
                    actual_minutes,
                },
                Wake::Timer,
            ) => {
                self.finish_operation(op, grant, started, actual_minutes, ctx);
            }
            (state, wake) => {
                // The queue only ever delivers the wake the state is
                // suspended on; anything else is an engine bug.
                debug_assert!(false, "unexpected wake {wake:?} in state {state:?}");
                self.state = state;
            }
        }
        Ok(())
    }

    /// Grant-time entry: feasibility check, then either abort the whole
    /// remaining job or start processing.
    fn begin_operation(
        &mut self,
        op: usize,
        grant: MachineGrant,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), SimulationError> {
        let planned_minutes = self.ops[op].planned_minutes;
        let machine_id = self.ops[op].machine_id.clone();
        let now = ctx.now.as_minutes();

        let planned_end = ctx.now.after(SimTime::from_minutes(planned_minutes));
        if planned_end > ctx.horizon {
            tracing::debug!(
                job = %self.job,
                machine = %machine_id,
                time = now,
                would_end = planned_end.as_minutes(),
                "job interrupted: operation cannot finish before day end"
            );
            ctx.observer.job_interrupted(now, &self.job, &machine_id);
            ctx.release_machine(grant);
            self.state = ProcessState::Aborted;
            return Ok(());
        }

        let actual_minutes = ctx.sampler.sample(planned_minutes)?;
        ctx.in_flight
            .insert((self.job.clone(), machine_id.clone()), now);
        tracing::debug!(job = %self.job, machine = %machine_id, time = now, "job started");
        ctx.observer.job_started(now, &self.job, &machine_id);

        let ends = ctx.now.after(SimTime::from_minutes(actual_minutes));
        ctx.queue.schedule(ends, self.id, Wake::Timer);
        self.state = ProcessState::Running {
            op,
            grant,
            started: ctx.now,
            actual_minutes,
        };
        Ok(())
    }

    /// Completion: notify, release the machine, record the executed
    /// operation, clear the in-flight start, move to the next operation.
    fn finish_operation(
        &mut self,
        op: usize,
        grant: MachineGrant,
        started: SimTime,
        actual_minutes: f64,
        ctx: &mut SimContext<'_>,
    ) {
        let machine_id = self.ops[op].machine_id.clone();
        let end = ctx.now.as_minutes();
        tracing::debug!(
            job = %self.job,
            machine = %machine_id,
            time = end,
            minutes = actual_minutes,
            "job finished"
        );
        ctx.observer
            .job_finished(end, &self.job, &machine_id, actual_minutes);
        ctx.release_machine(grant);

        ctx.executed.push(ExecutedOperation::new(
            &self.job,
            &machine_id,
            started.as_minutes(),
            actual_minutes,
            end,
        ));
        ctx.in_flight.remove(&(self.job.clone(), machine_id));

        let next = op + 1;
        if next < self.ops.len() {
            let at = self.ops[next].start.max(ctx.now);
            ctx.queue.schedule(at, self.id, Wake::Timer);
            self.state = ProcessState::WaitingForStart { op: next };
        } else {
            self.state = ProcessState::Finished;
        }
    }
}
