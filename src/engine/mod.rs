//! Discrete-event engine internals.
//!
//! Job processes are cooperative tasks multiplexed by a single
//! time-ordered event queue; there are exactly two suspension points, a
//! timed wait and a machine-acquisition wait. Everything a task touches
//! while running lives in one `SimContext` owned by the orchestrator —
//! no global state.

pub mod clock;
pub mod machine;
pub mod process;

use std::collections::HashMap;

pub use clock::{EventQueue, SimTime};
pub use machine::{Machine, MachineGrant};

use crate::models::ExecutedOperation;
use crate::observer::SimulationObserver;
use crate::sampler::DurationSampler;

/// Index of a job process in the orchestrator's task arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub usize);

/// Payload delivered when a task resumes.
#[derive(Debug)]
pub enum Wake {
    /// A timed wait elapsed.
    Timer,
    /// The machine the task was queued on has been handed to it.
    Grant(MachineGrant),
}

/// Per-run mutable state shared by all job processes.
///
/// Owned by the orchestrator and passed by reference into every
/// `resume` call. `now` never decreases; only the event loop sets it.
pub struct SimContext<'a> {
    /// Current simulated time.
    pub now: SimTime,
    /// Day-end bound: operations must finish at or before this time.
    pub horizon: SimTime,
    /// The shared event queue.
    pub queue: &'a mut EventQueue<Wake>,
    /// Machine arena, indexed by `MachineGrant::machine_index`.
    pub machines: &'a mut [Machine],
    /// Actual-duration source.
    pub sampler: &'a mut dyn DurationSampler,
    /// Notification port.
    pub observer: &'a mut dyn SimulationObserver,
    /// Completed operations, in completion order.
    pub executed: &'a mut Vec<ExecutedOperation>,
    /// Observed starts of begun-but-unfinished operations, keyed by
    /// (job, machine). Written at grant, cleared at completion; what
    /// remains after the run is the in-flight-at-cutoff set.
    pub in_flight: &'a mut HashMap<(String, String), f64>,
}

impl SimContext<'_> {
    /// Surrenders a machine grant, scheduling an immediate handoff
    /// event for the next FIFO waiter if there is one.
    pub fn release_machine(&mut self, grant: MachineGrant) {
        let idx = grant.machine_index();
        if let Some((next, grant)) = self.machines[idx].release(grant) {
            self.queue.schedule(self.now, next, Wake::Grant(grant));
        }
    }
}
