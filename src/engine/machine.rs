//! Capacity-1 machine with a FIFO wait queue.
//!
//! Access is granted through a `MachineGrant` token that can only be
//! created inside this module. At most one grant per machine is live at
//! any instant: `acquire` mints one only when the machine is free, and
//! `release` either hands the token to the next FIFO waiter or retires
//! it. A holder surrenders the grant on every exit path, including
//! deadline abort, which gives the scoped request/release pairing of a
//! guard without tying the grant to a lexical scope.

use std::collections::VecDeque;

use super::TaskId;

/// Exclusive access to one machine.
///
/// Must be surrendered via [`Machine::release`]; dropping it without
/// releasing would leave the machine busy forever.
#[must_use = "a machine grant must be surrendered via Machine::release"]
#[derive(Debug)]
pub struct MachineGrant {
    machine: usize,
}

impl MachineGrant {
    /// Index of the granted machine in the simulation's machine arena.
    #[inline]
    pub fn machine_index(&self) -> usize {
        self.machine
    }
}

/// A machine: capacity exactly 1, strict arrival-order fairness.
#[derive(Debug)]
pub struct Machine {
    id: String,
    index: usize,
    busy: bool,
    waiters: VecDeque<TaskId>,
}

impl Machine {
    /// Creates a free machine.
    pub fn new(id: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            index,
            busy: false,
            waiters: VecDeque::new(),
        }
    }

    /// Machine identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Requests exclusive access for `task`.
    ///
    /// Grants immediately when the machine is free; otherwise appends
    /// `task` to the FIFO wait queue and returns `None` — the task will
    /// receive its grant from a later `release`.
    pub fn acquire(&mut self, task: TaskId) -> Option<MachineGrant> {
        if self.busy {
            self.waiters.push_back(task);
            None
        } else {
            self.busy = true;
            Some(MachineGrant {
                machine: self.index,
            })
        }
    }

    /// Surrenders a grant.
    ///
    /// Hands exclusive access to the next waiter in arrival order, if
    /// any, returning the waiter and its new grant for the caller to
    /// deliver. Otherwise marks the machine free.
    pub fn release(&mut self, grant: MachineGrant) -> Option<(TaskId, MachineGrant)> {
        debug_assert_eq!(grant.machine, self.index);
        debug_assert!(self.busy);
        match self.waiters.pop_front() {
            Some(next) => Some((next, grant)),
            None => {
                self.busy = false;
                drop(grant);
                None
            }
        }
    }

    /// Number of tasks waiting for this machine.
    pub fn queue_len(&self) -> usize {
        self.waiters.len()
    }

    /// Whether the machine is currently granted.
    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_when_free_grants_immediately() {
        let mut m = Machine::new("M1", 0);
        let grant = m.acquire(TaskId(0)).unwrap();
        assert!(m.is_busy());
        assert_eq!(grant.machine_index(), 0);
        assert!(m.release(grant).is_none());
        assert!(!m.is_busy());
    }

    #[test]
    fn test_waiters_served_in_arrival_order() {
        let mut m = Machine::new("M1", 3);
        let grant = m.acquire(TaskId(10)).unwrap();
        assert!(m.acquire(TaskId(11)).is_none());
        assert!(m.acquire(TaskId(12)).is_none());
        assert_eq!(m.queue_len(), 2);

        let (next, grant) = m.release(grant).unwrap();
        assert_eq!(next, TaskId(11));
        let (next, grant) = m.release(grant).unwrap();
        assert_eq!(next, TaskId(12));
        assert!(m.release(grant).is_none());
        assert!(!m.is_busy());
        assert_eq!(m.queue_len(), 0);
    }

    #[test]
    fn test_machine_stays_busy_during_handoff() {
        let mut m = Machine::new("M1", 0);
        let grant = m.acquire(TaskId(0)).unwrap();
        assert!(m.acquire(TaskId(1)).is_none());

        let (_, grant) = m.release(grant).unwrap();
        // Handed off, not freed: a newcomer must queue behind the grantee.
        assert!(m.is_busy());
        assert!(m.acquire(TaskId(2)).is_none());
        let (next, grant) = m.release(grant).unwrap();
        assert_eq!(next, TaskId(2));
        assert!(m.release(grant).is_none());
    }
}
