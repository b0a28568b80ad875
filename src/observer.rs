//! Notification port for live progress observation.
//!
//! The engine reports operation starts, finishes, and interruptions
//! through the `SimulationObserver` trait, synchronously and in emission
//! order. The engine has no dependency on what consumes the
//! notifications — a Gantt view, a logger, or nothing at all.

use std::time::Duration;

/// Callback contract invoked by the simulation as operations progress.
///
/// `job_interrupted` fires on deadline abort; an external consumer may
/// also invoke it itself for entries it detects as still incomplete
/// after the run. All times are simulated minutes.
pub trait SimulationObserver {
    /// An operation was granted its machine and started processing.
    fn job_started(&mut self, time: f64, job: &str, machine: &str);

    /// An operation finished after `actual_duration` minutes.
    fn job_finished(&mut self, time: f64, job: &str, machine: &str, actual_duration: f64);

    /// A job was cut off: its current operation could no longer finish
    /// within the day, and the rest of the job was abandoned.
    fn job_interrupted(&mut self, time: f64, job: &str, machine: &str);
}

/// Observer that ignores all notifications (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SimulationObserver for NullObserver {
    fn job_started(&mut self, _time: f64, _job: &str, _machine: &str) {}
    fn job_finished(&mut self, _time: f64, _job: &str, _machine: &str, _actual_duration: f64) {}
    fn job_interrupted(&mut self, _time: f64, _job: &str, _machine: &str) {}
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// `job_started(time, job, machine)`.
    Started {
        /// Simulated time (minutes).
        time: f64,
        /// Job identifier.
        job: String,
        /// Machine identifier.
        machine: String,
    },
    /// `job_finished(time, job, machine, actual_duration)`.
    Finished {
        /// Simulated time (minutes).
        time: f64,
        /// Job identifier.
        job: String,
        /// Machine identifier.
        machine: String,
        /// Sampled actual duration (minutes).
        actual_duration: f64,
    },
    /// `job_interrupted(time, job, machine)`.
    Interrupted {
        /// Simulated time (minutes).
        time: f64,
        /// Job identifier.
        job: String,
        /// Machine identifier.
        machine: String,
    },
}

/// Observer that records the notification stream in emission order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// Recorded notifications, oldest first.
    pub events: Vec<SimulationEvent>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded interruptions only.
    pub fn interruptions(&self) -> Vec<&SimulationEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::Interrupted { .. }))
            .collect()
    }
}

impl SimulationObserver for RecordingObserver {
    fn job_started(&mut self, time: f64, job: &str, machine: &str) {
        self.events.push(SimulationEvent::Started {
            time,
            job: job.into(),
            machine: machine.into(),
        });
    }

    fn job_finished(&mut self, time: f64, job: &str, machine: &str, actual_duration: f64) {
        self.events.push(SimulationEvent::Finished {
            time,
            job: job.into(),
            machine: machine.into(),
            actual_duration,
        });
    }

    fn job_interrupted(&mut self, time: f64, job: &str, machine: &str) {
        self.events.push(SimulationEvent::Interrupted {
            time,
            job: job.into(),
            machine: machine.into(),
        });
    }
}

/// Observer wrapper that sleeps a wall-clock delay after forwarding
/// each notification, slowing playback to a human-watchable pace.
///
/// The delay is pure wall-clock time; it is never read by and never
/// influences the simulated clock.
#[derive(Debug)]
pub struct PacedObserver<O> {
    inner: O,
    delay: Duration,
}

impl<O: SimulationObserver> PacedObserver<O> {
    /// Wraps `inner`, pausing `delay` after each notification.
    pub fn new(inner: O, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Consumes the wrapper, returning the inner observer.
    pub fn into_inner(self) -> O {
        self.inner
    }

    fn pace(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

impl<O: SimulationObserver> SimulationObserver for PacedObserver<O> {
    fn job_started(&mut self, time: f64, job: &str, machine: &str) {
        self.inner.job_started(time, job, machine);
        self.pace();
    }

    fn job_finished(&mut self, time: f64, job: &str, machine: &str, actual_duration: f64) {
        self.inner.job_finished(time, job, machine, actual_duration);
        self.pace();
    }

    fn job_interrupted(&mut self, time: f64, job: &str, machine: &str) {
        self.inner.job_interrupted(time, job, machine);
        self.pace();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_preserves_order() {
        let mut obs = RecordingObserver::new();
        obs.job_started(0.0, "J1", "M1");
        obs.job_finished(10.0, "J1", "M1", 10.0);
        obs.job_interrupted(1430.0, "J2", "M1");

        assert_eq!(obs.events.len(), 3);
        assert!(matches!(obs.events[0], SimulationEvent::Started { .. }));
        assert!(matches!(obs.events[1], SimulationEvent::Finished { .. }));
        assert_eq!(obs.interruptions().len(), 1);
    }

    #[test]
    fn test_paced_observer_forwards() {
        let mut paced = PacedObserver::new(RecordingObserver::new(), Duration::ZERO);
        paced.job_started(5.0, "J1", "M2");
        let inner = paced.into_inner();
        assert_eq!(
            inner.events,
            vec![SimulationEvent::Started {
                time: 5.0,
                job: "J1".into(),
                machine: "M2".into(),
            }]
        );
    }
}
