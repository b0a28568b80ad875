//! Day simulation orchestrator.
//!
//! Builds the engine entities from a validated plan, runs the event
//! loop until it drains or simulated time reaches the day-end cutoff,
//! and computes the executed/undone partition.
//!
//! A `DaySimulation` is single-use: `run` consumes it, because the
//! engine holds run-scoped mutable state that is not designed for
//! reuse. Build a fresh instance for every run.

use std::collections::{HashMap, HashSet};

use crate::engine::process::JobProcess;
use crate::engine::{EventQueue, Machine, SimContext, SimTime, TaskId, Wake};
use crate::error::SimulationError;
use crate::models::{ExecutedOperation, RunResult, UndoneOperation};
use crate::observer::{NullObserver, SimulationObserver};
use crate::plan::SchedulePlan;
use crate::sampler::{DurationSampler, LogNormalSampler};

/// Length of the simulated day (minutes); bounds every run.
pub const DAY_MINUTES: f64 = 1440.0;

/// Default coefficient of variation for actual durations.
pub const DEFAULT_COEFFICIENT_OF_VARIATION: f64 = 0.2;

/// Orchestrator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Day-end cutoff (minutes). Clamped to [`DAY_MINUTES`] at run time.
    pub horizon: f64,
    /// Shape parameter of the log-normal duration variation.
    pub coefficient_of_variation: f64,
    /// Random seed. `None` seeds from the operating system; fixing it
    /// makes repeated runs on the same input identical.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: DAY_MINUTES,
            coefficient_of_variation: DEFAULT_COEFFICIENT_OF_VARIATION,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the day-end cutoff (minutes).
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the coefficient of variation.
    pub fn with_coefficient_of_variation(mut self, cv: f64) -> Self {
        self.coefficient_of_variation = cv;
        self
    }

    /// Sets a fixed random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Re-simulates one planned day under contention and duration variation.
pub struct DaySimulation {
    plan: SchedulePlan,
    config: SimulationConfig,
    sampler: Option<Box<dyn DurationSampler>>,
}

impl DaySimulation {
    /// Creates a simulation over a validated plan with default
    /// configuration.
    pub fn new(plan: SchedulePlan) -> Self {
        Self {
            plan,
            config: SimulationConfig::default(),
            sampler: None,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default log-normal sampler with a custom duration
    /// source. Overrides the configured coefficient of variation and seed.
    pub fn with_sampler(mut self, sampler: Box<dyn DurationSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// The plan under simulation.
    pub fn plan(&self) -> &SchedulePlan {
        &self.plan
    }

    /// Runs the simulation without notifications.
    pub fn run(self) -> Result<RunResult, SimulationError> {
        let mut observer = NullObserver;
        self.run_with_observer(&mut observer)
    }

    /// Runs the simulation, reporting progress through `observer`.
    ///
    /// Consumes the simulation; a second run needs a fresh instance.
    pub fn run_with_observer(
        self,
        observer: &mut dyn SimulationObserver,
    ) -> Result<RunResult, SimulationError> {
        let cutoff = SimTime::from_minutes(self.config.horizon.min(DAY_MINUTES));

        let cv = self.config.coefficient_of_variation;
        let seed = self.config.seed;
        let mut sampler = self.sampler.unwrap_or_else(|| {
            Box::new(match seed {
                Some(seed) => LogNormalSampler::seeded(cv, seed),
                None => LogNormalSampler::new(cv),
            })
        });

        // One machine per distinct machine id, one process per job.
        let mut machines: Vec<Machine> = Vec::new();
        let mut machine_index: HashMap<String, usize> = HashMap::new();
        for id in self.plan.machine_ids() {
            let index = machines.len();
            machine_index.insert(id.to_string(), index);
            machines.push(Machine::new(id, index));
        }
        let mut processes: Vec<JobProcess> = self
            .plan
            .jobs()
            .iter()
            .enumerate()
            .map(|(i, job)| JobProcess::new(TaskId(i), job, &machine_index))
            .collect();

        tracing::info!(
            jobs = processes.len(),
            machines = machines.len(),
            entries = self.plan.entry_count(),
            cutoff = cutoff.as_minutes(),
            "starting day simulation"
        );

        let mut queue: EventQueue<Wake> = EventQueue::new();
        let mut executed: Vec<ExecutedOperation> = Vec::new();
        let mut in_flight: HashMap<(String, String), f64> = HashMap::new();
        let mut now = SimTime::ZERO;

        for process in &mut processes {
            let mut ctx = SimContext {
                now,
                horizon: cutoff,
                queue: &mut queue,
                machines: &mut machines,
                sampler: sampler.as_mut(),
                observer: &mut *observer,
                executed: &mut executed,
                in_flight: &mut in_flight,
            };
            process.start(&mut ctx);
        }

        while let Some(ev) = queue.pop() {
            if ev.at >= cutoff {
                now = cutoff;
                break;
            }
            debug_assert!(ev.at >= now, "simulated time must not run backward");
            now = ev.at;

            let mut ctx = SimContext {
                now,
                horizon: cutoff,
                queue: &mut queue,
                machines: &mut machines,
                sampler: sampler.as_mut(),
                observer: &mut *observer,
                executed: &mut executed,
                in_flight: &mut in_flight,
            };
            processes[ev.task.0].resume(ev.event, &mut ctx)?;
        }

        // Diff: anything without an executed record for its (job,
        // machine) pair is undone; begun-but-unfinished operations keep
        // their observed start from the in-flight map.
        let executed_pairs: HashSet<(String, String)> = executed
            .iter()
            .map(|op| (op.job.clone(), op.machine.clone()))
            .collect();
        let undone: Vec<UndoneOperation> = self
            .plan
            .entries()
            .iter()
            .filter(|e| !executed_pairs.contains(&(e.job.clone(), e.machine.clone())))
            .map(|e| UndoneOperation {
                job: e.job.clone(),
                machine: e.machine.clone(),
                planned_duration: e.duration,
                observed_start: in_flight.get(&e.pair()).copied(),
            })
            .collect();

        tracing::info!(
            executed = executed.len(),
            undone = undone.len(),
            final_time = now.as_minutes(),
            "day simulation finished"
        );

        Ok(RunResult {
            executed,
            undone,
            final_time: now.as_minutes(),
        })
    }
}
