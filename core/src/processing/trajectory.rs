use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::prelude::Domain;
use crate::processing::alerts::{AlertSource, AlertTable, Verdict};
use crate::telemetry::log::LogManager;

/// Fixed sampling cadence between consecutive observations of one target.
pub const STEP_SECONDS: i64 = 2;

/// Domain descriptor driving the generic synthesize / derive pipeline.
pub trait TrajectoryModel {
    type Target;
    type Origin;
    type Observation: AlertSource;
    type Alert;

    fn domain(&self) -> Domain;

    fn targets(&self) -> &[Self::Target];

    /// Draws the per-target starting state. Called once per target, in target order.
    fn draw_origin<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Origin;

    fn observe<R: Rng + ?Sized>(
        &self,
        target: &Self::Target,
        origin: &Self::Origin,
        step: usize,
        timestamp: DateTime<Utc>,
        rng: &mut R,
    ) -> Self::Observation;

    fn alert_table(&self) -> &AlertTable;

    fn to_alert(&self, observation: &Self::Observation, verdict: Verdict) -> Self::Alert;
}

/// How many observations to emit and from when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectoryPlan {
    pub count: usize,
    pub start: DateTime<Utc>,
}

impl TrajectoryPlan {
    pub fn new(count: usize, start: DateTime<Utc>) -> Self {
        Self { count, start }
    }

    /// Equal share per target. The remainder of `count / targets` is dropped.
    pub fn steps_per_target(&self, targets: usize) -> usize {
        self.count.checked_div(targets).unwrap_or(0)
    }

    pub fn timestamp_at(&self, step: usize) -> DateTime<Utc> {
        self.start + Duration::seconds(STEP_SECONDS * step as i64)
    }
}

pub struct TrajectorySynthesizer {
    logger: LogManager,
}

impl TrajectorySynthesizer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("synth"),
        }
    }

    /// Emits all steps of the first target, then the second, and so on.
    ///
    /// The same model, plan and RNG state always produce the same sequence.
    pub fn run<M, R>(&self, model: &M, plan: &TrajectoryPlan, rng: &mut R) -> Vec<M::Observation>
    where
        M: TrajectoryModel,
        R: Rng + ?Sized,
    {
        let targets = model.targets();
        let steps = plan.steps_per_target(targets.len());
        let mut observations = Vec::with_capacity(steps * targets.len());

        for target in targets {
            let origin = model.draw_origin(rng);
            for step in 0..steps {
                let timestamp = plan.timestamp_at(step);
                observations.push(model.observe(target, &origin, step, timestamp, rng));
            }
        }

        if observations.len() != plan.count {
            self.logger.caution(&format!(
                "requested {} {} observations, emitting {} ({} targets)",
                plan.count,
                model.domain(),
                observations.len(),
                targets.len()
            ));
        }
        self.logger.record(&format!(
            "synthesized {} {} observations",
            observations.len(),
            model.domain()
        ));
        observations
    }
}

impl Default for TrajectorySynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
