use chrono::{DateTime, SubsecRound, Utc};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use surveilcore::processing::{AlertDeriver, TrajectoryModel, TrajectoryPlan, TrajectorySynthesizer};

pub const DEFAULT_SEED: u64 = 2025;
pub const DEFAULT_RADAR_COUNT: usize = 120;
pub const DEFAULT_ADSB_COUNT: usize = 150;

/// Per-domain settings for synthetic trajectory generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enabled: bool,
    /// Total observations across all targets.
    pub count: usize,
    pub seed: u64,
    /// First sample time; the current UTC second when unset.
    pub start: Option<DateTime<Utc>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: DEFAULT_RADAR_COUNT,
            seed: DEFAULT_SEED,
            start: None,
        }
    }
}

impl GeneratorConfig {
    pub fn radar() -> Self {
        Self::default()
    }

    pub fn adsb() -> Self {
        Self {
            count: DEFAULT_ADSB_COUNT,
            ..Self::default()
        }
    }

    pub fn plan(&self) -> TrajectoryPlan {
        let start = self.start.unwrap_or_else(|| Utc::now().trunc_subsecs(0));
        TrajectoryPlan::new(self.count, start)
    }
}

/// Observations plus the alerts derived from them.
#[derive(Debug, Clone)]
pub struct Scenario<O, A> {
    pub observations: Vec<O>,
    pub alerts: Vec<A>,
}

/// Runs synthesizer and alert deriver with a fresh RNG seeded from `config`.
pub fn build_scenario<M: TrajectoryModel>(
    model: &M,
    config: &GeneratorConfig,
) -> Scenario<M::Observation, M::Alert> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let observations = TrajectorySynthesizer::new().run(model, &config.plan(), &mut rng);
    let alerts = AlertDeriver::new().run(model, &observations);
    Scenario {
        observations,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use surveilcore::processing::{AdsbModel, RadarModel};

    fn fixed(count: usize, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            count,
            seed,
            start: Some(Utc.with_ymd_and_hms(2025, 9, 26, 2, 0, 0).unwrap()),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn radar_scenario_matches_default_sizes() {
        let scenario = build_scenario(&RadarModel::default(), &fixed(DEFAULT_RADAR_COUNT, DEFAULT_SEED));
        assert_eq!(scenario.observations.len(), 120);
        assert_eq!(scenario.alerts.len(), 24);
    }

    #[test]
    fn domains_use_independent_generators() {
        let config = fixed(30, 9);
        let radar_alone = build_scenario(&RadarModel::default(), &config);
        let _ = build_scenario(&AdsbModel::default(), &config);
        let radar_again = build_scenario(&RadarModel::default(), &config);
        assert_eq!(radar_alone.observations, radar_again.observations);
    }

    #[test]
    fn unset_start_is_whole_second() {
        let plan = GeneratorConfig::adsb().plan();
        assert_eq!(plan.count, 150);
        assert_eq!(plan.start.timestamp_subsec_nanos(), 0);
    }
}
