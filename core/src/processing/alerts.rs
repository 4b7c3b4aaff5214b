use serde::{Deserialize, Serialize};

use crate::processing::trajectory::TrajectoryModel;
use crate::telemetry::log::LogManager;

/// Every n-th observation (0-indexed, emission order) is sampled for an alert.
pub const ALERT_STRIDE: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Normal,
    Watch,
    Emergency,
}

impl AlertCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertCategory::Normal => "normal",
            AlertCategory::Watch => "watch",
            AlertCategory::Emergency => "emergency",
        }
    }
}

/// Kinematic quantities an alert criterion can threshold on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    VelocityMps,
    SnrDb,
    AltitudeFt,
    GroundSpeedMps,
}

/// Read-only view of an observation for rule evaluation.
pub trait AlertSource {
    /// `None` when the observation does not carry the metric.
    fn metric(&self, metric: Metric) -> Option<f64>;
    fn transponder_code(&self) -> Option<&str>;
}

/// Single threshold test. Comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    Above(Metric, f64),
    Below(Metric, f64),
    CodeIn(&'static [&'static str]),
}

impl Criterion {
    pub fn holds<S: AlertSource + ?Sized>(&self, source: &S) -> bool {
        match *self {
            Criterion::Above(metric, limit) => source.metric(metric).is_some_and(|v| v > limit),
            Criterion::Below(metric, limit) => source.metric(metric).is_some_and(|v| v < limit),
            Criterion::CodeIn(codes) => source
                .transponder_code()
                .is_some_and(|code| codes.iter().any(|c| *c == code)),
        }
    }
}

/// Category assigned when every criterion holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertRule {
    pub category: AlertCategory,
    pub score: f64,
    pub all_of: &'static [Criterion],
}

/// Ordered rule list; the first matching rule wins, otherwise `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertTable {
    pub rules: &'static [AlertRule],
    pub normal_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub category: AlertCategory,
    pub score: f64,
}

impl AlertTable {
    pub fn classify<S: AlertSource + ?Sized>(&self, source: &S) -> Verdict {
        self.rules
            .iter()
            .find(|rule| rule.all_of.iter().all(|c| c.holds(source)))
            .map_or(
                Verdict {
                    category: AlertCategory::Normal,
                    score: self.normal_score,
                },
                |rule| Verdict {
                    category: rule.category,
                    score: rule.score,
                },
            )
    }
}

/// Subsamples an observation sequence and classifies each sampled element.
pub struct AlertDeriver {
    logger: LogManager,
}

impl AlertDeriver {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("alerts"),
        }
    }

    pub fn run<M: TrajectoryModel>(&self, model: &M, observations: &[M::Observation]) -> Vec<M::Alert> {
        let table = model.alert_table();
        let alerts: Vec<M::Alert> = observations
            .iter()
            .step_by(ALERT_STRIDE)
            .map(|obs| model.to_alert(obs, table.classify(obs)))
            .collect();

        self.logger.record(&format!(
            "{} alerts derived from {} {} observations",
            alerts.len(),
            observations.len(),
            model.domain()
        ));
        alerts
    }
}

impl Default for AlertDeriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        vel: Option<f64>,
        code: Option<&'static str>,
    }

    impl AlertSource for Probe {
        fn metric(&self, metric: Metric) -> Option<f64> {
            match metric {
                Metric::VelocityMps => self.vel,
                _ => None,
            }
        }

        fn transponder_code(&self) -> Option<&str> {
            self.code
        }
    }

    const TABLE: AlertTable = AlertTable {
        rules: &[
            AlertRule {
                category: AlertCategory::Emergency,
                score: 0.95,
                all_of: &[Criterion::CodeIn(&["7700"])],
            },
            AlertRule {
                category: AlertCategory::Watch,
                score: 0.5,
                all_of: &[Criterion::Above(Metric::VelocityMps, 10.0)],
            },
        ],
        normal_score: 0.1,
    };

    #[test]
    fn first_matching_rule_wins() {
        let verdict = TABLE.classify(&Probe {
            vel: Some(50.0),
            code: Some("7700"),
        });
        assert_eq!(verdict.category, AlertCategory::Emergency);
        assert_eq!(verdict.score, 0.95);
    }

    #[test]
    fn thresholds_are_strict_and_missing_metrics_never_match() {
        let at_limit = TABLE.classify(&Probe {
            vel: Some(10.0),
            code: None,
        });
        assert_eq!(at_limit.category, AlertCategory::Normal);
        assert_eq!(at_limit.score, 0.1);

        let absent = TABLE.classify(&Probe {
            vel: None,
            code: Some("1200"),
        });
        assert_eq!(absent.category, AlertCategory::Normal);
    }

    #[test]
    fn category_serializes_lowercase() {
        let text = serde_json::to_string(&AlertCategory::Watch).unwrap();
        assert_eq!(text, "\"watch\"");
        assert_eq!(AlertCategory::Emergency.as_str(), "emergency");
    }
}
