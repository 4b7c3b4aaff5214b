use chrono::{DateTime, Utc};
use rand::Rng;

use crate::math::{AngleHelper, RoundingHelper};
use crate::prelude::Domain;
use crate::processing::alerts::{AlertCategory, AlertRule, AlertTable, Criterion, Metric, Verdict};
use crate::processing::trajectory::TrajectoryModel;
use crate::records::{AdsbAlert, AdsbMessage};

pub const EMERGENCY_SQUAWKS: [&str; 3] = ["7500", "7600", "7700"];

/// `(icao24, callsign)` pairs of the simulated aircraft.
pub const ADSB_AIRCRAFT: [(&str, &str); 3] = [
    ("abcd12", "MU5123"),
    ("beef99", "CCA178"),
    ("c0ffee", "CSC888"),
];

const FEET_PER_METER: f64 = 3.28084;
const BASE_LAT: f64 = 31.20;
const BASE_LON: f64 = 121.40;
const ORIGIN_SPREAD_DEG: f64 = 0.15;
const LAT_STEP_DEG: f64 = 0.00025;
const LON_STEP_DEG: f64 = 0.00020;
const DRIFT_JITTER: (f64, f64) = (0.95, 1.05);
const ALTITUDE_M: (u32, u32) = (2000, 4000);
const ALT_STEP_FT: f64 = 20.0;
const ALT_JITTER: f64 = 0.2;
/// Largest step index fed into the altitude perturbation. Keeps
/// `ALT_STEP_FT * ALT_JITTER * step` below the lowest origin altitude.
const ALT_DRIFT_STEP_CAP: usize = 1600;
const GROUND_SPEED_MPS: (f64, f64) = (110.0, 230.0);
const SPEED_JITTER_MPS: f64 = 5.0;
const TRACK_RATE_DEG_PER_STEP: f64 = 0.3;
const CLIMB_RATE_MPS: f64 = 5.0;
/// Empty code listed twice to weight "no squawk" higher.
const SQUAWK_CHOICES: [&str; 5] = ["", "7500", "7600", "7700", ""];
const NACP_RANGE: (u8, u8) = (7, 10);
const NIC_RANGE: (u8, u8) = (6, 8);
const SOURCE_TAG: &str = "adsb";

pub static ADSB_ALERTS: AlertTable = AlertTable {
    rules: &[
        AlertRule {
            category: AlertCategory::Emergency,
            score: 0.95,
            all_of: &[Criterion::CodeIn(&EMERGENCY_SQUAWKS)],
        },
        AlertRule {
            category: AlertCategory::Watch,
            score: 0.75,
            all_of: &[
                Criterion::Below(Metric::AltitudeFt, 3000.0),
                Criterion::Below(Metric::GroundSpeedMps, 120.0),
            ],
        },
    ],
    normal_score: 0.35,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    pub icao24: String,
    pub callsign: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsbOrigin {
    pub lat: f64,
    pub lon: f64,
    pub alt_ft: f64,
    pub ground_speed_mps: f64,
    pub track_deg: f64,
}

#[derive(Debug, Clone)]
pub struct AdsbModel {
    aircraft: Vec<Aircraft>,
}

impl AdsbModel {
    pub fn new() -> Self {
        Self {
            aircraft: ADSB_AIRCRAFT
                .iter()
                .map(|(icao24, callsign)| Aircraft {
                    icao24: icao24.to_string(),
                    callsign: callsign.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for AdsbModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TrajectoryModel for AdsbModel {
    type Target = Aircraft;
    type Origin = AdsbOrigin;
    type Observation = AdsbMessage;
    type Alert = AdsbAlert;

    fn domain(&self) -> Domain {
        Domain::Adsb
    }

    fn targets(&self) -> &[Aircraft] {
        &self.aircraft
    }

    fn draw_origin<R: Rng + ?Sized>(&self, rng: &mut R) -> AdsbOrigin {
        let lat = BASE_LAT + rng.gen_range(-ORIGIN_SPREAD_DEG..ORIGIN_SPREAD_DEG);
        let lon = BASE_LON + rng.gen_range(-ORIGIN_SPREAD_DEG..ORIGIN_SPREAD_DEG);
        let alt_m = rng.gen_range(ALTITUDE_M.0..=ALTITUDE_M.1);
        AdsbOrigin {
            lat,
            lon,
            alt_ft: f64::from(alt_m) * FEET_PER_METER,
            ground_speed_mps: rng.gen_range(GROUND_SPEED_MPS.0..GROUND_SPEED_MPS.1),
            track_deg: rng.gen_range(0.0..360.0),
        }
    }

    fn observe<R: Rng + ?Sized>(
        &self,
        target: &Aircraft,
        origin: &AdsbOrigin,
        step: usize,
        timestamp: DateTime<Utc>,
        rng: &mut R,
    ) -> AdsbMessage {
        let k = step as f64;
        let lat = origin.lat + LAT_STEP_DEG * k * rng.gen_range(DRIFT_JITTER.0..DRIFT_JITTER.1);
        let lon = origin.lon + LON_STEP_DEG * k * rng.gen_range(DRIFT_JITTER.0..DRIFT_JITTER.1);
        let alt_steps = step.min(ALT_DRIFT_STEP_CAP) as f64;
        let alt = origin.alt_ft + ALT_STEP_FT * alt_steps * rng.gen_range(-ALT_JITTER..ALT_JITTER);
        let gs = origin.ground_speed_mps + rng.gen_range(-SPEED_JITTER_MPS..SPEED_JITTER_MPS);
        let trk = AngleHelper::wrap_deg(origin.track_deg + TRACK_RATE_DEG_PER_STEP * k);
        let roc = rng.gen_range(-CLIMB_RATE_MPS..CLIMB_RATE_MPS);
        let squawk = SQUAWK_CHOICES[rng.gen_range(0..SQUAWK_CHOICES.len())];
        let nacp = rng.gen_range(NACP_RANGE.0..=NACP_RANGE.1);
        let nic = rng.gen_range(NIC_RANGE.0..=NIC_RANGE.1);

        AdsbMessage {
            timestamp_utc: timestamp,
            icao24: target.icao24.clone(),
            callsign: target.callsign.clone(),
            lat: RoundingHelper::round_to(lat, 6),
            lon: RoundingHelper::round_to(lon, 6),
            alt_baro_ft: RoundingHelper::round_to(alt, 1),
            gs_mps: RoundingHelper::round_to(gs, 2),
            trk_deg: AngleHelper::wrap_deg(RoundingHelper::round_to(trk, 2)),
            roc_mps: RoundingHelper::round_to(roc, 2),
            squawk: squawk.to_string(),
            nacp,
            nic,
            src: SOURCE_TAG.to_string(),
        }
    }

    fn alert_table(&self) -> &AlertTable {
        &ADSB_ALERTS
    }

    fn to_alert(&self, msg: &AdsbMessage, verdict: Verdict) -> AdsbAlert {
        AdsbAlert::from_message(msg, verdict.category, verdict.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::alerts::AlertDeriver;
    use crate::processing::trajectory::{TrajectoryPlan, TrajectorySynthesizer};
    use chrono::{Duration, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};

    fn synthesize(count: usize, seed: u64) -> Vec<AdsbMessage> {
        let start = Utc.with_ymd_and_hms(2025, 9, 26, 2, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        TrajectorySynthesizer::new().run(
            &AdsbModel::default(),
            &TrajectoryPlan::new(count, start),
            &mut rng,
        )
    }

    fn message(alt: f64, gs: f64, squawk: &str) -> AdsbMessage {
        AdsbMessage {
            timestamp_utc: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            icao24: "abcd12".into(),
            callsign: "MU5123".into(),
            lat: 31.2,
            lon: 121.4,
            alt_baro_ft: alt,
            gs_mps: gs,
            trk_deg: 90.0,
            roc_mps: 0.0,
            squawk: squawk.into(),
            nacp: 8,
            nic: 7,
            src: "adsb".into(),
        }
    }

    #[test]
    fn messages_are_deterministic_and_well_formed() {
        let msgs = synthesize(150, 2025);
        assert_eq!(msgs, synthesize(150, 2025));
        assert_eq!(msgs.len(), 150);
        for (chunk, (icao, callsign)) in msgs.chunks(50).zip(ADSB_AIRCRAFT) {
            for pair in chunk.windows(2) {
                assert_eq!(pair[1].timestamp_utc - pair[0].timestamp_utc, Duration::seconds(2));
            }
            for m in chunk {
                assert_eq!(m.icao24, icao);
                assert_eq!(m.callsign, callsign);
                assert_eq!(m.src, "adsb");
                assert!(m.alt_baro_ft > 0.0);
                assert!((0.0..360.0).contains(&m.trk_deg));
                assert!((7..=10).contains(&m.nacp) && (6..=8).contains(&m.nic));
                assert!(SQUAWK_CHOICES.iter().any(|s| *s == m.squawk));
            }
        }
    }

    #[test]
    fn altitude_stays_positive_on_long_runs() {
        for m in synthesize(3 * 2500, 5) {
            assert!(m.alt_baro_ft > 0.0);
        }
    }

    #[test]
    fn drift_stays_within_jitter_bound() {
        let msgs = synthesize(150, 17);
        for chunk in msgs.chunks(50) {
            let (lat0, lon0) = (chunk[0].lat, chunk[0].lon);
            for (k, m) in chunk.iter().enumerate() {
                let k = k as f64;
                assert!((m.lat - lat0 - LAT_STEP_DEG * k).abs() <= 0.05 * LAT_STEP_DEG * k + 2e-6);
                assert!((m.lon - lon0 - LON_STEP_DEG * k).abs() <= 0.05 * LON_STEP_DEG * k + 2e-6);
            }
        }
    }

    #[test]
    fn emergency_code_overrides_low_and_slow() {
        let verdict = ADSB_ALERTS.classify(&message(1500.0, 90.0, "7700"));
        assert_eq!(verdict.category, AlertCategory::Emergency);
        assert_eq!(verdict.score, 0.95);
    }

    #[test]
    fn low_and_slow_is_watch_otherwise_normal() {
        let watch = ADSB_ALERTS.classify(&message(2500.0, 100.0, ""));
        assert_eq!(watch.category, AlertCategory::Watch);
        assert_eq!(watch.score, 0.75);

        let fast = ADSB_ALERTS.classify(&message(2500.0, 150.0, ""));
        assert_eq!(fast.category, AlertCategory::Normal);
        assert_eq!(fast.score, 0.35);

        let civil = ADSB_ALERTS.classify(&message(2500.0, 100.0, "1200"));
        assert_eq!(civil.category, AlertCategory::Watch);
    }

    #[test]
    fn derived_alerts_follow_squawk() {
        let model = AdsbModel::default();
        let msgs = synthesize(150, 2025);
        let alerts = AlertDeriver::new().run(&model, &msgs);
        assert_eq!(alerts.len(), 30);
        for (alert, msg) in alerts.iter().zip(msgs.iter().step_by(5)) {
            assert_eq!(alert.timestamp_utc, msg.timestamp_utc);
            let emergency = EMERGENCY_SQUAWKS.iter().any(|s| *s == msg.squawk);
            assert_eq!(alert.alert == AlertCategory::Emergency, emergency);
        }
    }
}
