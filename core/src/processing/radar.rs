use chrono::{DateTime, Utc};
use rand::Rng;

use crate::math::{AngleHelper, RoundingHelper};
use crate::prelude::Domain;
use crate::processing::alerts::{AlertCategory, AlertRule, AlertTable, Criterion, Metric, Verdict};
use crate::processing::trajectory::TrajectoryModel;
use crate::records::{RadarAlert, RadarTrack};

pub const DEFAULT_RADAR_ID: &str = "RADAR-A";
pub const RADAR_TRACK_IDS: [&str; 3] = ["T001", "T002", "T003"];

const BASE_LAT: f64 = 31.20;
const BASE_LON: f64 = 121.40;
const ORIGIN_SPREAD_DEG: f64 = 0.1;
const LAT_STEP_DEG: f64 = 0.0002;
const LON_STEP_DEG: f64 = 0.00025;
/// Per-step drift factor bounds (±5 %).
const DRIFT_JITTER: (f64, f64) = (0.95, 1.05);
const SPEED_MPS: (f64, f64) = (120.0, 230.0);
const SPEED_JITTER_MPS: f64 = 5.0;
const RANGE_KM: (f64, f64) = (5.0, 60.0);
const SNR_DB: (f64, f64) = (8.0, 25.0);
const AZ_RATE_DEG_PER_STEP: f64 = 0.5;
const QUALITY_LEVELS: [f64; 4] = [0.7, 0.8, 0.9, 1.0];

pub static RADAR_ALERTS: AlertTable = AlertTable {
    rules: &[AlertRule {
        category: AlertCategory::Watch,
        score: 0.85,
        all_of: &[
            Criterion::Above(Metric::VelocityMps, 200.0),
            Criterion::Above(Metric::SnrDb, 15.0),
        ],
    }],
    normal_score: 0.35,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarOrigin {
    pub lat: f64,
    pub lon: f64,
    pub speed_mps: f64,
    pub heading_deg: f64,
}

/// Three ground-radar tracks seen by a single sensor.
#[derive(Debug, Clone)]
pub struct RadarModel {
    radar_id: String,
    tracks: Vec<String>,
}

impl RadarModel {
    pub fn new(radar_id: impl Into<String>) -> Self {
        Self {
            radar_id: radar_id.into(),
            tracks: RADAR_TRACK_IDS.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl Default for RadarModel {
    fn default() -> Self {
        Self::new(DEFAULT_RADAR_ID)
    }
}

impl TrajectoryModel for RadarModel {
    type Target = String;
    type Origin = RadarOrigin;
    type Observation = RadarTrack;
    type Alert = RadarAlert;

    fn domain(&self) -> Domain {
        Domain::Radar
    }

    fn targets(&self) -> &[String] {
        &self.tracks
    }

    fn draw_origin<R: Rng + ?Sized>(&self, rng: &mut R) -> RadarOrigin {
        RadarOrigin {
            lat: BASE_LAT + rng.gen_range(-ORIGIN_SPREAD_DEG..ORIGIN_SPREAD_DEG),
            lon: BASE_LON + rng.gen_range(-ORIGIN_SPREAD_DEG..ORIGIN_SPREAD_DEG),
            speed_mps: rng.gen_range(SPEED_MPS.0..SPEED_MPS.1),
            heading_deg: rng.gen_range(0.0..360.0),
        }
    }

    fn observe<R: Rng + ?Sized>(
        &self,
        target: &String,
        origin: &RadarOrigin,
        step: usize,
        timestamp: DateTime<Utc>,
        rng: &mut R,
    ) -> RadarTrack {
        let k = step as f64;
        let lat = origin.lat + LAT_STEP_DEG * k * rng.gen_range(DRIFT_JITTER.0..DRIFT_JITTER.1);
        let lon = origin.lon + LON_STEP_DEG * k * rng.gen_range(DRIFT_JITTER.0..DRIFT_JITTER.1);
        let range_km = rng.gen_range(RANGE_KM.0..RANGE_KM.1);
        let az_deg = AngleHelper::wrap_deg(origin.heading_deg + AZ_RATE_DEG_PER_STEP * k);
        let vel_mps = origin.speed_mps + rng.gen_range(-SPEED_JITTER_MPS..SPEED_JITTER_MPS);
        let snr_db = rng.gen_range(SNR_DB.0..SNR_DB.1);
        let quality = QUALITY_LEVELS[rng.gen_range(0..QUALITY_LEVELS.len())];

        RadarTrack {
            timestamp_utc: timestamp,
            radar_id: self.radar_id.clone(),
            track_id: target.clone(),
            lat: RoundingHelper::round_to(lat, 6),
            lon: RoundingHelper::round_to(lon, 6),
            range_km: RoundingHelper::round_to(range_km, 3),
            az_deg: AngleHelper::wrap_deg(RoundingHelper::round_to(az_deg, 2)),
            vel_mps: RoundingHelper::round_to(vel_mps, 2),
            snr_db: RoundingHelper::round_to(snr_db, 1),
            quality,
        }
    }

    fn alert_table(&self) -> &AlertTable {
        &RADAR_ALERTS
    }

    fn to_alert(&self, track: &RadarTrack, verdict: Verdict) -> RadarAlert {
        RadarAlert::from_track(track, verdict.category, verdict.score)
    }
}
