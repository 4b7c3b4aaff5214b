use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::processing::alerts::{AlertCategory, AlertSource, Metric};

/// One radar plot for one track at one instant (`info` stream).
///
/// Field order is the on-disk column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarTrack {
    pub timestamp_utc: DateTime<Utc>,
    pub radar_id: String,
    pub track_id: String,
    pub lat: f64,
    pub lon: f64,
    pub range_km: f64,
    pub az_deg: f64,
    pub vel_mps: f64,
    pub snr_db: f64,
    pub quality: f64,
}

/// Alert derived from a sampled [`RadarTrack`] (`pred` stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarAlert {
    pub timestamp_utc: DateTime<Utc>,
    pub radar_id: String,
    pub track_id: String,
    pub lat: f64,
    pub lon: f64,
    pub az_deg: f64,
    pub vel_mps: f64,
    pub snr_db: f64,
    pub alert: AlertCategory,
    pub score: f64,
}

impl RadarAlert {
    pub fn from_track(track: &RadarTrack, alert: AlertCategory, score: f64) -> Self {
        Self {
            timestamp_utc: track.timestamp_utc,
            radar_id: track.radar_id.clone(),
            track_id: track.track_id.clone(),
            lat: track.lat,
            lon: track.lon,
            az_deg: track.az_deg,
            vel_mps: track.vel_mps,
            snr_db: track.snr_db,
            alert,
            score,
        }
    }
}

impl AlertSource for RadarTrack {
    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::VelocityMps => Some(self.vel_mps),
            Metric::SnrDb => Some(self.snr_db),
            Metric::AltitudeFt | Metric::GroundSpeedMps => None,
        }
    }

    fn transponder_code(&self) -> Option<&str> {
        None
    }
}
