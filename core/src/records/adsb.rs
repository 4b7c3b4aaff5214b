use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::processing::alerts::{AlertCategory, AlertSource, Metric};

/// One ADS-B position report (`info` stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsbMessage {
    pub timestamp_utc: DateTime<Utc>,
    pub icao24: String,
    pub callsign: String,
    pub lat: f64,
    pub lon: f64,
    pub alt_baro_ft: f64,
    pub gs_mps: f64,
    pub trk_deg: f64,
    /// Rate of climb.
    pub roc_mps: f64,
    /// Mode A code; empty when the transponder reports none.
    pub squawk: String,
    pub nacp: u8,
    pub nic: u8,
    pub src: String,
}

/// Alert derived from a sampled [`AdsbMessage`] (`pred` stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsbAlert {
    pub timestamp_utc: DateTime<Utc>,
    pub icao24: String,
    pub callsign: String,
    pub lat: f64,
    pub lon: f64,
    pub alt_baro_ft: f64,
    pub gs_mps: f64,
    pub trk_deg: f64,
    pub alert: AlertCategory,
    pub score: f64,
}

impl AdsbAlert {
    pub fn from_message(msg: &AdsbMessage, alert: AlertCategory, score: f64) -> Self {
        Self {
            timestamp_utc: msg.timestamp_utc,
            icao24: msg.icao24.clone(),
            callsign: msg.callsign.clone(),
            lat: msg.lat,
            lon: msg.lon,
            alt_baro_ft: msg.alt_baro_ft,
            gs_mps: msg.gs_mps,
            trk_deg: msg.trk_deg,
            alert,
            score,
        }
    }
}

impl AlertSource for AdsbMessage {
    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::AltitudeFt => Some(self.alt_baro_ft),
            Metric::GroundSpeedMps => Some(self.gs_mps),
            Metric::VelocityMps | Metric::SnrDb => None,
        }
    }

    fn transponder_code(&self) -> Option<&str> {
        if self.squawk.is_empty() {
            None
        } else {
            Some(self.squawk.as_str())
        }
    }
}
