use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sensor family a dataset belongs to. Drives file naming and normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Radar,
    Adsb,
    /// Scene records produced by the external vision extractor.
    Ground,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Radar => "radar",
            Domain::Adsb => "adsb",
            Domain::Ground => "ground",
        }
    }

    /// Column parsed into a UTC instant during normalization.
    pub fn time_column(self) -> &'static str {
        match self {
            Domain::Radar | Domain::Adsb => "timestamp_utc",
            Domain::Ground => "time_utc",
        }
    }

    /// Columns coerced to `f64` during normalization.
    pub fn numeric_columns(self) -> &'static [&'static str] {
        match self {
            Domain::Radar => &[
                "lat", "lon", "range_km", "az_deg", "vel_mps", "snr_db", "quality", "score",
            ],
            Domain::Adsb => &[
                "lat",
                "lon",
                "alt_baro_ft",
                "gs_mps",
                "trk_deg",
                "roc_mps",
                "score",
            ],
            Domain::Ground => &["credibility"],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `info` holds raw observations, `pred` the derived alerts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Info,
    Pred,
}

impl Stream {
    pub fn as_str(self) -> &'static str {
        match self {
            Stream::Info => "info",
            Stream::Pred => "pred",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common error type for the write path and for single-file reads.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("refusing to write an empty record set for {domain}/{stream}")]
    EmptyRecordSet { domain: Domain, stream: Stream },
    #[error("record {index} does not serialize to a JSON object")]
    NotAnObject { index: usize },
    #[error("record {index} has field `{field}` that is not in the header")]
    UnexpectedField { index: usize, field: String },
    #[error("invalid file suffix `{0}`")]
    InvalidSuffix(String),
    #[error("unsupported file type: {0}")]
    UnsupportedFile(PathBuf),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("json error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_and_stream_render_lowercase() {
        assert_eq!(format!("{}_{}", Domain::Adsb, Stream::Pred), "adsb_pred");
        assert_eq!(Domain::Radar.time_column(), "timestamp_utc");
    }

    #[test]
    fn radar_numeric_columns_cover_track_and_alert_fields() {
        let cols = Domain::Radar.numeric_columns();
        for name in ["range_km", "quality", "score", "snr_db"] {
            assert!(cols.contains(&name), "missing {}", name);
        }
        assert!(!cols.contains(&"track_id"));
    }
}
