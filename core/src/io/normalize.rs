use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::io::dataset::{Cell, Dataset};

/// Offset-carrying layouts tried after RFC 3339.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];
/// Layouts without an offset; read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses the textual timestamp forms found in sensor exports.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Numbers and numeric text coerce; everything else, NaN and infinities do not.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Only strings carry timestamps; numeric epochs are not interpreted.
pub fn coerce_instant(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_timestamp)
}

/// Types the domain's time and numeric columns in place.
///
/// Returns how many raw cells could not be coerced and became missing.
/// Columns the dataset does not have are ignored, as are unlisted columns.
pub fn normalize(dataset: &mut Dataset) -> usize {
    let domain = dataset.domain();
    let mut degraded = 0;

    let time_column = domain.time_column();
    if dataset.has_column(time_column) {
        degraded += coerce_column(dataset, time_column, |v| coerce_instant(v).map(Cell::Instant));
    }

    for column in domain.numeric_columns() {
        if dataset.has_column(column) {
            degraded += coerce_column(dataset, column, |v| coerce_number(v).map(Cell::Number));
        }
    }

    dataset.metrics.record_degraded(degraded);
    degraded
}

fn coerce_column<F>(dataset: &mut Dataset, column: &str, coerce: F) -> usize
where
    F: Fn(&Value) -> Option<Cell>,
{
    let mut degraded = 0;
    for row in dataset.rows_mut() {
        let Some(cell) = row.get_mut(column) else {
            continue;
        };
        if let Cell::Raw(value) = cell {
            *cell = match coerce(value) {
                Some(typed) => typed,
                None => {
                    degraded += 1;
                    Cell::Missing
                }
            };
        }
    }
    degraded
}
