use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::prelude::{CoreError, CoreResult};

pub const GROUND_SCHEMA_VERSION: &str = "1.0";

/// Keys every ground record carries after normalization.
pub const CORE_FIELDS: [&str; 8] = [
    "object_type",
    "area",
    "time_utc",
    "credibility",
    "evidence",
    "notes",
    "provider",
    "schema_version",
];

/// Scene record returned by the external vision extractor.
///
/// The core schema is enforced by [`GroundRecord::normalize`]; any extended
/// scene fields are kept as-is and in their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroundRecord {
    fields: Map<String, Value>,
}

impl GroundRecord {
    pub fn normalize(value: Value) -> CoreResult<Self> {
        let mut fields = match value {
            Value::Object(map) => map,
            _ => return Err(CoreError::NotAnObject { index: 0 }),
        };

        for key in CORE_FIELDS {
            fields
                .entry(key)
                .or_insert_with(|| Value::String(String::new()));
        }

        let area = normalize_area(fields.get("area"));
        fields.insert("area".into(), area);

        let credibility = fields.get("credibility").map_or(0.0, credibility_of);
        fields.insert("credibility".into(), json!(credibility));

        if !fields.get("evidence").is_some_and(Value::is_array) {
            fields.insert("evidence".into(), Value::Array(Vec::new()));
        }

        fields.insert(
            "schema_version".into(),
            Value::String(GROUND_SCHEMA_VERSION.into()),
        );

        Ok(Self { fields })
    }

    pub fn with_provider(mut self, provider: &str) -> Self {
        if !provider.is_empty() {
            self.fields
                .insert("provider".into(), Value::String(provider.into()));
        }
        self
    }

    pub fn credibility(&self) -> f64 {
        self.fields
            .get("credibility")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn area(&self) -> Option<&Value> {
        self.fields.get("area")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn normalize_area(raw: Option<&Value>) -> Value {
    let area = raw.and_then(Value::as_object);
    let kind = area
        .and_then(|a| a.get("type"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(|| "point".to_string(), str::to_lowercase);

    let coords = match area.and_then(|a| a.get("coords")) {
        Some(Value::Null) | None if kind == "point" => json!([0, 0]),
        Some(Value::Null) | None => json!([]),
        Some(other) => other.clone(),
    };

    let coords = if kind == "polygon" {
        close_ring(coords)
    } else {
        coords
    };

    json!({ "type": kind, "coords": coords })
}

fn close_ring(coords: Value) -> Value {
    match coords {
        Value::Array(mut ring) if ring.len() >= 3 => {
            if ring.first() != ring.last() {
                let first = ring[0].clone();
                ring.push(first);
            }
            Value::Array(ring)
        }
        other => other,
    }
}

fn credibility_of(raw: &Value) -> f64 {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}
