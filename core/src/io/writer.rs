use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{CoreError, CoreResult, Domain, Stream};
use crate::telemetry::log::LogManager;

/// Paths produced by one [`DatasetWriter::write`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub records: usize,
}

/// Persists record sequences as `<root>/<domain>/<stream>/<domain>_<stream>_<suffix>.{csv,json}`.
pub struct DatasetWriter {
    root: PathBuf,
    logger: LogManager,
}

impl DatasetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logger: LogManager::new("writer"),
        }
    }

    pub fn stream_dir(&self, domain: Domain, stream: Stream) -> PathBuf {
        self.root.join(domain.as_str()).join(stream.as_str())
    }

    /// Writes the CSV and JSON renditions of `records`.
    ///
    /// The CSV header is the first record's key order. Both payloads are
    /// encoded before any file is touched, so a shape error writes nothing.
    pub fn write<T: Serialize>(
        &self,
        domain: Domain,
        stream: Stream,
        suffix: &str,
        records: &[T],
    ) -> CoreResult<WrittenFiles> {
        validate_suffix(suffix)?;
        if records.is_empty() {
            return Err(CoreError::EmptyRecordSet { domain, stream });
        }

        let dir = self.stream_dir(domain, stream);
        let stem = format!("{}_{}_{}", domain, stream, suffix);
        let csv_path = dir.join(format!("{}.csv", stem));
        let json_path = dir.join(format!("{}.json", stem));

        let objects = to_objects(records)?;
        let csv_bytes = encode_csv(&objects, &csv_path)?;
        let json_bytes = serde_json::to_vec_pretty(&objects)?;

        fs::create_dir_all(&dir).map_err(|source| CoreError::Io {
            path: dir.clone(),
            source,
        })?;
        write_file(&csv_path, &csv_bytes)?;
        write_file(&json_path, &json_bytes)?;

        self.logger.record(&format!(
            "wrote {} {}/{} records to {}",
            records.len(),
            domain,
            stream,
            dir.display()
        ));

        Ok(WrittenFiles {
            csv: csv_path,
            json: json_path,
            records: records.len(),
        })
    }
}

/// Collision-avoiding suffix, e.g. `20250926_020000`.
pub fn timestamp_suffix(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

fn validate_suffix(suffix: &str) -> CoreResult<()> {
    let valid = !suffix.is_empty()
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidSuffix(suffix.to_string()))
    }
}

fn to_objects<T: Serialize>(records: &[T]) -> CoreResult<Vec<Map<String, Value>>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(CoreError::NotAnObject { index }),
        })
        .collect()
}

fn encode_csv(objects: &[Map<String, Value>], path: &Path) -> CoreResult<Vec<u8>> {
    let header: Vec<&str> = objects
        .first()
        .map(|first| first.keys().map(String::as_str).collect())
        .unwrap_or_default();

    for (index, object) in objects.iter().enumerate().skip(1) {
        if let Some(field) = object.keys().find(|k| !header.contains(&k.as_str())) {
            return Err(CoreError::UnexpectedField {
                index,
                field: field.clone(),
            });
        }
    }

    let csv_err = |source| CoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header).map_err(csv_err)?;
    for object in objects {
        let row: Vec<String> = header
            .iter()
            .map(|key| object.get(*key).map(csv_cell).unwrap_or_default())
            .collect();
        writer.write_record(&row).map_err(csv_err)?;
    }
    writer.into_inner().map_err(|err| CoreError::Io {
        path: path.to_path_buf(),
        source: err.into_error(),
    })
}

/// Scalars are written bare; nested values as compact JSON text.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    fs::write(path, bytes).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
