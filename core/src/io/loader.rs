use csv::ReaderBuilder;
use serde_json::Value;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::io::dataset::{Cell, Dataset, Row, RowSet};
use crate::io::discovery::discover;
use crate::io::normalize::normalize;
use crate::prelude::{CoreError, CoreResult, Domain, Stream};
use crate::telemetry::log::LogManager;

/// Reads every CSV/JSON file of a domain/stream back into one [`Dataset`].
///
/// Loading is best effort: unreadable files are skipped, bad cells become
/// missing, and an empty directory yields an empty dataset.
pub struct IngestionLoader {
    root: PathBuf,
    logger: LogManager,
}

impl IngestionLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logger: LogManager::new("loader"),
        }
    }

    pub fn stream_dir(&self, domain: Domain, stream: Stream) -> PathBuf {
        self.root.join(domain.as_str()).join(stream.as_str())
    }

    pub fn load(&self, domain: Domain, stream: Stream) -> Dataset {
        self.load_dir(&self.stream_dir(domain, stream), domain, stream)
    }

    /// Like [`IngestionLoader::load`] but for an explicit directory.
    pub fn load_dir(&self, dir: &Path, domain: Domain, stream: Stream) -> Dataset {
        let discovery = discover(dir, domain, stream);
        let mut dataset = Dataset::empty(domain, stream);

        if discovery.files.is_empty() {
            self.logger.record(&format!(
                "no {}/{} files under {}",
                domain,
                stream,
                dir.display()
            ));
            return dataset;
        }

        for path in &discovery.files {
            match self.read_file(path) {
                Ok(set) => {
                    self.logger.detail(&format!(
                        "{}: {} rows, {} columns",
                        path.display(),
                        set.rows.len(),
                        set.columns.len()
                    ));
                    dataset.append(set, path);
                }
                Err(err) => {
                    self.logger.caution(&format!("skipping {}: {}", path.display(), err));
                    dataset.metrics.record_skipped();
                }
            }
        }

        let degraded = normalize(&mut dataset);
        let metrics = dataset.metrics();
        self.logger.record(&format!(
            "{}/{}: {} rows from {} files ({} skipped, {} cells degraded)",
            domain, stream, metrics.rows, metrics.files_read, metrics.files_skipped, degraded
        ));
        dataset
    }

    /// Parses one file by extension, without normalization.
    pub fn read_file(&self, path: &Path) -> CoreResult<RowSet> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => self.read_csv(path),
            Some("json") => read_json(path),
            _ => Err(CoreError::UnsupportedFile(path.to_path_buf())),
        }
    }

    /// Rows read before the first malformed record are kept.
    fn read_csv(&self, path: &Path) -> CoreResult<RowSet> {
        let file = File::open(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = reader
            .headers()
            .map_err(|source| CoreError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .clone();

        let mut set = RowSet::default();
        for name in headers.iter() {
            set.add_column(name);
        }

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    self.logger.caution(&format!(
                        "{}: stopped after {} rows: {}",
                        path.display(),
                        set.rows.len(),
                        err
                    ));
                    break;
                }
            };
            let mut row = Row::new();
            for (name, field) in headers.iter().zip(record.iter()) {
                row.insert(name, Cell::from_text(field));
            }
            set.rows.push(row);
        }
        Ok(set)
    }
}

/// Accepts an array of objects or a single object. Non-object array
/// elements are dropped.
fn read_json(path: &Path) -> CoreResult<RowSet> {
    let text = fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&text).map_err(|source| CoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let items = match document {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return Err(CoreError::NotAnObject { index: 0 }),
    };

    let mut set = RowSet::default();
    for item in items {
        let Value::Object(map) = item else {
            continue;
        };
        let mut row = Row::new();
        for (key, value) in map {
            set.add_column(&key);
            row.insert(key, Cell::from_json(value));
        }
        set.rows.push(row);
    }
    Ok(set)
}
