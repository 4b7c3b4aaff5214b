use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::prelude::{Domain, Stream};
use crate::telemetry::IngestMetrics;

static MISSING: Cell = Cell::Missing;

/// One value of a loaded table.
///
/// Files are read into `Raw`; normalization turns typed columns into
/// `Number` / `Instant`, or `Missing` when the raw value does not coerce.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Raw(Value),
    Number(f64),
    Instant(DateTime<Utc>),
}

impl Cell {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            other => Cell::Raw(other),
        }
    }

    /// Empty CSV fields carry no value.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Cell::Missing
        } else {
            Cell::Raw(Value::String(text.to_string()))
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Instant(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Raw(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Cell::Raw(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: HashMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        self.cells.insert(column.into(), cell);
    }

    /// Absent columns read as [`Cell::Missing`].
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_f64()
    }

    pub fn instant(&self, column: &str) -> Option<DateTime<Utc>> {
        self.get(column).as_instant()
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).as_text()
    }
}

/// Rows parsed from a single file, with that file's own columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn add_column(&mut self, column: &str) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }
    }
}

/// Union of every row loaded for one domain/stream pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    domain: Domain,
    stream: Stream,
    columns: Vec<String>,
    rows: Vec<Row>,
    sources: Vec<PathBuf>,
    pub(crate) metrics: IngestMetrics,
}

impl Dataset {
    /// Zero rows and no columns; the result of loading nothing.
    pub fn empty(domain: Domain, stream: Stream) -> Self {
        Self {
            domain,
            stream,
            columns: Vec::new(),
            rows: Vec::new(),
            sources: Vec::new(),
            metrics: IngestMetrics::new(),
        }
    }

    pub fn append(&mut self, set: RowSet, source: &Path) {
        for column in set.columns {
            if !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
        self.metrics.record_file(set.rows.len());
        self.rows.extend(set.rows);
        self.sources.push(source.to_path_buf());
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column union in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Files that contributed rows, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn metrics(&self) -> IngestMetrics {
        self.metrics
    }

    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Earliest and latest parsed instant of the domain's time column.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut instants = self.column(self.domain.time_column()).filter_map(Cell::as_instant);
        let first = instants.next()?;
        Some(instants.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Cell)]) -> Row {
        let mut row = Row::new();
        for (k, v) in pairs {
            row.insert(*k, v.clone());
        }
        row
    }

    #[test]
    fn append_unions_columns_and_leaves_gaps_missing() {
        let mut ds = Dataset::empty(Domain::Radar, Stream::Info);
        ds.append(
            RowSet {
                columns: vec!["lat".into(), "quality".into()],
                rows: vec![row(&[("lat", Cell::Number(1.0)), ("quality", Cell::Number(0.9))])],
            },
            Path::new("a.csv"),
        );
        ds.append(
            RowSet {
                columns: vec!["lat".into(), "snr_db".into()],
                rows: vec![row(&[("lat", Cell::Number(2.0)), ("snr_db", Cell::Number(12.0))])],
            },
            Path::new("b.json"),
        );

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.columns(), ["lat", "quality", "snr_db"]);
        assert!(ds.rows()[1].get("quality").is_missing());
        assert!(ds.rows()[0].get("snr_db").is_missing());
        assert_eq!(ds.sources().len(), 2);
        assert_eq!(ds.metrics().rows, 2);
    }

    #[test]
    fn empty_dataset_has_no_columns_or_span() {
        let ds = Dataset::empty(Domain::Adsb, Stream::Pred);
        assert!(ds.is_empty());
        assert!(ds.columns().is_empty());
        assert!(ds.time_span().is_none());
    }

    #[test]
    fn cell_constructors_map_blank_and_null_to_missing() {
        assert!(Cell::from_text("").is_missing());
        assert!(Cell::from_json(Value::Null).is_missing());
        assert_eq!(Cell::from_text("T001").as_text(), Some("T001"));
        assert_eq!(Cell::from_json(json!(8)).as_raw(), Some(&json!(8)));
    }
}
