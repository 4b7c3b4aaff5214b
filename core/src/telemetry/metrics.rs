use serde::Serialize;

/// Counters collected while loading one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestMetrics {
    pub files_read: usize,
    pub files_skipped: usize,
    pub rows: usize,
    /// Cells in a typed column whose raw value could not be coerced.
    pub cells_degraded: usize,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_file(&mut self, rows: usize) {
        self.files_read += 1;
        self.rows += rows;
    }

    pub fn record_skipped(&mut self) {
        self.files_skipped += 1;
    }

    pub fn record_degraded(&mut self, cells: usize) {
        self.cells_degraded += cells;
    }

    pub fn snapshot(&self) -> (usize, usize, usize, usize) {
        (
            self.files_read,
            self.files_skipped,
            self.rows,
            self.cells_degraded,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut metrics = IngestMetrics::new();
        metrics.record_file(10);
        metrics.record_file(5);
        metrics.record_skipped();
        metrics.record_degraded(2);
        assert_eq!(metrics.snapshot(), (2, 1, 15, 2));
    }
}
