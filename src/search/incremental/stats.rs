//! Running totals over drain cycles

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::search::types::DrainReport;

/// Totals folded from every [`DrainReport`], plus the latest report itself
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrainStatsSnapshot {
    pub batch_count: usize,
    pub total_processed: usize,
    pub total_failed: usize,
    pub last_drain: Option<DateTime<Utc>>,
    pub last_report: Option<DrainReport>,
}

impl DrainStatsSnapshot {
    fn fold(&mut self, report: &DrainReport) {
        self.batch_count += 1;
        self.total_processed += report.processed;
        self.total_failed += report.errors.len();
        self.last_drain = Some(Utc::now());
        self.last_report = Some(report.clone());
    }
}

/// Shared drain statistics, updated once per cycle
#[derive(Debug, Default)]
pub struct DrainStats {
    totals: Mutex<DrainStatsSnapshot>,
}

impl DrainStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, report: &DrainReport) {
        self.totals.lock().fold(report);
    }

    #[must_use]
    pub fn snapshot(&self) -> DrainStatsSnapshot {
        self.totals.lock().clone()
    }
}
