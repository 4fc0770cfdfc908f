//! Unit tests for drain statistics

use super::stats::DrainStats;
use crate::search::types::DrainReport;

#[test]
fn test_stats_accumulate_across_cycles() {
    let stats = DrainStats::new();
    let failing = DrainReport {
        processed: 3,
        errors: vec!["couldn't index abc".to_string()],
    };

    stats.record(&failing);
    stats.record(&DrainReport::default());

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.total_processed, 3);
    assert_eq!(snapshot.total_failed, 1);
    assert_eq!(snapshot.batch_count, 2);
    assert!(snapshot.last_drain.is_some());
    assert_eq!(snapshot.last_report, Some(DrainReport::default()));
}

#[test]
fn test_fresh_stats_have_no_last_drain() {
    let snapshot = DrainStats::default().snapshot();
    assert_eq!(snapshot.batch_count, 0);
    assert!(snapshot.last_drain.is_none());
    assert!(snapshot.last_report.is_none());
}
