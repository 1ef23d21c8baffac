use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::worker::{WorkerKind, WorkerReport};

/// Tally of a finished burn run, built from the worker reports collected
/// at the join barrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of the run
    pub run_id: Uuid,
    /// When the workers were launched
    pub started_at: DateTime<Utc>,
    /// Workers launched
    pub launched: usize,
    /// Workers that reported back
    pub completed: usize,
    /// Completed workers per kind
    pub completed_by_kind: HashMap<WorkerKind, usize>,
    /// Memory chunks held at worker exit, summed
    pub memory_chunks: u64,
    /// Disk write/read cycles, summed
    pub disk_cycles: u64,
    /// Swallowed I/O failures, summed
    pub io_errors: u64,
    /// Time from launch until the barrier released
    pub elapsed: Duration,
}

impl RunSummary {
    /// Aggregate the reports of one run
    pub fn from_reports(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        launched: usize,
        reports: &[WorkerReport],
        elapsed: Duration,
    ) -> Self {
        let mut completed_by_kind = HashMap::new();
        let mut memory_chunks = 0;
        let mut disk_cycles = 0;
        let mut io_errors = 0;

        for report in reports {
            *completed_by_kind.entry(report.kind).or_insert(0) += 1;
            match report.kind {
                WorkerKind::Memory => memory_chunks += report.iterations,
                WorkerKind::Disk => disk_cycles += report.iterations,
                WorkerKind::Cpu => {}
            }
            io_errors += report.io_errors;
        }

        Self {
            run_id,
            started_at,
            launched,
            completed: reports.len(),
            completed_by_kind,
            memory_chunks,
            disk_cycles,
            io_errors,
            elapsed,
        }
    }

    /// Completed workers of one kind
    pub fn completed_of(&self, kind: WorkerKind) -> usize {
        self.completed_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// True when every launched worker reported back
    pub fn all_completed(&self) -> bool {
        self.completed == self.launched
    }

    /// The closing console line
    pub fn completion_line(&self) -> String {
        format!("STRESS TEST COMPLETED in {}", format_elapsed(self.elapsed))
    }
}

/// Render a duration as hours, minutes and fractional seconds, e.g.
/// `1m0.01s`, `2.5s`, `1h0m3s`. Sub-second values use `ms`, `µs` or `ns`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let nanos = elapsed.subsec_nanos() as u64;

    if secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            n if n < 1_000 => format!("{}ns", n),
            n if n < 1_000_000 => format!("{}µs", decimal(n / 1_000, n % 1_000, 3)),
            n => format!("{}ms", decimal(n / 1_000_000, n % 1_000_000, 6)),
        };
    }

    let seconds = decimal(secs % 60, nanos, 9);
    let minutes = secs / 60 % 60;
    let hours = secs / 3600;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// `whole.frac` with `frac` zero-padded to `digits` and trailing zeros cut
fn decimal(whole: u64, frac: u64, digits: usize) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = digits);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: usize, kind: WorkerKind, iterations: u64, io_errors: u64) -> WorkerReport {
        let now = Utc::now();
        WorkerReport {
            id,
            kind,
            started_at: now,
            finished_at: now,
            elapsed: Duration::from_millis(10),
            iterations,
            io_errors,
        }
    }

    // Test aggregation across worker kinds
    #[test]
    fn test_summary_from_reports() {
        let reports = vec![
            report(1, WorkerKind::Cpu, 500, 0),
            report(2, WorkerKind::Cpu, 480, 0),
            report(1, WorkerKind::Memory, 7, 0),
            report(2, WorkerKind::Memory, 6, 0),
            report(1, WorkerKind::Disk, 3, 2),
        ];

        let summary = RunSummary::from_reports(
            Uuid::new_v4(),
            Utc::now(),
            5,
            &reports,
            Duration::from_secs(2),
        );

        assert!(summary.all_completed());
        assert_eq!(summary.completed_of(WorkerKind::Cpu), 2);
        assert_eq!(summary.completed_of(WorkerKind::Memory), 2);
        assert_eq!(summary.completed_of(WorkerKind::Disk), 1);
        assert_eq!(summary.memory_chunks, 13);
        assert_eq!(summary.disk_cycles, 3);
        assert_eq!(summary.io_errors, 2);
        assert_eq!(summary.completion_line(), "STRESS TEST COMPLETED in 2s");
    }

    // Test the hour/minute/second rendering of the completion line
    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(60_010)), "1m0.01s");
        assert_eq!(format_elapsed(Duration::from_millis(2_500)), "2.5s");
        assert_eq!(format_elapsed(Duration::from_secs(3_603)), "1h0m3s");
        assert_eq!(format_elapsed(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format_elapsed(Duration::from_nanos(2_250)), "2.25µs");
        assert_eq!(format_elapsed(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_elapsed(Duration::ZERO), "0s");
        assert_eq!(format_elapsed(Duration::new(1, 7)), "1.000000007s");
    }

    #[test]
    fn test_missing_reports_are_not_complete() {
        let summary = RunSummary::from_reports(
            Uuid::new_v4(),
            Utc::now(),
            3,
            &[report(1, WorkerKind::Cpu, 1, 0)],
            Duration::ZERO,
        );
        assert!(!summary.all_completed());
        assert_eq!(summary.completed_of(WorkerKind::Disk), 0);
    }
}
