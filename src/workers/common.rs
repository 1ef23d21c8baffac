use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::debug;

use crate::core::worker::{WorkerKind, WorkerReport, WorkerStatus};

/// Wall-clock window a worker is allowed to burn in
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    duration: Duration,
}

impl Deadline {
    /// Start a new window of the given length now
    pub fn start(duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            duration,
        }
    }

    /// True once the window has elapsed
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.duration
    }

    /// Time since the window started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Bookkeeping shared by every worker kind: console lines, timestamps and
/// the final report.
#[derive(Debug)]
pub struct BaseWorker {
    /// Worker identifier
    pub id: usize,
    /// Worker kind
    pub kind: WorkerKind,
    /// Current status
    pub status: WorkerStatus,
    /// Wall-clock start
    started_at: DateTime<Utc>,
    /// Burn window
    deadline: Deadline,
}

impl BaseWorker {
    /// Mark the worker as running and start its deadline
    pub fn start(id: usize, kind: WorkerKind, duration: Duration) -> Self {
        debug!("{} worker {} running for {:?}", kind, id, duration);
        Self {
            id,
            kind,
            status: WorkerStatus::Running,
            started_at: Utc::now(),
            deadline: Deadline::start(duration),
        }
    }

    /// The burn window of this worker
    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Close the worker and build its report
    pub fn finish(mut self, iterations: u64, io_errors: u64) -> WorkerReport {
        self.status = WorkerStatus::Finished;
        let elapsed = self.deadline.elapsed();
        debug!(
            "{} worker {} {} after {:?} ({} iterations, {} io errors)",
            self.kind, self.id, self.status, elapsed, iterations, io_errors
        );

        WorkerReport {
            id: self.id,
            kind: self.kind,
            started_at: self.started_at,
            finished_at: Utc::now(),
            elapsed,
            iterations,
            io_errors,
        }
    }
}

/// Fill a buffer with the repeating 0..=255 byte pattern
pub fn fill_pattern(buf: &mut [u8]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = (i % 256) as u8;
    }
}

/// Allocate a buffer of `size` bytes carrying the byte pattern
pub fn pattern_buffer(size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    fill_pattern(&mut buf);
    buf
}
