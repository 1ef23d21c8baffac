use std::error::Error;
use std::fmt::{Debug, Display};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The resource a worker exhausts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WorkerKind {
    /// Busy-loops on one core
    Cpu,
    /// Allocates and touches memory
    Memory,
    /// Writes and reads back a temp file
    Disk,
}

impl Display for WorkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerKind::Cpu => write!(f, "CPU"),
            WorkerKind::Memory => write!(f, "RAM"),
            WorkerKind::Disk => write!(f, "Disk"),
        }
    }
}

/// Lifecycle of a single worker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkerStatus {
    /// Worker is burning
    Running,
    /// Worker reached its deadline
    Finished,
}

impl Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerStatus::Running => write!(f, "started"),
            WorkerStatus::Finished => write!(f, "finished"),
        }
    }
}

/// What a worker hands back to the join barrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerReport {
    /// Identifier, 1-based within its kind
    pub id: usize,
    /// Worker kind
    pub kind: WorkerKind,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock finish
    pub finished_at: DateTime<Utc>,
    /// Time spent inside the worker loop
    pub elapsed: Duration,
    /// Completed loop iterations (busy rounds, chunks or disk cycles)
    pub iterations: u64,
    /// I/O failures swallowed by the worker
    pub io_errors: u64,
}

/// Error type for worker operations
#[derive(Debug)]
pub enum WorkerError {
    /// A filesystem operation failed
    Io {
        /// Operation that failed
        op: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// A worker task could not be joined
    Join(String),
}

impl WorkerError {
    /// Wrap an I/O error with the operation and file it came from
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkerError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

impl Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerError::Io { op, path, source } => {
                write!(f, "Failed to {} {}: {}", op, path.display(), source)
            }
            WorkerError::Join(msg) => write!(f, "Join error: {}", msg),
        }
    }
}

impl Error for WorkerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkerError::Io { source, .. } => Some(source),
            WorkerError::Join(_) => None,
        }
    }
}

/// A blocking resource burner.
///
/// Each worker owns all of its state and runs on its own OS thread until
/// its deadline elapses. `run` consumes the worker so nothing it allocated
/// outlives the call.
pub trait Worker: Send + Debug {
    /// Identifier, 1-based within the worker kind
    fn id(&self) -> usize;

    /// Kind of resource this worker burns
    fn kind(&self) -> WorkerKind;

    /// Burn until the deadline, then report
    fn run(self: Box<Self>) -> WorkerReport;
}
