use std::fs::{self, File};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};

use crate::core::config::DiskConfig;
use crate::core::worker::{Worker, WorkerError, WorkerKind, WorkerReport};
use crate::workers::common::{pattern_buffer, BaseWorker};

/// Disk I/O worker.
///
/// Every cycle rewrites `sorry_<id>.tmp` from scratch and then reads the
/// head of it back several times. The deadline is only checked between
/// cycles, so the file always ends up holding one complete cycle of writes.
/// I/O failures are logged and counted but never stop the worker.
#[derive(Debug)]
pub struct DiskWorker {
    id: usize,
    duration: Duration,
    config: DiskConfig,
}

/// Temp file used by the disk worker with the given id
pub fn temp_file_path(work_dir: &Path, id: usize) -> PathBuf {
    work_dir.join(format!("sorry_{}.tmp", id))
}

impl DiskWorker {
    pub fn new(id: usize, duration: Duration, config: DiskConfig) -> Self {
        Self {
            id,
            duration,
            config,
        }
    }

    /// Path of this worker's temp file
    pub fn path(&self) -> PathBuf {
        temp_file_path(&self.config.work_dir, self.id)
    }

    /// Remove a leftover file from a previous run
    fn remove_stale(path: &Path) -> Result<(), WorkerError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WorkerError::io("remove", path, e)),
        }
    }

    /// Truncate the file and write the buffer `writes_per_cycle` times
    fn write_cycle(&self, path: &Path, data: &[u8]) -> Result<(), WorkerError> {
        let mut file = File::create(path).map_err(|e| WorkerError::io("create", path, e))?;
        for _ in 0..self.config.writes_per_cycle {
            file.write_all(data)
                .map_err(|e| WorkerError::io("write", path, e))?;
        }
        file.flush().map_err(|e| WorkerError::io("flush", path, e))
    }

    /// Read the head of the file `reads_per_cycle` times, rewinding each time
    fn read_cycle(&self, path: &Path, buffer: &mut [u8]) -> Result<usize, WorkerError> {
        let mut file = File::open(path).map_err(|e| WorkerError::io("open", path, e))?;
        let mut total = 0;
        for _ in 0..self.config.reads_per_cycle {
            total += file
                .read(buffer)
                .map_err(|e| WorkerError::io("read", path, e))?;
            file.seek(SeekFrom::Start(0))
                .map_err(|e| WorkerError::io("seek", path, e))?;
        }
        Ok(total)
    }
}

impl Worker for DiskWorker {
    fn id(&self) -> usize {
        self.id
    }

    fn kind(&self) -> WorkerKind {
        WorkerKind::Disk
    }

    fn run(self: Box<Self>) -> WorkerReport {
        println!("Disk Burner {} started", self.id);
        let path = self.path();
        let mut io_errors = 0u64;

        if let Err(e) = Self::remove_stale(&path) {
            warn!("Disk worker {}: {}", self.id, e);
            io_errors += 1;
        }

        let data = pattern_buffer(self.config.buffer_size);
        let mut buffer = vec![0u8; self.config.buffer_size];

        let base = BaseWorker::start(self.id, WorkerKind::Disk, self.duration);
        let mut cycles = 0u64;
        while !base.deadline().expired() {
            if let Err(e) = self.write_cycle(&path, &data) {
                warn!("Disk worker {}: {}", self.id, e);
                io_errors += 1;
            }

            match self.read_cycle(&path, &mut buffer) {
                Ok(read) => debug!("Disk worker {} read {} bytes", self.id, read),
                Err(e) => {
                    warn!("Disk worker {}: {}", self.id, e);
                    io_errors += 1;
                }
            }

            cycles += 1;
        }

        println!("Disk Burner {} finished", self.id);
        base.finish(cycles, io_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(work_dir: &Path) -> DiskConfig {
        DiskConfig {
            work_dir: work_dir.to_path_buf(),
            buffer_size: 4096,
            writes_per_cycle: 3,
            reads_per_cycle: 2,
        }
    }

    #[test]
    fn test_temp_file_name() {
        let path = temp_file_path(Path::new("/tmp/burn"), 12);
        assert_eq!(path, PathBuf::from("/tmp/burn/sorry_12.tmp"));
    }

    // Test that the file holds exactly one full write cycle afterwards
    #[test]
    fn test_final_file_size_matches_one_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let duration = Duration::from_millis(200);

        let report = Box::new(DiskWorker::new(1, duration, config)).run();

        assert_eq!(report.kind, WorkerKind::Disk);
        assert!(report.iterations >= 1);
        assert_eq!(report.io_errors, 0);
        assert!(report.elapsed >= duration);
        assert!(report.elapsed < duration + Duration::from_secs(2));

        let written = fs::read(temp_file_path(dir.path(), 1)).unwrap();
        assert_eq!(written.len(), 4096 * 3);
        assert_eq!(written[4096 + 300], (300 % 256) as u8);
    }

    // Test that a leftover file is removed when the worker starts
    #[test]
    fn test_stale_file_removed_on_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file_path(dir.path(), 5);
        fs::write(&path, b"left over from last time").unwrap();

        let report = Box::new(DiskWorker::new(5, Duration::ZERO, small_config(dir.path()))).run();

        assert_eq!(report.iterations, 0);
        assert!(!path.exists());
    }

    // Test that I/O failures are counted instead of crashing the worker
    #[test]
    fn test_io_errors_are_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let config = small_config(&missing);

        let report = Box::new(DiskWorker::new(2, Duration::from_millis(50), config)).run();

        assert!(report.iterations >= 1);
        // every cycle fails to create and then to open
        assert_eq!(report.io_errors, report.iterations * 2);
    }
}
