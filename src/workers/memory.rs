use std::time::Duration;

use log::debug;

use crate::core::config::MemoryConfig;
use crate::core::worker::{Worker, WorkerKind, WorkerReport};
use crate::workers::common::{pattern_buffer, BaseWorker};

/// Memory pressure worker.
///
/// Allocates one chunk per interval and writes the byte pattern into every
/// page so the allocation is really committed. Chunks are held until the
/// worker returns.
#[derive(Debug)]
pub struct MemoryWorker {
    id: usize,
    duration: Duration,
    config: MemoryConfig,
}

impl MemoryWorker {
    pub fn new(id: usize, duration: Duration, config: MemoryConfig) -> Self {
        Self {
            id,
            duration,
            config,
        }
    }
}

impl Worker for MemoryWorker {
    fn id(&self) -> usize {
        self.id
    }

    fn kind(&self) -> WorkerKind {
        WorkerKind::Memory
    }

    fn run(self: Box<Self>) -> WorkerReport {
        println!("RAM Burner {} started", self.id);
        let base = BaseWorker::start(self.id, WorkerKind::Memory, self.duration);

        let mut chunks: Vec<Vec<u8>> = Vec::new();
        while !base.deadline().expired() {
            chunks.push(pattern_buffer(self.config.chunk_size));
            debug!(
                "RAM worker {} holding {} bytes",
                self.id,
                chunks.len() * self.config.chunk_size
            );
            std::thread::sleep(self.config.interval);
        }

        println!(
            "RAM Consumer {} finished (allocated {} chunks)",
            self.id,
            chunks.len()
        );
        base.finish(chunks.len() as u64, 0)
    }
}
