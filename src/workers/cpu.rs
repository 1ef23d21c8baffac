use std::hint::black_box;
use std::time::Duration;

use crate::core::worker::{Worker, WorkerKind, WorkerReport};
use crate::workers::common::BaseWorker;

/// Multiplications per deadline check
const ROUND_SIZE: u64 = 1_000_000;

/// Keeps one core busy with pointless arithmetic until its deadline
#[derive(Debug)]
pub struct CpuWorker {
    id: usize,
    duration: Duration,
}

impl CpuWorker {
    pub fn new(id: usize, duration: Duration) -> Self {
        Self { id, duration }
    }
}

/// One busy round. `black_box` keeps the optimizer from folding it away.
fn burn_round() {
    for i in 0..ROUND_SIZE {
        black_box(i.wrapping_mul(i).wrapping_mul(i));
    }
}

impl Worker for CpuWorker {
    fn id(&self) -> usize {
        self.id
    }

    fn kind(&self) -> WorkerKind {
        WorkerKind::Cpu
    }

    fn run(self: Box<Self>) -> WorkerReport {
        println!("CPU Burner {} started on core", self.id);
        let base = BaseWorker::start(self.id, WorkerKind::Cpu, self.duration);

        let mut rounds = 0u64;
        while !base.deadline().expired() {
            burn_round();
            rounds += 1;
        }

        println!("CPU Burner {} finished", self.id);
        base.finish(rounds, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the worker honours its deadline with a bounded overrun
    #[test]
    fn test_cpu_worker_stops_at_deadline() {
        let duration = Duration::from_millis(200);
        let report = Box::new(CpuWorker::new(1, duration)).run();

        assert_eq!(report.kind, WorkerKind::Cpu);
        assert_eq!(report.id, 1);
        assert!(report.elapsed >= duration);
        assert!(report.elapsed < duration + Duration::from_secs(1));
        assert!(report.iterations >= 1);
        assert_eq!(report.io_errors, 0);
    }

    #[test]
    fn test_cpu_worker_zero_duration() {
        let report = Box::new(CpuWorker::new(2, Duration::ZERO)).run();
        assert_eq!(report.iterations, 0);
    }
}
