use std::time::Instant;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::BurnerConfig;
use crate::core::metrics::RunSummary;
use crate::core::worker::{Worker, WorkerError, WorkerKind, WorkerReport};
use crate::workers::{CpuWorker, DiskWorker, MemoryWorker};

/// Farewell printed after the completion line
const FAREWELL: &str = "Thank you for your Time, Don't run random .exe files anymore";

/// Launches the fixed fan-out of workers and waits for all of them.
///
/// The orchestrator holds no worker state of its own: every worker gets its
/// identifier and duration at construction and runs on a dedicated blocking
/// thread. The only synchronisation is the join barrier at the end.
#[derive(Debug)]
pub struct Orchestrator {
    /// Identifier of this run
    run_id: Uuid,
    /// Fan-out and worker settings
    config: BurnerConfig,
}

impl Orchestrator {
    /// Create an orchestrator for one run
    pub fn new(config: BurnerConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &BurnerConfig {
        &self.config
    }

    /// Countdown, burn, report
    pub async fn run(&self) -> Result<RunSummary, WorkerError> {
        info!("Starting burn run {}", self.run_id);
        debug!(
            "Run configuration: {}",
            serde_json::to_string(&self.config).unwrap_or_default()
        );

        self.countdown().await;

        let workers = self.build_workers();
        info!(
            "Launching {} CPU, {} memory and {} disk workers for {:?}",
            self.config.cpu_workers,
            self.config.mem_workers,
            self.config.disk_workers,
            self.config.duration
        );
        let summary = self.launch(workers).await?;

        if !summary.all_completed() {
            warn!(
                "Burn run {}: only {} of {} workers reported back",
                self.run_id, summary.completed, summary.launched
            );
        }

        println!("{}", summary.completion_line());
        println!("{}", FAREWELL);
        info!(
            "Burn run {} finished: {}/{} workers ({} CPU, {} RAM, {} disk), {} memory chunks, {} disk cycles, {} io errors",
            self.run_id,
            summary.completed,
            summary.launched,
            summary.completed_of(WorkerKind::Cpu),
            summary.completed_of(WorkerKind::Memory),
            summary.completed_of(WorkerKind::Disk),
            summary.memory_chunks,
            summary.disk_cycles,
            summary.io_errors
        );

        Ok(summary)
    }

    /// Print the banter with its fixed pauses
    pub async fn countdown(&self) {
        let countdown = &self.config.countdown;
        for line in &countdown.lines {
            println!("{}", line);
            tokio::time::sleep(countdown.line_delay).await;
        }
        println!();

        for line in &countdown.warning {
            println!("{}", line);
        }
        tokio::time::sleep(countdown.launch_delay).await;
    }

    /// Build the configured workers, ids starting at 1 within each kind
    pub fn build_workers(&self) -> Vec<Box<dyn Worker>> {
        let config = &self.config;
        let mut workers: Vec<Box<dyn Worker>> = Vec::with_capacity(config.total_workers());

        for id in 1..=config.cpu_workers {
            workers.push(Box::new(CpuWorker::new(id, config.duration)));
        }
        for id in 1..=config.mem_workers {
            workers.push(Box::new(MemoryWorker::new(
                id,
                config.duration,
                config.memory.clone(),
            )));
        }
        for id in 1..=config.disk_workers {
            workers.push(Box::new(DiskWorker::new(
                id,
                config.duration,
                config.disk.clone(),
            )));
        }

        workers
    }

    /// Run every worker on its own thread and block until all have returned.
    ///
    /// Reports are taken in completion order, so the first panicking worker
    /// is re-raised as soon as it dies and takes the caller down with it.
    pub async fn launch(&self, workers: Vec<Box<dyn Worker>>) -> Result<RunSummary, WorkerError> {
        let launched = workers.len();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut handles: FuturesUnordered<_> = workers
            .into_iter()
            .map(|worker| {
                debug!("Spawning {} worker {}", worker.kind(), worker.id());
                tokio::task::spawn_blocking(move || worker.run())
            })
            .collect();

        let mut reports: Vec<WorkerReport> = Vec::with_capacity(launched);
        while let Some(result) = handles.next().await {
            match result {
                Ok(report) => reports.push(report),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => return Err(WorkerError::Join(e.to_string())),
            }
        }

        Ok(RunSummary::from_reports(
            self.run_id,
            started_at,
            launched,
            &reports,
            start.elapsed(),
        ))
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(BurnerConfig::default())
    }
}
