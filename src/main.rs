use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use log::{error, info};

mod core;
mod workers;

use crate::core::config::BurnerConfig;
use crate::core::orchestrator::Orchestrator;

/// Exit status used when a worker panicked
const PANIC_EXIT_CODE: i32 = 101;

fn main() {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    info!("Starting system burner...");

    let orchestrator = Orchestrator::new(BurnerConfig::default());
    info!(
        "Run {} will launch {} workers",
        orchestrator.run_id(),
        orchestrator.config().total_workers()
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(orchestrator.config().blocking_threads())
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start the async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = runtime.block_on(AssertUnwindSafe(orchestrator.run()).catch_unwind());

    // Exit without dropping the runtime: its drop would wait for the
    // surviving workers to reach their deadline.
    match outcome {
        Ok(Ok(summary)) => {
            info!("All {} workers completed", summary.completed);
            std::process::exit(0);
        }
        Ok(Err(e)) => {
            error!("Burn run {} failed: {}", orchestrator.run_id(), e);
            std::process::exit(1);
        }
        Err(_) => {
            error!("Burn run {} aborted: a worker panicked", orchestrator.run_id());
            std::process::exit(PANIC_EXIT_CODE);
        }
    }
}
