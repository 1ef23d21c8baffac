use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Size of the buffers allocated by memory workers and written by disk workers
pub const CHUNK_SIZE: usize = 100 * 1024 * 1024;

/// Tokio's default cap on blocking threads
const DEFAULT_BLOCKING_THREADS: usize = 512;

/// Configuration for a full burn run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnerConfig {
    /// Number of CPU workers (one per processing unit by default)
    pub cpu_workers: usize,
    /// Number of memory workers
    pub mem_workers: usize,
    /// Number of disk workers
    pub disk_workers: usize,
    /// How long every worker keeps burning
    pub duration: Duration,
    /// Memory worker settings
    pub memory: MemoryConfig,
    /// Disk worker settings
    pub disk: DiskConfig,
    /// Banter printed before the workers are launched
    pub countdown: CountdownConfig,
}

/// Memory worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Bytes per allocated chunk
    pub chunk_size: usize,
    /// Pause between two allocations
    pub interval: Duration,
}

/// Disk worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Directory holding the per-worker temp files
    pub work_dir: PathBuf,
    /// Size of the buffer written and read back
    pub buffer_size: usize,
    /// Buffer writes per cycle
    pub writes_per_cycle: usize,
    /// Buffer reads per cycle
    pub reads_per_cycle: usize,
}

/// Countdown banter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Dialogue lines, printed one by one
    pub lines: Vec<String>,
    /// Pause after each dialogue line
    pub line_delay: Duration,
    /// Final warning printed right before launch
    pub warning: Vec<String>,
    /// Pause between the warning and the launch
    pub launch_delay: Duration,
}

impl BurnerConfig {
    /// Total number of workers this configuration launches
    pub fn total_workers(&self) -> usize {
        self.cpu_workers + self.mem_workers + self.disk_workers
    }

    /// Blocking pool size that lets every worker run on its own thread at once
    pub fn blocking_threads(&self) -> usize {
        self.total_workers().max(DEFAULT_BLOCKING_THREADS)
    }
}

impl Default for BurnerConfig {
    fn default() -> Self {
        let cpu_workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            cpu_workers,
            mem_workers: 4,
            disk_workers: 20,
            duration: Duration::from_secs(60),
            memory: MemoryConfig::default(),
            disk: DiskConfig::default(),
            countdown: CountdownConfig::default(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            interval: Duration::from_millis(100),
        }
    }
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            buffer_size: CHUNK_SIZE,
            writes_per_cycle: 10,
            reads_per_cycle: 10,
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            lines: vec![
                "+ HELLO ! Are you ready for APOCALYPSE ???".to_string(),
                "- Wait, What ?????".to_string(),
                "+ YEAAAH, You shouldn't run that .exe file :".to_string(),
                "- Okay i regret, STOP it !".to_string(),
                "+ TOO LATE :))) HAHAHAHAHAHAHAHAHAHAAAAAAAAAAAAAAAAAAA".to_string(),
            ],
            line_delay: Duration::from_secs(2),
            warning: vec![
                "ARRRRE YOUUUUUU READYYYYYYYYYYYYY ?\n".to_string(),
                "APOCALYPSE NOW !\n\n\n".to_string(),
            ],
            launch_delay: Duration::from_secs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test the hardcoded defaults
    #[test]
    fn test_default_config() {
        let config = BurnerConfig::default();
        assert!(config.cpu_workers >= 1);
        assert_eq!(config.mem_workers, 4);
        assert_eq!(config.disk_workers, 20);
        assert_eq!(config.duration, Duration::from_secs(60));
        assert_eq!(config.memory.chunk_size, 100 * 1024 * 1024);
        assert_eq!(config.disk.writes_per_cycle, 10);
        assert_eq!(config.countdown.lines.len(), 5);
        assert_eq!(config.total_workers(), config.cpu_workers + 24);
    }

    // Test that the blocking pool never queues workers
    #[test]
    fn test_blocking_threads_cover_all_workers() {
        let mut config = BurnerConfig::default();
        config.cpu_workers = 8;
        assert_eq!(config.blocking_threads(), 512);

        config.cpu_workers = 1024;
        assert_eq!(config.blocking_threads(), 1024 + 24);
    }

    // Test that the config survives a JSON round trip for the debug log
    #[test]
    fn test_config_serializes() {
        let config = BurnerConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["mem_workers"], 4);
        assert_eq!(json["disk"]["reads_per_cycle"], 10);
    }
}
