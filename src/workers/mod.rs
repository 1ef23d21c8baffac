//! Resource burners
//!
//! One module per exhausted resource. Every worker implements
//! [`crate::core::worker::Worker`] and owns all of its state.

pub mod common;
pub mod cpu;
pub mod disk;
pub mod memory;

// Re-export workers for convenience
pub use cpu::CpuWorker;
pub use disk::DiskWorker;
pub use memory::MemoryWorker;
