//! Run configuration, the worker contract and the orchestrator that fans
//! workers out and joins them.

pub mod config;
pub mod metrics;
pub mod orchestrator;
pub mod worker;
