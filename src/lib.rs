//! Immortal Arena - Concurrent Fight Simulation

pub mod arena;
pub mod concurrency;
pub mod core;
