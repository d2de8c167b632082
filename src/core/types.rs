//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IMMORTAL_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for immortals.
///
/// Totally ordered and cheap to compare: the ordered fight discipline ranks
/// lock acquisition by this id, so it must never be a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImmortalId(pub u64);

impl ImmortalId {
    /// Allocate the next id from a process-wide counter.
    pub fn next() -> Self {
        Self(NEXT_IMMORTAL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Lock-acquisition discipline used when two immortals fight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FightMode {
    /// Acquire both locks in ascending id order; deadlock-free by construction.
    #[default]
    Ordered,
    /// Acquire self first, then the opponent. Demonstrates the classic
    /// circular-wait hazard and can stall under contention.
    Naive,
}

impl std::str::FromStr for FightMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ordered" => Ok(FightMode::Ordered),
            "naive" => Ok(FightMode::Naive),
            other => Err(format!("unknown fight mode: {other}")),
        }
    }
}

impl std::fmt::Display for FightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FightMode::Ordered => write!(f, "ordered"),
            FightMode::Naive => write!(f, "naive"),
        }
    }
}
