//! Serializable snapshots of a simulation run

use serde::{Deserialize, Serialize};

use crate::core::types::FightMode;

/// One immortal's state at snapshot time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmortalSnapshot {
    pub name: String,
    pub health: u32,
    pub alive: bool,
}

/// Point-in-time view of the whole simulation
///
/// Only meaningful when taken while the simulation is paused and quiescent;
/// otherwise the per-actor numbers may race with in-flight fights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: FightMode,
    pub total_fights: u64,
    pub total_health: u64,
    pub alive_count: usize,
    pub immortals: Vec<ImmortalSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_to_json() {
        let report = RunReport {
            mode: FightMode::Ordered,
            total_fights: 3,
            total_health: 215,
            alive_count: 2,
            immortals: vec![ImmortalSnapshot {
                name: "Immortal-0".into(),
                health: 110,
                alive: true,
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"ordered\""));
        assert!(json.contains("\"total_fights\":3"));
    }
}
