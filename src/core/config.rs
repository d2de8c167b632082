//! Simulation configuration with documented constants

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{ArenaError, Result};
use crate::core::types::FightMode;

/// Configuration for one simulation run
///
/// All parameters are fixed at construction; nothing here is mutated while
/// worker threads are running.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of immortals in the population (one worker thread each).
    ///
    /// Can be in the hundreds; every immortal gets its own OS thread, so
    /// very large values are bounded by the platform's thread limits.
    pub count: usize,

    /// Starting health of every immortal.
    pub initial_health: u32,

    /// Fixed damage an immortal attempts per strike.
    ///
    /// The damage actually dealt is clamped to the defender's remaining
    /// health, so health never goes negative.
    pub damage: u32,

    /// Lock-acquisition discipline for fights.
    pub mode: FightMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            count: 8,
            initial_health: 100,
            damage: 10,
            mode: FightMode::Ordered,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SimulationConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot meaningfully run.
    pub fn validate(&self) -> Result<()> {
        if self.count < 2 {
            return Err(ArenaError::InvalidConfig(format!(
                "population needs at least 2 immortals, got {}",
                self.count
            )));
        }
        if self.initial_health == 0 {
            return Err(ArenaError::InvalidConfig(
                "initial_health must be positive".into(),
            ));
        }
        if self.damage == 0 {
            return Err(ArenaError::InvalidConfig("damage must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_population() {
        let config = SimulationConfig {
            count: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_damage() {
        let config = SimulationConfig {
            damage: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parses_toml() {
        let config: SimulationConfig =
            toml::from_str("count = 50\ninitial_health = 200\ndamage = 25\nmode = \"naive\"")
                .unwrap();
        assert_eq!(config.count, 50);
        assert_eq!(config.initial_health, 200);
        assert_eq!(config.damage, 25);
        assert_eq!(config.mode, FightMode::Naive);
    }
}
