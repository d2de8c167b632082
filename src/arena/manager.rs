//! Simulation lifecycle: spawn, pause, resume, stop
//!
//! The manager owns the roster and the worker threads. It is the only place
//! allowed to mutate the roster structurally, and it only does so while the
//! controller reports a quiescent pause.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::arena::immortal::Immortal;
use crate::arena::report::{ImmortalSnapshot, RunReport};
use crate::arena::roster::Roster;
use crate::arena::scoreboard::ScoreBoard;
use crate::concurrency::PauseController;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;

/// How long `stop` waits for workers to drain before abandoning their
/// threads. Naive-mode runs can deadlock; those threads are leaked rather
/// than waited on forever.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct ArenaManager {
    config: SimulationConfig,
    roster: Arc<Roster>,
    controller: Arc<PauseController>,
    score: Arc<ScoreBoard>,
    handles: Vec<JoinHandle<()>>,
    running: bool,
}

impl ArenaManager {
    /// Build a manager and its population from a validated configuration.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let controller = Arc::new(PauseController::new());
        let score = Arc::new(ScoreBoard::new());
        let immortals = (0..config.count)
            .map(|i| {
                Arc::new(Immortal::new(
                    format!("Immortal-{i}"),
                    config.initial_health,
                    config.damage,
                    config.mode,
                    Arc::clone(&score),
                    Arc::clone(&controller),
                ))
            })
            .collect();

        Ok(Self {
            config,
            roster: Arc::new(Roster::new(immortals)),
            controller,
            score,
            handles: Vec::new(),
            running: false,
        })
    }

    /// Spawn one worker thread per immortal. A manager that is already
    /// running is stopped first.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            self.stop();
        }
        tracing::info!(
            count = self.config.count,
            health = self.config.initial_health,
            damage = self.config.damage,
            mode = %self.config.mode,
            "starting simulation"
        );

        for immortal in self.roster.snapshot() {
            let roster = Arc::clone(&self.roster);
            let handle = std::thread::Builder::new()
                .name(immortal.name().to_string())
                .spawn(move || immortal.run(&roster))?;
            self.handles.push(handle);
        }
        self.running = true;
        Ok(())
    }

    /// Freeze the simulation; returns whether full quiescence was reached
    /// before the controller's bounded wait elapsed. Snapshots taken after a
    /// `true` return are stable until `resume`.
    pub fn pause(&self) -> bool {
        let quiescent = self.controller.request_pause();
        if !quiescent {
            tracing::warn!("pause did not reach quiescence; snapshots may race with fights");
        }
        quiescent
    }

    pub fn resume(&self) {
        self.controller.resume();
    }

    /// Stop every worker and wait (bounded) for them to exit. Wedged
    /// threads, possible under the naive discipline, are abandoned.
    pub fn stop(&mut self) {
        if !self.running && self.handles.is_empty() {
            return;
        }
        self.running = false;
        for immortal in self.roster.snapshot() {
            immortal.stop();
        }
        // Parked workers must wake to observe the stop flag.
        self.controller.resume();

        if self.controller.wait_for_exit(STOP_TIMEOUT) {
            for handle in self.handles.drain(..) {
                let _ = handle.join();
            }
            tracing::info!(fights = self.score.total_fights(), "simulation stopped");
        } else {
            let abandoned = self.handles.len();
            self.handles.clear();
            tracing::warn!(abandoned, "workers did not exit in time; abandoning their threads");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drop dead immortals from the roster. Only honored while paused:
    /// structural mutation during active fighting would race with opponent
    /// sampling.
    pub fn remove_dead(&self) -> usize {
        if self.running && !self.controller.is_paused() {
            tracing::warn!("remove_dead ignored: simulation is not paused");
            return 0;
        }
        self.roster.remove_dead()
    }

    pub fn alive_count(&self) -> usize {
        self.roster.alive_count()
    }

    pub fn total_health(&self) -> u64 {
        self.roster.total_health()
    }

    pub fn total_fights(&self) -> u64 {
        self.score.total_fights()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn controller(&self) -> &PauseController {
        &self.controller
    }

    /// Point-in-time view of the whole population; stable only if taken
    /// while paused and quiescent.
    pub fn report(&self) -> RunReport {
        let immortals: Vec<ImmortalSnapshot> = self
            .roster
            .snapshot()
            .iter()
            .map(|im| ImmortalSnapshot {
                name: im.name().to_string(),
                health: im.health(),
                alive: im.is_alive(),
            })
            .collect();
        RunReport {
            mode: self.config.mode,
            total_fights: self.score.total_fights(),
            total_health: immortals.iter().map(|im| u64::from(im.health)).sum(),
            alive_count: immortals.iter().filter(|im| im.alive).count(),
            immortals,
        }
    }
}

impl Drop for ArenaManager {
    fn drop(&mut self) {
        self.stop();
        self.controller.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FightMode;

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            count: 1,
            ..Default::default()
        };
        assert!(ArenaManager::new(config).is_err());
    }

    #[test]
    fn test_new_manager_is_idle_with_full_population() {
        let manager = ArenaManager::new(SimulationConfig {
            count: 4,
            initial_health: 50,
            damage: 5,
            mode: FightMode::Ordered,
        })
        .unwrap();
        assert!(!manager.is_running());
        assert_eq!(manager.alive_count(), 4);
        assert_eq!(manager.total_health(), 200);
        assert_eq!(manager.total_fights(), 0);
    }
}
