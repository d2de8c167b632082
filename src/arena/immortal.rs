//! Immortal actors and the pairwise fight protocol
//!
//! A fight mutates both participants' health under both of their fight
//! locks. Two acquisition disciplines exist: `Ordered` ranks the locks by
//! actor id and cannot deadlock (every thread agrees on the same total
//! order, so no wait cycle can form); `Naive` locks self-then-opponent and
//! deliberately reproduces the classic circular-wait hazard.

use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::arena::roster::Roster;
use crate::arena::scoreboard::ScoreBoard;
use crate::concurrency::{ControlSignal, PauseController};
use crate::core::types::{FightMode, ImmortalId};

/// Breather between fights; bounds CPU use and lets other workers interleave.
const REST_BETWEEN_FIGHTS: Duration = Duration::from_millis(2);

/// One simulated combatant.
///
/// `health` is atomic so that external reads (reporting, roster folds) never
/// block, but it is only ever *mutated* inside `execute_fight` with both
/// participants' fight locks held. Reads taken outside a fight are
/// best-effort snapshots, stable only while the simulation is paused and
/// quiescent.
#[derive(Debug)]
pub struct Immortal {
    id: ImmortalId,
    name: String,
    damage: u32,
    mode: FightMode,
    health: AtomicU32,
    /// Per-actor fight lock; both participants' locks guard a health
    /// transfer. Never taken by readers.
    lock: Mutex<()>,
    /// Monotone: set by the death transition or an external stop request,
    /// never cleared.
    stopped: AtomicBool,
    score: Arc<ScoreBoard>,
    controller: Arc<PauseController>,
}

impl Immortal {
    pub fn new(
        name: impl Into<String>,
        health: u32,
        damage: u32,
        mode: FightMode,
        score: Arc<ScoreBoard>,
        controller: Arc<PauseController>,
    ) -> Self {
        Self {
            id: ImmortalId::next(),
            name: name.into(),
            damage,
            mode,
            health: AtomicU32::new(health),
            lock: Mutex::new(()),
            stopped: AtomicBool::new(false),
            score,
            controller,
        }
    }

    pub fn id(&self) -> ImmortalId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of current health; racy unless the simulation is paused.
    pub fn health(&self) -> u32 {
        self.health.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        !self.stopped.load(Ordering::Acquire) && self.health() > 0
    }

    /// External stop request; the worker observes it on its next iteration.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    fn lock_for_fight(&self) -> MutexGuard<'_, ()> {
        // Fights cannot panic, so poisoning is unreachable in practice;
        // recover rather than propagate a panic into the fight loop.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Worker loop: runs until stopped or the controller shuts down.
    ///
    /// The roster is borrowed rather than owned so that the roster can hold
    /// `Arc<Immortal>` without forming a reference cycle.
    pub fn run(&self, roster: &Roster) {
        self.controller.register();
        let mut rng = rand::thread_rng();
        while !self.stopped.load(Ordering::Acquire) {
            if self.controller.await_if_paused() == ControlSignal::Shutdown {
                break;
            }
            if self.stopped.load(Ordering::Acquire) {
                break;
            }
            if let Some(opponent) = self.pick_opponent(roster, &mut rng) {
                self.fight(&opponent);
            }
            thread::sleep(REST_BETWEEN_FIGHTS);
        }
        self.controller.unregister();
    }

    /// Uniformly sample a distinct, live opponent.
    ///
    /// Bounded at `2 x roster length` attempts so a worker cannot spin
    /// forever when almost everyone is dead; exhaustion is a no-op turn,
    /// not an error.
    pub fn pick_opponent(&self, roster: &Roster, rng: &mut impl Rng) -> Option<Arc<Immortal>> {
        let immortals = roster.read();
        if immortals.len() <= 1 {
            return None;
        }
        let max_attempts = immortals.len() * 2;
        for _ in 0..max_attempts {
            let candidate = &immortals[rng.gen_range(0..immortals.len())];
            if candidate.id != self.id && candidate.is_alive() {
                return Some(Arc::clone(candidate));
            }
        }
        None
    }

    /// Fight one round against `opponent` under this actor's configured
    /// lock discipline.
    pub fn fight(&self, opponent: &Immortal) {
        match self.mode {
            FightMode::Ordered => self.fight_ordered(opponent),
            FightMode::Naive => self.fight_naive(opponent),
        }
    }

    /// Self-then-opponent acquisition. If two actors attack each other at
    /// the same moment, each holds its own lock while waiting for the
    /// other's: a circular wait that can block both threads forever.
    fn fight_naive(&self, opponent: &Immortal) {
        let _mine = self.lock_for_fight();
        let _theirs = opponent.lock_for_fight();
        self.execute_fight(opponent);
    }

    /// Lower id locks first. All threads agree on the order, so no wait
    /// cycle can form regardless of who attacks whom.
    fn fight_ordered(&self, opponent: &Immortal) {
        let (first, second) = if self.id < opponent.id {
            (self, opponent)
        } else {
            (opponent, self)
        };
        let _low = first.lock_for_fight();
        let _high = second.lock_for_fight();
        self.execute_fight(opponent);
    }

    /// The atomic health transfer; caller holds both fight locks.
    ///
    /// Damage is clamped to the defender's remaining health, the attacker
    /// recovers half the damage actually dealt (rounded down), and a
    /// defender reaching zero is stopped permanently.
    fn execute_fight(&self, defender: &Immortal) {
        let defender_health = defender.health.load(Ordering::Acquire);
        if self.health.load(Ordering::Acquire) == 0 || defender_health == 0 {
            // The defender (or we) died in a concurrent interleaving between
            // selection and lock acquisition; the turn is a no-op.
            return;
        }

        let actual_damage = self.damage.min(defender_health);
        defender
            .health
            .store(defender_health - actual_damage, Ordering::Release);
        self.health.fetch_add(actual_damage / 2, Ordering::AcqRel);
        self.score.record_fight();

        if defender_health == actual_damage {
            defender.stopped.store(true, Ordering::Release);
            tracing::debug!(victor = %self.name, fallen = %defender.name, "immortal has fallen");
        }
    }
}
