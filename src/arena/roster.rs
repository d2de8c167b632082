//! Shared population roster
//!
//! Workers take read locks to sample opponents; structural mutation
//! (removing the dead, rebuilding) happens only from the manager and only
//! while the simulation is paused and quiescent, so readers are never
//! invalidated mid-fight. Dead immortals stay in the roster as tombstones
//! (excluded from selection by `is_alive`) until `remove_dead` compacts.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::arena::immortal::Immortal;

#[derive(Debug, Default)]
pub struct Roster {
    immortals: RwLock<Vec<Arc<Immortal>>>,
}

impl Roster {
    pub fn new(immortals: Vec<Arc<Immortal>>) -> Self {
        Self {
            immortals: RwLock::new(immortals),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<Immortal>>> {
        self.immortals.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cloned view of the current population.
    pub fn snapshot(&self) -> Vec<Arc<Immortal>> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.read().iter().filter(|im| im.is_alive()).count()
    }

    /// Best-effort sum of all health; exact only while paused and quiescent.
    pub fn total_health(&self) -> u64 {
        self.read().iter().map(|im| u64::from(im.health())).sum()
    }

    /// Drop tombstoned (dead) immortals. Caller must hold the simulation
    /// paused; returns how many were removed.
    pub fn remove_dead(&self) -> usize {
        let mut immortals = self
            .immortals
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = immortals.len();
        immortals.retain(|im| im.is_alive());
        before - immortals.len()
    }
}
