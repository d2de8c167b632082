//! Property tests for the fight transfer arithmetic

use proptest::prelude::*;
use std::sync::Arc;

use immortal_arena::arena::{Immortal, ScoreBoard};
use immortal_arena::concurrency::PauseController;
use immortal_arena::core::types::FightMode;

fn pair(
    attacker_health: u32,
    defender_health: u32,
    damage: u32,
) -> (Arc<Immortal>, Arc<Immortal>, Arc<ScoreBoard>) {
    let score = Arc::new(ScoreBoard::new());
    let controller = Arc::new(PauseController::new());
    let attacker = Arc::new(Immortal::new(
        "Attacker",
        attacker_health,
        damage,
        FightMode::Ordered,
        Arc::clone(&score),
        Arc::clone(&controller),
    ));
    let defender = Arc::new(Immortal::new(
        "Defender",
        defender_health,
        damage,
        FightMode::Ordered,
        Arc::clone(&score),
        controller,
    ));
    (attacker, defender, score)
}

proptest! {
    /// For actual damage d: defender loses exactly d, attacker regains
    /// exactly floor(d/2), so the population loses ceil(d/2) in total.
    #[test]
    fn fight_conserves_health_transfer(
        attacker_health in 1u32..1000,
        defender_health in 1u32..1000,
        damage in 1u32..100,
    ) {
        let (attacker, defender, score) = pair(attacker_health, defender_health, damage);
        attacker.fight(&defender);

        let d = damage.min(defender_health);
        prop_assert_eq!(defender.health(), defender_health - d);
        prop_assert_eq!(attacker.health(), attacker_health + d / 2);
        prop_assert_eq!(score.total_fights(), 1);

        let before = u64::from(attacker_health) + u64::from(defender_health);
        let after = u64::from(attacker.health()) + u64::from(defender.health());
        prop_assert_eq!(before - after, u64::from(d - d / 2));
        prop_assert!(after <= before);
    }

    /// A defender driven to zero is clamped at exactly zero and leaves the
    /// fight pool for good.
    #[test]
    fn lethal_fights_clamp_and_stop(
        defender_health in 1u32..50,
        damage in 50u32..200,
    ) {
        let (attacker, defender, _score) = pair(100, defender_health, damage);
        attacker.fight(&defender);

        prop_assert_eq!(defender.health(), 0);
        prop_assert!(!defender.is_alive());

        // Repeat fights against the corpse are no-ops in both directions.
        let frozen_attacker = attacker.health();
        attacker.fight(&defender);
        defender.fight(&attacker);
        prop_assert_eq!(attacker.health(), frozen_attacker);
        prop_assert_eq!(defender.health(), 0);
    }
}
