//! Shared fight counter

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter of completed fights, incremented and read from any
/// number of threads. Reads are eventually-consistent snapshots; the only
/// ordering promise is that a fight's increment happens no earlier than the
/// fight itself.
#[derive(Debug, Default)]
pub struct ScoreBoard {
    fights: AtomicU64,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fight(&self) {
        self.fights.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_fights(&self) -> u64 {
        self.fights.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_increments_all_land() {
        let board = Arc::new(ScoreBoard::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let board = Arc::clone(&board);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        board.record_fight();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(board.total_fights(), 8000);
    }
}
