//! Pause/resume coordination for a dynamic set of worker threads
//!
//! One controller thread can freeze an arbitrary, changing set of workers and
//! later release them. The pause is a quiescent barrier: `request_pause`
//! blocks (bounded) until every registered worker has parked in
//! `await_if_paused`, so a snapshot taken after a successful pause is stable
//! until `resume`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// How long `request_pause` waits for full quiescence before giving up.
/// Timing out is not an error; the pause flag stays set either way.
const QUIESCENCE_TIMEOUT: Duration = Duration::from_millis(500);

/// What a worker should do after returning from `await_if_paused`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Keep running the fight loop.
    Continue,
    /// The controller is shutting down; unwind and exit.
    Shutdown,
}

#[derive(Debug, Default)]
struct GateState {
    paused: bool,
    shutting_down: bool,
    /// Workers currently registered (between `register` and `unregister`).
    running_count: usize,
    /// Workers currently parked inside `await_if_paused`. Incremented on
    /// park and decremented on wake, so a worker is never counted twice in
    /// one pause and `paused_count <= running_count` always holds.
    paused_count: usize,
}

/// Shared gate between worker threads and one controlling thread.
///
/// State transitions: `Running -> Paused -> Running` repeats freely;
/// `shutdown` is terminal and absorbing - after it, pause and resume have no
/// further effect and `await_if_paused` returns immediately.
#[derive(Debug, Default)]
pub struct PauseController {
    state: Mutex<GateState>,
    /// Workers wait here while paused.
    unpaused: Condvar,
    /// The controller waits here for quiescence; `wait_for_exit` waits here
    /// for the running count to drain.
    all_paused: Condvar,
    // Lock-free mirrors of the flags inside `state`, for fast-path reads.
    paused_flag: AtomicBool,
    shutdown_flag: AtomicBool,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recover the guard even if a worker panicked while holding the lock;
    /// a poisoned gate must not wedge every other worker.
    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called once by a worker before entering its loop.
    pub fn register(&self) {
        let mut state = self.lock_state();
        state.running_count += 1;
    }

    /// Called once by a worker on exit, including abnormal exit.
    pub fn unregister(&self) {
        let mut state = self.lock_state();
        state.running_count = state.running_count.saturating_sub(1);
        // A pending pause may now be quiescent, and `wait_for_exit` may now
        // be satisfied; wake the controller in both cases.
        self.all_paused.notify_all();
    }

    /// Request a pause and wait (bounded) until every registered worker has
    /// parked. Returns whether full quiescence was observed; `false` means
    /// the timeout elapsed first and some worker may still be mid-fight.
    ///
    /// No effect after `shutdown`.
    pub fn request_pause(&self) -> bool {
        let mut state = self.lock_state();
        if state.shutting_down {
            return false;
        }
        state.paused = true;
        self.paused_flag.store(true, Ordering::Release);

        let deadline = Instant::now() + QUIESCENCE_TIMEOUT;
        while state.paused_count < state.running_count && !state.shutting_down {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()).filter(|d| !d.is_zero()) else {
                tracing::warn!(
                    parked = state.paused_count,
                    running = state.running_count,
                    "pause quiescence timed out"
                );
                break;
            };
            let (guard, _timeout) = self
                .all_paused
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
        state.paused_count >= state.running_count
    }

    /// Release every worker parked in `await_if_paused`. No effect after
    /// `shutdown`.
    pub fn resume(&self) {
        let mut state = self.lock_state();
        if state.shutting_down {
            return;
        }
        state.paused = false;
        self.paused_flag.store(false, Ordering::Release);
        self.unpaused.notify_all();
    }

    /// Lock-free read of the pause flag.
    pub fn is_paused(&self) -> bool {
        self.paused_flag.load(Ordering::Acquire)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_flag.load(Ordering::Acquire)
    }

    /// Terminal: force-unpause and release every waiter permanently. After
    /// this, `await_if_paused` always returns `Shutdown` immediately.
    pub fn shutdown(&self) {
        let mut state = self.lock_state();
        state.shutting_down = true;
        state.paused = false;
        self.shutdown_flag.store(true, Ordering::Release);
        self.paused_flag.store(false, Ordering::Release);
        self.unpaused.notify_all();
        self.all_paused.notify_all();
    }

    /// Called by a worker once per loop iteration. Returns immediately when
    /// not paused; otherwise parks until resumed or shut down, re-checking
    /// the predicate on every wake-up (spurious wake-ups and lost-wake
    /// hazards are absorbed by the loop).
    pub fn await_if_paused(&self) -> ControlSignal {
        // Fast path, no lock taken in the common running case.
        if self.shutdown_flag.load(Ordering::Acquire) {
            return ControlSignal::Shutdown;
        }
        if !self.paused_flag.load(Ordering::Acquire) {
            return ControlSignal::Continue;
        }

        let mut state = self.lock_state();
        while state.paused && !state.shutting_down {
            state.paused_count += 1;
            if state.paused_count >= state.running_count {
                self.all_paused.notify_all();
            }
            state = self
                .unpaused
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.paused_count = state.paused_count.saturating_sub(1);
        }
        if state.shutting_down {
            ControlSignal::Shutdown
        } else {
            ControlSignal::Continue
        }
    }

    /// Block until every registered worker has unregistered, or the timeout
    /// elapses. Returns whether the count actually drained; `false` means
    /// some worker is wedged (for example in a naive-mode deadlock) and its
    /// thread should be abandoned rather than joined.
    pub fn wait_for_exit(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock_state();
        while state.running_count > 0 {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()).filter(|d| !d.is_zero()) else {
                break;
            };
            let (guard, _timeout) = self
                .all_paused
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
        state.running_count == 0
    }
}
