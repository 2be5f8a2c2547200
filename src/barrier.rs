//! Reusable rendezvous point for a fixed number of workers.

use crate::error::{Result, SolveError};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

/// Blocks callers until `capacity` of them have arrived, then releases
/// them all together.
///
/// There is no timeout. If fewer than `capacity` workers ever call
/// `arrive_and_wait` for a generation, every caller of that generation
/// waits forever, unless the owner calls `abort`.
#[derive(Debug)]
pub struct Barrier {
    capacity: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl Barrier {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "barrier needs at least one participant");
        Barrier {
            capacity,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                aborted: false,
            }),
            released: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of callers currently waiting in this generation,
    /// always in `[0, capacity)`.
    pub fn arrived(&self) -> usize {
        self.lock().arrived
    }

    /// Number of completed rendezvous.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_aborted(&self) -> bool {
        self.lock().aborted
    }

    /// Wait for the rest of the generation.
    ///
    /// Returns `Ok(true)` for exactly one caller per generation, the one
    /// whose arrival released the others.
    pub fn arrive_and_wait(&self) -> Result<bool> {
        let mut state = self.lock();
        if state.aborted {
            return Err(SolveError::BarrierAborted);
        }

        if state.arrived + 1 == self.capacity {
            // Reset before anyone is released
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            drop(state);
            self.released.notify_all();
            return Ok(true);
        }

        state.arrived += 1;
        let generation = state.generation;
        let state = self
            .released
            .wait_while(state, |s| s.generation == generation && !s.aborted)
            .unwrap_or_else(PoisonError::into_inner);
        if state.generation == generation {
            return Err(SolveError::BarrierAborted);
        }
        Ok(false)
    }

    /// Release every current and future waiter with `BarrierAborted`.
    /// Used when a generation can no longer be completed.
    pub fn abort(&self) {
        let mut state = self.lock();
        state.aborted = true;
        state.arrived = 0;
        drop(state);
        self.released.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Aborts the barrier if the holding thread unwinds, so the other
/// participants do not wait on a worker that will never arrive.
pub struct AbortOnUnwind<'a> {
    barrier: &'a Barrier,
}

impl<'a> AbortOnUnwind<'a> {
    pub fn new(barrier: &'a Barrier) -> Self {
        AbortOnUnwind { barrier }
    }
}

impl Drop for AbortOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.barrier.abort();
        }
    }
}
