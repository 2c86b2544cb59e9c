//! Mutable per-run driver state.
//!
//! Everything the driver changes while a run is in progress lives here instead
//! of in process-wide globals. The cycle counter is shared (behind an `Arc`)
//! with the design, which reads it as its time stamp.

use std::ffi::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::sim::stop::StopToken;

/// Cycles elapsed since reset completed.
#[derive(Debug, Clone, Default)]
pub struct CycleCounter(Arc<AtomicU64>);

impl CycleCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current cycle.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Advances the counter by one cycle.
    pub fn advance(&self) {
        let _ = self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Opaque context pointer for C callbacks; valid while any clone is alive.
    pub(crate) fn as_context(&self) -> *const c_void {
        Arc::as_ptr(&self.0).cast()
    }
}

/// Reads the cycle counter behind a context pointer from [`CycleCounter::as_context`].
///
/// # Safety
///
/// `ctx` must come from `as_context` on a counter that is still alive.
pub(crate) unsafe extern "C" fn time_stamp_callback(ctx: *const c_void) -> f64 {
    // SAFETY: the caller guarantees `ctx` points at a live counter.
    let counter = unsafe { &*ctx.cast::<AtomicU64>() };
    counter.load(Ordering::Relaxed) as f64
}

/// State threaded through one run.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Post-reset cycle counter.
    pub cycles: CycleCounter,
    /// Set once the reset sequence has finished.
    pub done_reset: bool,
    /// Verbose output requested.
    pub verbose: bool,
    /// Asynchronous stop request.
    pub stop: StopToken,
    /// Whether the stop request has been forwarded to the debug session.
    pub stop_forwarded: bool,
}

impl RunState {
    /// Creates the state for a fresh run.
    pub fn new(verbose: bool, stop: StopToken) -> Self {
        Self {
            cycles: CycleCounter::new(),
            done_reset: false,
            verbose,
            stop,
            stop_forwarded: false,
        }
    }
}
