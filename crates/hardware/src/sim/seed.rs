//! Random seeding.
//!
//! One seed drives every nondeterministic choice of a run: the C library
//! generators that a linked design or transport may call, and the driver's
//! own `StdRng`. Reusing a seed reproduces the run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::common::constants::{RBB_PORT_MAX, RBB_PORT_MIN};

/// Seeds `rand()` and `drand48()` for code linked into the process.
pub fn seed_process_generators(seed: u32) {
    // SAFETY: plain libc calls with no pointer arguments.
    unsafe {
        libc::srand(seed);
        #[cfg(any(target_os = "linux", target_os = "android"))]
        libc::srand48(seed as libc::c_long);
    }
    debug!(seed, "process generators seeded");
}

/// The driver's generator, seeded from the run seed.
#[derive(Debug, Clone)]
pub struct DriverRng(StdRng);

impl DriverRng {
    /// Creates a generator for `seed`.
    pub fn new(seed: u32) -> Self {
        Self(StdRng::seed_from_u64(u64::from(seed)))
    }

    /// Returns `requested`, or a port drawn from `[1024, 65535]` when it is 0.
    pub fn resolve_rbb_port(&mut self, requested: u16) -> u16 {
        if requested != 0 {
            return requested;
        }
        let port = self.0.gen_range(RBB_PORT_MIN..=RBB_PORT_MAX);
        debug!(port, "remote bit-bang port auto-assigned");
        port
    }
}
