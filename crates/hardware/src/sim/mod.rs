//! Simulation driver and its collaborators.
//!
//! This module ties a parsed command line to a running design. It provides:
//! 1. **Traits:** `ClockedModel`, `DebugSession`, and the `Backend` that builds them.
//! 2. **Driver:** The reset sequence, the cycle loop, and the run verdict.
//! 3. **Run State:** The shared cycle counter and the cooperative stop token.
//! 4. **Seeding:** Process-wide and driver-side random generators.

/// Reset sequence, cycle loop, and verdict.
pub mod driver;
/// Random seeding and port assignment.
pub mod seed;
/// Per-run mutable state.
pub mod state;
/// Termination signal handling.
pub mod stop;
/// Collaborator interfaces.
pub mod traits;

pub use driver::{Driver, DriverState, RunReport, Verdict, simulate};
pub use state::{CycleCounter, RunState};
pub use stop::{StopToken, install_termination_handler};
pub use traits::{Backend, ClockedModel, DebugSession, SignalInfo};
