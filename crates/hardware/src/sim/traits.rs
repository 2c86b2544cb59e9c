//! Collaborator interfaces for the simulation driver.
//!
//! This module defines the capability sets the driver needs from the outside world. It provides:
//! 1. **Clocked Model:** The compiled design (`set_reset`, `set_clock`, `eval`) plus optional extras.
//! 2. **Debug Session:** The host-interface transport (`is_done`, `exit_code`, `request_stop`).
//! 3. **Backend:** A factory that builds both for one run.
//!
//! The driver only ever talks to these traits, so tests drive it with fakes and
//! the binary drives it with a design loaded from a shared library.

use crate::common::SessionError;
use crate::config::RunConfig;
use crate::options::ResidualArgs;
use crate::sim::state::CycleCounter;

/// A signal the model exposes for waveform capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalInfo {
    /// Hierarchical name with `.` separators (e.g. `TestHarness.dut.pc`).
    pub name: String,
    /// Width in bits (1..=64).
    pub width: u32,
}

impl SignalInfo {
    /// Creates a signal description.
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// The compiled design, advanced one half-cycle at a time.
pub trait ClockedModel {
    /// Drives the top-level reset input.
    fn set_reset(&mut self, level: bool);
    /// Drives the top-level clock input.
    fn set_clock(&mut self, level: bool);
    /// Evaluates the design for the current inputs.
    fn eval(&mut self);

    /// Gates the design's printf output (default: ignored).
    fn set_printf_enable(&mut self, _enabled: bool) {}

    /// Hands the remote bit-bang port to the design; returns `false` if the
    /// design has no bit-bang transport (default).
    fn set_rbb_port(&mut self, _port: u16) -> bool {
        false
    }

    /// Returns the signals available for tracing (default: none).
    fn signals(&self) -> Vec<SignalInfo> {
        Vec::new()
    }

    /// Returns the current value of signal `index` from [`Self::signals`].
    fn sample(&self, _index: usize) -> u64 {
        0
    }
}

/// The host-interface session talking to the target program.
pub trait DebugSession {
    /// Returns `true` once the target has finished.
    fn is_done(&self) -> bool;
    /// Returns the exit code the target reported (0 while running or on success).
    fn exit_code(&self) -> i32;
    /// Asks the session to shut down; `is_done` turns `true` once it has.
    fn request_stop(&mut self);
}

/// Builds the collaborators of one run.
pub trait Backend {
    /// Design type produced by this backend.
    type Model: ClockedModel;
    /// Debug session type produced by this backend.
    type Session: DebugSession;

    /// Instantiates the design with the full original argv. `cycles` is the
    /// driver's cycle counter and serves as the design's time stamp.
    fn create_model(
        &mut self,
        config: &RunConfig,
        argv: &[String],
        cycles: CycleCounter,
    ) -> Result<Self::Model, SessionError>;

    /// Instantiates the debug session from the residual arguments.
    fn create_session(
        &mut self,
        config: &RunConfig,
        args: &ResidualArgs,
    ) -> Result<Self::Session, SessionError>;
}
