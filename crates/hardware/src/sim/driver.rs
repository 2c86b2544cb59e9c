//! Simulation driver.
//!
//! This module runs one emulation from a parsed [`Invocation`] to a
//! [`RunReport`]. It performs:
//! 1. **Construction:** Seeding, model instantiation, optional waveform, debug session.
//! 2. **Reset:** A fixed number of assert / clock low / clock high / deassert iterations.
//! 3. **Cycle Loop:** Full clock cycles until the debug session finishes or the budget runs out.
//! 4. **Verdict:** The process exit code and the pass/fail diagnostic.
//!
//! The driver walks `Unconfigured → Constructed → Resetting → Running →
//! {Completed | TimedOut}`. Running the loop on a driver that has not been
//! reset performs the reset first, so no run skips it.

use std::fmt;

use tracing::{debug, info, warn};

use crate::common::SessionError;
use crate::common::constants::TIMEOUT_EXIT_CODE;
#[cfg(feature = "vcd")]
use crate::common::constants::TRACE_DEPTH;
use crate::config::RunConfig;
use crate::options::Invocation;
use crate::sim::seed::{DriverRng, seed_process_generators};
use crate::sim::state::RunState;
use crate::sim::stop::StopToken;
use crate::sim::traits::{Backend, ClockedModel, DebugSession};
#[cfg(feature = "vcd")]
use crate::trace::TraceSession;

/// Lifecycle phase of a [`Driver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No collaborators exist yet.
    Unconfigured,
    /// Model and debug session constructed.
    Constructed,
    /// Reset sequence in progress.
    Resetting,
    /// Cycle loop in progress.
    Running,
    /// The debug session reported completion.
    Completed,
    /// The cycle budget ran out first.
    TimedOut,
}

impl DriverState {
    /// Returns `true` for `Completed` and `TimedOut`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::TimedOut)
    }
}

/// How a run ended, as seen by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The target finished with exit code 0.
    Passed,
    /// The target reported a nonzero exit code.
    Failed {
        /// Code reported through the debug session.
        code: i32,
    },
    /// The cycle budget was exhausted.
    TimedOut,
}

impl Verdict {
    /// Derives the verdict. A nonzero debug code wins over a timeout.
    pub const fn decide(debug_code: i32, cycles: u64, max_cycles: u64) -> Self {
        if debug_code != 0 {
            Self::Failed { code: debug_code }
        } else if cycles == max_cycles {
            Self::TimedOut
        } else {
            Self::Passed
        }
    }

    /// Returns the process exit code.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::Failed { code } => code,
            Self::TimedOut => TIMEOUT_EXIT_CODE,
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Terminal driver state.
    pub state: DriverState,
    /// Pass/fail classification.
    pub verdict: Verdict,
    /// Cycles executed after reset.
    pub cycles: u64,
    /// Seed the run used.
    pub seed: u32,
    /// Whether a passing run should be announced.
    pub announce_pass: bool,
}

impl RunReport {
    /// Returns the process exit code.
    pub const fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    /// Returns the line to print on stderr, if any.
    pub fn diagnostic(&self) -> Option<String> {
        match self.verdict {
            Verdict::Failed { .. } | Verdict::TimedOut => Some(self.to_string()),
            Verdict::Passed if self.announce_pass => Some(self.to_string()),
            Verdict::Passed => None,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Failed { code } => write!(
                f,
                "*** FAILED *** via dtm (code = {code}, seed {}) after {} cycles",
                self.seed, self.cycles
            ),
            Verdict::TimedOut => write!(
                f,
                "*** FAILED *** via trace_count (timeout, seed {}) after {} cycles",
                self.seed, self.cycles
            ),
            Verdict::Passed => write!(f, "*** PASSED *** Completed after {} cycles", self.cycles),
        }
    }
}

/// Owns the collaborators of one run and steps them through its phases.
///
/// Fields drop in declaration order: waveform, debug session, then model.
pub struct Driver<B: Backend> {
    #[cfg(feature = "vcd")]
    trace: Option<TraceSession>,
    session: B::Session,
    model: B::Model,
    config: RunConfig,
    state: RunState,
    phase: DriverState,
    reset_level: bool,
}

impl<B: Backend> fmt::Debug for Driver<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("phase", &self.phase)
            .field("cycles", &self.state.cycles.get())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Driver<B> {
    /// Builds every collaborator for `invocation`.
    ///
    /// Order: seed the generators, create the model, open the waveform, then
    /// create the debug session. `stop` is polled once per cycle.
    ///
    /// # Errors
    ///
    /// Returns the first [`SessionError`] raised by the backend or the waveform.
    pub fn construct(
        backend: &mut B,
        invocation: &Invocation,
        stop: StopToken,
    ) -> Result<Self, SessionError> {
        let config = invocation.config.clone();
        debug!(phase = ?DriverState::Unconfigured, "driver starting");
        if config.verbose {
            eprintln!("using random seed {}", config.random_seed);
            if let Ok(json) = serde_json::to_string(&config) {
                debug!(config = %json, "run configuration");
            }
        }
        if !config.reset.is_sufficient() {
            warn!(
                cycles = config.reset.cycles,
                "reset sequence is shorter than the design's synchronous reset requirement"
            );
        }

        seed_process_generators(config.random_seed);
        let mut rng = DriverRng::new(config.random_seed);

        let state = RunState::new(config.verbose, stop);
        let mut model = backend.create_model(&config, &invocation.argv, state.cycles.clone())?;
        model.set_printf_enable(false);

        let port = rng.resolve_rbb_port(config.rbb_port);
        if model.set_rbb_port(port) {
            info!(port, "remote bit-bang port");
        } else if config.rbb_port != 0 {
            warn!(port, "design has no remote bit-bang transport; --rbb-port ignored");
        }

        #[cfg(feature = "vcd")]
        let trace = match config.trace_file.as_deref() {
            Some(path) => Some(TraceSession::open(
                path,
                &model,
                TRACE_DEPTH,
                config.trace_start_cycle,
            )?),
            None => None,
        };

        let session = backend.create_session(&config, &invocation.residual)?;
        debug!(binary = invocation.residual.binary(), "debug session constructed");

        Ok(Self {
            #[cfg(feature = "vcd")]
            trace,
            session,
            model,
            config,
            state,
            phase: DriverState::Constructed,
            reset_level: false,
        })
    }

    /// Returns the current phase.
    pub const fn phase(&self) -> DriverState {
        self.phase
    }

    /// Returns the cycles executed since reset.
    pub fn cycles(&self) -> u64 {
        self.state.cycles.get()
    }

    /// Returns the model.
    pub const fn model(&self) -> &B::Model {
        &self.model
    }

    /// Returns the debug session.
    pub const fn session(&self) -> &B::Session {
        &self.session
    }

    /// Runs the reset sequence. Does nothing unless the driver is `Constructed`.
    pub fn reset(&mut self) {
        if self.phase != DriverState::Constructed {
            return;
        }
        self.enter(DriverState::Resetting);
        for _ in 0..self.config.reset.cycles {
            self.drive_reset(true);
            self.half_cycle(false);
            self.half_cycle(true);
            self.drive_reset(false);
        }
        self.state.done_reset = true;
        self.model.set_printf_enable(self.state.verbose);
        info!(cycles = self.config.reset.cycles, "reset complete");
    }

    /// Runs the cycle loop to a terminal phase and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Trace`] if writing the waveform fails.
    pub fn run(&mut self) -> Result<DriverState, SessionError> {
        self.reset();
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }
        self.enter(DriverState::Running);

        let max_cycles = self.config.max_cycles;
        while self.cycles() < max_cycles {
            self.forward_stop();
            if self.state.done_reset && self.session.is_done() {
                self.enter(DriverState::Completed);
                return Ok(self.phase);
            }
            self.half_cycle(false);
            self.half_cycle(true);
            self.dump()?;
            self.state.cycles.advance();
        }
        self.enter(DriverState::TimedOut);
        Ok(self.phase)
    }

    /// Derives the report and releases the collaborators.
    ///
    /// Runs the loop first if it has not reached a terminal phase.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Trace`] if the waveform cannot be written or flushed.
    pub fn finish(mut self) -> Result<RunReport, SessionError> {
        if !self.phase.is_terminal() {
            let _ = self.run()?;
        }
        let cycles = self.cycles();
        let verdict = Verdict::decide(self.session.exit_code(), cycles, self.config.max_cycles);
        let report = RunReport {
            state: self.phase,
            verdict,
            cycles,
            seed: self.config.random_seed,
            announce_pass: self.config.verbose || self.config.print_cycle_count,
        };
        #[cfg(feature = "vcd")]
        if let Some(trace) = self.trace.take() {
            trace.close()?;
        }
        debug!(verdict = ?report.verdict, cycles, "run finished");
        Ok(report)
    }

    fn enter(&mut self, phase: DriverState) {
        debug!(from = ?self.phase, to = ?phase, "driver phase");
        self.phase = phase;
    }

    fn forward_stop(&mut self) {
        if self.state.stop_forwarded || !self.state.stop.is_requested() {
            return;
        }
        info!(cycle = self.cycles(), "termination requested; stopping debug session");
        self.session.request_stop();
        self.state.stop_forwarded = true;
    }

    fn drive_reset(&mut self, level: bool) {
        self.reset_level = level;
        self.model.set_reset(level);
    }

    fn half_cycle(&mut self, clock: bool) {
        self.model.set_clock(clock);
        self.model.eval();
    }

    #[cfg(feature = "vcd")]
    fn dump(&mut self) -> Result<(), SessionError> {
        match self.trace.as_mut() {
            Some(trace) => trace.dump(self.state.cycles.get(), &self.model, true, self.reset_level),
            None => Ok(()),
        }
    }

    #[cfg(not(feature = "vcd"))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    const fn dump(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

/// Constructs, resets, runs, and tears down one emulation.
///
/// # Errors
///
/// Returns a [`SessionError`] if a collaborator cannot be constructed or the
/// waveform cannot be written.
pub fn simulate<B: Backend>(
    backend: &mut B,
    invocation: &Invocation,
    stop: StopToken,
) -> Result<RunReport, SessionError> {
    let mut driver = Driver::construct(backend, invocation, stop)?;
    driver.reset();
    let phase = driver.run()?;
    info!(?phase, cycles = driver.cycles(), "cycle loop ended");
    driver.finish()
}
