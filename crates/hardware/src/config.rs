//! Configuration for an emulator run.
//!
//! This module defines the configuration record built by the option parser and
//! consumed by the simulation driver. It provides:
//! 1. **Defaults:** Baseline values (unbounded cycle budget, auto-assigned port, reset length).
//! 2. **Structures:** `RunConfig` for one run and `ResetConfig` for the reset sequence.
//! 3. **Seeding:** The time-and-pid default seed used when `--seed` is absent.
//!
//! A `RunConfig` is fully determined before any session is constructed and is
//! never mutated afterwards. It serializes to JSON so verbose runs can log the
//! exact configuration used.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::common::constants::{DEFAULT_RESET_CYCLES, SYNC_RESET_CYCLES, UNBOUNDED_CYCLES};

/// Default configuration constants for a run.
mod defaults {
    use super::{DEFAULT_RESET_CYCLES, UNBOUNDED_CYCLES};

    /// No cycle limit unless `--max-cycles` is given.
    pub const MAX_CYCLES: u64 = UNBOUNDED_CYCLES;

    /// Port 0 asks the driver to pick a remote bit-bang port.
    pub const RBB_PORT: u16 = 0;

    /// Reset iterations before the first counted cycle.
    pub const RESET_CYCLES: u32 = DEFAULT_RESET_CYCLES;
}

/// Returns the seed used when none is given on the command line.
///
/// Mixes the wall-clock seconds with the process id so concurrent runs started
/// in the same second still diverge.
pub fn default_seed() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    (secs as u32) ^ std::process::id()
}

/// Reset sequence parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    /// Number of assert / clock low / clock high / deassert iterations.
    pub cycles: u32,
}

impl ResetConfig {
    /// Returns `true` if the sequence satisfies the harness's minimum
    /// synchronous reset duration.
    pub const fn is_sufficient(&self) -> bool {
        self.cycles >= SYNC_RESET_CYCLES
    }
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            cycles: defaults::RESET_CYCLES,
        }
    }
}

/// Configuration for a single emulator run.
///
/// # Examples
///
/// ```
/// use rtlemu_core::config::RunConfig;
///
/// let json = r#"{ "random_seed": 7, "max_cycles": 500, "verbose": true }"#;
/// let config: RunConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.random_seed, 7);
/// assert!(config.has_cycle_limit());
/// assert_eq!(config.reset.cycles, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed for every random choice made by the design, the debug transport, or the driver.
    pub random_seed: u32,
    /// Cycle budget after reset; `u64::MAX` means no limit.
    pub max_cycles: u64,
    /// Print the cycle count on a successful exit.
    pub print_cycle_count: bool,
    /// Enable design printfs and extra diagnostics.
    pub verbose: bool,
    /// Remote bit-bang port; 0 means auto-assign.
    pub rbb_port: u16,
    /// Waveform output path (`-` for stdout).
    pub trace_file: Option<PathBuf>,
    /// First cycle written to the waveform.
    pub trace_start_cycle: Option<u64>,
    /// Shared library containing the compiled design and its debug transport.
    pub model_library: Option<PathBuf>,
    /// Reset sequence.
    pub reset: ResetConfig,
}

impl RunConfig {
    /// Returns `true` if a finite cycle budget was requested.
    pub const fn has_cycle_limit(&self) -> bool {
        self.max_cycles != UNBOUNDED_CYCLES
    }

    /// Returns `true` if a waveform should be written.
    pub const fn tracing_requested(&self) -> bool {
        self.trace_file.is_some()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            random_seed: default_seed(),
            max_cycles: defaults::MAX_CYCLES,
            print_cycle_count: false,
            verbose: false,
            rbb_port: defaults::RBB_PORT,
            trace_file: None,
            trace_start_cycle: None,
            model_library: None,
            reset: ResetConfig::default(),
        }
    }
}
