//! Global Driver Constants.
//!
//! This module defines constants shared by the option parser and the simulation driver. It includes:
//! 1. **Exit Codes:** Process exit statuses owned by the driver itself.
//! 2. **Reset Constants:** Default reset duration required by the test harness.
//! 3. **Trace Constants:** Hierarchy depth and top scope used for waveforms.
//! 4. **Port Constants:** Range used when the remote bit-bang port is auto-assigned.

/// Exit code for usage errors and failed session construction.
pub const USAGE_EXIT_CODE: i32 = 1;

/// Exit code when the cycle budget runs out before the debug session finishes.
pub const TIMEOUT_EXIT_CODE: i32 = 2;

/// Sentinel for `max_cycles` meaning "no limit".
pub const UNBOUNDED_CYCLES: u64 = u64::MAX;

/// Synchronous reset must be held for at least this many cycles.
pub const SYNC_RESET_CYCLES: u32 = 10;

/// Number of reset iterations run before the first counted cycle.
pub const DEFAULT_RESET_CYCLES: u32 = 10;

/// Hierarchy depth handed to the waveform writer ("everything").
pub const TRACE_DEPTH: usize = 99;

/// Name of the outermost waveform scope.
pub const TRACE_TOP_SCOPE: &str = "TOP";

/// Lowest port drawn when the remote bit-bang port is auto-assigned.
pub const RBB_PORT_MIN: u16 = 1024;

/// Highest port drawn when the remote bit-bang port is auto-assigned.
pub const RBB_PORT_MAX: u16 = u16::MAX;

/// Environment variable naming the design library when `--model` is absent.
pub const MODEL_ENV_VAR: &str = "RTLEMU_MODEL";
