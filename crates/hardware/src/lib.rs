//! RTL emulator driver library.
//!
//! This crate launches a compiled hardware design and pumps its clock while a
//! debug transport talks to the host-side test harness. It provides:
//! 1. **Options:** Parsing of emulator options, design plus-args, and host-interface options.
//! 2. **Configuration:** The immutable `RunConfig` of one run.
//! 3. **Simulation:** The reset sequence, the cycle loop, and exit-code derivation.
//! 4. **Trace:** A VCD waveform writer (feature `vcd`).
//! 5. **Design:** A backend that loads a compiled design from a shared library.

/// Common constants and error types.
pub mod common;
/// Run configuration (defaults, reset parameters, seed).
pub mod config;
/// Design libraries opened at run time.
pub mod design;
/// Command-line parsing.
pub mod options;
/// Driver loop and collaborator traits.
pub mod sim;
/// Waveform output.
#[cfg(feature = "vcd")]
pub mod trace;

/// Error surfaced by the front end; carries the process exit code.
pub use crate::common::EmulatorError;
/// Configuration of one run.
pub use crate::config::RunConfig;
/// Parse a command line.
pub use crate::options::{Invocation, Parsed, parse_args};
/// Run one emulation.
pub use crate::sim::{RunReport, simulate};
