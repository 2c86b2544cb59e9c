//! # Unit Components
//!
//! Tests grouped by the library area they exercise.

/// Run configuration defaults and serialization.
pub mod config;

/// Design-library backend error paths.
pub mod design;

/// Simulation driver: reset, cycle loop, verdicts, stop requests.
pub mod driver;


/// Option parsing and residual argument handling.
pub mod options;
