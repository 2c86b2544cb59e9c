//! Shared test infrastructure.

/// Command-line and run helpers.
pub mod harness;
