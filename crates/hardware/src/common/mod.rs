//! Common types and constants used throughout the emulator driver.
//!
//! This module provides building blocks shared by the option parser, the
//! simulation driver, and the design-library backend. It includes:
//! 1. **Constants:** Exit codes, reset defaults, trace depth, and port range.
//! 2. **Error Handling:** Usage, session, and top-level error types.

/// Driver-wide constants.
pub mod constants;

/// Error types.
pub mod error;

pub use error::{EmulatorError, SessionError, UsageError};
