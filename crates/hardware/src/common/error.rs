//! Driver Error Definitions.
//!
//! This module defines the error types surfaced by the emulator front end. It provides:
//! 1. **Usage Errors:** Problems with the command line, reported with the usage text.
//! 2. **Session Errors:** Failures while constructing the design, debug, or trace sessions.
//! 3. **Top-Level Errors:** A single type carrying the process exit code for either case.

use std::ffi::NulError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::constants::USAGE_EXIT_CODE;

/// Command-line errors detected before any session is constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// A `-x` or `--xyz` token that names no emulator or host option.
    #[error("unrecognized option '{0}'")]
    UnknownOption(String),

    /// An option that takes a value appeared last on the command line.
    #[error("option '{0}' requires an argument")]
    MissingValue(String),

    /// A flag was given a value with `--flag=value`.
    #[error("option '--{0}' doesn't allow an argument")]
    UnexpectedValue(String),

    /// An option value failed to parse (for example `--max-cycles=ten`).
    #[error("invalid value '{value}' for '{option}': {reason}")]
    InvalidValue {
        /// Long name of the option.
        option: String,
        /// The offending value.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A `+` token that is neither a legacy alias, a design plus-arg, nor a host option.
    #[error("invalid plus-arg (Verilog or HTIF) \"{0}\"")]
    InvalidPlusArg(String),

    /// Option processing finished without leaving a target binary.
    #[error("No binary specified for emulator")]
    NoBinary,
}

/// Failures while bringing up the collaborators of a run.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Neither `--model` nor the environment named a design library.
    #[error("no design library specified (use --model=LIB or set {var})")]
    NoModel {
        /// Environment variable that was consulted.
        var: &'static str,
    },

    /// The shared library could not be opened.
    #[error("failed to load design library {path}: {source}")]
    LibraryLoad {
        /// Library path as given.
        path: PathBuf,
        /// Loader diagnostic.
        source: libloading::Error,
    },

    /// A required C ABI entry point is missing from the library.
    #[error("design library is missing symbol '{symbol}': {source}")]
    MissingSymbol {
        /// Symbol name without the trailing NUL.
        symbol: &'static str,
        /// Loader diagnostic.
        source: libloading::Error,
    },

    /// A constructor in the library returned a null handle.
    #[error("{0} constructor returned a null handle")]
    NullHandle(&'static str),

    /// An argument could not be passed over the C ABI.
    #[error("argument contains an interior NUL byte: {0}")]
    InvalidArgument(#[from] NulError),

    /// The waveform file could not be created or written.
    #[error("waveform output {path}: {source}")]
    Trace {
        /// Output path (`-` for stdout).
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Installing the termination handler failed.
    #[error("failed to install termination handler: {0}")]
    Signal(io::Error),
}

/// Any error that ends the process before a run report exists.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// Bad command line.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Collaborator construction failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl EmulatorError {
    /// Returns the process exit status for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Session(_) => USAGE_EXIT_CODE,
        }
    }

    /// Returns `true` if the usage text should accompany the diagnostic.
    pub const fn wants_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
