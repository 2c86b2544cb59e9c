//! Command-line option parsing.
//!
//! The emulator's command line interleaves three option families:
//! 1. **Emulator options:** `-c`, `-m N`, `--seed=N`, ... and their legacy `+` spellings.
//! 2. **Design plus-args:** `+name[=value]` tokens the compiled design reads itself.
//! 3. **Host options:** options of the debug transport's front end, plus the target
//!    binary and its arguments.
//!
//! Parsing walks the tokens left to right. Emulator options are collected and
//! parsed into a [`RunConfig`]; plus-args are kept for the design; the first
//! host option or positional token ends local processing and everything from
//! there on becomes the [`ResidualArgs`]. After a bare `--` the next token is
//! the binary.

/// Emulator option declarations and usage text.
pub mod args;
/// Host and plus-arg catalogs.
pub mod catalog;
/// Per-token classification.
pub mod classify;
/// Residual argument vector.
pub mod residual;

use tracing::debug;

pub use args::{EmulatorArgs, usage};
pub use catalog::{HostOption, HostOptionCatalog, OptionCatalogs, PlusArgCatalog};
pub use classify::{OptionUse, OptionValue, TokenClass};
pub use residual::ResidualArgs;

use crate::common::UsageError;
use crate::config::RunConfig;
use classify::Classifier;

/// Invocation name used when argv is empty.
const DEFAULT_PROGRAM: &str = "emulator";

/// A fully parsed command line ready to drive a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Run configuration.
    pub config: RunConfig,
    /// Arguments for the debug session.
    pub residual: ResidualArgs,
    /// Design plus-args accepted during local processing, in order.
    pub plusargs: Vec<String>,
    /// The complete original argv; the design receives it unchanged.
    pub argv: Vec<String>,
}

/// Result of parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// `-h` / `--help` was seen; print usage and exit successfully.
    Help,
    /// Start a run.
    Run(Box<Invocation>),
}

/// Parses `argv` (program name first).
///
/// # Errors
///
/// Returns a [`UsageError`] for unknown options, missing or malformed
/// values, unmatched plus-args, and command lines without a target binary.
pub fn parse_args<I, S>(argv: I, catalogs: &OptionCatalogs) -> Result<Parsed, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
    let program = argv.first().map_or(DEFAULT_PROGRAM, String::as_str);
    let classifier = Classifier::new(catalogs);

    let mut locals = Vec::new();
    let mut plusargs = Vec::new();
    let mut index = 1;
    let (residual_start, ended) = loop {
        let Some(token) = argv.get(index) else {
            break (argv.len(), false);
        };
        match classifier.classify(token) {
            TokenClass::Emulator(uses) => {
                for use_ in uses {
                    if use_.is_help() {
                        return Ok(Parsed::Help);
                    }
                    let value = match use_.value {
                        OptionValue::Flag => None,
                        OptionValue::Inline(value) => Some(value),
                        OptionValue::FromNext => {
                            index += 1;
                            let next = argv
                                .get(index)
                                .ok_or_else(|| UsageError::MissingValue(use_.long.clone()))?;
                            Some(next.clone())
                        }
                    };
                    locals.push(match value {
                        Some(value) => format!("--{}={value}", use_.long),
                        None => format!("--{}", use_.long),
                    });
                }
            }
            TokenClass::PlusArg { name, value } => {
                debug!(plusarg = %name, value = ?value, "design plus-arg");
                plusargs.push(token.clone());
            }
            TokenClass::HostInterface | TokenClass::Binary => break (index, false),
            TokenClass::EndOfOptions => break (index + 1, true),
            TokenClass::Error(err) => return Err(err),
        }
        index += 1;
    };

    let config = EmulatorArgs::from_tokens(program, &locals)?.into_config();
    let tokens = argv.get(residual_start..).unwrap_or_default().to_vec();
    let residual = if ended {
        ResidualArgs::after_end_of_options(program, tokens)?
    } else {
        ResidualArgs::new(program, tokens, &catalogs.host)?
    };

    Ok(Parsed::Run(Box::new(Invocation {
        config,
        residual,
        plusargs,
        argv,
    })))
}
