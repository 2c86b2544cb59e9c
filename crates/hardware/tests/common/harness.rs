//! Helpers that turn a command line into a finished run.

use rtlemu_core::options::{Invocation, OptionCatalogs, Parsed, parse_args};
use rtlemu_core::sim::{DebugSession, RunReport, StopToken, simulate};
use tracing_subscriber::EnvFilter;

use super::mocks::FakeBackend;

/// Routes library events to the test output; `RUST_LOG` picks the level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Prepends the program name to `args`.
pub fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("emulator")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

/// Parses `args` with the stock catalogs, expecting a run.
pub fn invocation(args: &[&str]) -> Invocation {
    init_logging();
    match parse_args(argv(args), &OptionCatalogs::default()) {
        Ok(Parsed::Run(invocation)) => *invocation,
        other => panic!("expected a run for {args:?}, got {other:?}"),
    }
}

/// Parses `args` and runs them against `backend` with a fresh stop token.
pub fn run<S: DebugSession>(backend: &mut FakeBackend<S>, args: &[&str]) -> RunReport {
    init_logging();
    simulate(backend, &invocation(args), StopToken::new()).unwrap()
}
