//! RTL emulator command-line front end.
//!
//! This binary wires the driver library to the process. It performs:
//! 1. **Logging:** Installs a `tracing` subscriber on stderr (`RUST_LOG`, default `warn`).
//! 2. **Parsing:** Splits argv into emulator options, design plus-args, and host arguments.
//! 3. **Run:** Loads the design library, runs the emulation, and exits with its code.

use std::process;

use tracing::error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use rtlemu_core::common::UsageError;
use rtlemu_core::design::LibraryBackend;
use rtlemu_core::options::{HostOptionCatalog, OptionCatalogs, usage};
use rtlemu_core::sim::install_termination_handler;
use rtlemu_core::{EmulatorError, Invocation, Parsed, parse_args, simulate};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let program = argv.first().cloned().unwrap_or_else(|| "emulator".to_string());
    let catalogs = OptionCatalogs::default();
    let logging = init_logging();

    let invocation = match parse_args(argv, &catalogs) {
        Ok(Parsed::Help) => {
            print!("{}", usage(&program, &catalogs.host));
            process::exit(0);
        }
        Ok(Parsed::Run(invocation)) => invocation,
        Err(err) => fail(&program, &catalogs.host, err.into()),
    };

    if invocation.config.verbose {
        raise_to_info(&logging);
    }
    match run(&invocation) {
        Ok(code) => process::exit(code),
        Err(err) => {
            error!(%err, "emulation could not start");
            fail(&program, &catalogs.host, err)
        }
    }
}

fn run(invocation: &Invocation) -> Result<i32, EmulatorError> {
    let mut backend = LibraryBackend::from_config(&invocation.config)?;
    let stop = install_termination_handler()?;
    let report = simulate(&mut backend, invocation, stop)?;
    if let Some(line) = report.diagnostic() {
        eprintln!("{line}");
    }
    Ok(report.exit_code())
}

fn fail(program: &str, host: &HostOptionCatalog, err: EmulatorError) -> ! {
    match &err {
        EmulatorError::Usage(UsageError::NoBinary) => eprintln!("{err}"),
        _ => eprintln!("{program}: {err}"),
    }
    if err.wants_usage() {
        eprint!("{}", usage(program, host));
    }
    process::exit(err.exit_code());
}

/// Installs the stderr subscriber before parsing so option events are visible.
fn init_logging() -> FilterHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (filter, handle) = reload::Layer::new(filter);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
    handle
}

/// `--verbose` lifts the default filter to `info` unless `RUST_LOG` is set.
fn raise_to_info(handle: &FilterHandle) {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        let _ = handle.reload(EnvFilter::new("info"));
    }
}
