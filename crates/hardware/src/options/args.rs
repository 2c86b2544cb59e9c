//! Emulator option declarations.
//!
//! The emulator's own options are declared once with `clap` derive. The
//! declaration serves three purposes:
//! 1. **Option table:** the classifier asks it which short/long names exist and which take values.
//! 2. **Typed parsing:** normalized `--name=value` tokens are parsed into `EmulatorArgs`.
//! 3. **Usage text:** the help screen is rendered from it, extended with host and legacy options.

use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Args, CommandFactory, Parser};

use super::catalog::HostOptionCatalog;
use crate::common::UsageError;
use crate::common::constants::MODEL_ENV_VAR;
use crate::config::RunConfig;

/// Options owned by the emulator itself.
#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(
    name = "emulator",
    about = "Run a BINARY on the RTL emulator.",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true,
    next_line_help = false,
    help_template = "Usage: {usage}\n{about}\n\nMandatory arguments to long options are mandatory for short options too.\n\nEMULATOR OPTIONS\n{options}{after-help}"
)]
pub struct EmulatorArgs {
    /// Print the cycle count before exiting [+cycle-count]
    #[arg(short = 'c', long)]
    pub cycle_count: bool,

    /// Display this help and exit
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Kill the emulation after CYCLES [+max-cycles=CYCLES]
    #[arg(short = 'm', long, value_name = "CYCLES")]
    pub max_cycles: Option<u64>,

    /// Use random number seed SEED
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u32>,

    /// Use PORT for remote bit bang (with OpenOCD and GDB); chosen from the seed if omitted
    #[arg(short = 'r', long, value_name = "PORT")]
    pub rbb_port: Option<u16>,

    /// Enable all design printfs (cycle-by-cycle info) [+verbose]
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Load the compiled design and debug transport from LIB
    #[arg(short = 'M', long, value_name = "LIB", env = MODEL_ENV_VAR)]
    pub model: Option<PathBuf>,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub trace: TraceArgs,
}

/// Waveform options, present in trace-enabled builds.
#[cfg(feature = "vcd")]
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct TraceArgs {
    /// Write vcd trace to FILE (or '-' for stdout)
    #[arg(short = 'v', long, value_name = "FILE")]
    pub vcd: Option<PathBuf>,

    /// Start VCD tracing at CYCLE [+dump-start=CYCLE]
    #[arg(short = 'x', long, value_name = "CYCLE")]
    pub dump_start: Option<u64>,
}

/// Waveform options, absent in builds without the `vcd` feature.
#[cfg(not(feature = "vcd"))]
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct TraceArgs {}

impl TraceArgs {
    #[cfg(feature = "vcd")]
    fn apply(&self, config: &mut RunConfig) {
        config.trace_file.clone_from(&self.vcd);
        config.trace_start_cycle = self.dump_start;
    }

    #[cfg(not(feature = "vcd"))]
    #[allow(clippy::unused_self)]
    fn apply(&self, _config: &mut RunConfig) {}
}

impl EmulatorArgs {
    /// Parses normalized `--name[=value]` tokens (no positional arguments).
    pub(crate) fn from_tokens(program: &str, tokens: &[String]) -> Result<Self, UsageError> {
        let argv = std::iter::once(program.to_string()).chain(tokens.iter().cloned());
        Self::try_parse_from(argv).map_err(usage_from_clap)
    }

    /// Builds the run configuration these options describe.
    pub fn into_config(self) -> RunConfig {
        let defaults = RunConfig::default();
        let mut config = RunConfig {
            random_seed: self.seed.unwrap_or(defaults.random_seed),
            max_cycles: self.max_cycles.unwrap_or(defaults.max_cycles),
            print_cycle_count: self.cycle_count,
            verbose: self.verbose,
            rbb_port: self.rbb_port.unwrap_or(defaults.rbb_port),
            model_library: self.model,
            ..defaults
        };
        self.trace.apply(&mut config);
        config
    }
}

/// One row of the option table derived from the clap declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionRow {
    pub long: String,
    pub short: Option<char>,
    pub takes_value: bool,
}

/// Lookup table of emulator options by short and long name.
#[derive(Debug, Clone)]
pub(crate) struct OptionTable {
    rows: Vec<OptionRow>,
}

impl OptionTable {
    pub fn from_command() -> Self {
        let command = EmulatorArgs::command();
        let rows = command
            .get_arguments()
            .filter_map(|arg| {
                arg.get_long().map(|long| OptionRow {
                    long: long.to_string(),
                    short: arg.get_short(),
                    takes_value: arg.get_action().takes_values(),
                })
            })
            .collect();
        Self { rows }
    }

    pub fn by_long(&self, name: &str) -> Option<&OptionRow> {
        self.rows.iter().find(|row| row.long == name)
    }

    pub fn by_short(&self, ch: char) -> Option<&OptionRow> {
        self.rows.iter().find(|row| row.short == Some(ch))
    }
}

fn usage_from_clap(err: clap::Error) -> UsageError {
    let context = |kind| match err.get(kind) {
        Some(ContextValue::String(s)) => s.clone(),
        _ => String::new(),
    };
    match err.kind() {
        ErrorKind::UnknownArgument => UsageError::UnknownOption(context(ContextKind::InvalidArg)),
        _ => {
            let reason = std::error::Error::source(&err).map_or_else(
                || err.kind().as_str().unwrap_or("invalid value").to_string(),
                ToString::to_string,
            );
            UsageError::InvalidValue {
                option: context(ContextKind::InvalidArg),
                value: context(ContextKind::InvalidValue),
                reason,
            }
        }
    }
}

/// Renders the usage screen for `program`.
pub fn usage(program: &str, host: &HostOptionCatalog) -> String {
    let mut command = EmulatorArgs::command()
        .bin_name(program)
        .override_usage(format!(
            "{program} [EMULATOR OPTION]... [VERILOG PLUSARG]... [HOST OPTION]... BINARY [TARGET OPTION]..."
        ))
        .after_help(after_help(program, host));
    command.render_help().to_string()
}

fn after_help(program: &str, host: &HostOptionCatalog) -> String {
    let mut text = String::new();
    if !cfg!(feature = "vcd") {
        text.push_str(
            "\nEMULATOR DEBUG OPTIONS (only supported in trace-enabled builds -- rebuild with `--features vcd`)\n  -v, --vcd=FILE           Write vcd trace to FILE (or '-' for stdout)\n  -x, --dump-start=CYCLE   Start VCD tracing at CYCLE\n",
        );
    }
    text.push_str("\nHOST OPTIONS\n");
    for opt in host.options() {
        let spelled = opt
            .value_name
            .map_or_else(|| opt.name.to_string(), |v| format!("{}={v}", opt.name));
        text.push_str(&format!("      --{spelled:<28} {}\n", opt.help));
        text.push_str(&format!("        +{spelled}\n"));
    }
    text.push_str("\nEXAMPLES\n");
    text.push_str(&format!(
        "  - run a bare metal test:\n    {program} $RISCV/riscv64-unknown-elf/share/riscv-tests/isa/rv64ui-p-add\n"
    ));
    text.push_str(&format!(
        "  - run a bare metal test showing cycle-by-cycle information:\n    {program} +verbose $RISCV/riscv64-unknown-elf/share/riscv-tests/isa/rv64ui-p-add 2>&1 | spike-dasm\n"
    ));
    if cfg!(feature = "vcd") {
        text.push_str(&format!(
            "  - run a bare metal test to generate a VCD waveform:\n    {program} -v rv64ui-p-add.vcd $RISCV/riscv64-unknown-elf/share/riscv-tests/isa/rv64ui-p-add\n"
        ));
    }
    text.push_str(&format!(
        "  - run an ELF (you wrote, called 'hello') using the proxy kernel:\n    {program} pk hello\n"
    ));
    text
}
