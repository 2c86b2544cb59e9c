//! # Option Parsing Tests
//!
//! Classification of emulator options, legacy plus spellings, design
//! plus-args, and host options, plus the residual argument vector.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use rtlemu_core::common::UsageError;
use rtlemu_core::options::{OptionCatalogs, Parsed, PlusArgCatalog, parse_args, usage};

use crate::common::harness::{argv, invocation};

fn parse_err(args: &[&str]) -> UsageError {
    parse_args(argv(args), &OptionCatalogs::default()).unwrap_err()
}

#[rstest]
#[case(&["--max-cycles=100", "pk"])]
#[case(&["--max-cycles", "100", "pk"])]
#[case(&["-m", "100", "pk"])]
#[case(&["-m100", "pk"])]
#[case(&["+max-cycles=100", "pk"])]
fn test_max_cycles_spellings(#[case] args: &[&str]) {
    assert_eq!(invocation(args).config.max_cycles, 100);
}

#[rstest]
#[case(&["-V", "pk"])]
#[case(&["--verbose", "pk"])]
#[case(&["+verbose", "pk"])]
fn test_verbose_spellings(#[case] args: &[&str]) {
    assert!(invocation(args).config.verbose);
}

#[rstest]
#[case(&["-c", "pk"])]
#[case(&["--cycle-count", "pk"])]
#[case(&["+cycle-count", "pk"])]
fn test_cycle_count_spellings(#[case] args: &[&str]) {
    assert!(invocation(args).config.print_cycle_count);
}

#[test]
fn test_short_cluster() {
    let config = invocation(&["-cVs", "7", "pk"]).config;
    assert!(config.print_cycle_count);
    assert!(config.verbose);
    assert_eq!(config.random_seed, 7);
}

#[test]
fn test_seed_and_port() {
    let config = invocation(&["--seed=12345", "--rbb-port=4444", "pk"]).config;
    assert_eq!(config.random_seed, 12345);
    assert_eq!(config.rbb_port, 4444);
}

#[test]
fn test_last_occurrence_wins() {
    let config = invocation(&["-m", "5", "--max-cycles=9", "pk"]).config;
    assert_eq!(config.max_cycles, 9);
}

#[cfg(feature = "vcd")]
#[test]
fn test_trace_options() {
    let config = invocation(&["-v", "out.vcd", "+dump-start=7", "pk"]).config;
    assert_eq!(config.trace_file, Some("out.vcd".into()));
    assert_eq!(config.trace_start_cycle, Some(7));
}

#[test]
fn test_binary_and_target_args() {
    let inv = invocation(&["-c", "+my_plusarg=1", "pk", "hello", "-x", "--help"]);
    assert_eq!(inv.residual.binary(), "pk");
    assert_eq!(inv.residual.target_args(), ["hello", "-x", "--help"]);
    assert_eq!(inv.residual.program(), "emulator");
    assert!(inv.residual.host_options().is_empty());
    assert_eq!(inv.plusargs, vec!["+my_plusarg=1".to_string()]);
}

#[test]
fn test_design_receives_full_argv() {
    let args = ["-c", "+my_plusarg=1", "pk", "hello"];
    assert_eq!(invocation(&args).argv, argv(&args));
}

#[rstest]
#[case(&["+signature=out.sig", "pk", "hello"], &["+signature=out.sig"])]
#[case(&["--signature", "out.sig", "pk", "hello"], &["--signature", "out.sig"])]
#[case(
    &["--signature=out.sig", "+permissive", "pk", "hello"],
    &["--signature=out.sig", "+permissive"]
)]
fn test_host_options_end_local_processing(#[case] args: &[&str], #[case] host: &[&str]) {
    let inv = invocation(args);
    assert_eq!(inv.residual.host_options(), host);
    assert_eq!(inv.residual.binary(), "pk");
    assert_eq!(inv.residual.target_args(), ["hello"]);
}

#[test]
fn test_emulator_options_after_host_option_are_not_interpreted() {
    let inv = invocation(&["+permissive", "-c", "pk"]);
    assert!(!inv.config.print_cycle_count);
    assert_eq!(inv.residual.host_options(), ["+permissive", "-c"]);
}

#[test]
fn test_double_dash_ends_options() {
    let inv = invocation(&["-V", "--", "pk", "arg"]);
    assert!(inv.config.verbose);
    assert_eq!(inv.residual.as_slice(), ["emulator", "pk", "arg"]);
}

#[rstest]
#[case(&["--", "-weird", "a"], "-weird", &["a"])]
#[case(&["--", "+foo", "pk"], "+foo", &["pk"])]
#[case(&["-c", "--", "--signature", "pk"], "--signature", &["pk"])]
fn test_token_after_double_dash_is_the_binary(
    #[case] args: &[&str],
    #[case] binary: &str,
    #[case] target: &[&str],
) {
    let inv = invocation(args);
    assert_eq!(inv.residual.binary(), binary);
    assert_eq!(inv.residual.target_args(), target);
    assert!(inv.residual.host_options().is_empty());
}

#[test]
fn test_double_dash_binary_needs_no_target_args() {
    let inv = invocation(&["--", "-weird"]);
    assert_eq!(inv.residual.binary(), "-weird");
    assert!(inv.residual.target_args().is_empty());
}

#[test]
fn test_double_dash_alone_still_needs_a_binary() {
    assert!(matches!(parse_err(&["-c", "--"]), UsageError::NoBinary));
}

#[rstest]
#[case(&["--help"])]
#[case(&["-h"])]
#[case(&["-c", "--help", "--bogus"])]
#[case(&["-ch"])]
fn test_help_wins(#[case] args: &[&str]) {
    let parsed = parse_args(argv(args), &OptionCatalogs::default()).unwrap();
    assert_eq!(parsed, Parsed::Help);
}

#[test]
fn test_help_after_binary_belongs_to_target() {
    let inv = invocation(&["pk", "--help"]);
    assert_eq!(inv.residual.target_args(), ["--help"]);
}

#[rstest]
#[case(&["--bogus", "pk"], UsageError::UnknownOption("--bogus".into()))]
#[case(&["-q", "pk"], UsageError::UnknownOption("-q".into()))]
#[case(&["-m"], UsageError::MissingValue("max-cycles".into()))]
#[case(&["--cycle-count=3", "pk"], UsageError::UnexpectedValue("cycle-count".into()))]
#[case(&[], UsageError::NoBinary)]
#[case(&["-c", "+verbose"], UsageError::NoBinary)]
#[case(&["--signature=out.sig"], UsageError::NoBinary)]
fn test_usage_errors(#[case] args: &[&str], #[case] expected: UsageError) {
    assert_eq!(parse_err(args), expected);
}

#[test]
fn test_malformed_value_is_rejected() {
    match parse_err(&["--max-cycles=ten", "pk"]) {
        UsageError::InvalidValue { value, .. } => assert_eq!(value, "ten"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_declared_plusargs_are_strict() {
    let catalogs = OptionCatalogs {
        plusargs: PlusArgCatalog::declared(["uart_tx"]),
        ..OptionCatalogs::default()
    };
    let ok = parse_args(argv(&["+uart_tx=1", "pk"]), &catalogs).unwrap();
    assert!(matches!(ok, Parsed::Run(_)));
    let err = parse_args(argv(&["+nope", "pk"]), &catalogs).unwrap_err();
    assert_eq!(err, UsageError::InvalidPlusArg("+nope".into()));
}

#[test]
fn test_empty_plusarg_is_rejected_even_when_permissive() {
    assert_eq!(parse_err(&["+", "pk"]), UsageError::InvalidPlusArg("+".into()));
}

#[test]
fn test_usage_lists_every_family() {
    let catalogs = OptionCatalogs::default();
    let text = usage("emulator", &catalogs.host);
    assert!(text.contains("BINARY [TARGET OPTION]"));
    assert!(text.contains("--max-cycles"));
    assert!(text.contains("+signature=FILE"));
    assert!(text.contains("EXAMPLES"));
}

fn positional() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_./]{0,16}"
}

proptest! {
    #[test]
    fn prop_binary_and_target_args_pass_through(
        leading in proptest::sample::subsequence(vec!["-c", "-V", "+verbose", "+my_flag"], 0..=4),
        binary in positional(),
        target in proptest::collection::vec("[ -~]{0,12}", 0..6),
    ) {
        let mut args: Vec<&str> = leading.clone();
        args.push(&binary);
        args.extend(target.iter().map(String::as_str));
        let inv = invocation(&args);
        prop_assert_eq!(inv.residual.binary(), binary.as_str());
        prop_assert_eq!(inv.residual.target_args(), target.as_slice());
    }

    #[test]
    fn prop_no_positional_means_no_binary(
        flags in proptest::collection::vec(
            proptest::sample::select(
                vec!["-c", "-V", "--verbose", "+cycle-count", "+design_knob=3"],
            ),
            0..8,
        ),
    ) {
        let err = parse_args(argv(&flags), &OptionCatalogs::default()).unwrap_err();
        prop_assert_eq!(err, UsageError::NoBinary);
    }
}
