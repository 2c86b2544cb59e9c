//! # Configuration Tests
//!
//! Defaults, serialization, and derived helpers of `RunConfig`.

use pretty_assertions::assert_eq;
use rtlemu_core::config::*;

#[test]
fn test_run_config_defaults() {
    let config = RunConfig::default();
    assert_eq!(config.max_cycles, u64::MAX);
    assert!(!config.has_cycle_limit());
    assert!(!config.print_cycle_count);
    assert!(!config.verbose);
    assert_eq!(config.rbb_port, 0);
    assert_eq!(config.trace_file, None);
    assert_eq!(config.trace_start_cycle, None);
    assert_eq!(config.model_library, None);
    assert!(!config.tracing_requested());
}

#[test]
fn test_reset_config_defaults() {
    let reset = ResetConfig::default();
    assert_eq!(reset.cycles, 10);
    assert!(reset.is_sufficient());
    assert!(!ResetConfig { cycles: 2 }.is_sufficient());
}

#[test]
fn test_partial_json_fills_defaults() {
    let config: RunConfig =
        serde_json::from_str(r#"{ "random_seed": 3, "reset": { "cycles": 12 } }"#).unwrap();
    assert_eq!(config.random_seed, 3);
    assert_eq!(config.reset.cycles, 12);
    assert_eq!(config.max_cycles, u64::MAX);
}

#[test]
fn test_config_serializes_every_field() {
    let config = RunConfig {
        random_seed: 42,
        max_cycles: 1000,
        trace_file: Some("out.vcd".into()),
        ..RunConfig::default()
    };
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["random_seed"], 42);
    assert_eq!(value["max_cycles"], 1000);
    assert_eq!(value["trace_file"], "out.vcd");
    assert_eq!(value["reset"]["cycles"], 10);
    let back: RunConfig = serde_json::from_value(value).unwrap();
    assert_eq!(back, config);
}
