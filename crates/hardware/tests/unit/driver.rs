//! # Simulation Driver Tests
//!
//! Reset sequence, cycle budget, verdict priority, stop handling, and the
//! order in which collaborators are built.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pretty_assertions::assert_eq;
use rstest::rstest;
use rtlemu_core::common::SessionError;
use rtlemu_core::sim::{Driver, DriverState, RunReport, StopToken, Verdict, simulate};

use crate::common::harness::{invocation, run};
use crate::common::mocks::{FakeBackend, MockSession, ModelEvent, RecordingModel, ScriptedSession};

const RESET_EVALS: usize = 20;

fn reset_iteration() -> Vec<ModelEvent> {
    vec![
        ModelEvent::Reset(true),
        ModelEvent::Clock(false),
        ModelEvent::Eval,
        ModelEvent::Clock(true),
        ModelEvent::Eval,
        ModelEvent::Reset(false),
    ]
}

#[test]
fn test_reset_runs_ten_iterations_before_first_cycle() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(0, 0));
    let report = run(&mut backend, &["pk"]);

    let log = backend.model.log();
    let expected: Vec<ModelEvent> = std::iter::once(ModelEvent::Printf(false))
        .chain(std::iter::once(ModelEvent::RbbPort(log_port(&log))))
        .chain((0..10).flat_map(|_| reset_iteration()))
        .chain(std::iter::once(ModelEvent::Printf(false)))
        .collect();
    assert_eq!(log, expected);
    assert_eq!(report.cycles, 0);
    assert_eq!(report.state, DriverState::Completed);
}

fn log_port(log: &[ModelEvent]) -> u16 {
    log.iter()
        .find_map(|e| match e {
            ModelEvent::RbbPort(port) => Some(*port),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_verbose_enables_printf_only_after_reset() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(0, 0));
    let _ = run(&mut backend, &["+verbose", "pk"]);
    let log = backend.model.log();
    assert_eq!(log.first(), Some(&ModelEvent::Printf(false)));
    assert_eq!(log.last(), Some(&ModelEvent::Printf(true)));
}

#[test]
fn test_timeout_after_exactly_max_cycles() {
    let mut backend = FakeBackend::new(ScriptedSession::never_finishing());
    let report = run(&mut backend, &["--max-cycles=5", "pk"]);

    assert_eq!(report.cycles, 5);
    assert_eq!(report.verdict, Verdict::TimedOut);
    assert_eq!(report.exit_code(), 2);
    assert_eq!(report.state, DriverState::TimedOut);
    assert_eq!(backend.model.count(ModelEvent::Eval), RESET_EVALS + 10);
    assert_eq!(
        report.diagnostic().unwrap(),
        format!("*** FAILED *** via trace_count (timeout, seed {}) after 5 cycles", report.seed)
    );
}

#[test]
fn test_legacy_max_cycles_times_out_identically() {
    let mut modern = FakeBackend::new(ScriptedSession::never_finishing());
    let mut legacy = FakeBackend::new(ScriptedSession::never_finishing());
    let a = run(&mut modern, &["-s", "1", "--max-cycles=100", "pk"]);
    let b = run(&mut legacy, &["-s", "1", "+max-cycles=100", "pk"]);
    assert_eq!(a, b);
    assert_eq!(a.cycles, 100);
}

#[test]
fn test_zero_budget_still_resets_and_never_polls() {
    let mut session = MockSession::new();
    session.expect_is_done().never();
    session.expect_exit_code().return_const(0);
    let mut backend = FakeBackend::new(session);
    let report = run(&mut backend, &["-m", "0", "pk"]);

    assert_eq!(report.cycles, 0);
    assert_eq!(report.exit_code(), 2);
    assert_eq!(backend.model.count(ModelEvent::Eval), RESET_EVALS);
}

#[test]
fn test_completion_passes_quietly() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(3, 0));
    let report = run(&mut backend, &["pk"]);
    assert_eq!(report.cycles, 3);
    assert_eq!(report.verdict, Verdict::Passed);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.diagnostic(), None);
}

#[rstest]
#[case(&["-c", "pk"])]
#[case(&["-V", "pk"])]
fn test_completion_announced_on_request(#[case] args: &[&str]) {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(3, 0));
    let report = run(&mut backend, args);
    assert_eq!(
        report.diagnostic().as_deref(),
        Some("*** PASSED *** Completed after 3 cycles")
    );
}

#[test]
fn test_target_failure_reports_dtm_code() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(7, 3));
    let report = run(&mut backend, &["--seed=99", "pk"]);
    assert_eq!(report.cycles, 7);
    assert_eq!(report.exit_code(), 3);
    assert_eq!(
        report.diagnostic().unwrap(),
        "*** FAILED *** via dtm (code = 3, seed 99) after 7 cycles"
    );
}

#[test]
fn test_dtm_code_wins_over_timeout() {
    let mut session = MockSession::new();
    session.expect_is_done().return_const(false);
    session.expect_exit_code().return_const(5);
    let mut backend = FakeBackend::new(session);
    let report = run(&mut backend, &["-m", "4", "pk"]);
    assert_eq!(report.state, DriverState::TimedOut);
    assert_eq!(report.verdict, Verdict::Failed { code: 5 });
    assert_eq!(report.exit_code(), 5);
}

#[test]
fn test_stop_request_is_forwarded_once_and_observed() {
    let stopped = Arc::new(AtomicBool::new(false));
    let mut session = MockSession::new();
    let flag = Arc::clone(&stopped);
    session
        .expect_request_stop()
        .times(1)
        .returning(move || flag.store(true, Ordering::SeqCst));
    let flag = Arc::clone(&stopped);
    session
        .expect_is_done()
        .returning(move || flag.load(Ordering::SeqCst));
    session.expect_exit_code().return_const(0);

    let stop = StopToken::new();
    stop.request();
    let mut backend = FakeBackend::new(session);
    let report = simulate(&mut backend, &invocation(&["pk"]), stop).unwrap();
    assert_eq!(report.cycles, 0);
    assert_eq!(report.state, DriverState::Completed);
}

#[test]
fn test_stop_raised_mid_run() {
    let stop = StopToken::new();
    let mut backend = FakeBackend::new(ScriptedSession::never_finishing());
    let inv = invocation(&["-m", "50", "pk"]);
    let mut driver = Driver::construct(&mut backend, &inv, stop.clone()).unwrap();
    driver.reset();
    assert_eq!(driver.phase(), DriverState::Resetting);
    stop.request();
    assert_eq!(driver.run().unwrap(), DriverState::Completed);
    assert_eq!(driver.cycles(), 0);
    assert!(driver.session().polls() >= 1);
}

#[test]
fn test_run_without_reset_still_resets() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(1, 0));
    let inv = invocation(&["pk"]);
    let mut driver = Driver::construct(&mut backend, &inv, StopToken::new()).unwrap();
    assert_eq!(driver.phase(), DriverState::Constructed);
    let _ = driver.run().unwrap();
    assert_eq!(driver.model().count(ModelEvent::Reset(true)), 10);
    let report = driver.finish().unwrap();
    assert_eq!(report.cycles, 1);
}

#[test]
fn test_finish_runs_pending_loop() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(2, 0));
    let inv = invocation(&["pk"]);
    let driver = Driver::construct(&mut backend, &inv, StopToken::new()).unwrap();
    let report = driver.finish().unwrap();
    assert_eq!(report.state, DriverState::Completed);
    assert_eq!(report.cycles, 2);
}

#[test]
fn test_collaborators_receive_their_arguments() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(0, 0));
    let _ = run(&mut backend, &["-c", "+knob=1", "+signature=s.out", "pk", "hello"]);
    assert_eq!(
        backend.argv_seen,
        ["emulator", "-c", "+knob=1", "+signature=s.out", "pk", "hello"]
    );
    let residual = backend.residual_seen.unwrap();
    assert_eq!(residual.as_slice(), ["emulator", "+signature=s.out", "pk", "hello"]);
}

#[test]
fn test_model_failure_aborts_before_session() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(0, 0));
    backend.fail_model = true;
    let err = simulate(&mut backend, &invocation(&["pk"]), StopToken::new()).unwrap_err();
    assert!(matches!(err, SessionError::NullHandle("design model")));
    assert!(backend.residual_seen.is_none());
    assert!(backend.session.is_some());
}

#[test]
fn test_short_reset_is_configurable() {
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(0, 0));
    let mut inv = invocation(&["pk"]);
    inv.config.reset.cycles = 2;
    let _ = simulate(&mut backend, &inv, StopToken::new()).unwrap();
    assert_eq!(backend.model.count(ModelEvent::Reset(true)), 2);
}

#[test]
fn test_rejected_port_does_not_abort() {
    let model = RecordingModel {
        accepts_rbb: false,
        ..RecordingModel::default()
    };
    let mut backend = FakeBackend::new(ScriptedSession::finishing_after(0, 0)).with_model(model);
    let report = run(&mut backend, &["--rbb-port=4444", "pk"]);
    assert_eq!(report.exit_code(), 0);
}

#[rstest]
#[case(0, 10, 100, Verdict::Passed, 0)]
#[case(0, 100, 100, Verdict::TimedOut, 2)]
#[case(7, 100, 100, Verdict::Failed { code: 7 }, 7)]
#[case(-1, 3, 100, Verdict::Failed { code: -1 }, -1)]
fn test_verdict_table(
    #[case] code: i32,
    #[case] cycles: u64,
    #[case] max: u64,
    #[case] verdict: Verdict,
    #[case] exit: i32,
) {
    let decided = Verdict::decide(code, cycles, max);
    assert_eq!(decided, verdict);
    assert_eq!(decided.exit_code(), exit);
}

#[test]
fn test_report_display_matches_diagnostic() {
    let report = RunReport {
        state: DriverState::Completed,
        verdict: Verdict::Passed,
        cycles: 12,
        seed: 1,
        announce_pass: false,
    };
    assert_eq!(report.to_string(), "*** PASSED *** Completed after 12 cycles");
    assert_eq!(report.diagnostic(), None);
}
