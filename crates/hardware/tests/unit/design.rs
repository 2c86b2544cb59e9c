//! # Design Library Tests
//!
//! Failure paths of the shared-library backend that need no real design.

use std::path::Path;

use rtlemu_core::common::SessionError;
use rtlemu_core::config::RunConfig;
use rtlemu_core::design::LibraryBackend;

#[test]
fn test_missing_model_is_reported() {
    let config = RunConfig::default();
    let err = LibraryBackend::from_config(&config).unwrap_err();
    assert!(matches!(err, SessionError::NoModel { var: "RTLEMU_MODEL" }));
}

#[test]
fn test_unloadable_library_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not-a-library.so");
    std::fs::write(&path, b"definitely not ELF").unwrap();
    let err = LibraryBackend::open(&path).unwrap_err();
    match err {
        SessionError::LibraryLoad { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_nonexistent_library_is_reported() {
    let err = LibraryBackend::open(Path::new("/nonexistent/librtlemu-design.so")).unwrap_err();
    assert!(matches!(err, SessionError::LibraryLoad { .. }));
}
