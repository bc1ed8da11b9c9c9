//! Tests for log file setup.

use super::*;
use serial_test::serial;
use std::fs;

#[test]
fn split_keeps_directory_and_name() {
    let (dir, name) = split_log_path(Path::new("/var/log/scopelog/server.log")).unwrap();
    assert_eq!(dir, PathBuf::from("/var/log/scopelog"));
    assert_eq!(name, "server.log");
}

#[test]
fn bare_file_name_logs_to_working_directory() {
    let (dir, name) = split_log_path(Path::new("scopelog.log")).unwrap();
    assert_eq!(dir, PathBuf::from("."));
    assert_eq!(name, "scopelog.log");
}

#[test]
fn root_path_is_invalid() {
    assert!(matches!(
        init(Path::new("/")),
        Err(LoggingError::InvalidPath(_))
    ));
}

#[test]
fn empty_path_is_invalid() {
    assert!(matches!(
        split_log_path(Path::new("")),
        Err(LoggingError::InvalidPath(_))
    ));
}

#[test]
#[serial(tracing_init)]
fn init_creates_missing_directory() {
    // GIVEN a log path whose directory does not exist
    let test_dir = std::env::temp_dir().join(format!("scopelog_logs_{}", std::process::id()));
    let _ = fs::remove_dir_all(&test_dir);
    let log_file = test_dir.join("nested").join("test.log");

    // WHEN logging is initialized (the subscriber may already be set)
    let _ = init(&log_file);

    // THEN the directory exists regardless
    assert!(test_dir.join("nested").is_dir());

    let _ = fs::remove_dir_all(&test_dir);
}

#[test]
#[serial(tracing_init)]
fn second_init_reports_subscriber_already_set() {
    let test_dir = std::env::temp_dir().join(format!("scopelog_logs_twice_{}", std::process::id()));
    let log_file = test_dir.join("twice.log");

    let _ = init_with_filter(&log_file, "debug");
    let second = init_with_filter(&log_file, "debug");
    assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));

    let _ = fs::remove_dir_all(&test_dir);
}
