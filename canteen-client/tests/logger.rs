//! File logging writes into the configured directory

use canteen_client::logger::init_logger;

#[test]
fn test_file_logging_creates_rotating_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    let guard = init_logger("info", false, log_dir.to_str()).unwrap();
    assert!(guard.is_some());

    tracing::info!(canteen_id = "c1", "Canteen selected");
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(&log_dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        files.iter().any(|name| name.starts_with("canteen")),
        "no log file in {files:?}"
    );

    // A second subscriber cannot be installed
    assert!(init_logger("info", false, None).is_err());
}
