//! Installing the development subscriber; runs in its own test binary so the
//! global subscriber is not already taken.

use lingo_common::{init_dev_logging, LogFormat, LoggingConfig, LoggingError};

#[test]
fn test_dev_logging_installs_once() {
    let config = LoggingConfig::development();
    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.include_spans);
    assert!(config.file_path.is_none());

    init_dev_logging().unwrap();
    tracing::debug!("Development logging installed");

    assert!(matches!(init_dev_logging(), Err(LoggingError::Init(_))));
}
