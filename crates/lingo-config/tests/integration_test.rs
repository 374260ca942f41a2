//! Integration tests for lingo-config loading.

use lingo_common::test_utils::{create_temp_dir, init_test_logging, write_fixture};
use lingo_config::{
    load_formats, parse_document, ConfigError, ConfigLoader, DateStyle, IntlConfig, NumberStyle,
};

#[test]
fn test_load_toml_config() {
    init_test_logging();
    let dir = create_temp_dir();
    let path = write_fixture(
        dir.path(),
        "intl.toml",
        r#"
locales = ["fr-FR", "en"]
default_locale = "en"
notification_delay_ms = 5

[logging]
level = "debug"
"#,
    );

    let config = ConfigLoader::new(&path).load().unwrap();
    assert_eq!(config.locales, vec!["fr-FR".to_string(), "en".to_string()]);
    assert_eq!(config.default_locale, "en");
    assert_eq!(config.notification_delay_ms, 5);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_yaml_config_with_defaults() {
    init_test_logging();
    let dir = create_temp_dir();
    let path = write_fixture(dir.path(), "intl.yaml", "locales:\n  - de\n");

    let config = ConfigLoader::new(&path).load().unwrap();
    assert_eq!(config.locales, vec!["de".to_string()]);
    assert_eq!(config.default_locale, IntlConfig::default().default_locale);
}

#[test]
fn test_unsupported_extension() {
    let dir = create_temp_dir();
    let path = write_fixture(dir.path(), "intl.ini", "locales = en");

    let err = ConfigLoader::new(&path).load().unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn test_invalid_json_is_reported_with_path() {
    let dir = create_temp_dir();
    let path = write_fixture(dir.path(), "intl.json", "{ not json");

    let err = ConfigLoader::new(&path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
    assert!(err.to_string().contains("intl.json"));
}

#[test]
fn test_validation_runs_on_load() {
    let dir = create_temp_dir();
    let path = write_fixture(dir.path(), "intl.json", r#"{"default_locale": ""}"#);

    let err = ConfigLoader::new(&path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
}

#[test]
fn test_formats_file_replaces_named_sections() {
    let dir = create_temp_dir();
    let formats_path = write_fixture(
        dir.path(),
        "formats.yaml",
        r#"
date:
  birthday:
    date_style: long
number:
  money:
    style: currency
    currency: EUR
    minimum_fraction_digits: 2
"#,
    );

    let config = IntlConfig {
        formats_file: Some(formats_path.clone()),
        ..IntlConfig::default()
    };
    let formats = load_formats(&config).unwrap();

    assert_eq!(
        formats.date_preset("birthday").and_then(|o| o.date_style),
        Some(DateStyle::Long)
    );
    assert!(formats.date_preset("short").is_none());
    let money = formats.number_preset("money").unwrap();
    assert_eq!(money.style, Some(NumberStyle::Currency));
    assert_eq!(money.minimum_fraction_digits, Some(2));
    // sections absent from the file keep the built-in presets
    assert!(formats.time_preset("short").is_some());

    let reparsed: lingo_config::Formats = parse_document(&formats_path).unwrap();
    assert_eq!(reparsed, formats);
}
