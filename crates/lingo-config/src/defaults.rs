//! Default values for configuration and the built-in format presets.

use crate::formats::*;
use crate::schema::IntlConfig;
use lingo_common::LoggingConfig;
use std::collections::HashMap;

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "en-us";

impl Default for IntlConfig {
    fn default() -> Self {
        Self {
            locales: vec![DEFAULT_LOCALE.to_string()],
            default_locale: DEFAULT_LOCALE.to_string(),
            translations_dir: None,
            formats_file: None,
            notification_delay_ms: 0,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for Formats {
    fn default() -> Self {
        let mut date = HashMap::new();
        date.insert("short".to_string(), DateOptions::date(DateStyle::Short));
        date.insert("medium".to_string(), DateOptions::date(DateStyle::Medium));
        date.insert("long".to_string(), DateOptions::date(DateStyle::Long));
        date.insert("full".to_string(), DateOptions::date(DateStyle::Full));

        let mut time = HashMap::new();
        time.insert("short".to_string(), DateOptions::time(TimeStyle::Short));
        time.insert("medium".to_string(), DateOptions::time(TimeStyle::Medium));
        time.insert("long".to_string(), DateOptions::time(TimeStyle::Long));
        time.insert("full".to_string(), DateOptions::time(TimeStyle::Full));

        let mut number = HashMap::new();
        number.insert(
            "decimal".to_string(),
            NumberOptions {
                style: Some(NumberStyle::Decimal),
                ..NumberOptions::default()
            },
        );
        number.insert(
            "integer".to_string(),
            NumberOptions {
                style: Some(NumberStyle::Decimal),
                maximum_fraction_digits: Some(0),
                ..NumberOptions::default()
            },
        );
        number.insert(
            "percent".to_string(),
            NumberOptions {
                style: Some(NumberStyle::Percent),
                ..NumberOptions::default()
            },
        );
        number.insert(
            "currency".to_string(),
            NumberOptions {
                style: Some(NumberStyle::Currency),
                currency: Some("USD".to_string()),
                ..NumberOptions::default()
            },
        );

        let mut relative = HashMap::new();
        relative.insert(
            "numeric".to_string(),
            RelativeOptions {
                numeric: Some(Numeric::Always),
                ..RelativeOptions::default()
            },
        );
        relative.insert(
            "auto".to_string(),
            RelativeOptions {
                numeric: Some(Numeric::Auto),
                ..RelativeOptions::default()
            },
        );

        Self {
            date,
            time,
            number,
            relative,
        }
    }
}
