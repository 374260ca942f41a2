//! # Lingo CLI
//!
//! Command line front end for the lingo internationalization service: loads
//! a configuration and a translation directory, then formats one value.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use lingo_config::{apply_overrides, ConfigLoader, IntlConfig};
use lingo_intl::{
    ArgValue, DateOptions, DateStyle, FormatOptions, FormatValue, IntlService,
    IntlServiceBuilder, LocaleArg, NumberOptions, NumberStyle, Numeric, RelativeUnit, TimeStyle,
};
use std::path::PathBuf;
use tracing::debug;

/// Format messages, numbers and dates for a locale
#[derive(Debug, Parser)]
#[command(name = "lingo")]
#[command(version)]
#[command(about = "Format messages, numbers, dates and relative times for any locale")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "LINGO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory of `<locale>.{json,yaml,toml}` translation files
    #[arg(short, long, global = true)]
    pub translations: Option<PathBuf>,

    /// Active locales, most preferred first (comma separated)
    #[arg(short, long, global = true)]
    pub locale: Option<String>,

    /// Development logging: debug level, pretty output, span events
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Format a translated message
    T {
        /// Flattened translation key, e.g. `inbox.count`
        key: String,

        /// Message argument as `name=value`; repeatable
        #[arg(short, long = "arg", value_parser = parse_arg)]
        args: Vec<(String, ArgValue)>,

        /// Pattern used when no locale has the key
        #[arg(long)]
        default: Option<String>,
    },

    /// Check whether a key has a non-empty translation
    Exists { key: String },

    /// Format a number
    Number {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Named number preset
        #[arg(short, long)]
        format: Option<String>,

        #[arg(long, value_enum)]
        style: Option<StyleArg>,

        /// ISO 4217 currency code
        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        max_fraction_digits: Option<usize>,
    },

    /// Format a date; RFC 3339 input, now when omitted
    Date {
        value: Option<String>,

        /// Named date preset
        #[arg(short, long)]
        format: Option<String>,

        /// Append the time of day
        #[arg(long)]
        with_time: bool,

        /// strftime pattern overriding the styles
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Format a time of day; RFC 3339 input, now when omitted
    Time {
        value: Option<String>,

        /// Named time preset
        #[arg(short, long)]
        format: Option<String>,

        /// Use a 24-hour clock
        #[arg(long)]
        h24: bool,
    },

    /// Format an amount of time relative to now
    Relative {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Unit of the amount (second .. year)
        #[arg(short, long, value_parser = parse_unit, default_value = "second")]
        unit: RelativeUnit,

        /// Prefer words like "yesterday" over numbers
        #[arg(long)]
        auto: bool,
    },

    /// List stored and active locales
    Locales,
}

/// Number style selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Decimal,
    Percent,
    Currency,
}

impl From<StyleArg> for NumberStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Decimal => NumberStyle::Decimal,
            StyleArg::Percent => NumberStyle::Percent,
            StyleArg::Currency => NumberStyle::Currency,
        }
    }
}

fn parse_arg(raw: &str) -> Result<(String, ArgValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("argument name is empty in '{raw}'"));
    }
    let value = match value.parse::<f64>() {
        Ok(number) => ArgValue::Number(number),
        Err(_) => ArgValue::String(value.to_string()),
    };
    Ok((name.to_string(), value))
}

fn parse_unit(raw: &str) -> Result<RelativeUnit, String> {
    RelativeUnit::parse(raw).ok_or_else(|| format!("unknown time unit '{raw}'"))
}

/// Resolve the configuration from the config file, environment and flags
pub fn load_config(cli: &Cli) -> Result<IntlConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(path.clone())
            .load()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            let mut config = IntlConfig::default();
            apply_overrides(&mut config, |key| std::env::var(key).ok());
            config
        }
    };

    if let Some(dir) = &cli.translations {
        config.translations_dir = Some(dir.clone());
    }
    if let Some(locale) = &cli.locale {
        config.locales = LocaleArg::from(locale.as_str()).normalized();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Build the service described by `config`
pub fn build_service(config: &IntlConfig) -> Result<IntlService> {
    let service = IntlServiceBuilder::from_config(config)
        .context("Failed to read format presets")?
        .build()
        .context("Failed to start the intl service")?;
    Ok(service)
}

/// Run one command and return its output
pub fn execute(service: &IntlService, command: &Command) -> Result<String> {
    debug!(?command, "Executing command");
    let output = match command {
        Command::T { key, args, default } => {
            let mut options = FormatOptions::new();
            for (name, value) in args {
                options = options.arg(name.clone(), value.clone());
            }
            if let Some(pattern) = default {
                options = options.default_message(pattern.clone());
            }
            service.t(key, &options)?
        }
        Command::Exists { key } => service.exists(key, None)?.to_string(),
        Command::Number {
            value,
            format,
            style,
            currency,
            max_fraction_digits,
        } => {
            let mut options = FormatOptions::new().number(NumberOptions {
                style: style.map(NumberStyle::from),
                currency: currency.clone(),
                maximum_fraction_digits: *max_fraction_digits,
                ..NumberOptions::default()
            });
            options.format = format.clone();
            service.format_number(*value, &options)?
        }
        Command::Date {
            value,
            format,
            with_time,
            pattern,
        } => {
            let mut date = DateOptions {
                pattern: pattern.clone(),
                ..DateOptions::default()
            };
            if *with_time {
                date.date_style = Some(DateStyle::Medium);
                date.time_style = Some(TimeStyle::Short);
            }
            let mut options = FormatOptions::new().date(date);
            options.format = format.clone();
            service.format_date(parse_instant(value.as_deref())?, &options)?
        }
        Command::Time { value, format, h24 } => {
            let mut options = FormatOptions::new().date(DateOptions {
                hour12: h24.then_some(false),
                ..DateOptions::default()
            });
            options.format = format.clone();
            service.format_time(parse_instant(value.as_deref())?, &options)?
        }
        Command::Relative { value, unit, auto } => {
            let mut options = FormatOptions::new().unit(*unit);
            if *auto {
                options.relative.numeric = Some(Numeric::Auto);
            }
            service.format_relative(*value, &options)?
        }
        Command::Locales => format!(
            "available: {}\nactive: {}",
            service.locales().join(", "),
            service.locale().join(", ")
        ),
    };
    Ok(output)
}

fn parse_instant(raw: Option<&str>) -> Result<FormatValue> {
    match raw {
        Some(raw) => {
            let instant = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("Invalid RFC 3339 date-time '{raw}'"))?;
            Ok(instant.into())
        }
        None => Ok(Utc::now().into()),
    }
}
