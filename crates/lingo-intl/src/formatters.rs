//! Built-in formatter implementations, one per [`FormatKind`]

use crate::engine::{EngineIssue, FluentEngine};
use crate::error::IntlResult;
use crate::format::{FormatKind, FormatOptions, FormatValue, Formatter};
use crate::locale_data::{
    currency_after_amount, currency_symbol, number_separators, LocaleData,
};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use lingo_config::{
    DateOptions, DateStyle, Formats, NumberOptions, NumberStyle, Numeric, RelativeOptions,
    RelativeUnit, TimeStyle,
};
use std::fmt::Write;

pub(crate) struct MessageFormatter;
pub(crate) struct DateFormatter;
pub(crate) struct TimeFormatter;
pub(crate) struct NumberFormatter;
pub(crate) struct RelativeTimeFormatter;

impl Formatter for MessageFormatter {
    fn format(
        &self,
        engine: &FluentEngine,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        match value {
            FormatValue::Message { id, pattern } => {
                engine.format_message(id, pattern.as_deref(), &options.args)
            }
            other => invalid_value(engine, FormatKind::Message, other),
        }
    }
}

impl Formatter for DateFormatter {
    fn format(
        &self,
        engine: &FluentEngine,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        let FormatValue::DateTime(instant) = value else {
            return invalid_value(engine, FormatKind::Date, value);
        };
        let preset = preset(engine, FormatKind::Date, options, Formats::date_preset)?;
        let mut resolved = options.date.or(&preset);
        if resolved.date_style.is_none() && resolved.time_style.is_none() {
            resolved.date_style = Some(DateStyle::Medium);
        }
        format_instant(engine, FormatKind::Date, instant, &resolved)
    }
}

impl Formatter for TimeFormatter {
    fn format(
        &self,
        engine: &FluentEngine,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        let FormatValue::DateTime(instant) = value else {
            return invalid_value(engine, FormatKind::Time, value);
        };
        let preset = preset(engine, FormatKind::Time, options, Formats::time_preset)?;
        let mut resolved = options.date.or(&preset);
        if resolved.date_style.is_none() && resolved.time_style.is_none() {
            resolved.time_style = Some(TimeStyle::Short);
        }
        format_instant(engine, FormatKind::Time, instant, &resolved)
    }
}

impl Formatter for NumberFormatter {
    fn format(
        &self,
        engine: &FluentEngine,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        let FormatValue::Number(number) = value else {
            return invalid_value(engine, FormatKind::Number, value);
        };
        let preset = preset(engine, FormatKind::Number, options, Formats::number_preset)?;
        let resolved = options.number.or(&preset);
        format_number(engine, *number, &resolved)
    }
}

impl Formatter for RelativeTimeFormatter {
    fn format(
        &self,
        engine: &FluentEngine,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        let FormatValue::Number(amount) = value else {
            return invalid_value(engine, FormatKind::Relative, value);
        };
        if !amount.is_finite() {
            engine.report(&EngineIssue::InvalidValue {
                kind: FormatKind::Relative,
                message: format!("relative amount must be finite, got {amount}"),
            })?;
        }
        let preset = preset(engine, FormatKind::Relative, options, Formats::relative_preset)?;
        let resolved = options.relative.or(&preset);
        Ok(format_relative(engine, *amount, &resolved))
    }
}

fn invalid_value(engine: &FluentEngine, kind: FormatKind, value: &FormatValue) -> IntlResult<String> {
    engine.report(&EngineIssue::InvalidValue {
        kind,
        message: format!("cannot format {}", value.describe()),
    })?;
    Ok(String::new())
}

/// Resolve the named preset from the engine's formats, then its defaults.
///
/// An unknown name is reported; if the handler swallows it the call proceeds
/// with an empty preset.
fn preset<T: Clone + Default>(
    engine: &FluentEngine,
    kind: FormatKind,
    options: &FormatOptions,
    lookup: for<'a> fn(&'a Formats, &str) -> Option<&'a T>,
) -> IntlResult<T> {
    let Some(name) = options.format.as_deref() else {
        return Ok(T::default());
    };
    if let Some(found) =
        lookup(engine.formats(), name).or_else(|| lookup(engine.default_formats(), name))
    {
        return Ok(found.clone());
    }
    engine.report(&EngineIssue::UnknownFormat {
        kind,
        name: name.to_string(),
    })?;
    Ok(T::default())
}

fn format_instant(
    engine: &FluentEngine,
    kind: FormatKind,
    instant: &DateTime<FixedOffset>,
    options: &DateOptions,
) -> IntlResult<String> {
    if let Some(pattern) = options.pattern.as_deref() {
        let mut out = String::new();
        if write!(out, "{}", instant.format(pattern)).is_err() {
            engine.report(&EngineIssue::InvalidValue {
                kind,
                message: format!("invalid date pattern \"{pattern}\""),
            })?;
            return Ok(instant.to_rfc3339());
        }
        return Ok(out);
    }

    let data = engine.locale_data();
    let hour12 = options.hour12.unwrap_or(data.hour12);
    let date = options.date_style.map(|style| render_date(instant, style, data));
    let time = options
        .time_style
        .map(|style| render_time(instant, style, hour12));

    Ok(match (date, time) {
        (Some(date), Some(time)) => format!("{date}, {time}"),
        (Some(date), None) => date,
        (None, Some(time)) => time,
        (None, None) => String::new(),
    })
}

fn render_date(instant: &DateTime<FixedOffset>, style: DateStyle, data: &LocaleData) -> String {
    let template = match style {
        DateStyle::Full => data.date_full,
        DateStyle::Long => data.date_long,
        DateStyle::Medium => data.date_medium,
        DateStyle::Short => data.date_short,
    };
    let month = instant.month0() as usize;
    let year = instant.year();
    template
        .replace("{EEEE}", data.weekdays[instant.weekday().num_days_from_monday() as usize])
        .replace("{MMMM}", data.months_long[month])
        .replace("{MMM}", data.months_short[month])
        .replace("{MM}", &format!("{:02}", instant.month()))
        .replace("{M}", &instant.month().to_string())
        .replace("{dd}", &format!("{:02}", instant.day()))
        .replace("{d}", &instant.day().to_string())
        .replace("{yy}", &format!("{:02}", year.rem_euclid(100)))
        .replace("{y}", &year.to_string())
}

fn render_time(instant: &DateTime<FixedOffset>, style: TimeStyle, hour12: bool) -> String {
    let mut out = if hour12 {
        let (_, hour) = instant.hour12();
        format!("{hour}:{:02}", instant.minute())
    } else {
        format!("{:02}:{:02}", instant.hour(), instant.minute())
    };
    if style != TimeStyle::Short {
        out.push_str(&format!(":{:02}", instant.second()));
    }
    if hour12 {
        let (is_pm, _) = instant.hour12();
        out.push_str(if is_pm { " PM" } else { " AM" });
    }
    if matches!(style, TimeStyle::Long | TimeStyle::Full) {
        out.push_str(&format!(" {}", instant.format("%:z")));
    }
    out
}

fn format_number(engine: &FluentEngine, value: f64, options: &NumberOptions) -> IntlResult<String> {
    let language = engine.language();
    let grouping = options.use_grouping.unwrap_or(true);

    match options.style.unwrap_or(NumberStyle::Decimal) {
        NumberStyle::Decimal => Ok(format_decimal(
            value,
            options.minimum_fraction_digits.unwrap_or(0),
            options.maximum_fraction_digits.unwrap_or(3),
            grouping,
            language,
        )),
        NumberStyle::Percent => {
            let number = format_decimal(
                value * 100.0,
                options.minimum_fraction_digits.unwrap_or(0),
                options.maximum_fraction_digits.unwrap_or(0),
                grouping,
                language,
            );
            let sign = if spaced_percent(language) { "\u{a0}%" } else { "%" };
            Ok(format!("{number}{sign}"))
        }
        NumberStyle::Currency => {
            let Some(code) = options.currency.as_deref() else {
                engine.report(&EngineIssue::InvalidValue {
                    kind: FormatKind::Number,
                    message: "currency style requires a currency code".to_string(),
                })?;
                return Ok(format_decimal(value, 0, 3, grouping, language));
            };
            let code = code.to_ascii_uppercase();
            let digits = currency_digits(&code);
            let amount = format_decimal(
                value.abs(),
                options.minimum_fraction_digits.unwrap_or(digits),
                options.maximum_fraction_digits.unwrap_or(digits),
                grouping,
                language,
            );
            let sign = if value < 0.0 { "-" } else { "" };
            let symbol = currency_symbol(&code);
            Ok(if currency_after_amount(language) {
                format!("{sign}{amount}\u{a0}{symbol}")
            } else {
                format!("{sign}{symbol}{amount}")
            })
        }
    }
}

/// Format with at most `max` and at least `min` fraction digits
pub(crate) fn format_decimal(
    value: f64,
    min: usize,
    max: usize,
    grouping: bool,
    language: &str,
) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let (decimal_sep, group_sep) = number_separators(language);
    let max = max.max(min);
    let formatted = format!("{:.*}", max, value.abs());
    let (integer, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let trimmed = fraction.trim_end_matches('0');
    let fraction = if trimmed.len() < min {
        &fraction[..min]
    } else {
        trimmed
    };

    let mut out = String::with_capacity(formatted.len() + 4);
    if value < 0.0 {
        out.push('-');
    }
    if grouping {
        out.push_str(&add_grouping(integer, group_sep));
    } else {
        out.push_str(integer);
    }
    if !fraction.is_empty() {
        out.push_str(decimal_sep);
        out.push_str(fraction);
    }
    out
}

fn add_grouping(digits: &str, sep: &str) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(len + (len - 1) / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

fn spaced_percent(language: &str) -> bool {
    matches!(
        language,
        "de" | "fr" | "es" | "sv" | "nb" | "no" | "fi" | "da" | "cs" | "sk" | "pl" | "ru" | "uk"
    )
}

fn currency_digits(code: &str) -> usize {
    match code {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
        _ => 2,
    }
}

fn format_relative(engine: &FluentEngine, amount: f64, options: &RelativeOptions) -> String {
    let words = &engine.locale_data().relative;
    let unit = options.unit.unwrap_or(RelativeUnit::Second);

    if options.numeric == Some(Numeric::Auto) {
        let phrase = match (unit, amount) {
            (RelativeUnit::Second, a) if a == 0.0 => Some(words.now),
            (RelativeUnit::Day, a) if a == -1.0 => Some(words.yesterday),
            (RelativeUnit::Day, a) if a == 0.0 => Some(words.today),
            (RelativeUnit::Day, a) if a == 1.0 => Some(words.tomorrow),
            _ => None,
        };
        if let Some(phrase) = phrase {
            return phrase.to_string();
        }
    }

    let count = format_decimal(amount.abs(), 0, 3, true, engine.language());
    let quantity = format!("{count} {}", words.unit(unit, amount));
    let template = if amount.is_sign_negative() {
        words.past
    } else {
        words.future
    };
    template.replace("{0}", &quantity)
}
