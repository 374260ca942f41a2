//! Values, options and formatter dispatch shared by every formatting call

use crate::engine::FluentEngine;
use crate::error::IntlResult;
use crate::formatters::{
    DateFormatter, MessageFormatter, NumberFormatter, RelativeTimeFormatter, TimeFormatter,
};
use crate::locale::LocaleArg;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use lingo_config::{DateOptions, NumberOptions, RelativeOptions, RelativeUnit};
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of value an engine can format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Message,
    Date,
    Time,
    Number,
    Relative,
}

impl FormatKind {
    /// All kinds, in dispatch-table order
    pub const ALL: [FormatKind; 5] = [
        FormatKind::Message,
        FormatKind::Date,
        FormatKind::Time,
        FormatKind::Number,
        FormatKind::Relative,
    ];

    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Date => "date",
            Self::Time => "time",
            Self::Number => "number",
            Self::Relative => "relative",
        }
    }

    /// The built-in formatter for this kind
    pub(crate) fn formatter(self) -> &'static dyn Formatter {
        match self {
            Self::Message => &MessageFormatter,
            Self::Date => &DateFormatter,
            Self::Time => &TimeFormatter,
            Self::Number => &NumberFormatter,
            Self::Relative => &RelativeTimeFormatter,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One formatting capability of the built-in engine
pub(crate) trait Formatter: Send + Sync {
    fn format(
        &self,
        engine: &FluentEngine,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String>;
}

/// A value handed to an engine
#[derive(Debug, Clone, PartialEq)]
pub enum FormatValue {
    /// A message id, with the pattern already resolved by the caller if any
    Message { id: String, pattern: Option<String> },
    /// A number; also the amount for relative time
    Number(f64),
    /// An instant with the offset it should be shown in
    DateTime(DateTime<FixedOffset>),
}

impl FormatValue {
    /// A message value without a resolved pattern
    pub fn message(id: impl Into<String>) -> Self {
        Self::Message {
            id: id.into(),
            pattern: None,
        }
    }

    /// Short description used in error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Message { id, .. } => format!("message \"{id}\""),
            Self::Number(n) => format!("number {n}"),
            Self::DateTime(dt) => format!("date-time {}", dt.to_rfc3339()),
        }
    }
}

impl From<f64> for FormatValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FormatValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FormatValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FormatValue {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        Self::DateTime(value.with_timezone(&offset))
    }
}

impl From<NaiveDateTime> for FormatValue {
    fn from(value: NaiveDateTime) -> Self {
        Utc.from_utc_datetime(&value).into()
    }
}

/// A message argument
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Number(f64),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<usize> for ArgValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

/// Named message arguments
pub type MessageArgs = BTreeMap<String, ArgValue>;

/// A message reference with an optional fallback pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    /// Flattened translation key
    pub id: String,
    /// Pattern used when no candidate locale has the key
    pub default_message: Option<String>,
}

impl MessageDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_message: None,
        }
    }

    pub fn with_default(mut self, default_message: impl Into<String>) -> Self {
        self.default_message = Some(default_message.into());
        self
    }
}

impl From<&str> for MessageDescriptor {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MessageDescriptor {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Options passed through unchanged to the engine.
///
/// `locale` overrides the active locale list for one call. `format` names a
/// preset in the formats registry for the kind being formatted; the typed
/// option bags override individual preset fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatOptions {
    pub locale: Option<LocaleArg>,
    pub format: Option<String>,
    pub date: DateOptions,
    pub number: NumberOptions,
    pub relative: RelativeOptions,
    pub args: MessageArgs,
    pub default_message: Option<String>,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(mut self, locale: impl Into<LocaleArg>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn format(mut self, preset: impl Into<String>) -> Self {
        self.format = Some(preset.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn date(mut self, date: DateOptions) -> Self {
        self.date = date;
        self
    }

    pub fn number(mut self, number: NumberOptions) -> Self {
        self.number = number;
        self
    }

    pub fn relative(mut self, relative: RelativeOptions) -> Self {
        self.relative = relative;
        self
    }

    /// Shorthand for setting the relative time unit
    pub fn unit(mut self, unit: RelativeUnit) -> Self {
        self.relative.unit = Some(unit);
        self
    }

    pub fn default_message(mut self, pattern: impl Into<String>) -> Self {
        self.default_message = Some(pattern.into());
        self
    }
}
