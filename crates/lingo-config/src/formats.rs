//! Named format presets shared by all formatting calls.
//!
//! A [`Formats`] registry maps a preset name to an option bag for each
//! value kind. Callers pick a preset by name and may override individual
//! fields per call; [`DateOptions::or`] and friends implement that layering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Date formatting style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// "Monday, January 15, 2024"
    Full,
    /// "January 15, 2024"
    Long,
    /// "Jan 15, 2024"
    Medium,
    /// "1/15/24"
    Short,
}

/// Time formatting style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    /// "2:30:00 PM +00:00"
    Full,
    /// "2:30:00 PM +00:00"
    Long,
    /// "2:30:00 PM"
    Medium,
    /// "2:30 PM"
    Short,
}

/// Number formatting style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    /// Plain decimal number
    Decimal,
    /// Value multiplied by 100 with a percent sign
    Percent,
    /// Monetary amount in `currency`
    Currency,
}

/// Whether relative time may use phrases like "yesterday"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Numeric {
    /// Always "in 1 day" / "1 day ago"
    Always,
    /// "tomorrow" / "yesterday" / "now" where the language has them
    Auto,
}

/// Units for relative time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl RelativeUnit {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Parse a unit name, accepting plural spellings ("days")
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let singular = name.strip_suffix('s').unwrap_or(&name);
        match singular {
            "second" => Some(Self::Second),
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Options for date and time formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateOptions {
    /// Date part style; no date part when both styles are absent for a time format
    pub date_style: Option<DateStyle>,
    /// Time part style
    pub time_style: Option<TimeStyle>,
    /// Explicit strftime pattern, overriding both styles
    pub pattern: Option<String>,
    /// Force 12-hour (true) or 24-hour (false) clock
    pub hour12: Option<bool>,
}

impl DateOptions {
    /// Fill every unset field from `fallback`
    pub fn or(&self, fallback: &Self) -> Self {
        Self {
            date_style: self.date_style.or(fallback.date_style),
            time_style: self.time_style.or(fallback.time_style),
            pattern: self.pattern.clone().or_else(|| fallback.pattern.clone()),
            hour12: self.hour12.or(fallback.hour12),
        }
    }

    /// Options with only a date style
    pub fn date(style: DateStyle) -> Self {
        Self {
            date_style: Some(style),
            ..Self::default()
        }
    }

    /// Options with only a time style
    pub fn time(style: TimeStyle) -> Self {
        Self {
            time_style: Some(style),
            ..Self::default()
        }
    }
}

/// Options for number formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberOptions {
    /// Number style
    pub style: Option<NumberStyle>,
    /// ISO 4217 currency code for the currency style
    pub currency: Option<String>,
    /// Minimum fraction digits
    pub minimum_fraction_digits: Option<usize>,
    /// Maximum fraction digits
    pub maximum_fraction_digits: Option<usize>,
    /// Use grouping separators
    pub use_grouping: Option<bool>,
}

impl NumberOptions {
    /// Fill every unset field from `fallback`
    pub fn or(&self, fallback: &Self) -> Self {
        Self {
            style: self.style.or(fallback.style),
            currency: self.currency.clone().or_else(|| fallback.currency.clone()),
            minimum_fraction_digits: self
                .minimum_fraction_digits
                .or(fallback.minimum_fraction_digits),
            maximum_fraction_digits: self
                .maximum_fraction_digits
                .or(fallback.maximum_fraction_digits),
            use_grouping: self.use_grouping.or(fallback.use_grouping),
        }
    }
}

/// Options for relative time formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeOptions {
    /// Unit of the value
    pub unit: Option<RelativeUnit>,
    /// Numeric mode
    pub numeric: Option<Numeric>,
}

impl RelativeOptions {
    /// Fill every unset field from `fallback`
    pub fn or(&self, fallback: &Self) -> Self {
        Self {
            unit: self.unit.or(fallback.unit),
            numeric: self.numeric.or(fallback.numeric),
        }
    }
}

/// Registry of named format presets.
///
/// Owned by the service for its whole lifetime and shared read-only by every
/// formatting engine built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    /// Date presets
    pub date: HashMap<String, DateOptions>,
    /// Time presets
    pub time: HashMap<String, DateOptions>,
    /// Number presets
    pub number: HashMap<String, NumberOptions>,
    /// Relative time presets
    pub relative: HashMap<String, RelativeOptions>,
}

impl Formats {
    /// A registry without any presets
    pub fn empty() -> Self {
        Self {
            date: HashMap::new(),
            time: HashMap::new(),
            number: HashMap::new(),
            relative: HashMap::new(),
        }
    }

    /// Look up a date preset
    pub fn date_preset(&self, name: &str) -> Option<&DateOptions> {
        self.date.get(name)
    }

    /// Look up a time preset
    pub fn time_preset(&self, name: &str) -> Option<&DateOptions> {
        self.time.get(name)
    }

    /// Look up a number preset
    pub fn number_preset(&self, name: &str) -> Option<&NumberOptions> {
        self.number.get(name)
    }

    /// Look up a relative time preset
    pub fn relative_preset(&self, name: &str) -> Option<&RelativeOptions> {
        self.relative.get(name)
    }
}
