//! Locale data used by the built-in formatters.
//!
//! Covers number separators for most European languages and full date and
//! relative-time vocabulary for English, French, German and Spanish.
//! Languages without vocabulary borrow the engine's default locale data.

use lingo_config::RelativeUnit;

/// Date templates use `{d}`, `{dd}`, `{M}`, `{MM}`, `{MMM}`, `{MMMM}`, `{y}`,
/// `{yy}` and `{EEEE}` placeholders.
#[derive(Debug)]
pub(crate) struct LocaleData {
    pub language: &'static str,
    pub months_long: [&'static str; 12],
    pub months_short: [&'static str; 12],
    /// Monday first
    pub weekdays: [&'static str; 7],
    pub date_full: &'static str,
    pub date_long: &'static str,
    pub date_medium: &'static str,
    pub date_short: &'static str,
    pub hour12: bool,
    pub relative: RelativeWords,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RelativeWords {
    pub future: &'static str,
    pub past: &'static str,
    /// Singular and plural forms in [`RelativeUnit`] order
    pub units: [(&'static str, &'static str); 8],
    pub now: &'static str,
    pub yesterday: &'static str,
    pub today: &'static str,
    pub tomorrow: &'static str,
    /// French-style plural rule: 0 and 1 take the singular
    pub singular_below_two: bool,
}

impl RelativeWords {
    pub fn unit(&self, unit: RelativeUnit, count: f64) -> &'static str {
        let (singular, plural) = self.units[unit_index(unit)];
        let magnitude = count.abs();
        let is_singular = if self.singular_below_two {
            magnitude < 2.0
        } else {
            magnitude == 1.0
        };
        if is_singular {
            singular
        } else {
            plural
        }
    }
}

fn unit_index(unit: RelativeUnit) -> usize {
    match unit {
        RelativeUnit::Second => 0,
        RelativeUnit::Minute => 1,
        RelativeUnit::Hour => 2,
        RelativeUnit::Day => 3,
        RelativeUnit::Week => 4,
        RelativeUnit::Month => 5,
        RelativeUnit::Quarter => 6,
        RelativeUnit::Year => 7,
    }
}

pub(crate) static ENGLISH: LocaleData = LocaleData {
    language: "en",
    months_long: [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
    date_full: "{EEEE}, {MMMM} {d}, {y}",
    date_long: "{MMMM} {d}, {y}",
    date_medium: "{MMM} {d}, {y}",
    date_short: "{M}/{d}/{yy}",
    hour12: true,
    relative: RelativeWords {
        future: "in {0}",
        past: "{0} ago",
        units: [
            ("second", "seconds"),
            ("minute", "minutes"),
            ("hour", "hours"),
            ("day", "days"),
            ("week", "weeks"),
            ("month", "months"),
            ("quarter", "quarters"),
            ("year", "years"),
        ],
        now: "now",
        yesterday: "yesterday",
        today: "today",
        tomorrow: "tomorrow",
        singular_below_two: false,
    },
};

// Day-first English used outside the US
static ENGLISH_DMY: LocaleData = LocaleData {
    date_full: "{EEEE} {d} {MMMM} {y}",
    date_long: "{d} {MMMM} {y}",
    date_medium: "{d} {MMM} {y}",
    date_short: "{dd}/{MM}/{y}",
    ..ENGLISH
};

static FRENCH: LocaleData = LocaleData {
    language: "fr",
    months_long: [
        "janvier", "février", "mars", "avril", "mai", "juin",
        "juillet", "août", "septembre", "octobre", "novembre", "décembre",
    ],
    months_short: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin",
        "juil.", "août", "sept.", "oct.", "nov.", "déc.",
    ],
    weekdays: ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"],
    date_full: "{EEEE} {d} {MMMM} {y}",
    date_long: "{d} {MMMM} {y}",
    date_medium: "{d} {MMM} {y}",
    date_short: "{dd}/{MM}/{y}",
    hour12: false,
    relative: RelativeWords {
        future: "dans {0}",
        past: "il y a {0}",
        units: [
            ("seconde", "secondes"),
            ("minute", "minutes"),
            ("heure", "heures"),
            ("jour", "jours"),
            ("semaine", "semaines"),
            ("mois", "mois"),
            ("trimestre", "trimestres"),
            ("an", "ans"),
        ],
        now: "maintenant",
        yesterday: "hier",
        today: "aujourd’hui",
        tomorrow: "demain",
        singular_below_two: true,
    },
};

static GERMAN: LocaleData = LocaleData {
    language: "de",
    months_long: [
        "Januar", "Februar", "März", "April", "Mai", "Juni",
        "Juli", "August", "September", "Oktober", "November", "Dezember",
    ],
    months_short: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni",
        "Juli", "Aug.", "Sept.", "Okt.", "Nov.", "Dez.",
    ],
    weekdays: ["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag"],
    date_full: "{EEEE}, {d}. {MMMM} {y}",
    date_long: "{d}. {MMMM} {y}",
    date_medium: "{dd}.{MM}.{y}",
    date_short: "{dd}.{MM}.{yy}",
    hour12: false,
    relative: RelativeWords {
        future: "in {0}",
        past: "vor {0}",
        // dative plural, as both "in" and "vor" require it
        units: [
            ("Sekunde", "Sekunden"),
            ("Minute", "Minuten"),
            ("Stunde", "Stunden"),
            ("Tag", "Tagen"),
            ("Woche", "Wochen"),
            ("Monat", "Monaten"),
            ("Quartal", "Quartalen"),
            ("Jahr", "Jahren"),
        ],
        now: "jetzt",
        yesterday: "gestern",
        today: "heute",
        tomorrow: "morgen",
        singular_below_two: false,
    },
};

static SPANISH: LocaleData = LocaleData {
    language: "es",
    months_long: [
        "enero", "febrero", "marzo", "abril", "mayo", "junio",
        "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
    ],
    months_short: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ],
    weekdays: ["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"],
    date_full: "{EEEE}, {d} de {MMMM} de {y}",
    date_long: "{d} de {MMMM} de {y}",
    date_medium: "{d} {MMM} {y}",
    date_short: "{d}/{M}/{yy}",
    hour12: false,
    relative: RelativeWords {
        future: "dentro de {0}",
        past: "hace {0}",
        units: [
            ("segundo", "segundos"),
            ("minuto", "minutos"),
            ("hora", "horas"),
            ("día", "días"),
            ("semana", "semanas"),
            ("mes", "meses"),
            ("trimestre", "trimestres"),
            ("año", "años"),
        ],
        now: "ahora",
        yesterday: "ayer",
        today: "hoy",
        tomorrow: "mañana",
        singular_below_two: false,
    },
};

/// Vocabulary for `language`/`region`, if bundled
pub(crate) fn locale_data(language: &str, region: Option<&str>) -> Option<&'static LocaleData> {
    match language {
        "en" => match region {
            None | Some("US") | Some("PH") => Some(&ENGLISH),
            Some(_) => Some(&ENGLISH_DMY),
        },
        "fr" => Some(&FRENCH),
        "de" => Some(&GERMAN),
        "es" => Some(&SPANISH),
        _ => None,
    }
}

/// Decimal and grouping separators for a language
pub(crate) fn number_separators(language: &str) -> (&'static str, &'static str) {
    match language {
        "de" | "es" | "it" | "pt" | "nl" | "da" | "tr" | "id" | "vi" | "ro" | "el" => (",", "."),
        "fr" | "sv" | "no" | "nb" | "fi" | "pl" | "cs" | "sk" | "hu" | "bg" | "ru" | "uk" => {
            (",", "\u{a0}")
        }
        _ => (".", ","),
    }
}

/// Whether a language writes the currency symbol after the amount
pub(crate) fn currency_after_amount(language: &str) -> bool {
    matches!(
        language,
        "de" | "fr" | "es" | "it" | "pt" | "nl" | "da" | "sv" | "no" | "nb" | "fi" | "pl"
            | "cs" | "sk" | "hu" | "ro" | "bg" | "el" | "ru" | "uk" | "vi"
    )
}

/// Symbol for an ISO 4217 code, or the code itself
pub(crate) fn currency_symbol(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "KRW" => "₩",
        "INR" => "₹",
        "RUB" => "₽",
        "BRL" => "R$",
        "CAD" => "CA$",
        "AUD" => "A$",
        "SEK" | "NOK" | "DKK" => "kr",
        "PLN" => "zł",
        "CZK" => "Kč",
        _ => code,
    }
}
