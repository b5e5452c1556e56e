//! Classification of the free-text dates stored on income and expense records.
//!
//! New records are written as `YYYY-MM-DD`. Older rows may hold the long
//! JavaScript form (`Tue Oct 15 2024 00:00:00 GMT+0000 (...)`), which is read
//! through the month-abbreviation table below.

use thiserror::Error;
use time::{Date, Month, macros::format_description};

const MONTH_ABBREVIATIONS: [(&str, Month); 12] = [
    ("Jan", Month::January),
    ("Feb", Month::February),
    ("Mar", Month::March),
    ("Apr", Month::April),
    ("May", Month::May),
    ("Jun", Month::June),
    ("Jul", Month::July),
    ("Aug", Month::August),
    ("Sep", Month::September),
    ("Oct", Month::October),
    ("Nov", Month::November),
    ("Dec", Month::December),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("date is empty")]
    Empty,
    #[error("unknown month abbreviation: {0}")]
    UnknownMonth(String),
    #[error("not a calendar date: {0}")]
    InvalidDate(String),
    #[error("unrecognized date format: {0}")]
    Unrecognized(String),
}

/// Exact, case-sensitive lookup of a three-letter month abbreviation.
pub fn month_from_abbreviation(abbreviation: &str) -> Option<Month> {
    MONTH_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == abbreviation)
        .map(|(_, month)| *month)
}

/// Full English month name, e.g. `"March"`.
pub fn month_name(month: Month) -> String {
    month.to_string()
}

/// Parses a stored date into a calendar date.
///
/// Accepted forms, tried in order:
/// * `2024-10-15`
/// * an ISO datetime starting with such a date (`2024-10-15T08:00:00.000Z`)
/// * `Tue Oct 15 2024 ...` (weekday, month, day, year, anything after)
pub fn parse_occurred_on(text: &str) -> Result<Date, DateParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateParseError::Empty);
    }

    if looks_like_iso(text) {
        parse_iso_prefix(text)
    } else {
        parse_legacy(text)
    }
}

fn looks_like_iso(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

fn parse_iso_prefix(text: &str) -> Result<Date, DateParseError> {
    let format = format_description!("[year]-[month]-[day]");
    let head = text
        .get(..10)
        .ok_or_else(|| DateParseError::Unrecognized(text.to_string()))?;

    // Only a time component may follow the date.
    if let Some(rest) = text.get(10..) {
        if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
            return Err(DateParseError::Unrecognized(text.to_string()));
        }
    }

    Date::parse(head, format).map_err(|_| DateParseError::InvalidDate(text.to_string()))
}

fn parse_legacy(text: &str) -> Result<Date, DateParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(DateParseError::Unrecognized(text.to_string()));
    }

    let abbreviation: String = tokens[1].chars().take(3).collect();
    let month = month_from_abbreviation(&abbreviation)
        .ok_or(DateParseError::UnknownMonth(abbreviation))?;

    let day: u8 = tokens[2]
        .parse()
        .map_err(|_| DateParseError::Unrecognized(text.to_string()))?;
    let year: i32 = tokens[3]
        .parse()
        .map_err(|_| DateParseError::Unrecognized(text.to_string()))?;

    Date::from_calendar_date(year, month, day)
        .map_err(|_| DateParseError::InvalidDate(text.to_string()))
}
