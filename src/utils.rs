use axum::http::StatusCode;
use std::fmt::Display;
use time::{Date, OffsetDateTime};

use crate::constants::*;
use crate::dates::parse_occurred_on;

pub fn db_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ERR_DATABASE_OPERATION.to_string(),
    )
}

/// Logs the underlying failure and returns a generic 500 for the client.
pub fn internal_error(context: &str, error: impl Display) -> (StatusCode, String) {
    tracing::error!(context, error = %error, "request failed");
    db_error()
}

/// Store failure while loading records for a summary. Kept distinct from an
/// empty summary so clients can tell "nothing recorded" from "could not load".
pub fn aggregation_unavailable(error: impl Display) -> (StatusCode, String) {
    tracing::error!(error = %error, "failed to load records for aggregation");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        ERR_AGGREGATION_UNAVAILABLE.to_string(),
    )
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn validate_string_length(
    value: &str,
    field_name: &str,
    min_length: usize,
    max_length: usize,
) -> Result<(), (StatusCode, String)> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{} cannot be empty", field_name),
        ));
    }
    let length = trimmed.chars().count();
    if length < min_length || length > max_length {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "{} must be between {} and {} characters",
                field_name, min_length, max_length
            ),
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), (StatusCode, String)> {
    validate_string_length(name, "Name", MIN_NAME_LENGTH, MAX_NAME_LENGTH)
}

pub fn validate_email(email: &str) -> Result<(), (StatusCode, String)> {
    let email = email.trim();
    let invalid = || {
        (
            StatusCode::BAD_REQUEST,
            "Please enter a valid email address".to_string(),
        )
    };

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() {
        return Err(invalid());
    }
    // Domain needs a dot with something on both sides.
    match domain.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < domain.len() => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_password(password: &str) -> Result<(), (StatusCode, String)> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), (StatusCode, String)> {
    if !amount.is_finite() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Amount must be a number".to_string(),
        ));
    }
    if amount < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// Parses a submitted date and rejects days after `today`.
pub fn validate_entry_date(
    text: &str,
    field_name: &str,
    today: Date,
) -> Result<Date, (StatusCode, String)> {
    let date = parse_occurred_on(text).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("{} is not a valid date: {}", field_name, e),
        )
    })?;

    if date > today {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{} cannot be in the future", field_name),
        ));
    }
    Ok(date)
}

/// Year path segments must be exactly four ASCII digits.
pub fn validate_year(year: &str) -> Result<i32, (StatusCode, String)> {
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Year must be a four-digit number".to_string(),
        ));
    }
    year.parse::<i32>()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid year".to_string()))
}
