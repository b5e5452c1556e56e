use axum::http::HeaderValue;
use std::env;
use thiserror::Error;

use crate::aggregation::{BalancePolicy, SummaryOptions, YearMatch};
use crate::constants::*;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub data_path: String,
    pub session_secret: String,
    pub client_url: Option<HeaderValue>,
    pub summary: SummaryOptions,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET environment variable is required")]
    MissingSessionSecret,
    #[error("Invalid session secret: {0}")]
    InvalidSessionSecret(String),
    #[error("Invalid port number: {0}")]
    InvalidPort(String),
    #[error("Invalid CLIENT_URL: {0}")]
    InvalidClientUrl(String),
    #[error("Invalid BALANCE_POLICY: {0} (expected income-only or all-currencies)")]
    InvalidBalancePolicy(String),
    #[error("Invalid YEAR_FILTER: {0} (expected calendar or substring)")]
    InvalidYearFilter(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("SERVER_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let data_path = env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());

        if port.parse::<u16>().is_err() {
            return Err(ConfigError::InvalidPort(port));
        }

        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| ConfigError::MissingSessionSecret)?;
        validate_session_secret(&session_secret)?;

        let client_url = match env::var("CLIENT_URL") {
            Ok(url) if !url.trim().is_empty() => Some(parse_client_url(url.trim())?),
            _ => None,
        };

        let balance_policy = match env::var("BALANCE_POLICY") {
            Ok(value) => value
                .parse::<BalancePolicy>()
                .map_err(|_| ConfigError::InvalidBalancePolicy(value))?,
            Err(_) => BalancePolicy::default(),
        };

        let year_match = match env::var("YEAR_FILTER") {
            Ok(value) => value
                .parse::<YearMatch>()
                .map_err(|_| ConfigError::InvalidYearFilter(value))?,
            Err(_) => YearMatch::default(),
        };

        Ok(Config {
            host,
            port,
            data_path,
            session_secret,
            client_url,
            summary: SummaryOptions {
                balance_policy,
                year_match,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn validate_session_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InvalidSessionSecret(format!(
            "must be at least {} bytes long",
            MIN_SESSION_SECRET_LENGTH
        )));
    }
    Ok(())
}

pub fn parse_client_url(url: &str) -> Result<HeaderValue, ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidClientUrl(url.to_string()));
    }
    HeaderValue::from_str(url).map_err(|_| ConfigError::InvalidClientUrl(url.to_string()))
}
