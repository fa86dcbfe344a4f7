//! Environment variable loading helpers.
//!
//! `.env` values are loaded into the process environment by `main` before
//! configuration is built, so everything here reads `std::env` only.

use std::str::FromStr;

/// Non-empty, trimmed value of `key`.
pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `key` into `T`, returning an error naming the variable on bad input.
pub(crate) fn env_parse<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {key}: '{raw}' ({e})")),
        None => Ok(None),
    }
}

/// Boolean flags accept true/false, 1/0 and yes/no.
pub(crate) fn env_bool(key: &str) -> Result<Option<bool>, String> {
    match env_string(key) {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(format!("Invalid value for {key}: '{raw}' (expected true/false)")),
        },
        None => Ok(None),
    }
}
