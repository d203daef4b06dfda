use std::time::Duration;

use crate::error::ConfigError;

/// Parse a boolean value from a raw string, accepting common env-style forms.
///
/// Accepted truthy values (case-insensitive): `"1"`, `"true"`, `"yes"`, `"on"`.
/// Accepted falsy values: `"0"`, `"false"`, `"no"`, `"off"`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_bool_value(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    parse_bool(raw).ok_or_else(|| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: "expected a boolean".to_string(),
    })
}

/// Parse a humantime duration (`"30s"`, `"2m 5s"`). `"0"`, `"none"` and
/// `"off"` disable the timeout.
pub fn parse_timeout(key: &'static str, raw: &str) -> Result<Option<Duration>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || matches!(trimmed, "0" | "none" | "off") {
        return Ok(None);
    }
    humantime::parse_duration(trimmed)
        .map(Some)
        .map_err(|err| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: err.to_string(),
        })
}

/// Normalize an API prefix to the `/segment/.../` form.
pub fn normalize_prefix(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('/').filter(|part| !part.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Normalize a client route path to a leading-slash form without a trailing
/// slash (the root stays `/`).
pub fn normalize_route(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
