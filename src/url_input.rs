use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{AppError, Result};

pub const EMPTY_URL_MESSAGE: &str = "Please enter a valid website URL.";
pub const INVALID_URL_MESSAGE: &str = "The entered URL is not valid. Please include http:// or https://";

// Optional scheme, dotted host with an alphabetic TLD, optional path.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$")
        .expect("URL pattern is a valid regex")
});

/// Checks the syntax of a user-entered website URL and returns it trimmed, otherwise unchanged.
pub fn validate_url(raw: &str) -> Result<String> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(AppError::InvalidInput(EMPTY_URL_MESSAGE.to_string()));
    }

    if !URL_PATTERN.is_match(candidate) {
        return Err(AppError::InvalidInput(INVALID_URL_MESSAGE.to_string()));
    }

    let absolute = if has_http_scheme(candidate) {
        candidate.to_string()
    } else {
        format!("https://{}", candidate)
    };

    let parsed = Url::parse(&absolute)
        .map_err(|_| AppError::InvalidInput(INVALID_URL_MESSAGE.to_string()))?;
    if parsed.host_str().is_none_or(|host| host.is_empty()) {
        return Err(AppError::InvalidInput(INVALID_URL_MESSAGE.to_string()));
    }

    Ok(candidate.to_string())
}

fn has_http_scheme(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
