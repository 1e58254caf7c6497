//! Field-level checks shared by the store DTOs and the HTTP handlers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_WELCOME_MESSAGE_LEN: usize = 500;
pub const MAX_FULL_NAME_LEN: usize = 120;

/// `#rrggbb`, case-insensitive.
const HEX_COLOR_PATTERN: &str = r"^#[0-9a-fA-F]{6}$";

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HEX_COLOR_PATTERN).expect("valid regex"));

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Titles are trimmed before the length check.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if len > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_hex_color(value: &str) -> Result<(), CoreError> {
    if is_hex_color(value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid color '{value}'. Expected #rrggbb"
        )))
    }
}

/// Info links must be absolute `http`/`https` URLs.
pub fn validate_info_link(link: &str) -> Result<(), CoreError> {
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Invalid info link '{link}'. Must start with http:// or https://"
        ))),
    }
}

pub fn validate_welcome_message(message: &str) -> Result<(), CoreError> {
    if message.chars().count() > MAX_WELCOME_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Welcome message must be at most {MAX_WELCOME_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_FULL_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be between 1 and {MAX_FULL_NAME_LEN} characters"
        )));
    }
    Ok(())
}
