//! SQL utility functions

use std::sync::OnceLock;

use regex::Regex;

use crate::data::error::FilterError;

/// Identifier allow-list: table and column names cannot be bound as
/// placeholders, so they are restricted by character class and length.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z0-9$_]{1,128}$";

fn identifier_regex() -> &'static Regex {
    static RE_IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    RE_IDENTIFIER.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("Invalid regex"))
}

/// Check an identifier against the allow-list
///
/// # Example
///
/// ```
/// use filterkit::utils::sql::is_valid_identifier;
///
/// assert!(is_valid_identifier("user_id"));
/// assert!(!is_valid_identifier("id; DROP TABLE users;"));
/// ```
pub fn is_valid_identifier(ident: &str) -> bool {
    identifier_regex().is_match(ident)
}

/// Validate an identifier, returning it unchanged on success
pub fn validate_identifier(ident: &str) -> Result<&str, FilterError> {
    if is_valid_identifier(ident) {
        Ok(ident)
    } else {
        Err(FilterError::InvalidIdentifier(ident.to_string()))
    }
}
