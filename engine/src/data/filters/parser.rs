//! Filter parsing
//!
//! Parses JSON filter definitions into validated condition trees.

use crate::core::constants::{MAX_FILTER_DEPTH, MAX_FILTER_JSON_SIZE};
use crate::data::error::FilterError;

use super::types::{Condition, RawCondition};

/// Parse a filter from JSON with the default size and depth limits
pub fn parse_condition(json_str: &str) -> Result<Condition, FilterError> {
    parse_condition_with_limits(json_str, MAX_FILTER_JSON_SIZE, MAX_FILTER_DEPTH)
}

/// Parse a filter from JSON
///
/// Checks JSON size, deserializes the raw shape, then validates every node
/// and converts it to a typed [`Condition`].
pub fn parse_condition_with_limits(
    json_str: &str,
    max_bytes: usize,
    max_depth: usize,
) -> Result<Condition, FilterError> {
    if json_str.len() > max_bytes {
        return Err(FilterError::FilterTooLarge { max: max_bytes });
    }

    let raw: RawCondition = serde_json::from_str(json_str)
        .map_err(|e| FilterError::InvalidFilterJson(e.to_string()))?;

    raw.into_condition_bounded(max_depth)
}

/// Parse an optional filter: blank input and `null` mean "no filter"
pub fn parse_optional_condition(
    json_str: &str,
    max_bytes: usize,
    max_depth: usize,
) -> Result<Option<Condition>, FilterError> {
    let trimmed = json_str.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    parse_condition_with_limits(trimmed, max_bytes, max_depth).map(Some)
}
