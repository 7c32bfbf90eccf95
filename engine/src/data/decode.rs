//! Result row decoding
//!
//! Converts raw column bytes into typed values according to the requested
//! attribute descriptors. A zero-length or missing cell means "no value" and
//! the attribute is left out of the object entirely.

use std::collections::BTreeMap;

use crate::data::error::FilterError;
use crate::data::types::{AttributeDescriptor, AttributeType, Value};

/// Raw row as returned by the driver: column name -> cell bytes (`None` for NULL)
pub type RawRow = BTreeMap<String, Option<Vec<u8>>>;

/// Decoded row: attribute name -> typed value
pub type Object = BTreeMap<String, Value>;

/// Parse a boolean the way Go's `strconv.ParseBool` does
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Decode one non-empty cell as `kind`
pub fn decode_cell(
    attribute: &str,
    kind: AttributeType,
    raw: &[u8],
) -> Result<Value, FilterError> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        FilterError::decode_failure(attribute, String::from_utf8_lossy(raw), e.to_string())
    })?;

    if kind.is_passthrough() {
        return Ok(Value::String(text.to_string()));
    }

    match kind {
        AttributeType::Boolean => parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| FilterError::decode_failure(attribute, text, "expected a boolean")),
        // one numeric kind downstream, so integers take the float path too
        _ => parse_number(attribute, text).map(Value::Float),
    }
}

/// Parse a float, failing on overflow the way `strconv.ParseFloat` does.
/// Only text that spells out `inf` or `nan` may yield a non-finite value.
fn parse_number(attribute: &str, text: &str) -> Result<f64, FilterError> {
    let value = text
        .parse::<f64>()
        .map_err(|e| FilterError::decode_failure(attribute, text, e.to_string()))?;

    if !value.is_finite() && !spells_non_finite(text) {
        return Err(FilterError::decode_failure(
            attribute,
            text,
            "value out of range",
        ));
    }
    Ok(value)
}

fn spells_non_finite(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']).to_ascii_lowercase();
    matches!(unsigned.as_str(), "inf" | "infinity" | "nan")
}

/// Decode the requested attributes of one row
pub fn decode_row(
    row: &RawRow,
    attributes: &[AttributeDescriptor],
) -> Result<Object, FilterError> {
    let mut object = Object::new();

    for attribute in attributes {
        let Some(Some(raw)) = row.get(&attribute.external_id) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let value = decode_cell(&attribute.external_id, attribute.kind, raw)?;
        object.insert(attribute.external_id.clone(), value);
    }

    Ok(object)
}

/// Decode every row in order, failing on the first bad row
pub fn decode_rows(
    rows: &[RawRow],
    attributes: &[AttributeDescriptor],
) -> Result<Vec<Object>, FilterError> {
    let objects = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            decode_row(row, attributes).map_err(|e| FilterError::Row {
                index,
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::trace!(rows = objects.len(), attributes = attributes.len(), "Decoded rows");
    Ok(objects)
}
