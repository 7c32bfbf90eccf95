//! Error type for filter compilation, query assembly and row decoding
//!
//! Every failure in the engine is returned as a [`FilterError`]. Composite
//! conditions wrap the first failing child in [`FilterError::Child`] so the
//! caller can see where in the tree compilation stopped; use
//! [`FilterError::root`] to get at the underlying kind.

use thiserror::Error;

/// Unified error type for the filter engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Node has zero, or more than one, of {and, or, leaf} populated
    #[error("Invalid condition shape: {0}")]
    InvalidConditionShape(String),

    /// Field, table or column name fails the identifier allow-list
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Operator is not in the whitelist
    #[error("Unsupported operator: {0:?}")]
    UnsupportedOperator(String),

    /// Operator needs a value but none was given
    #[error("Operator {operator} on field {field:?} requires a value")]
    ValueRequired {
        field: String,
        operator: &'static str,
    },

    /// Null-check operator was given a value
    #[error("Operator {operator} on field {field:?} does not accept a value")]
    ValueNotAllowed {
        field: String,
        operator: &'static str,
    },

    /// Value has the wrong form for the operator (e.g. a list outside IN)
    #[error("Invalid value for {operator} on field {field:?}: {reason}")]
    InvalidValue {
        field: String,
        operator: &'static str,
        reason: String,
    },

    /// Page size or numeric cursor outside the platform-independent bound
    #[error("{what} {value} exceeds maximum of {max}")]
    RangeExceeded {
        what: &'static str,
        value: String,
        max: u64,
    },

    /// Result cell could not be parsed as its requested type
    #[error("Failed to decode attribute {attribute:?} from {raw:?}: {reason}")]
    DecodeFailure {
        attribute: String,
        raw: String,
        reason: String,
    },

    /// Failure inside the child at `index` of an AND/OR composite
    #[error("{connective} condition #{index}: {source}")]
    Child {
        connective: &'static str,
        index: usize,
        #[source]
        source: Box<FilterError>,
    },

    /// Failure decoding the row at `index` of a result set
    #[error("Row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<FilterError>,
    },

    /// Filter JSON larger than the configured limit
    #[error("Filter JSON exceeds maximum size of {max} bytes")]
    FilterTooLarge { max: usize },

    /// Filter nested deeper than the configured limit
    #[error("Filter exceeds maximum nesting depth of {max}")]
    FilterTooDeep { max: usize },

    /// Filter JSON is not well-formed or has the wrong member types
    #[error("Invalid filter JSON: {0}")]
    InvalidFilterJson(String),

    /// No attribute descriptor is flagged as the unique id
    #[error("No attribute is marked as the unique id")]
    MissingUniqueId,
}

impl FilterError {
    /// Wrap a child failure with its position in a composite
    pub fn child(connective: &'static str, index: usize, source: FilterError) -> Self {
        Self::Child {
            connective,
            index,
            source: Box::new(source),
        }
    }

    /// Create a decode failure for an attribute
    pub fn decode_failure(
        attribute: impl Into<String>,
        raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DecodeFailure {
            attribute: attribute.into(),
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create a range error for a bounded quantity
    pub fn range_exceeded(what: &'static str, value: impl ToString, max: u64) -> Self {
        Self::RangeExceeded {
            what,
            value: value.to_string(),
            max,
        }
    }

    /// Innermost error, skipping any `Child`/`Row` wrappers
    pub fn root(&self) -> &FilterError {
        let mut current = self;
        while let Self::Child { source, .. } | Self::Row { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Stable code for mapping onto a host error taxonomy
    pub fn code(&self) -> &'static str {
        match self.root() {
            Self::InvalidConditionShape(_) => "INVALID_CONDITION_SHAPE",
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::UnsupportedOperator(_) => "UNSUPPORTED_OPERATOR",
            Self::ValueRequired { .. } => "VALUE_REQUIRED",
            Self::ValueNotAllowed { .. } => "VALUE_NOT_ALLOWED",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::RangeExceeded { .. } => "RANGE_EXCEEDED",
            Self::DecodeFailure { .. } => "DECODE_FAILURE",
            Self::FilterTooLarge { .. } => "FILTER_TOO_LARGE",
            Self::FilterTooDeep { .. } => "FILTER_TOO_DEEP",
            Self::InvalidFilterJson(_) => "INVALID_FILTER_JSON",
            Self::MissingUniqueId => "MISSING_UNIQUE_ID",
            Self::Child { .. } | Self::Row { .. } => unreachable!("root() strips wrappers"),
        }
    }
}
