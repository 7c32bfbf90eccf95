//! Attribute descriptors: which result columns to decode, and as what

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::error::FilterError;

/// Semantic type a result column is decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "int", alias = "integer")]
    Int64,
    #[serde(alias = "float", alias = "number")]
    Double,
    String,
    Duration,
    #[serde(alias = "date_time", alias = "timestamp")]
    Datetime,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::String => "string",
            Self::Duration => "duration",
            Self::Datetime => "datetime",
        }
    }

    /// Whether the raw text is passed through without parsing
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::String | Self::Duration | Self::Datetime)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One requested result attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    /// Column name in the result set
    #[serde(alias = "external_id")]
    pub external_id: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Column used as the pagination key
    #[serde(default, alias = "is_unique_id")]
    pub is_unique_id: bool,
}

impl AttributeDescriptor {
    pub fn new(external_id: impl Into<String>, kind: AttributeType) -> Self {
        Self {
            external_id: external_id.into(),
            kind,
            is_unique_id: false,
        }
    }

    pub fn unique_id(external_id: impl Into<String>, kind: AttributeType) -> Self {
        Self {
            is_unique_id: true,
            ..Self::new(external_id, kind)
        }
    }

    /// First descriptor flagged as the unique id
    pub fn find_unique_id(
        attributes: &[AttributeDescriptor],
    ) -> Result<&AttributeDescriptor, FilterError> {
        attributes
            .iter()
            .find(|a| a.is_unique_id)
            .ok_or(FilterError::MissingUniqueId)
    }
}
