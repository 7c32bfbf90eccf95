//! Filter expression definitions
//!
//! Defines the condition tree, its operators, and the raw deserialization
//! shape callers send as JSON.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::data::error::FilterError;
use crate::data::types::Value;

/// Whitelisted comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::In,
        Self::IsNull,
        Self::IsNotNull,
    ];

    /// SQL spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the operator compares against a value
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    /// Keyword operators are matched case-insensitively with whitespace
    /// collapsed, so `is  not null` parses as `IS NOT NULL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| FilterError::UnsupportedOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean connective joining the children of a composite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A single field/operator/value comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub field: String,
    pub operator: Operator,
    pub value: Option<Value>,
}

impl Leaf {
    /// Check that the value fits the operator.
    ///
    /// Null-checks take no value; every other operator requires one. Lists are
    /// only accepted by `IN`; an empty list counts as a missing value.
    pub fn check_value(&self) -> Result<(), FilterError> {
        let operator = self.operator.as_str();
        let invalid = |reason: &str| FilterError::InvalidValue {
            field: self.field.clone(),
            operator,
            reason: reason.to_string(),
        };

        match (&self.value, self.operator.takes_value()) {
            (Some(_), false) => Err(FilterError::ValueNotAllowed {
                field: self.field.clone(),
                operator,
            }),
            (None, true) => Err(FilterError::ValueRequired {
                field: self.field.clone(),
                operator,
            }),
            (None, false) => Ok(()),
            (Some(Value::List(items)), true) => {
                if self.operator != Operator::In {
                    Err(invalid("list values are only accepted by IN"))
                } else if items.is_empty() {
                    Err(FilterError::ValueRequired {
                        field: self.field.clone(),
                        operator,
                    })
                } else if items.iter().any(Value::is_list) {
                    Err(invalid("IN values must be scalars"))
                } else {
                    Ok(())
                }
            }
            (Some(_), true) => Ok(()),
        }
    }

    /// Values the operator compares against, in order. A scalar `IN` value is
    /// treated as a one-element list.
    pub fn operands(&self) -> &[Value] {
        match &self.value {
            None => &[],
            Some(Value::List(items)) => items,
            Some(value) => std::slice::from_ref(value),
        }
    }
}

/// A node of the filter tree. Composites must be non-empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Leaf(Leaf),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

/// Validated view of a condition node, used to dispatch to a builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionShape<'a> {
    Leaf(&'a Leaf),
    And(&'a [Condition]),
    Or(&'a [Condition]),
}

impl Condition {
    /// Comparison leaf with a value
    pub fn leaf(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::Leaf(Leaf {
            field: field.into(),
            operator,
            value: Some(value.into()),
        })
    }

    /// `field IS NULL`
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::Leaf(Leaf {
            field: field.into(),
            operator: Operator::IsNull,
            value: None,
        })
    }

    /// `field IS NOT NULL`
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::Leaf(Leaf {
            field: field.into(),
            operator: Operator::IsNotNull,
            value: None,
        })
    }

    pub fn and(children: Vec<Condition>) -> Self {
        Self::And(children)
    }

    pub fn or(children: Vec<Condition>) -> Self {
        Self::Or(children)
    }

    /// Validate this node's shape. Children are not inspected.
    pub fn shape(&self) -> Result<ConditionShape<'_>, FilterError> {
        match self {
            Self::Leaf(leaf) => Ok(ConditionShape::Leaf(leaf)),
            Self::And(children) if children.is_empty() => Err(FilterError::InvalidConditionShape(
                "AND composite has no children".to_string(),
            )),
            Self::Or(children) if children.is_empty() => Err(FilterError::InvalidConditionShape(
                "OR composite has no children".to_string(),
            )),
            Self::And(children) => Ok(ConditionShape::And(children)),
            Self::Or(children) => Ok(ConditionShape::Or(children)),
        }
    }
}

/// Which of the three shapes a raw node holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Leaf,
    And,
    Or,
}

/// Filter node as supplied by callers:
/// `{"field": .., "op": .., "value": ..}` or `{"and": [..]}` or `{"or": [..]}`.
///
/// Every member is optional here; [`RawCondition::validate`] enforces that
/// exactly one shape is populated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCondition {
    #[serde(default)]
    pub field: String,
    #[serde(default, alias = "operator")]
    pub op: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub and: Vec<RawCondition>,
    #[serde(default)]
    pub or: Vec<RawCondition>,
}

impl RawCondition {
    /// Determine the node's shape; fails unless exactly one of
    /// {non-empty and, non-empty or, leaf members} is populated.
    pub fn validate(&self) -> Result<ShapeKind, FilterError> {
        let is_and = !self.and.is_empty();
        let is_or = !self.or.is_empty();
        let is_leaf = !self.field.is_empty() || !self.op.is_empty() || self.value.is_some();

        let populated: Vec<&str> = [(is_and, "and"), (is_or, "or"), (is_leaf, "leaf")]
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect();

        match populated.as_slice() {
            ["and"] => Ok(ShapeKind::And),
            ["or"] => Ok(ShapeKind::Or),
            ["leaf"] => Ok(ShapeKind::Leaf),
            [] => Err(FilterError::InvalidConditionShape(
                "condition has none of and/or/field populated".to_string(),
            )),
            parts => Err(FilterError::InvalidConditionShape(format!(
                "condition mixes {}",
                parts.join(" + ")
            ))),
        }
    }

    /// Validate every node and convert to a typed [`Condition`]
    pub fn into_condition(self) -> Result<Condition, FilterError> {
        self.convert(1, usize::MAX)
    }

    /// Like [`RawCondition::into_condition`], rejecting trees deeper than
    /// `max_depth`
    pub fn into_condition_bounded(self, max_depth: usize) -> Result<Condition, FilterError> {
        self.convert(1, max_depth)
    }

    fn convert(self, depth: usize, max_depth: usize) -> Result<Condition, FilterError> {
        if depth > max_depth {
            return Err(FilterError::FilterTooDeep { max: max_depth });
        }

        match self.validate()? {
            ShapeKind::Leaf => Ok(Condition::Leaf(Leaf {
                operator: self.op.parse()?,
                field: self.field,
                value: self.value,
            })),
            ShapeKind::And => {
                convert_children(self.and, Connective::And, depth, max_depth).map(Condition::And)
            }
            ShapeKind::Or => {
                convert_children(self.or, Connective::Or, depth, max_depth).map(Condition::Or)
            }
        }
    }
}

fn convert_children(
    children: Vec<RawCondition>,
    connective: Connective,
    depth: usize,
    max_depth: usize,
) -> Result<Vec<Condition>, FilterError> {
    children
        .into_iter()
        .enumerate()
        .map(|(index, child)| {
            child
                .convert(depth + 1, max_depth)
                .map_err(|e| FilterError::child(connective.as_str(), index, e))
        })
        .collect()
}
