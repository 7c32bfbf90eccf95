//! In-memory condition evaluator
//!
//! A second builder target that evaluates a condition against a single
//! record instead of emitting SQL. Field and value checks match the SQL
//! compiler, so a tree that evaluates here also compiles there.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::data::error::FilterError;
use crate::data::types::Value;
use crate::utils::sql::validate_identifier;

use super::builder::ConditionBuilder;
use super::types::{Condition, Connective, Leaf, Operator};

/// A record keyed by column name. A missing key is SQL NULL.
pub type Record = BTreeMap<String, Value>;

/// Evaluates conditions against one record
pub struct RecordEvaluator<'r> {
    record: &'r Record,
}

impl<'r> RecordEvaluator<'r> {
    pub fn new(record: &'r Record) -> Self {
        Self { record }
    }
}

impl ConditionBuilder for RecordEvaluator<'_> {
    type Output = bool;

    fn build_leaf(&self, leaf: &Leaf) -> Result<bool, FilterError> {
        validate_identifier(&leaf.field)?;
        leaf.check_value()?;

        let actual = self.record.get(&leaf.field);
        let matched = match (leaf.operator, actual) {
            (Operator::IsNull, actual) => actual.is_none(),
            (Operator::IsNotNull, actual) => actual.is_some(),
            // comparisons against NULL are never true
            (_, None) => false,
            (Operator::In, Some(actual)) => leaf
                .operands()
                .iter()
                .any(|v| actual.compare(v) == Some(Ordering::Equal)),
            (op, Some(actual)) => {
                let Some(expected) = leaf.operands().first() else {
                    return Ok(false);
                };
                match actual.compare(expected) {
                    None => false,
                    Some(ord) => match op {
                        Operator::Eq => ord == Ordering::Equal,
                        Operator::Ne => ord != Ordering::Equal,
                        Operator::Gt => ord == Ordering::Greater,
                        Operator::Lt => ord == Ordering::Less,
                        Operator::Gte => ord != Ordering::Less,
                        Operator::Lte => ord != Ordering::Greater,
                        Operator::In | Operator::IsNull | Operator::IsNotNull => false,
                    },
                }
            }
        };

        Ok(matched)
    }

    fn build_and(&self, children: &[Condition]) -> Result<bool, FilterError> {
        Ok(self
            .build_children(Connective::And, children)?
            .into_iter()
            .all(|m| m))
    }

    fn build_or(&self, children: &[Condition]) -> Result<bool, FilterError> {
        Ok(self
            .build_children(Connective::Or, children)?
            .into_iter()
            .any(|m| m))
    }
}

/// Evaluate `condition` against `record`
pub fn matches(condition: &Condition, record: &Record) -> Result<bool, FilterError> {
    RecordEvaluator::new(record).build(condition)
}
