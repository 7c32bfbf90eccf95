//! Builder protocol for compiling condition trees
//!
//! A compilation target implements the three node methods; the provided
//! `build` validates each node's shape and dispatches, so validation and
//! traversal order are defined once for every target.

use crate::data::error::FilterError;

use super::types::{Condition, ConditionShape, Connective, Leaf};

/// A compilation target for [`Condition`] trees
pub trait ConditionBuilder {
    type Output;

    /// Validate the node's shape and dispatch to the matching method
    fn build(&self, condition: &Condition) -> Result<Self::Output, FilterError> {
        match condition.shape()? {
            ConditionShape::Leaf(leaf) => self.build_leaf(leaf),
            ConditionShape::And(children) => self.build_and(children),
            ConditionShape::Or(children) => self.build_or(children),
        }
    }

    fn build_leaf(&self, leaf: &Leaf) -> Result<Self::Output, FilterError>;

    /// `children` is non-empty
    fn build_and(&self, children: &[Condition]) -> Result<Self::Output, FilterError>;

    /// `children` is non-empty
    fn build_or(&self, children: &[Condition]) -> Result<Self::Output, FilterError>;

    /// Build each child in order, stopping at the first failure and tagging
    /// it with the child's index
    fn build_children(
        &self,
        connective: Connective,
        children: &[Condition],
    ) -> Result<Vec<Self::Output>, FilterError> {
        children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                self.build(child)
                    .map_err(|e| FilterError::child(connective.as_str(), index, e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::data::filters::Operator;

    /// Records visit order and renders a prefix notation string
    #[derive(Default)]
    struct Tracer {
        visited: RefCell<Vec<String>>,
    }

    impl ConditionBuilder for Tracer {
        type Output = String;

        fn build_leaf(&self, leaf: &Leaf) -> Result<String, FilterError> {
            self.visited.borrow_mut().push(leaf.field.clone());
            Ok(leaf.field.clone())
        }

        fn build_and(&self, children: &[Condition]) -> Result<String, FilterError> {
            let parts = self.build_children(Connective::And, children)?;
            Ok(format!("and({})", parts.join(",")))
        }

        fn build_or(&self, children: &[Condition]) -> Result<String, FilterError> {
            let parts = self.build_children(Connective::Or, children)?;
            Ok(format!("or({})", parts.join(",")))
        }
    }

    fn eq(field: &str) -> Condition {
        Condition::leaf(field, Operator::Eq, 1)
    }

    #[test]
    fn dispatches_depth_first_left_to_right() {
        let tracer = Tracer::default();
        let cond = Condition::and(vec![
            eq("a"),
            Condition::or(vec![eq("b"), eq("c")]),
            eq("d"),
        ]);

        assert_eq!(tracer.build(&cond).unwrap(), "and(a,or(b,c),d)");
        assert_eq!(*tracer.visited.borrow(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn fails_fast_on_first_bad_child() {
        let tracer = Tracer::default();
        let cond = Condition::or(vec![eq("a"), Condition::and(vec![]), eq("z")]);

        let err = tracer.build(&cond).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Child {
                connective: "OR",
                index: 1,
                ..
            }
        ));
        assert!(matches!(err.root(), FilterError::InvalidConditionShape(_)));
        // the child after the failure is never visited
        assert_eq!(*tracer.visited.borrow(), vec!["a"]);
    }

    #[test]
    fn rejects_empty_root_composite() {
        let tracer = Tracer::default();
        assert!(matches!(
            tracer.build(&Condition::or(vec![])),
            Err(FilterError::InvalidConditionShape(_))
        ));
    }
}
