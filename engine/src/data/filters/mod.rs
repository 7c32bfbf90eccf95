//! Query filter system
//!
//! Filters are nested AND/OR trees of field comparisons. They are parsed from
//! JSON, validated node by node, and compiled through the [`ConditionBuilder`]
//! protocol: [`SqlCompiler`] emits parameterized SQL, [`RecordEvaluator`]
//! evaluates the same tree against an in-memory record.
//!
//! ## Usage
//!
//! ```
//! use filterkit::data::filters::{compile, parse_condition};
//!
//! let json_str = r#"{"and": [
//!     {"field": "age", "op": ">", "value": 30},
//!     {"field": "status", "op": "=", "value": "active"}
//! ]}"#;
//! let condition = parse_condition(json_str).unwrap();
//! let query = compile(&condition).unwrap();
//! assert_eq!(query.sql, "(`age` > ?) AND (`status` = ?)");
//! assert_eq!(query.args.len(), 2);
//! ```

mod builder;
mod compiler;
mod evaluator;
mod parser;
mod types;

pub use builder::ConditionBuilder;
pub use compiler::{CompiledQuery, SqlCompiler, compile};
pub use evaluator::{Record, RecordEvaluator, matches};
pub use parser::{parse_condition, parse_condition_with_limits, parse_optional_condition};
pub use types::{
    Condition, ConditionShape, Connective, Leaf, Operator, RawCondition, ShapeKind,
};
