//! Filter-expression compiler and keyset-pagination query assembler
//!
//! - [`data::filters`] parses JSON filter trees and compiles them to
//!   parameterized SQL
//! - [`data::query`] wraps a filter with a keyset cursor and page limit
//! - [`data::decode`] turns raw result cells into typed values

pub mod app;
pub mod core;
pub mod data;
pub mod utils;

pub use data::FilterError;
pub use data::filters::{CompiledQuery, Condition, Operator, compile, parse_condition};
pub use data::query::{KeysetQuery, assemble};
pub use data::types::{AttributeDescriptor, AttributeType, Value};
