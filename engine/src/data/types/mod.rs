//! Shared data types for filters, query arguments and decoded rows

mod attribute;
mod value;

pub use attribute::{AttributeDescriptor, AttributeType};
pub use value::Value;
