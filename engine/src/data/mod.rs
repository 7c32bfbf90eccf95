//! Data layer
//!
//! - `filters` - Filter trees, JSON parsing and the builder protocol
//! - `query` - Keyset pagination query assembly
//! - `decode` - Result row decoding
//! - `sql` - SQL dialect abstraction
//! - `types` - Literal values and attribute descriptors
//! - `error` - Error type shared by all of the above

pub mod decode;
pub mod error;
pub mod filters;
pub mod query;
pub mod sql;
pub mod types;

pub use error::FilterError;
