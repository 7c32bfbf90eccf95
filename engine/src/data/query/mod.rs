//! Query assembly
//!
//! Wraps a caller filter with the keyset cursor predicate and emits the
//! final paginated statement.

mod keyset;

pub use keyset::{KeysetQuery, assemble};
