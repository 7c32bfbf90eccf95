//! Utility functions

pub mod sql;
