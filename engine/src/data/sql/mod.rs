//! SQL abstraction layer
//!
//! Holds the dialect trait and the single supported backend dialect.

mod dialect;
mod mysql_dialect;

pub use dialect::SqlDialect;
pub use mysql_dialect::MysqlDialect;

/// Dialect used when none is specified
pub fn default_dialect() -> &'static dyn SqlDialect {
    &MysqlDialect
}
