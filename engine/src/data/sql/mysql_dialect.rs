//! MySQL SQL dialect implementation

use super::SqlDialect;

/// MySQL SQL dialect
pub struct MysqlDialect;

impl SqlDialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn placeholder(&self) -> &'static str {
        "?"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn cast_to_char(&self, expr: &str, width: u16) -> String {
        format!("CAST({} AS CHAR({}))", expr, width)
    }
}
