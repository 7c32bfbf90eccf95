//! SQL dialect trait
//!
//! Everything backend-specific that the compiler and assembler emit goes
//! through this trait. Only one backend is implemented; new dialects plug in
//! here without touching the AST or its validation.

/// SQL dialect trait for generating backend-specific SQL
///
/// Dialects differ in:
/// - Parameter placeholders (? vs $1)
/// - Identifier quoting (backticks vs double quotes)
/// - String casts
/// - Limit clauses
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a positional parameter placeholder
    ///
    /// - MySQL/SQLite: `?`
    fn placeholder(&self) -> &'static str;

    /// Quote an identifier that has already passed the allow-list
    ///
    /// - MySQL: `` `name` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Cast an expression to a fixed-width character string
    ///
    /// - MySQL: `CAST(expr AS CHAR(n))`
    fn cast_to_char(&self, expr: &str, width: u16) -> String;

    /// Generate a LIMIT clause bound to a single parameter
    fn limit_clause(&self) -> String {
        format!("LIMIT {}", self.placeholder())
    }

    /// Generate an ORDER BY clause for one column
    fn order_by(&self, col: &str, desc: bool) -> String {
        let dir = if desc { "DESC" } else { "ASC" };
        format!("ORDER BY {} {}", col, dir)
    }
}
