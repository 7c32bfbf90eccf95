//! Keyset pagination query assembly
//!
//! Builds `SELECT … WHERE … ORDER BY str_id ASC LIMIT ?` where `str_id` is a
//! string cast of the table's unique id. Ordering and the cursor predicate
//! both key off that same expression, so a cursor taken from the last row of
//! one page always resumes exactly after it.

use crate::core::config::EngineConfig;
use crate::core::constants::{DEFAULT_CAST_WIDTH, PAGINATION_VALUE_LIMIT, STR_ID_COLUMN};
use crate::data::error::FilterError;
use crate::data::filters::{CompiledQuery, Condition, Operator, SqlCompiler};
use crate::data::sql::{SqlDialect, default_dialect};
use crate::data::types::Value;
use crate::utils::sql::validate_identifier;

/// One page request against a table
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetQuery {
    table: String,
    unique_id_field: String,
    filter: Option<Condition>,
    cursor: Option<String>,
    page_size: u64,
    cast_width: u16,
    max_page_size: u64,
}

impl KeysetQuery {
    /// Unfiltered, unbounded query over `table`, paginated by `unique_id_field`
    pub fn new(table: impl Into<String>, unique_id_field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            unique_id_field: unique_id_field.into(),
            filter: None,
            cursor: None,
            page_size: 0,
            cast_width: DEFAULT_CAST_WIDTH,
            max_page_size: PAGINATION_VALUE_LIMIT,
        }
    }

    pub fn filter(self, filter: Condition) -> Self {
        self.with_filter(Some(filter))
    }

    pub fn with_filter(mut self, filter: Option<Condition>) -> Self {
        self.filter = filter;
        self
    }

    /// Resume after this `str_id`. An empty cursor means the first page.
    pub fn cursor(self, cursor: impl Into<String>) -> Self {
        self.with_cursor(Some(cursor.into()))
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Rows per page; 0 means no LIMIT
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Apply configured cast width and page-size cap
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.cast_width = config.cast_width;
        self.max_page_size = config.max_page_size.min(PAGINATION_VALUE_LIMIT);
        self
    }

    fn active_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }

    /// The WHERE condition: the cursor predicate first, then the caller's
    /// filter, joined with AND when both are present.
    pub fn condition(&self) -> Option<Condition> {
        let cursor = self
            .active_cursor()
            .map(|c| Condition::leaf(STR_ID_COLUMN, Operator::Gt, c));

        match (cursor, self.filter.clone()) {
            (Some(cursor), Some(filter)) => Some(Condition::and(vec![cursor, filter])),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        }
    }

    fn check_bounds(&self) -> Result<(), FilterError> {
        if self.page_size > self.max_page_size {
            return Err(FilterError::range_exceeded(
                "page size",
                self.page_size,
                self.max_page_size,
            ));
        }

        // only all-digit cursors are numeric; anything else compares as text
        if let Some(cursor) = self.active_cursor()
            && cursor.bytes().all(|b| b.is_ascii_digit())
        {
            let in_range = cursor
                .parse::<u64>()
                .is_ok_and(|n| n <= PAGINATION_VALUE_LIMIT);
            if !in_range {
                return Err(FilterError::range_exceeded(
                    "cursor",
                    cursor,
                    PAGINATION_VALUE_LIMIT,
                ));
            }
        }

        Ok(())
    }

    /// Assemble the statement and its arguments.
    ///
    /// Argument order: cursor, filter values (depth-first), page size.
    pub fn assemble(&self) -> Result<CompiledQuery, FilterError> {
        self.check_bounds()?;
        let table = validate_identifier(&self.table)?;
        let unique_id = validate_identifier(&self.unique_id_field)?;

        let dialect: &dyn SqlDialect = default_dialect();
        let str_id_expr =
            dialect.cast_to_char(&dialect.quote_identifier(unique_id), self.cast_width);
        let str_id_col = dialect.quote_identifier(STR_ID_COLUMN);

        let mut sql = format!(
            "SELECT *, {} AS {} FROM {}",
            str_id_expr,
            str_id_col,
            dialect.quote_identifier(table)
        );
        let mut args = Vec::new();

        if let Some(condition) = self.condition() {
            let compiled = SqlCompiler::new()
                .with_column_expr(STR_ID_COLUMN, str_id_expr.as_str())
                .compile(&condition)?;
            sql.push_str(&format!(" WHERE ({})", compiled.sql));
            args = compiled.args;
        }

        sql.push(' ');
        sql.push_str(&dialect.order_by(&str_id_col, false));

        if self.page_size > 0 {
            let page_size = u32::try_from(self.page_size).map_err(|_| {
                FilterError::range_exceeded("page size", self.page_size, PAGINATION_VALUE_LIMIT)
            })?;
            sql.push(' ');
            sql.push_str(&dialect.limit_clause());
            args.push(Value::from(page_size));
        }

        tracing::debug!(
            table = %table,
            has_cursor = self.active_cursor().is_some(),
            has_filter = self.filter.is_some(),
            args = args.len(),
            "Assembled keyset query"
        );

        Ok(CompiledQuery { sql, args })
    }
}

/// Assemble a keyset-paginated query in one call
pub fn assemble(
    table: &str,
    unique_id_field: &str,
    filter: Option<&Condition>,
    cursor: Option<&str>,
    page_size: u64,
) -> Result<CompiledQuery, FilterError> {
    KeysetQuery::new(table, unique_id_field)
        .with_filter(filter.cloned())
        .with_cursor(cursor.map(str::to_string))
        .page_size(page_size)
        .assemble()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_and_filter() {
        let filter = Condition::leaf("status", Operator::Eq, "active");
        let query = assemble("users", "id", Some(&filter), Some("500"), 100).unwrap();

        assert_eq!(
            query.sql,
            "SELECT *, CAST(`id` AS CHAR(50)) AS `str_id` FROM `users` \
             WHERE ((CAST(`id` AS CHAR(50)) > ?) AND (`status` = ?)) \
             ORDER BY `str_id` ASC LIMIT ?"
        );
        assert_eq!(
            query.args,
            vec![Value::from("500"), Value::from("active"), Value::Int(100)]
        );
    }

    #[test]
    fn no_cursor_no_filter() {
        let query = assemble("users", "id", None, None, 0).unwrap();
        assert_eq!(
            query.sql,
            "SELECT *, CAST(`id` AS CHAR(50)) AS `str_id` FROM `users` ORDER BY `str_id` ASC"
        );
        assert!(query.args.is_empty());
    }

    #[test]
    fn cursor_only() {
        let query = assemble("orders", "order_id", None, Some("abc"), 10).unwrap();
        assert_eq!(
            query.sql,
            "SELECT *, CAST(`order_id` AS CHAR(50)) AS `str_id` FROM `orders` \
             WHERE (CAST(`order_id` AS CHAR(50)) > ?) ORDER BY `str_id` ASC LIMIT ?"
        );
        assert_eq!(query.args, vec![Value::from("abc"), Value::Int(10)]);
    }

    #[test]
    fn filter_only() {
        let filter = Condition::is_null("deleted_at");
        let query = assemble("users", "id", Some(&filter), None, 25).unwrap();
        assert!(query.sql.contains(" WHERE (`deleted_at` IS NULL) ORDER BY"));
        assert_eq!(query.args, vec![Value::Int(25)]);
    }

    #[test]
    fn empty_cursor_is_first_page() {
        let with_empty = assemble("users", "id", None, Some(""), 5).unwrap();
        let without = assemble("users", "id", None, None, 5).unwrap();
        assert_eq!(with_empty, without);
    }

    #[test]
    fn filter_on_str_id_uses_cast() {
        let filter = Condition::leaf("str_id", Operator::Lt, "900");
        let query = assemble("users", "id", Some(&filter), None, 0).unwrap();
        assert!(query.sql.contains("WHERE (CAST(`id` AS CHAR(50)) < ?)"));
    }

    #[test]
    fn rejects_bad_table() {
        let err = assemble("users; --", "id", None, None, 10).unwrap_err();
        assert_eq!(err, FilterError::InvalidIdentifier("users; --".to_string()));
    }

    #[test]
    fn rejects_bad_unique_id() {
        let err = assemble("users", "id`", None, None, 10).unwrap_err();
        assert_eq!(err, FilterError::InvalidIdentifier("id`".to_string()));
    }

    #[test]
    fn filter_errors_propagate() {
        let filter = Condition::leaf("bad field", Operator::Eq, 1);
        let err = assemble("users", "id", Some(&filter), Some("1"), 10).unwrap_err();
        // the user filter is the second child of the synthetic AND
        assert!(matches!(
            err,
            FilterError::Child {
                connective: "AND",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn page_size_bound() {
        assert!(assemble("t", "id", None, None, u32::MAX as u64).is_ok());
        let err = assemble("t", "id", None, None, u32::MAX as u64 + 1).unwrap_err();
        assert!(matches!(
            err,
            FilterError::RangeExceeded {
                what: "page size",
                ..
            }
        ));
    }

    #[test]
    fn numeric_cursor_bound() {
        assert!(assemble("t", "id", None, Some("4294967295"), 1).is_ok());
        for cursor in ["4294967296", "99999999999999999999999"] {
            let err = assemble("t", "id", None, Some(cursor), 1).unwrap_err();
            assert!(
                matches!(err, FilterError::RangeExceeded { what: "cursor", .. }),
                "cursor {}",
                cursor
            );
        }
    }

    #[test]
    fn non_numeric_cursor_is_not_range_checked() {
        assert!(assemble("t", "id", None, Some("99999999999-x"), 1).is_ok());
    }

    #[test]
    fn range_checked_before_identifiers() {
        let err = assemble("bad table", "id", None, None, u64::MAX).unwrap_err();
        assert_eq!(err.code(), "RANGE_EXCEEDED");
    }

    #[test]
    fn config_cast_width_and_cap() {
        let config = EngineConfig {
            cast_width: 36,
            max_page_size: 1000,
            ..EngineConfig::default()
        };
        let query = KeysetQuery::new("t", "uuid")
            .page_size(1000)
            .with_config(&config)
            .assemble()
            .unwrap();
        assert!(query.sql.starts_with("SELECT *, CAST(`uuid` AS CHAR(36)) AS `str_id`"));

        let err = KeysetQuery::new("t", "uuid")
            .page_size(1001)
            .with_config(&config)
            .assemble()
            .unwrap_err();
        assert_eq!(err, FilterError::range_exceeded("page size", 1001, 1000));
    }

    #[test]
    fn condition_orders_cursor_first() {
        let query = KeysetQuery::new("t", "id")
            .filter(Condition::is_null("x"))
            .cursor("7");
        assert_eq!(
            query.condition(),
            Some(Condition::and(vec![
                Condition::leaf("str_id", Operator::Gt, "7"),
                Condition::is_null("x"),
            ]))
        );
    }
}
