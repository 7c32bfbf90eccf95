//! SQL compiler
//!
//! Lowers a condition tree into a WHERE fragment with positional
//! placeholders plus the bound values, in placeholder order. Field names are
//! allow-listed and quoted; values are always bound, never interpolated.

use serde::Serialize;

use crate::data::error::FilterError;
use crate::data::sql::{SqlDialect, default_dialect};
use crate::data::types::Value;
use crate::utils::sql::validate_identifier;

use super::builder::ConditionBuilder;
use super::types::{Condition, Connective, Leaf, Operator};

/// Query text plus its bound arguments. `args[i]` binds the i-th placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

impl CompiledQuery {
    /// Number of placeholders in `sql`
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Compiles conditions into parameterized SQL
pub struct SqlCompiler {
    dialect: &'static dyn SqlDialect,
    /// Logical field name -> SQL expression, for fields that are not plain
    /// columns. Kept as a Vec so lookups never depend on hash order.
    column_exprs: Vec<(String, String)>,
}

impl Default for SqlCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlCompiler {
    pub fn new() -> Self {
        Self::with_dialect(default_dialect())
    }

    pub fn with_dialect(dialect: &'static dyn SqlDialect) -> Self {
        Self {
            dialect,
            column_exprs: Vec::new(),
        }
    }

    /// Render `field` as `expr` instead of a quoted column.
    ///
    /// `expr` is emitted verbatim and must be built from validated parts.
    pub fn with_column_expr(mut self, field: impl Into<String>, expr: impl Into<String>) -> Self {
        let field = field.into();
        let expr = expr.into();
        match self.column_exprs.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = expr,
            None => self.column_exprs.push((field, expr)),
        }
        self
    }

    /// Compile a condition tree into a fragment and its arguments
    pub fn compile(&self, condition: &Condition) -> Result<CompiledQuery, FilterError> {
        let compiled = self.build(condition)?;
        tracing::trace!(
            dialect = self.dialect.name(),
            sql = %compiled.sql,
            args = compiled.args.len(),
            "Compiled filter"
        );
        Ok(compiled)
    }

    fn column(&self, field: &str) -> Result<String, FilterError> {
        validate_identifier(field)?;
        let mapped = self
            .column_exprs
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, expr)| expr.clone());
        Ok(mapped.unwrap_or_else(|| self.dialect.quote_identifier(field)))
    }

    fn join(
        &self,
        connective: Connective,
        children: &[Condition],
    ) -> Result<CompiledQuery, FilterError> {
        let parts = self.build_children(connective, children)?;
        let separator = format!(" {} ", connective.as_str());

        let mut clauses = Vec::with_capacity(parts.len());
        let mut args = Vec::new();
        for part in parts {
            clauses.push(format!("({})", part.sql));
            args.extend(part.args);
        }

        Ok(CompiledQuery {
            sql: clauses.join(&separator),
            args,
        })
    }
}

impl ConditionBuilder for SqlCompiler {
    type Output = CompiledQuery;

    fn build_leaf(&self, leaf: &Leaf) -> Result<CompiledQuery, FilterError> {
        let col = self.column(&leaf.field)?;
        leaf.check_value()?;

        let placeholder = self.dialect.placeholder();
        let args = leaf.operands().to_vec();
        let sql = match leaf.operator {
            Operator::IsNull | Operator::IsNotNull => {
                format!("{} {}", col, leaf.operator.as_str())
            }
            Operator::In => {
                let placeholders: Vec<&str> = args.iter().map(|_| placeholder).collect();
                format!("{} IN ({})", col, placeholders.join(", "))
            }
            op => format!("{} {} {}", col, op.as_str(), placeholder),
        };

        Ok(CompiledQuery { sql, args })
    }

    fn build_and(&self, children: &[Condition]) -> Result<CompiledQuery, FilterError> {
        self.join(Connective::And, children)
    }

    fn build_or(&self, children: &[Condition]) -> Result<CompiledQuery, FilterError> {
        self.join(Connective::Or, children)
    }
}

/// Compile with the default dialect and no column mapping
pub fn compile(condition: &Condition) -> Result<CompiledQuery, FilterError> {
    SqlCompiler::new().compile(condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(sql: &str, args: Vec<Value>) -> CompiledQuery {
        CompiledQuery {
            sql: sql.to_string(),
            args,
        }
    }

    #[test]
    fn leaf_equality() {
        let cond = Condition::leaf("status", Operator::Eq, "active");
        assert_eq!(
            compile(&cond).unwrap(),
            compiled("`status` = ?", vec![Value::from("active")])
        );
    }

    #[test]
    fn leaf_comparison_operators() {
        for op in [
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Lt,
            Operator::Gte,
            Operator::Lte,
        ] {
            let cond = Condition::leaf("age", op, 30);
            let result = compile(&cond).unwrap();
            assert_eq!(result.sql, format!("`age` {} ?", op.as_str()));
            assert_eq!(result.args, vec![Value::Int(30)]);
        }
    }

    #[test]
    fn leaf_in_list() {
        let cond = Condition::leaf("env", Operator::In, vec!["prod", "staging", "dev"]);
        assert_eq!(
            compile(&cond).unwrap(),
            compiled(
                "`env` IN (?, ?, ?)",
                vec![Value::from("prod"), Value::from("staging"), Value::from("dev")]
            )
        );
    }

    #[test]
    fn leaf_in_scalar() {
        let cond = Condition::leaf("env", Operator::In, "prod");
        assert_eq!(
            compile(&cond).unwrap(),
            compiled("`env` IN (?)", vec![Value::from("prod")])
        );
    }

    #[test]
    fn leaf_in_empty_list_requires_value() {
        let cond = crate::data::filters::parse_condition(
            r#"{"field": "env", "op": "IN", "value": []}"#,
        )
        .unwrap();
        let err = compile(&cond).unwrap_err();
        assert_eq!(
            err,
            FilterError::ValueRequired {
                field: "env".to_string(),
                operator: "IN",
            }
        );
        assert_eq!(err.code(), "VALUE_REQUIRED");
    }

    #[test]
    fn leaf_null_checks() {
        assert_eq!(
            compile(&Condition::is_null("deleted_at")).unwrap(),
            compiled("`deleted_at` IS NULL", vec![])
        );
        assert_eq!(
            compile(&Condition::is_not_null("deleted_at")).unwrap(),
            compiled("`deleted_at` IS NOT NULL", vec![])
        );
    }

    #[test]
    fn boolean_binds_like_any_value() {
        let cond = Condition::leaf("is_active", Operator::Eq, true);
        assert_eq!(
            compile(&cond).unwrap(),
            compiled("`is_active` = ?", vec![Value::Bool(true)])
        );
    }

    #[test]
    fn and_composite() {
        let cond = Condition::and(vec![
            Condition::leaf("age", Operator::Gt, 30),
            Condition::leaf("status", Operator::Eq, "active"),
        ]);
        assert_eq!(
            compile(&cond).unwrap(),
            compiled(
                "(`age` > ?) AND (`status` = ?)",
                vec![Value::Int(30), Value::from("active")]
            )
        );
    }

    #[test]
    fn nested_composites_keep_precedence() {
        let cond = Condition::or(vec![
            Condition::and(vec![
                Condition::leaf("a", Operator::Eq, 1),
                Condition::leaf("b", Operator::Eq, 2),
            ]),
            Condition::is_null("c"),
            Condition::leaf("d", Operator::In, vec![3, 4]),
        ]);
        assert_eq!(
            compile(&cond).unwrap(),
            compiled(
                "((`a` = ?) AND (`b` = ?)) OR (`c` IS NULL) OR (`d` IN (?, ?))",
                vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
            )
        );
    }

    #[test]
    fn rejects_injected_field() {
        let cond = Condition::leaf("id; DROP TABLE users;", Operator::Eq, 1);
        assert_eq!(
            compile(&cond),
            Err(FilterError::InvalidIdentifier(
                "id; DROP TABLE users;".to_string()
            ))
        );
    }

    #[test]
    fn identifier_checked_before_value() {
        let cond = Condition::leaf("bad field", Operator::IsNull, "x");
        assert!(matches!(
            compile(&cond),
            Err(FilterError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn rejects_value_on_null_check() {
        let cond = Condition::leaf("email", Operator::IsNull, "x");
        assert_eq!(
            compile(&cond),
            Err(FilterError::ValueNotAllowed {
                field: "email".to_string(),
                operator: "IS NULL",
            })
        );
    }

    #[test]
    fn child_error_carries_index() {
        let cond = Condition::and(vec![
            Condition::leaf("ok", Operator::Eq, 1),
            Condition::leaf("not ok", Operator::Eq, 2),
        ]);
        let err = compile(&cond).unwrap_err();
        assert_eq!(
            err,
            FilterError::child(
                "AND",
                1,
                FilterError::InvalidIdentifier("not ok".to_string())
            )
        );
    }

    #[test]
    fn column_expr_replaces_quoted_column() {
        let compiler = SqlCompiler::new().with_column_expr("str_id", "CAST(`id` AS CHAR(50))");
        let cond = Condition::leaf("str_id", Operator::Gt, "500");
        assert_eq!(
            compiler.compile(&cond).unwrap(),
            compiled("CAST(`id` AS CHAR(50)) > ?", vec![Value::from("500")])
        );
    }

    #[test]
    fn column_expr_overrides_previous_mapping() {
        let compiler = SqlCompiler::new()
            .with_column_expr("k", "first")
            .with_column_expr("k", "second");
        let result = compiler.compile(&Condition::is_null("k")).unwrap();
        assert_eq!(result.sql, "second IS NULL");
    }

    #[test]
    fn placeholder_parity() {
        let cond = Condition::or(vec![
            Condition::leaf("a", Operator::In, vec![1, 2, 3]),
            Condition::is_not_null("b"),
            Condition::and(vec![
                Condition::leaf("c", Operator::Lte, 2.5),
                Condition::leaf("d", Operator::Ne, "x"),
            ]),
        ]);
        let result = compile(&cond).unwrap();
        assert_eq!(result.placeholder_count(), result.args.len());
        assert_eq!(result.args.len(), 5);
    }

    #[test]
    fn compilation_is_idempotent() {
        let cond = Condition::and(vec![
            Condition::leaf("a", Operator::In, vec!["x", "y"]),
            Condition::or(vec![Condition::is_null("b"), Condition::leaf("c", Operator::Gt, 1)]),
        ]);
        let compiler = SqlCompiler::new();
        assert_eq!(compiler.compile(&cond).unwrap(), compiler.compile(&cond).unwrap());
    }
}
