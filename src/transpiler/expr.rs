//! Expression rendering.
//!
//! Scalar shapes are rebuilt node by node so identifiers, literals, casts
//! and function calls pick up the target's spelling. Anything else is
//! rendered from its canonical text with the quoting rewritten.

use sqlparser::ast::{
    CastKind, DuplicateTreatment, Expr, Function, FunctionArg, FunctionArgExpr,
    FunctionArguments, UnaryOperator, Value,
};

use super::{quote_literal, requote, Generator};
use crate::dialect::FunctionRendering;
use crate::error::{ConvertError, ConvertResult};
use crate::types::SourceType;

impl Generator<'_> {
    pub(super) fn expr(&self, e: &Expr) -> ConvertResult<String> {
        match e {
            Expr::Identifier(ident) => Ok(self.ident(ident)),
            Expr::CompoundIdentifier(idents) => Ok(idents
                .iter()
                .map(|i| self.ident(i))
                .collect::<Vec<_>>()
                .join(".")),
            Expr::Value(v) => self.value(&v.value),
            Expr::BinaryOp { left, op, right } => {
                Ok(format!("{} {} {}", self.expr(left)?, op, self.expr(right)?))
            }
            Expr::UnaryOp { op, expr } => {
                let inner = self.expr(expr)?;
                Ok(match op {
                    UnaryOperator::Not => format!("NOT {}", inner),
                    other => format!("{}{}", other, inner),
                })
            }
            Expr::Nested(inner) => Ok(format!("({})", self.expr(inner)?)),
            Expr::Function(func) => self.function(func),
            Expr::Cast {
                kind,
                expr,
                data_type,
                ..
            } => {
                let keyword = match kind {
                    CastKind::TryCast | CastKind::SafeCast => {
                        return Err(ConvertError::unsupported("TRY_CAST"));
                    }
                    _ => "CAST",
                };
                // SIGNED and UNSIGNED classify as the widest integers.
                let target = self
                    .dialect
                    .render_type(&SourceType::classify(&data_type.to_string())?)?;
                Ok(format!("{}({} AS {})", keyword, self.expr(expr)?, target))
            }
            Expr::Case {
                operand,
                conditions,
                else_result,
                ..
            } => {
                let mut sql = String::from("CASE");
                if let Some(operand) = operand {
                    sql.push(' ');
                    sql.push_str(&self.expr(operand)?);
                }
                for when in conditions {
                    sql.push_str(&format!(
                        " WHEN {} THEN {}",
                        self.expr(&when.condition)?,
                        self.expr(&when.result)?
                    ));
                }
                if let Some(else_result) = else_result {
                    sql.push_str(&format!(" ELSE {}", self.expr(else_result)?));
                }
                sql.push_str(" END");
                Ok(sql)
            }
            Expr::Subquery(q) => Ok(format!("({})", self.inline().query(q)?)),
            Expr::Exists { subquery, negated } => Ok(format!(
                "{}EXISTS ({})",
                not(*negated),
                self.inline().query(subquery)?
            )),
            Expr::InList {
                expr,
                list,
                negated,
            } => Ok(format!(
                "{} {}IN ({})",
                self.expr(expr)?,
                not(*negated),
                self.exprs(list)?.join(", ")
            )),
            Expr::InSubquery {
                expr,
                subquery,
                negated,
            } => Ok(format!(
                "{} {}IN ({})",
                self.expr(expr)?,
                not(*negated),
                self.inline().query(subquery)?
            )),
            Expr::Between {
                expr,
                negated,
                low,
                high,
            } => Ok(format!(
                "{} {}BETWEEN {} AND {}",
                self.expr(expr)?,
                not(*negated),
                self.expr(low)?,
                self.expr(high)?
            )),
            Expr::IsNull(inner) => Ok(format!("{} IS NULL", self.expr(inner)?)),
            Expr::IsNotNull(inner) => Ok(format!("{} IS NOT NULL", self.expr(inner)?)),
            Expr::Like {
                negated,
                expr,
                pattern,
                escape_char,
                ..
            } => {
                let mut sql = format!(
                    "{} {}LIKE {}",
                    self.expr(expr)?,
                    not(*negated),
                    self.expr(pattern)?
                );
                if let Some(escape) = escape_char {
                    let escape = escape.to_string();
                    sql.push_str(" ESCAPE ");
                    if escape.starts_with('\'') {
                        sql.push_str(&escape);
                    } else {
                        sql.push_str(&quote_literal(&escape));
                    }
                }
                Ok(sql)
            }
            Expr::Tuple(items) => Ok(format!("({})", self.exprs(items)?.join(", "))),
            other => requote(&other.to_string()),
        }
    }

    fn value(&self, v: &Value) -> ConvertResult<String> {
        match v {
            Value::SingleQuotedString(s) | Value::DoubleQuotedString(s) => Ok(quote_literal(s)),
            Value::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Value::Null => Ok("NULL".to_string()),
            other => requote(&other.to_string()),
        }
    }

    fn function(&self, func: &Function) -> ConvertResult<String> {
        let name = self.object_name(&func.name);
        let lookup = func.name.to_string().to_ascii_uppercase();

        if let Some(FunctionRendering::Unsupported) = self.dialect.function_rendering(&lookup) {
            return Err(ConvertError::unsupported(format!("function {}", lookup)));
        }
        if func.over.is_some() || func.filter.is_some() || !func.within_group.is_empty() {
            return requote(&func.to_string());
        }

        let args = match &func.args {
            FunctionArguments::None => {
                return match self.dialect.function_rendering(&lookup) {
                    Some(_) => self.dialect.render_function(&lookup, &[]),
                    None => Ok(name),
                };
            }
            FunctionArguments::Subquery(q) => vec![self.inline().query(q)?],
            FunctionArguments::List(list) => {
                if !list.clauses.is_empty() {
                    return requote(&func.to_string());
                }
                let mut args = list
                    .args
                    .iter()
                    .map(|arg| self.function_arg(arg))
                    .collect::<ConvertResult<Vec<_>>>()?;
                if let (Some(DuplicateTreatment::Distinct), Some(first)) =
                    (&list.duplicate_treatment, args.first_mut())
                {
                    *first = format!("DISTINCT {}", first);
                }
                args
            }
        };

        match self.dialect.function_rendering(&lookup) {
            Some(_) => self.dialect.render_function(&lookup, &args),
            None => Ok(format!("{}({})", name, args.join(", "))),
        }
    }

    fn function_arg(&self, arg: &FunctionArg) -> ConvertResult<String> {
        let arg_expr = match arg {
            FunctionArg::Unnamed(a) => a,
            FunctionArg::Named { arg, .. } | FunctionArg::ExprNamed { arg, .. } => arg,
        };
        match arg_expr {
            FunctionArgExpr::Expr(e) => self.expr(e),
            FunctionArgExpr::Wildcard => Ok("*".to_string()),
            other => requote(&other.to_string()),
        }
    }
}

fn not(negated: bool) -> &'static str {
    if negated { "NOT " } else { "" }
}

#[cfg(test)]
mod tests {
    use super::super::tests::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_mapping() {
        assert_eq!(
            render("SELECT IFNULL(a, 0), POW(b, 2), ROUND(c), NOW() FROM t"),
            "SELECT COALESCE(a, 0), POWER(b, 2), ROUND(c, 0), CURRENT_TIMESTAMP FROM t"
        );
    }

    #[test]
    fn test_current_timestamp_keyword() {
        assert_eq!(render("SELECT CURRENT_TIMESTAMP"), "SELECT CURRENT_TIMESTAMP");
    }

    #[test]
    fn test_date_format() {
        assert_eq!(
            render("SELECT DATE_FORMAT(created_at, '%Y-%m-%d') FROM t"),
            "SELECT TO_CHAR(created_at, 'YYYY-MM-DD') FROM t"
        );
    }

    #[test]
    fn test_count_distinct() {
        assert_eq!(
            render("SELECT COUNT(DISTINCT user_id) FROM t"),
            "SELECT COUNT(DISTINCT user_id) FROM t"
        );
    }

    #[test]
    fn test_cast_types() {
        assert_eq!(
            render("SELECT CAST(a AS UNSIGNED), CAST(b AS CHAR(10)) FROM t"),
            "SELECT CAST(a AS DECIMAL(20,0)), CAST(b AS CHAR(10)) FROM t"
        );
    }

    #[test]
    fn test_double_quoted_string_literal() {
        assert_eq!(
            render("SELECT * FROM t WHERE name = \"bob\" AND note LIKE 'a%'"),
            "SELECT * FROM t WHERE name = 'bob' AND note LIKE 'a%'"
        );
    }

    #[test]
    fn test_predicates() {
        assert_eq!(
            render(
                "SELECT CASE WHEN a IS NULL THEN 0 ELSE a END FROM t \
                 WHERE b NOT IN (1, 2) AND c BETWEEN 1 AND 5 AND NOT EXISTS (SELECT 1 FROM s)"
            ),
            "SELECT CASE WHEN a IS NULL THEN 0 ELSE a END FROM t \
             WHERE b NOT IN (1, 2) AND c BETWEEN 1 AND 5 AND NOT EXISTS (SELECT 1 FROM s)"
        );
    }

    #[test]
    fn test_unsupported_function_fails() {
        let err = super::super::tests::render_with(
            "SELECT GROUP_CONCAT(name) FROM t",
            super::super::GeneratorOptions::compact(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("GROUP_CONCAT"));
    }
}
