//! SELECT rendering: set operations, CTEs, joins, ordering and row limits.

use sqlparser::ast::{
    Distinct, Expr, GroupByExpr, Join, JoinConstraint, JoinOperator, LimitClause, OrderBy,
    OrderByExpr, OrderByKind, Query, Select, SelectItem, SetExpr, TableAlias, TableFactor,
    TableWithJoins, Values,
};

use super::{requote, Generator};
use crate::dialect::{ConstructKind, LimitStyle, Rendering};
use crate::error::{ConvertError, ConvertResult};

/// Row limit of one query, already rendered.
#[derive(Debug, Default)]
struct RowLimit {
    limit: Option<String>,
    offset: Option<String>,
}

impl Generator<'_> {
    pub(super) fn query(&self, q: &Query) -> ConvertResult<String> {
        let mut parts = Vec::new();

        if let Some(with) = &q.with {
            let inline = self.inline();
            let ctes = with
                .cte_tables
                .iter()
                .map(|cte| {
                    Ok(format!(
                        "{} AS ({})",
                        self.table_alias(&cte.alias),
                        inline.query(&cte.query)?
                    ))
                })
                .collect::<ConvertResult<Vec<_>>>()?;
            let head = if with.recursive { "WITH RECURSIVE" } else { "WITH" };
            parts.push(format!("{} {}", head, ctes.join(", ")));
        }

        let limit = self.row_limit(q)?;
        let top = match (&limit.limit, &limit.offset, q.body.as_ref()) {
            (Some(n), None, SetExpr::Select(_)) => self.top_keyword().map(|kw| format!("{} {}", kw, n)),
            _ => None,
        };

        parts.push(match (q.body.as_ref(), &top) {
            (SetExpr::Select(select), Some(top)) => self.select(select, Some(top.as_str()))?,
            (body, _) => self.set_expr(body)?,
        });

        if let Some(order_by) = &q.order_by {
            parts.push(self.order_by(order_by)?);
        }

        if top.is_none() {
            if let Some(n) = &limit.limit {
                parts.push(self.limit_clause(n)?);
            }
        }
        if let Some(n) = &limit.offset {
            parts.push(self.offset_clause(n)?);
        }

        if let Some(fetch) = &q.fetch {
            parts.push(requote(&fetch.to_string())?);
        }
        for lock in &q.locks {
            parts.push(requote(&lock.to_string())?);
        }

        Ok(self.clauses(parts))
    }

    fn row_limit(&self, q: &Query) -> ConvertResult<RowLimit> {
        let Some(clause) = &q.limit_clause else {
            return Ok(RowLimit::default());
        };

        match clause {
            LimitClause::LimitOffset {
                limit,
                offset,
                limit_by,
                ..
            } => {
                if !limit_by.is_empty() {
                    return Err(ConvertError::unsupported("LIMIT BY"));
                }
                Ok(RowLimit {
                    limit: limit.as_ref().map(|e| self.expr(e)).transpose()?,
                    offset: offset.as_ref().map(|o| self.expr(&o.value)).transpose()?,
                })
            }
            LimitClause::OffsetCommaLimit { offset, limit, .. } => Ok(RowLimit {
                limit: Some(self.expr(limit)?),
                offset: Some(self.expr(offset)?),
            }),
        }
    }

    /// The TOP keyword, when both the dialect and the caller want it.
    fn top_keyword(&self) -> Option<&'static str> {
        match (self.dialect.construct(ConstructKind::Limit), self.options.limit_style) {
            (Rendering::RowLimit { top, .. }, LimitStyle::Top) => Some(top),
            _ => None,
        }
    }

    fn limit_clause(&self, n: &str) -> ConvertResult<String> {
        match self.require(ConstructKind::Limit)? {
            Rendering::RowLimit { limit, .. } | Rendering::Clause(limit) => {
                Ok(format!("{} {}", limit, n))
            }
            Rendering::Keyword(kw) => Ok(kw.to_string()),
            _ => Ok(format!("LIMIT {}", n)),
        }
    }

    fn offset_clause(&self, n: &str) -> ConvertResult<String> {
        match self.require(ConstructKind::Offset)? {
            Rendering::Clause(kw) | Rendering::RowLimit { limit: kw, .. } => {
                Ok(format!("{} {}", kw, n))
            }
            Rendering::Keyword(kw) => Ok(kw.to_string()),
            _ => Ok(format!("OFFSET {}", n)),
        }
    }

    fn set_expr(&self, body: &SetExpr) -> ConvertResult<String> {
        match body {
            SetExpr::Select(select) => self.select(select, None),
            SetExpr::Query(q) => Ok(format!("({})", self.inline().query(q)?)),
            SetExpr::SetOperation {
                op,
                set_quantifier,
                left,
                right,
            } => {
                let quantifier = set_quantifier.to_string();
                let op = match quantifier.as_str() {
                    "" => op.to_string(),
                    q => format!("{} {}", op, q),
                };
                Ok(self.clauses(vec![self.set_expr(left)?, op, self.set_expr(right)?]))
            }
            SetExpr::Values(values) => self.values(values),
            other => requote(&other.to_string()),
        }
    }

    pub(super) fn values(&self, values: &Values) -> ConvertResult<String> {
        let rows = values
            .rows
            .iter()
            .map(|row| Ok(format!("({})", self.exprs(row)?.join(", "))))
            .collect::<ConvertResult<Vec<_>>>()?;
        Ok(self.list("VALUES", &rows))
    }

    pub(super) fn select(&self, s: &Select, top: Option<&str>) -> ConvertResult<String> {
        let mut head = String::from("SELECT");
        match &s.distinct {
            None => {}
            Some(Distinct::Distinct) => head.push_str(" DISTINCT"),
            Some(_) => return Err(ConvertError::unsupported("DISTINCT ON")),
        }
        if let Some(top) = top {
            head.push(' ');
            head.push_str(top);
        }
        if s.into.is_some() {
            return Err(ConvertError::unsupported("SELECT ... INTO"));
        }
        if !s.named_window.is_empty() {
            return Err(ConvertError::unsupported("named WINDOW clause"));
        }
        if s.qualify.is_some() {
            return Err(ConvertError::unsupported("QUALIFY"));
        }

        let projection = s
            .projection
            .iter()
            .map(|item| self.select_item(item))
            .collect::<ConvertResult<Vec<_>>>()?;
        let mut parts = vec![self.list(&head, &projection)];

        if !s.from.is_empty() {
            let from = s
                .from
                .iter()
                .map(|t| self.table_with_joins(t))
                .collect::<ConvertResult<Vec<_>>>()?;
            parts.push(format!("FROM {}", from.join(", ")));
        }

        if let Some(selection) = &s.selection {
            parts.push(format!("WHERE {}", self.expr(selection)?));
        }

        match &s.group_by {
            GroupByExpr::Expressions(exprs, modifiers) => {
                if !modifiers.is_empty() {
                    return Err(ConvertError::unsupported("GROUP BY modifier"));
                }
                if !exprs.is_empty() {
                    parts.push(self.list("GROUP BY", &self.exprs(exprs)?));
                }
            }
            other => parts.push(requote(&other.to_string())?),
        }

        if let Some(having) = &s.having {
            parts.push(format!("HAVING {}", self.expr(having)?));
        }

        Ok(self.clauses(parts))
    }

    fn select_item(&self, item: &SelectItem) -> ConvertResult<String> {
        match item {
            SelectItem::UnnamedExpr(e) => self.expr(e),
            SelectItem::ExprWithAlias { expr, alias } => {
                Ok(format!("{} AS {}", self.expr(expr)?, self.ident(alias)))
            }
            other => requote(&other.to_string()),
        }
    }

    pub(super) fn table_with_joins(&self, t: &TableWithJoins) -> ConvertResult<String> {
        let mut parts = vec![self.table_factor(&t.relation)?];
        for join in &t.joins {
            parts.push(self.join(join)?);
        }
        Ok(self.clauses(parts))
    }

    fn table_factor(&self, factor: &TableFactor) -> ConvertResult<String> {
        let (base, alias) = match factor {
            TableFactor::Table { name, alias, .. } => (self.object_name(name), alias),
            TableFactor::Derived {
                subquery, alias, ..
            } => (format!("({})", self.inline().query(subquery)?), alias),
            TableFactor::NestedJoin {
                table_with_joins,
                alias,
                ..
            } => (
                format!("({})", self.inline().table_with_joins(table_with_joins)?),
                alias,
            ),
            other => return requote(&other.to_string()),
        };

        match alias {
            None => Ok(base),
            Some(alias) => match self.require(ConstructKind::TableAliasKeyword)? {
                Rendering::Keyword(kw) => Ok(format!("{} {} {}", base, kw, self.table_alias(alias))),
                _ => Ok(format!("{} {}", base, self.table_alias(alias))),
            },
        }
    }

    fn table_alias(&self, alias: &TableAlias) -> String {
        let name = self.ident(&alias.name);
        if alias.columns.is_empty() {
            return name;
        }
        let columns: Vec<String> = alias.columns.iter().map(|c| self.ident(&c.name)).collect();
        format!("{} ({})", name, columns.join(", "))
    }

    fn join(&self, join: &Join) -> ConvertResult<String> {
        let (keyword, constraint) = match &join.join_operator {
            JoinOperator::Join(c) | JoinOperator::Inner(c) => ("JOIN", c),
            JoinOperator::Left(c) | JoinOperator::LeftOuter(c) => ("LEFT JOIN", c),
            JoinOperator::Right(c) | JoinOperator::RightOuter(c) => ("RIGHT JOIN", c),
            JoinOperator::FullOuter(c) => ("FULL JOIN", c),
            _ => return requote(join.to_string().trim()),
        };

        let relation = self.table_factor(&join.relation)?;
        match constraint {
            JoinConstraint::On(e) => Ok(format!("{} {} ON {}", keyword, relation, self.expr(e)?)),
            JoinConstraint::Using(columns) => {
                let columns = columns
                    .iter()
                    .map(|c| requote(&c.to_string()))
                    .collect::<ConvertResult<Vec<_>>>()?;
                Ok(format!("{} {} USING ({})", keyword, relation, columns.join(", ")))
            }
            JoinConstraint::Natural => Ok(format!("NATURAL {} {}", keyword, relation)),
            JoinConstraint::None => Ok(format!("{} {}", keyword, relation)),
        }
    }

    fn order_by(&self, order_by: &OrderBy) -> ConvertResult<String> {
        match &order_by.kind {
            OrderByKind::Expressions(exprs) => {
                let items = exprs
                    .iter()
                    .map(|e| self.order_by_expr(e))
                    .collect::<ConvertResult<Vec<_>>>()?;
                Ok(self.list("ORDER BY", &items))
            }
            _ => Err(ConvertError::unsupported("ORDER BY ALL")),
        }
    }

    pub(super) fn order_by_expr(&self, e: &OrderByExpr) -> ConvertResult<String> {
        let mut sql = self.expr(&e.expr)?;
        match e.options.asc {
            Some(true) => sql.push_str(" ASC"),
            Some(false) => sql.push_str(" DESC"),
            None => {}
        }
        match e.options.nulls_first {
            Some(true) => sql.push_str(" NULLS FIRST"),
            Some(false) => sql.push_str(" NULLS LAST"),
            None => {}
        }
        Ok(sql)
    }

    pub(super) fn exprs(&self, exprs: &[Expr]) -> ConvertResult<Vec<String>> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{render, render_with};
    use super::super::GeneratorOptions;
    use crate::dialect::LimitStyle;
    use crate::error::ConvertError;
    use pretty_assertions::assert_eq;

    fn top() -> GeneratorOptions {
        GeneratorOptions {
            pretty: false,
            limit_style: LimitStyle::Top,
        }
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(
            render("SELECT * FROM users LIMIT 10 OFFSET 5"),
            "SELECT * FROM users LIMIT 10 OFFSET 5"
        );
        assert_eq!(
            render("SELECT * FROM users LIMIT 5, 10"),
            "SELECT * FROM users LIMIT 10 OFFSET 5"
        );
    }

    #[test]
    fn test_top_style() {
        assert_eq!(
            render_with("SELECT a FROM t ORDER BY a LIMIT 3", top()).unwrap(),
            "SELECT TOP 3 a FROM t ORDER BY a"
        );
        // OFFSET has no TOP form.
        assert_eq!(
            render_with("SELECT a FROM t LIMIT 3 OFFSET 1", top()).unwrap(),
            "SELECT a FROM t LIMIT 3 OFFSET 1"
        );
    }

    #[test]
    fn test_table_alias_drops_as() {
        assert_eq!(
            render("SELECT u.id FROM users AS u"),
            "SELECT u.id FROM users u"
        );
    }

    #[test]
    fn test_joins_and_grouping() {
        assert_eq!(
            render(
                "SELECT o.user_id, COUNT(*) AS n FROM orders o LEFT JOIN users u ON u.id = o.user_id \
                 WHERE o.total > 10 GROUP BY o.user_id HAVING COUNT(*) > 1"
            ),
            "SELECT o.user_id, COUNT(*) AS n FROM orders o LEFT JOIN users u ON u.id = o.user_id \
             WHERE o.total > 10 GROUP BY o.user_id HAVING COUNT(*) > 1"
        );
    }

    #[test]
    fn test_union_and_subquery() {
        assert_eq!(
            render("SELECT a FROM t UNION ALL SELECT a FROM (SELECT a FROM s) x"),
            "SELECT a FROM t UNION ALL SELECT a FROM (SELECT a FROM s) x"
        );
    }

    #[test]
    fn test_cte() {
        assert_eq!(
            render("WITH recent AS (SELECT id FROM t) SELECT id FROM recent"),
            "WITH recent AS (SELECT id FROM t) SELECT id FROM recent"
        );
    }

    #[test]
    fn test_distinct_and_order() {
        assert_eq!(
            render("SELECT DISTINCT a FROM t ORDER BY a DESC, b"),
            "SELECT DISTINCT a FROM t ORDER BY a DESC, b"
        );
    }

    #[test]
    fn test_named_window_and_into_rejected() {
        for sql in [
            "SELECT a, ROW_NUMBER() OVER w FROM t WINDOW w AS (ORDER BY a)",
            "SELECT a INTO @x FROM t",
        ] {
            let err = render_with(sql, GeneratorOptions::compact()).unwrap_err();
            assert!(matches!(err, ConvertError::Unsupported { .. }), "{sql}: {err}");
        }
    }
}
