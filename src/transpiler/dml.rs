//! INSERT, UPDATE and DELETE.

use sqlparser::ast::{
    Assignment, AssignmentTarget, Delete, FromTable, Insert, OnInsert, SetExpr, TableObject,
    Update,
};

use super::{requote, Generator};
use crate::dialect::{ConstructKind, Rendering};
use crate::error::{ConvertError, ConvertResult};

impl Generator<'_> {
    pub(super) fn insert(&self, insert: &Insert) -> ConvertResult<String> {
        let verb = if insert.replace_into {
            match self.require(ConstructKind::ReplaceInto)? {
                Rendering::Keyword(kw) => kw,
                _ => "REPLACE",
            }
        } else {
            "INSERT"
        };

        let mut head = verb.to_string();
        if insert.ignore {
            match self.require(ConstructKind::InsertIgnore)? {
                Rendering::Omit => {}
                Rendering::Keyword(kw) => {
                    head.push(' ');
                    head.push_str(kw);
                }
                _ => head.push_str(" IGNORE"),
            }
        }

        let table = match &insert.table {
            TableObject::TableName(name) => self.object_name(name),
            other => requote(&other.to_string())?,
        };
        head.push_str(" INTO ");
        head.push_str(&table);

        let mut columns: Vec<String> = insert.columns.iter().map(|c| self.ident(c)).collect();

        let source = match &insert.source {
            Some(source) => {
                if let SetExpr::Values(values) = source.body.as_ref() {
                    if values.rows.len() > 1 {
                        self.require(ConstructKind::MultiRowInsert)?;
                    }
                }
                self.query(source)?
            }
            // INSERT ... SET a = 1 becomes a single-row VALUES list.
            None if !insert.assignments.is_empty() => {
                let mut values = Vec::with_capacity(insert.assignments.len());
                for assignment in &insert.assignments {
                    columns.push(self.assignment_target(&assignment.target)?);
                    values.push(self.expr(&assignment.value)?);
                }
                format!("VALUES ({})", values.join(", "))
            }
            None => "DEFAULT VALUES".to_string(),
        };

        if !columns.is_empty() {
            head.push_str(&format!(" ({})", columns.join(", ")));
        }
        let mut parts = vec![head, source];

        match &insert.on {
            None => {}
            Some(OnInsert::DuplicateKeyUpdate(assignments)) => {
                self.require(ConstructKind::OnDuplicateKeyUpdate)?;
                parts.push(self.list("ON DUPLICATE KEY UPDATE", &self.assignments(assignments)?));
            }
            Some(other) => parts.push(requote(&other.to_string())?),
        }

        Ok(self.clauses(parts))
    }

    pub(super) fn update(&self, update: &Update) -> ConvertResult<String> {
        if update.from.is_some() {
            return Err(ConvertError::unsupported("UPDATE ... FROM"));
        }
        if update.limit.is_some() {
            return Err(ConvertError::unsupported("UPDATE with LIMIT"));
        }
        if update.returning.is_some() {
            return Err(ConvertError::unsupported("UPDATE ... RETURNING"));
        }
        if update.or.is_some() {
            return Err(ConvertError::unsupported("UPDATE OR conflict clause"));
        }

        let mut parts = vec![format!("UPDATE {}", self.table_with_joins(&update.table)?)];
        parts.push(self.list("SET", &self.assignments(&update.assignments)?));
        if let Some(selection) = &update.selection {
            parts.push(format!("WHERE {}", self.expr(selection)?));
        }

        Ok(self.clauses(parts))
    }

    pub(super) fn delete(&self, delete: &Delete) -> ConvertResult<String> {
        if !delete.tables.is_empty() || delete.using.is_some() {
            return Err(ConvertError::unsupported("multi-table DELETE"));
        }
        if !delete.order_by.is_empty() || delete.limit.is_some() {
            return Err(ConvertError::unsupported("DELETE with ORDER BY/LIMIT"));
        }

        let tables = match &delete.from {
            FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
        };
        let tables = tables
            .iter()
            .map(|t| self.table_with_joins(t))
            .collect::<ConvertResult<Vec<_>>>()?;

        let mut parts = vec![format!("DELETE FROM {}", tables.join(", "))];
        if let Some(selection) = &delete.selection {
            parts.push(format!("WHERE {}", self.expr(selection)?));
        }

        Ok(self.clauses(parts))
    }

    fn assignments(&self, assignments: &[Assignment]) -> ConvertResult<Vec<String>> {
        assignments
            .iter()
            .map(|a| {
                Ok(format!(
                    "{} = {}",
                    self.assignment_target(&a.target)?,
                    self.expr(&a.value)?
                ))
            })
            .collect()
    }

    fn assignment_target(&self, target: &AssignmentTarget) -> ConvertResult<String> {
        match target {
            AssignmentTarget::ColumnName(name) => Ok(self.object_name(name)),
            AssignmentTarget::Tuple(names) => Ok(format!(
                "({})",
                names
                    .iter()
                    .map(|n| self.object_name(n))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{render, render_with};
    use super::super::GeneratorOptions;
    use crate::error::ConvertError;
    use pretty_assertions::assert_eq;

    fn unsupported(sql: &str) -> String {
        match render_with(sql, GeneratorOptions::compact()) {
            Err(ConvertError::Unsupported { construct }) => construct,
            other => panic!("expected unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_row_insert() {
        assert_eq!(
            render("INSERT INTO `users` (`id`, `name`) VALUES (1, 'a'), (2, \"b\")"),
            "INSERT INTO \"users\" (\"id\", \"name\") VALUES (1, 'a'), (2, 'b')"
        );
    }

    #[test]
    fn test_insert_select() {
        assert_eq!(
            render("INSERT INTO archive (id) SELECT id FROM users WHERE active = 0"),
            "INSERT INTO archive (id) SELECT id FROM users WHERE active = 0"
        );
    }

    #[test]
    fn test_insert_set_becomes_values() {
        assert_eq!(
            render("INSERT INTO t SET a = 1, b = 'x'"),
            "INSERT INTO t (a, b) VALUES (1, 'x')"
        );
    }

    #[test]
    fn test_mysql_only_inserts() {
        assert_eq!(unsupported("INSERT IGNORE INTO t (a) VALUES (1)"), "INSERT IGNORE");
        assert_eq!(unsupported("REPLACE INTO t (a) VALUES (1)"), "REPLACE INTO");
        assert_eq!(
            unsupported("INSERT INTO t (a) VALUES (1) ON DUPLICATE KEY UPDATE a = 2"),
            "ON DUPLICATE KEY UPDATE"
        );
    }

    #[test]
    fn test_update_limit_not_dropped() {
        assert_eq!(
            unsupported("UPDATE t SET a = 1 WHERE b = 2 LIMIT 1"),
            "UPDATE with LIMIT"
        );
    }

    #[test]
    fn test_update_and_delete() {
        assert_eq!(
            render("UPDATE users SET name = 'x', age = age + 1 WHERE id = 3"),
            "UPDATE users SET name = 'x', age = age + 1 WHERE id = 3"
        );
        assert_eq!(
            render("DELETE FROM users WHERE id = 3"),
            "DELETE FROM users WHERE id = 3"
        );
        assert_eq!(unsupported("DELETE FROM users LIMIT 10"), "DELETE with ORDER BY/LIMIT");
    }
}
