//! CREATE TABLE, CREATE INDEX and ALTER TABLE.
//!
//! Column options, table constraints and table options are classified from
//! their canonical text with the `surface` grammar, then rendered through
//! the dialect's construct table. Hoisted pieces (inline indexes, comments)
//! come back as separate statements after the owning one.
//!
//! ```text
//! CREATE TABLE t (            CREATE TABLE t (
//!   id INT AUTO_INCREMENT,      id INT IDENTITY,
//!   KEY idx_a (a)        ──►    ...
//! ) COMMENT='users'           );
//!                             CREATE INDEX idx_a ON t (a);
//!                             COMMENT ON TABLE t IS 'users'
//! ```

use sqlparser::ast::{
    AlterTable, AlterTableOperation, ColumnDef, ColumnOption, CreateIndex, CreateTable, DataType,
    Ident, ObjectName, RenameTableNameKind,
};

use super::{quote_ident, quote_literal, requote, Generator};
use crate::dialect::{ConstructKind, Rendering};
use crate::error::{ConvertError, ConvertResult};
use crate::surface::{self, ColumnOptionClass, IndexDef, IndexKind, SurfaceIdent, TableOption};
use crate::types::SourceType;

/// The table a DDL statement works on.
struct Owner {
    /// Name as rendered in target SQL.
    rendered: String,
    /// Unquoted last name part, for generated index names.
    plain: String,
}

impl Owner {
    fn new(generator: &Generator<'_>, name: &ObjectName) -> Self {
        let plain = name
            .0
            .last()
            .and_then(|part| part.as_ident())
            .map(|ident| ident.value.clone())
            .unwrap_or_else(|| name.to_string());
        Self {
            rendered: generator.object_name(name),
            plain,
        }
    }
}

/// Where a key definition ends up.
enum Placement {
    /// Stays inside the owning statement.
    Inline(String),
    /// Becomes a statement of its own.
    Hoisted(String),
    Dropped,
}

/// Statements that follow the owning one: indexes, then the table
/// comment, then column comments.
#[derive(Default)]
struct Hoisted {
    indexes: Vec<String>,
    table_comments: Vec<String>,
    column_comments: Vec<String>,
}

impl Hoisted {
    fn append_to(self, out: &mut Vec<String>) {
        out.extend(self.indexes);
        out.extend(self.table_comments);
        out.extend(self.column_comments);
    }
}

impl Generator<'_> {
    pub(super) fn create_table(&self, create: &CreateTable) -> ConvertResult<Vec<String>> {
        let display = create.to_string();
        // CREATE TABLE ... LIKE / AS SELECT carry no column block.
        if create.columns.is_empty() {
            return Ok(vec![requote(&display)?]);
        }

        let owner = Owner::new(self, &create.name);
        let mut hoisted = Hoisted::default();

        let mut head = String::from("CREATE ");
        if create.temporary {
            head.push_str("TEMPORARY ");
        }
        head.push_str("TABLE ");
        if create.if_not_exists {
            head.push_str("IF NOT EXISTS ");
        }
        head.push_str(&owner.rendered);

        let mut items = Vec::with_capacity(create.columns.len() + create.constraints.len());
        for column in &create.columns {
            items.push(self.column_def(column, &owner, &mut hoisted)?);
        }
        for constraint in &create.constraints {
            match self.key_definition(&constraint.to_string(), &owner, ConstructKind::InlineIndex)? {
                Placement::Inline(sql) => items.push(sql),
                Placement::Hoisted(sql) => hoisted.indexes.push(sql),
                Placement::Dropped => {}
            }
        }

        let mut sql = self.block(&head, &items);
        let options = match options_tail(&display) {
            Some(tail) => surface::table_options(tail)?,
            None => Vec::new(),
        };
        let inline = self.table_options(&options, &owner, &mut hoisted)?;
        if !inline.is_empty() {
            sql.push(' ');
            sql.push_str(&inline.join(" "));
        }

        let mut out = vec![sql];
        hoisted.append_to(&mut out);
        Ok(out)
    }

    pub(super) fn create_index(&self, create: &CreateIndex) -> ConvertResult<Vec<String>> {
        let owner = Owner::new(self, &create.table_name);
        if create.predicate.is_some() {
            return Err(ConvertError::unsupported("partial index"));
        }

        let mut method = None;
        let display = create.to_string().to_ascii_uppercase();
        if create.using.is_some() || display.contains(" USING ") {
            if let Rendering::Generic = self.require(ConstructKind::IndexMethodHint)? {
                method = create.using.as_ref().map(|m| format!(" USING {}", m));
            }
        }

        let columns = create
            .columns
            .iter()
            .map(|c| self.order_by_expr(&c.column))
            .collect::<ConvertResult<Vec<_>>>()?;

        let name = match &create.name {
            Some(name) => self.object_name(name),
            None => {
                let parts: Vec<String> = create.columns.iter().map(|c| c.column.expr.to_string()).collect();
                generated_index_name(&owner.plain, &parts)
            }
        };

        let mut sql = String::from("CREATE ");
        if create.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        if create.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&format!("{} ON {} ({})", name, owner.rendered, columns.join(", ")));
        if let Some(method) = method {
            sql.push_str(&method);
        }

        Ok(vec![sql])
    }

    pub(super) fn alter_table(&self, alter: &AlterTable) -> ConvertResult<Vec<String>> {
        let owner = Owner::new(self, &alter.name);
        let head = if alter.if_exists {
            format!("ALTER TABLE IF EXISTS {}", owner.rendered)
        } else {
            format!("ALTER TABLE {}", owner.rendered)
        };

        let mut out = Vec::new();
        for op in &alter.operations {
            let mut hoisted = Hoisted::default();
            for action in self.alter_operation(op, &owner, &mut hoisted)? {
                out.push(format!("{} {}", head, action));
            }
            hoisted.append_to(&mut out);
        }

        Ok(out)
    }

    /// Actions for one ALTER TABLE operation, each to be prefixed with the
    /// `ALTER TABLE` head.
    fn alter_operation(
        &self,
        op: &AlterTableOperation,
        owner: &Owner,
        hoisted: &mut Hoisted,
    ) -> ConvertResult<Vec<String>> {
        match op {
            AlterTableOperation::AddColumn {
                column_def,
                column_position,
                ..
            } => {
                let mut action = format!("ADD COLUMN {}", self.column_def(column_def, owner, hoisted)?);
                if let Some(position) = column_position {
                    if let Rendering::Generic = self.require(ConstructKind::ColumnPosition)? {
                        action.push(' ');
                        action.push_str(&requote(&position.to_string())?);
                    }
                }
                Ok(vec![action])
            }
            AlterTableOperation::DropColumn {
                column_names,
                if_exists,
                ..
            } => Ok(column_names
                .iter()
                .map(|c| {
                    let exists = if *if_exists { "IF EXISTS " } else { "" };
                    format!("DROP COLUMN {}{}", exists, self.ident(c))
                })
                .collect()),
            AlterTableOperation::ModifyColumn {
                col_name,
                data_type,
                options,
                column_position,
                ..
            } => {
                self.column_position(column_position.is_some())?;
                let body = self.column_body(
                    col_name,
                    data_type,
                    options.iter().map(|o| (None, o)),
                    owner,
                    hoisted,
                )?;
                Ok(vec![format!("MODIFY {}", body)])
            }
            AlterTableOperation::ChangeColumn {
                old_name,
                new_name,
                data_type,
                options,
                column_position,
                ..
            } => {
                self.column_position(column_position.is_some())?;
                let mut actions = Vec::new();
                if old_name.value != new_name.value {
                    actions.push(format!(
                        "RENAME COLUMN {} TO {}",
                        self.ident(old_name),
                        self.ident(new_name)
                    ));
                }
                let body = self.column_body(
                    new_name,
                    data_type,
                    options.iter().map(|o| (None, o)),
                    owner,
                    hoisted,
                )?;
                actions.push(format!("MODIFY {}", body));
                Ok(actions)
            }
            AlterTableOperation::RenameColumn {
                old_column_name,
                new_column_name,
                ..
            } => Ok(vec![format!(
                "RENAME COLUMN {} TO {}",
                self.ident(old_column_name),
                self.ident(new_column_name)
            )]),
            AlterTableOperation::RenameTable { table_name, .. } => {
                let name = match table_name {
                    RenameTableNameKind::As(name) | RenameTableNameKind::To(name) => name,
                };
                Ok(vec![format!("RENAME TO {}", self.object_name(name))])
            }
            AlterTableOperation::AddConstraint { constraint, .. } => {
                match self.key_definition(&constraint.to_string(), owner, ConstructKind::AlterAddIndex)? {
                    Placement::Inline(sql) => Ok(vec![format!("ADD {}", sql)]),
                    Placement::Hoisted(sql) => {
                        hoisted.indexes.push(sql);
                        Ok(Vec::new())
                    }
                    Placement::Dropped => Ok(Vec::new()),
                }
            }
            other => {
                let text = other.to_string();
                match surface::table_options(&text) {
                    Ok(options)
                        if !options.is_empty()
                            && options.iter().all(|o| option_kind(&o.key) != ConstructKind::TableOption) =>
                    {
                        let inline = self.table_options(&options, owner, hoisted)?;
                        Ok(if inline.is_empty() { Vec::new() } else { vec![inline.join(" ")] })
                    }
                    _ => Ok(vec![requote(&text)?]),
                }
            }
        }
    }

    fn column_position(&self, present: bool) -> ConvertResult<()> {
        if present {
            self.require(ConstructKind::ColumnPosition)?;
        }
        Ok(())
    }

    fn column_def(&self, column: &ColumnDef, owner: &Owner, hoisted: &mut Hoisted) -> ConvertResult<String> {
        self.column_body(
            &column.name,
            &column.data_type,
            column.options.iter().map(|def| (def.name.as_ref(), &def.option)),
            owner,
            hoisted,
        )
    }

    fn column_body<'o>(
        &self,
        name: &Ident,
        data_type: &DataType,
        options: impl Iterator<Item = (Option<&'o Ident>, &'o ColumnOption)>,
        owner: &Owner,
        hoisted: &mut Hoisted,
    ) -> ConvertResult<String> {
        let column = self.ident(name);
        let ty = SourceType::classify(&data_type.to_string())?;
        let mut parts = vec![column.clone(), self.dialect.render_type(&ty)?];

        for (constraint, option) in options {
            let Some(text) = self.column_option(option, owner, &column, hoisted)? else {
                continue;
            };
            match constraint {
                Some(c) => parts.push(format!("CONSTRAINT {} {}", self.ident(c), text)),
                None => parts.push(text),
            }
        }

        Ok(parts.join(" "))
    }

    fn column_option(
        &self,
        option: &ColumnOption,
        owner: &Owner,
        column: &str,
        hoisted: &mut Hoisted,
    ) -> ConvertResult<Option<String>> {
        if let ColumnOption::Default(e) = option {
            return Ok(Some(format!("DEFAULT {}", self.expr(e)?)));
        }

        let text = option.to_string();
        let kind = match surface::column_option(&text) {
            ColumnOptionClass::Null => return Ok(Some("NULL".to_string())),
            ColumnOptionClass::NotNull => return Ok(Some("NOT NULL".to_string())),
            ColumnOptionClass::PrimaryKey => return Ok(Some("PRIMARY KEY".to_string())),
            ColumnOptionClass::Unique => return Ok(Some("UNIQUE".to_string())),
            ColumnOptionClass::Comment(body) => {
                return match self.require(ConstructKind::ColumnComment)? {
                    Rendering::Hoist => {
                        hoisted.column_comments.push(format!(
                            "COMMENT ON COLUMN {}.{} IS {}",
                            owner.rendered,
                            column,
                            quote_literal(&body)
                        ));
                        Ok(None)
                    }
                    Rendering::Omit => Ok(None),
                    _ => Ok(Some(format!("COMMENT {}", quote_literal(&body)))),
                };
            }
            ColumnOptionClass::AutoIncrement => ConstructKind::AutoIncrement,
            ColumnOptionClass::OnUpdate => ConstructKind::OnUpdateColumn,
            ColumnOptionClass::Charset => ConstructKind::ColumnCharset,
            ColumnOptionClass::Collation => ConstructKind::ColumnCollation,
            ColumnOptionClass::Generated => ConstructKind::GeneratedColumn,
            ColumnOptionClass::Other => return Ok(Some(requote(&text)?)),
        };

        match self.require(kind)? {
            Rendering::Keyword(kw) => Ok(Some(kw.to_string())),
            Rendering::Omit => Ok(None),
            _ => Ok(Some(requote(&text)?)),
        }
    }

    /// Render a table-level key, constraint or index definition.
    fn key_definition(&self, text: &str, owner: &Owner, plain_kind: ConstructKind) -> ConvertResult<Placement> {
        let Some(def) = surface::index_def(text) else {
            // Foreign keys and checks pass through.
            return Ok(Placement::Inline(requote(text)?));
        };

        let mut method = String::new();
        if let Some(m) = &def.method {
            if let Rendering::Generic = self.require(ConstructKind::IndexMethodHint)? {
                method = format!(" USING {}", m);
            }
        }
        let columns = self.index_columns(&def)?;

        let kind = match def.kind {
            IndexKind::Primary => {
                let constraint = self.constraint_prefix(def.constraint.as_ref());
                return Ok(Placement::Inline(format!("{}PRIMARY KEY ({}){}", constraint, columns, method)));
            }
            IndexKind::Unique => {
                let constraint = self.constraint_prefix(def.constraint.as_ref().or(def.name.as_ref()));
                return Ok(Placement::Inline(format!("{}UNIQUE ({}){}", constraint, columns, method)));
            }
            IndexKind::Plain => plain_kind,
            IndexKind::FullText => ConstructKind::FullTextIndex,
            IndexKind::Spatial => ConstructKind::SpatialIndex,
        };

        let name = match &def.name {
            Some(name) => self.surface_ident(name),
            None => {
                let parts: Vec<String> = def.parts.iter().map(|p| p.column.value.clone()).collect();
                generated_index_name(&owner.plain, &parts)
            }
        };

        match self.require(kind)? {
            Rendering::Hoist => Ok(Placement::Hoisted(format!(
                "CREATE INDEX {} ON {} ({})",
                name, owner.rendered, columns
            ))),
            Rendering::Omit => Ok(Placement::Dropped),
            _ => {
                let keyword = match def.kind {
                    IndexKind::FullText => "FULLTEXT INDEX",
                    IndexKind::Spatial => "SPATIAL INDEX",
                    _ => "INDEX",
                };
                Ok(Placement::Inline(format!("{} {} ({}){}", keyword, name, columns, method)))
            }
        }
    }

    fn index_columns(&self, def: &IndexDef) -> ConvertResult<String> {
        let mut columns = Vec::with_capacity(def.parts.len());
        for part in &def.parts {
            let mut column = self.surface_ident(&part.column);
            if let Some(prefix) = &part.prefix {
                if let Rendering::Generic = self.require(ConstructKind::IndexPrefixLength)? {
                    column.push_str(&format!("({})", prefix));
                }
            }
            if part.descending {
                column.push_str(" DESC");
            }
            columns.push(column);
        }
        Ok(columns.join(", "))
    }

    fn constraint_prefix(&self, name: Option<&SurfaceIdent>) -> String {
        name.map(|n| format!("CONSTRAINT {} ", self.surface_ident(n)))
            .unwrap_or_default()
    }

    fn surface_ident(&self, ident: &SurfaceIdent) -> String {
        if ident.quoted {
            quote_ident(&ident.value)
        } else {
            self.bare_word(&ident.value)
        }
    }

    /// Apply the construct table to `key = value` table options, returning
    /// what stays inline.
    fn table_options(
        &self,
        options: &[TableOption],
        owner: &Owner,
        hoisted: &mut Hoisted,
    ) -> ConvertResult<Vec<String>> {
        let mut inline = Vec::new();

        for option in options {
            let kind = option_kind(&option.key);
            match self.dialect.construct(kind) {
                Rendering::Unsupported if kind == ConstructKind::TableOption => {
                    return Err(ConvertError::unsupported(format!("table option {}", option.key)));
                }
                Rendering::Unsupported => return Err(ConvertError::unsupported(kind.describe())),
                Rendering::Omit => {}
                Rendering::Hoist => {
                    let body = surface::unquote_string(&option.value).unwrap_or_else(|| option.value.clone());
                    hoisted.table_comments.push(format!(
                        "COMMENT ON TABLE {} IS {}",
                        owner.rendered,
                        quote_literal(&body)
                    ));
                }
                Rendering::Keyword(kw) => inline.push(kw.to_string()),
                _ => inline.push(format!("{}={}", option.key, option.value)),
            }
        }

        Ok(inline)
    }
}

fn option_kind(key: &str) -> ConstructKind {
    match key {
        "ENGINE" => ConstructKind::TableEngine,
        "CHARSET" => ConstructKind::TableCharset,
        "COLLATE" => ConstructKind::TableCollation,
        "COMMENT" => ConstructKind::TableComment,
        "AUTO_INCREMENT" => ConstructKind::TableAutoIncrementSeed,
        "ROW_FORMAT" => ConstructKind::TableRowFormat,
        _ => ConstructKind::TableOption,
    }
}

/// `idx_<table>_<columns>` for keys declared without a name.
fn generated_index_name(table: &str, columns: &[String]) -> String {
    let mut name = format!("idx_{}", table);
    for column in columns {
        name.push('_');
        name.extend(
            column
                .chars()
                .map(|c| if c.is_alphanumeric() { c } else { '_' }),
        );
    }
    name
}

/// Text after the column block of a rendered CREATE TABLE.
fn options_tail(display: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in display.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&display[i + 1..]);
                }
            }
            _ => {}
        }
    }

    None
}
