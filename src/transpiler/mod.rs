//! SQL generator for the target dialect.
//!
//! Walks a `sqlparser` statement tree and renders target text. Every
//! structural decision that differs between dialects goes through
//! [`DialectDefinition::construct`]; the walk itself never names a dialect.
//!
//! One source statement may render to several target statements: indexes
//! declared inline and MySQL comments are hoisted into statements of their
//! own, and multi-operation `ALTER TABLE` is split.

mod ddl;
mod dml;
mod expr;
mod query;

use serde::{Deserialize, Serialize};
use sqlparser::ast::{Ident, ObjectName, Statement};
use sqlparser::dialect::MySqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::dialect::{ConstructKind, DialectDefinition, LimitStyle, Rendering, TokenClass};
use crate::error::{ConvertError, ConvertResult};
use crate::parser::{self, CreateObject, StatementHead};

pub use crate::dialect::quote_literal;

/// Separator placed between target statements.
pub const STATEMENT_SEPARATOR: &str = ";\n";

/// Presentation options for rendered SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// One clause per line, list items indented.
    pub pretty: bool,
    pub limit_style: LimitStyle,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            limit_style: LimitStyle::Limit,
        }
    }
}

impl GeneratorOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }
}

/// Trait for rendering source trees as target SQL.
pub trait Transpile {
    /// Render into one or more target statements, without terminators.
    fn transpile(
        &self,
        dialect: &DialectDefinition,
        options: &GeneratorOptions,
    ) -> ConvertResult<Vec<String>>;
}

impl Transpile for Statement {
    fn transpile(
        &self,
        dialect: &DialectDefinition,
        options: &GeneratorOptions,
    ) -> ConvertResult<Vec<String>> {
        Generator::new(dialect, *options).statement(self)
    }
}

/// Tree walker bound to one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'d> {
    dialect: &'d DialectDefinition,
    options: GeneratorOptions,
}

impl<'d> Generator<'d> {
    pub fn new(dialect: &'d DialectDefinition, options: GeneratorOptions) -> Self {
        Self { dialect, options }
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Render one statement into its target statements.
    pub fn statement(&self, stmt: &Statement) -> ConvertResult<Vec<String>> {
        match stmt {
            Statement::Query(q) => Ok(vec![self.query(q)?]),
            Statement::Insert(insert) => Ok(vec![self.insert(insert)?]),
            Statement::Update(update) => Ok(vec![self.update(update)?]),
            Statement::Delete(delete) => Ok(vec![self.delete(delete)?]),
            Statement::CreateTable(create) => self.create_table(create),
            Statement::CreateIndex(create) => self.create_index(create),
            Statement::AlterTable(alter) => self.alter_table(alter),
            Statement::Drop {
                object_type,
                if_exists,
                names,
                cascade,
                ..
            } => Ok(names
                .iter()
                .map(|name| {
                    let mut sql = format!("DROP {}", object_type);
                    if *if_exists {
                        sql.push_str(" IF EXISTS");
                    }
                    sql.push(' ');
                    sql.push_str(&self.object_name(name));
                    if *cascade {
                        sql.push_str(" CASCADE");
                    }
                    sql
                })
                .collect()),
            other => self.passthrough(other),
        }
    }

    /// Statements rendered from their canonical text, gated on the
    /// dialect's construct table.
    fn passthrough(&self, stmt: &Statement) -> ConvertResult<Vec<String>> {
        let text = stmt.to_string();
        let kind = match parser::recognize(&text) {
            Some(StatementHead::Set) => ConstructKind::SessionSet,
            Some(StatementHead::Lock | StatementHead::Unlock) => ConstructKind::LockTables,
            Some(StatementHead::Use) => ConstructKind::UseDatabase,
            Some(StatementHead::Transaction) => ConstructKind::Transaction,
            Some(StatementHead::Truncate) => ConstructKind::Truncate,
            Some(StatementHead::Create(CreateObject::Database)) => ConstructKind::CreateDatabase,
            Some(StatementHead::Create(CreateObject::View)) => ConstructKind::CreateView,
            Some(head) => {
                return Err(ConvertError::unsupported(format!("{} statement", head)));
            }
            None => {
                return Err(ConvertError::unsupported(format!(
                    "statement {}",
                    parser::preview(&text, 40)
                )));
            }
        };

        match self.require(kind)? {
            Rendering::Omit => Ok(Vec::new()),
            _ => Ok(vec![requote(&text)?]),
        }
    }

    /// The construct's rendering, or an error naming it when the target
    /// has no equivalent.
    fn require(&self, kind: ConstructKind) -> ConvertResult<Rendering> {
        match self.dialect.construct(kind) {
            Rendering::Unsupported => Err(ConvertError::unsupported(kind.describe())),
            rendering => Ok(rendering),
        }
    }

    /// A generator for nested queries, which always render inline.
    fn inline(&self) -> Self {
        Self {
            dialect: self.dialect,
            options: GeneratorOptions {
                pretty: false,
                ..self.options
            },
        }
    }

    fn ident(&self, ident: &Ident) -> String {
        match ident.quote_style {
            Some(_) => quote_ident(&ident.value),
            None => self.bare_word(&ident.value),
        }
    }

    /// A bare identifier, quoted only when the target reserves it.
    fn bare_word(&self, word: &str) -> String {
        match self.dialect.classify_keyword(word) {
            TokenClass::Reserved => quote_ident(word),
            _ => word.to_string(),
        }
    }

    fn object_name(&self, name: &ObjectName) -> String {
        name.0
            .iter()
            .map(|part| match part.as_ident() {
                Some(ident) => self.ident(ident),
                None => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// `HEAD a, b` or, in pretty mode, each item on its own indented line.
    fn list(&self, head: &str, items: &[String]) -> String {
        if self.options.pretty {
            format!("{}\n  {}", head, items.join(",\n  "))
        } else {
            format!("{} {}", head, items.join(", "))
        }
    }

    /// Parenthesized item list, as in a column block.
    fn block(&self, head: &str, items: &[String]) -> String {
        if self.options.pretty {
            format!("{} (\n  {}\n)", head, items.join(",\n  "))
        } else {
            format!("{} ({})", head, items.join(", "))
        }
    }

    fn clauses(&self, parts: Vec<String>) -> String {
        let sep = if self.options.pretty { "\n" } else { " " };
        parts.join(sep)
    }
}

/// Double-quoted identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Rewrite MySQL quoting in canonical text: backtick identifiers become
/// double-quoted, double-quoted strings become single-quoted.
pub fn requote(text: &str) -> ConvertResult<String> {
    let dialect = MySqlDialect {};
    let tokens = Tokenizer::new(&dialect, text)
        .tokenize()
        .map_err(|e| ConvertError::Tokenize(e.to_string()))?;

    let mut out = String::with_capacity(text.len());
    for token in tokens {
        match token {
            Token::Word(word) if word.quote_style.is_some() => out.push_str(&quote_ident(&word.value)),
            Token::DoubleQuotedString(s) | Token::SingleQuotedString(s) => {
                out.push_str(&quote_literal(&s))
            }
            other => out.push_str(&other.to_string()),
        }
    }

    Ok(out)
}

/// Collapse layout so pretty and compact renderings compare equal.
pub fn squash_whitespace(sql: &str) -> String {
    sql.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")")
}
