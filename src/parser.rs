//! MySQL front-end adapter.
//!
//! Splits a script into statements, recognizes each statement's head with
//! nom, and hands the text to `sqlparser` for the strict parse.
//!
//! ```text
//! -- comment                  ┐
//! CREATE TABLE t (...);       ├── split_script → SourceStatement { index: 1, .. }
//! /*!40101 SET NAMES utf8 */; ┘   (comment-only chunks are not statements)
//! ```

use nom::{
    branch::alt,
    character::complete::{multispace0, multispace1},
    combinator::{map, opt, value},
    sequence::{pair, preceded, tuple},
    IResult,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use std::fmt;

use crate::error::{ConvertError, ConvertResult};
use crate::surface::keyword;

static RE_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Line: (\d+), Column: (\d+)").expect("valid location regex"));

/// One statement of a script, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatement {
    /// 1-based position in the script.
    pub index: usize,
    pub text: String,
}

impl SourceStatement {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// First `limit` characters, for log lines.
    pub fn preview(&self, limit: usize) -> String {
        preview(&self.text, limit)
    }
}

/// Object created by a CREATE statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CreateObject {
    Table,
    Index,
    View,
    Database,
    Other,
}

/// The leading keywords of a recognized statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatementHead {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    Create(CreateObject),
    Alter,
    Drop,
    Truncate,
    Set,
    Lock,
    Unlock,
    Use,
    Transaction,
}

impl fmt::Display for StatementHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Replace => "REPLACE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create(CreateObject::Table) => "CREATE TABLE",
            Self::Create(CreateObject::Index) => "CREATE INDEX",
            Self::Create(CreateObject::View) => "CREATE VIEW",
            Self::Create(CreateObject::Database) => "CREATE DATABASE",
            Self::Create(CreateObject::Other) => "CREATE",
            Self::Alter => "ALTER TABLE",
            Self::Drop => "DROP",
            Self::Truncate => "TRUNCATE",
            Self::Set => "SET",
            Self::Lock => "LOCK TABLES",
            Self::Unlock => "UNLOCK TABLES",
            Self::Use => "USE",
            Self::Transaction => "TRANSACTION",
        };
        f.write_str(text)
    }
}

/// Front-end result for one statement.
#[derive(Debug)]
pub enum ParseOutcome {
    /// Parsed into one or more trees.
    Tree(Vec<Statement>),
    /// Recognized head, but the grammar rejected the text.
    Rejected(ConvertError),
    /// No recognizable grammar at all.
    Unrecognized(ConvertError),
}

/// Split a script on `;` outside quotes and comments.
pub fn split_script(script: &str) -> Vec<SourceStatement> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut in_quote: Option<char> = None;
    let mut escape_next = false;
    let mut chars = script.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if let Some(quote) = in_quote {
            match c {
                '\\' if quote != '`' => escape_next = true,
                c if c == quote => in_quote = None,
                _ => {}
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => in_quote = Some(c),
            '#' => skip_line(&mut chars),
            '-' if matches!(chars.peek(), Some((_, '-'))) => {
                let rest = &script[i + 2..];
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    skip_line(&mut chars);
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = '\0';
                for (_, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            ';' => {
                push_statement(&mut statements, &script[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    push_statement(&mut statements, &script[start..]);
    statements
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
    for (_, c) in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}

fn push_statement(statements: &mut Vec<SourceStatement>, chunk: &str) {
    let text = strip_leading_comments(chunk).trim_end();
    if !text.is_empty() {
        statements.push(SourceStatement::new(statements.len() + 1, text));
    }
}

/// Drop whitespace and comments (including `/*! */` conditional comments)
/// ahead of the first token.
pub fn strip_leading_comments(text: &str) -> &str {
    let mut rest = text.trim_start();

    loop {
        let line_comment = rest.starts_with('#')
            || (rest.starts_with("--") && rest[2..].chars().next().is_none_or(char::is_whitespace));

        if line_comment {
            rest = rest.find('\n').map_or("", |end| rest[end + 1..].trim_start());
        } else if let Some(body) = rest.strip_prefix("/*") {
            rest = body.find("*/").map_or("", |end| body[end + 2..].trim_start());
        } else {
            return rest;
        }
    }
}

/// Recognize the leading keywords of a statement.
pub fn recognize(text: &str) -> Option<StatementHead> {
    statement_head(strip_leading_comments(text)).ok().map(|(_, head)| head)
}

fn statement_head(input: &str) -> IResult<&str, StatementHead> {
    alt((
        value(
            StatementHead::Select,
            alt((keyword("SELECT"), keyword("WITH"), nom::bytes::complete::tag("("))),
        ),
        value(StatementHead::Insert, keyword("INSERT")),
        value(StatementHead::Replace, keyword("REPLACE")),
        value(StatementHead::Update, keyword("UPDATE")),
        value(StatementHead::Delete, keyword("DELETE")),
        map(create_head, StatementHead::Create),
        value(
            StatementHead::Alter,
            tuple((
                keyword("ALTER"),
                opt(preceded(multispace1, keyword("IGNORE"))),
                multispace1,
                keyword("TABLE"),
            )),
        ),
        value(StatementHead::Drop, keyword("DROP")),
        value(StatementHead::Truncate, keyword("TRUNCATE")),
        value(StatementHead::Set, keyword("SET")),
        value(StatementHead::Lock, keyword("LOCK")),
        value(StatementHead::Unlock, keyword("UNLOCK")),
        value(StatementHead::Use, keyword("USE")),
        value(
            StatementHead::Transaction,
            alt((
                keyword("START"),
                keyword("BEGIN"),
                keyword("COMMIT"),
                keyword("ROLLBACK"),
            )),
        ),
    ))(input)
}

fn create_head(input: &str) -> IResult<&str, CreateObject> {
    let (input, _) = keyword("CREATE")(input)?;
    let (input, _) = opt(preceded(
        multispace1,
        pair(keyword("OR"), preceded(multispace1, keyword("REPLACE"))),
    ))(input)?;
    let (input, _) = opt(preceded(
        multispace1,
        alt((
            keyword("TEMPORARY"),
            keyword("UNIQUE"),
            keyword("FULLTEXT"),
            keyword("SPATIAL"),
        )),
    ))(input)?;
    let (input, _) = multispace0(input)?;

    let (input, object) = opt(alt((
        value(CreateObject::Table, keyword("TABLE")),
        value(CreateObject::Index, keyword("INDEX")),
        value(CreateObject::View, keyword("VIEW")),
        value(
            CreateObject::Database,
            alt((keyword("DATABASE"), keyword("SCHEMA"))),
        ),
    )))(input)?;

    // mysqldump writes `CREATE ALGORITHM=... DEFINER=... VIEW`
    let object = object.unwrap_or_else(|| {
        if input.to_ascii_uppercase().contains(" VIEW ") {
            CreateObject::View
        } else {
            CreateObject::Other
        }
    });

    Ok((input, object))
}

/// Strict parse with the MySQL grammar.
pub fn parse_sql(text: &str) -> ConvertResult<Vec<Statement>> {
    Parser::parse_sql(&MySqlDialect {}, text).map_err(|e| {
        let message = e.to_string();
        ConvertError::parse(error_position(text, &message), message)
    })
}

/// Run the front-end over one statement.
pub fn parse_statement(text: &str) -> ParseOutcome {
    let Some(head) = recognize(text) else {
        return ParseOutcome::Unrecognized(ConvertError::Unrecognized(preview(text, 100)));
    };

    match parse_sql(text) {
        Ok(trees) if trees.is_empty() => ParseOutcome::Rejected(ConvertError::parse(
            0,
            format!("{} statement produced no tree", head),
        )),
        Ok(trees) => ParseOutcome::Tree(trees),
        Err(e) => ParseOutcome::Rejected(e),
    }
}

/// Byte offset of a `Line: L, Column: C` location inside `text`.
fn error_position(text: &str, message: &str) -> usize {
    let Some(caps) = RE_LOCATION.captures(message) else {
        return 0;
    };
    let line: usize = caps[1].parse().unwrap_or(1);
    let column: usize = caps[2].parse().unwrap_or(1);

    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();

    text[line_start..]
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(offset, _)| line_start + offset)
        .unwrap_or(text.len())
}

/// First `limit` characters of `text`, with `...` when cut.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// One piece of a date format in canonical (strftime) fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeToken {
    Field(&'static str),
    Literal(String),
}

/// Read a MySQL `DATE_FORMAT` pattern. MySQL spells minutes `%i` and
/// month names `%M`; the canonical fields follow strftime.
pub fn canonical_time_tokens(format: &str) -> ConvertResult<Vec<TimeToken>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let field = match chars.next() {
            Some('Y') => "%Y",
            Some('y') => "%y",
            Some('m' | 'c') => "%m",
            Some('d' | 'e') => "%d",
            Some('H' | 'k') => "%H",
            Some('h' | 'I' | 'l') => "%I",
            Some('i') => "%M",
            Some('s' | 'S') => "%S",
            Some('f') => "%f",
            Some('p') => "%p",
            Some('b') => "%b",
            Some('M') => "%B",
            Some('a') => "%a",
            Some('W') => "%A",
            Some('j') => "%j",
            Some('%') => {
                literal.push('%');
                continue;
            }
            Some(other) => {
                return Err(ConvertError::unsupported(format!("date format %{}", other)));
            }
            None => return Err(ConvertError::unsupported("date format ending in %")),
        };

        if !literal.is_empty() {
            tokens.push(TimeToken::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(TimeToken::Field(field));
    }

    if !literal.is_empty() {
        tokens.push(TimeToken::Literal(literal));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(script: &str) -> Vec<String> {
        split_script(script).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_split_basic() {
        let stmts = split_script("SELECT 1; SELECT 2;\nSELECT 3");
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0], SourceStatement::new(1, "SELECT 1"));
        assert_eq!(stmts[2], SourceStatement::new(3, "SELECT 3"));
    }

    #[test]
    fn test_split_respects_quotes() {
        assert_eq!(
            texts("INSERT INTO t VALUES ('a;b', \"c;d\", `e;f`); SELECT 'it\\'s;'"),
            vec![
                "INSERT INTO t VALUES ('a;b', \"c;d\", `e;f`)",
                "SELECT 'it\\'s;'",
            ]
        );
    }

    #[test]
    fn test_split_respects_comments() {
        let script = "-- header; not a statement\n\
                      /*!40101 SET NAMES utf8 */;\n\
                      # another; comment\n\
                      CREATE TABLE t (id INT /* inline; */);\n";
        assert_eq!(texts(script), vec!["CREATE TABLE t (id INT /* inline; */)"]);
    }

    #[test]
    fn test_split_skips_empty_chunks() {
        assert!(split_script(" ;; \n ;").is_empty());
        assert!(split_script("").is_empty());
    }

    #[test]
    fn test_double_dash_needs_whitespace() {
        assert_eq!(texts("SELECT 5--3; SELECT 1"), vec!["SELECT 5--3", "SELECT 1"]);
    }

    #[test]
    fn test_recognize_heads() {
        assert_eq!(recognize("select * from t"), Some(StatementHead::Select));
        assert_eq!(
            recognize("CREATE TABLE IF NOT EXISTS t (a INT)"),
            Some(StatementHead::Create(CreateObject::Table))
        );
        assert_eq!(
            recognize("CREATE UNIQUE INDEX i ON t (a)"),
            Some(StatementHead::Create(CreateObject::Index))
        );
        assert_eq!(
            recognize("CREATE ALGORITHM=UNDEFINED DEFINER=`root`@`%` VIEW v AS SELECT 1"),
            Some(StatementHead::Create(CreateObject::View))
        );
        assert_eq!(recognize("ALTER TABLE t ADD x INT"), Some(StatementHead::Alter));
        assert_eq!(recognize("-- c\nDROP TABLE t"), Some(StatementHead::Drop));
        assert_eq!(recognize("GIBBERISH blah"), None);
        assert_eq!(recognize("SELECTED"), None);
    }

    #[test]
    fn test_parse_statement_outcomes() {
        assert!(matches!(parse_statement("SELECT 1"), ParseOutcome::Tree(t) if t.len() == 1));
        assert!(matches!(
            parse_statement("SELECT * FROM"),
            ParseOutcome::Rejected(ConvertError::Parse { .. })
        ));
        assert!(matches!(
            parse_statement("THIS IS NOT SQL"),
            ParseOutcome::Unrecognized(ConvertError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_error_position() {
        let text = "SELECT a\nFROM t WHERE";
        assert_eq!(error_position(text, "Expected x, found: EOF at Line: 2, Column: 3"), 11);
        assert_eq!(error_position(text, "no location"), 0);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn test_canonical_time_tokens() {
        let tokens = canonical_time_tokens("%Y-%m-%d %H:%i:%s").unwrap();
        assert_eq!(tokens[0], TimeToken::Field("%Y"));
        assert_eq!(tokens[1], TimeToken::Literal("-".to_string()));
        assert_eq!(tokens[8], TimeToken::Field("%M"));
        assert_eq!(tokens.len(), 11);
        assert!(canonical_time_tokens("%Q").is_err());
    }
}
