//! Surface grammar for MySQL DDL fragments using nom.
//!
//! The front-end hands over data types, column options, table constraints
//! and table options as canonical SQL text. These parsers recover the
//! pieces the dialect tables key on.
//!
//! ```text
//! BIGINT(20) UNSIGNED ZEROFILL
//! ──┬─── ─┬─ ────────┬───────
//!   │     │          └── modifiers
//!   │     └── params
//!   └── type name (may span words: DOUBLE PRECISION)
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, multispace0, multispace1, none_of},
    combinator::{map, opt, recognize, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{ConvertError, ConvertResult};

/// An identifier as written, with its quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceIdent {
    pub value: String,
    pub quoted: bool,
}

/// A data type split into name, parameters and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    /// Upper-cased, single-spaced name.
    pub name: String,
    pub params: Vec<String>,
    pub unsigned: bool,
}

/// Index flavour of a table-level key definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Primary,
    Unique,
    Plain,
    FullText,
    Spatial,
}

/// One column reference inside an index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPart {
    pub column: SurfaceIdent,
    pub prefix: Option<String>,
    pub descending: bool,
}

/// A table-level key or index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub kind: IndexKind,
    pub constraint: Option<SurfaceIdent>,
    pub name: Option<SurfaceIdent>,
    /// Index method hint, e.g. `BTREE`, wherever it was written.
    pub method: Option<String>,
    pub parts: Vec<IndexPart>,
}

/// Column-level option classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOptionClass {
    Null,
    NotNull,
    PrimaryKey,
    Unique,
    AutoIncrement,
    OnUpdate,
    Charset,
    Collation,
    Comment(String),
    Generated,
    Other,
}

/// One `key = value` table option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOption {
    /// Upper-cased key with `DEFAULT` dropped, e.g. `CHARSET`.
    pub key: String,
    pub value: String,
}

/// Parse a data type's canonical text.
pub fn data_type(text: &str) -> ConvertResult<ParsedType> {
    let text = text.trim();

    match parse_data_type(text) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((remaining, _)) => Err(ConvertError::malformed(
            "data type",
            format!("{} (trailing '{}')", text, remaining),
        )),
        Err(_) => Err(ConvertError::malformed("data type", text)),
    }
}

/// Parse a table-level key/index definition. `None` for constraints that
/// are not keys (foreign keys, checks).
pub fn index_def(text: &str) -> Option<IndexDef> {
    match parse_index_def(text.trim()) {
        Ok((rest, def)) if rest.trim().is_empty() => Some(def),
        _ => None,
    }
}

/// Parse the option list that follows a CREATE TABLE column block.
pub fn table_options(text: &str) -> ConvertResult<Vec<TableOption>> {
    let text = text.trim();

    match parse_table_options(text) {
        Ok((rest, options)) if rest.trim().is_empty() => Ok(options),
        _ => Err(ConvertError::malformed("table options", text)),
    }
}

/// Classify one column option by its leading keywords.
pub fn column_option(text: &str) -> ColumnOptionClass {
    let upper = text.trim().to_ascii_uppercase();
    let words: Vec<&str> = upper.split_whitespace().collect();

    match words.as_slice() {
        ["NULL"] => ColumnOptionClass::Null,
        ["NOT", "NULL"] => ColumnOptionClass::NotNull,
        ["PRIMARY", "KEY", ..] => ColumnOptionClass::PrimaryKey,
        ["UNIQUE", ..] => ColumnOptionClass::Unique,
        ["AUTO_INCREMENT"] | ["AUTOINCREMENT"] => ColumnOptionClass::AutoIncrement,
        ["ON", "UPDATE", ..] => ColumnOptionClass::OnUpdate,
        ["CHARACTER", "SET", ..] | ["CHARSET", ..] => ColumnOptionClass::Charset,
        ["COLLATE", ..] => ColumnOptionClass::Collation,
        ["GENERATED", ..] | ["AS", ..] => ColumnOptionClass::Generated,
        ["COMMENT", ..] => match comment_body(text.trim()) {
            Ok((_, body)) => ColumnOptionClass::Comment(body),
            Err(_) => ColumnOptionClass::Other,
        },
        _ => ColumnOptionClass::Other,
    }
}

/// Unquote a single-quoted SQL string literal.
pub fn unquote_string(text: &str) -> Option<String> {
    match string_literal(text.trim()) {
        Ok(("", s)) => Some(s),
        _ => None,
    }
}

fn parse_data_type(input: &str) -> IResult<&str, ParsedType> {
    let (input, first) = type_word(input)?;
    let (input, more) = many0(preceded(multispace1, continuation_word))(input)?;
    let (input, params) = opt(preceded(multispace0, param_list))(input)?;
    let (input, modifiers) = many0(preceded(multispace1, type_word))(input)?;

    let mut name = std::iter::once(first)
        .chain(more)
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut unsigned = false;
    let mut suffix = Vec::new();
    for word in modifiers {
        match word.to_ascii_uppercase().as_str() {
            "UNSIGNED" => unsigned = true,
            "SIGNED" | "ZEROFILL" => {}
            other => suffix.push(other.to_string()),
        }
    }

    match suffix.join(" ").as_str() {
        "" | "WITHOUT TIME ZONE" => {}
        tail => {
            name.push(' ');
            name.push_str(tail);
        }
    }

    Ok((
        input,
        ParsedType {
            name,
            params: params.unwrap_or_default(),
            unsigned,
        },
    ))
}

fn type_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Words that extend a multi-word type name before its parameters.
fn continuation_word(input: &str) -> IResult<&str, &str> {
    alt((
        tag_no_case("PRECISION"),
        tag_no_case("VARYING"),
        tag_no_case("INTEGER"),
        tag_no_case("CHARACTER"),
        tag_no_case("CHAR"),
        tag_no_case("VARCHAR"),
        tag_no_case("VARBINARY"),
    ))(input)
}

/// `(10, 2)` or `('a', 'b')`.
fn param_list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        pair(char('('), multispace0),
        separated_list1(
            tuple((multispace0, char(','), multispace0)),
            map(param, str::to_string),
        ),
        pair(multispace0, char(')')),
    )(input)
}

fn param(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(string_literal),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    ))(input)
}

/// `'it''s'` -> `it's`
fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, _) = char('\'')(input)?;
    let (input, chunks) = many0(alt((
        value('\'', tag("''")),
        value('\'', tag("\\'")),
        none_of("'"),
    )))(input)?;
    let (input, _) = char('\'')(input)?;

    Ok((input, chunks.into_iter().collect()))
}

fn identifier(input: &str) -> IResult<&str, SurfaceIdent> {
    alt((
        map(quoted_ident('`'), |value| SurfaceIdent {
            value,
            quoted: true,
        }),
        map(quoted_ident('"'), |value| SurfaceIdent {
            value,
            quoted: true,
        }),
        map(
            take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
            |s: &str| SurfaceIdent {
                value: s.to_string(),
                quoted: false,
            },
        ),
    ))(input)
}

fn quoted_ident(quote: char) -> impl Fn(&str) -> IResult<&str, String> {
    move |input: &str| {
        let (input, _) = char(quote)(input)?;
        let mut out = String::new();
        let mut chars = input.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == quote {
                if matches!(chars.peek(), Some((_, next)) if *next == quote) {
                    out.push(quote);
                    chars.next();
                    continue;
                }
                return Ok((&input[i + c.len_utf8()..], out));
            }
            out.push(c);
        }
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }
}

pub(crate) fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(
        tag_no_case(word),
        nom::combinator::not(take_while1(|c: char| c.is_alphanumeric() || c == '_')),
    )
}

fn ws_keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, keyword(word))
}

/// `USING BTREE`
fn index_method(input: &str) -> IResult<&str, String> {
    let (input, _) = ws_keyword("USING")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, method) = type_word(input)?;
    Ok((input, method.to_ascii_uppercase()))
}

fn index_part(input: &str) -> IResult<&str, IndexPart> {
    let (input, _) = multispace0(input)?;
    let (input, column) = identifier(input)?;
    let (input, prefix) = opt(delimited(
        pair(multispace0, char('(')),
        delimited(multispace0, digit1, multispace0),
        char(')'),
    ))(input)?;
    let (input, order) = opt(alt((ws_keyword("ASC"), ws_keyword("DESC"))))(input)?;

    Ok((
        input,
        IndexPart {
            column,
            prefix: prefix.map(str::to_string),
            descending: order.is_some_and(|o| o.eq_ignore_ascii_case("DESC")),
        },
    ))
}

fn index_parts(input: &str) -> IResult<&str, Vec<IndexPart>> {
    delimited(
        pair(multispace0, char('(')),
        separated_list1(pair(multispace0, char(',')), index_part),
        pair(multispace0, char(')')),
    )(input)
}

fn index_head(input: &str) -> IResult<&str, IndexKind> {
    alt((
        value(
            IndexKind::Primary,
            tuple((ws_keyword("PRIMARY"), ws_keyword("KEY"))),
        ),
        value(
            IndexKind::Unique,
            pair(
                ws_keyword("UNIQUE"),
                opt(alt((ws_keyword("KEY"), ws_keyword("INDEX")))),
            ),
        ),
        value(
            IndexKind::FullText,
            pair(
                ws_keyword("FULLTEXT"),
                opt(alt((ws_keyword("KEY"), ws_keyword("INDEX")))),
            ),
        ),
        value(
            IndexKind::Spatial,
            pair(
                ws_keyword("SPATIAL"),
                opt(alt((ws_keyword("KEY"), ws_keyword("INDEX")))),
            ),
        ),
        value(IndexKind::Plain, alt((ws_keyword("KEY"), ws_keyword("INDEX")))),
    ))(input)
}

fn parse_index_def(input: &str) -> IResult<&str, IndexDef> {
    let (input, constraint) = opt(preceded(
        ws_keyword("CONSTRAINT"),
        preceded(multispace1, identifier),
    ))(input)?;
    let (input, kind) = index_head(input)?;
    let (input, name) = opt(preceded(
        multispace1,
        nom::combinator::verify(identifier, |id: &SurfaceIdent| {
            id.quoted || !id.value.eq_ignore_ascii_case("USING")
        }),
    ))(input)?;
    let (input, leading_method) = opt(index_method)(input)?;
    let (input, parts) = index_parts(input)?;
    let (input, trailing_method) = opt(index_method)(input)?;

    Ok((
        input,
        IndexDef {
            kind,
            constraint,
            name,
            method: leading_method.or(trailing_method),
            parts,
        },
    ))
}

fn option_key(input: &str) -> IResult<&str, String> {
    let (input, _) = opt(terminated(keyword("DEFAULT"), multispace1))(input)?;
    let (input, key) = alt((
        map(
            tuple((keyword("CHARACTER"), multispace1, keyword("SET"))),
            |_| "CHARSET".to_string(),
        ),
        map(type_word, |w: &str| w.to_ascii_uppercase()),
    ))(input)?;
    Ok((input, key))
}

fn option_value(input: &str) -> IResult<&str, String> {
    alt((
        map(recognize(string_literal), str::to_string),
        map(identifier, |id| id.value),
    ))(input)
}

fn table_option(input: &str) -> IResult<&str, TableOption> {
    let (input, key) = option_key(input)?;
    let (input, _) = alt((
        recognize(tuple((multispace0, char('='), multispace0))),
        multispace1,
    ))(input)?;
    let (input, value) = option_value(input)?;

    Ok((input, TableOption { key, value }))
}

fn parse_table_options(input: &str) -> IResult<&str, Vec<TableOption>> {
    many0(preceded(
        pair(multispace0, opt(pair(char(','), multispace0))),
        table_option,
    ))(input)
}

/// `COMMENT 'text'` or `COMMENT = 'text'`
fn comment_body(input: &str) -> IResult<&str, String> {
    let (input, _) = keyword("COMMENT")(input)?;
    let (input, _) = opt(tuple((multispace0, char('='))))(input)?;
    let (input, _) = multispace0(input)?;
    string_literal(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_params_and_modifiers() {
        let parsed = data_type("DECIMAL(10,2) UNSIGNED ZEROFILL").unwrap();
        assert_eq!(parsed.name, "DECIMAL");
        assert_eq!(parsed.params, vec!["10", "2"]);
        assert!(parsed.unsigned);
    }

    #[test]
    fn test_data_type_suffix_words() {
        let parsed = data_type("TIMESTAMP(3) WITH LOCAL TIME ZONE").unwrap();
        assert_eq!(parsed.name, "TIMESTAMP WITH LOCAL TIME ZONE");
        assert_eq!(parsed.params, vec!["3"]);

        let parsed = data_type("timestamp without time zone").unwrap();
        assert_eq!(parsed.name, "TIMESTAMP");
    }

    #[test]
    fn test_data_type_rejects_garbage() {
        assert!(data_type("INT(11").is_err());
    }

    #[test]
    fn test_index_def_plain_key() {
        let def = index_def("KEY `idx_name` (`name`(10), `age` DESC)").unwrap();
        assert_eq!(def.kind, IndexKind::Plain);
        assert_eq!(def.name.unwrap().value, "idx_name");
        assert_eq!(def.parts.len(), 2);
        assert_eq!(def.parts[0].prefix.as_deref(), Some("10"));
        assert!(def.parts[1].descending);
        assert!(def.method.is_none());
    }

    #[test]
    fn test_index_def_method_positions() {
        let def = index_def("INDEX idx USING BTREE (a)").unwrap();
        assert_eq!(def.method.as_deref(), Some("BTREE"));

        let def = index_def("INDEX idx (a) USING HASH").unwrap();
        assert_eq!(def.method.as_deref(), Some("HASH"));

        let def = index_def("PRIMARY KEY USING BTREE (`id`)").unwrap();
        assert_eq!(def.kind, IndexKind::Primary);
        assert!(def.name.is_none());
        assert_eq!(def.method.as_deref(), Some("BTREE"));
    }

    #[test]
    fn test_index_def_constraint_name() {
        let def = index_def("CONSTRAINT `uk` UNIQUE KEY `uk_email` (`email`)").unwrap();
        assert_eq!(def.kind, IndexKind::Unique);
        assert_eq!(def.constraint.unwrap().value, "uk");
        assert_eq!(def.name.unwrap().value, "uk_email");
    }

    #[test]
    fn test_index_def_skips_foreign_keys() {
        assert!(index_def("CONSTRAINT fk FOREIGN KEY (a) REFERENCES b(id)").is_none());
        assert!(index_def("CHECK (a > 0)").is_none());
    }

    #[test]
    fn test_table_options() {
        let options =
            table_options("ENGINE=InnoDB AUTO_INCREMENT = 5 DEFAULT CHARSET=utf8 COMMENT='users'")
                .unwrap();
        let keys: Vec<_> = options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["ENGINE", "AUTO_INCREMENT", "CHARSET", "COMMENT"]);
        assert_eq!(options[1].value, "5");
        assert_eq!(options[3].value, "'users'");
    }

    #[test]
    fn test_table_options_character_set() {
        let options = table_options("DEFAULT CHARACTER SET utf8, COLLATE utf8_bin").unwrap();
        assert_eq!(options[0].key, "CHARSET");
        assert_eq!(options[1].key, "COLLATE");
        assert_eq!(options[1].value, "utf8_bin");
    }

    #[test]
    fn test_column_option_classes() {
        assert_eq!(column_option("NOT NULL"), ColumnOptionClass::NotNull);
        assert_eq!(column_option("AUTO_INCREMENT"), ColumnOptionClass::AutoIncrement);
        assert_eq!(
            column_option("ON UPDATE CURRENT_TIMESTAMP"),
            ColumnOptionClass::OnUpdate
        );
        assert_eq!(
            column_option("COMMENT 'user''s id'"),
            ColumnOptionClass::Comment("user's id".to_string())
        );
        assert_eq!(column_option("CHARACTER SET utf8"), ColumnOptionClass::Charset);
    }

    #[test]
    fn test_unquote_string() {
        assert_eq!(unquote_string("'a''b'").as_deref(), Some("a'b"));
        assert_eq!(unquote_string("abc"), None);
    }
}
