//! Dialect definitions.
//!
//! A [`DialectDefinition`] is an ordered chain of [`DialectLayer`]s, most
//! specific first. Every lookup walks the chain and takes the first hit, so
//! a layer only lists what it changes. The generic layer terminates every
//! chain and must cover every [`AbstractType`] and [`ConstructKind`];
//! [`DialectDefinition::audit`] checks that.
//!
//! ```text
//! dameng ──► oracle ──► generic
//!  (overrides)  (base)   (defaults)
//! ```

mod dameng;
mod generic;
mod oracle;

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ConvertError, ConvertResult};
use crate::parser;
use crate::surface;
use crate::types::{AbstractType, SourceType};

static GENERIC: Lazy<Arc<DialectDefinition>> =
    Lazy::new(|| Arc::new(DialectDefinition::new("generic", vec![generic::layer()])));

static ORACLE: Lazy<Arc<DialectDefinition>> = Lazy::new(|| {
    Arc::new(DialectDefinition::new(
        "oracle",
        vec![oracle::layer(), generic::layer()],
    ))
});

static DAMENG: Lazy<Arc<DialectDefinition>> = Lazy::new(|| {
    Arc::new(DialectDefinition::new(
        "dameng",
        vec![dameng::layer(), oracle::layer(), generic::layer()],
    ))
});

/// How a word behaves in the target grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenClass {
    /// Plain identifier.
    Identifier,
    /// Non-reserved keyword; usable as an identifier.
    Keyword,
    /// Reserved word; must be quoted to be used as an identifier.
    Reserved,
    /// Names a data type.
    TypeName(AbstractType),
}

/// What happens to the parenthesized parameters of a source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPolicy {
    Keep,
    Drop,
    /// `VARCHAR(n)` sized to the longest ENUM member.
    MemberWidth,
    /// `VARCHAR(n)` sized to hold every SET member joined by commas.
    SetWidth,
}

/// Target spelling of an abstract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRendering {
    pub name: &'static str,
    pub params: ParamPolicy,
}

impl TypeRendering {
    pub const fn keep(name: &'static str) -> Self {
        Self {
            name,
            params: ParamPolicy::Keep,
        }
    }

    pub const fn bare(name: &'static str) -> Self {
        Self {
            name,
            params: ParamPolicy::Drop,
        }
    }

    pub const fn sized(name: &'static str, params: ParamPolicy) -> Self {
        Self { name, params }
    }
}

/// Rendering of a named built-in function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRendering {
    /// `NAME(args)`; renames when the name differs from the source.
    Call(&'static str),
    /// Like `Call`, padding missing trailing arguments up to `arity` with `value`.
    Fill {
        name: &'static str,
        arity: usize,
        value: &'static str,
    },
    /// Niladic keyword without parentheses, e.g. `CURRENT_TIMESTAMP`.
    Bare(&'static str),
    /// `NAME(value, format)` with the format string translated.
    Format(&'static str),
    Unsupported,
}

/// Structural kinds whose shape a dialect may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConstructKind {
    Limit,
    Offset,
    TableAliasKeyword,
    AutoIncrement,
    OnUpdateColumn,
    GeneratedColumn,
    ColumnCharset,
    ColumnCollation,
    ColumnComment,
    ColumnPosition,
    TableEngine,
    TableCharset,
    TableCollation,
    TableComment,
    TableAutoIncrementSeed,
    TableRowFormat,
    TableOption,
    InlineIndex,
    AlterAddIndex,
    IndexMethodHint,
    IndexPrefixLength,
    FullTextIndex,
    SpatialIndex,
    MultiRowInsert,
    InsertIgnore,
    ReplaceInto,
    OnDuplicateKeyUpdate,
    SessionSet,
    LockTables,
    UseDatabase,
    CreateDatabase,
    Transaction,
    Truncate,
    CreateView,
}

impl ConstructKind {
    pub const ALL: &'static [ConstructKind] = &[
        Self::Limit,
        Self::Offset,
        Self::TableAliasKeyword,
        Self::AutoIncrement,
        Self::OnUpdateColumn,
        Self::GeneratedColumn,
        Self::ColumnCharset,
        Self::ColumnCollation,
        Self::ColumnComment,
        Self::ColumnPosition,
        Self::TableEngine,
        Self::TableCharset,
        Self::TableCollation,
        Self::TableComment,
        Self::TableAutoIncrementSeed,
        Self::TableRowFormat,
        Self::TableOption,
        Self::InlineIndex,
        Self::AlterAddIndex,
        Self::IndexMethodHint,
        Self::IndexPrefixLength,
        Self::FullTextIndex,
        Self::SpatialIndex,
        Self::MultiRowInsert,
        Self::InsertIgnore,
        Self::ReplaceInto,
        Self::OnDuplicateKeyUpdate,
        Self::SessionSet,
        Self::LockTables,
        Self::UseDatabase,
        Self::CreateDatabase,
        Self::Transaction,
        Self::Truncate,
        Self::CreateView,
    ];

    /// Human-readable name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Limit => "LIMIT clause",
            Self::Offset => "OFFSET clause",
            Self::TableAliasKeyword => "table alias",
            Self::AutoIncrement => "AUTO_INCREMENT column",
            Self::OnUpdateColumn => "ON UPDATE column clause",
            Self::GeneratedColumn => "generated column",
            Self::ColumnCharset => "column character set",
            Self::ColumnCollation => "column collation",
            Self::ColumnComment => "column comment",
            Self::ColumnPosition => "column position",
            Self::TableEngine => "table option ENGINE",
            Self::TableCharset => "table option CHARSET",
            Self::TableCollation => "table option COLLATE",
            Self::TableComment => "table option COMMENT",
            Self::TableAutoIncrementSeed => "table option AUTO_INCREMENT",
            Self::TableRowFormat => "table option ROW_FORMAT",
            Self::TableOption => "table option",
            Self::InlineIndex => "inline index",
            Self::AlterAddIndex => "ALTER TABLE ADD INDEX",
            Self::IndexMethodHint => "index method hint",
            Self::IndexPrefixLength => "index prefix length",
            Self::FullTextIndex => "FULLTEXT index",
            Self::SpatialIndex => "SPATIAL index",
            Self::MultiRowInsert => "multi-row INSERT",
            Self::InsertIgnore => "INSERT IGNORE",
            Self::ReplaceInto => "REPLACE INTO",
            Self::OnDuplicateKeyUpdate => "ON DUPLICATE KEY UPDATE",
            Self::SessionSet => "SET statement",
            Self::LockTables => "LOCK/UNLOCK TABLES",
            Self::UseDatabase => "USE statement",
            Self::CreateDatabase => "CREATE DATABASE",
            Self::Transaction => "transaction control",
            Self::Truncate => "TRUNCATE",
            Self::CreateView => "CREATE VIEW",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// How the generator renders a construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    /// The default shape for the node.
    Generic,
    /// A fixed keyword stands in for the construct.
    Keyword(&'static str),
    /// A keyword followed by the rendered argument, e.g. `OFFSET 5`.
    Clause(&'static str),
    /// Row limit as `TOP n` or `LIMIT n` depending on [`LimitStyle`].
    RowLimit {
        top: &'static str,
        limit: &'static str,
    },
    /// Emitted as a separate statement after its owner.
    Hoist,
    /// Dropped from the output.
    Omit,
    /// The target has no equivalent.
    Unsupported,
}

/// Which row-limit form to use where the dialect offers both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitStyle {
    Top,
    #[default]
    Limit,
}

/// One set of overrides in a dialect chain.
#[derive(Debug, Clone, Default)]
pub struct DialectLayer {
    pub name: &'static str,
    types: HashMap<AbstractType, TypeRendering>,
    keywords: HashMap<&'static str, TokenClass>,
    functions: HashMap<&'static str, FunctionRendering>,
    constructs: HashMap<ConstructKind, Rendering>,
    time_mapping: HashMap<&'static str, &'static str>,
    time_format: Option<&'static str>,
    charset: Option<&'static str>,
}

impl DialectLayer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn types(mut self, entries: impl IntoIterator<Item = (AbstractType, TypeRendering)>) -> Self {
        self.types.extend(entries);
        self
    }

    pub fn keywords(mut self, entries: impl IntoIterator<Item = (&'static str, TokenClass)>) -> Self {
        self.keywords.extend(entries);
        self
    }

    pub fn reserved(mut self, words: &[&'static str]) -> Self {
        self.keywords
            .extend(words.iter().map(|w| (*w, TokenClass::Reserved)));
        self
    }

    pub fn functions(
        mut self,
        entries: impl IntoIterator<Item = (&'static str, FunctionRendering)>,
    ) -> Self {
        self.functions.extend(entries);
        self
    }

    pub fn constructs(mut self, entries: impl IntoIterator<Item = (ConstructKind, Rendering)>) -> Self {
        self.constructs.extend(entries);
        self
    }

    pub fn time_mapping(mut self, entries: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        self.time_mapping.extend(entries);
        self
    }

    pub fn time_format(mut self, format: &'static str) -> Self {
        self.time_format = Some(format);
        self
    }

    pub fn charset(mut self, charset: &'static str) -> Self {
        self.charset = Some(charset);
        self
    }
}

/// Gaps found by [`DialectDefinition::audit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub dialect: String,
    pub missing_types: Vec<AbstractType>,
    pub missing_constructs: Vec<ConstructKind>,
}

impl AuditReport {
    pub fn is_complete(&self) -> bool {
        self.missing_types.is_empty() && self.missing_constructs.is_empty()
    }
}

/// An immutable, layered target dialect.
#[derive(Debug, Clone)]
pub struct DialectDefinition {
    name: &'static str,
    layers: Vec<DialectLayer>,
}

impl DialectDefinition {
    pub fn new(name: &'static str, layers: Vec<DialectLayer>) -> Self {
        Self { name, layers }
    }

    /// The Dameng (DM8) target: dameng → oracle → generic.
    pub fn dameng() -> Arc<Self> {
        Arc::clone(&DAMENG)
    }

    pub fn oracle() -> Arc<Self> {
        Arc::clone(&ORACLE)
    }

    pub fn generic() -> Arc<Self> {
        Arc::clone(&GENERIC)
    }

    /// Look up a built-in definition by name.
    pub fn by_name(name: &str) -> Option<Arc<Self>> {
        match name.to_ascii_lowercase().as_str() {
            "dameng" | "dm" | "dm8" => Some(Self::dameng()),
            "oracle" => Some(Self::oracle()),
            "generic" => Some(Self::generic()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Layer names, most specific first.
    pub fn chain(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name).collect()
    }

    fn lookup<'a, T>(&'a self, pick: impl Fn(&'a DialectLayer) -> Option<&'a T>) -> Option<&'a T> {
        self.layers.iter().find_map(pick)
    }

    pub fn type_rendering(&self, ty: AbstractType) -> Option<&TypeRendering> {
        self.lookup(|layer| layer.types.get(&ty))
    }

    /// Render a classified source type in the target syntax.
    pub fn render_type(&self, ty: &SourceType) -> ConvertResult<String> {
        let rendering = self
            .type_rendering(ty.kind)
            .ok_or_else(|| ConvertError::unsupported(format!("data type {}", ty.kind)))?;

        let params = match rendering.params {
            ParamPolicy::Drop => None,
            ParamPolicy::Keep if ty.params.is_empty() => None,
            ParamPolicy::Keep => Some(ty.params.join(",")),
            ParamPolicy::MemberWidth => {
                let width = ty.members().iter().map(|m| m.chars().count()).max();
                Some(width.unwrap_or(1).max(1).to_string())
            }
            ParamPolicy::SetWidth => {
                let members = ty.members();
                let width: usize = members.iter().map(|m| m.chars().count()).sum::<usize>()
                    + members.len().saturating_sub(1);
                Some(width.max(1).to_string())
            }
        };

        Ok(match params {
            Some(params) => format!("{}({})", rendering.name, params),
            None => rendering.name.to_string(),
        })
    }

    /// Classify a word of target text.
    pub fn classify_keyword(&self, word: &str) -> TokenClass {
        let upper = word.to_ascii_uppercase();
        self.lookup(|layer| layer.keywords.get(upper.as_str()))
            .copied()
            .unwrap_or(TokenClass::Identifier)
    }

    pub fn function_rendering(&self, name: &str) -> Option<&FunctionRendering> {
        let upper = name.to_ascii_uppercase();
        self.lookup(|layer| layer.functions.get(upper.as_str()))
    }

    /// Render a built-in call from already-rendered arguments.
    pub fn render_function(&self, name: &str, args: &[String]) -> ConvertResult<String> {
        let call = |target: &str, args: &[String]| format!("{}({})", target, args.join(", "));

        match self.function_rendering(name) {
            None => Ok(call(name, args)),
            Some(FunctionRendering::Call(target)) => Ok(call(target, args)),
            Some(FunctionRendering::Fill { name, arity, value }) => {
                let mut args = args.to_vec();
                while args.len() < *arity {
                    args.push(value.to_string());
                }
                Ok(call(name, &args))
            }
            Some(FunctionRendering::Bare(keyword)) if args.is_empty() => Ok(keyword.to_string()),
            Some(FunctionRendering::Bare(keyword)) => Ok(call(keyword, args)),
            Some(FunctionRendering::Format(target)) => {
                let (value, format) = match args {
                    [value] => (value.clone(), self.time_format().to_string()),
                    [value, format] => {
                        let source = surface::unquote_string(format).ok_or_else(|| {
                            ConvertError::unsupported(format!(
                                "{} with a non-literal format",
                                name.to_ascii_uppercase()
                            ))
                        })?;
                        (value.clone(), quote_literal(&self.format_time(&source)?))
                    }
                    _ => {
                        return Err(ConvertError::unsupported(format!(
                            "{} with {} arguments",
                            name.to_ascii_uppercase(),
                            args.len()
                        )));
                    }
                };
                Ok(format!("{}({}, {})", target, value, format))
            }
            Some(FunctionRendering::Unsupported) => Err(ConvertError::unsupported(format!(
                "function {}",
                name.to_ascii_uppercase()
            ))),
        }
    }

    /// The rendering registered for a construct, walking up the chain.
    pub fn construct(&self, kind: ConstructKind) -> Rendering {
        self.lookup(|layer| layer.constructs.get(&kind))
            .copied()
            .unwrap_or(Rendering::Unsupported)
    }

    /// Translate a MySQL `DATE_FORMAT` pattern into the target's format model.
    pub fn format_time(&self, mysql: &str) -> ConvertResult<String> {
        let canonical = parser::canonical_time_tokens(mysql)?;
        let mut out = String::new();

        for token in canonical {
            match token {
                parser::TimeToken::Field(field) => {
                    let target = self
                        .lookup(|layer| layer.time_mapping.get(field))
                        .ok_or_else(|| ConvertError::unsupported(format!("date format {}", field)))?;
                    out.push_str(target);
                }
                parser::TimeToken::Literal(text) if text.chars().any(char::is_alphabetic) => {
                    out.push('"');
                    out.push_str(&text);
                    out.push('"');
                }
                parser::TimeToken::Literal(text) => out.push_str(&text),
            }
        }

        Ok(out)
    }

    /// Default datetime format literal.
    pub fn time_format(&self) -> &'static str {
        self.layers
            .iter()
            .find_map(|l| l.time_format)
            .unwrap_or("'YYYY-MM-DD HH24:MI:SS'")
    }

    /// Charset name the global normalization rewrites 4-byte UTF-8 to.
    pub fn charset_name(&self) -> &'static str {
        self.layers
            .iter()
            .find_map(|l| l.charset)
            .unwrap_or("UTF8")
    }

    /// Enumerate types and construct kinds with no rendering anywhere in the chain.
    pub fn audit(&self) -> AuditReport {
        AuditReport {
            dialect: self.name.to_string(),
            missing_types: AbstractType::ALL
                .iter()
                .copied()
                .filter(|ty| self.type_rendering(*ty).is_none())
                .collect(),
            missing_constructs: ConstructKind::ALL
                .iter()
                .copied()
                .filter(|kind| self.lookup(|layer| layer.constructs.get(kind)).is_none())
                .collect(),
        }
    }

    /// Resolved type table, in [`AbstractType::ALL`] order.
    pub fn type_table(&self) -> Vec<(AbstractType, &'static str)> {
        AbstractType::ALL
            .iter()
            .filter_map(|ty| self.type_rendering(*ty).map(|r| (*ty, r.name)))
            .collect()
    }
}

/// Single-quoted SQL string literal.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(text: &str) -> SourceType {
        SourceType::classify(text).unwrap()
    }

    #[test]
    fn test_builtin_definitions_are_complete() {
        for dialect in [
            DialectDefinition::dameng(),
            DialectDefinition::oracle(),
            DialectDefinition::generic(),
        ] {
            let report = dialect.audit();
            assert!(report.is_complete(), "{:?}", report);
        }
    }

    #[test]
    fn test_every_type_renders_non_empty() {
        let dm = DialectDefinition::dameng();
        for kind in AbstractType::ALL {
            let rendered = dm.render_type(&SourceType::new(*kind)).unwrap();
            assert!(!rendered.is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn test_dameng_type_mapping() {
        let dm = DialectDefinition::dameng();
        assert_eq!(dm.render_type(&ty("MEDIUMINT(9)")).unwrap(), "INT");
        assert_eq!(dm.render_type(&ty("TINYTEXT")).unwrap(), "TEXT");
        assert_eq!(dm.render_type(&ty("LONGTEXT")).unwrap(), "TEXT");
        assert_eq!(dm.render_type(&ty("LONGBLOB")).unwrap(), "BLOB");
        assert_eq!(dm.render_type(&ty("YEAR")).unwrap(), "SMALLINT");
        assert_eq!(dm.render_type(&ty("NVARCHAR(20)")).unwrap(), "NVARCHAR2(20)");
        assert_eq!(dm.render_type(&ty("VARCHAR(255)")).unwrap(), "VARCHAR(255)");
        assert_eq!(dm.render_type(&ty("DECIMAL(10,2)")).unwrap(), "DECIMAL(10,2)");
        assert_eq!(dm.render_type(&ty("INT(11)")).unwrap(), "INT");
        assert_eq!(dm.render_type(&ty("DATETIME(6)")).unwrap(), "DATETIME(6)");
        assert_eq!(
            dm.render_type(&ty("TIMESTAMP WITH TIME ZONE")).unwrap(),
            "TIMESTAMP WITH TIME ZONE"
        );
    }

    #[test]
    fn test_unsigned_widening() {
        let dm = DialectDefinition::dameng();
        assert_eq!(dm.render_type(&ty("INT UNSIGNED")).unwrap(), "BIGINT");
        assert_eq!(dm.render_type(&ty("BIGINT(20) UNSIGNED")).unwrap(), "DECIMAL(20,0)");
        assert_eq!(dm.render_type(&ty("TINYINT(3) UNSIGNED")).unwrap(), "SMALLINT");
    }

    #[test]
    fn test_enum_and_set_widths() {
        let dm = DialectDefinition::dameng();
        assert_eq!(
            dm.render_type(&ty("ENUM('new','shipped','cancelled')")).unwrap(),
            "VARCHAR(9)"
        );
        assert_eq!(dm.render_type(&ty("SET('a','bb')")).unwrap(), "VARCHAR(4)");
    }

    #[test]
    fn test_override_shadows_base() {
        let dm = DialectDefinition::dameng();
        let oracle = DialectDefinition::oracle();
        assert_eq!(oracle.render_type(&ty("TEXT")).unwrap(), "CLOB");
        assert_eq!(dm.render_type(&ty("TEXT")).unwrap(), "TEXT");
        // Neither dameng nor oracle override NCHAR.
        assert_eq!(dm.render_type(&ty("NCHAR(4)")).unwrap(), "NCHAR(4)");
        assert_eq!(dm.chain(), vec!["dameng", "oracle", "generic"]);
    }

    #[test]
    fn test_keyword_classes() {
        let dm = DialectDefinition::dameng();
        assert_eq!(dm.classify_keyword("identity"), TokenClass::Reserved);
        assert_eq!(dm.classify_keyword("LIMIT"), TokenClass::Reserved);
        assert_eq!(
            dm.classify_keyword("longtext"),
            TokenClass::TypeName(AbstractType::LongText)
        );
        assert_eq!(dm.classify_keyword("user"), TokenClass::Reserved);
        assert_eq!(dm.classify_keyword("customer"), TokenClass::Identifier);
        assert_eq!(dm.classify_keyword("status"), TokenClass::Keyword);
    }

    #[test]
    fn test_function_mapping() {
        let dm = DialectDefinition::dameng();
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(dm.render_function("pow", &args(&["2", "3"])).unwrap(), "POWER(2, 3)");
        assert_eq!(dm.render_function("ROUND", &args(&["x"])).unwrap(), "ROUND(x, 0)");
        assert_eq!(dm.render_function("ROUND", &args(&["x", "2"])).unwrap(), "ROUND(x, 2)");
        assert_eq!(dm.render_function("COUNT", &[]).unwrap(), "COUNT(*)");
        assert_eq!(dm.render_function("NOW", &[]).unwrap(), "CURRENT_TIMESTAMP");
        assert_eq!(dm.render_function("IFNULL", &args(&["a", "0"])).unwrap(), "COALESCE(a, 0)");
        assert_eq!(dm.render_function("my_udf", &args(&["a"])).unwrap(), "my_udf(a)");
        assert!(dm.render_function("GROUP_CONCAT", &args(&["a"])).is_err());
    }

    #[test]
    fn test_date_format_translation() {
        let dm = DialectDefinition::dameng();
        let rendered = dm
            .render_function("DATE_FORMAT", &["created_at".to_string(), "'%Y-%m-%d %H:%i:%s'".to_string()])
            .unwrap();
        assert_eq!(rendered, "TO_CHAR(created_at, 'YYYY-MM-DD HH24:MI:SS')");

        let err = dm
            .render_function("DATE_FORMAT", &["d".to_string(), "fmt_col".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("non-literal"));
    }

    #[test]
    fn test_construct_lookup() {
        let dm = DialectDefinition::dameng();
        assert_eq!(dm.construct(ConstructKind::AutoIncrement), Rendering::Keyword("IDENTITY"));
        assert_eq!(dm.construct(ConstructKind::Offset), Rendering::Clause("OFFSET"));
        assert_eq!(dm.construct(ConstructKind::TableEngine), Rendering::Omit);
        assert_eq!(dm.construct(ConstructKind::TableRowFormat), Rendering::Unsupported);
        assert_eq!(
            DialectDefinition::oracle().construct(ConstructKind::Limit),
            Rendering::Unsupported
        );
    }

    #[test]
    fn test_charset_and_lookup_by_name() {
        assert_eq!(DialectDefinition::dameng().charset_name(), "UTF8");
        assert_eq!(DialectDefinition::by_name("DM8").unwrap().name(), "dameng");
        assert!(DialectDefinition::by_name("sybase").is_none());
    }
}
