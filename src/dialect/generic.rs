//! Terminating defaults: source shapes pass through unchanged.

use super::{ConstructKind, DialectLayer, ParamPolicy, Rendering, TokenClass, TypeRendering};
use crate::types::AbstractType::*;

/// SQL-92 reserved words that commonly collide with column names.
const RESERVED: &[&str] = &[
    "ALL", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN", "CONSTRAINT",
    "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXISTS",
    "FOR", "FOREIGN", "FROM", "FULL", "GRANT", "GROUP", "HAVING", "IN", "INNER", "INSERT",
    "INTERSECT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "NOT", "NULL", "ON", "OR", "ORDER",
    "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "UNION",
    "UNIQUE", "UPDATE", "USING", "VALUES", "WHEN", "WHERE", "WITH",
];

/// Keywords that remain usable as bare identifiers.
const NON_RESERVED: &[&str] = &[
    "ACTION", "DATA", "KEY_BLOCK_SIZE", "NAME", "STATUS", "TEMPORARY", "TEXT", "TIMESTAMP", "TYPE",
    "VALUE",
];

pub(super) fn layer() -> DialectLayer {
    DialectLayer::new("generic")
        .reserved(RESERVED)
        .keywords(NON_RESERVED.iter().map(|w| (*w, TokenClass::Keyword)))
        .types([
            (TinyInt, TypeRendering::bare("TINYINT")),
            (UTinyInt, TypeRendering::bare("SMALLINT")),
            (SmallInt, TypeRendering::bare("SMALLINT")),
            (USmallInt, TypeRendering::bare("INTEGER")),
            (MediumInt, TypeRendering::bare("INTEGER")),
            (UMediumInt, TypeRendering::bare("INTEGER")),
            (Int, TypeRendering::bare("INTEGER")),
            (UInt, TypeRendering::bare("BIGINT")),
            (BigInt, TypeRendering::bare("BIGINT")),
            (UBigInt, TypeRendering::bare("DECIMAL(20,0)")),
            (Bit, TypeRendering::keep("BIT")),
            (Boolean, TypeRendering::bare("BOOLEAN")),
            (Float, TypeRendering::bare("FLOAT")),
            (Double, TypeRendering::bare("DOUBLE PRECISION")),
            (Real, TypeRendering::bare("REAL")),
            (Decimal, TypeRendering::keep("DECIMAL")),
            (Char, TypeRendering::keep("CHAR")),
            (VarChar, TypeRendering::keep("VARCHAR")),
            (NChar, TypeRendering::keep("NCHAR")),
            (NVarChar, TypeRendering::keep("NVARCHAR")),
            (TinyText, TypeRendering::bare("TEXT")),
            (Text, TypeRendering::bare("TEXT")),
            (MediumText, TypeRendering::bare("TEXT")),
            (LongText, TypeRendering::bare("TEXT")),
            (Binary, TypeRendering::keep("BINARY")),
            (VarBinary, TypeRendering::keep("VARBINARY")),
            (TinyBlob, TypeRendering::bare("BLOB")),
            (Blob, TypeRendering::bare("BLOB")),
            (MediumBlob, TypeRendering::bare("BLOB")),
            (LongBlob, TypeRendering::bare("BLOB")),
            (Date, TypeRendering::bare("DATE")),
            (Time, TypeRendering::keep("TIME")),
            (DateTime, TypeRendering::keep("TIMESTAMP")),
            (Timestamp, TypeRendering::keep("TIMESTAMP")),
            (TimestampTz, TypeRendering::bare("TIMESTAMP WITH TIME ZONE")),
            (TimestampLtz, TypeRendering::bare("TIMESTAMP WITH LOCAL TIME ZONE")),
            (Year, TypeRendering::bare("SMALLINT")),
            (Json, TypeRendering::bare("JSON")),
            (Enum, TypeRendering::sized("VARCHAR", ParamPolicy::MemberWidth)),
            (Set, TypeRendering::sized("VARCHAR", ParamPolicy::SetWidth)),
        ])
        .constructs([
            (ConstructKind::Limit, Rendering::Clause("LIMIT")),
            (ConstructKind::Offset, Rendering::Clause("OFFSET")),
            (ConstructKind::TableAliasKeyword, Rendering::Keyword("AS")),
            (ConstructKind::AutoIncrement, Rendering::Keyword("AUTO_INCREMENT")),
        ])
        .constructs(
            ConstructKind::ALL
                .iter()
                .filter(|kind| {
                    !matches!(
                        kind,
                        ConstructKind::Limit
                            | ConstructKind::Offset
                            | ConstructKind::TableAliasKeyword
                            | ConstructKind::AutoIncrement
                    )
                })
                .map(|kind| (*kind, Rendering::Generic)),
        )
        .time_mapping([
            ("%Y", "%Y"),
            ("%y", "%y"),
            ("%m", "%m"),
            ("%d", "%d"),
            ("%H", "%H"),
            ("%I", "%I"),
            ("%M", "%M"),
            ("%S", "%S"),
            ("%f", "%f"),
            ("%p", "%p"),
            ("%b", "%b"),
            ("%B", "%B"),
            ("%a", "%a"),
            ("%A", "%A"),
            ("%j", "%j"),
        ])
        .charset("UTF8")
}
