//! Oracle base layer shared by Oracle-derived targets.

use super::{ConstructKind, DialectLayer, FunctionRendering, ParamPolicy, Rendering, TypeRendering};
use crate::types::AbstractType::*;

const RESERVED: &[&str] = &[
    "ACCESS", "ADD", "ALTER", "AUDIT", "CHAR", "CLUSTER", "COMMENT", "COMPRESS", "CONNECT",
    "CURRENT", "DATE", "DECIMAL", "EXCLUSIVE", "FILE", "FLOAT", "GRANT", "IDENTIFIED",
    "IMMEDIATE", "INCREMENT", "INDEX", "INITIAL", "INTEGER", "LEVEL", "LOCK", "LONG",
    "MAXEXTENTS", "MINUS", "MLSLABEL", "MODE", "MODIFY", "NOAUDIT", "NOCOMPRESS", "NOWAIT",
    "NUMBER", "OF", "OFFLINE", "ONLINE", "OPTION", "PCTFREE", "PRIOR", "PUBLIC", "RAW",
    "RENAME", "RESOURCE", "REVOKE", "ROW", "ROWID", "ROWNUM", "ROWS", "SESSION", "SHARE",
    "SIZE", "SMALLINT", "START", "SUCCESSFUL", "SYNONYM", "SYSDATE", "TRIGGER", "UID", "USER",
    "VALIDATE", "VARCHAR", "VARCHAR2", "VIEW", "WHENEVER",
];

pub(super) fn layer() -> DialectLayer {
    use ConstructKind::*;

    DialectLayer::new("oracle")
        .reserved(RESERVED)
        .types([
            (TinyInt, TypeRendering::bare("NUMBER(3)")),
            (SmallInt, TypeRendering::bare("NUMBER(5)")),
            (Int, TypeRendering::bare("NUMBER(10)")),
            (BigInt, TypeRendering::bare("NUMBER(19)")),
            (Bit, TypeRendering::bare("NUMBER(1)")),
            (Boolean, TypeRendering::bare("NUMBER(1)")),
            (Double, TypeRendering::bare("BINARY_DOUBLE")),
            (Float, TypeRendering::bare("BINARY_FLOAT")),
            (Decimal, TypeRendering::keep("NUMBER")),
            (VarChar, TypeRendering::keep("VARCHAR2")),
            (NVarChar, TypeRendering::keep("NVARCHAR2")),
            (TinyText, TypeRendering::bare("CLOB")),
            (Text, TypeRendering::bare("CLOB")),
            (MediumText, TypeRendering::bare("CLOB")),
            (LongText, TypeRendering::bare("CLOB")),
            (Binary, TypeRendering::keep("RAW")),
            (VarBinary, TypeRendering::keep("RAW")),
            (Time, TypeRendering::keep("TIMESTAMP")),
            (DateTime, TypeRendering::keep("TIMESTAMP")),
            (Year, TypeRendering::bare("NUMBER(4)")),
            (Json, TypeRendering::bare("CLOB")),
            (Enum, TypeRendering::sized("VARCHAR2", ParamPolicy::MemberWidth)),
            (Set, TypeRendering::sized("VARCHAR2", ParamPolicy::SetWidth)),
        ])
        .functions([
            ("SUBSTRING", FunctionRendering::Call("SUBSTR")),
            ("CHAR_LENGTH", FunctionRendering::Call("LENGTH")),
            ("CHARACTER_LENGTH", FunctionRendering::Call("LENGTH")),
            ("IFNULL", FunctionRendering::Call("NVL")),
            ("POW", FunctionRendering::Call("POWER")),
            ("CEILING", FunctionRendering::Call("CEIL")),
            ("LCASE", FunctionRendering::Call("LOWER")),
            ("UCASE", FunctionRendering::Call("UPPER")),
            ("RAND", FunctionRendering::Call("DBMS_RANDOM.VALUE")),
            ("NOW", FunctionRendering::Bare("SYSTIMESTAMP")),
            ("CURDATE", FunctionRendering::Bare("CURRENT_DATE")),
            ("DATE_FORMAT", FunctionRendering::Format("TO_CHAR")),
            ("STR_TO_DATE", FunctionRendering::Format("TO_DATE")),
            ("GROUP_CONCAT", FunctionRendering::Unsupported),
        ])
        .constructs([
            (Limit, Rendering::Unsupported),
            (Offset, Rendering::Unsupported),
            (TableAliasKeyword, Rendering::Omit),
            (AutoIncrement, Rendering::Keyword("GENERATED BY DEFAULT AS IDENTITY")),
            (OnUpdateColumn, Rendering::Unsupported),
            (GeneratedColumn, Rendering::Unsupported),
            (ColumnCharset, Rendering::Omit),
            (ColumnCollation, Rendering::Omit),
            (ColumnComment, Rendering::Hoist),
            (ColumnPosition, Rendering::Omit),
            (TableEngine, Rendering::Omit),
            (TableCharset, Rendering::Omit),
            (TableCollation, Rendering::Omit),
            (TableComment, Rendering::Hoist),
            (TableAutoIncrementSeed, Rendering::Unsupported),
            (TableRowFormat, Rendering::Unsupported),
            (TableOption, Rendering::Unsupported),
            (InlineIndex, Rendering::Hoist),
            (AlterAddIndex, Rendering::Hoist),
            (IndexMethodHint, Rendering::Unsupported),
            (IndexPrefixLength, Rendering::Omit),
            (FullTextIndex, Rendering::Unsupported),
            (SpatialIndex, Rendering::Unsupported),
            (MultiRowInsert, Rendering::Unsupported),
            (InsertIgnore, Rendering::Unsupported),
            (ReplaceInto, Rendering::Unsupported),
            (OnDuplicateKeyUpdate, Rendering::Unsupported),
            (SessionSet, Rendering::Unsupported),
            (LockTables, Rendering::Unsupported),
            (UseDatabase, Rendering::Unsupported),
            (CreateDatabase, Rendering::Unsupported),
        ])
        .time_mapping([
            ("%Y", "YYYY"),
            ("%y", "YY"),
            ("%m", "MM"),
            ("%d", "DD"),
            ("%H", "HH24"),
            ("%I", "HH"),
            ("%M", "MI"),
            ("%S", "SS"),
            ("%f", "FF6"),
            ("%p", "AM"),
            ("%b", "MON"),
            ("%B", "MONTH"),
            ("%a", "DY"),
            ("%A", "DAY"),
            ("%j", "DDD"),
        ])
        .time_format("'YYYY-MM-DD HH24:MI:SS'")
}
