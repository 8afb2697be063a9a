//! Dameng (DM8) overrides on top of the Oracle layer.
//!
//! DM8 accepts most MySQL type names directly, so the type table maps 1:1
//! wherever the target supports the name and narrows where it does not
//! (MEDIUMINT, the TEXT and BLOB size variants, YEAR, ENUM/SET). An
//! AUTO_INCREMENT column renders as bare `IDENTITY`; MySQL declares no
//! seed or increment at the column level, so none is carried over.

use super::{
    ConstructKind, DialectLayer, FunctionRendering, ParamPolicy, Rendering, TokenClass,
    TypeRendering,
};
use crate::types::AbstractType::{self, *};

pub(super) fn layer() -> DialectLayer {
    use FunctionRendering::{Bare, Call, Fill};

    DialectLayer::new("dameng")
        .types([
            (TinyInt, TypeRendering::bare("TINYINT")),
            (SmallInt, TypeRendering::bare("SMALLINT")),
            (Int, TypeRendering::bare("INT")),
            (BigInt, TypeRendering::bare("BIGINT")),
            (UTinyInt, TypeRendering::bare("SMALLINT")),
            (USmallInt, TypeRendering::bare("INT")),
            (UInt, TypeRendering::bare("BIGINT")),
            (UBigInt, TypeRendering::bare("DECIMAL(20,0)")),
            (Bit, TypeRendering::bare("BIT")),
            (Float, TypeRendering::bare("FLOAT")),
            (Double, TypeRendering::bare("DOUBLE")),
            (Real, TypeRendering::bare("REAL")),
            (Decimal, TypeRendering::keep("DECIMAL")),
            (Char, TypeRendering::keep("CHAR")),
            (VarChar, TypeRendering::keep("VARCHAR")),
            (NVarChar, TypeRendering::keep("NVARCHAR2")),
            (Text, TypeRendering::bare("TEXT")),
            (LongText, TypeRendering::bare("TEXT")),
            (Binary, TypeRendering::keep("BINARY")),
            (VarBinary, TypeRendering::keep("VARBINARY")),
            (Blob, TypeRendering::bare("BLOB")),
            (LongBlob, TypeRendering::bare("BLOB")),
            (Date, TypeRendering::bare("DATE")),
            (Time, TypeRendering::keep("TIME")),
            (DateTime, TypeRendering::keep("DATETIME")),
            (Timestamp, TypeRendering::keep("TIMESTAMP")),
            (TimestampTz, TypeRendering::bare("TIMESTAMP WITH TIME ZONE")),
            (TimestampLtz, TypeRendering::bare("TIMESTAMP WITH LOCAL TIME ZONE")),
            (Boolean, TypeRendering::bare("BOOLEAN")),
            (Json, TypeRendering::bare("JSON")),
            // MySQL compatibility
            (MediumInt, TypeRendering::bare("INT")),
            (UMediumInt, TypeRendering::bare("INT")),
            (MediumText, TypeRendering::bare("TEXT")),
            (TinyText, TypeRendering::bare("TEXT")),
            (TinyBlob, TypeRendering::bare("BLOB")),
            (MediumBlob, TypeRendering::bare("BLOB")),
            (Year, TypeRendering::bare("SMALLINT")),
            (Enum, TypeRendering::sized("VARCHAR", ParamPolicy::MemberWidth)),
            (Set, TypeRendering::sized("VARCHAR", ParamPolicy::SetWidth)),
        ])
        .reserved(&["IDENTITY", "LIMIT", "OFFSET", "TOP"])
        .keywords(
            [
                ("BOOLEAN", Boolean),
                ("TINYINT", TinyInt),
                ("SMALLINT", SmallInt),
                ("MEDIUMINT", MediumInt),
                ("BIGINT", BigInt),
                ("TEXT", Text),
                ("LONGTEXT", LongText),
                ("BLOB", Blob),
                ("LONGBLOB", LongBlob),
            ]
            .map(|(word, ty): (&'static str, AbstractType)| (word, TokenClass::TypeName(ty))),
        )
        .functions([
            ("CONCAT", Call("CONCAT")),
            ("LENGTH", Call("LENGTH")),
            ("LOWER", Call("LOWER")),
            ("UPPER", Call("UPPER")),
            ("TRIM", Call("TRIM")),
            ("ABS", Call("ABS")),
            ("CEIL", Call("CEIL")),
            ("FLOOR", Call("FLOOR")),
            (
                "ROUND",
                Fill {
                    name: "ROUND",
                    arity: 2,
                    value: "0",
                },
            ),
            ("SQRT", Call("SQRT")),
            ("POWER", Call("POWER")),
            ("POW", Call("POWER")),
            ("COALESCE", Call("COALESCE")),
            ("IFNULL", Call("COALESCE")),
            ("NULLIF", Call("NULLIF")),
            (
                "COUNT",
                Fill {
                    name: "COUNT",
                    arity: 1,
                    value: "*",
                },
            ),
            ("SUM", Call("SUM")),
            ("AVG", Call("AVG")),
            ("MAX", Call("MAX")),
            ("MIN", Call("MIN")),
            ("CURRENT_DATE", Bare("CURRENT_DATE")),
            ("CURDATE", Bare("CURRENT_DATE")),
            ("CURRENT_TIME", Bare("CURRENT_TIME")),
            ("CURTIME", Bare("CURRENT_TIME")),
            ("CURRENT_TIMESTAMP", Bare("CURRENT_TIMESTAMP")),
            ("NOW", Bare("CURRENT_TIMESTAMP")),
            ("SYSDATE", Bare("CURRENT_TIMESTAMP")),
            ("LOCALTIME", Bare("CURRENT_TIMESTAMP")),
            ("LOCALTIMESTAMP", Bare("CURRENT_TIMESTAMP")),
            ("IDENT_SEED", Call("IDENT_SEED")),
            ("IDENT_INCR", Call("IDENT_INCR")),
        ])
        .constructs([
            (
                ConstructKind::Limit,
                Rendering::RowLimit {
                    top: "TOP",
                    limit: "LIMIT",
                },
            ),
            (ConstructKind::Offset, Rendering::Clause("OFFSET")),
            (ConstructKind::AutoIncrement, Rendering::Keyword("IDENTITY")),
            (ConstructKind::MultiRowInsert, Rendering::Generic),
        ])
        .time_mapping([
            ("%Y", "YYYY"),
            ("%y", "YY"),
            ("%m", "MM"),
            ("%d", "DD"),
            ("%H", "HH24"),
            ("%I", "HH12"),
            ("%M", "MI"),
            ("%S", "SS"),
        ])
        .time_format("'YYYY-MM-DD HH24:MI:SS'")
        .charset("UTF8")
}
