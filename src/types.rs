//! Abstract data types.
//!
//! Every column or cast type the MySQL front-end can produce is classified
//! into an [`AbstractType`] before a dialect renders it. Parameters that
//! travel with the type (lengths, precision, enum members) are carried in
//! [`SourceType`].

use serde::Serialize;
use std::fmt;

use crate::error::{ConvertError, ConvertResult};
use crate::surface;

/// Dialect-independent data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AbstractType {
    TinyInt,
    UTinyInt,
    SmallInt,
    USmallInt,
    MediumInt,
    UMediumInt,
    Int,
    UInt,
    BigInt,
    UBigInt,
    Bit,
    Boolean,
    Float,
    Double,
    Real,
    Decimal,
    Char,
    VarChar,
    NChar,
    NVarChar,
    TinyText,
    Text,
    MediumText,
    LongText,
    Binary,
    VarBinary,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Date,
    Time,
    DateTime,
    Timestamp,
    TimestampTz,
    TimestampLtz,
    Year,
    Json,
    Enum,
    Set,
}

impl AbstractType {
    /// Every variant, in declaration order.
    pub const ALL: &'static [AbstractType] = &[
        Self::TinyInt,
        Self::UTinyInt,
        Self::SmallInt,
        Self::USmallInt,
        Self::MediumInt,
        Self::UMediumInt,
        Self::Int,
        Self::UInt,
        Self::BigInt,
        Self::UBigInt,
        Self::Bit,
        Self::Boolean,
        Self::Float,
        Self::Double,
        Self::Real,
        Self::Decimal,
        Self::Char,
        Self::VarChar,
        Self::NChar,
        Self::NVarChar,
        Self::TinyText,
        Self::Text,
        Self::MediumText,
        Self::LongText,
        Self::Binary,
        Self::VarBinary,
        Self::TinyBlob,
        Self::Blob,
        Self::MediumBlob,
        Self::LongBlob,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Timestamp,
        Self::TimestampTz,
        Self::TimestampLtz,
        Self::Year,
        Self::Json,
        Self::Enum,
        Self::Set,
    ];

    /// Resolve a MySQL type name (already upper-cased, single-spaced).
    pub fn from_source_name(name: &str, unsigned: bool) -> Option<Self> {
        use AbstractType::*;

        let ty = match name {
            "TINYINT" | "INT1" => TinyInt,
            "SMALLINT" | "INT2" => SmallInt,
            "MEDIUMINT" | "INT3" | "MIDDLEINT" => MediumInt,
            "INT" | "INTEGER" | "INT4" => Int,
            "BIGINT" | "INT8" => BigInt,
            "SIGNED" | "SIGNED INTEGER" => BigInt,
            "UNSIGNED" | "UNSIGNED INTEGER" => UBigInt,
            "BIT" => Bit,
            "BOOL" | "BOOLEAN" => Boolean,
            "FLOAT" | "FLOAT4" => Float,
            "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" => Double,
            "REAL" => Real,
            "DECIMAL" | "DEC" | "NUMERIC" | "FIXED" => Decimal,
            "CHAR" | "CHARACTER" => Char,
            "VARCHAR" | "CHARACTER VARYING" | "CHAR VARYING" => VarChar,
            "NCHAR" | "NATIONAL CHAR" | "NATIONAL CHARACTER" => NChar,
            "NVARCHAR" | "NATIONAL VARCHAR" | "NCHAR VARCHAR" => NVarChar,
            "TINYTEXT" => TinyText,
            "TEXT" => Text,
            "MEDIUMTEXT" | "LONG" | "LONG VARCHAR" => MediumText,
            "LONGTEXT" => LongText,
            "BINARY" => Binary,
            "VARBINARY" => VarBinary,
            "TINYBLOB" => TinyBlob,
            "BLOB" => Blob,
            "MEDIUMBLOB" | "LONG VARBINARY" => MediumBlob,
            "LONGBLOB" => LongBlob,
            "DATE" => Date,
            "TIME" => Time,
            "DATETIME" => DateTime,
            "TIMESTAMP" => Timestamp,
            "TIMESTAMP WITH TIME ZONE" | "TIMESTAMPTZ" => TimestampTz,
            "TIMESTAMP WITH LOCAL TIME ZONE" => TimestampLtz,
            "YEAR" => Year,
            "JSON" => Json,
            "ENUM" => Enum,
            "SET" => Set,
            _ => return None,
        };

        Some(if unsigned { ty.unsigned() } else { ty })
    }

    /// The unsigned counterpart of an integer type.
    pub fn unsigned(self) -> Self {
        match self {
            Self::TinyInt => Self::UTinyInt,
            Self::SmallInt => Self::USmallInt,
            Self::MediumInt => Self::UMediumInt,
            Self::Int => Self::UInt,
            Self::BigInt => Self::UBigInt,
            other => other,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::TinyInt
                | Self::UTinyInt
                | Self::SmallInt
                | Self::USmallInt
                | Self::MediumInt
                | Self::UMediumInt
                | Self::Int
                | Self::UInt
                | Self::BigInt
                | Self::UBigInt
        )
    }
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A classified source type with its raw parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceType {
    pub kind: AbstractType,
    /// Parenthesized arguments as written, e.g. `["10", "2"]` or `["'a'", "'b'"]`.
    pub params: Vec<String>,
}

impl SourceType {
    pub fn new(kind: AbstractType) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    /// Classify the canonical text of a source data type, e.g. `INT(11) UNSIGNED`.
    pub fn classify(text: &str) -> ConvertResult<Self> {
        let parsed = surface::data_type(text)?;
        let kind = AbstractType::from_source_name(&parsed.name, parsed.unsigned)
            .ok_or_else(|| ConvertError::UnsupportedType(text.trim().to_string()))?;

        Ok(Self {
            kind,
            params: parsed.params,
        })
    }

    /// Members of an ENUM or SET, unquoted.
    pub fn members(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|p| surface::unquote_string(p).unwrap_or_else(|| p.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_integer_widths() {
        let ty = SourceType::classify("INT(11)").unwrap();
        assert_eq!(ty.kind, AbstractType::Int);
        assert_eq!(ty.params, vec!["11"]);

        let ty = SourceType::classify("bigint(20) unsigned").unwrap();
        assert_eq!(ty.kind, AbstractType::UBigInt);
    }

    #[test]
    fn test_classify_multiword() {
        let ty = SourceType::classify("DOUBLE PRECISION").unwrap();
        assert_eq!(ty.kind, AbstractType::Double);

        let ty = SourceType::classify("CHARACTER VARYING(40)").unwrap();
        assert_eq!(ty.kind, AbstractType::VarChar);
        assert_eq!(ty.params, vec!["40"]);

        let ty = SourceType::classify("TIMESTAMP(6) WITH TIME ZONE").unwrap();
        assert_eq!(ty.kind, AbstractType::TimestampTz);
    }

    #[test]
    fn test_enum_members() {
        let ty = SourceType::classify("ENUM('small', 'it''s')").unwrap();
        assert_eq!(ty.kind, AbstractType::Enum);
        assert_eq!(ty.members(), vec!["small", "it's"]);
    }

    #[test]
    fn test_unknown_type() {
        let err = SourceType::classify("GEOMETRY").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedType(ref t) if t == "GEOMETRY"));
    }

    #[test]
    fn test_all_has_no_duplicates() {
        let unique: std::collections::BTreeSet<_> = AbstractType::ALL.iter().collect();
        assert_eq!(unique.len(), AbstractType::ALL.len());
        assert_eq!(AbstractType::ALL.len(), 40);
    }
}
