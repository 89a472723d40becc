//! Server-side SQL data types.
//!
//! The variants mirror the client library's type enumeration one to one.
//! Precision, scale and lengths are column properties and live on
//! [`Column`](super::Column) and [`Parameter`](crate::param::Parameter).

use crate::client::constants::*;
use crate::error::{Error, Result};

/// SQL data type reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Fixed,
    Float,
    CharAscii,
    CharEbcdic,
    CharByte,
    RowId,
    ClobAscii,
    ClobEbcdic,
    Blob,
    StrDb,
    Date,
    Time,
    VFloat,
    Timestamp,
    Unknown,
    Number,
    NoNumber,
    Duration,
    DByteEbcdic,
    LongAscii,
    LongEbcdic,
    LongByte,
    LongDb,
    Boolean,
    CharUnicode,
    DtFiller1,
    DtFiller2,
    Void,
    DtFiller4,
    SmallInt,
    Integer,
    VarcharAscii,
    VarcharEbcdic,
    VarcharByte,
    ClobUnicode,
    LongUnicode,
    VarcharUnicode,
    Udt,
    AbapTabHandle,
    Dwyde,
}

impl SqlType {
    /// Create from the raw type code.
    ///
    /// Returns `Err(Error::UnsupportedType)` for codes outside the enumeration.
    pub fn from_code(code: i32) -> Result<Self> {
        let sql_type = match code {
            SQLTYPE_FIXED => SqlType::Fixed,
            SQLTYPE_FLOAT => SqlType::Float,
            SQLTYPE_CHA => SqlType::CharAscii,
            SQLTYPE_CHE => SqlType::CharEbcdic,
            SQLTYPE_CHB => SqlType::CharByte,
            SQLTYPE_ROWID => SqlType::RowId,
            SQLTYPE_STRA => SqlType::ClobAscii,
            SQLTYPE_STRE => SqlType::ClobEbcdic,
            SQLTYPE_STRB => SqlType::Blob,
            SQLTYPE_STRDB => SqlType::StrDb,
            SQLTYPE_DATE => SqlType::Date,
            SQLTYPE_TIME => SqlType::Time,
            SQLTYPE_VFLOAT => SqlType::VFloat,
            SQLTYPE_TIMESTAMP => SqlType::Timestamp,
            SQLTYPE_UNKNOWN => SqlType::Unknown,
            SQLTYPE_NUMBER => SqlType::Number,
            SQLTYPE_NONUMBER => SqlType::NoNumber,
            SQLTYPE_DURATION => SqlType::Duration,
            SQLTYPE_DBYTEEBCDIC => SqlType::DByteEbcdic,
            SQLTYPE_LONGA => SqlType::LongAscii,
            SQLTYPE_LONGE => SqlType::LongEbcdic,
            SQLTYPE_LONGB => SqlType::LongByte,
            SQLTYPE_LONGDB => SqlType::LongDb,
            SQLTYPE_BOOLEAN => SqlType::Boolean,
            SQLTYPE_UNICODE => SqlType::CharUnicode,
            SQLTYPE_DTFILLER1 => SqlType::DtFiller1,
            SQLTYPE_DTFILLER2 => SqlType::DtFiller2,
            SQLTYPE_VOID => SqlType::Void,
            SQLTYPE_DTFILLER4 => SqlType::DtFiller4,
            SQLTYPE_SMALLINT => SqlType::SmallInt,
            SQLTYPE_INTEGER => SqlType::Integer,
            SQLTYPE_VARCHARA => SqlType::VarcharAscii,
            SQLTYPE_VARCHARE => SqlType::VarcharEbcdic,
            SQLTYPE_VARCHARB => SqlType::VarcharByte,
            SQLTYPE_STRUNI => SqlType::ClobUnicode,
            SQLTYPE_LONGUNI => SqlType::LongUnicode,
            SQLTYPE_VARCHARUNI => SqlType::VarcharUnicode,
            SQLTYPE_UDT => SqlType::Udt,
            SQLTYPE_ABAPTABHANDLE => SqlType::AbapTabHandle,
            SQLTYPE_DWYDE => SqlType::Dwyde,
            _ => return Err(Error::UnsupportedType { code }),
        };
        Ok(sql_type)
    }

    /// Get the raw type code.
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Type name as shown in column information.
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Fixed => "FIXED",
            SqlType::Float => "FLOAT",
            SqlType::CharAscii => "CHAR ASCII",
            SqlType::CharEbcdic => "CHAR EBCDIC",
            SqlType::CharByte => "CHAR BYTE",
            SqlType::RowId => "ROWID",
            SqlType::ClobAscii => "CLOB ASCII",
            SqlType::ClobEbcdic => "CLOB EBCDIC",
            SqlType::Blob => "BLOB",
            SqlType::StrDb => "STRDB",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::VFloat => "VFLOAT",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Unknown => "UNKNOWN",
            SqlType::Number => "NUMBER",
            SqlType::NoNumber => "NONUMBER",
            SqlType::Duration => "DURATION",
            SqlType::DByteEbcdic => "DBYTEEBCDIC",
            SqlType::LongAscii => "LONG ASCII",
            SqlType::LongEbcdic => "LONG EBCDIC",
            SqlType::LongByte => "LONG BYTE",
            SqlType::LongDb => "LONGDB",
            SqlType::Boolean => "BOOLEAN",
            SqlType::CharUnicode => "CHAR UNICODE",
            SqlType::DtFiller1 => "DTFILLER1",
            SqlType::DtFiller2 => "DTFILLER2",
            SqlType::Void => "VOID",
            SqlType::DtFiller4 => "DTFILLER4",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::VarcharAscii => "VARCHAR ASCII",
            SqlType::VarcharEbcdic => "VARCHAR EBCDIC",
            SqlType::VarcharByte => "VARCHAR BYTE",
            SqlType::ClobUnicode => "CLOB UNICODE",
            SqlType::LongUnicode => "LONG UNICODE",
            SqlType::VarcharUnicode => "VARCHAR UNICODE",
            SqlType::Udt => "UDT",
            SqlType::AbapTabHandle => "ABAPTABHANDLE",
            SqlType::Dwyde => "DWYDE",
        }
    }

    /// Check if this is one of the approximate or exact numeric types.
    pub fn is_numeric(&self) -> bool {
        matches!(self, SqlType::Fixed | SqlType::Float | SqlType::VFloat)
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_roundtrip() {
        for code in 0..=SQLTYPE_DWYDE {
            let t = SqlType::from_code(code).unwrap();
            assert_eq!(t.code(), code);
        }
    }

    #[test]
    fn test_from_code_unsupported() {
        match SqlType::from_code(40) {
            Err(Error::UnsupportedType { code }) => assert_eq!(code, 40),
            other => panic!("Expected UnsupportedType error, got {:?}", other),
        }
        assert!(SqlType::from_code(-1).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlType::Fixed.to_string(), "FIXED");
        assert_eq!(SqlType::LongUnicode.to_string(), "LONG UNICODE");
        assert_eq!(
            SqlType::from_code(SQLTYPE_VARCHARB).unwrap().to_string(),
            "VARCHAR BYTE"
        );
    }
}
