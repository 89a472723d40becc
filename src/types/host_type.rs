//! Host transfer types and the SQL type resolver.
//!
//! Every column and parameter is exchanged with the client library in
//! exactly one host representation. The decision only depends on metadata
//! the server already reported, so it never needs a round trip.

use super::sql_type::SqlType;
use crate::client::constants::{
    MAX_UTF8_BYTES_PER_CHAR, SIZEOF_DOUBLE, SIZEOF_INT4, SIZEOF_INT8,
};

/// Numeric precision above which values are transferred as text.
pub const MAX_DOUBLE_PRECISION: i16 = 15;
/// Numeric precision above which integers need 64 bits.
pub const MAX_INT4_PRECISION: i16 = 9;

/// Host representation used to transfer a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// IEEE double.
    Double,
    /// Exact numeric rendered as decimal text.
    NumericText,
    /// Raw bytes.
    Binary,
    /// UTF-8 text.
    Utf8,
    /// Binary large object, accessed through a LOB handle.
    Blob,
    /// Character large object, accessed through a LOB handle.
    Clob,
}

impl HostType {
    /// Resolve the host type for a server type.
    ///
    /// Used unchanged for result columns and statement parameters.
    pub fn resolve(sql_type: SqlType, precision: i16, scale: i16) -> Self {
        match sql_type {
            SqlType::Fixed | SqlType::Float | SqlType::VFloat => {
                if precision > MAX_DOUBLE_PRECISION {
                    HostType::NumericText
                } else if scale > 0 {
                    HostType::Double
                } else if precision > MAX_INT4_PRECISION {
                    HostType::Int64
                } else {
                    HostType::Int32
                }
            }
            SqlType::Boolean | SqlType::SmallInt | SqlType::Integer => HostType::Int32,
            SqlType::CharByte | SqlType::VarcharByte => HostType::Binary,
            SqlType::Blob | SqlType::LongByte => HostType::Blob,
            SqlType::ClobAscii
            | SqlType::ClobEbcdic
            | SqlType::ClobUnicode
            | SqlType::LongAscii
            | SqlType::LongEbcdic
            | SqlType::LongUnicode => HostType::Clob,
            _ => HostType::Utf8,
        }
    }

    /// Check if values are exchanged through a LOB handle.
    pub fn is_lob(&self) -> bool {
        matches!(self, HostType::Blob | HostType::Clob)
    }

    /// Check if values are transferred as text.
    pub fn is_text(&self) -> bool {
        matches!(self, HostType::NumericText | HostType::Utf8 | HostType::Clob)
    }

    /// Natural machine size for scalar types, `None` for variable types.
    pub fn scalar_size(&self) -> Option<usize> {
        match self {
            HostType::Int32 => Some(SIZEOF_INT4),
            HostType::Int64 => Some(SIZEOF_INT8),
            HostType::Double => Some(SIZEOF_DOUBLE),
            _ => None,
        }
    }

    /// Maximum number of bytes a value of this type may occupy.
    ///
    /// Scalars use their natural size, byte types the physical length and
    /// character types the declared length in characters times the widest
    /// UTF-8 encoding.
    pub fn max_byte_length(&self, declared_length: i32, byte_length: i32) -> usize {
        if let Some(size) = self.scalar_size() {
            return size;
        }
        match self {
            HostType::Binary | HostType::Blob => byte_length.max(0) as usize,
            _ => declared_length.max(0) as usize * MAX_UTF8_BYTES_PER_CHAR,
        }
    }
}

impl std::fmt::Display for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HostType::Int32 => "int",
            HostType::Int64 => "wideint",
            HostType::Double => "double",
            HostType::NumericText => "decimal",
            HostType::Binary => "bytearray",
            HostType::Utf8 => "string",
            HostType::Blob => "blob",
            HostType::Clob => "clob",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_numeric_rules() {
        assert_eq!(HostType::resolve(SqlType::Fixed, 5, 0), HostType::Int32);
        assert_eq!(HostType::resolve(SqlType::Fixed, 9, 0), HostType::Int32);
        assert_eq!(HostType::resolve(SqlType::Fixed, 10, 0), HostType::Int64);
        assert_eq!(HostType::resolve(SqlType::Fixed, 15, 0), HostType::Int64);
        assert_eq!(HostType::resolve(SqlType::Fixed, 10, 2), HostType::Double);
        assert_eq!(HostType::resolve(SqlType::Float, 16, 0), HostType::NumericText);
        assert_eq!(HostType::resolve(SqlType::VFloat, 38, 5), HostType::NumericText);
    }

    #[test]
    fn test_small_integer_types() {
        for t in [SqlType::Boolean, SqlType::SmallInt, SqlType::Integer] {
            assert_eq!(HostType::resolve(t, 0, 0), HostType::Int32);
        }
    }

    #[test]
    fn test_byte_and_long_types() {
        assert_eq!(HostType::resolve(SqlType::CharByte, 0, 0), HostType::Binary);
        assert_eq!(HostType::resolve(SqlType::VarcharByte, 0, 0), HostType::Binary);
        assert_eq!(HostType::resolve(SqlType::Blob, 0, 0), HostType::Blob);
        assert_eq!(HostType::resolve(SqlType::LongByte, 0, 0), HostType::Blob);
        for t in [
            SqlType::ClobAscii,
            SqlType::ClobEbcdic,
            SqlType::ClobUnicode,
            SqlType::LongAscii,
            SqlType::LongEbcdic,
            SqlType::LongUnicode,
        ] {
            assert_eq!(HostType::resolve(t, 0, 0), HostType::Clob);
        }
    }

    #[test]
    fn test_fallback_is_utf8() {
        for t in [
            SqlType::CharAscii,
            SqlType::VarcharUnicode,
            SqlType::Date,
            SqlType::Timestamp,
            SqlType::Number,
            SqlType::Unknown,
        ] {
            assert_eq!(HostType::resolve(t, 20, 4), HostType::Utf8);
        }
    }

    #[test]
    fn test_max_byte_length() {
        assert_eq!(HostType::Int32.max_byte_length(10, 6), 4);
        assert_eq!(HostType::Int64.max_byte_length(18, 10), 8);
        assert_eq!(HostType::Binary.max_byte_length(8, 9), 9);
        assert_eq!(HostType::Utf8.max_byte_length(10, 11), 40);
        assert_eq!(HostType::Utf8.max_byte_length(-1, 0), 0);
    }

    fn numeric_type() -> impl Strategy<Value = SqlType> {
        prop_oneof![
            Just(SqlType::Fixed),
            Just(SqlType::Float),
            Just(SqlType::VFloat),
        ]
    }

    proptest! {
        #[test]
        fn wide_precision_is_text(t in numeric_type(), precision in 16i16..=64, scale in -8i16..=64) {
            prop_assert_eq!(HostType::resolve(t, precision, scale), HostType::NumericText);
        }

        #[test]
        fn narrow_integers_are_int32(t in numeric_type(), precision in 0i16..=9) {
            prop_assert_eq!(HostType::resolve(t, precision, 0), HostType::Int32);
        }

        #[test]
        fn medium_integers_are_int64(t in numeric_type(), precision in 10i16..=15) {
            prop_assert_eq!(HostType::resolve(t, precision, 0), HostType::Int64);
        }

        #[test]
        fn scaled_numbers_are_double(t in numeric_type(), precision in 0i16..=15, scale in 1i16..=15) {
            prop_assert_eq!(HostType::resolve(t, precision, scale), HostType::Double);
        }
    }
}
