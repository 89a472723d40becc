//! SQLDBC client library constants.
//!
//! Type codes follow the numbering of the SQLDBC `SQLType` enumeration.

// Length indicators
pub const SQLDBC_NULL_DATA: i64 = -1;
pub const SQLDBC_NO_TOTAL: i64 = -4;

// Host transfer sizes
pub const SIZEOF_INT4: usize = 4;
pub const SIZEOF_INT8: usize = 8;
pub const SIZEOF_DOUBLE: usize = 8;
/// Worst case number of UTF-8 bytes for one character.
pub const MAX_UTF8_BYTES_PER_CHAR: usize = 4;

/// Label used when the server reports neither alias nor column name.
pub const UNKNOWN_COLUMN_LABEL: &str = "UNKNOWN";

/// Upper bound for the result set fetch size.
pub const MAX_FETCH_SIZE: u16 = i16::MAX as u16;

// SQL types
pub const SQLTYPE_FIXED: i32 = 0;
pub const SQLTYPE_FLOAT: i32 = 1;
pub const SQLTYPE_CHA: i32 = 2;
pub const SQLTYPE_CHE: i32 = 3;
pub const SQLTYPE_CHB: i32 = 4;
pub const SQLTYPE_ROWID: i32 = 5;
pub const SQLTYPE_STRA: i32 = 6;
pub const SQLTYPE_STRE: i32 = 7;
pub const SQLTYPE_STRB: i32 = 8;
pub const SQLTYPE_STRDB: i32 = 9;
pub const SQLTYPE_DATE: i32 = 10;
pub const SQLTYPE_TIME: i32 = 11;
pub const SQLTYPE_VFLOAT: i32 = 12;
pub const SQLTYPE_TIMESTAMP: i32 = 13;
pub const SQLTYPE_UNKNOWN: i32 = 14;
pub const SQLTYPE_NUMBER: i32 = 15;
pub const SQLTYPE_NONUMBER: i32 = 16;
pub const SQLTYPE_DURATION: i32 = 17;
pub const SQLTYPE_DBYTEEBCDIC: i32 = 18;
pub const SQLTYPE_LONGA: i32 = 19;
pub const SQLTYPE_LONGE: i32 = 20;
pub const SQLTYPE_LONGB: i32 = 21;
pub const SQLTYPE_LONGDB: i32 = 22;
pub const SQLTYPE_BOOLEAN: i32 = 23;
pub const SQLTYPE_UNICODE: i32 = 24;
pub const SQLTYPE_DTFILLER1: i32 = 25;
pub const SQLTYPE_DTFILLER2: i32 = 26;
pub const SQLTYPE_VOID: i32 = 27;
pub const SQLTYPE_DTFILLER4: i32 = 28;
pub const SQLTYPE_SMALLINT: i32 = 29;
pub const SQLTYPE_INTEGER: i32 = 30;
pub const SQLTYPE_VARCHARA: i32 = 31;
pub const SQLTYPE_VARCHARE: i32 = 32;
pub const SQLTYPE_VARCHARB: i32 = 33;
pub const SQLTYPE_STRUNI: i32 = 34;
pub const SQLTYPE_LONGUNI: i32 = 35;
pub const SQLTYPE_VARCHARUNI: i32 = 36;
pub const SQLTYPE_UDT: i32 = 37;
pub const SQLTYPE_ABAPTABHANDLE: i32 = 38;
pub const SQLTYPE_DWYDE: i32 = 39;
