//! Host value type.

use super::lob::LobHandle;
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::fmt;

/// A value in the host's dynamic type system.
///
/// Bind input, OUT parameter results and fetched cells all use this type.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// SQL NULL.
    Null,
    /// 32-bit integer.
    Int32(i32),
    /// 64-bit integer.
    Int64(i64),
    /// Double precision number.
    Double(f64),
    /// UTF-8 text. Also carries exact numerics too wide for a double.
    Text(String),
    /// Byte array.
    Bytes(Vec<u8>),
    /// Handle to a large object.
    Lob(LobHandle),
}

impl HostValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// Check if the value binds as SQL NULL.
    ///
    /// A value binds as NULL when it has no scalar subtype and its text is
    /// empty, so an empty string is NULL while an empty byte array is not.
    pub fn is_null_input(&self) -> bool {
        match self {
            HostValue::Null => true,
            HostValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HostValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get the LOB handle.
    pub fn as_lob(&self) -> Option<&LobHandle> {
        match self {
            HostValue::Lob(lob) => Some(lob),
            _ => None,
        }
    }

    /// Convert to a 32-bit integer.
    pub fn to_i32(&self) -> Result<i32> {
        match self {
            HostValue::Int32(i) => Ok(*i),
            HostValue::Int64(i) => i32::try_from(*i).map_err(|_| {
                Error::type_conversion(format!("integer value too large to represent: {i}"))
            }),
            HostValue::Text(_) | HostValue::Bytes(_) => {
                let text = self.to_text()?;
                text.trim()
                    .parse()
                    .map_err(|_| Error::type_conversion(format!("expected integer but got \"{text}\"")))
            }
            other => Err(other.mismatch("integer")),
        }
    }

    /// Convert to a 64-bit integer.
    pub fn to_i64(&self) -> Result<i64> {
        match self {
            HostValue::Int32(i) => Ok(i64::from(*i)),
            HostValue::Int64(i) => Ok(*i),
            HostValue::Text(_) | HostValue::Bytes(_) => {
                let text = self.to_text()?;
                text.trim()
                    .parse()
                    .map_err(|_| Error::type_conversion(format!("expected integer but got \"{text}\"")))
            }
            other => Err(other.mismatch("integer")),
        }
    }

    /// Convert to a double.
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            HostValue::Int32(i) => Ok(f64::from(*i)),
            HostValue::Int64(i) => Ok(*i as f64),
            HostValue::Double(d) => Ok(*d),
            HostValue::Text(_) | HostValue::Bytes(_) => {
                let text = self.to_text()?;
                text.trim().parse().map_err(|_| {
                    Error::type_conversion(format!("expected floating-point number but got \"{text}\""))
                })
            }
            other => Err(other.mismatch("floating-point number")),
        }
    }

    /// Get the textual form of the value.
    pub fn to_text(&self) -> Result<Cow<'_, str>> {
        match self {
            HostValue::Null => Ok(Cow::Borrowed("")),
            HostValue::Text(s) => Ok(Cow::Borrowed(s)),
            HostValue::Bytes(b) => std::str::from_utf8(b)
                .map(Cow::Borrowed)
                .map_err(|e| Error::type_conversion(format!("byte array is not valid UTF-8: {e}"))),
            HostValue::Lob(_) => Err(self.mismatch("string")),
            scalar => Ok(Cow::Owned(scalar.to_string())),
        }
    }

    /// Get the byte array form of the value.
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            HostValue::Bytes(b) => Ok(Cow::Borrowed(b)),
            HostValue::Lob(_) => Err(self.mismatch("byte array")),
            other => Ok(match other.to_text()? {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            }),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Int32(_) => "int",
            HostValue::Int64(_) => "wideint",
            HostValue::Double(_) => "double",
            HostValue::Text(_) => "string",
            HostValue::Bytes(_) => "bytearray",
            HostValue::Lob(_) => "sdblob",
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_conversion(format!("expected {expected} but got {}", self.type_name()))
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Null => Ok(()),
            HostValue::Int32(i) => write!(f, "{}", i),
            HostValue::Int64(i) => write!(f, "{}", i),
            // Keep a decimal point on integral doubles so they read back as doubles
            HostValue::Double(d) if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e16 => {
                write!(f, "{:.1}", d)
            }
            HostValue::Double(d) => write!(f, "{}", d),
            HostValue::Text(s) => write!(f, "{}", s),
            HostValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            HostValue::Lob(lob) => write!(f, "<{}>", lob.kind()),
        }
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        HostValue::Int32(v)
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Int64(v)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Double(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::Text(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        HostValue::Text(v)
    }
}

impl From<Vec<u8>> for HostValue {
    fn from(v: Vec<u8>) -> Self {
        HostValue::Bytes(v)
    }
}

impl From<LobHandle> for HostValue {
    fn from(v: LobHandle) -> Self {
        HostValue::Lob(v)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(HostValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_input_rule() {
        assert!(HostValue::Null.is_null_input());
        assert!(HostValue::Text(String::new()).is_null_input());
        assert!(!HostValue::Text(" ".into()).is_null_input());
        assert!(!HostValue::Bytes(Vec::new()).is_null_input());
        assert!(!HostValue::Int32(0).is_null_input());
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(HostValue::from(" 42 ").to_i32().unwrap(), 42);
        assert_eq!(HostValue::Int64(7).to_i32().unwrap(), 7);
        assert!(HostValue::Int64(i64::MAX).to_i32().is_err());
        assert!(HostValue::Double(1.0).to_i32().is_err());
        assert_eq!(HostValue::from("-9000000000").to_i64().unwrap(), -9_000_000_000);
        assert!(matches!(
            HostValue::from("abc").to_i64(),
            Err(Error::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_double_conversions() {
        assert_eq!(HostValue::from("2.25").to_f64().unwrap(), 2.25);
        assert_eq!(HostValue::Int32(3).to_f64().unwrap(), 3.0);
        assert!(HostValue::from("x1").to_f64().is_err());
    }

    #[test]
    fn test_textual_forms() {
        assert_eq!(HostValue::Double(1.0).to_string(), "1.0");
        assert_eq!(HostValue::Double(0.5).to_string(), "0.5");
        assert_eq!(HostValue::Int64(-3).to_text().unwrap(), "-3");
        assert_eq!(HostValue::Null.to_text().unwrap(), "");
        assert_eq!(HostValue::from("ab").to_bytes().unwrap().as_ref(), b"ab");
        assert!(HostValue::Bytes(vec![0xff]).to_text().is_err());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(HostValue::from(None::<i32>), HostValue::Null);
        assert_eq!(HostValue::from(Some(5)), HostValue::Int32(5));
    }
}
