//! Error types for the marshaling layer.

use std::panic::Location;
use thiserror::Error;

/// Result type alias for marshaling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for binding, fetching and LOB operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database error reported by the client library.
    #[error("[{code}] {message}")]
    Server { code: i32, message: String },

    /// Both `?` and `:NAME` markers were found in one statement.
    #[error("mixing named and positional parameters in the same SQL is not supported")]
    MixedPlaceholders,

    /// The scanner found more markers than the server reported.
    #[error("SQL scanner found {found} parameters, but the database reported {reported}")]
    TooManyPlaceholders { found: usize, reported: usize },

    /// The scanner found fewer markers than the server reported.
    #[error("SQL scanner found only {found} of the {reported} parameters that the database reported")]
    MissingPlaceholders { found: usize, reported: usize },

    /// Bound value does not fit the parameter's declared maximum.
    #[error("argument {position}[{length}] is longer than max parameter length of {max_length}")]
    ValueTooLong {
        position: usize,
        length: usize,
        max_length: usize,
    },

    /// Type conversion error.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Wrong number of arguments for a prepared statement.
    #[error("{expected} {kind} arguments are expected, {provided} were provided", kind = argument_kind(.named))]
    ArgumentCount {
        expected: usize,
        provided: usize,
        named: bool,
    },

    /// Named argument does not match any parameter of the statement.
    #[error("cannot find parameter {name} in the statement")]
    ParameterNotFound { name: String },

    /// Positional arguments were given to a statement with named markers.
    #[error("statement uses named parameters, positional arguments were provided")]
    NamedArgumentsRequired,

    /// LOB handle used after it was closed.
    #[error("LOB is already closed")]
    LobClosed,

    /// The server described a result set without columns.
    #[error("result set has no columns")]
    NoColumns,

    /// Fetch or column access without an active result set.
    #[error("the last executed statement did not return a result set")]
    NoResultSet,

    /// Operation not available for this kind of statement.
    #[error("{operation} requires a {expected} statement")]
    StatementKind {
        operation: &'static str,
        expected: &'static str,
    },

    /// Statement database handles were already released.
    #[error("statement has been closed")]
    StatementClosed,

    /// Column number outside the result set.
    #[error("{index} is outside the valid range (1..{count}) for this query")]
    ColumnOutOfRange { index: usize, count: usize },

    /// Invalid configuration value.
    #[error("Invalid {option}: {message}")]
    InvalidConfig {
        option: &'static str,
        message: String,
    },

    /// Transfer buffer too small for the data.
    #[error("Buffer too small: need {needed} bytes, have {available} failed at {location}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// Unsupported SQL data type code.
    #[error("Unsupported SQL data type: {code}")]
    UnsupportedType { code: i32 },
}

fn argument_kind(named: &bool) -> &'static str {
    if *named {
        "named"
    } else {
        "positional"
    }
}

impl Error {
    /// Create a server error.
    pub fn server(code: i32, message: impl Into<String>) -> Self {
        Self::Server {
            code,
            message: message.into(),
        }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(option: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            option,
            message: message.into(),
        }
    }

    /// Create a buffer overflow error located at the caller.
    #[track_caller]
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall {
            needed,
            available,
            location: Location::caller(),
        }
    }

    /// Server error code, if this error came from the database.
    pub fn server_code(&self) -> Option<i32> {
        match self {
            Self::Server { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_too_long_message() {
        let err = Error::ValueTooLong {
            position: 2,
            length: 12,
            max_length: 10,
        };
        assert_eq!(
            err.to_string(),
            "argument 2[12] is longer than max parameter length of 10"
        );
    }

    #[test]
    fn test_argument_count_message() {
        let err = Error::ArgumentCount {
            expected: 2,
            provided: 1,
            named: true,
        };
        assert_eq!(
            err.to_string(),
            "2 named arguments are expected, 1 were provided"
        );
    }

    #[test]
    fn test_buffer_too_small_message() {
        let err = Error::buffer_too_small(8, 4);
        let message = err.to_string();
        assert!(message.starts_with("Buffer too small: need 8 bytes, have 4 failed at "));
        assert!(message.contains("error.rs"));
    }

    #[test]
    fn test_server_code() {
        let err = Error::server(-4004, "Unknown table name");
        assert_eq!(err.server_code(), Some(-4004));
        assert_eq!(err.to_string(), "[-4004] Unknown table name");
        assert_eq!(Error::LobClosed.server_code(), None);
    }
}
