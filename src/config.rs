//! Result set configuration.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::client::constants::MAX_FETCH_SIZE;
use crate::client::ServerStatement;
use crate::error::{Error, Result};

/// Scrolling behaviour of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultSetType {
    /// The result set can only be scrolled forward.
    #[default]
    ForwardOnly,
    /// Scrollable, reflects concurrent changes.
    ScrollSensitive,
    /// Scrollable, does not change.
    ScrollInsensitive,
}

impl ResultSetType {
    /// SQL name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSetType::ForwardOnly => "FORWARD ONLY",
            ResultSetType::ScrollSensitive => "SCROLL SENSITIVE",
            ResultSetType::ScrollInsensitive => "SCROLL INSENSITIVE",
        }
    }
}

impl fmt::Display for ResultSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultSetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [
            ResultSetType::ForwardOnly,
            ResultSetType::ScrollSensitive,
            ResultSetType::ScrollInsensitive,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| Error::invalid_config("result set type", format!("unknown value \"{s}\"")))
    }
}

/// Concurrency of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    #[default]
    ReadOnly,
    Updatable,
    /// Updatable with optimistic locking.
    UpdatableLockOptimistic,
}

impl Concurrency {
    /// SQL name of the concurrency type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Concurrency::ReadOnly => "READ ONLY",
            Concurrency::Updatable => "UPDATABLE",
            Concurrency::UpdatableLockOptimistic => "UPDATABLE LOCK OPTIMISTIC",
        }
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Concurrency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [
            Concurrency::ReadOnly,
            Concurrency::Updatable,
            Concurrency::UpdatableLockOptimistic,
        ]
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| {
            Error::invalid_config("result set concurrency type", format!("unknown value \"{s}\""))
        })
    }
}

/// Options applied to a statement before each execution.
///
/// Unset options leave the statement's current setting alone.
///
/// # Example
///
/// ```
/// use sdbc_marshal::{ResultSetConfig, ResultSetType};
///
/// let config = ResultSetConfig::new()
///     .with_cursor_name("rooms")
///     .with_max_rows(100)
///     .with_result_set_type(ResultSetType::ScrollInsensitive)
///     .with_fetch_size(1)
///     .unwrap();
/// assert_eq!(config.fetch_size, Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSetConfig {
    /// Cursor name for positioned updates.
    pub cursor_name: Option<String>,
    /// Limit on the number of rows in a result set, 0 for no limit.
    pub max_rows: Option<u32>,
    pub result_set_type: Option<ResultSetType>,
    pub concurrency: Option<Concurrency>,
    /// Rows fetched per round trip. 1 makes `CURRENT OF` updates possible.
    pub fetch_size: Option<u16>,
}

impl ResultSetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor_name(mut self, name: impl Into<String>) -> Self {
        self.cursor_name = Some(name.into());
        self
    }

    pub fn with_max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_result_set_type(mut self, kind: ResultSetType) -> Self {
        self.result_set_type = Some(kind);
        self
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Set the fetch size.
    ///
    /// Returns `Err(Error::InvalidConfig)` outside `0..=32767`.
    pub fn with_fetch_size(mut self, rows: i32) -> Result<Self> {
        let size = u16::try_from(rows)
            .ok()
            .filter(|size| *size <= MAX_FETCH_SIZE)
            .ok_or_else(|| {
                Error::invalid_config(
                    "fetch size",
                    format!("{rows} is outside the valid range (0..{MAX_FETCH_SIZE})"),
                )
            })?;
        self.fetch_size = Some(size);
        Ok(self)
    }

    /// Merge `other` over this configuration.
    ///
    /// Options set in `other` replace the ones set here.
    pub fn merge(&mut self, other: &ResultSetConfig) {
        if other.cursor_name.is_some() {
            self.cursor_name.clone_from(&other.cursor_name);
        }
        self.max_rows = other.max_rows.or(self.max_rows);
        self.result_set_type = other.result_set_type.or(self.result_set_type);
        self.concurrency = other.concurrency.or(self.concurrency);
        self.fetch_size = other.fetch_size.or(self.fetch_size);
    }

    /// Apply the statement options to a server statement.
    pub fn apply<S: ServerStatement + ?Sized>(&self, stmt: &mut S) -> Result<()> {
        if let Some(name) = &self.cursor_name {
            stmt.set_cursor_name(name)?;
        }
        if let Some(kind) = self.result_set_type {
            stmt.set_result_set_type(kind)?;
        }
        if let Some(concurrency) = self.concurrency {
            stmt.set_concurrency(concurrency)?;
        }
        if let Some(max_rows) = self.max_rows {
            stmt.set_max_rows(max_rows)?;
        }
        trace!(config = ?self, "Applied result set configuration");
        Ok(())
    }
}
