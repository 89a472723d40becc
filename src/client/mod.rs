//! Interface to the SQLDBC-style client library.
//!
//! The marshaling layer never talks to the network itself. Everything it
//! needs from the database goes through the traits in this module, which
//! mirror the handle objects of the client library: statements, prepared
//! statements, result sets and LOB handles. All calls block.
//!
//! [`memory`] provides a scripted implementation used by the tests.

pub mod buffer;
pub mod constants;
pub mod memory;

pub use buffer::TransferBuffer;

use crate::config::{Concurrency, ResultSetType};
use crate::cursor::Seek;
use crate::error::Result;
use crate::types::HostType;

/// Nullability reported for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullability {
    NoNulls,
    Nullable,
    #[default]
    Unknown,
}

impl Nullability {
    /// Convert to a tri-state flag, `None` when unknown.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Nullability::NoNulls => Some(false),
            Nullability::Nullable => Some(true),
            Nullability::Unknown => None,
        }
    }
}

/// Direction of a statement parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterMode {
    #[default]
    In,
    Out,
    InOut,
}

impl ParameterMode {
    /// Check if the parameter carries a value to the server.
    pub fn is_input(&self) -> bool {
        matches!(self, ParameterMode::In | ParameterMode::InOut)
    }

    /// Check if the parameter returns a value from the server.
    pub fn is_output(&self) -> bool {
        matches!(self, ParameterMode::Out | ParameterMode::InOut)
    }
}

/// Raw result column description from the server.
#[derive(Debug, Clone, Default)]
pub struct ColumnMetadata {
    /// Column alias.
    pub label: Option<String>,
    /// Column name.
    pub name: Option<String>,
    pub schema: Option<String>,
    pub table: Option<String>,
    /// Declared length in characters or digits.
    pub length: i32,
    pub precision: i16,
    pub scale: i16,
    /// Physical length in bytes.
    pub byte_length: i32,
    /// Raw SQL type code.
    pub sql_type: i32,
    pub nullable: Nullability,
    pub writable: bool,
}

/// Raw statement parameter description from the server.
#[derive(Debug, Clone, Default)]
pub struct ParameterMetadata {
    /// Raw SQL type code.
    pub sql_type: i32,
    /// Declared length in characters or digits.
    pub length: i32,
    pub precision: i16,
    pub scale: i16,
    /// Physical length in bytes.
    pub byte_length: i32,
    pub mode: ParameterMode,
}

/// Key selector for [`ServerStatement::last_inserted_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serial {
    First,
    Last,
}

/// Outcome of a positioning call on a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekStatus {
    /// The cursor now stands on a row.
    Row,
    /// The move left the result set.
    NoData,
}

/// Outcome of a partial LOB read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobRead {
    /// Number of bytes written into the buffer.
    Data(usize),
    /// Read position is past the end of the LOB.
    NoData,
    /// The LOB is SQL NULL.
    Null,
}

/// Result of executing a statement.
pub enum Execution {
    /// The statement produced a result set.
    Query(Box<dyn ServerResultSet>),
    /// The statement modified rows.
    Update { rows_affected: i64 },
}

impl std::fmt::Debug for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Execution::Query(_) => f.write_str("Query(..)"),
            Execution::Update { rows_affected } => f
                .debug_struct("Update")
                .field("rows_affected", rows_affected)
                .finish(),
        }
    }
}

/// Transfer buffer bound to one parameter for a single execution.
#[derive(Debug)]
pub struct Binding<'a> {
    /// 1-based parameter index.
    pub index: usize,
    pub host_type: HostType,
    pub mode: ParameterMode,
    /// Input value on entry, output value on return for OUT/INOUT.
    pub buffer: &'a mut TransferBuffer,
}

/// Statement handle.
pub trait ServerStatement {
    fn set_cursor_name(&mut self, name: &str) -> Result<()>;
    fn set_max_rows(&mut self, max_rows: u32) -> Result<()>;
    fn set_result_set_type(&mut self, kind: ResultSetType) -> Result<()>;
    fn set_concurrency(&mut self, concurrency: Concurrency) -> Result<()>;

    /// Execute SQL text directly.
    fn execute(&mut self, sql: &str) -> Result<Execution>;

    /// Execute a batch of statements, returning one row status per entry.
    ///
    /// The batch is cleared before returning, on success and on failure.
    fn execute_batch(&mut self, sql: &[&str]) -> Result<Vec<i32>>;

    /// Last serial key generated by the previous insert, if any.
    fn last_inserted_key(&mut self, which: Serial) -> Result<Option<i64>>;

    /// Release the handle. Further calls are undefined.
    fn release(&mut self);
}

/// Prepared statement handle.
pub trait ServerPreparedStatement: ServerStatement {
    /// Parse SQL and return its parameter descriptions.
    fn prepare(&mut self, sql: &str) -> Result<Vec<ParameterMetadata>>;

    /// Execute with one binding per parameter, in parameter order.
    ///
    /// OUT and INOUT buffers are filled only if the call succeeds.
    fn execute_prepared(&mut self, bindings: &mut [Binding<'_>]) -> Result<Execution>;
}

/// Result set handle.
pub trait ServerResultSet {
    fn metadata(&self) -> Result<Vec<ColumnMetadata>>;

    /// Number of rows, or [`SQLDBC_NO_TOTAL`](constants::SQLDBC_NO_TOTAL).
    fn result_count(&self) -> i64;

    fn set_fetch_size(&mut self, rows: u16) -> Result<()>;

    fn seek(&mut self, seek: Seek) -> Result<SeekStatus>;

    /// 1-based current row number, 0 when not on a row.
    fn row_number(&self) -> i64;

    /// Copy column `column` (1-based) of the current row into `buffer`.
    fn get_column(&mut self, column: usize, host_type: HostType, buffer: &mut TransferBuffer)
        -> Result<()>;

    /// Open a LOB handle on column `column`, `None` for SQL NULL.
    fn get_lob(&mut self, column: usize, host_type: HostType) -> Result<Option<Box<dyn ServerLob>>>;

    fn close(&mut self);
}

/// Large object handle.
pub trait ServerLob {
    /// Length in characters (CLOB) or bytes (BLOB).
    fn length(&self) -> Result<i64>;

    /// 1-based current position, 0 when unknown.
    fn position(&self) -> Result<i64>;

    /// Preferred transfer chunk size.
    fn preferred_size(&self) -> Result<i64>;

    /// Read into `buffer` from `position`, or from the current position.
    fn get_data(&mut self, buffer: &mut [u8], position: Option<i64>) -> Result<LobRead>;

    /// Write at the current position.
    fn put_data(&mut self, data: &[u8]) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}
