//! Scrollable cursor over a server result set.
//!
//! The row position itself lives on the server. The cursor forwards every
//! move and keeps track of where the last one left it, so that callers can
//! tell "on a row" from "ran off the front" or "ran off the end".
//!
//! # Example
//!
//! ```
//! use sdbc_marshal::client::constants::SQLTYPE_INTEGER;
//! use sdbc_marshal::client::memory::{column, MemoryResult, MemoryResultSet};
//! use sdbc_marshal::{Cursor, CursorState, HostValue, Seek};
//!
//! let result = MemoryResult::new(vec![column("N", SQLTYPE_INTEGER, 10)])
//!     .row(vec![1.into()])
//!     .row(vec![2.into()]);
//! let mut cursor = Cursor::open(Box::new(MemoryResultSet::new(result)))?;
//!
//! let row = cursor.fetch(Seek::Last)?.expect("a last row");
//! assert_eq!(row.get(0), Some(&HostValue::Int32(2)));
//! assert!(cursor.fetch(Seek::Next)?.is_none());
//! assert_eq!(cursor.state(), CursorState::AfterLast);
//! # Ok::<(), sdbc_marshal::Error>(())
//! ```

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::client::{SeekStatus, ServerResultSet};
use crate::error::{Error, Result};
use crate::materialize::RowDecoder;
use crate::types::{ColumnInfo, Row};

/// Cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seek {
    Next,
    Previous,
    First,
    Last,
    /// Move to a 1-based row number. Negative numbers count from the end.
    Absolute(i64),
    /// Move by a signed number of rows.
    Relative(i64),
}

impl fmt::Display for Seek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seek::Next => f.write_str("NEXT"),
            Seek::Previous => f.write_str("PREVIOUS"),
            Seek::First => f.write_str("FIRST"),
            Seek::Last => f.write_str("LAST"),
            Seek::Absolute(n) => write!(f, "ABSOLUTE {n}"),
            Seek::Relative(n) => write!(f, "RELATIVE {n}"),
        }
    }
}

/// Where the cursor stands after its last move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    /// No move has been made yet.
    #[default]
    Unpositioned,
    OnRow,
    BeforeFirst,
    AfterLast,
}

/// Outcome of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOutcome {
    OnRow,
    /// The move left the result set.
    PastEdge,
}

impl Seek {
    /// Edge a move ends up on when the server reports no row.
    fn edge(&self, current: CursorState) -> CursorState {
        match *self {
            Seek::Next | Seek::First | Seek::Last => CursorState::AfterLast,
            Seek::Previous => CursorState::BeforeFirst,
            Seek::Absolute(n) if n > 0 => CursorState::AfterLast,
            Seek::Absolute(_) => CursorState::BeforeFirst,
            Seek::Relative(d) if d > 0 => CursorState::AfterLast,
            Seek::Relative(d) if d < 0 => CursorState::BeforeFirst,
            Seek::Relative(_) => current,
        }
    }
}

/// Scrollable cursor owning a server result set.
///
/// Closing the cursor (explicitly or on drop) closes the result set. Rows
/// already fetched stay valid, including their LOB handles.
pub struct Cursor {
    rset: Box<dyn ServerResultSet>,
    decoder: RowDecoder,
    state: CursorState,
    closed: bool,
}

impl Cursor {
    /// Wrap a freshly executed result set.
    ///
    /// Fails with [`Error::NoColumns`] for a result set without columns.
    /// The result set is closed if the cursor cannot be opened.
    pub fn open(mut rset: Box<dyn ServerResultSet>) -> Result<Self> {
        let columns = rset
            .metadata()
            .and_then(|meta| ColumnInfo::from_metadata(&meta))
            .and_then(|columns| {
                if columns.is_empty() {
                    Err(Error::NoColumns)
                } else {
                    Ok(columns)
                }
            });
        let columns = match columns {
            Ok(columns) => columns,
            Err(e) => {
                rset.close();
                return Err(e);
            }
        };
        debug!(columns = columns.len(), "Opened cursor");
        Ok(Self {
            rset,
            decoder: RowDecoder::new(Rc::new(columns)),
            state: CursorState::Unpositioned,
            closed: false,
        })
    }

    /// Column information of the result set.
    pub fn columns(&self) -> &Rc<ColumnInfo> {
        self.decoder.columns()
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Total number of rows as reported by the server.
    pub fn result_count(&self) -> i64 {
        self.rset.result_count()
    }

    /// 1-based number of the current row, 0 when not on a row.
    pub fn row_number(&self) -> i64 {
        match self.state {
            CursorState::OnRow => self.rset.row_number(),
            _ => 0,
        }
    }

    /// Move the cursor.
    ///
    /// Server errors leave the state unchanged.
    pub fn seek(&mut self, seek: Seek) -> Result<SeekOutcome> {
        let status = self.rset.seek(seek)?;
        let outcome = match status {
            SeekStatus::Row => {
                self.state = CursorState::OnRow;
                SeekOutcome::OnRow
            }
            SeekStatus::NoData => {
                self.state = seek.edge(self.state);
                SeekOutcome::PastEdge
            }
        };
        trace!(%seek, ?outcome, state = ?self.state, "Cursor moved");
        Ok(outcome)
    }

    /// Decode the row the cursor stands on, `None` when off the result set.
    pub fn current(&mut self) -> Result<Option<Row>> {
        if self.state != CursorState::OnRow {
            return Ok(None);
        }
        self.decoder.decode(self.rset.as_mut()).map(Some)
    }

    /// Move the cursor and decode the row it lands on.
    pub fn fetch(&mut self, seek: Seek) -> Result<Option<Row>> {
        match self.seek(seek)? {
            SeekOutcome::OnRow => self.current(),
            SeekOutcome::PastEdge => Ok(None),
        }
    }

    /// Set the number of rows transferred per server round trip.
    pub fn set_fetch_size(&mut self, rows: u16) -> Result<()> {
        self.rset.set_fetch_size(rows)
    }

    /// Close the server result set.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state = CursorState::Unpositioned;
            self.rset.close();
            debug!("Closed cursor");
        }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("columns", &self.columns().labels())
            .field("state", &self.state)
            .field("closed", &self.closed)
            .finish()
    }
}
