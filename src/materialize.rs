//! Row decoding.
//!
//! Turns the current row of a server result set into host values. One
//! transfer buffer is reused for every scalar column of the row. LOB columns
//! are not read at all: each produces a fresh [`LobHandle`] that streams the
//! content on demand.

use std::rc::Rc;

use tracing::trace;

use crate::client::{ServerResultSet, TransferBuffer};
use crate::error::Result;
use crate::types::{ColumnInfo, HostValue, LobHandle, LobKind, Row};

/// Decodes rows of one result set.
#[derive(Debug)]
pub struct RowDecoder {
    columns: Rc<ColumnInfo>,
    buffer: TransferBuffer,
}

impl RowDecoder {
    /// Create a decoder for rows described by `columns`.
    pub fn new(columns: Rc<ColumnInfo>) -> Self {
        let widest = columns
            .columns
            .iter()
            .filter(|c| !c.host_type.is_lob())
            .map(|c| c.buffer_size())
            .max()
            .unwrap_or(0);
        Self {
            columns,
            buffer: TransferBuffer::new(widest),
        }
    }

    /// Column information shared with the decoded rows.
    pub fn columns(&self) -> &Rc<ColumnInfo> {
        &self.columns
    }

    /// Decode every column of the current row, in column order.
    ///
    /// A failure on any column discards the whole row. LOB handles already
    /// created for it are closed when the partial row is dropped.
    pub fn decode(&mut self, rset: &mut dyn ServerResultSet) -> Result<Row> {
        let mut values = Vec::with_capacity(self.columns.len());
        for (idx, column) in self.columns.columns.iter().enumerate() {
            let col_no = idx + 1;
            let value = match LobKind::from_host_type(column.host_type) {
                Some(kind) => match rset.get_lob(col_no, column.host_type)? {
                    Some(lob) => HostValue::Lob(LobHandle::new(lob, kind)),
                    None => HostValue::Null,
                },
                None => {
                    self.buffer.reset(column.buffer_size());
                    rset.get_column(col_no, column.host_type, &mut self.buffer)?;
                    self.buffer.decode(column.host_type)?
                }
            };
            trace!(column = col_no, label = %column.label, null = value.is_null(), "Decoded column");
            values.push(value);
        }
        Ok(Row::new(values, Rc::clone(&self.columns)))
    }
}
