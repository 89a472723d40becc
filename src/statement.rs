//! Statements.
//!
//! A [`Statement`] owns one server statement handle together with the state
//! of its last execution: the cursor of the result set, if the statement was
//! a query, and for prepared statements the parameter buffers. Every
//! execution closes the previous cursor before it talks to the server.
//!
//! # Example
//!
//! ```
//! use sdbc_marshal::client::constants::{SQLTYPE_INTEGER, SQLTYPE_VARCHARA};
//! use sdbc_marshal::client::memory::{column, parameter, MemoryResult, MemoryServer, Script};
//! use sdbc_marshal::client::ParameterMode;
//! use sdbc_marshal::{HostValue, Params, ResultSetConfig, Seek, Statement};
//!
//! let server = MemoryServer::new();
//! server.register(
//!     "SELECT NAME FROM ROOMS WHERE FLOOR = :FLOOR",
//!     Script::query(
//!         MemoryResult::new(vec![column("NAME", SQLTYPE_VARCHARA, 20)])
//!             .row(vec!["Aurora".into()])
//!             .row(vec!["Borealis".into()]),
//!     )
//!     .with_params(vec![parameter(SQLTYPE_INTEGER, 10, ParameterMode::In)]),
//! );
//!
//! let mut stmt = Statement::prepare(
//!     Box::new(server.statement()),
//!     "SELECT NAME FROM ROOMS WHERE FLOOR = :FLOOR",
//!     ResultSetConfig::new(),
//! )?;
//! let rows = stmt.execute_with(&mut Params::Named(&mut [("floor", HostValue::Int32(3))]))?;
//! assert_eq!(rows, 2);
//!
//! while let Some(row) = stmt.fetch(Seek::Next)? {
//!     println!("{}", row.get_by_label("NAME").unwrap_or(&HostValue::Null));
//! }
//! # Ok::<(), sdbc_marshal::Error>(())
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::client::{Execution, Serial, ServerPreparedStatement, ServerStatement};
use crate::config::ResultSetConfig;
use crate::cursor::{Cursor, Seek};
use crate::error::{Error, Result};
use crate::param::{ParameterSet, Params};
use crate::types::{Column, Row};

enum Handle {
    Direct(Box<dyn ServerStatement>),
    Prepared {
        handle: Box<dyn ServerPreparedStatement>,
        params: ParameterSet,
    },
}

impl Handle {
    fn kind(&self) -> &'static str {
        match self {
            Handle::Direct(_) => "direct",
            Handle::Prepared { .. } => "prepared",
        }
    }

    fn execute_batch(&mut self, sql: &[&str]) -> Result<Vec<i32>> {
        match self {
            Handle::Direct(stmt) => stmt.execute_batch(sql),
            Handle::Prepared { handle, .. } => handle.execute_batch(sql),
        }
    }

    fn last_inserted_key(&mut self, which: Serial) -> Result<Option<i64>> {
        match self {
            Handle::Direct(stmt) => stmt.last_inserted_key(which),
            Handle::Prepared { handle, .. } => handle.last_inserted_key(which),
        }
    }

    fn release(&mut self) {
        match self {
            Handle::Direct(stmt) => stmt.release(),
            Handle::Prepared { handle, .. } => handle.release(),
        }
    }
}

/// SQL statement, direct or prepared.
pub struct Statement {
    /// `None` once the statement is closed.
    handle: Option<Handle>,
    cursor: Option<Cursor>,
    config: ResultSetConfig,
}

impl Statement {
    /// Wrap a statement handle for direct execution.
    ///
    /// The handle is released if `config` cannot be applied.
    pub fn new(mut handle: Box<dyn ServerStatement>, config: ResultSetConfig) -> Result<Self> {
        if let Err(e) = config.apply(handle.as_mut()) {
            handle.release();
            return Err(e);
        }
        Ok(Self {
            handle: Some(Handle::Direct(handle)),
            cursor: None,
            config,
        })
    }

    /// Prepare `sql` on a prepared statement handle.
    ///
    /// Fails when the parameter markers in `sql` disagree with the
    /// parameters the server reports. The handle is released on failure.
    pub fn prepare(
        mut handle: Box<dyn ServerPreparedStatement>,
        sql: &str,
        config: ResultSetConfig,
    ) -> Result<Self> {
        let prepared = config
            .apply(handle.as_mut())
            .and_then(|()| handle.prepare(sql))
            .and_then(|metadata| ParameterSet::new(sql, &metadata));
        match prepared {
            Ok(params) => {
                debug!(sql_len = sql.len(), params = params.len(), "Prepared statement");
                Ok(Self {
                    handle: Some(Handle::Prepared { handle, params }),
                    cursor: None,
                    config,
                })
            }
            Err(e) => {
                handle.release();
                Err(e)
            }
        }
    }

    /// Merge `config` into the options applied before each execution.
    pub fn configure(&mut self, config: &ResultSetConfig) {
        self.config.merge(config);
    }

    /// Options applied before each execution.
    pub fn config(&self) -> &ResultSetConfig {
        &self.config
    }

    /// Check if the statement was prepared.
    pub fn is_prepared(&self) -> bool {
        matches!(self.handle, Some(Handle::Prepared { .. }))
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Parameters of a prepared statement.
    pub fn parameters(&self) -> Option<&ParameterSet> {
        match &self.handle {
            Some(Handle::Prepared { params, .. }) => Some(params),
            _ => None,
        }
    }

    fn handle_mut(&mut self) -> Result<&mut Handle> {
        self.handle.as_mut().ok_or(Error::StatementClosed)
    }

    /// Execute `sql` directly.
    ///
    /// Returns the number of rows of the result set for queries, the number
    /// of affected rows otherwise.
    pub fn execute(&mut self, sql: &str) -> Result<i64> {
        let Handle::Direct(stmt) = self.handle.as_mut().ok_or(Error::StatementClosed)? else {
            return Err(Error::StatementKind {
                operation: "execute",
                expected: "direct",
            });
        };
        close_cursor(&mut self.cursor);
        self.config.apply(stmt.as_mut())?;
        debug!(sql_len = sql.len(), "Executing statement");
        let execution = stmt.execute(sql)?;
        open_result(&self.config, &mut self.cursor, execution)
    }

    /// Execute the prepared statement with `args`.
    ///
    /// OUT and INOUT results are written back into `args` after the server
    /// call succeeded. A failed call leaves `args` untouched.
    pub fn execute_with(&mut self, args: &mut Params<'_, '_>) -> Result<i64> {
        let Handle::Prepared { handle, params } =
            self.handle.as_mut().ok_or(Error::StatementClosed)?
        else {
            return Err(Error::StatementKind {
                operation: "execute_with",
                expected: "prepared",
            });
        };
        close_cursor(&mut self.cursor);
        self.config.apply(handle.as_mut())?;
        params.bind(args)?;
        debug!(params = params.len(), "Executing prepared statement");
        let execution = handle.execute_prepared(&mut params.bindings())?;
        let count = open_result(&self.config, &mut self.cursor, execution)?;
        params.write_back(args)?;
        Ok(count)
    }

    /// Execute a batch of statements that do not return result sets.
    ///
    /// Returns one row status per statement.
    pub fn batch(&mut self, sql: &[&str]) -> Result<Vec<i32>> {
        close_cursor(&mut self.cursor);
        let handle = self.handle_mut()?;
        debug!(statements = sql.len(), "Executing batch");
        handle.execute_batch(sql)
    }

    /// Serial key generated by the last insert, `None` if there is none.
    pub fn serial(&mut self, which: Serial) -> Result<Option<i64>> {
        self.handle_mut()?.last_inserted_key(which)
    }

    /// Check if the last execution produced a result set.
    pub fn is_query(&self) -> bool {
        self.cursor.is_some()
    }

    /// Cursor of the current result set.
    pub fn cursor(&mut self) -> Option<&mut Cursor> {
        self.cursor.as_mut()
    }

    /// Columns of the current result set, empty when there is none.
    pub fn columns(&self) -> &[Column] {
        match &self.cursor {
            Some(cursor) => &cursor.columns().columns,
            None => &[],
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    pub fn column_labels(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.label.as_str()).collect()
    }

    /// Get a column of the current result set by 1-based number.
    pub fn column(&self, index: usize) -> Result<&Column> {
        let columns = match &self.cursor {
            Some(cursor) => &cursor.columns().columns,
            None => return Err(Error::NoResultSet),
        };
        index
            .checked_sub(1)
            .and_then(|i| columns.get(i))
            .ok_or(Error::ColumnOutOfRange {
                index,
                count: columns.len(),
            })
    }

    /// 1-based number of the current row, 0 when not on a row.
    pub fn row_number(&self) -> i64 {
        self.cursor.as_ref().map_or(0, Cursor::row_number)
    }

    /// Move the cursor and decode the row it lands on.
    pub fn fetch(&mut self, seek: Seek) -> Result<Option<Row>> {
        self.cursor.as_mut().ok_or(Error::NoResultSet)?.fetch(seek)
    }

    /// Release the result set and the statement handle.
    ///
    /// LOB handles taken from fetched rows stay usable.
    pub fn close(&mut self) {
        close_cursor(&mut self.cursor);
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            debug!("Closed statement");
        }
    }
}

fn close_cursor(cursor: &mut Option<Cursor>) {
    if let Some(mut cursor) = cursor.take() {
        cursor.close();
    }
}

/// Install the cursor of a query result and compute the row count.
fn open_result(
    config: &ResultSetConfig,
    slot: &mut Option<Cursor>,
    execution: Execution,
) -> Result<i64> {
    match execution {
        Execution::Query(rset) => {
            let mut cursor = Cursor::open(rset)?;
            if let Some(rows) = config.fetch_size {
                cursor.set_fetch_size(rows)?;
            }
            let count = cursor.result_count();
            trace!(count, columns = cursor.columns().len(), "Statement returned a result set");
            *slot = Some(cursor);
            Ok(count)
        }
        Execution::Update { rows_affected } => {
            trace!(rows_affected, "Statement modified rows");
            Ok(rows_affected)
        }
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("kind", &self.handle.as_ref().map(Handle::kind))
            .field("cursor", &self.cursor)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::constants::*;
    use crate::client::memory::{column, MemoryResult, MemoryServer, Script};

    fn server() -> MemoryServer {
        let server = MemoryServer::new();
        server.register(
            "SELECT ID, NAME FROM T",
            Script::query(
                MemoryResult::new(vec![
                    column("ID", SQLTYPE_INTEGER, 10),
                    column("NAME", SQLTYPE_VARCHARA, 8),
                ])
                .row(vec![1.into(), "one".into()]),
            ),
        );
        server.register("DELETE FROM T", Script::update(4));
        server
    }

    #[test]
    fn test_query_then_update_drops_cursor() {
        let server = server();
        let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
        assert_eq!(stmt.execute("SELECT ID, NAME FROM T").unwrap(), 1);
        assert!(stmt.is_query());
        assert_eq!(stmt.column_labels(), vec!["ID", "NAME"]);

        assert_eq!(stmt.execute("DELETE FROM T").unwrap(), 4);
        assert!(!stmt.is_query());
        assert_eq!(stmt.column_count(), 0);
        assert_eq!(server.closed_result_sets(), 1);
        assert!(matches!(stmt.fetch(Seek::Next), Err(Error::NoResultSet)));
    }

    #[test]
    fn test_column_range() {
        let server = server();
        let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
        assert!(matches!(stmt.column(1), Err(Error::NoResultSet)));
        stmt.execute("SELECT ID, NAME FROM T").unwrap();
        assert_eq!(stmt.column(2).unwrap().label, "NAME");
        assert!(matches!(
            stmt.column(0),
            Err(Error::ColumnOutOfRange { index: 0, count: 2 })
        ));
        assert!(matches!(
            stmt.column(3),
            Err(Error::ColumnOutOfRange { index: 3, count: 2 })
        ));
    }

    #[test]
    fn test_wrong_statement_kind() {
        let server = server();
        let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
        match stmt.execute_with(&mut Params::Positional(&mut [])) {
            Err(Error::StatementKind { expected, .. }) => assert_eq!(expected, "prepared"),
            other => panic!("Expected StatementKind, got {:?}", other),
        }
    }

    #[test]
    fn test_close_releases_once() {
        let server = server();
        let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
        stmt.execute("SELECT ID, NAME FROM T").unwrap();
        stmt.close();
        assert!(stmt.is_closed());
        assert!(matches!(stmt.execute("DELETE FROM T"), Err(Error::StatementClosed)));
        drop(stmt);
        assert_eq!(server.released_statements(), 1);
        assert_eq!(server.closed_result_sets(), 1);
    }
}
