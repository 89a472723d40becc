//! Marshaling layer for SQLDBC-style database clients
//!
//! Translates between dynamically typed host values and the native type
//! system of a MaxDB/SQLDBC client library: resolves the transfer type of
//! every column and parameter, binds values into length-checked transfer
//! buffers, decodes fetched rows (with streaming LOB handles) and tracks a
//! scrollable cursor over a result set.
//!
//! The client library itself is reached through the traits in [`client`].
//! [`client::memory`] implements them in memory.
//!
//! # Example
//!
//! ```
//! use sdbc_marshal::client::constants::{SQLTYPE_INTEGER, SQLTYPE_VARCHARA};
//! use sdbc_marshal::client::memory::{column, parameter, MemoryServer, Script};
//! use sdbc_marshal::client::ParameterMode;
//! use sdbc_marshal::{HostValue, Params, ResultSetConfig, Result, Statement};
//!
//! fn main() -> Result<()> {
//!     let server = MemoryServer::new();
//!     server.register(
//!         "INSERT INTO ROOMS VALUES (?, ?)",
//!         Script::update(1).with_params(vec![
//!             parameter(SQLTYPE_INTEGER, 10, ParameterMode::In),
//!             parameter(SQLTYPE_VARCHARA, 30, ParameterMode::In),
//!         ]),
//!     );
//!
//!     let mut insert = Statement::prepare(
//!         Box::new(server.statement()),
//!         "INSERT INTO ROOMS VALUES (?, ?)",
//!         ResultSetConfig::new(),
//!     )?;
//!     let rows = insert.execute_with(&mut Params::Positional(&mut [
//!         HostValue::from(101),
//!         HostValue::from("Aurora"),
//!     ]))?;
//!     assert_eq!(rows, 1);
//!
//!     insert.close();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod materialize;
pub mod param;
pub mod placeholder;
pub mod statement;
pub mod types;

// Re-export main types
pub use client::{ParameterMode, Serial, TransferBuffer};
pub use config::{Concurrency, ResultSetConfig, ResultSetType};
pub use cursor::{Cursor, CursorState, Seek, SeekOutcome};
pub use error::{Error, Result};
pub use param::{Parameter, ParameterSet, Params};
pub use placeholder::Placeholder;
pub use statement::Statement;
pub use types::{Column, ColumnInfo, HostType, HostValue, LobHandle, LobKind, Row, SqlType};
