//! Scripted in-memory client library.
//!
//! [`MemoryServer`] answers statements from a table of scripts registered
//! up front, keyed by the exact SQL text. It keeps enough bookkeeping
//! (executed SQL, decoded bind values, released handles, closed LOBs) for
//! tests to observe what the marshaling layer did.
//!
//! ```
//! use sdbc_marshal::client::memory::{column, MemoryResult, MemoryServer, Script};
//! use sdbc_marshal::client::constants::SQLTYPE_INTEGER;
//!
//! let server = MemoryServer::new();
//! server.register(
//!     "SELECT ID FROM T",
//!     Script::query(MemoryResult::new(vec![column("ID", SQLTYPE_INTEGER, 10)]).row(vec![1.into()])),
//! );
//! let stmt = server.statement();
//! # drop(stmt);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use super::constants::*;
use super::{
    Binding, ColumnMetadata, Execution, LobRead, ParameterMetadata, ParameterMode,
    SeekStatus, Serial, ServerLob, ServerPreparedStatement, ServerResultSet, ServerStatement,
    TransferBuffer,
};
use crate::config::{Concurrency, ResultSetType};
use crate::cursor::Seek;
use crate::error::{Error, Result};
use crate::types::{HostType, HostValue, LobKind};

// Error codes reported by the in-memory server
pub const ERR_UNKNOWN_STATEMENT: i32 = -9001;
pub const ERR_HANDLE_RELEASED: i32 = -9002;
pub const ERR_NOT_PREPARED: i32 = -9003;
pub const ERR_PARAMETER_COUNT: i32 = -9004;
pub const ERR_NO_CURRENT_ROW: i32 = -9005;
pub const ERR_COLUMN_INDEX: i32 = -9006;
pub const ERR_FORWARD_ONLY: i32 = -9007;
pub const ERR_QUERY_IN_BATCH: i32 = -9008;
pub const ERR_LOB_POSITION: i32 = -9009;
pub const ERR_RESULT_SET_CLOSED: i32 = -9010;

/// Row status reported for batch entries without a row count.
pub const BATCH_SUCCESS_NO_INFO: i32 = -2;

/// Preferred LOB transfer size.
pub const PREFERRED_LOB_SIZE: i64 = 32 * 1024;

/// Build a column description with default precision and scale.
pub fn column(label: &str, sql_type: i32, length: i32) -> ColumnMetadata {
    ColumnMetadata {
        label: Some(label.to_string()),
        name: Some(label.to_string()),
        length,
        precision: i16::try_from(length).unwrap_or(i16::MAX),
        byte_length: length,
        sql_type,
        nullable: super::Nullability::Nullable,
        writable: true,
        ..Default::default()
    }
}

/// Build a `FIXED(precision, scale)` column description.
pub fn numeric_column(label: &str, precision: i16, scale: i16) -> ColumnMetadata {
    ColumnMetadata {
        precision,
        scale,
        ..column(label, SQLTYPE_FIXED, i32::from(precision))
    }
}

/// Build a parameter description.
pub fn parameter(sql_type: i32, length: i32, mode: ParameterMode) -> ParameterMetadata {
    ParameterMetadata {
        sql_type,
        length,
        precision: i16::try_from(length).unwrap_or(i16::MAX),
        scale: 0,
        byte_length: length,
        mode,
    }
}

/// Build a `FIXED(precision, scale)` parameter description.
pub fn numeric_parameter(precision: i16, scale: i16, mode: ParameterMode) -> ParameterMetadata {
    ParameterMetadata {
        precision,
        scale,
        ..parameter(SQLTYPE_FIXED, i32::from(precision), mode)
    }
}

/// One stored cell of a scripted result.
#[derive(Debug, Clone)]
pub enum MemoryCell {
    Null,
    Int(i64),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// LOB content shared by every handle opened on it.
    Lob(Rc<RefCell<Vec<u8>>>),
}

impl MemoryCell {
    /// Create a LOB cell.
    pub fn lob(content: impl Into<Vec<u8>>) -> Self {
        MemoryCell::Lob(Rc::new(RefCell::new(content.into())))
    }

    fn to_host_value(&self) -> HostValue {
        match self {
            MemoryCell::Null => HostValue::Null,
            MemoryCell::Int(i) => HostValue::Int64(*i),
            MemoryCell::Double(d) => HostValue::Double(*d),
            MemoryCell::Text(s) => HostValue::Text(s.clone()),
            MemoryCell::Bytes(b) => HostValue::Bytes(b.clone()),
            MemoryCell::Lob(content) => HostValue::Bytes(content.borrow().clone()),
        }
    }
}

impl From<i32> for MemoryCell {
    fn from(v: i32) -> Self {
        MemoryCell::Int(i64::from(v))
    }
}

impl From<i64> for MemoryCell {
    fn from(v: i64) -> Self {
        MemoryCell::Int(v)
    }
}

impl From<f64> for MemoryCell {
    fn from(v: f64) -> Self {
        MemoryCell::Double(v)
    }
}

impl From<&str> for MemoryCell {
    fn from(v: &str) -> Self {
        MemoryCell::Text(v.to_string())
    }
}

impl From<Vec<u8>> for MemoryCell {
    fn from(v: Vec<u8>) -> Self {
        MemoryCell::Bytes(v)
    }
}

impl<T: Into<MemoryCell>> From<Option<T>> for MemoryCell {
    fn from(v: Option<T>) -> Self {
        v.map_or(MemoryCell::Null, Into::into)
    }
}

/// Scripted result set content.
#[derive(Debug, Clone, Default)]
pub struct MemoryResult {
    columns: Vec<ColumnMetadata>,
    rows: Vec<Vec<MemoryCell>>,
}

impl MemoryResult {
    pub fn new(columns: Vec<ColumnMetadata>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn row(mut self, cells: Vec<MemoryCell>) -> Self {
        self.rows.push(cells);
        self
    }
}

type CallFn = Rc<dyn Fn(&[HostValue]) -> Result<Vec<HostValue>>>;

#[derive(Clone)]
enum Action {
    Query(MemoryResult),
    Update(i64),
    Fail { code: i32, message: String },
    Call(CallFn),
}

/// Scripted server reaction to one SQL text.
#[derive(Clone)]
pub struct Script {
    params: Vec<ParameterMetadata>,
    action: Action,
    serials: Option<(i64, i64)>,
}

impl Script {
    fn with_action(action: Action) -> Self {
        Self {
            params: Vec::new(),
            action,
            serials: None,
        }
    }

    /// Return a result set.
    pub fn query(result: MemoryResult) -> Self {
        Self::with_action(Action::Query(result))
    }

    /// Report `rows` affected rows.
    pub fn update(rows: i64) -> Self {
        Self::with_action(Action::Update(rows))
    }

    /// Fail with a database error.
    pub fn fail(code: i32, message: impl Into<String>) -> Self {
        Self::with_action(Action::Fail {
            code,
            message: message.into(),
        })
    }

    /// Run `f` on the decoded input values.
    ///
    /// The returned values are written to the OUT and INOUT parameters at
    /// the same positions; values at IN positions are ignored.
    pub fn call(f: impl Fn(&[HostValue]) -> Result<Vec<HostValue>> + 'static) -> Self {
        Self::with_action(Action::Call(Rc::new(f)))
    }

    /// Declare the statement parameters reported on prepare.
    pub fn with_params(mut self, params: Vec<ParameterMetadata>) -> Self {
        self.params = params;
        self
    }

    /// Report first and last inserted serial keys after execution.
    pub fn with_serials(mut self, first: i64, last: i64) -> Self {
        self.serials = Some((first, last));
        self
    }
}

/// Statement settings in effect for the last execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub cursor_name: Option<String>,
    pub max_rows: u32,
    pub result_set_type: ResultSetType,
    pub concurrency: Concurrency,
    pub fetch_size: Option<u16>,
}

#[derive(Default)]
struct ServerState {
    scripts: HashMap<String, Script>,
    executed: Vec<String>,
    bound: Vec<Vec<HostValue>>,
    settings: Settings,
    released_statements: usize,
    closed_result_sets: usize,
    lob_closes: Rc<Cell<usize>>,
}

/// In-memory database answering registered scripts.
#[derive(Clone, Default)]
pub struct MemoryServer {
    state: Rc<RefCell<ServerState>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reaction to `sql`, replacing any previous script.
    pub fn register(&self, sql: &str, script: Script) {
        self.state
            .borrow_mut()
            .scripts
            .insert(sql.to_string(), script);
    }

    /// Create a statement handle.
    pub fn statement(&self) -> MemoryStatement {
        MemoryStatement {
            server: Rc::clone(&self.state),
            prepared: None,
            settings: Settings::default(),
            serials: None,
            released: false,
        }
    }

    /// SQL texts executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state.borrow().executed.clone()
    }

    /// Input values decoded from the bindings of each prepared execution.
    pub fn bound_values(&self) -> Vec<Vec<HostValue>> {
        self.state.borrow().bound.clone()
    }

    /// Settings in effect for the last execution.
    pub fn settings(&self) -> Settings {
        self.state.borrow().settings.clone()
    }

    pub fn released_statements(&self) -> usize {
        self.state.borrow().released_statements
    }

    pub fn closed_result_sets(&self) -> usize {
        self.state.borrow().closed_result_sets
    }

    /// Number of server LOB handles closed.
    pub fn closed_lobs(&self) -> usize {
        self.state.borrow().lob_closes.get()
    }
}

/// Statement handle of the in-memory server.
///
/// Serves both as a plain and as a prepared statement.
pub struct MemoryStatement {
    server: Rc<RefCell<ServerState>>,
    prepared: Option<String>,
    settings: Settings,
    serials: Option<(i64, i64)>,
    released: bool,
}

impl MemoryStatement {
    fn ensure_live(&self) -> Result<()> {
        if self.released {
            Err(Error::server(ERR_HANDLE_RELEASED, "statement handle was released"))
        } else {
            Ok(())
        }
    }

    fn script(&self, sql: &str) -> Result<Script> {
        self.server
            .borrow()
            .scripts
            .get(sql)
            .cloned()
            .ok_or_else(|| Error::server(ERR_UNKNOWN_STATEMENT, format!("unexpected statement: {sql}")))
    }

    fn record(&self, sql: &str) {
        let mut state = self.server.borrow_mut();
        state.executed.push(sql.to_string());
        state.settings = Settings {
            fetch_size: None,
            ..self.settings.clone()
        };
    }

    fn run(&mut self, script: Script, inputs: &[HostValue]) -> Result<(Execution, Vec<HostValue>)> {
        self.serials = None;
        let Script {
            action, serials, ..
        } = script;
        let outcome = match action {
            Action::Fail { code, message } => return Err(Error::server(code, message)),
            Action::Update(rows) => (Execution::Update { rows_affected: rows }, Vec::new()),
            Action::Query(result) => {
                let rset = self.open_result_set(result);
                (Execution::Query(Box::new(rset)), Vec::new())
            }
            Action::Call(f) => (Execution::Update { rows_affected: 0 }, (*f)(inputs)?),
        };
        self.serials = serials;
        Ok(outcome)
    }

    fn open_result_set(&self, mut result: MemoryResult) -> MemoryResultSet {
        if self.settings.max_rows > 0 {
            result.rows.truncate(self.settings.max_rows as usize);
        }
        MemoryResultSet {
            forward_only: self.settings.result_set_type == ResultSetType::ForwardOnly,
            server: Some(Rc::clone(&self.server)),
            ..MemoryResultSet::new(result)
        }
    }
}

impl ServerStatement for MemoryStatement {
    fn set_cursor_name(&mut self, name: &str) -> Result<()> {
        self.ensure_live()?;
        self.settings.cursor_name = Some(name.to_string());
        Ok(())
    }

    fn set_max_rows(&mut self, max_rows: u32) -> Result<()> {
        self.ensure_live()?;
        self.settings.max_rows = max_rows;
        Ok(())
    }

    fn set_result_set_type(&mut self, kind: ResultSetType) -> Result<()> {
        self.ensure_live()?;
        self.settings.result_set_type = kind;
        Ok(())
    }

    fn set_concurrency(&mut self, concurrency: Concurrency) -> Result<()> {
        self.ensure_live()?;
        self.settings.concurrency = concurrency;
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<Execution> {
        self.ensure_live()?;
        self.record(sql);
        let script = self.script(sql)?;
        trace!(sql, "Memory server executing statement");
        let (execution, _) = self.run(script, &[])?;
        Ok(execution)
    }

    fn execute_batch(&mut self, sql: &[&str]) -> Result<Vec<i32>> {
        self.ensure_live()?;
        let mut statuses = Vec::with_capacity(sql.len());
        for entry in sql {
            self.record(entry);
            match self.script(entry)?.action {
                Action::Update(rows) => statuses.push(i32::try_from(rows).unwrap_or(i32::MAX)),
                Action::Call(_) => statuses.push(BATCH_SUCCESS_NO_INFO),
                Action::Fail { code, message } => return Err(Error::server(code, message)),
                Action::Query(_) => {
                    return Err(Error::server(
                        ERR_QUERY_IN_BATCH,
                        format!("batch statement returns a result set: {entry}"),
                    ))
                }
            }
        }
        Ok(statuses)
    }

    fn last_inserted_key(&mut self, which: Serial) -> Result<Option<i64>> {
        self.ensure_live()?;
        Ok(self.serials.map(|(first, last)| match which {
            Serial::First => first,
            Serial::Last => last,
        }))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.server.borrow_mut().released_statements += 1;
        }
    }
}

impl ServerPreparedStatement for MemoryStatement {
    fn prepare(&mut self, sql: &str) -> Result<Vec<ParameterMetadata>> {
        self.ensure_live()?;
        let script = self.script(sql)?;
        self.prepared = Some(sql.to_string());
        Ok(script.params)
    }

    fn execute_prepared(&mut self, bindings: &mut [Binding<'_>]) -> Result<Execution> {
        self.ensure_live()?;
        let sql = self
            .prepared
            .clone()
            .ok_or_else(|| Error::server(ERR_NOT_PREPARED, "statement is not prepared"))?;
        self.record(&sql);
        let script = self.script(&sql)?;
        if bindings.len() != script.params.len() {
            return Err(Error::server(
                ERR_PARAMETER_COUNT,
                format!(
                    "{} parameters bound, statement has {}",
                    bindings.len(),
                    script.params.len()
                ),
            ));
        }

        let inputs = bindings
            .iter()
            .map(|b| {
                if b.mode.is_input() {
                    b.buffer.decode(b.host_type)
                } else {
                    Ok(HostValue::Null)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        self.server.borrow_mut().bound.push(inputs.clone());

        let (execution, outputs) = self.run(script, &inputs)?;
        for (binding, value) in bindings.iter_mut().zip(&outputs) {
            if binding.mode.is_output() {
                binding.buffer.encode(binding.host_type, value)?;
            }
        }
        Ok(execution)
    }
}

/// Result set handle of the in-memory server.
pub struct MemoryResultSet {
    columns: Vec<ColumnMetadata>,
    rows: Vec<Vec<MemoryCell>>,
    /// 0 before the first row, `rows.len() + 1` after the last.
    pos: i64,
    forward_only: bool,
    closed: bool,
    server: Option<Rc<RefCell<ServerState>>>,
    lob_closes: Rc<Cell<usize>>,
}

impl MemoryResultSet {
    /// Create a standalone scrollable result set.
    pub fn new(result: MemoryResult) -> Self {
        Self {
            columns: result.columns,
            rows: result.rows,
            pos: 0,
            forward_only: false,
            closed: false,
            server: None,
            lob_closes: Rc::new(Cell::new(0)),
        }
    }

    /// Number of LOB handles closed that were opened on this result set.
    pub fn closed_lobs(&self) -> usize {
        self.lob_closes.get()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::server(ERR_RESULT_SET_CLOSED, "result set is closed"))
        } else {
            Ok(())
        }
    }

    fn on_row(&self) -> bool {
        self.pos >= 1 && self.pos <= self.rows.len() as i64
    }

    fn cell(&self, column: usize) -> Result<&MemoryCell> {
        if !self.on_row() {
            return Err(Error::server(ERR_NO_CURRENT_ROW, "no current row"));
        }
        let row = &self.rows[(self.pos - 1) as usize];
        column
            .checked_sub(1)
            .and_then(|idx| row.get(idx))
            .ok_or_else(|| Error::server(ERR_COLUMN_INDEX, format!("invalid column index {column}")))
    }
}

impl ServerResultSet for MemoryResultSet {
    fn metadata(&self) -> Result<Vec<ColumnMetadata>> {
        Ok(self.columns.clone())
    }

    fn result_count(&self) -> i64 {
        self.rows.len() as i64
    }

    fn set_fetch_size(&mut self, rows: u16) -> Result<()> {
        self.ensure_open()?;
        if let Some(server) = &self.server {
            server.borrow_mut().settings.fetch_size = Some(rows);
        }
        Ok(())
    }

    fn seek(&mut self, seek: Seek) -> Result<SeekStatus> {
        self.ensure_open()?;
        if self.forward_only && seek != Seek::Next {
            return Err(Error::server(
                ERR_FORWARD_ONLY,
                format!("{seek} is not allowed on a FORWARD ONLY result set"),
            ));
        }
        let n = self.rows.len() as i64;
        let target = match seek {
            Seek::Next => self.pos + 1,
            Seek::Previous => self.pos - 1,
            Seek::First => 1,
            Seek::Last => n,
            Seek::Absolute(k) if k < 0 => n + 1 + k,
            Seek::Absolute(k) => k,
            Seek::Relative(d) => self.pos.saturating_add(d),
        };
        self.pos = match seek {
            // An empty result set has no first or last row to stand on
            Seek::First | Seek::Last if n == 0 => n + 1,
            Seek::Absolute(0) => 0,
            _ => target.clamp(0, n + 1),
        };
        Ok(if self.on_row() {
            SeekStatus::Row
        } else {
            SeekStatus::NoData
        })
    }

    fn row_number(&self) -> i64 {
        if self.on_row() {
            self.pos
        } else {
            0
        }
    }

    fn get_column(
        &mut self,
        column: usize,
        host_type: HostType,
        buffer: &mut TransferBuffer,
    ) -> Result<()> {
        self.ensure_open()?;
        match self.cell(column)? {
            MemoryCell::Null => buffer.set_null(),
            MemoryCell::Text(s) if s.is_empty() => buffer.put_bytes(b"")?,
            cell => buffer.encode(host_type, &cell.to_host_value())?,
        }
        Ok(())
    }

    fn get_lob(&mut self, column: usize, host_type: HostType) -> Result<Option<Box<dyn ServerLob>>> {
        self.ensure_open()?;
        let kind = LobKind::from_host_type(host_type).ok_or_else(|| {
            Error::type_conversion(format!("{host_type} is not a LOB host type"))
        })?;
        let content = match self.cell(column)? {
            MemoryCell::Null => return Ok(None),
            MemoryCell::Lob(content) => Rc::clone(content),
            MemoryCell::Text(s) => Rc::new(RefCell::new(s.clone().into_bytes())),
            MemoryCell::Bytes(b) => Rc::new(RefCell::new(b.clone())),
            other => Rc::new(RefCell::new(other.to_host_value().to_string().into_bytes())),
        };
        let closes = match &self.server {
            Some(server) => Rc::clone(&server.borrow().lob_closes),
            None => Rc::clone(&self.lob_closes),
        };
        Ok(Some(Box::new(MemoryLob::open(content, kind, closes))))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Some(server) = &self.server {
                server.borrow_mut().closed_result_sets += 1;
            }
        }
    }
}

/// Observer for a standalone [`MemoryLob`].
#[derive(Clone)]
pub struct LobProbe {
    content: Rc<RefCell<Vec<u8>>>,
    closes: Rc<Cell<usize>>,
}

impl LobProbe {
    /// Number of close calls the LOB received.
    pub fn close_count(&self) -> usize {
        self.closes.get()
    }

    /// Current LOB content.
    pub fn content(&self) -> Vec<u8> {
        self.content.borrow().clone()
    }
}

/// LOB handle of the in-memory server.
///
/// Positions are 1-based and count characters for character LOBs.
pub struct MemoryLob {
    content: Rc<RefCell<Vec<u8>>>,
    kind: LobKind,
    pos: i64,
    null: bool,
    closes: Rc<Cell<usize>>,
}

impl MemoryLob {
    fn open(content: Rc<RefCell<Vec<u8>>>, kind: LobKind, closes: Rc<Cell<usize>>) -> Self {
        Self {
            content,
            kind,
            pos: 1,
            null: false,
            closes,
        }
    }

    fn standalone(content: Vec<u8>, kind: LobKind) -> (Self, LobProbe) {
        let content = Rc::new(RefCell::new(content));
        let closes = Rc::new(Cell::new(0));
        let probe = LobProbe {
            content: Rc::clone(&content),
            closes: Rc::clone(&closes),
        };
        (Self::open(content, kind, closes), probe)
    }

    /// Create a binary LOB holding `content`.
    pub fn binary(content: Vec<u8>) -> (Self, LobProbe) {
        Self::standalone(content, LobKind::Binary)
    }

    /// Create a character LOB holding `content`.
    pub fn character(content: &str) -> (Self, LobProbe) {
        Self::standalone(content.as_bytes().to_vec(), LobKind::Character)
    }

    /// Create a LOB that is SQL NULL.
    pub fn null(kind: LobKind) -> Self {
        let (mut lob, _) = Self::standalone(Vec::new(), kind);
        lob.null = true;
        lob
    }

    fn text(content: &[u8]) -> Result<&str> {
        std::str::from_utf8(content)
            .map_err(|e| Error::type_conversion(format!("character LOB is not valid UTF-8: {e}")))
    }

    /// Byte offset of the 1-based character position `pos`.
    fn byte_offset(text: &str, pos: i64) -> usize {
        let skip = (pos - 1).max(0) as usize;
        text.char_indices()
            .nth(skip)
            .map_or(text.len(), |(idx, _)| idx)
    }
}

impl ServerLob for MemoryLob {
    fn length(&self) -> Result<i64> {
        if self.null {
            return Ok(0);
        }
        let content = self.content.borrow();
        match self.kind {
            LobKind::Binary => Ok(content.len() as i64),
            LobKind::Character => Ok(Self::text(&content)?.chars().count() as i64),
        }
    }

    fn position(&self) -> Result<i64> {
        Ok(self.pos)
    }

    fn preferred_size(&self) -> Result<i64> {
        Ok(PREFERRED_LOB_SIZE)
    }

    fn get_data(&mut self, buffer: &mut [u8], position: Option<i64>) -> Result<LobRead> {
        if self.null {
            return Ok(LobRead::Null);
        }
        let start = position.unwrap_or(self.pos);
        if start < 1 {
            return Err(Error::server(ERR_LOB_POSITION, format!("invalid LOB position {start}")));
        }
        let content = self.content.borrow();
        let (bytes, units) = match self.kind {
            LobKind::Binary => {
                let offset = (start - 1) as usize;
                if offset >= content.len() {
                    return Ok(LobRead::NoData);
                }
                let n = buffer.len().min(content.len() - offset);
                buffer[..n].copy_from_slice(&content[offset..offset + n]);
                (n, n)
            }
            LobKind::Character => {
                let text = Self::text(&content)?;
                let offset = Self::byte_offset(text, start);
                if offset >= text.len() {
                    return Ok(LobRead::NoData);
                }
                let mut n = 0;
                let mut chars = 0;
                for ch in text[offset..].chars() {
                    if n + ch.len_utf8() > buffer.len() {
                        break;
                    }
                    n += ch.len_utf8();
                    chars += 1;
                }
                buffer[..n].copy_from_slice(&text.as_bytes()[offset..offset + n]);
                (n, chars)
            }
        };
        self.pos = start + units as i64;
        Ok(LobRead::Data(bytes))
    }

    fn put_data(&mut self, data: &[u8]) -> Result<()> {
        let mut content = self.content.borrow_mut();
        if self.null {
            content.clear();
            self.null = false;
        }
        match self.kind {
            LobKind::Binary => {
                let offset = (self.pos - 1).max(0) as usize;
                let end = offset + data.len();
                if content.len() < end {
                    content.resize(end, 0);
                }
                content[offset..end].copy_from_slice(data);
                self.pos += data.len() as i64;
            }
            LobKind::Character => {
                let text = Self::text(&content)?;
                let written = Self::text(data)?;
                let count = written.chars().count() as i64;
                let head = Self::byte_offset(text, self.pos);
                let tail = Self::byte_offset(text, self.pos + count);
                let mut updated = String::with_capacity(text.len() + data.len());
                updated.push_str(&text[..head]);
                updated.push_str(written);
                updated.push_str(&text[tail..]);
                *content = updated.into_bytes();
                self.pos += count;
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::constants::{SQLTYPE_INTEGER, SQLTYPE_VARCHARA};

    fn three_rows() -> MemoryResultSet {
        MemoryResultSet::new(
            MemoryResult::new(vec![column("N", SQLTYPE_INTEGER, 10)])
                .row(vec![1.into()])
                .row(vec![2.into()])
                .row(vec![3.into()]),
        )
    }

    #[test]
    fn test_seek_positions() {
        let mut rset = three_rows();
        assert_eq!(rset.seek(Seek::Last).unwrap(), SeekStatus::Row);
        assert_eq!(rset.row_number(), 3);
        assert_eq!(rset.seek(Seek::Next).unwrap(), SeekStatus::NoData);
        assert_eq!(rset.row_number(), 0);
        assert_eq!(rset.seek(Seek::Previous).unwrap(), SeekStatus::Row);
        assert_eq!(rset.row_number(), 3);
        assert_eq!(rset.seek(Seek::Absolute(-3)).unwrap(), SeekStatus::Row);
        assert_eq!(rset.row_number(), 1);
        assert_eq!(rset.seek(Seek::Relative(5)).unwrap(), SeekStatus::NoData);
        assert_eq!(rset.seek(Seek::Relative(-1)).unwrap(), SeekStatus::Row);
        assert_eq!(rset.row_number(), 3);
    }

    #[test]
    fn test_get_column_converts() {
        let mut rset = three_rows();
        rset.seek(Seek::Next).unwrap();
        let mut buf = TransferBuffer::new(4);
        rset.get_column(1, HostType::Int32, &mut buf).unwrap();
        assert_eq!(buf.get_i32().unwrap(), 1);
        assert!(rset.get_column(2, HostType::Int32, &mut buf).is_err());
    }

    #[test]
    fn test_unknown_statement() {
        let server = MemoryServer::new();
        let mut stmt = server.statement();
        let err = stmt.execute("SELECT 1 FROM DUAL").unwrap_err();
        assert_eq!(err.server_code(), Some(ERR_UNKNOWN_STATEMENT));
        assert_eq!(server.executed(), vec!["SELECT 1 FROM DUAL"]);
    }

    #[test]
    fn test_forward_only_rejects_scrolling() {
        let server = MemoryServer::new();
        server.register(
            "SELECT C FROM T",
            Script::query(MemoryResult::new(vec![column("C", SQLTYPE_VARCHARA, 5)]).row(vec!["a".into()])),
        );
        let mut stmt = server.statement();
        let Execution::Query(mut rset) = stmt.execute("SELECT C FROM T").unwrap() else {
            panic!("Expected a result set");
        };
        assert_eq!(rset.seek(Seek::Next).unwrap(), SeekStatus::Row);
        let err = rset.seek(Seek::First).unwrap_err();
        assert_eq!(err.server_code(), Some(ERR_FORWARD_ONLY));
    }

    #[test]
    fn test_character_lob_overwrite() {
        let (mut lob, probe) = MemoryLob::character("abcdef");
        let mut buf = [0u8; 2];
        lob.get_data(&mut buf, Some(3)).unwrap();
        assert_eq!(lob.position().unwrap(), 5);
        lob.put_data("XÝ".as_bytes()).unwrap();
        assert_eq!(probe.content(), "abcdXÝ".as_bytes());
        assert_eq!(lob.length().unwrap(), 6);
    }
}
