//! LOB handles for BLOB and CLOB columns.
//!
//! Fetching a LOB column never transfers its content. The row gets a
//! [`LobHandle`] instead, which streams data on demand through the server
//! handle. Handles are reference counted: every clone is an alias of the
//! same server handle, and the last alias to go away closes it if the
//! caller did not. The statement that produced the handle may be closed or
//! re-executed in between.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use super::host_type::HostType;
use super::value::HostValue;
use crate::client::{LobRead, ServerLob};
use crate::error::{Error, Result};

/// Transfer kind of a LOB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobKind {
    /// Raw bytes, lengths and positions count bytes.
    Binary,
    /// UTF-8 text, lengths and positions count characters.
    Character,
}

impl LobKind {
    /// Kind for a LOB host type, `None` for other types.
    pub fn from_host_type(host_type: HostType) -> Option<Self> {
        match host_type {
            HostType::Blob => Some(LobKind::Binary),
            HostType::Clob => Some(LobKind::Character),
            _ => None,
        }
    }
}

impl fmt::Display for LobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LobKind::Binary => f.write_str("blob"),
            LobKind::Character => f.write_str("clob"),
        }
    }
}

struct LobState {
    lob: Box<dyn ServerLob>,
    kind: LobKind,
    open: bool,
}

impl LobState {
    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::LobClosed)
        }
    }
}

impl Drop for LobState {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = self.lob.close() {
                warn!(kind = %self.kind, error = %e, "Failed to close LOB on release");
            }
        }
    }
}

/// Shared handle to a server large object.
///
/// Cloning creates an alias that shares the read position and open state.
#[derive(Clone)]
pub struct LobHandle {
    inner: Rc<RefCell<LobState>>,
}

impl LobHandle {
    /// Wrap an open server LOB.
    pub fn new(lob: Box<dyn ServerLob>, kind: LobKind) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LobState {
                lob,
                kind,
                open: true,
            })),
        }
    }

    /// Transfer kind of this LOB.
    pub fn kind(&self) -> LobKind {
        self.inner.borrow().kind
    }

    /// Check if the server handle is still open.
    pub fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    /// Number of live aliases, including this one.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Read up to `max_len` bytes.
    ///
    /// Reads from the 1-based `position` when given, otherwise from the
    /// current position, and advances the position. Character LOBs return
    /// whole characters only, and fail when `max_len` cannot hold the next
    /// one. Reading past the end or from a NULL LOB yields an empty value of
    /// the LOB's kind.
    pub fn read(&self, position: Option<i64>, max_len: usize) -> Result<HostValue> {
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        let mut buf = vec![0u8; max_len];
        let read = state.lob.get_data(&mut buf, position)?;
        let n = match read {
            LobRead::Data(0) if max_len > 0 && state.kind == LobKind::Character => {
                return Err(Error::type_conversion(format!(
                    "read size of {max_len} bytes cannot hold the next CLOB character"
                )));
            }
            LobRead::Data(n) => n.min(max_len),
            LobRead::NoData | LobRead::Null => 0,
        };
        buf.truncate(n);
        match state.kind {
            LobKind::Binary => Ok(HostValue::Bytes(buf)),
            LobKind::Character => String::from_utf8(buf)
                .map(HostValue::Text)
                .map_err(|e| Error::type_conversion(format!("invalid UTF-8 in CLOB data: {e}"))),
        }
    }

    /// Write `value` at the current position.
    pub fn write(&self, value: &HostValue) -> Result<()> {
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        let data = match state.kind {
            LobKind::Binary => value.to_bytes()?,
            LobKind::Character => match value.to_text()? {
                std::borrow::Cow::Borrowed(s) => std::borrow::Cow::Borrowed(s.as_bytes()),
                std::borrow::Cow::Owned(s) => std::borrow::Cow::Owned(s.into_bytes()),
            },
        };
        state.lob.put_data(&data)
    }

    /// Close the server handle for every alias.
    pub fn close(&self) -> Result<()> {
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        state.lob.close()?;
        state.open = false;
        debug!(kind = %state.kind, "Closed LOB");
        Ok(())
    }

    /// Length in characters (CLOB) or bytes (BLOB).
    pub fn length(&self) -> Result<i64> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        state.lob.length()
    }

    /// Current 1-based position, 0 when unknown.
    pub fn position(&self) -> Result<i64> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        state.lob.position()
    }

    /// Preferred chunk size for reads and writes.
    pub fn optimal_size(&self) -> Result<i64> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        state.lob.preferred_size()
    }
}

impl PartialEq for LobHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for LobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("LobHandle")
            .field("kind", &state.kind)
            .field("open", &state.open)
            .field("refs", &Rc::strong_count(&self.inner))
            .finish()
    }
}
