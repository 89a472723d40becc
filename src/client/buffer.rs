//! Transfer buffers exchanged with the client library.
//!
//! A transfer buffer holds one parameter or column value together with its
//! length indicator. The indicator is the number of valid bytes, or
//! [`SQLDBC_NULL_DATA`] for SQL NULL. Scalars are stored in native byte
//! order at their natural machine width.

use crate::client::constants::*;
use crate::error::{Error, Result};
use crate::types::{HostType, HostValue};
use bytes::{BufMut, BytesMut};

/// Fixed-capacity buffer with a length indicator.
#[derive(Debug, Clone)]
pub struct TransferBuffer {
    data: BytesMut,
    capacity: usize,
    indicator: i64,
}

impl TransferBuffer {
    /// Create an empty buffer that accepts up to `capacity` bytes.
    ///
    /// Storage is allocated on first write.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: BytesMut::new(),
            capacity,
            indicator: 0,
        }
    }

    /// Create a buffer with storage for `capacity` bytes allocated up front.
    pub fn allocated(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            capacity,
            indicator: 0,
        }
    }

    /// Create the output buffer for a value of `host_type`.
    ///
    /// Character buffers reserve one extra byte for the terminator the
    /// client library appends. LOB buffers are declared with the full LOB
    /// length and allocate on first write.
    pub fn for_output(host_type: HostType, declared_length: i32, byte_length: i32) -> Self {
        let capacity = host_type.max_byte_length(declared_length, byte_length);
        if host_type.is_lob() {
            return Self::new(capacity);
        }
        let mut buffer = Self::allocated(capacity);
        if host_type.is_text() {
            buffer.data.reserve(capacity + 1);
        }
        buffer
    }

    /// Maximum number of value bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the maximum number of value bytes, clearing the content.
    pub fn reset(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.clear();
    }

    /// Raw length indicator.
    pub fn indicator(&self) -> i64 {
        self.indicator
    }

    /// Number of valid bytes, `None` for SQL NULL.
    pub fn len(&self) -> Option<usize> {
        if self.is_null() {
            None
        } else {
            Some(self.data.len())
        }
    }

    /// Check if the buffer holds no bytes (NULL counts as empty).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the buffer holds SQL NULL.
    pub fn is_null(&self) -> bool {
        self.indicator == SQLDBC_NULL_DATA
    }

    /// Get the valid bytes, `None` for SQL NULL.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if self.is_null() {
            None
        } else {
            Some(&self.data)
        }
    }

    /// Discard the content and mark the buffer as holding zero bytes.
    pub fn clear(&mut self) {
        self.data.clear();
        self.indicator = 0;
    }

    /// Mark the buffer as SQL NULL.
    pub fn set_null(&mut self) {
        self.data.clear();
        self.indicator = SQLDBC_NULL_DATA;
    }

    /// Store a 32-bit integer.
    pub fn put_i32(&mut self, val: i32) {
        self.data.clear();
        self.data.put_i32_ne(val);
        self.indicator = SIZEOF_INT4 as i64;
    }

    /// Store a 64-bit integer.
    pub fn put_i64(&mut self, val: i64) {
        self.data.clear();
        self.data.put_i64_ne(val);
        self.indicator = SIZEOF_INT8 as i64;
    }

    /// Store a double.
    pub fn put_f64(&mut self, val: f64) {
        self.data.clear();
        self.data.put_f64_ne(val);
        self.indicator = SIZEOF_DOUBLE as i64;
    }

    /// Store variable-length data.
    #[track_caller]
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.capacity {
            return Err(Error::buffer_too_small(bytes.len(), self.capacity));
        }
        self.data.clear();
        self.data.extend_from_slice(bytes);
        self.indicator = bytes.len() as i64;
        Ok(())
    }

    /// Read a 32-bit integer.
    #[track_caller]
    pub fn get_i32(&self) -> Result<i32> {
        let bytes = self.fixed::<SIZEOF_INT4>()?;
        Ok(i32::from_ne_bytes(bytes))
    }

    /// Read a 64-bit integer.
    #[track_caller]
    pub fn get_i64(&self) -> Result<i64> {
        let bytes = self.fixed::<SIZEOF_INT8>()?;
        Ok(i64::from_ne_bytes(bytes))
    }

    /// Read a double.
    #[track_caller]
    pub fn get_f64(&self) -> Result<f64> {
        let bytes = self.fixed::<SIZEOF_DOUBLE>()?;
        Ok(f64::from_ne_bytes(bytes))
    }

    #[track_caller]
    fn fixed<const N: usize>(&self) -> Result<[u8; N]> {
        self.data
            .get(..N)
            .and_then(|slice| <[u8; N]>::try_from(slice).ok())
            .ok_or_else(|| Error::buffer_too_small(N, self.data.len()))
    }

    /// Store a host value using the `host_type` representation.
    ///
    /// A value without a scalar subtype whose text is empty is stored as
    /// SQL NULL. Variable-length data longer than the capacity fails with
    /// [`Error::BufferTooSmall`].
    #[track_caller]
    pub fn encode(&mut self, host_type: HostType, value: &HostValue) -> Result<()> {
        if value.is_null_input() {
            self.set_null();
            return Ok(());
        }
        match host_type {
            HostType::Int32 => self.put_i32(value.to_i32()?),
            HostType::Int64 => self.put_i64(value.to_i64()?),
            HostType::Double => self.put_f64(value.to_f64()?),
            HostType::Binary | HostType::Blob => {
                let bytes = value.to_bytes()?;
                self.put_bytes(&bytes)?;
            }
            HostType::NumericText | HostType::Utf8 | HostType::Clob => {
                let text = value.to_text()?;
                self.put_bytes(text.as_bytes())?;
            }
        }
        Ok(())
    }

    /// Decode the content into a host value typed by `host_type`.
    ///
    /// SQL NULL decodes to [`HostValue::Null`]. LOB types decode their
    /// inline content as bytes or text.
    pub fn decode(&self, host_type: HostType) -> Result<HostValue> {
        let Some(bytes) = self.as_bytes() else {
            return Ok(HostValue::Null);
        };
        let value = match host_type {
            HostType::Int32 => HostValue::Int32(self.get_i32()?),
            HostType::Int64 => HostValue::Int64(self.get_i64()?),
            HostType::Double => HostValue::Double(self.get_f64()?),
            HostType::Binary | HostType::Blob => HostValue::Bytes(bytes.to_vec()),
            HostType::NumericText | HostType::Utf8 | HostType::Clob => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    Error::type_conversion(format!("invalid UTF-8 in transfer buffer: {e}"))
                })?;
                HostValue::Text(text.to_string())
            }
        };
        Ok(value)
    }
}
