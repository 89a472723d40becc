//! Prepared statement parameters.
//!
//! A [`ParameterSet`] is built once per prepare from the server's parameter
//! descriptions and the markers found in the SQL text. Each execution binds
//! the caller's values into the parameters' transfer buffers and, after the
//! server call succeeded, copies OUT and INOUT results back into the
//! caller's slots.
//!
//! # NULL values
//!
//! A value binds as SQL NULL when it carries no scalar subtype and its text
//! is empty. `HostValue::Text(String::new())` therefore binds NULL, while
//! `HostValue::Bytes(Vec::new())` binds an empty byte string.

use tracing::{debug, trace};

use crate::client::{Binding, ParameterMetadata, ParameterMode, TransferBuffer};
use crate::error::{Error, Result};
use crate::placeholder::{self, Placeholder};
use crate::types::{HostType, HostValue, SqlType};

/// Arguments for one execution of a prepared statement.
#[derive(Debug)]
pub enum Params<'a, 'n> {
    /// One value per parameter, in parameter order.
    Positional(&'a mut [HostValue]),
    /// Values addressed by marker name, with or without the leading `:`.
    Named(&'a mut [(&'n str, HostValue)]),
}

impl Params<'_, '_> {
    fn len(&self) -> usize {
        match self {
            Params::Positional(args) => args.len(),
            Params::Named(args) => args.len(),
        }
    }

    fn value(&self, slot: usize) -> &HostValue {
        match self {
            Params::Positional(args) => &args[slot],
            Params::Named(args) => &args[slot].1,
        }
    }

    fn value_mut(&mut self, slot: usize) -> &mut HostValue {
        match self {
            Params::Positional(args) => &mut args[slot],
            Params::Named(args) => &mut args[slot].1,
        }
    }
}

/// A statement parameter.
#[derive(Debug)]
pub struct Parameter {
    /// Marker name without the colon, `None` for `?` markers.
    pub name: Option<String>,
    pub sql_type: SqlType,
    /// Representation used to transfer values of this parameter.
    pub host_type: HostType,
    pub mode: ParameterMode,
    /// Declared length in characters or digits.
    pub length: i32,
    pub precision: i16,
    pub scale: i16,
    /// Physical length in bytes.
    pub byte_length: i32,
    buffer: TransferBuffer,
}

impl Parameter {
    /// Create a parameter from metadata.
    ///
    /// OUT and INOUT parameters get a buffer sized for the largest value
    /// the server may return.
    pub fn from_metadata(meta: &ParameterMetadata, marker: Option<&Placeholder>) -> Result<Self> {
        let sql_type = SqlType::from_code(meta.sql_type)?;
        let host_type = HostType::resolve(sql_type, meta.precision, meta.scale);
        let buffer = if meta.mode.is_output() {
            TransferBuffer::for_output(host_type, meta.length, meta.byte_length)
        } else {
            TransferBuffer::new(host_type.max_byte_length(meta.length, meta.byte_length))
        };
        Ok(Self {
            name: marker.and_then(Placeholder::name).map(str::to_string),
            sql_type,
            host_type,
            mode: meta.mode,
            length: meta.length,
            precision: meta.precision,
            scale: meta.scale,
            byte_length: meta.byte_length,
            buffer,
        })
    }

    /// Maximum number of bytes a bound value may occupy.
    pub fn max_byte_length(&self) -> usize {
        self.buffer.capacity()
    }

    /// Length indicator of the bound or returned value.
    ///
    /// [`SQLDBC_NULL_DATA`](crate::client::constants::SQLDBC_NULL_DATA) for NULL.
    pub fn transfer_length(&self) -> i64 {
        self.buffer.indicator()
    }

    /// Check if `name` addresses this parameter.
    fn matches(&self, name: &str) -> bool {
        let name = name.strip_prefix(':').unwrap_or(name);
        self.name
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
    }

    /// Copy an input value into the transfer buffer.
    ///
    /// `position` is the 1-based parameter position used in error messages.
    /// OUT parameters ignore the value.
    pub fn bind(&mut self, position: usize, value: &HostValue) -> Result<()> {
        if !self.mode.is_input() {
            return Ok(());
        }
        match self.buffer.encode(self.host_type, value) {
            Err(Error::BufferTooSmall {
                needed, available, ..
            }) => Err(Error::ValueTooLong {
                position,
                length: needed,
                max_length: available,
            }),
            other => other,
        }
    }

    /// Decode the value the server returned.
    pub fn output(&self) -> Result<HostValue> {
        self.buffer.decode(self.host_type)
    }

    fn binding(&mut self, index: usize) -> Binding<'_> {
        Binding {
            index,
            host_type: self.host_type,
            mode: self.mode,
            buffer: &mut self.buffer,
        }
    }
}

/// Parameters of a prepared statement.
#[derive(Debug, Default)]
pub struct ParameterSet {
    params: Vec<Parameter>,
    named: bool,
    /// Argument slot bound to each parameter by the last `bind`.
    slots: Vec<usize>,
}

impl ParameterSet {
    /// Build the parameters of `sql` from the server's descriptions.
    ///
    /// Fails when the markers in `sql` do not agree with `metadata`.
    pub fn new(sql: &str, metadata: &[ParameterMetadata]) -> Result<Self> {
        let markers = placeholder::scan(sql, metadata.len())?;
        let params = metadata
            .iter()
            .enumerate()
            .map(|(i, meta)| Parameter::from_metadata(meta, markers.get(i)))
            .collect::<Result<Vec<_>>>()?;
        let named = params.first().is_some_and(|p| p.name.is_some());
        debug!(count = params.len(), named, "Prepared statement parameters");
        Ok(Self {
            params,
            named,
            slots: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Check if the statement uses `:NAME` markers.
    pub fn is_named(&self) -> bool {
        self.named
    }

    /// Get parameter by index (0-based).
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    /// Find the index of the first parameter called `name` (case-insensitive).
    pub fn find(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Bind `args` into the parameter buffers.
    ///
    /// A failure leaves the parameters bound before it in place.
    pub fn bind(&mut self, args: &Params<'_, '_>) -> Result<()> {
        let expected = self.params.len();
        if args.len() != expected {
            return Err(Error::ArgumentCount {
                expected,
                provided: args.len(),
                named: self.named,
            });
        }

        self.slots = match args {
            Params::Positional(_) if self.named => return Err(Error::NamedArgumentsRequired),
            Params::Positional(_) => (0..expected).collect(),
            Params::Named(named_args) => self.resolve_names(named_args)?,
        };

        for (param_idx, param) in self.params.iter_mut().enumerate() {
            let slot = self.slots[param_idx];
            param.bind(param_idx + 1, args.value(slot))?;
            trace!(
                position = param_idx + 1,
                host_type = %param.host_type,
                indicator = param.transfer_length(),
                "Bound parameter"
            );
        }
        Ok(())
    }

    /// Map each parameter to the argument slot that carries its value.
    ///
    /// Repeated markers take repeated names in order.
    fn resolve_names(&self, args: &[(&str, HostValue)]) -> Result<Vec<usize>> {
        let mut slots: Vec<Option<usize>> = vec![None; self.params.len()];
        for (slot, (name, _)) in args.iter().enumerate() {
            let param_idx = self
                .params
                .iter()
                .enumerate()
                .position(|(i, p)| slots[i].is_none() && p.matches(name))
                .ok_or_else(|| Error::ParameterNotFound {
                    name: name.to_string(),
                })?;
            slots[param_idx] = Some(slot);
        }
        // Equal counts and one parameter per name leave no gaps
        Ok(slots.into_iter().flatten().collect())
    }

    /// Transfer buffers for the server call, one per parameter.
    pub fn bindings(&mut self) -> Vec<Binding<'_>> {
        self.params
            .iter_mut()
            .enumerate()
            .map(|(i, p)| p.binding(i + 1))
            .collect()
    }

    /// Write OUT and INOUT results back into the argument slots used by the
    /// last `bind`.
    ///
    /// Every output is decoded before the first slot is assigned, so a
    /// failure leaves `args` untouched.
    pub fn write_back(&self, args: &mut Params<'_, '_>) -> Result<()> {
        let outputs = self
            .params
            .iter()
            .zip(&self.slots)
            .filter(|(param, _)| param.mode.is_output())
            .map(|(param, &slot)| param.output().map(|value| (slot, value)))
            .collect::<Result<Vec<_>>>()?;
        for (slot, value) in outputs {
            *args.value_mut(slot) = value;
        }
        Ok(())
    }
}
