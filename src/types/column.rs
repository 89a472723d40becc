//! Column and ColumnInfo types for user-facing API.
//!
//! A [`Column`] is derived once per executed query from the raw
//! [`ColumnMetadata`] and never changes afterwards. The next execution of the
//! statement builds a fresh set.

use crate::client::constants::UNKNOWN_COLUMN_LABEL;
use crate::client::ColumnMetadata;
use crate::error::Result;

use super::host_type::HostType;
use super::sql_type::SqlType;

/// A column in a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column alias, else column name, else `"UNKNOWN"`.
    pub label: String,
    /// Declared length in characters or digits.
    pub length: i32,
    pub precision: i16,
    pub scale: i16,
    /// Physical length in bytes.
    pub byte_length: i32,
    pub sql_type: SqlType,
    /// Representation used to transfer values of this column.
    pub host_type: HostType,
    pub schema: Option<String>,
    pub table: Option<String>,
    pub name: Option<String>,
    /// `None` when the server does not know.
    pub nullable: Option<bool>,
    pub writable: bool,
}

impl Column {
    /// Create a column from metadata.
    ///
    /// Returns error if the SQL type code is not supported.
    pub fn from_metadata(meta: &ColumnMetadata) -> Result<Self> {
        let sql_type = SqlType::from_code(meta.sql_type)?;
        let label = meta
            .label
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| meta.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(UNKNOWN_COLUMN_LABEL)
            .to_string();
        Ok(Self {
            label,
            length: meta.length,
            precision: meta.precision,
            scale: meta.scale,
            byte_length: meta.byte_length,
            sql_type,
            host_type: HostType::resolve(sql_type, meta.precision, meta.scale),
            schema: meta.schema.clone(),
            table: meta.table.clone(),
            name: meta.name.clone(),
            nullable: meta.nullable.as_bool(),
            writable: meta.writable,
        })
    }

    /// Size of the transfer buffer needed for one value.
    pub fn buffer_size(&self) -> usize {
        self.host_type.max_byte_length(self.length, self.byte_length)
    }
}

/// Shared column information for all rows in a result set.
#[derive(Debug, Clone, Default)]
pub struct ColumnInfo {
    /// Column definitions.
    pub columns: Vec<Column>,
}

impl ColumnInfo {
    /// Create new column info from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Create column info from raw metadata.
    ///
    /// Returns error if any column has an unsupported SQL type.
    pub fn from_metadata(metadata: &[ColumnMetadata]) -> Result<Self> {
        let columns: Result<Vec<Column>> = metadata.iter().map(Column::from_metadata).collect();
        Ok(Self { columns: columns? })
    }

    /// Get column labels.
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by index (0-based).
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Find column index by label (case-insensitive).
    pub fn find_by_label(&self, label: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.label.eq_ignore_ascii_case(label))
    }
}
