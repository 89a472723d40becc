//! Row type for query results.

use std::collections::HashMap;
use std::rc::Rc;

use super::column::{Column, ColumnInfo};
use super::value::HostValue;

/// A materialized row of query results.
#[derive(Debug, Clone)]
pub struct Row {
    /// Column values.
    values: Vec<HostValue>,
    /// Shared column information (reference counted).
    column_info: Rc<ColumnInfo>,
}

impl Row {
    /// Create a new row with values and shared column info.
    pub fn new(values: Vec<HostValue>, column_info: Rc<ColumnInfo>) -> Self {
        Self {
            values,
            column_info,
        }
    }

    /// Get value by column index (0-based).
    pub fn get(&self, index: usize) -> Option<&HostValue> {
        self.values.get(index)
    }

    /// Get value by column label (case-insensitive).
    pub fn get_by_label(&self, label: &str) -> Option<&HostValue> {
        self.column_info
            .find_by_label(label)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get all values.
    pub fn values(&self) -> &[HostValue] {
        &self.values
    }

    /// NULL flag per column, in column order.
    pub fn nulls(&self) -> Vec<bool> {
        self.values.iter().map(HostValue::is_null).collect()
    }

    /// Get column information.
    pub fn columns(&self) -> &[Column] {
        &self.column_info.columns
    }

    /// Get column labels.
    pub fn labels(&self) -> Vec<&str> {
        self.column_info.labels()
    }

    /// Label to NULL flag map.
    pub fn null_map(&self) -> HashMap<String, bool> {
        self.column_info
            .columns
            .iter()
            .zip(&self.values)
            .map(|(c, v)| (c.label.clone(), v.is_null()))
            .collect()
    }

    /// Consume the row into a label to value map.
    ///
    /// When two columns share a label the later one wins.
    pub fn into_map(self) -> HashMap<String, HostValue> {
        self.column_info
            .columns
            .iter()
            .map(|c| c.label.clone())
            .zip(self.values)
            .collect()
    }

    /// Iterate over values.
    pub fn iter(&self) -> impl Iterator<Item = &HostValue> {
        self.values.iter()
    }
}

impl IntoIterator for Row {
    type Item = HostValue;
    type IntoIter = std::vec::IntoIter<HostValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a HostValue;
    type IntoIter = std::slice::Iter<'a, HostValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
