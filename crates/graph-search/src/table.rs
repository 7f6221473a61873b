//! Columnar relations of nullable integers.
//!
//! This is the shape table functions consume and produce: a list of named
//! columns of equal length, each cell either an integer or NULL. It is
//! deliberately narrow; the host engine owns richer types and only hands
//! integer columns across this boundary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::NodeId;

/// A single cell.
///
/// Serializes as a bare JSON integer or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A 64-bit signed integer.
    Integer(i64),
}

impl Value {
    /// The integer payload, `None` for NULL.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Null => None,
            Self::Integer(v) => Some(v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Self::Null, Self::Integer)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Self::Integer(id.as_i64())
    }
}

impl From<Option<NodeId>> for Value {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Self::Null, Self::from)
    }
}

/// A named column of nullable integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    values: Vec<Option<i64>>,
}

impl Column {
    /// Create a column from its cells.
    pub fn new(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create a column with no NULL cells.
    pub fn non_null(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }

    /// The column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw cells.
    #[must_use]
    pub fn values(&self) -> &[Option<i64>] {
        &self.values
    }

    /// The cell at `row`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<Value> {
        self.values.get(row).map(|&v| Value::from(v))
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered set of equal-length named columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table from columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateColumn`] if two columns share a name and
    /// [`Error::ColumnLength`] if the columns are not all the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(Error::DuplicateColumn(column.name().to_string()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(ragged) = columns.iter().find(|c| c.len() != expected) {
                return Err(Error::ColumnLength {
                    column: ragged.name().to_string(),
                    expected,
                    actual: ragged.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// A table with the given columns and no rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateColumn`] for repeated names.
    pub fn empty(names: &[&str]) -> Result<Self> {
        Self::from_columns(names.iter().map(|n| Column::new(*n, Vec::new())).collect())
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows. A table with no columns has no rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// The cells of one row, or `None` if out of bounds.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<Value>> {
        if index >= self.row_count() {
            return None;
        }
        self.columns.iter().map(|c| c.get(index)).collect()
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.row_count()).filter_map(|index| self.row(index))
    }
}
