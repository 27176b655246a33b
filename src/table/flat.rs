// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Flat rectangular tables
//!
//! Ordered named columns of equal length. Column order and row order are both
//! significant: row order is part of a table's identity for order-dependent
//! transforms, and column order drives serialization.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::errors::{TabflowError, TabflowResult};
use crate::table::Value;

/// A single named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Cell values, one per row
    pub values: Vec<Value>,
}

/// A rectangular table: ordered named columns, all equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTable {
    columns: Vec<Column>,
}

impl FlatTable {
    /// Create an empty table (no columns, no rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs, in order.
    ///
    /// Fails with [`TabflowError::ColumnLengthMismatch`] if any column's
    /// length differs from the first.
    pub fn from_columns<I, S>(columns: I) -> TabflowResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name.into(), values)?;
        }
        Ok(table)
    }

    /// Append a column, enforcing the rectangular invariant.
    pub fn push_column(&mut self, name: String, values: Vec<Value>) -> TabflowResult<()> {
        if let Some(first) = self.columns.first() {
            if values.len() != first.values.len() {
                return Err(TabflowError::ColumnLengthMismatch {
                    column: name,
                    expected: first.values.len(),
                    actual: values.len(),
                });
            }
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Values of a named column, if present.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Values of a named column, or [`TabflowError::UnknownColumn`].
    pub fn require_column(&self, name: &str) -> TabflowResult<&[Value]> {
        self.column(name).ok_or_else(|| TabflowError::UnknownColumn {
            column: name.to_string(),
        })
    }

    /// Replace a column's values in place (same position), or append it.
    ///
    /// Used to re-attach constant columns after a transform; the replacement
    /// must match the current row count.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> TabflowResult<()> {
        if values.len() != self.row_count() && !self.columns.is_empty() {
            return Err(TabflowError::ColumnLengthMismatch {
                column: name.to_string(),
                expected: self.row_count(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }

    /// Build a new table containing the given rows, in the given order.
    ///
    /// Indices may repeat or omit rows; callers use this both for sort
    /// permutations and for row filtering.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Self { columns }
    }

    /// Append all rows of `other`, matching columns by name.
    ///
    /// Columns absent from `other` are padded with nulls, and columns new in
    /// `other` are back-filled with nulls. Used to flatten partitions.
    pub fn append_rows(&mut self, other: &Self) {
        let own_rows = self.row_count();
        let other_rows = other.row_count();

        for col in &mut self.columns {
            match other.column(&col.name) {
                Some(values) => col.values.extend_from_slice(values),
                None => col
                    .values
                    .extend(std::iter::repeat(Value::Null).take(other_rows)),
            }
        }
        for col in &other.columns {
            if self.column(&col.name).is_none() {
                let mut values = vec![Value::Null; own_rows];
                values.extend_from_slice(&col.values);
                self.columns.push(Column {
                    name: col.name.clone(),
                    values,
                });
            }
        }
    }
}

impl fmt::Display for FlatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows x {} cols [{}]",
            self.row_count(),
            self.column_count(),
            self.column_names().join(", ")
        )
    }
}

// Serializes as an ordered map `column -> [values]`, which is the natural
// YAML/JSON shape for small tables and keeps column order intact.
impl Serialize for FlatTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for col in &self.columns {
            map.serialize_entry(&col.name, &col.values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FlatTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = FlatTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to list of values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = FlatTable::new();
                while let Some((name, values)) = access.next_entry::<String, Vec<Value>>()? {
                    table
                        .push_column(name, values)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
