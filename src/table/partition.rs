// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Partitioned (grouped) tables
//!
//! An ordered mapping from group key to flat table. Key order is the order of
//! first appearance in the source rows and is preserved by every transform,
//! because it determines output ordering when partitions are reassembled.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::errors::TabflowResult;
use crate::table::{FlatTable, Value};

/// One partition: its group key and its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Key values, aligned to the grouping columns
    pub key: Vec<Value>,
    /// Rows belonging to this key
    pub table: FlatTable,
}

/// A table partitioned by one or more grouping columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedTable {
    key_vars: Vec<String>,
    partitions: Vec<Partition>,
}

impl PartitionedTable {
    /// Partition a flat table by the given columns, in first-appearance order.
    ///
    /// Fails with `UnknownColumn` if a grouping column is absent.
    pub fn from_flat(table: &FlatTable, key_vars: &[String]) -> TabflowResult<Self> {
        let key_columns: Vec<&[Value]> = key_vars
            .iter()
            .map(|name| table.require_column(name))
            .collect::<TabflowResult<_>>()?;

        let mut keys: Vec<Vec<Value>> = Vec::new();
        let mut rows_by_key: Vec<Vec<usize>> = Vec::new();

        for row in 0..table.row_count() {
            let key: Vec<Value> = key_columns.iter().map(|col| col[row].clone()).collect();
            match keys.iter().position(|k| same_key(k, &key)) {
                Some(idx) => rows_by_key[idx].push(row),
                None => {
                    keys.push(key);
                    rows_by_key.push(vec![row]);
                }
            }
        }

        let partitions = keys
            .into_iter()
            .zip(rows_by_key)
            .map(|(key, rows)| Partition {
                key,
                table: table.take_rows(&rows),
            })
            .collect();

        Ok(Self {
            key_vars: key_vars.to_vec(),
            partitions,
        })
    }

    /// The grouping column names.
    pub fn key_vars(&self) -> &[String] {
        &self.key_vars
    }

    /// The partitions, in key order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Number of partitions.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Whether there are no partitions.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Total rows across all partitions.
    pub fn row_count(&self) -> usize {
        self.partitions.iter().map(|p| p.table.row_count()).sum()
    }

    /// Apply `f` to each partition independently, preserving keys and order.
    ///
    /// Partitions never see each other; a failure in any partition aborts the
    /// whole operation with no partial result.
    pub fn map_partitions<F>(&self, mut f: F) -> TabflowResult<Self>
    where
        F: FnMut(&FlatTable) -> TabflowResult<FlatTable>,
    {
        let partitions = self
            .partitions
            .iter()
            .map(|p| {
                Ok(Partition {
                    key: p.key.clone(),
                    table: f(&p.table)?,
                })
            })
            .collect::<TabflowResult<_>>()?;
        Ok(Self {
            key_vars: self.key_vars.clone(),
            partitions,
        })
    }

    /// Reassemble into one flat table, concatenating partitions in key order.
    pub fn flatten(&self) -> FlatTable {
        let mut out = FlatTable::new();
        for partition in &self.partitions {
            if out.is_empty() {
                out = partition.table.clone();
            } else {
                out.append_rows(&partition.table);
            }
        }
        out
    }
}

/// Key equality via the total ordering, so `Null` keys group together and
/// float keys compare by IEEE total order.
fn same_key(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.total_cmp(y) == std::cmp::Ordering::Equal)
}

// Serialized for display/output only (`tabflow run`); partitioned data is
// never a source, so no Deserialize.
impl Serialize for PartitionedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            key: &'a [Value],
            table: &'a FlatTable,
        }

        let mut seq = serializer.serialize_seq(Some(self.partitions.len()))?;
        for p in &self.partitions {
            seq.serialize_element(&Entry {
                key: &p.key,
                table: &p.table,
            })?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped_sample() -> FlatTable {
        FlatTable::from_columns(vec![
            ("g", vec!["b".into(), "a".into(), "b".into(), "a".into()]),
            ("x", vec![1.into(), 2.into(), 3.into(), 4.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_partition_first_appearance_order() {
        let grouped =
            PartitionedTable::from_flat(&grouped_sample(), &["g".to_string()]).unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.partitions()[0].key, vec![Value::from("b")]);
        assert_eq!(grouped.partitions()[1].key, vec![Value::from("a")]);
        assert_eq!(
            grouped.partitions()[0].table.column("x").unwrap(),
            &[1.into(), 3.into()]
        );
    }

    #[test]
    fn test_unknown_grouping_column() {
        let err =
            PartitionedTable::from_flat(&grouped_sample(), &["nope".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::TabflowError::UnknownColumn { .. }
        ));
    }

    #[test]
    fn test_flatten_concatenates_in_key_order() {
        let grouped =
            PartitionedTable::from_flat(&grouped_sample(), &["g".to_string()]).unwrap();
        let flat = grouped.flatten();
        assert_eq!(flat.row_count(), 4);
        // b-rows first (keys in first-appearance order), then a-rows
        assert_eq!(
            flat.column("x").unwrap(),
            &[1.into(), 3.into(), 2.into(), 4.into()]
        );
    }

    #[test]
    fn test_map_partitions_preserves_keys() {
        let grouped =
            PartitionedTable::from_flat(&grouped_sample(), &["g".to_string()]).unwrap();
        let mapped = grouped.map_partitions(|t| Ok(t.take_rows(&[0]))).unwrap();
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped.partitions()[0].key, grouped.partitions()[0].key);
        assert_eq!(mapped.row_count(), 2);
    }
}
