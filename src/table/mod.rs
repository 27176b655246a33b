// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Tabular data shapes
//!
//! This module defines the two data shapes a transform can receive — flat
//! tables and partitioned tables — plus the [`Dataset`] tag that makes the
//! shape explicit, so compute dispatch is a pattern match rather than
//! type-based method resolution.

mod flat;
mod partition;
mod value;

pub use flat::{Column, FlatTable};
pub use partition::{Partition, PartitionedTable};
pub use value::Value;

use serde::{Serialize, Serializer};

/// A dataset flowing between pipeline stages, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// A single rectangular table
    Flat(FlatTable),
    /// A grouped collection of tables
    Partitioned(PartitionedTable),
}

impl Dataset {
    /// Total row count across the dataset.
    pub fn row_count(&self) -> usize {
        match self {
            Self::Flat(t) => t.row_count(),
            Self::Partitioned(p) => p.row_count(),
        }
    }

    /// Short shape label for diagnostics and logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Flat(_) => "flat",
            Self::Partitioned(_) => "partitioned",
        }
    }

    /// The flat table, if this dataset is flat.
    pub fn as_flat(&self) -> Option<&FlatTable> {
        match self {
            Self::Flat(t) => Some(t),
            Self::Partitioned(_) => None,
        }
    }

    /// Collapse to a single flat table (partitions concatenated in key order).
    pub fn into_flat(self) -> FlatTable {
        match self {
            Self::Flat(t) => t,
            Self::Partitioned(p) => p.flatten(),
        }
    }
}

impl From<FlatTable> for Dataset {
    fn from(t: FlatTable) -> Self {
        Self::Flat(t)
    }
}

impl From<PartitionedTable> for Dataset {
    fn from(p: PartitionedTable) -> Self {
        Self::Partitioned(p)
    }
}

// Output shape mirrors the variant: a flat dataset serializes as the table
// map, a partitioned one as a sequence of keyed partitions.
impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flat(t) => t.serialize(serializer),
            Self::Partitioned(p) => p.serialize(serializer),
        }
    }
}
