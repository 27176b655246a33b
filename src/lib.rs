// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! # tabflow - Tabular Pipeline Engine
//!
//! `tabflow` composes chained tabular-data transformations into canonical
//! pipelines, dispatches each transform over flat and partitioned tables,
//! and fingerprints pipelines so reactive consumers can skip unchanged
//! computations.
//!
//! ## Features
//!
//! - **Trim-to-source** - only the most recent data source matters; stale
//!   history is removed on every composition
//! - **Shape dispatch** - transforms run unchanged over flat tables and
//!   grouped partitions
//! - **Stable fingerprints** - identical pipeline + context means identical
//!   id, so downstream caches can skip recomputes
//! - **Constant preservation** - identity-only columns survive every
//!   transform untouched
//!
//! ## Quick Start
//!
//! ```
//! use tabflow::{ComputeContext, FlatTable, Pipe, Pipeline, SortOptions};
//!
//! let table = FlatTable::from_columns(vec![
//!     ("speed", vec![3.into(), 1.into(), 2.into()]),
//! ])?;
//! let pipeline = Pipeline::new([
//!     Pipe::source("cars", table),
//!     Pipe::sort(["x"], SortOptions::default())?,
//! ]);
//!
//! let context = ComputeContext::new([("x", "speed")], Vec::<String>::new());
//! let result = pipeline.evaluate(&context)?.unwrap();
//! assert_eq!(result.row_count(), 3);
//! # Ok::<(), tabflow::TabflowError>(())
//! ```

pub mod cache;
pub mod cli;
pub mod compute;
pub mod errors;
pub mod pipe;
pub mod pipeline;
pub mod table;

// Re-export commonly used types
pub use cache::{CacheStats, ResultCache};
pub use compute::{compute, ComputeContext};
pub use errors::{TabflowError, TabflowResult};
pub use pipe::{as_pipe, NullPolicy, Pipe, PipeInput, SortDirection, SortOptions, SortTransform};
pub use pipeline::{pipe_id, pipeline_id, Pipeline};
pub use table::{Dataset, FlatTable, PartitionedTable, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
