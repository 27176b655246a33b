// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Compute context and shape-aware dispatch
//!
//! Transforms never inspect the shape of their input themselves: dispatch
//! pattern-matches the dataset tag, recurses into partitions, and re-attaches
//! constant columns after the transform runs.

mod context;
mod dispatch;

pub use context::ComputeContext;
pub use dispatch::compute;
