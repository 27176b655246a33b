// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Pipeline composition and identity
//!
//! A pipeline is an ordered, immutable sequence of pipes. Every composing
//! operation (construction, concatenation, slicing, deserialization)
//! normalizes the sequence by trimming everything before the most recent
//! data source.

mod composition;
mod identity;

pub use composition::Pipeline;
pub use identity::{pipe_id, pipeline_id};
