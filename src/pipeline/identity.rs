// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Pipeline fingerprinting
//!
//! Produces the stable identity string the external reactive layer keys its
//! cache on. The contract is soundness first: any change to pipe parameters,
//! order, context resolution, or source data must change the fingerprint.
//! Spurious changes only cost a wasted recompute; a shared fingerprint for
//! two different computations would serve stale data.

use blake3::Hasher;
use serde::Serialize;

use crate::compute::ComputeContext;
use crate::errors::TabflowResult;
use crate::pipe::Pipe;
use crate::pipeline::Pipeline;

/// Separator between pipe digests in a pipeline fingerprint.
const ID_SEPARATOR: &str = "/";

/// Length of each pipe digest (hex characters).
const ID_LEN: usize = 16;

/// Fingerprint material for one pipe, with symbolic variables already
/// resolved through the context.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PipeIdentity<'a> {
    Source {
        name: &'a str,
        table: &'a crate::table::FlatTable,
    },
    GroupBy {
        columns: Vec<String>,
    },
    Sort {
        columns: Vec<String>,
        options: &'a crate::pipe::SortOptions,
    },
}

/// Compute the short deterministic digest of one pipe under a context.
///
/// Sort variables resolve through the context before hashing, so remapping a
/// variable to a different column changes the id even though the pipe itself
/// is unchanged. Grouping variables resolve through the context when mapped
/// and fall back to their literal column name otherwise.
pub fn pipe_id(pipe: &Pipe, context: &ComputeContext) -> TabflowResult<String> {
    let identity = match pipe {
        Pipe::Source { name, table } => PipeIdentity::Source { name, table },
        Pipe::GroupBy { vars } => PipeIdentity::GroupBy {
            columns: vars
                .iter()
                .map(|v| context.resolve(v).unwrap_or(v.as_str()).to_string())
                .collect(),
        },
        Pipe::Sort(sort) => PipeIdentity::Sort {
            columns: context.resolve_all(&sort.vars)?,
            options: &sort.options,
        },
    };

    let json = serde_json::to_string(&identity)?;
    let mut hasher = Hasher::new();
    hasher.update(json.as_bytes());
    Ok(hasher.finalize().to_hex()[..ID_LEN].to_string())
}

/// Compute the fingerprint of a whole pipeline under a context.
///
/// An explicit id set at construction wins verbatim; the empty pipeline has
/// no fingerprint (`None`); otherwise the pipe digests are joined in
/// sequence order.
pub fn pipeline_id(
    pipeline: &Pipeline,
    context: &ComputeContext,
) -> TabflowResult<Option<String>> {
    if let Some(id) = pipeline.explicit_id() {
        return Ok(Some(id.to_string()));
    }
    if pipeline.is_empty() {
        return Ok(None);
    }

    let parts: Vec<String> = pipeline
        .pipes()
        .iter()
        .map(|pipe| pipe_id(pipe, context))
        .collect::<TabflowResult<_>>()?;
    Ok(Some(parts.join(ID_SEPARATOR)))
}
