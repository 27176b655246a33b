// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Pipeline construction, normalization, and composition
//!
//! The trim-to-source invariant: once a newer data source appears, everything
//! before it is stale history and is structurally removed. Trimming is a pure
//! function applied after every composing operation, never an in-place
//! mutation, so pipelines stay freely shareable values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeBounds;
use std::path::Path;

use crate::errors::{TabflowError, TabflowResult};
use crate::pipe::{as_pipe, Pipe, PipeInput};
use crate::table::FlatTable;

/// An ordered, immutable sequence of pipes with an optional explicit
/// identity override.
///
/// The empty pipeline (zero pipes) is the distinguished "absent" value; it is
/// a valid pipeline that computes nothing and has no fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PipelineDoc", into = "PipelineDoc")]
pub struct Pipeline {
    pipes: Vec<Pipe>,
    id: Option<String>,
}

/// On-disk/document shape of a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PipelineDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    pipes: Vec<Pipe>,
}

impl From<PipelineDoc> for Pipeline {
    fn from(doc: PipelineDoc) -> Self {
        let mut pipeline = Self::new(doc.pipes);
        pipeline.id = doc.id;
        pipeline
    }
}

impl From<Pipeline> for PipelineDoc {
    fn from(pipeline: Pipeline) -> Self {
        Self {
            id: pipeline.id,
            pipes: pipeline.pipes,
        }
    }
}

impl Pipeline {
    /// Build a pipeline from a pipe sequence, applying trim-to-source.
    pub fn new(pipes: impl IntoIterator<Item = Pipe>) -> Self {
        Self {
            pipes: trim_to_source(pipes.into_iter().collect()),
            id: None,
        }
    }

    /// The empty (absent) pipeline.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a pipeline from labeled, arbitrary inputs.
    ///
    /// Each item is coerced via [`as_pipe`]; absent items are dropped, and
    /// anything uncoercible fails immediately with `UnsupportedPipeInput`.
    pub fn from_inputs<I, S>(items: I) -> TabflowResult<Self>
    where
        I: IntoIterator<Item = (Option<S>, PipeInput)>,
        S: AsRef<str>,
    {
        let mut pipes = Vec::new();
        for (label, input) in items {
            if let Some(pipe) = as_pipe(input, label.as_ref().map(|l| l.as_ref()))? {
                pipes.push(pipe);
            }
        }
        Ok(Self::new(pipes))
    }

    /// Set an explicit identity override, used verbatim by fingerprinting.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The explicit identity override, if any.
    pub fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The pipes, in order.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Number of pipes.
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// Whether this is the absent pipeline.
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Append other pipelines onto this one, re-applying trim-to-source.
    ///
    /// Returns a new pipeline; neither input is mutated. The receiver's
    /// explicit id is retained; appended pipelines' ids are discarded, since
    /// the concatenation is a different computation than what they named.
    pub fn concat(&self, others: impl IntoIterator<Item = Self>) -> Self {
        let mut pipes = self.pipes.clone();
        for other in others {
            pipes.extend(other.pipes);
        }
        Self {
            pipes: trim_to_source(pipes),
            id: self.id.clone(),
        }
    }

    /// Extract a sub-sequence, re-applying trim-to-source.
    ///
    /// A slice may start mid-sequence and must re-derive its own most recent
    /// source boundary. The explicit id does not survive slicing.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        use std::ops::Bound;

        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&n) => n + 1,
            Bound::Excluded(&n) => n,
            Bound::Unbounded => self.pipes.len(),
        };
        let end = end.min(self.pipes.len());
        let start = start.min(end);

        Self::new(self.pipes[start..end].to_vec())
    }

    /// Grouping/split variables of every pipe, flattened one level, in
    /// sequence order.
    pub fn split_vars(&self) -> Vec<String> {
        self.pipes
            .iter()
            .flat_map(|p| p.split_vars().iter().cloned())
            .collect()
    }

    /// Multi-line description, one formatted stage per line, in order.
    pub fn format(&self) -> String {
        self.pipes
            .iter()
            .map(Pipe::format)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Load a pipeline document from a YAML file.
    pub fn from_file(path: &Path) -> TabflowResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TabflowError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a pipeline document from a YAML string.
    pub fn from_yaml(yaml: &str) -> TabflowResult<Self> {
        let pipeline: Self = serde_yaml::from_str(yaml)?;
        for pipe in &pipeline.pipes {
            pipe.validate()?;
        }
        Ok(pipeline)
    }

    /// Serialize the pipeline document to YAML.
    pub fn to_yaml(&self) -> TabflowResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl From<Pipe> for Pipeline {
    fn from(pipe: Pipe) -> Self {
        Self::new([pipe])
    }
}

impl TryFrom<FlatTable> for Pipeline {
    type Error = TabflowError;

    fn try_from(table: FlatTable) -> TabflowResult<Self> {
        Self::from_inputs([(None::<&str>, PipeInput::Table(table))])
    }
}

/// Drop everything before the last source pipe.
///
/// Pure: takes the sequence by value, returns the normalized sequence.
fn trim_to_source(pipes: Vec<Pipe>) -> Vec<Pipe> {
    match pipes.iter().rposition(Pipe::is_source) {
        Some(last_source) if last_source > 0 => pipes[last_source..].to_vec(),
        _ => pipes,
    }
}
