// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Pipe definitions and coercion
//!
//! A pipe is one stage of a pipeline: a data source, a grouping operator, or
//! a transform. Pipes are immutable once constructed; changing parameters
//! means building a new pipe.

mod sort;

pub use sort::{NullPolicy, SortDirection, SortOptions, SortTransform};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{TabflowError, TabflowResult};
use crate::table::FlatTable;

/// The three pipe categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeKind {
    /// Introduces a concrete dataset
    Source,
    /// Partitions the current dataset
    GroupBy,
    /// Reshapes or reorders the current dataset
    Transform,
}

impl fmt::Display for PipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::GroupBy => write!(f, "group_by"),
            Self::Transform => write!(f, "transform"),
        }
    }
}

/// One stage in a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pipe {
    /// A labeled dataset
    Source {
        /// Display label for the dataset
        name: String,
        /// The data itself
        table: FlatTable,
    },

    /// Partition by one or more variables
    GroupBy {
        /// Grouping variables (context-resolved when mapped, otherwise
        /// taken as column names)
        vars: Vec<String>,
    },

    /// Sort by one or more context variables
    Sort(SortTransform),
}

impl Pipe {
    /// Create a source pipe from a labeled table.
    pub fn source(name: impl Into<String>, table: FlatTable) -> Self {
        Self::Source {
            name: name.into(),
            table,
        }
    }

    /// Create a grouping pipe; an empty variable list is malformed.
    pub fn group_by<S: Into<String>>(vars: impl IntoIterator<Item = S>) -> TabflowResult<Self> {
        let vars: Vec<String> = vars.into_iter().map(Into::into).collect();
        if vars.is_empty() {
            return Err(TabflowError::malformed("group_by", "no grouping variables given"));
        }
        Ok(Self::GroupBy { vars })
    }

    /// Create a sort pipe over the given variables.
    pub fn sort<S: Into<String>>(
        vars: impl IntoIterator<Item = S>,
        options: SortOptions,
    ) -> TabflowResult<Self> {
        Ok(Self::Sort(SortTransform::new(vars, options)?))
    }

    /// The pipe's category.
    pub fn kind(&self) -> PipeKind {
        match self {
            Self::Source { .. } => PipeKind::Source,
            Self::GroupBy { .. } => PipeKind::GroupBy,
            Self::Sort(_) => PipeKind::Transform,
        }
    }

    /// Whether this pipe introduces a dataset.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source { .. })
    }

    /// One-line human-readable stage label.
    pub fn format(&self) -> String {
        match self {
            Self::Source { name, table } => format!("source: {} ({})", name, table),
            Self::GroupBy { vars } => format!("group_by: {}", vars.join(", ")),
            Self::Sort(sort) => sort.to_string(),
        }
    }

    /// Grouping/split variables declared by this pipe.
    pub fn split_vars(&self) -> &[String] {
        match self {
            Self::GroupBy { vars } => vars,
            _ => &[],
        }
    }

    /// Check parameter contracts on a deserialized pipe.
    pub fn validate(&self) -> TabflowResult<()> {
        match self {
            Self::Source { .. } => Ok(()),
            Self::GroupBy { vars } => {
                if vars.is_empty() {
                    Err(TabflowError::malformed("group_by", "no grouping variables given"))
                } else {
                    Ok(())
                }
            }
            Self::Sort(sort) => sort.validate(),
        }
    }
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// An arbitrary input being coerced into a pipe.
#[derive(Debug, Clone)]
pub enum PipeInput {
    /// Already a pipe
    Pipe(Pipe),
    /// A bare table, to be wrapped as a source
    Table(FlatTable),
    /// An untyped value (e.g. parsed from a document)
    Value(serde_yaml::Value),
    /// A no-op placeholder, dropped during composition
    Absent,
}

impl From<Pipe> for PipeInput {
    fn from(p: Pipe) -> Self {
        Self::Pipe(p)
    }
}

impl From<FlatTable> for PipeInput {
    fn from(t: FlatTable) -> Self {
        Self::Table(t)
    }
}

/// Coerce a labeled input into a canonical pipe.
///
/// - A pipe passes through unchanged.
/// - A table becomes a source tagged with `label`, or with an opaque
///   content-derived label when none is supplied.
/// - An untyped value is interpreted as a pipe or a table if it parses as
///   one; `null` is treated as absent.
/// - Absent inputs coerce to `None`: they are dropped, not an error.
///
/// Anything else fails with [`TabflowError::UnsupportedPipeInput`].
pub fn as_pipe(input: PipeInput, label: Option<&str>) -> TabflowResult<Option<Pipe>> {
    match input {
        PipeInput::Pipe(pipe) => {
            pipe.validate()?;
            Ok(Some(pipe))
        }
        PipeInput::Table(table) => Ok(Some(source_from_table(table, label))),
        PipeInput::Absent => Ok(None),
        PipeInput::Value(value) => {
            if value.is_null() {
                return Ok(None);
            }
            if let Ok(pipe) = serde_yaml::from_value::<Pipe>(value.clone()) {
                pipe.validate()?;
                return Ok(Some(pipe));
            }
            if let Ok(table) = serde_yaml::from_value::<FlatTable>(value.clone()) {
                return Ok(Some(source_from_table(table, label)));
            }
            Err(TabflowError::UnsupportedPipeInput {
                detail: describe_value(&value),
            })
        }
    }
}

/// Wrap a table as a source, synthesizing an opaque label when none is given.
///
/// The fallback label is derived from the table contents, so it is stable for
/// identical data and purely a display string.
fn source_from_table(table: FlatTable, label: Option<&str>) -> Pipe {
    let name = match label {
        Some(label) => label.to_string(),
        None => {
            let json = serde_json::to_string(&table).unwrap_or_default();
            format!("table-{}", &blake3::hash(json.as_bytes()).to_hex()[..8])
        }
    };
    Pipe::source(name, table)
}

fn describe_value(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Bool(_) => "a boolean".to_string(),
        serde_yaml::Value::Number(n) => format!("the number {}", n),
        serde_yaml::Value::String(s) => format!("the string '{}'", s),
        serde_yaml::Value::Sequence(_) => "a sequence".to_string(),
        serde_yaml::Value::Mapping(_) => "a mapping with unrecognized shape".to_string(),
        _ => "an unrecognized value".to_string(),
    }
}
