// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Error types for pipeline construction and evaluation
//!
//! Construction-time errors (unsupported inputs, malformed parameters) fail
//! fast; compute-time errors propagate to the caller uncaught. There are no
//! retries and no partial results: evaluation is a pure function of immutable
//! inputs, so a retry without changed inputs yields the same error.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for tabflow operations
pub type TabflowResult<T> = Result<T, TabflowError>;

/// Main error type for tabflow
#[derive(Error, Debug, Diagnostic)]
pub enum TabflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Construction Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Cannot interpret input as a pipe or tabular source: {detail}")]
    #[diagnostic(
        code(tabflow::unsupported_pipe_input),
        help("Pipeline items must be pipes, tables, or absent (null) placeholders")
    )]
    UnsupportedPipeInput { detail: String },

    #[error("Transform '{transform}' has malformed parameters: {reason}")]
    #[diagnostic(code(tabflow::malformed_parameters))]
    MalformedParameters { transform: String, reason: String },

    #[error("Column '{column}' has {actual} values, expected {expected}")]
    #[diagnostic(
        code(tabflow::column_length_mismatch),
        help("All columns of a table must have the same number of rows")
    )]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Compute Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Unresolved variable(s): {}", variables.join(", "))]
    #[diagnostic(
        code(tabflow::unresolved_variable),
        help("Add the missing variable(s) to the compute context mapping")
    )]
    UnresolvedVariable { variables: Vec<String> },

    #[error("Column '{column}' not found in the current data")]
    #[diagnostic(code(tabflow::unknown_column))]
    UnknownColumn { column: String },

    #[error("Pipeline has no data source and no seed data was supplied")]
    #[diagnostic(
        code(tabflow::no_data_source),
        help("Start the pipeline with a source pipe, or evaluate it with `evaluate_with`")
    )]
    NoDataSource,

    // ─────────────────────────────────────────────────────────────────────────
    // File/Format Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{}': {error}", path.display())]
    #[diagnostic(code(tabflow::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(tabflow::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(tabflow::json_error))]
    Json { message: String },
}

impl From<serde_yaml::Error> for TabflowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for TabflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            message: e.to_string(),
        }
    }
}

impl TabflowError {
    /// Create an unresolved-variable error from the full set of missing names
    pub fn unresolved(variables: Vec<String>) -> Self {
        Self::UnresolvedVariable { variables }
    }

    /// Create a malformed-parameters error for a named transform
    pub fn malformed(transform: &str, reason: impl Into<String>) -> Self {
        Self::MalformedParameters {
            transform: transform.to_string(),
            reason: reason.into(),
        }
    }
}
