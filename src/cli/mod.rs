// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! CLI command definitions and handlers
//!
//! A thin surface over the library: inspect a pipeline document, print its
//! fingerprint, or evaluate it against a context. The library never depends
//! on anything in this module.

pub mod id;
pub mod run;
pub mod show;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::compute::ComputeContext;
use crate::errors::{TabflowError, TabflowResult};

/// Tabular pipeline engine
///
/// Compose, fingerprint, and evaluate chained tabular-data transformations.
#[derive(Parser, Debug)]
#[clap(
    name = "tabflow",
    version,
    about = "Pipeline composition and dispatch engine for tabular data",
    long_about = None,
    after_help = "Examples:\n\
        tabflow show pipeline.yaml               Print the pipeline stages\n\
        tabflow id pipeline.yaml -c ctx.yaml     Print the pipeline fingerprint\n\
        tabflow run pipeline.yaml -c ctx.yaml    Evaluate and print the result\n\n\
        See 'tabflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the formatted stages of a pipeline
    Show {
        /// Pipeline file
        pipeline: PathBuf,
    },

    /// Print the fingerprint of a pipeline under a context
    Id {
        /// Pipeline file
        pipeline: PathBuf,

        /// Context file (variable mapping and constants)
        #[clap(short, long)]
        context: Option<PathBuf>,
    },

    /// Evaluate a pipeline and print the resulting dataset
    Run {
        /// Pipeline file
        pipeline: PathBuf,

        /// Context file (variable mapping and constants)
        #[clap(short, long)]
        context: Option<PathBuf>,

        /// Output format (yaml or json)
        #[clap(short, long, default_value = "yaml")]
        format: OutputFormat,
    },
}

/// Output format for evaluated datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Load a context file, or the empty context when none is given.
pub(crate) fn load_context(path: Option<&Path>) -> TabflowResult<ComputeContext> {
    let Some(path) = path else {
        return Ok(ComputeContext::default());
    };
    let content = std::fs::read_to_string(path).map_err(|e| TabflowError::FileReadError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(serde_yaml::from_str(&content)?)
}
