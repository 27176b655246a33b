// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! `tabflow run` - evaluate a pipeline and print the resulting dataset

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::cli::{load_context, OutputFormat};
use crate::errors::TabflowError;
use crate::pipeline::Pipeline;

/// Evaluate the pipeline against the context and print the output dataset.
pub fn run(
    pipeline_path: PathBuf,
    context_path: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let pipeline = Pipeline::from_file(&pipeline_path)?;
    let context = load_context(context_path.as_deref())?;

    if verbose {
        eprintln!("{}:", "Pipeline".bold());
        for (i, pipe) in pipeline.pipes().iter().enumerate() {
            eprintln!("  {}. {}", i + 1, pipe.format());
        }
        eprintln!();
    }

    let Some(dataset) = pipeline.evaluate(&context)? else {
        eprintln!("{}", "(empty pipeline, nothing to compute)".dimmed());
        return Ok(());
    };

    if verbose {
        eprintln!(
            "{}: {} ({} rows)",
            "Result".bold(),
            dataset.shape(),
            dataset.row_count()
        );
    }

    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&dataset).map_err(TabflowError::from)?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&dataset).map_err(TabflowError::from)?
        }
    };
    println!("{}", rendered);

    Ok(())
}
