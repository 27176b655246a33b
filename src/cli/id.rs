// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! `tabflow id` - print the fingerprint of a pipeline under a context

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::cli::load_context;
use crate::pipeline::{pipeline_id, Pipeline};

/// Print the fingerprint, or note that the pipeline is empty.
pub fn run(pipeline_path: PathBuf, context_path: Option<PathBuf>, verbose: bool) -> Result<()> {
    let pipeline = Pipeline::from_file(&pipeline_path)?;
    let context = load_context(context_path.as_deref())?;

    match pipeline_id(&pipeline, &context)? {
        Some(id) => {
            if verbose {
                println!("{}: {}", "Pipeline".bold(), pipeline_path.display());
            }
            println!("{}", id);
        }
        None => println!("{}", "(empty pipeline, no fingerprint)".dimmed()),
    }

    Ok(())
}
