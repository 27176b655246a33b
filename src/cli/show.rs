// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! `tabflow show` - print the formatted stages of a pipeline

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::pipeline::Pipeline;

/// Print the pipeline stages, one per line, in sequence order.
pub fn run(pipeline_path: PathBuf, verbose: bool) -> Result<()> {
    let pipeline = Pipeline::from_file(&pipeline_path)?;

    println!("{}: {}", "Pipeline".bold(), pipeline_path.display());
    if let Some(id) = pipeline.explicit_id() {
        println!("{}: {}", "Explicit id".bold(), id);
    }
    println!(
        "{} stage{}:",
        pipeline.len(),
        if pipeline.len() == 1 { "" } else { "s" }
    );
    println!();

    if pipeline.is_empty() {
        println!("  {}", "(empty pipeline)".dimmed());
        return Ok(());
    }

    for (i, pipe) in pipeline.pipes().iter().enumerate() {
        println!("  {}. {}", i + 1, pipe.format());
    }

    if verbose {
        let split = pipeline.split_vars();
        if !split.is_empty() {
            println!();
            println!("{}: {}", "Split variables".bold(), split.join(", "));
        }
    }

    Ok(())
}
