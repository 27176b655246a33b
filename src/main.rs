// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! tabflow - Tabular Pipeline Engine
//!
//! Compose, fingerprint, and evaluate chained tabular-data transformations.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tabflow::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Dispatch to command handlers
    match cli.command {
        Commands::Show { pipeline } => tabflow::cli::show::run(pipeline, cli.verbose),
        Commands::Id { pipeline, context } => {
            tabflow::cli::id::run(pipeline, context, cli.verbose)
        }
        Commands::Run {
            pipeline,
            context,
            format,
        } => tabflow::cli::run::run(pipeline, context, format, cli.verbose),
    }
}
