// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Facade flattening CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use facade_flatten::cli::{run_flatten_with, FlattenJob, Reporter};
use facade_flatten::{io, FaceOutcome, FlattenConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "facade-flatten")]
#[command(about = "Snap a photogrammetry mesh onto the faces of a building mesh", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten a photogrammetry OBJ onto a building scene
    Flatten {
        /// Scene JSON with the building mesh and world transforms
        #[arg(short, long)]
        scene: PathBuf,

        /// Photogrammetry OBJ file
        #[arg(short, long)]
        mesh: PathBuf,

        /// Output OBJ file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to ./flatten.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write a JSON run report next to the output
        #[arg(long)]
        report: bool,
    },

    /// Print vertex, face and material counts of an OBJ file
    Inspect {
        /// OBJ file
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Flatten {
            scene,
            mesh,
            output,
            config,
            report,
        } => flatten_command(scene, mesh, output, config, report, cli.verbose),
        Commands::Inspect { input } => inspect_command(input),
        Commands::Version => {
            println!("facade-flatten v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(err) = outcome {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn flatten_command(
    scene: PathBuf,
    mesh: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    report: bool,
    verbose: bool,
) -> Result<()> {
    let config = FlattenConfig::resolve(config_path.as_deref())?;

    let job = FlattenJob {
        scene,
        mesh,
        output,
        report,
    };

    if verbose {
        Reporter::report_info(&format!(
            "Flattening {} (z margin {})",
            job.mesh.display(),
            config.z_margin
        ));
    }

    let progress = if verbose {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} faces {msg}")?,
        );
        Some(pb)
    } else {
        None
    };

    let result = run_flatten_with(&job, &config, |outcome| {
        if let Some(pb) = &progress {
            if let FaceOutcome::Claimed { vertices, .. } = outcome {
                pb.set_message(format!("(last claim: {} vertices)", vertices));
            }
            pb.inc(1);
        }
    });

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    let report = result?;
    Reporter::report_run(&job.mesh, &report);
    Reporter::success(&format!("Wrote {}", report.output.display()));
    Ok(())
}

fn inspect_command(input: PathBuf) -> Result<()> {
    let document = io::import_obj_file(&input)?;
    Reporter::report_inspect(&input, &document);
    Ok(())
}
