// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML exporter CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gdml_export::cli::Reporter;
use gdml_export::config::WorldSizing;
use gdml_export::gdml::check_references;
use gdml_export::{export_file, ExportConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gdml-export")]
#[command(about = "Export parametric solid scenes to GDML detector geometry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a JSON scene to a GDML file
    Export {
        /// Input scene file
        scene: PathBuf,

        /// Output GDML file
        #[arg(short, long)]
        output: PathBuf,

        /// Configuration file (defaults to gdml-export.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the world sizing (computed, fixed)
        #[arg(long)]
        world: Option<WorldSizing>,
    },

    /// Check that a GDML file never references a name before defining it
    Check {
        /// GDML file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            scene,
            output,
            config,
            world,
        } => export_command(&scene, &output, config.as_deref(), world, cli.verbose),
        Commands::Check { file } => check_command(&file, cli.verbose),
        Commands::Version => {
            println!("gdml-export v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn export_command(
    scene: &Path,
    output: &Path,
    config_path: Option<&Path>,
    world: Option<WorldSizing>,
    verbose: bool,
) -> Result<()> {
    if !scene.exists() {
        Reporter::report_error(&format!("Scene file not found: {}", scene.display()));
        std::process::exit(1);
    }

    let mut config = match config_path {
        Some(path) => ExportConfig::from_file(path)?.with_env_overrides()?,
        None => ExportConfig::load()?,
    };
    if let Some(sizing) = world {
        config.world.sizing = sizing;
    }

    if verbose {
        Reporter::report_info(&format!("Exporting: {}", scene.display()));
        Reporter::report_info(&format!("Default material: {}", config.default_material));
    }

    let start = std::time::Instant::now();
    let report = match export_file(scene, output, config) {
        Ok(report) => report,
        Err(err) => {
            Reporter::report_error(&format!("{:#}", err));
            std::process::exit(1);
        }
    };
    let duration = start.elapsed();

    if verbose {
        Reporter::report_export(
            &scene.display().to_string(),
            &output.display().to_string(),
            &report,
            duration,
        );
    } else {
        for warning in &report.warnings {
            Reporter::report_warning(warning);
        }
        Reporter::success(&format!(
            "Exported {} -> {}",
            scene.display(),
            output.display()
        ));
    }

    Ok(())
}

fn check_command(file: &Path, verbose: bool) -> Result<()> {
    let xml = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read GDML file: {}", file.display()))?;
    let report = check_references(&xml)
        .with_context(|| format!("Failed to parse GDML file: {}", file.display()))?;

    if verbose || !report.is_ordered() {
        if !Reporter::report_check(&file.display().to_string(), &report) {
            std::process::exit(1);
        }
    } else {
        Reporter::success(&format!("{}: references are in order", file.display()));
    }
    Ok(())
}
