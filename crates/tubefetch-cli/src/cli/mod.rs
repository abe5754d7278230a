//! CLI for tubefetch: inspect a metadata manifest and download its streams.

mod commands;
mod solver;
mod streams;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tubefetch_core::config;
use tubefetch_core::SignatureSolver;

use commands::{run_download, run_list, DownloadArgs};
use solver::CommandSolver;

/// Top-level CLI for tubefetch.
#[derive(Debug, Parser)]
#[command(name = "tubefetch")]
#[command(about = "tubefetch: decode video manifests and download their streams", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the streams described by a manifest.
    List {
        /// Path to the metadata manifest (JSON).
        manifest: PathBuf,

        /// External program that turns a scrambled token into a signature.
        #[arg(long, value_name = "PROGRAM")]
        solver: Option<PathBuf>,
    },

    /// Download one stream from a manifest.
    Download {
        /// Path to the metadata manifest (JSON).
        manifest: PathBuf,

        /// Format code of the stream to download.
        #[arg(long)]
        itag: u32,

        /// Output directory (default: config `output_dir`, then the current directory).
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Base filename without extension (default: sanitized title).
        #[arg(long)]
        filename: Option<String>,

        /// String prepended to the filename.
        #[arg(long)]
        prefix: Option<String>,

        /// Always download, even if a file of the remote size exists.
        #[arg(long)]
        no_skip_existing: bool,

        /// External program that turns a scrambled token into a signature.
        #[arg(long, value_name = "PROGRAM")]
        solver: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::List { manifest, solver } => {
                let solver = solver.map(CommandSolver::new);
                run_list(&manifest, solver.as_ref().map(|s| s as &dyn SignatureSolver))?;
            }
            CliCommand::Download {
                manifest,
                itag,
                output,
                filename,
                prefix,
                no_skip_existing,
                solver,
            } => {
                let solver = solver.map(CommandSolver::new);
                let args = DownloadArgs {
                    itag,
                    output,
                    filename,
                    prefix,
                    no_skip_existing,
                };
                run_download(
                    &manifest,
                    &args,
                    solver.as_ref().map(|s| s as &dyn SignatureSolver),
                    &cfg,
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
