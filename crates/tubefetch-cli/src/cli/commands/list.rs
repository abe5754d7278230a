//! `tubefetch list <manifest>` – print the streams a manifest offers.

use anyhow::Result;
use std::path::Path;
use tubefetch_core::{SignatureSolver, StreamObservers};

use crate::cli::streams::load_streams;

pub fn run_list(manifest: &Path, solver: Option<&dyn SignatureSolver>) -> Result<()> {
    let streams = load_streams(manifest, solver, &StreamObservers::none())?;
    if streams.is_empty() {
        println!("No streams in manifest.");
        return Ok(());
    }
    if let Some(first) = streams.first() {
        println!("{}", first.title());
    }
    for stream in &streams {
        println!("  {stream}");
    }
    Ok(())
}
