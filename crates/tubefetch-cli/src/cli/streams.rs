//! Loads a manifest file and turns it into stream descriptors.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tubefetch_core::manifest::{
    apply_descrambler, apply_signature, is_signed, Manifest, ADAPTIVE_FORMATS,
    PROGRESSIVE_FORMATS,
};
use tubefetch_core::stream::build_streams;
use tubefetch_core::{SignatureSolver, StreamList, StreamObservers};

/// Format families the CLI understands, progressive first.
const FAMILIES: [&str; 2] = [PROGRESSIVE_FORMATS, ADAPTIVE_FORMATS];

/// Descrambles every known family present in the manifest, resolves
/// signatures when a solver is given, and builds the stream list.
pub fn load_streams(
    path: &Path,
    solver: Option<&dyn SignatureSolver>,
    observers: &Arc<StreamObservers>,
) -> Result<StreamList> {
    let mut manifest = Manifest::from_path(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;

    let present: Vec<&str> = FAMILIES
        .into_iter()
        .filter(|key| manifest.formats.contains_key(*key))
        .collect();
    if present.is_empty() {
        anyhow::bail!(
            "manifest {} has neither {} nor {}",
            path.display(),
            PROGRESSIVE_FORMATS,
            ADAPTIVE_FORMATS
        );
    }

    for key in &present {
        manifest = apply_descrambler(&manifest, key)?;
        match solver {
            Some(solver) => {
                let js = manifest
                    .js
                    .clone()
                    .context("manifest has no player script to resolve signatures with")?;
                manifest = apply_signature(&manifest, key, &js, solver)?;
            }
            None => {
                let unsigned = manifest
                    .entries(key)?
                    .iter()
                    .filter(|e| e.get("s").is_some() && !e.get("url").is_some_and(is_signed))
                    .count();
                if unsigned > 0 {
                    tracing::warn!(
                        family = key,
                        unsigned,
                        "streams need signature resolution; pass --solver to resolve them"
                    );
                }
            }
        }
    }

    Ok(build_streams(&manifest, &present, observers)?)
}
