//! The offline derivative generation pipeline.
//!
//! Walks a source directory, discovers images, and produces every
//! derivative the runtime resolver can construct a name for — one file per
//! (tier × density × format) combination, named through
//! [`crate::naming::derivative_path`] and written next to its source.
//!
//! ## Per-source output
//!
//! | Source | Derivatives | Formats |
//! |--------|-------------|---------|
//! | `.jpg` / `.jpeg` / `.png` | 16 | original + WebP |
//! | `.webp` | 8 | WebP only (the "original" and WebP names coincide) |
//! | `.gif` | 8 | identity copies, no transcoding |
//!
//! Non-GIF sources are resized to fit inside the tier's target width
//! (doubled for high density) and never upscaled. GIFs are copied as-is:
//! resizing animated GIFs is out of scope, but the copies keep the naming
//! contract complete so the resolver never constructs a missing name.
//!
//! ## Failure policy
//!
//! Any single image failing aborts the whole run with a non-zero exit. A
//! partial derivative set is worse than no run at all — the runtime cannot
//! distinguish "not yet generated" from "will never exist", and would serve
//! broken images silently.
//!
//! ## Re-runs
//!
//! Derivative sets recorded in the build manifest (see [`crate::manifest`])
//! are skipped when the source content, quality, and output files are all
//! unchanged; everything else is regenerated in place. Either way a re-run
//! over an unchanged tree yields a byte-for-byte identical derivative set.
//!
//! ## Parallelism
//!
//! Sources are processed in parallel via [rayon](https://docs.rs/rayon);
//! per-file progress events go out over an mpsc channel for the CLI to
//! print.

use crate::breakpoints::{Density, Tier};
use crate::imaging::{
    BackendError, CopyParams, Dimensions, ImageBackend, Quality, ResizeParams, RustBackend,
    fit_width,
};
use crate::manifest::{self, BuildManifest, SourceEntry};
use crate::naming::{self, DerivativeFormat};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Source extensions the generator will pick up (matched case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Image processing failed for {path}: {source}")]
    Imaging {
        path: String,
        #[source]
        source: BackendError,
    },
}

/// Configuration for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Lossy encode quality, applied uniformly.
    pub quality: Quality,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
        }
    }
}

/// A discovered source image, identified by its path relative to the
/// source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Path relative to the source root, extension included.
    pub rel: String,
    /// `rel` without its extension.
    pub base: String,
    /// Extension without the dot, case preserved.
    pub ext: String,
}

/// Per-file progress, sent while the run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateEvent {
    Processed { source: String, derivatives: usize },
    Skipped { source: String },
}

/// Final counts for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerateSummary {
    pub sources: usize,
    pub derivatives: usize,
    pub skipped: usize,
}

impl fmt::Display for GenerateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} source(s), {} derivative(s) written, {} unchanged",
            self.sources, self.derivatives, self.skipped
        )
    }
}

/// One planned derivative: a relative output path plus the operation that
/// produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivativeJob {
    pub output: String,
    pub op: JobOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOp {
    Copy,
    Resize { width: u32, height: u32 },
}

/// Discover source images under `root`: supported extensions only,
/// excluding files that already carry a tier suffix (the generator's own
/// output from earlier runs). Deterministic order.
pub fn discover_sources(root: &Path) -> Result<Vec<SourceImage>, GenerateError> {
    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = entry.path().strip_prefix(root).ok().and_then(Path::to_str) else {
            continue;
        };
        let Some(source) = naming::split_source(path) else {
            continue;
        };
        if !SUPPORTED_EXTENSIONS
            .iter()
            .any(|s| source.ext.eq_ignore_ascii_case(s))
        {
            continue;
        }
        let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if naming::is_derivative_stem(stem) {
            continue;
        }
        sources.push(SourceImage {
            rel: path.to_string(),
            base: source.base.to_string(),
            ext: source.ext.to_string(),
        });
    }
    Ok(sources)
}

/// Plan identity-copy derivatives: one copy per tier and density (GIF
/// sources, which are exempt from transcoding).
pub fn plan_copy_derivatives(base: &str, ext: &str) -> Vec<DerivativeJob> {
    let mut jobs = Vec::new();
    for tier in Tier::ALL {
        for density in Density::ALL {
            jobs.push(DerivativeJob {
                output: naming::derivative_path(
                    base,
                    ext,
                    tier,
                    density,
                    DerivativeFormat::Original,
                ),
                op: JobOp::Copy,
            });
        }
    }
    jobs
}

/// Plan resize derivatives for a source of known dimensions.
///
/// Each tier/density pair fits the source inside the tier's target width
/// (doubled for high density) without enlargement. WebP sources get one
/// output per pair — their original-format and WebP names coincide — while
/// everything else gets both formats.
pub fn plan_resize_derivatives(base: &str, ext: &str, dims: Dimensions) -> Vec<DerivativeJob> {
    let formats: &[DerivativeFormat] = if ext.eq_ignore_ascii_case(naming::WEBP_EXT) {
        &[DerivativeFormat::WebP]
    } else {
        &[DerivativeFormat::Original, DerivativeFormat::WebP]
    };

    let mut jobs = Vec::new();
    for tier in Tier::ALL {
        for density in Density::ALL {
            let target = fit_width(dims, tier.target_width() * density.scale());
            for &format in formats {
                jobs.push(DerivativeJob {
                    output: naming::derivative_path(base, ext, tier, density, format),
                    op: JobOp::Resize {
                        width: target.width,
                        height: target.height,
                    },
                });
            }
        }
    }
    jobs
}

/// The derivative file names a source will produce. Names depend only on
/// the extension, so no image inspection is needed — this is what `check`
/// uses to verify a tree without touching pixels.
pub fn planned_derivative_names(base: &str, ext: &str) -> Vec<String> {
    if ext.eq_ignore_ascii_case("gif") {
        return plan_copy_derivatives(base, ext)
            .into_iter()
            .map(|j| j.output)
            .collect();
    }
    let formats: &[DerivativeFormat] = if ext.eq_ignore_ascii_case(naming::WEBP_EXT) {
        &[DerivativeFormat::WebP]
    } else {
        &[DerivativeFormat::Original, DerivativeFormat::WebP]
    };
    let mut names = Vec::new();
    for tier in Tier::ALL {
        for density in Density::ALL {
            for &format in formats {
                names.push(naming::derivative_path(base, ext, tier, density, format));
            }
        }
    }
    names
}

/// How many derivative files a source of the given extension yields.
pub fn planned_derivative_count(ext: &str) -> usize {
    if ext.eq_ignore_ascii_case("gif") || ext.eq_ignore_ascii_case(naming::WEBP_EXT) {
        Tier::ALL.len() * Density::ALL.len()
    } else {
        Tier::ALL.len() * Density::ALL.len() * 2
    }
}

/// Run the pipeline over `root` with the production backend.
pub fn generate(
    root: &Path,
    config: &GenerateConfig,
    force: bool,
    progress: Option<Sender<GenerateEvent>>,
) -> Result<GenerateSummary, GenerateError> {
    let backend = RustBackend::new();
    generate_with_backend(&backend, root, config, force, progress)
}

/// Run the pipeline using a specific backend (allows testing with a mock).
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &GenerateConfig,
    force: bool,
    progress: Option<Sender<GenerateEvent>>,
) -> Result<GenerateSummary, GenerateError> {
    let sources = discover_sources(root)?;
    let previous = if force {
        BuildManifest::empty()
    } else {
        BuildManifest::load(root)
    };

    let results: Vec<(String, SourceEntry, bool)> = sources
        .par_iter()
        .map_with(progress, |tx, source| {
            let (entry, skipped) = process_source(backend, root, source, config, &previous)?;
            if let Some(tx) = tx {
                let event = if skipped {
                    GenerateEvent::Skipped {
                        source: source.rel.clone(),
                    }
                } else {
                    GenerateEvent::Processed {
                        source: source.rel.clone(),
                        derivatives: entry.derivatives.len(),
                    }
                };
                let _ = tx.send(event);
            }
            Ok((source.rel.clone(), entry, skipped))
        })
        .collect::<Result<_, GenerateError>>()?;

    let mut summary = GenerateSummary {
        sources: results.len(),
        ..Default::default()
    };
    let mut updated = BuildManifest::empty();
    for (rel, entry, skipped) in results {
        if skipped {
            summary.skipped += 1;
        } else {
            summary.derivatives += entry.derivatives.len();
        }
        updated.insert(rel, entry);
    }
    updated.save(root)?;

    Ok(summary)
}

/// Produce (or skip) the full derivative set for one source. Returns the
/// manifest entry and whether the source was skipped as already current.
fn process_source(
    backend: &impl ImageBackend,
    root: &Path,
    source: &SourceImage,
    config: &GenerateConfig,
    previous: &BuildManifest,
) -> Result<(SourceEntry, bool), GenerateError> {
    let source_path = root.join(&source.rel);
    let source_hash = manifest::hash_file(&source_path)?;

    if previous.is_current(&source.rel, &source_hash, config.quality.value(), root) {
        if let Some(entry) = previous.entries.get(&source.rel) {
            return Ok((entry.clone(), true));
        }
    }

    let jobs = if source.ext.eq_ignore_ascii_case("gif") {
        plan_copy_derivatives(&source.base, &source.ext)
    } else {
        let dims = backend
            .identify(&source_path)
            .map_err(|e| imaging_error(&source.rel, e))?;
        plan_resize_derivatives(&source.base, &source.ext, dims)
    };

    for job in &jobs {
        run_job(backend, &source_path, root, source, config, job)?;
    }

    let entry = SourceEntry {
        source_hash,
        quality: config.quality.value(),
        derivatives: jobs.into_iter().map(|j| j.output).collect(),
    };
    Ok((entry, false))
}

fn run_job(
    backend: &impl ImageBackend,
    source_path: &Path,
    root: &Path,
    source: &SourceImage,
    config: &GenerateConfig,
    job: &DerivativeJob,
) -> Result<(), GenerateError> {
    let output: PathBuf = root.join(&job.output);
    let result = match job.op {
        JobOp::Copy => backend.copy(&CopyParams {
            source: source_path.to_path_buf(),
            output,
        }),
        JobOp::Resize { width, height } => backend.resize(&ResizeParams {
            source: source_path.to_path_buf(),
            output,
            width,
            height,
            quality: config.quality,
        }),
    };
    result.map_err(|e| imaging_error(&source.rel, e))
}

fn imaging_error(path: &str, source: BackendError) -> GenerateError {
    GenerateError::Imaging {
        path: path.to_string(),
        source,
    }
}
