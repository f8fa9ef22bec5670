//! The shared derivative naming scheme.
//!
//! Derivative files are named `{base}-{tier}[@2x].{ext}`, where `ext` is
//! either the source's own extension or `webp`:
//!
//! ```text
//! assets/hero.jpg → assets/hero-mobile.jpg
//!                   assets/hero-mobile@2x.webp
//!                   assets/hero-wide.webp
//!                   ...
//! ```
//!
//! This module is the single source of truth for that format. The offline
//! generator calls [`derivative_path`] to decide what to write; the runtime
//! resolver calls the same function to decide what to request. Neither side
//! carries its own string formatting, so the two cannot drift — drift here
//! would surface as silent 404s at page load, the one failure mode the whole
//! crate is built to prevent.
//!
//! The inverse, [`parse_derivative`], recovers the tier and density from a
//! generated name. The generator's discovery filter uses it to avoid
//! re-processing its own output as new sources.

use crate::breakpoints::{Density, Tier};

/// Extension used for transcoded derivatives.
pub const WEBP_EXT: &str = "webp";

/// Output format of a derivative: the source's own format, or WebP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivativeFormat {
    Original,
    WebP,
}

impl DerivativeFormat {
    /// Resolve to a concrete extension given the source extension.
    pub fn extension<'a>(self, source_ext: &'a str) -> &'a str {
        match self {
            DerivativeFormat::Original => source_ext,
            DerivativeFormat::WebP => WEBP_EXT,
        }
    }
}

/// Build the derivative path for a source split into `base` + `ext`.
///
/// `base` is the source path without its extension (`assets/hero`); `ext` is
/// the extension without the dot (`jpg`). The extension is used byte-for-byte
/// — no case normalization — so a name constructed from a source reference
/// always matches the file the generator wrote for that same reference.
pub fn derivative_path(
    base: &str,
    ext: &str,
    tier: Tier,
    density: Density,
    format: DerivativeFormat,
) -> String {
    format!(
        "{base}-{}{}.{}",
        tier.suffix(),
        density.suffix(),
        format.extension(ext)
    )
}

/// A source reference split into base path and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef<'a> {
    /// Path without the extension (`assets/hero`).
    pub base: &'a str,
    /// Extension without the dot (`jpg`), case preserved.
    pub ext: &'a str,
}

/// Split a source path at its final extension.
///
/// Returns `None` when there is no usable extension: no dot, an empty base
/// or extension, or a dot that belongs to a directory component.
pub fn split_source(src: &str) -> Option<SourceRef<'_>> {
    let dot = src.rfind('.')?;
    let (base, ext) = (&src[..dot], &src[dot + 1..]);
    if base.is_empty() || ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(SourceRef { base, ext })
}

/// A derivative path decomposed back into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDerivative<'a> {
    pub base: &'a str,
    pub tier: Tier,
    pub density: Density,
    pub ext: &'a str,
}

/// Parse a derivative path produced by [`derivative_path`].
///
/// Returns `None` for paths that don't carry a tier suffix — i.e. ordinary
/// source files.
pub fn parse_derivative(path: &str) -> Option<ParsedDerivative<'_>> {
    let SourceRef { base: stem, ext } = split_source(path)?;
    let (base, tier, density) = parse_derivative_stem(stem)?;
    Some(ParsedDerivative {
        base,
        tier,
        density,
        ext,
    })
}

/// Parse a filename stem (no extension) ending in `-{tier}` or `-{tier}@2x`.
pub fn parse_derivative_stem(stem: &str) -> Option<(&str, Tier, Density)> {
    let (stem, density) = match stem.strip_suffix("@2x") {
        Some(rest) => (rest, Density::High),
        None => (stem, Density::Standard),
    };
    let dash = stem.rfind('-')?;
    let tier = Tier::from_suffix(&stem[dash + 1..])?;
    Some((&stem[..dash], tier, density))
}

/// Whether a filename stem already carries a tier suffix.
///
/// The generator writes derivatives next to their sources, so a later run
/// would otherwise rediscover them as new sources and generate derivatives
/// of derivatives.
pub fn is_derivative_stem(stem: &str) -> bool {
    parse_derivative_stem(stem).is_some()
}
