//! Runtime derivative resolution: candidate sets and single-best selection.
//!
//! Two consumers with different needs share this module:
//!
//! - [`candidate_set`] builds the full list of derivative options for a
//!   placeholder, letting the runtime's native responsive-image negotiation
//!   refine the final pick from a source set.
//! - [`resolve_best`] collapses viewport context and format capability into
//!   exactly one derivative path, for the moment a placeholder actually
//!   commits to loading.
//!
//! Both construct names exclusively through [`crate::naming`], so every path
//! produced here is one the generator has written.

use crate::breakpoints::{Density, Tier, ViewportContext};
use crate::capability::Capabilities;
use crate::naming::{self, DerivativeFormat};

/// Sizing hint attached to every prepared placeholder.
///
/// A deliberately blunt policy: every tier renders at full viewport width.
/// The per-tier media conditions exist so the hint stays valid if per-tier
/// sizing is ever differentiated.
pub const SIZES_HINT: &str =
    "(max-width: 480px) 100vw, (max-width: 768px) 100vw, (max-width: 1024px) 100vw, 100vw";

/// One entry of a candidate set: a derivative path and its intrinsic width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: String,
    /// Intrinsic pixel width: the tier's target width, doubled for
    /// high-density entries.
    pub width: u32,
}

/// Build the full candidate set for a source reference: all four tiers at
/// both densities, in the source's own format (8 entries).
///
/// Standard-density entries come first, then the high-density ones, each
/// group in ascending tier order. Returns `None` when the source reference
/// has no usable extension.
pub fn candidate_set(src: &str) -> Option<Vec<Candidate>> {
    let source = naming::split_source(src)?;
    let mut candidates = Vec::with_capacity(Tier::ALL.len() * Density::ALL.len());
    for density in Density::ALL {
        for tier in Tier::ALL {
            candidates.push(Candidate {
                path: naming::derivative_path(
                    source.base,
                    source.ext,
                    tier,
                    density,
                    DerivativeFormat::Original,
                ),
                width: tier.target_width() * density.scale(),
            });
        }
    }
    Some(candidates)
}

/// Serialize a candidate set into source-set attribute syntax:
/// `path 480w, path 768w, ...`.
pub fn format_srcset(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("{} {}w", c.path, c.width))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pick the output format for a request: WebP when the runtime supports it,
/// otherwise the source's own format.
///
/// GIF sources are pinned to their original format regardless of WebP
/// support — the generator copies GIFs without transcoding, so no WebP
/// derivative exists for them.
pub fn request_format(source_ext: &str, caps: &Capabilities) -> DerivativeFormat {
    if caps.webp && !source_ext.eq_ignore_ascii_case("gif") {
        DerivativeFormat::WebP
    } else {
        DerivativeFormat::Original
    }
}

/// Resolve the single best derivative for a source under the given viewport
/// and capabilities.
///
/// Tier comes from the viewport width; a pixel ratio of 2+ selects the
/// high-density variant outright. Returns `None` when the source reference
/// has no usable extension.
pub fn resolve_best(src: &str, viewport: &ViewportContext, caps: &Capabilities) -> Option<String> {
    let source = naming::split_source(src)?;
    Some(naming::derivative_path(
        source.base,
        source.ext,
        viewport.tier(),
        viewport.density(),
        request_format(source.ext, caps),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_set_has_eight_entries_in_order() {
        let candidates = candidate_set("assets/hero.jpg").unwrap();
        let entries: Vec<(&str, u32)> = candidates
            .iter()
            .map(|c| (c.path.as_str(), c.width))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("assets/hero-mobile.jpg", 480),
                ("assets/hero-tablet.jpg", 768),
                ("assets/hero-desktop.jpg", 1024),
                ("assets/hero-wide.jpg", 1440),
                ("assets/hero-mobile@2x.jpg", 960),
                ("assets/hero-tablet@2x.jpg", 1536),
                ("assets/hero-desktop@2x.jpg", 2048),
                ("assets/hero-wide@2x.jpg", 2880),
            ]
        );
    }

    #[test]
    fn candidate_set_rejects_extensionless_source() {
        assert_eq!(candidate_set("assets/hero"), None);
    }

    #[test]
    fn srcset_syntax() {
        let candidates = vec![
            Candidate {
                path: "a-mobile.jpg".into(),
                width: 480,
            },
            Candidate {
                path: "a-tablet.jpg".into(),
                width: 768,
            },
        ];
        assert_eq!(format_srcset(&candidates), "a-mobile.jpg 480w, a-tablet.jpg 768w");
    }

    #[test]
    fn narrow_viewport_webp_supported() {
        let resolved = resolve_best(
            "assets/hero.jpg",
            &ViewportContext::new(400, 1.0),
            &Capabilities::assume(true, true),
        );
        assert_eq!(resolved.as_deref(), Some("assets/hero-mobile.webp"));
    }

    #[test]
    fn wide_high_density_webp_unsupported() {
        let resolved = resolve_best(
            "assets/hero.jpg",
            &ViewportContext::new(1600, 2.0),
            &Capabilities::assume(false, true),
        );
        assert_eq!(resolved.as_deref(), Some("assets/hero-wide@2x.jpg"));
    }

    #[test]
    fn gif_never_resolves_to_webp() {
        let resolved = resolve_best(
            "assets/loader.gif",
            &ViewportContext::new(400, 1.0),
            &Capabilities::assume(true, true),
        );
        assert_eq!(resolved.as_deref(), Some("assets/loader-mobile.gif"));
    }

    #[test]
    fn webp_source_resolves_to_webp_either_way() {
        for webp in [true, false] {
            let resolved = resolve_best(
                "assets/banner.webp",
                &ViewportContext::new(900, 1.0),
                &Capabilities::assume(webp, true),
            );
            assert_eq!(resolved.as_deref(), Some("assets/banner-desktop.webp"));
        }
    }

    #[test]
    fn resolve_rejects_extensionless_source() {
        assert_eq!(
            resolve_best(
                "assets/hero",
                &ViewportContext::new(400, 1.0),
                &Capabilities::assume(true, true),
            ),
            None
        );
    }
}
