//! The static breakpoint policy: viewport tiers and the density rule.
//!
//! Four named tiers bucket viewport widths:
//!
//! | Tier | Viewport | Target width |
//! |------|----------|--------------|
//! | mobile  | ≤ 480px        | 480px  |
//! | tablet  | 481–768px      | 768px  |
//! | desktop | 769–1024px     | 1024px |
//! | wide    | > 1024px       | 1440px |
//!
//! The *target width* is the nominal pixel width the generator resizes to
//! for that tier (doubled for high-density variants). The table is static by
//! design: it is half of the naming contract between the generator and the
//! resolver, and making it configurable would let the two halves drift.
//!
//! Density is a two-value classification of the device pixel ratio: ratios
//! of 2 and above get the `@2x` variants.

use serde::{Deserialize, Serialize};

/// A named viewport-width bucket, ordered by ascending threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Mobile,
    Tablet,
    Desktop,
    Wide,
}

impl Tier {
    /// All tiers in ascending threshold order.
    pub const ALL: [Tier; 4] = [Tier::Mobile, Tier::Tablet, Tier::Desktop, Tier::Wide];

    /// The filename suffix for this tier (`hero-mobile.jpg`).
    pub fn suffix(self) -> &'static str {
        match self {
            Tier::Mobile => "mobile",
            Tier::Tablet => "tablet",
            Tier::Desktop => "desktop",
            Tier::Wide => "wide",
        }
    }

    /// Upper viewport-width bound for this tier. `None` for the catch-all.
    pub fn max_viewport_width(self) -> Option<u32> {
        match self {
            Tier::Mobile => Some(480),
            Tier::Tablet => Some(768),
            Tier::Desktop => Some(1024),
            Tier::Wide => None,
        }
    }

    /// Nominal pixel width the generator targets for this tier at standard
    /// density.
    pub fn target_width(self) -> u32 {
        match self {
            Tier::Mobile => 480,
            Tier::Tablet => 768,
            Tier::Desktop => 1024,
            Tier::Wide => 1440,
        }
    }

    /// Select the tier for a viewport width: the first tier whose threshold
    /// is ≥ the width, defaulting to the catch-all.
    pub fn for_viewport_width(width: u32) -> Tier {
        Tier::ALL
            .into_iter()
            .find(|t| t.max_viewport_width().is_none_or(|max| width <= max))
            .unwrap_or(Tier::Wide)
    }

    /// Inverse of [`Tier::suffix`], used by the derivative-name parser.
    pub fn from_suffix(s: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| t.suffix() == s)
    }
}

/// Display pixel-ratio class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Standard,
    High,
}

impl Density {
    pub const ALL: [Density; 2] = [Density::Standard, Density::High];

    /// The filename suffix for this density (empty or `@2x`).
    pub fn suffix(self) -> &'static str {
        match self {
            Density::Standard => "",
            Density::High => "@2x",
        }
    }

    /// Multiplier applied to a tier's target width.
    pub fn scale(self) -> u32 {
        match self {
            Density::Standard => 1,
            Density::High => 2,
        }
    }

    /// Classify a device pixel ratio. Ratios of 2 and above are high density.
    pub fn for_pixel_ratio(ratio: f64) -> Density {
        if ratio >= 2.0 {
            Density::High
        } else {
            Density::Standard
        }
    }
}

/// Ambient viewport state, sampled by the embedder at decision time.
///
/// Resolution logic never reads the environment itself; the current width
/// and pixel ratio are threaded through explicitly so every decision is a
/// pure function of its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportContext {
    /// Current viewport width in CSS pixels.
    pub width: u32,
    /// Device pixel ratio (1.0 on standard displays).
    pub pixel_ratio: f64,
}

impl ViewportContext {
    pub fn new(width: u32, pixel_ratio: f64) -> Self {
        Self { width, pixel_ratio }
    }

    /// Tier selected by the current width.
    pub fn tier(&self) -> Tier {
        Tier::for_viewport_width(self.width)
    }

    /// Density class of the current pixel ratio.
    pub fn density(&self) -> Density {
        Density::for_pixel_ratio(self.pixel_ratio)
    }
}
