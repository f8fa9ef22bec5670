//! Runtime capability detection with graceful degradation.
//!
//! The loader depends on two features of its host runtime: WebP encode
//! support (the canvas-encode probe used to pick the WebP derivative over
//! the original format) and viewport-intersection observation (lazy loading
//! vs. load-everything-immediately).
//!
//! Neither capability can change mid-session, so probing happens exactly
//! once — the resulting [`Capabilities`] value is cached for the loader's
//! lifetime. A probe that fails because the underlying API doesn't exist is
//! an expected condition, not an error: it maps to "unsupported" and the
//! degraded code path.

use thiserror::Error;

/// A probe failed because the underlying runtime API is unavailable.
///
/// Callers never see this type: [`Capabilities::detect`] absorbs it into a
/// `false` capability flag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("capability probe unavailable: {0}")]
pub struct ProbeError(pub String);

/// The runtime surface the loader probes at construction.
///
/// Implemented by the embedding environment (a browser binding, a headless
/// test harness). Each probe may fail when the API it relies on is missing;
/// failures are treated as lack of support.
pub trait CapabilityProbe {
    /// Can the runtime encode WebP (e.g. via an offscreen canvas encode)?
    fn webp_encode(&self) -> Result<bool, ProbeError>;

    /// Is viewport-intersection observation available?
    fn visibility_observer(&self) -> Result<bool, ProbeError>;
}

/// Capability flags, probed once and held for the page's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub webp: bool,
    pub visibility_observer: bool,
}

impl Capabilities {
    /// Run all probes. Probe failure means unsupported — never an error.
    pub fn detect(probe: &impl CapabilityProbe) -> Self {
        Self {
            webp: probe.webp_encode().unwrap_or(false),
            visibility_observer: probe.visibility_observer().unwrap_or(false),
        }
    }

    /// Construct fixed capabilities directly, bypassing probing.
    pub fn assume(webp: bool, visibility_observer: bool) -> Self {
        Self {
            webp,
            visibility_observer,
        }
    }
}
