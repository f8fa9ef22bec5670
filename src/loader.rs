//! The visibility-driven loading state machine.
//!
//! Each image placeholder advances through four states:
//!
//! ```text
//! unprepared ──prepare──> prepared ──visibility / fallback──> loading ──load event──> loaded
//! ```
//!
//! The [`Loader`] owns no placeholders — the page does. It observes events
//! (visibility changes, load completions, viewport resizes) and advances the
//! state of the placeholder each event names. Events for different
//! placeholders may arrive in any order; every transition depends only on
//! the placeholder it touches, so there are no cross-placeholder invariants
//! to maintain.
//!
//! The loading strategy is chosen once at [`Loader::init`]: when
//! viewport-intersection observation is available each prepared placeholder
//! is registered for visibility tracking, otherwise everything loads
//! immediately (degraded mode for runtimes without the observation API).
//! A placeholder is unregistered the moment it leaves `prepared`, so it
//! transitions into `loading` exactly once.
//!
//! Resize events re-resolve only placeholders that have already reached
//! `loaded` — a placeholder that hasn't committed to a source yet will pick
//! up the current viewport when it does.

use crate::breakpoints::ViewportContext;
use crate::capability::Capabilities;
use crate::resolve::{self, SIZES_HINT};

/// Lifecycle state of an image placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unprepared,
    Prepared,
    Loading,
    Loaded,
}

/// A DOM-bound image slot whose real source is deferred.
///
/// Mirrors the placeholder markup contract: an eager `src` and/or a deferred
/// source attribute before preparation; deferred candidate-set and sizing
/// attributes after; a live `src` only once loading begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Active source attribute. Empty until the placeholder starts loading.
    src: Option<String>,
    /// Active candidate-set attribute, assigned together with `src`.
    srcset: Option<String>,
    /// Deferred source reference (the `data-src` analog).
    deferred_src: Option<String>,
    /// Deferred candidate set, built at preparation.
    deferred_srcset: Option<String>,
    /// Sizing hint, assigned at preparation.
    sizes: Option<String>,
    /// Retained base reference. Survives the post-load attribute cleanup so
    /// resize re-adaptation can still reconstruct derivative names.
    source_ref: Option<String>,
    state: LoadState,
    /// Registered for visibility tracking.
    observed: bool,
    /// Visual affordance flags (the loading/loaded indicator classes).
    loading_indicator: bool,
    loaded_indicator: bool,
}

impl Placeholder {
    /// A placeholder with a deferred source reference.
    pub fn deferred(src: impl Into<String>) -> Self {
        Self {
            src: None,
            srcset: None,
            deferred_src: Some(src.into()),
            deferred_srcset: None,
            sizes: None,
            source_ref: None,
            state: LoadState::Unprepared,
            observed: false,
            loading_indicator: false,
            loaded_indicator: false,
        }
    }

    /// A placeholder with only an eager source attribute.
    pub fn eager(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            deferred_src: None,
            ..Self::deferred("")
        }
    }

    /// A placeholder with no source reference at all.
    pub fn empty() -> Self {
        Self {
            deferred_src: None,
            ..Self::deferred("")
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn srcset(&self) -> Option<&str> {
        self.srcset.as_deref()
    }

    pub fn deferred_src(&self) -> Option<&str> {
        self.deferred_src.as_deref()
    }

    pub fn deferred_srcset(&self) -> Option<&str> {
        self.deferred_srcset.as_deref()
    }

    pub fn sizes(&self) -> Option<&str> {
        self.sizes.as_deref()
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    pub fn has_loading_indicator(&self) -> bool {
        self.loading_indicator
    }

    pub fn has_loaded_indicator(&self) -> bool {
        self.loaded_indicator
    }
}

/// Registration options for visibility tracking.
///
/// A small pre-emptive margin starts the fetch slightly before the
/// placeholder scrolls into view, and a low intersection threshold triggers
/// as soon as a sliver is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Extra margin below the viewport, in CSS pixels.
    pub margin_px: u32,
    /// Fraction of the placeholder that must intersect to trigger.
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            margin_px: 50,
            threshold: 0.1,
        }
    }
}

/// Advances placeholder state in response to runtime events.
///
/// Capabilities are probed by the embedder once and fixed for the loader's
/// lifetime; the loader's lifetime is the page's lifetime.
#[derive(Debug, Clone)]
pub struct Loader {
    caps: Capabilities,
}

impl Loader {
    pub fn new(caps: Capabilities) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Options the embedder should register visibility tracking with.
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions::default()
    }

    /// Prepare every placeholder carrying a deferred source reference, then
    /// either register it for visibility tracking or — when observation is
    /// unavailable — load it immediately.
    pub fn init(&self, placeholders: &mut [Placeholder], viewport: &ViewportContext) {
        for p in placeholders.iter_mut() {
            if p.deferred_src.is_none() {
                continue;
            }
            self.prepare(p);
            if p.state != LoadState::Prepared {
                continue;
            }
            if self.caps.visibility_observer {
                p.observed = true;
            } else {
                self.begin_load(p, viewport);
            }
        }
    }

    /// Annotate a placeholder with its full candidate set and sizing hint,
    /// and strip any eager source so nothing fetches until triggered.
    ///
    /// A placeholder with no usable source reference is skipped silently.
    pub fn prepare(&self, p: &mut Placeholder) {
        if p.state != LoadState::Unprepared {
            return;
        }
        let Some(base) = p.src.clone().or_else(|| p.deferred_src.clone()) else {
            return;
        };
        let Some(candidates) = resolve::candidate_set(&base) else {
            return;
        };
        p.deferred_src = Some(base.clone());
        p.source_ref = Some(base);
        p.deferred_srcset = Some(resolve::format_srcset(&candidates));
        p.sizes = Some(SIZES_HINT.to_string());
        p.src = None;
        p.state = LoadState::Prepared;
    }

    /// Handle a visibility notification for a placeholder.
    ///
    /// Only an intersecting notification for a placeholder still in
    /// `prepared` triggers a load; the placeholder is unregistered from
    /// observation in the same step, so it transitions exactly once.
    pub fn on_intersection(
        &self,
        p: &mut Placeholder,
        intersecting: bool,
        viewport: &ViewportContext,
    ) {
        if !intersecting || p.state != LoadState::Prepared {
            return;
        }
        self.begin_load(p, viewport);
    }

    /// Handle a load-completion event.
    ///
    /// Clears the deferred-source bookkeeping and flips the visual
    /// affordance from loading to loaded. Idempotent: repeated completions
    /// for an already-loaded placeholder are no-ops.
    pub fn on_load_complete(&self, p: &mut Placeholder) {
        if p.state != LoadState::Loading {
            return;
        }
        p.state = LoadState::Loaded;
        p.loading_indicator = false;
        p.loaded_indicator = true;
        p.deferred_src = None;
        p.deferred_srcset = None;
    }

    /// Re-adapt loaded placeholders to a changed viewport (rotation, window
    /// resize). Placeholders still `prepared` or `loading` are untouched —
    /// they haven't committed to a source yet.
    pub fn on_resize(&self, placeholders: &mut [Placeholder], viewport: &ViewportContext) {
        for p in placeholders.iter_mut() {
            if p.state != LoadState::Loaded {
                continue;
            }
            let Some(base) = p.source_ref.as_deref() else {
                continue;
            };
            let Some(best) = resolve::resolve_best(base, viewport, &self.caps) else {
                continue;
            };
            if p.src.as_deref() != Some(best.as_str()) {
                p.src = Some(best);
            }
        }
    }

    /// Commit a prepared placeholder to one resolved source.
    fn begin_load(&self, p: &mut Placeholder, viewport: &ViewportContext) {
        let Some(base) = p.source_ref.as_deref() else {
            return;
        };
        let Some(best) = resolve::resolve_best(base, viewport, &self.caps) else {
            return;
        };
        p.src = Some(best);
        p.srcset = p.deferred_srcset.clone();
        p.state = LoadState::Loading;
        p.loading_indicator = true;
        p.observed = false;
    }
}
