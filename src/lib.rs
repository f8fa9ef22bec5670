//! # Respix
//!
//! A responsive image toolkit in two halves that must never disagree:
//!
//! 1. An **offline derivative generator** — a batch pipeline that walks a
//!    directory of source images and produces every resized/transcoded
//!    variant a page could ever ask for.
//! 2. A **runtime resolver/loader** — the logic that, given a viewport and
//!    the runtime's format capabilities, picks exactly one of those variants
//!    per image and drives a lazy-loading state machine around it.
//!
//! The two halves communicate through nothing but file names. For a source
//! `assets/hero.jpg` the generator writes
//!
//! ```text
//! assets/hero-mobile.jpg        assets/hero-mobile.webp
//! assets/hero-mobile@2x.jpg     assets/hero-mobile@2x.webp
//! assets/hero-tablet.jpg        ...
//! assets/hero-desktop@2x.webp
//! assets/hero-wide@2x.webp
//! ```
//!
//! and the resolver reconstructs one of those names from the viewport width,
//! the device pixel ratio, and WebP support. A single character of drift
//! between the two sides is a silent 404, so the name construction lives in
//! exactly one place — [`naming::derivative_path`] — and both halves import
//! it. That shared function is the core design decision of this crate.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`breakpoints`] | Static tier table (mobile/tablet/desktop/wide), density rule, viewport context |
//! | [`naming`] | The shared derivative naming scheme: build and parse `{base}-{tier}[@2x].{ext}` |
//! | [`capability`] | Runtime feature probing (WebP encode, visibility observation) with graceful degradation |
//! | [`resolve`] | Candidate-set construction and single-best-source resolution |
//! | [`loader`] | Placeholder state machine: prepare → observe → load → re-adapt on resize |
//! | [`generate`] | The offline pipeline: discover sources, plan derivatives, execute via a backend |
//! | [`imaging`] | Pure-Rust image operations behind a swappable backend trait |
//! | [`manifest`] | Build metadata: content-hash skip of already-generated derivative sets |
//! | [`config`] | `respix.toml` loading, validation, and stock-config generation |
//!
//! # Design Decisions
//!
//! ## One Naming Function
//!
//! The generator and the resolver are independently evolving — one runs in a
//! build step, the other at page lifetime. Both call
//! [`naming::derivative_path`] and the generator's discovery filter uses the
//! matching parser, so the naming contract is enforced by the type system
//! rather than by convention.
//!
//! ## Explicit Context, No Ambient State
//!
//! Viewport width, pixel ratio, and capability flags are not read from the
//! environment inside the resolution logic. They arrive as
//! [`breakpoints::ViewportContext`] and [`capability::Capabilities`] values,
//! sampled by the embedder at decision time. Every resolution decision is a
//! pure function and unit-testable without a rendering surface.
//!
//! ## Capabilities Probed Once
//!
//! Format support cannot change mid-session, so [`capability::Capabilities`]
//! is computed once at loader construction. A probe that fails reports
//! "unsupported" — degraded operation is an expected condition, never an
//! error. The loader likewise picks its loading strategy (visibility-driven
//! vs. load-everything-now) once at init.
//!
//! ## Pure-Rust Imaging
//!
//! The pipeline decodes and encodes through the `image` crate only: no
//! ImageMagick, no libvips, no system dependencies. The binary is fully
//! self-contained. The [`imaging::ImageBackend`] trait keeps the pipeline
//! logic backend-agnostic so tests run against a recording mock instead of
//! encoding pixels.

pub mod breakpoints;
pub mod capability;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod loader;
pub mod manifest;
pub mod naming;
pub mod resolve;
