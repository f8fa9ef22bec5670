//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | Lanczos3 via `image::imageops` |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` (quality from config) |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//! | **Encode → WebP** | `image::codecs::webp::WebPEncoder` (lossless) |
//! | **Copy** | `std::fs::copy` (GIF identity derivatives) |
//!
//! The module is split into:
//! - **Calculations**: pure dimension math (unit testable)
//! - **Parameters**: data structures describing operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_width;
pub use params::{CopyParams, Quality, ResizeParams};
pub use rust_backend::RustBackend;
