//! End-to-end test of the generator/resolver contract.
//!
//! The crate's one structural promise: after a generation run, every path
//! the runtime resolver can construct for a processed source exists on
//! disk. Exercised here across the full grid of viewports, densities, and
//! capability combinations, for JPEG, WebP, and GIF sources.

use image::ImageEncoder;
use respix::breakpoints::ViewportContext;
use respix::capability::Capabilities;
use respix::generate::{self, GenerateConfig};
use respix::loader::{LoadState, Loader, Placeholder};
use respix::resolve;
use std::path::Path;
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Viewports spanning every tier boundary, at both density classes.
fn viewport_grid() -> Vec<ViewportContext> {
    let widths = [320, 480, 481, 768, 769, 1024, 1025, 1920, 3840];
    let ratios = [1.0, 1.5, 2.0, 3.0];
    let mut grid = Vec::new();
    for w in widths {
        for r in ratios {
            grid.push(ViewportContext::new(w, r));
        }
    }
    grid
}

fn generate_tree(root: &Path) {
    generate::generate(root, &GenerateConfig::default(), false, None).unwrap();
}

#[test]
fn every_resolvable_path_exists_after_generation() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("hero.jpg"), 1920, 1080);
    let gif_bytes = b"GIF89a fake animation".to_vec();
    std::fs::write(tmp.path().join("spinner.gif"), &gif_bytes).unwrap();
    generate_tree(tmp.path());

    let caps_grid = [
        Capabilities::assume(true, true),
        Capabilities::assume(true, false),
        Capabilities::assume(false, true),
        Capabilities::assume(false, false),
    ];

    for source in ["hero.jpg", "spinner.gif"] {
        for viewport in viewport_grid() {
            for caps in caps_grid {
                let path = resolve::resolve_best(source, &viewport, &caps)
                    .unwrap_or_else(|| panic!("{source} did not resolve"));
                assert!(
                    tmp.path().join(&path).exists(),
                    "resolved {path} for {source} at {}px/{}x does not exist",
                    viewport.width,
                    viewport.pixel_ratio
                );
            }
        }
    }
}

#[test]
fn every_candidate_set_entry_exists_after_generation() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("hero.jpg"), 1920, 1080);
    generate_tree(tmp.path());

    let candidates = resolve::candidate_set("hero.jpg").unwrap();
    assert_eq!(candidates.len(), 8);
    for c in &candidates {
        assert!(
            tmp.path().join(&c.path).exists(),
            "candidate {} does not exist",
            c.path
        );
    }
}

#[test]
fn loader_driven_session_only_requests_existing_files() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("hero.jpg"), 1920, 1080);
    std::fs::write(tmp.path().join("spinner.gif"), b"GIF89a").unwrap();
    generate_tree(tmp.path());

    let loader = Loader::new(Capabilities::assume(true, true));
    let mut placeholders = vec![
        Placeholder::deferred("hero.jpg"),
        Placeholder::deferred("spinner.gif"),
    ];
    let mobile = ViewportContext::new(400, 1.0);
    loader.init(&mut placeholders, &mobile);

    for p in placeholders.iter_mut() {
        loader.on_intersection(p, true, &mobile);
        assert_eq!(p.state(), LoadState::Loading);
        let src = p.src().unwrap();
        assert!(tmp.path().join(src).exists(), "{src} does not exist");
        loader.on_load_complete(p);
    }

    // Rotate to a wide 2x viewport: the re-adapted sources must exist too.
    loader.on_resize(&mut placeholders, &ViewportContext::new(1600, 2.0));
    for p in &placeholders {
        let src = p.src().unwrap();
        assert!(tmp.path().join(src).exists(), "{src} does not exist");
    }
}

#[test]
fn check_style_verification_passes_after_generation() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 640, 480);
    std::fs::write(tmp.path().join("b.gif"), b"GIF89a").unwrap();
    generate_tree(tmp.path());

    for source in generate::discover_sources(tmp.path()).unwrap() {
        for name in generate::planned_derivative_names(&source.base, &source.ext) {
            assert!(tmp.path().join(&name).exists(), "missing {name}");
        }
    }
}
