//! Build metadata for incremental derivative generation.
//!
//! Encoding is the expensive part of a run, so the generator records what it
//! produced and skips sources whose derivative sets are already complete and
//! current. A skipped source leaves its derivatives byte-for-byte untouched,
//! which keeps re-runs idempotent by construction.
//!
//! ## Keys
//!
//! An entry is current when all of the following hold:
//!
//! 1. The SHA-256 of the source file's contents matches. Content-based
//!    rather than mtime-based so it survives `git checkout` (which resets
//!    modification times).
//! 2. The encode quality recorded for the entry matches the configured one.
//! 3. Every derivative file the entry lists still exists on disk.
//!
//! Anything else — new source, edited pixels, changed quality, a deleted
//! output — causes the full derivative set for that source to be
//! regenerated, overwriting whatever is there.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<source_root>/.respix-manifest.json`,
//! living alongside the images so it travels with the asset tree. A missing,
//! corrupt, or version-mismatched manifest degrades to an empty one: the
//! next run regenerates everything and writes a fresh manifest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Name of the build manifest file within the source root.
pub const MANIFEST_FILENAME: &str = ".respix-manifest.json";

/// Version of the manifest format. Bump to invalidate existing manifests
/// when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// Everything recorded about one source image's generated derivative set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// SHA-256 of the source file contents, hex-encoded.
    pub source_hash: String,
    /// Encode quality the derivatives were produced with.
    pub quality: u32,
    /// Derivative paths relative to the source root.
    pub derivatives: Vec<String>,
}

/// On-disk build manifest mapping source paths (relative to the source
/// root) to their derivative sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    pub version: u32,
    pub entries: BTreeMap<String, SourceEntry>,
}

impl BuildManifest {
    /// Create an empty manifest (used for `--force` or a first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the source root. Returns an empty manifest if the file
    /// doesn't exist or can't be used (version mismatch, corruption).
    pub fn load(source_root: &Path) -> Self {
        let path = source_root.join(MANIFEST_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest
    }

    /// Save to the source root.
    pub fn save(&self, source_root: &Path) -> io::Result<()> {
        let path = source_root.join(MANIFEST_FILENAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Whether a source's recorded derivative set is complete and current.
    pub fn is_current(
        &self,
        source: &str,
        source_hash: &str,
        quality: u32,
        source_root: &Path,
    ) -> bool {
        let Some(entry) = self.entries.get(source) else {
            return false;
        };
        entry.source_hash == source_hash
            && entry.quality == quality
            && !entry.derivatives.is_empty()
            && entry
                .derivatives
                .iter()
                .all(|d| source_root.join(d).exists())
    }

    pub fn insert(&mut self, source: String, entry: SourceEntry) {
        self.entries.insert(source, entry);
    }
}

/// SHA-256 of a file's contents, hex-encoded.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
