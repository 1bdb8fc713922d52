use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

// @module: Ordered record of per-page artifact paths driving assembly

/// Per-page artifact triple
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    /// 1-based page index
    pub index: usize,

    /// Rasterized page image
    pub image_path: PathBuf,

    /// Narration audio asset
    pub audio_path: PathBuf,

    /// Rendered scene
    pub scene_path: PathBuf,
}

/// The single source of truth for what the assembler consumes.
///
/// Built incrementally as pages complete (single-writer, index-keyed) and
/// fully materialized before the assembler runs: exactly one entry per page,
/// in page order, with no gaps.
#[derive(Debug)]
pub struct Manifest {
    /// Entries keyed by page index, iteration order is page order
    entries: BTreeMap<usize, ManifestEntry>,

    /// Resolved path of the concatenation list
    pub concat_list_path: PathBuf,

    /// Resolved path of the final output artifact
    pub output_path: PathBuf,
}

impl Manifest {
    /// Create an empty manifest with the resolved assembly paths
    pub fn new(concat_list_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            concat_list_path,
            output_path,
        }
    }

    /// Record a completed page.
    ///
    /// Re-recording an index replaces the previous entry; a retried page is
    /// fully rewritten, never patched.
    pub fn record(&mut self, entry: ManifestEntry) {
        self.entries.insert(entry.index, entry);
    }

    /// Entries in ascending page order
    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.values()
    }

    /// Number of recorded pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pages have been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify the manifest covers exactly pages `1..=expected` with no gaps
    pub fn verify_complete(&self, expected: usize) -> Result<()> {
        if self.entries.len() != expected {
            return Err(anyhow!(
                "Manifest has {} entrie(s), expected {}",
                self.entries.len(),
                expected
            ));
        }

        for (position, index) in self.entries.keys().enumerate() {
            if *index != position + 1 {
                return Err(anyhow!(
                    "Manifest has a gap: expected page {}, found page {}",
                    position + 1,
                    index
                ));
            }
        }

        Ok(())
    }
}
