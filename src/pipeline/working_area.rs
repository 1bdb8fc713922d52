use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

// @module: Working area layout and lifecycle

/// Directory tree holding all intermediate stage outputs for a run.
///
/// The orchestrator exclusively owns creation and cleanup of this tree; the
/// stages only ever write inside the subdirectory assigned to them, at paths
/// keyed by page index, so concurrent page workers never collide.
#[derive(Debug, Clone)]
pub struct WorkingArea {
    /// Root of the tree
    root: PathBuf,
}

impl WorkingArea {
    /// Create a working area rooted at the given directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Subdirectory for rasterized page images
    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    /// Subdirectory for narration audio assets
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    /// Subdirectory for rendered scenes
    pub fn scenes_dir(&self) -> PathBuf {
        self.root.join("scenes")
    }

    /// Path of the concatenation list file
    pub fn concat_list_path(&self) -> PathBuf {
        self.root.join("concat_list.txt")
    }

    /// Deterministic audio path for a page index
    pub fn audio_path(&self, index: usize) -> PathBuf {
        self.audio_dir().join(format!("page-{:03}.mp3", index))
    }

    /// Deterministic scene path for a page index
    pub fn scene_path(&self, index: usize) -> PathBuf {
        self.scenes_dir().join(format!("page-{:03}.mp4", index))
    }

    /// Prepare the tree for a run, wiping it first when `clean` is requested
    pub fn prepare(&self, clean: bool) -> Result<()> {
        if clean {
            debug!("Clean requested, removing working area {:?}", self.root);
            FileManager::remove_dir_all(&self.root)?;
        }

        FileManager::ensure_dir(&self.root)?;
        FileManager::ensure_dir(self.pages_dir())?;
        FileManager::ensure_dir(self.audio_dir())?;
        FileManager::ensure_dir(self.scenes_dir())?;

        Ok(())
    }

    /// Whether any page images from a previous run are present
    pub fn has_cached_pages(&self) -> bool {
        FileManager::collect_page_images(self.pages_dir())
            .map(|images| !images.is_empty())
            .unwrap_or(false)
    }
}
