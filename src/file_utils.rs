use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Finished page image filename regex (deterministic page-NNN names)
static CACHED_PAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^page-(\d+)\.png$").unwrap()
});

// @const: Rasterizer output filename regex (raster prefix, 1-based ordinal)
static RASTER_OUTPUT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^raster-(\d+)\.png$").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Remove a directory tree if it exists
    pub fn remove_dir_all<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write raw bytes to a file, creating the parent directory if needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(&normalized_ext[1..]) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Collect finished page images in a directory, ordered by page number.
    ///
    /// Only the deterministic `page-NNN.png` names count. Raw rasterizer
    /// output is renamed into this form as the last step of a successful
    /// rasterization, so leftovers from an interrupted run never pass as a
    /// complete page cache.
    pub fn collect_page_images<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        Self::collect_numbered_images(dir, &CACHED_PAGE_REGEX)
    }

    /// Collect raw rasterizer output images, ordered by page number.
    ///
    /// The rasterizer names its output `raster-<ordinal>.png` with a 1-based
    /// ordinal that may or may not be zero-padded, so filenames are sorted by
    /// the parsed ordinal rather than lexically.
    pub fn collect_raster_outputs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        Self::collect_numbered_images(dir, &RASTER_OUTPUT_REGEX)
    }

    fn collect_numbered_images<P: AsRef<Path>>(dir: P, pattern: &Regex) -> Result<Vec<PathBuf>> {
        let mut numbered: Vec<(usize, PathBuf)> = Vec::new();

        for entry in fs::read_dir(dir.as_ref())
            .with_context(|| format!("Failed to read directory: {:?}", dir.as_ref()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
            if let Some(caps) = pattern.captures(&name) {
                if let Ok(ordinal) = caps[1].parse::<usize>() {
                    numbered.push((ordinal, path));
                }
            }
        }

        numbered.sort_by_key(|(ordinal, _)| *ordinal);
        Ok(numbered.into_iter().map(|(_, path)| path).collect())
    }

    /// Detect the input document kind from its file extension
    pub fn detect_document_kind<P: AsRef<Path>>(path: P) -> DocumentKind {
        let path = path.as_ref();

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            if ext_str == "pdf" {
                return DocumentKind::Paginated;
            }

            // Deck formats understood by the external converter
            let deck_extensions = ["pptx", "ppt", "odp", "key"];
            if deck_extensions.contains(&ext_str.as_str()) {
                return DocumentKind::Deck;
            }
        }

        DocumentKind::Unknown
    }
}

/// Enum representing the kinds of input documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Natively paginated document, directly rasterizable (PDF)
    Paginated,
    /// Slide deck requiring conversion before rasterization
    Deck,
    /// Unsupported input format
    Unknown,
}
