/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use deckcast::file_utils::{DocumentKind, FileManager};
use std::path::Path;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_with_existing_file_should_return_true() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file =
        common::create_test_file(&temp_dir.path().to_path_buf(), "probe.tmp", "content")?;

    assert!(FileManager::file_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_with_missing_file_should_return_false() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_with_missing_dir_should_create_it() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a/b/c");

    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}

/// Test that remove_dir_all tolerates a missing directory
#[test]
fn test_remove_dir_all_with_missing_dir_should_succeed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    FileManager::remove_dir_all(temp_dir.path().join("never_created"))?;
    Ok(())
}

/// Test that page images sort by parsed ordinal, not lexically
#[test]
fn test_collect_page_images_should_sort_numerically() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    // Lexical order would put page-10 before page-2
    common::create_test_file(&dir, "page-10.png", "x")?;
    common::create_test_file(&dir, "page-2.png", "x")?;
    common::create_test_file(&dir, "page-1.png", "x")?;
    common::create_test_file(&dir, "notes.txt", "x")?;

    let images = FileManager::collect_page_images(&dir)?;
    let names: Vec<String> = images
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["page-1.png", "page-2.png", "page-10.png"]);
    Ok(())
}

/// Test that raw rasterizer output never counts as a finished page image
#[test]
fn test_collect_page_images_should_ignore_raster_outputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "raster-1.png", "x")?;
    common::create_test_file(&dir, "raster-2.png", "x")?;
    common::create_test_file(&dir, "page-001.png", "x")?;

    let images = FileManager::collect_page_images(&dir)?;
    assert_eq!(images.len(), 1);
    assert!(images[0].ends_with("page-001.png"));
    Ok(())
}

/// Test that the raster collector picks up only rasterizer output, in
/// numeric order
#[test]
fn test_collect_raster_outputs_should_sort_numerically_and_skip_pages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "raster-10.png", "x")?;
    common::create_test_file(&dir, "raster-2.png", "x")?;
    common::create_test_file(&dir, "raster-1.png", "x")?;
    common::create_test_file(&dir, "page-001.png", "x")?;

    let outputs = FileManager::collect_raster_outputs(&dir)?;
    let names: Vec<String> = outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["raster-1.png", "raster-2.png", "raster-10.png"]);
    Ok(())
}

/// Test that non-matching files are ignored by the collector
#[test]
fn test_collect_page_images_with_no_matches_should_return_empty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "readme.md", "x")?;

    let images = FileManager::collect_page_images(&dir)?;
    assert!(images.is_empty());
    Ok(())
}

/// Test document kind detection by extension
#[test]
fn test_detect_document_kind_should_classify_by_extension() {
    assert_eq!(
        FileManager::detect_document_kind(Path::new("report.pdf")),
        DocumentKind::Paginated
    );
    assert_eq!(
        FileManager::detect_document_kind(Path::new("deck.pptx")),
        DocumentKind::Deck
    );
    assert_eq!(
        FileManager::detect_document_kind(Path::new("slides.ODP")),
        DocumentKind::Deck
    );
    assert_eq!(
        FileManager::detect_document_kind(Path::new("notes.txt")),
        DocumentKind::Unknown
    );
    assert_eq!(
        FileManager::detect_document_kind(Path::new("no_extension")),
        DocumentKind::Unknown
    );
}

/// Test that write_to_file creates parent directories
#[test]
fn test_write_to_file_should_create_parent_dirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("deep/nested/file.txt");

    FileManager::write_to_file(&target, "hello")?;

    assert_eq!(FileManager::read_to_string(&target)?, "hello");
    Ok(())
}
