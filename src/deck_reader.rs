/*!
 * In-process slide deck reader.
 *
 * Used by the degraded composition fallback when the external deck converter
 * is unavailable: a pptx file is a zip archive of per-slide XML documents,
 * which is enough to recover the page count and the narration text without
 * any external tool.
 */

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// @const: Slide part name regex, captures the 1-based slide number
static SLIDE_PART_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap()
});

/// Read the per-slide narration texts of a deck, in slide order.
///
/// Each entry joins all text runs of one slide with single spaces; a slide
/// without any text yields an empty string (the narration stage substitutes
/// its default utterance downstream).
pub fn read_slide_texts(deck_path: &Path) -> Result<Vec<String>> {
    let file = File::open(deck_path)
        .with_context(|| format!("Failed to open deck: {:?}", deck_path))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("Deck is not a readable archive: {:?}", deck_path))?;

    // Slide parts are not stored in any guaranteed order inside the archive
    let mut slide_names: Vec<(usize, String)> = Vec::new();
    for name in archive.file_names() {
        if let Some(caps) = SLIDE_PART_REGEX.captures(name) {
            if let Ok(number) = caps[1].parse::<usize>() {
                slide_names.push((number, name.to_string()));
            }
        }
    }
    slide_names.sort_by_key(|(number, _)| *number);

    if slide_names.is_empty() {
        return Err(anyhow!("Deck contains no slides: {:?}", deck_path));
    }

    let mut texts = Vec::with_capacity(slide_names.len());
    for (number, name) in slide_names {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .with_context(|| format!("Failed to read slide {} of {:?}", number, deck_path))?
            .read_to_string(&mut xml)
            .with_context(|| format!("Slide {} of {:?} is not valid UTF-8", number, deck_path))?;

        texts.push(extract_slide_text(&xml)?);
    }

    Ok(texts)
}

/// Number of slides in a deck
pub fn count_slides(deck_path: &Path) -> Result<usize> {
    Ok(read_slide_texts(deck_path)?.len())
}

/// Collect the text runs of one slide XML document.
///
/// DrawingML stores visible text in `a:t` elements; everything else in the
/// slide part is layout and styling.
fn extract_slide_text(xml: &str) -> Result<String> {
    let document = roxmltree::Document::parse(xml).context("Failed to parse slide XML")?;

    let mut parts: Vec<String> = Vec::new();
    for node in document.descendants() {
        if node.tag_name().name() == "t" {
            if let Some(text) = node.text() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
        }
    }

    Ok(parts.join(" "))
}
