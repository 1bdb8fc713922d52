/*!
 * Tests for page sourcing: text splitting and image/text reconciliation
 */

use deckcast::app_config::TextMismatchPolicy;
use deckcast::errors::{AppError, PageExtractionError};
use deckcast::page_source::PageSource;
use std::path::PathBuf;

fn fake_images(count: usize) -> Vec<PathBuf> {
    (1..=count)
        .map(|i| PathBuf::from(format!("pages/page-{:03}.png", i)))
        .collect()
}

/// Test that matched counts pair one-to-one in order
#[test]
fn test_pair_pages_with_matching_counts_should_pair_in_order() {
    let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let pages = PageSource::pair_pages(fake_images(3), texts, TextMismatchPolicy::TruncatePad)
        .unwrap();

    assert_eq!(pages.len(), 3);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.index, i + 1);
    }
    assert_eq!(pages[1].narration_text, "two");
}

/// Test that fewer texts than images pads with empty placeholders
#[test]
fn test_pair_pages_with_fewer_texts_should_pad_with_empty() {
    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let pages = PageSource::pair_pages(fake_images(4), texts, TextMismatchPolicy::TruncatePad)
        .unwrap();

    assert_eq!(pages.len(), 4);
    assert_eq!(pages[3].index, 4);
    assert!(pages[3].narration_text.is_empty());
}

/// Test that more texts than images truncates the text list
#[test]
fn test_pair_pages_with_more_texts_should_truncate() {
    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let pages = PageSource::pair_pages(fake_images(2), texts, TextMismatchPolicy::TruncatePad)
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].narration_text, "b");
}

/// Test that the strict policy turns a mismatch into a fatal error
#[test]
fn test_pair_pages_with_strict_policy_should_fail_on_mismatch() {
    let texts = vec!["a".to_string()];
    let err = PageSource::pair_pages(fake_images(2), texts, TextMismatchPolicy::Fail).unwrap_err();

    let app_err: AppError = err.downcast::<PageExtractionError>().unwrap().into();
    assert!(matches!(
        app_err,
        AppError::PageExtraction(PageExtractionError::PageCountMismatch { texts: 1, images: 2 })
    ));
}

/// Test that no texts at all still yields one entry per image
#[test]
fn test_pair_pages_with_no_texts_should_yield_empty_placeholders() {
    let pages = PageSource::pair_pages(fake_images(2), Vec::new(), TextMismatchPolicy::TruncatePad)
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.narration_text.is_empty()));
}

/// Test extractor output splitting on form feeds
#[test]
fn test_split_pages_should_split_on_form_feed() {
    let raw = "first page\u{c}second page\u{c}third page\u{c}";
    let pages = PageSource::split_pages(raw);
    assert_eq!(pages, vec!["first page", "second page", "third page"]);
}

/// Test that a trailing form feed does not create a phantom page
#[test]
fn test_split_pages_with_trailing_form_feed_should_drop_empty_tail() {
    let pages = PageSource::split_pages("only page\u{c}");
    assert_eq!(pages.len(), 1);
}

/// Test that interior empty pages are preserved (a blank page is a page)
#[test]
fn test_split_pages_with_blank_interior_page_should_keep_it() {
    let pages = PageSource::split_pages("a\u{c}\u{c}c\u{c}");
    assert_eq!(pages, vec!["a", "", "c"]);
}
