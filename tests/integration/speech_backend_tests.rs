/*!
 * Speech backend behavior tests using mock backends, plus the narration
 * synthesizer driven end-to-end over those mocks
 */

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use deckcast::errors::SynthesisError;
use deckcast::narration::{AudioProvenance, NarrationSynthesizer};
use deckcast::speech::gtts::GoogleSpeech;
use deckcast::speech::SpeechBackend;

use crate::common;
use crate::common::mock_backends::{MockSpeechBackend, OfflineSpeechBackend};

/// Test that a successful backend returns its payload and records the call
#[tokio::test]
async fn test_mock_backend_should_return_payload() {
    let backend = MockSpeechBackend::new(vec![1, 2, 3]);

    let bytes = backend.synthesize("Hello world", "en").await.unwrap();

    assert_eq!(bytes, vec![1, 2, 3]);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

/// Test that an offline backend surfaces a request failure
#[tokio::test]
async fn test_offline_backend_should_fail_with_request_error() {
    let backend = OfflineSpeechBackend;

    let err = backend.synthesize("Hello world", "en").await.unwrap_err();

    assert!(matches!(err, SynthesisError::RequestFailed(_)));
}

/// Test that backends are usable as trait objects, as the synthesizer holds them
#[tokio::test]
async fn test_backend_should_work_as_trait_object() {
    let backend: Box<dyn SpeechBackend> = Box::new(MockSpeechBackend::new(b"mp3".to_vec()));

    let bytes = backend.synthesize("text", "en").await.unwrap();

    assert_eq!(bytes, b"mp3".to_vec());
    assert_eq!(backend.name(), "mock");
}

/// Test that a fully offline run degrades every page to the fixed-duration
/// silent asset and still completes
#[tokio::test]
async fn test_synthesizer_over_offline_backend_should_fall_back_to_silence() -> Result<()> {
    if !common::media_tools_available() {
        return Ok(());
    }

    let temp_dir = common::create_temp_dir()?;
    let synthesizer = NarrationSynthesizer::new(Arc::new(OfflineSpeechBackend), "en", 3.0);

    let mut assets = Vec::new();
    for index in 1..=3 {
        let path = temp_dir.path().join(format!("page-{:03}.mp3", index));
        assets.push(synthesizer.synthesize_page(index, "narration text", &path).await?);
    }

    for asset in &assets {
        assert_eq!(asset.provenance, AudioProvenance::SilentFallback);
        assert_eq!(asset.duration_secs, 3.0);
        assert!(asset.path.is_file());
    }
    Ok(())
}

/// Test that a page without text sends the default utterance to the backend,
/// and that an unplayable backend response degrades to the silent fallback
#[tokio::test]
async fn test_synthesizer_with_empty_text_should_send_default_utterance() -> Result<()> {
    if !common::media_tools_available() {
        return Ok(());
    }

    let temp_dir = common::create_temp_dir()?;
    let backend = Arc::new(MockSpeechBackend::new(b"not playable audio".to_vec()));
    let synthesizer = NarrationSynthesizer::new(backend.clone(), "en", 2.0);

    let path = temp_dir.path().join("page-003.mp3");
    let asset = synthesizer.synthesize_page(3, "   ", &path).await?;

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0], "Slide 3");

    assert_eq!(asset.provenance, AudioProvenance::SilentFallback);
    assert_eq!(asset.duration_secs, 2.0);
    Ok(())
}

/// Test that audio rehydrated from a previous run is labeled as cached
#[tokio::test]
async fn test_rehydrated_audio_should_be_marked_cached() -> Result<()> {
    if !common::media_tools_available() {
        return Ok(());
    }

    let temp_dir = common::create_temp_dir()?;
    let synthesizer = NarrationSynthesizer::new(Arc::new(OfflineSpeechBackend), "en", 3.0);

    let path = temp_dir.path().join("page-001.mp3");
    synthesizer.synthesize_page(1, "text", &path).await?;

    let asset = synthesizer.from_cached(1, &path).await?;
    assert_eq!(asset.provenance, AudioProvenance::Cached);
    assert!(asset.duration_secs > 0.0);
    Ok(())
}

/// Test that long narration is split into multiple request-sized chunks
#[test]
fn test_chunking_should_respect_request_size_limit() {
    let text = "word ".repeat(100);
    let chunks = GoogleSpeech::chunk_text(&text, 200);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 200);
    }

    // Re-joining the chunks reproduces the normalized text
    let rejoined = chunks.join(" ");
    assert_eq!(rejoined, text.trim());
}
