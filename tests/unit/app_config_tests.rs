/*!
 * Tests for application configuration
 */

use anyhow::Result;
use deckcast::app_config::{Config, TextMismatchPolicy};
use std::path::PathBuf;

/// Test that the default configuration passes validation
#[test]
fn test_validate_with_default_config_should_pass() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

/// Test that an unknown language code is rejected
#[test]
fn test_validate_with_invalid_language_should_fail() {
    let mut config = Config::default();
    config.language = "zz".to_string();
    assert!(config.validate().is_err());
}

/// Test that odd frame dimensions are rejected (yuv420p constraint)
#[test]
fn test_validate_with_odd_dimensions_should_fail() {
    let mut config = Config::default();
    config.video.width = 1921;
    assert!(config.validate().is_err());
}

/// Test that zero concurrency is rejected
#[test]
fn test_validate_with_zero_concurrency_should_fail() {
    let mut config = Config::default();
    config.run.concurrency = 0;
    assert!(config.validate().is_err());
}

/// Test that a non-positive silent fallback duration is rejected
#[test]
fn test_validate_with_zero_silence_should_fail() {
    let mut config = Config::default();
    config.narration.silence_secs = 0.0;
    assert!(config.validate().is_err());
}

/// Test that an empty JSON object deserializes to full defaults
#[test]
fn test_deserialize_empty_object_should_apply_defaults() -> Result<()> {
    let config: Config = serde_json::from_str("{}")?;
    assert_eq!(config.input_file, "slides.pptx");
    assert_eq!(config.language, "en");
    assert_eq!(config.video.width, 1920);
    assert_eq!(config.video.height, 1080);
    assert_eq!(config.video.fps, 30);
    assert_eq!(config.narration.silence_secs, 3.0);
    assert_eq!(config.run.concurrency, 4);
    assert_eq!(config.run.text_mismatch_policy, TextMismatchPolicy::TruncatePad);
    assert!(!config.run.allow_composition_fallback);
    Ok(())
}

/// Test that the mismatch policy uses kebab-case names in JSON
#[test]
fn test_deserialize_mismatch_policy_should_accept_kebab_case() -> Result<()> {
    let json = r#"{"run": {"text_mismatch_policy": "fail"}}"#;
    let config: Config = serde_json::from_str(json)?;
    assert_eq!(config.run.text_mismatch_policy, TextMismatchPolicy::Fail);
    Ok(())
}

/// Test that a config roundtrips through JSON unchanged
#[test]
fn test_serialize_then_deserialize_should_roundtrip() -> Result<()> {
    let mut config = Config::default();
    config.language = "id".to_string();
    config.background = Some(PathBuf::from("bg.png"));

    let json = serde_json::to_string(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.language, "id");
    assert_eq!(parsed.background, Some(PathBuf::from("bg.png")));
    Ok(())
}

/// Test that input_path joins the input directory and filename
#[test]
fn test_input_path_should_join_dir_and_filename() {
    let mut config = Config::default();
    config.input_dir = PathBuf::from("/data/in");
    config.input_file = "deck.pptx".to_string();
    assert_eq!(config.input_path(), PathBuf::from("/data/in/deck.pptx"));
}
