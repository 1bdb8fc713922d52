/*!
 * Orchestrator failure-path tests.
 *
 * These runs are constructed to fail during the startup checks, before any
 * external tool would be invoked, so they are safe on machines without
 * ffmpeg or LibreOffice installed.
 */

use anyhow::Result;
use deckcast::app_config::Config;
use deckcast::capabilities::Capabilities;
use deckcast::errors::MissingDependency;
use deckcast::pipeline::{PipelineOrchestrator, RunState};

use crate::common;

fn all_tools() -> Capabilities {
    Capabilities {
        encoder: true,
        prober: true,
        rasterizer: true,
        converter: true,
        text_extractor: true,
    }
}

fn config_in(dir: &std::path::Path, input_file: &str) -> Config {
    Config {
        input_dir: dir.join("input"),
        output_dir: dir.join("output"),
        work_dir: dir.join("work"),
        input_file: input_file.to_string(),
        ..Config::default()
    }
}

/// Test that a missing encoder aborts the run before the working area exists
#[tokio::test]
async fn test_run_without_encoder_should_fail_before_any_work() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = config_in(temp_dir.path(), "deck.pdf");
    let caps = Capabilities { encoder: false, ..all_tools() };

    let mut orchestrator = PipelineOrchestrator::new(config.clone(), caps);
    let err = orchestrator.run(false).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<MissingDependency>(),
        Some(MissingDependency::RequiredTool { tool, .. }) if tool == "ffmpeg"
    ));
    assert_eq!(orchestrator.state(), RunState::Failed);
    assert!(!config.work_dir.exists());
    Ok(())
}

/// Test that a nonexistent input document is a fatal startup error
#[tokio::test]
async fn test_run_with_missing_input_should_fail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = config_in(temp_dir.path(), "deck.pdf");

    let mut orchestrator = PipelineOrchestrator::new(config, all_tools());
    let err = orchestrator.run(false).await.unwrap_err();

    assert!(err.to_string().contains("not found"));
    assert_eq!(orchestrator.state(), RunState::Failed);
    Ok(())
}

/// Test that an unsupported input extension is rejected up front
#[tokio::test]
async fn test_run_with_unsupported_format_should_fail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = config_in(temp_dir.path(), "notes.txt");
    common::create_test_file(&config.input_dir, "notes.txt", "plain text")?;

    let mut orchestrator = PipelineOrchestrator::new(config, all_tools());
    let err = orchestrator.run(false).await.unwrap_err();

    assert!(err.to_string().contains("Unsupported input format"));
    assert_eq!(orchestrator.state(), RunState::Failed);
    Ok(())
}

/// Test that a deck input without a converter fails fast when the
/// composition fallback is disabled, leaving no partial working area
#[tokio::test]
async fn test_deck_without_converter_and_no_fallback_should_fail_fast() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = config_in(temp_dir.path(), "deck.pptx");
    common::create_test_file(&config.input_dir, "deck.pptx", "fake deck bytes")?;

    let caps = Capabilities { converter: false, ..all_tools() };
    let mut orchestrator = PipelineOrchestrator::new(config.clone(), caps);
    let err = orchestrator.run(false).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<MissingDependency>(),
        Some(MissingDependency::ConverterUnavailable { tool }) if tool == "soffice"
    ));
    assert_eq!(orchestrator.state(), RunState::Failed);
    assert!(!config.work_dir.exists());
    Ok(())
}
