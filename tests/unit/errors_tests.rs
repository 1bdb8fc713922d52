/*!
 * Tests for the error taxonomy
 */

use deckcast::errors::{
    AppError, AssemblyError, MissingDependency, PageExtractionError, SceneRenderError,
    SynthesisError,
};

/// Test that a missing required tool names the tool in its message
#[test]
fn test_missing_dependency_display_should_name_tool() {
    let err = MissingDependency::RequiredTool {
        tool: "ffmpeg".to_string(),
        hint: "install FFmpeg".to_string(),
    };
    let message = err.to_string();
    assert!(message.contains("ffmpeg"));
    assert!(message.contains("install FFmpeg"));
}

/// Test that the converter error mentions the fallback being disabled
#[test]
fn test_converter_unavailable_display_should_mention_fallback() {
    let err = MissingDependency::ConverterUnavailable {
        tool: "soffice".to_string(),
    };
    assert!(err.to_string().contains("fallback is disabled"));
}

/// Test that a scene render error carries the page index
#[test]
fn test_scene_render_error_display_should_include_page() {
    let err = SceneRenderError::EncodeFailed {
        page: 7,
        stderr: "corrupt input frame".to_string(),
    };
    assert!(err.to_string().contains("Page 7"));
}

/// Test that a page count mismatch reports both counts
#[test]
fn test_page_count_mismatch_display_should_report_counts() {
    let err = PageExtractionError::PageCountMismatch { texts: 3, images: 4 };
    let message = err.to_string();
    assert!(message.contains('3'));
    assert!(message.contains('4'));
}

/// Test that a synthesis timeout reports the configured bound
#[test]
fn test_synthesis_timeout_display_should_report_seconds() {
    let err = SynthesisError::Timeout { seconds: 10 };
    assert!(err.to_string().contains("10s"));
}

/// Test assembly error variants wrap into AppError
#[test]
fn test_app_error_should_wrap_assembly_error() {
    let err: AppError = AssemblyError::EmptyList.into();
    assert!(matches!(err, AppError::Assembly(AssemblyError::EmptyList)));
    assert!(err.to_string().contains("empty scene list"));
}

/// Test io errors convert into the file error variant
#[test]
fn test_app_error_should_wrap_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: AppError = io_err.into();
    assert!(matches!(err, AppError::File(_)));
}
