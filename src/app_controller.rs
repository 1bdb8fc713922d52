use anyhow::Result;
use log::{info, warn};
use std::fs;

use crate::app_config::Config;
use crate::capabilities::Capabilities;
use crate::pipeline::{PipelineOrchestrator, RunOutcome};

// @module: Application controller wiring config, capabilities, and pipeline

/// Main application controller for document-to-video conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.input_file.is_empty() && !self.config.language.is_empty()
    }

    /// Run the main workflow
    pub async fn run(&self, clean: bool) -> Result<RunOutcome> {
        let start_time = std::time::Instant::now();

        // Drop a missing background up front rather than failing mid-render
        let mut config = self.config.clone();
        if let Some(background) = &config.background {
            if !background.exists() {
                warn!(
                    "Background image not found: {:?}, proceeding without overlay",
                    background
                );
                config.background = None;
            }
        }

        let capabilities = Capabilities::detect().await;

        let mut orchestrator = PipelineOrchestrator::new(config, capabilities);
        let outcome = orchestrator.run(clean).await?;

        let size_mb = fs::metadata(&outcome.output_path)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);

        info!(
            "Done: {:?} ({} page(s), {:.1}s, {:.2} MB) in {}",
            outcome.output_path,
            outcome.pages,
            outcome.total_duration_secs,
            size_mb,
            Self::format_duration(start_time.elapsed())
        );

        Ok(outcome)
    }

    /// Format an elapsed duration as a compact human-readable string
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        if minutes > 0 {
            format!("{}m{:02}s", minutes, seconds)
        } else {
            format!("{}.{:01}s", seconds, duration.subsec_millis() / 100)
        }
    }
}
