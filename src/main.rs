// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod assembler;
mod capabilities;
mod deck_reader;
mod errors;
mod file_utils;
mod media_utils;
mod narration;
mod page_source;
mod pipeline;
mod scene;
mod speech;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a document into a narrated video (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for deckcast
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input directory containing the document
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for the final video
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Working directory for intermediate files
    #[arg(short, long)]
    work: Option<PathBuf>,

    /// Input document filename inside the input directory
    #[arg(short = 'f', long)]
    file: Option<String>,

    /// Narration language code (e.g. 'en', 'id')
    #[arg(short, long)]
    language: Option<String>,

    /// Background image to overlay slides on
    #[arg(short, long)]
    background: Option<PathBuf>,

    /// Delete the working directory before processing
    #[arg(long)]
    clean: bool,

    /// Allow low-fidelity in-process composition when the deck converter is absent
    #[arg(long)]
    allow_compose: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// deckcast - narrated videos from slide decks and PDFs
///
/// Converts a document (slide deck or PDF) into an MP4 video: each page is
/// rasterized, narrated via text-to-speech, rendered into a timed scene,
/// and the scenes are concatenated into one output file.
#[derive(Parser, Debug)]
#[command(name = "deckcast")]
#[command(version = "0.1.0")]
#[command(about = "Document-to-narrated-video pipeline")]
#[command(long_about = "deckcast converts slide decks and PDFs into narrated MP4 videos.

EXAMPLES:
    deckcast                                  # Convert input/slides.pptx with defaults
    deckcast -f report.pdf                    # Convert a PDF instead
    deckcast -l id -f slides.pptx             # Narrate in Indonesian
    deckcast -b background.png                # Overlay slides on a background image
    deckcast --clean                          # Discard cached intermediate artifacts
    deckcast completions bash > deckcast.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

EXTERNAL TOOLS:
    ffmpeg/ffprobe - required for all runs
    pdftoppm       - required to rasterize paginated documents
    soffice        - optional, converts decks to PDF (see --allow-compose)
    pdftotext      - optional, extracts per-page narration text")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
        return ExitCode::FAILURE;
    }

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "deckcast", &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => run_convert(cli.convert).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(input) = options.input {
        config.input_dir = input;
    }
    if let Some(output) = options.output {
        config.output_dir = output;
    }
    if let Some(work) = options.work {
        config.work_dir = work;
    }
    if let Some(file) = options.file {
        config.input_file = file;
    }
    if let Some(language) = options.language {
        config.language = language;
    }
    if let Some(background) = options.background {
        config.background = Some(background);
    }
    if options.allow_compose {
        config.run.allow_composition_fallback = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the pipeline
    let controller = Controller::with_config(config)?;
    controller.run(options.clean).await?;

    Ok(())
}
