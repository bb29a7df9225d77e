// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::caption_layout::{Anchor, Platform};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod caption_layout;
mod errors;
mod file_utils;
mod media_probe;
mod segmenter;
mod text_metrics;
mod word_timing;

/// CLI Wrapper for Platform to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliPlatform {
    Tiktok,
    Youtube,
    Facebook,
    Instagram,
}

impl From<CliPlatform> for Platform {
    fn from(cli_platform: CliPlatform) -> Self {
        match cli_platform {
            CliPlatform::Tiktok => Platform::TikTok,
            CliPlatform::Youtube => Platform::YouTube,
            CliPlatform::Facebook => Platform::Facebook,
            CliPlatform::Instagram => Platform::Instagram,
        }
    }
}

/// CLI Wrapper for Anchor to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliAnchor {
    Top,
    Middle,
    Bottom,
}

impl From<CliAnchor> for Anchor {
    fn from(cli_anchor: CliAnchor) -> Self {
        match cli_anchor {
            CliAnchor::Top => Anchor::Top,
            CliAnchor::Middle => Anchor::Middle,
            CliAnchor::Bottom => Anchor::Bottom,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate caption layout and subtitles for a video (default command)
    Generate(GenerateArgs),

    /// Generate shell completions for autocaps
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Word-level timing JSON produced by the transcriber
    /// (defaults to <video>.words.json next to the input)
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Frame size override as WIDTHxHEIGHT (skips ffprobe)
    #[arg(long, value_name = "WxH")]
    frame_size: Option<String>,

    /// Target platform for safe-margin placement
    #[arg(short, long, value_enum)]
    platform: Option<CliPlatform>,

    /// Vertical position of the captions
    #[arg(short = 'a', long = "position", value_enum)]
    position: Option<CliAnchor>,

    /// Output directory for generated files
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Extract the audio track for transcription and exit
    #[arg(short, long)]
    extract_audio: bool,
}

/// autocaps - Automatic Video Captions Generator
///
/// Turns word-level speech timings into positioned, timed captions
/// for short-form video platforms.
#[derive(Parser, Debug)]
#[command(name = "autocaps")]
#[command(version = "1.0.0")]
#[command(about = "Automatic word-timed caption generator for video")]
#[command(long_about = "autocaps segments word-level transcription timings into subtitle lines
and lays them out on the video frame with per-word karaoke highlight timing.

EXAMPLES:
    autocaps movie.mp4                           # Captions using default config
    autocaps -f movie.mp4                        # Force overwrite existing files
    autocaps -p tiktok -a middle movie.mp4       # Platform and position overrides
    autocaps --words data.json movie.mp4         # Explicit transcriber output
    autocaps --frame-size 1080x1920 movie.mp4    # Skip ffprobe
    autocaps -e movie.mp4                        # Extract audio for transcription
    autocaps --log-level debug /videos/          # Process a directory
    autocaps completions bash > autocaps.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

PIPELINE:
    Transcription itself is external: point --words at the word-level JSON
    (a [{word, start, end, probability}] array) produced by your transcriber.
    The layout output is a JSON document of positioned, timed elements for
    your compositor, plus an SRT of the segmented lines.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Word-level timing JSON produced by the transcriber
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Frame size override as WIDTHxHEIGHT (skips ffprobe)
    #[arg(long, value_name = "WxH")]
    frame_size: Option<String>,

    /// Target platform for safe-margin placement
    #[arg(short, long, value_enum)]
    platform: Option<CliPlatform>,

    /// Vertical position of the captions
    #[arg(short = 'a', long = "position", value_enum)]
    position: Option<CliAnchor>,

    /// Output directory for generated files
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Extract the audio track for transcription and exit
    #[arg(short, long)]
    extract_audio: bool,
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

    // @returns: ANSI color code for log level
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
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "autocaps", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let generate_args = GenerateArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                words: cli.words,
                frame_size: cli.frame_size,
                platform: cli.platform,
                position: cli.position,
                output_dir: cli.output_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
                extract_audio: cli.extract_audio,
            };
            run_generate(generate_args).await
        }
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter_for(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        apply_cli_overrides(&mut config, &options);
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &options);

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter_for(&config.log_level));
    }

    // Frame size override, parsed before any media work
    let frame_size = options
        .frame_size
        .as_deref()
        .map(media_probe::parse_frame_size)
        .transpose()?;

    // Create controller
    let controller = Controller::with_config(config)?;

    // Handle audio-extraction-only mode
    if options.extract_audio {
        if !options.input_path.is_file() {
            return Err(anyhow!("--extract-audio requires a video file, got: {:?}", options.input_path));
        }
        controller.run_extract_audio(options.input_path).await?;
        return Ok(());
    }

    // Run the controller with the input file(s)
    if options.input_path.is_file() {
        controller
            .run(options.input_path, options.words, frame_size, options.force_overwrite)
            .await?;
    } else if options.input_path.is_dir() {
        controller
            .run_folder(options.input_path, options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut Config, options: &GenerateArgs) {
    if let Some(platform) = &options.platform {
        config.platform = platform.clone().into();
    }
    if let Some(position) = &options.position {
        config.anchor = position.clone().into();
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
