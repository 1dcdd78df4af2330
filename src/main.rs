// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ytsumm::app_config::{self, Config, LengthPreset};
use ytsumm::youtube::MetadataExtractor;
use ytsumm::{Controller, ToolServer};

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

/// CLI Wrapper for LengthPreset to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLength {
    Short,
    Medium,
    Long,
}

impl From<CliLength> for LengthPreset {
    fn from(cli_length: CliLength) -> Self {
        match cli_length {
            CliLength::Short => LengthPreset::Short,
            CliLength::Medium => LengthPreset::Medium,
            CliLength::Long => LengthPreset::Long,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the JSON-RPC tool server on stdin/stdout, or over HTTP with --sse
    Serve {
        /// Serve over HTTP with server-sent events instead of stdio
        #[arg(long)]
        sse: bool,

        /// Bind address for --sse (overrides server.sse_host)
        #[arg(long, requires = "sse")]
        host: Option<String>,

        /// Port for --sse (overrides server.sse_port)
        #[arg(short, long, requires = "sse")]
        port: Option<u16>,
    },

    /// Summarize a video, or a text file with --text-file
    Summarize {
        /// YouTube URL or video ID
        #[arg(value_name = "INPUT", required_unless_present = "text_file")]
        input: Option<String>,

        /// Summary length preset
        #[arg(short, long, value_enum, conflicts_with = "ratio")]
        length: Option<CliLength>,

        /// Fraction of sentences to keep (0.0 - 1.0)
        #[arg(short, long)]
        ratio: Option<f64>,

        /// Transcript language code (e.g., 'en', 'ko')
        #[arg(short = 'L', long)]
        language: Option<String>,

        /// Summarize a local text file instead of a video
        #[arg(long, value_name = "PATH", conflicts_with = "input")]
        text_file: Option<PathBuf>,
    },

    /// Extract the key points of a video
    KeyPoints {
        /// YouTube URL or video ID
        #[arg(value_name = "INPUT")]
        input: String,

        /// Number of key points
        #[arg(short, long)]
        num_points: Option<usize>,

        /// Transcript language code
        #[arg(short = 'L', long)]
        language: Option<String>,
    },

    /// Print the transcript of a video
    Transcript {
        /// YouTube URL or video ID
        #[arg(value_name = "INPUT")]
        input: String,

        /// Transcript language code
        #[arg(short = 'L', long)]
        language: Option<String>,
    },

    /// Print title, channel and counters of a video
    Metadata {
        /// YouTube URL or video ID
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Generate shell completions for ytsumm
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ytsumm - YouTube transcript summarizer
///
/// Fetches YouTube transcripts and produces extractive summaries and key points.
#[derive(Parser, Debug)]
#[command(name = "ytsumm")]
#[command(version)]
#[command(about = "Extractive summaries of YouTube transcripts")]
#[command(long_about = "ytsumm fetches YouTube transcripts and summarizes them by keeping the sentences
whose content words are most frequent.

EXAMPLES:
    ytsumm summarize https://youtu.be/dQw4w9WgXcQ        # Medium length summary
    ytsumm summarize -l short dQw4w9WgXcQ                # Short summary
    ytsumm summarize --ratio 0.5 --text-file notes.txt   # Summarize a local file
    ytsumm key-points -n 3 dQw4w9WgXcQ                   # Three key points
    ytsumm transcript -L ko dQw4w9WgXcQ                  # Korean transcript
    ytsumm serve                                         # Run the tool server
    ytsumm serve --sse --port 8080                       # Tool server over HTTP/SSE
    ytsumm completions bash > ytsumm.bash                # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. YTSUMM_LOG_LEVEL, YTSUMM_SUMMARY_LENGTH and
    YTSUMM_DEFAULT_LANGUAGE override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    // Logs go to stderr: stdout carries command output and tool server frames
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ytsumm", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config, cli.log_level.clone())?;
    if let Commands::Serve { host, port, .. } = &cli.command {
        if let Some(host) = host {
            config.server.sse_host = host.clone();
        }
        if let Some(port) = port {
            config.server.sse_port = *port;
        }
    }
    log::set_max_level(config.log_level.to_level_filter());
    debug!("Loaded configuration from {}", cli.config.display());

    let controller = Controller::with_config(config)?;

    let result = run_command(cli.command, controller).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

/// Load the config file, apply environment and CLI overrides, then validate
fn load_config(path: &Path, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_create(path)?;
    config.apply_env_overrides()?;

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run_command(command: Commands, controller: Controller) -> Result<()> {
    match command {
        Commands::Serve { sse, .. } => {
            let server = Arc::new(ToolServer::new(controller));
            if sse {
                server.serve_sse().await
            } else {
                server.serve_stdio().await
            }
        }
        Commands::Summarize {
            input,
            length,
            ratio,
            language,
            text_file,
        } => {
            let summary = if let Some(path) = text_file {
                let text = std::fs::read_to_string(&path)
                    .context(format!("Failed to read text file: {}", path.display()))?;
                let generator = controller.generator();
                match (ratio, length) {
                    (Some(ratio), _) => generator.generate_summary(&text, ratio)?,
                    (None, Some(length)) => generator.generate_summary_with_preset(&text, length.into())?,
                    (None, None) => generator.generate_default_summary(&text)?,
                }
            } else {
                let input = input.ok_or_else(|| anyhow!("INPUT is required unless --text-file is given"))?;
                match ratio {
                    Some(ratio) => {
                        controller
                            .summarize_video_with_ratio(&input, ratio, language.as_deref())
                            .await?
                    }
                    None => {
                        let length = length.map(|l| LengthPreset::from(l).as_str());
                        controller
                            .summarize_video(&input, length, language.as_deref())
                            .await?
                            .summary
                    }
                }
            };
            println!("{}", summary);
            Ok(())
        }
        Commands::KeyPoints {
            input,
            num_points,
            language,
        } => {
            let points = controller
                .extract_key_points(&input, num_points, language.as_deref())
                .await?;
            for (i, point) in points.iter().enumerate() {
                println!("{}. {}", i + 1, point);
            }
            Ok(())
        }
        Commands::Transcript { input, language } => {
            let transcript = controller.get_transcript(&input, language.as_deref()).await?;
            println!("{}", transcript);
            Ok(())
        }
        Commands::Metadata { input } => {
            let metadata = controller.get_video_metadata(&input).await?;
            println!("{}", MetadataExtractor::format_metadata(&metadata));
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}
