// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use subtrans::app_config::{Config, LogLevel, Platform};
use subtrans::file_utils::FileManager;
use subtrans::jobs::{
    CancelFlag, JobScheduler, ProgressEvent, SourceFile, TranslationRequest,
};

/// CLI wrapper for Platform to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliPlatform {
    OpenAI,
    Gemini,
    DeepSeek,
    Claude,
}

impl From<CliPlatform> for Platform {
    fn from(cli_platform: CliPlatform) -> Self {
        match cli_platform {
            CliPlatform::OpenAI => Platform::OpenAI,
            CliPlatform::Gemini => Platform::Gemini,
            CliPlatform::DeepSeek => Platform::DeepSeek,
            CliPlatform::Claude => Platform::Claude,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate SRT subtitles using AI providers (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory; defaults to the input file's directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// AI platform to use
    #[arg(short, long, value_enum)]
    platform: Option<CliPlatform>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key, overrides the config file value
    #[arg(short = 'k', long, env = "SUBTRANS_API_KEY")]
    api_key: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'el', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subtrans - AI subtitle translation
///
/// Translates SRT subtitle files with AI providers while protecting
/// markup and glossary terms and keeping subtitle timing intact.
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered SRT subtitle translation tool")]
#[command(long_about = "subtrans translates SRT subtitle files using AI providers.

EXAMPLES:
    subtrans movie.srt                          # Translate using default config
    subtrans -f movie.srt                       # Force overwrite existing files
    subtrans -p openai -m gpt-4o movie.srt      # Use specific platform and model
    subtrans -s en -t el movie.srt              # Translate from English to Greek
    subtrans --log-level debug /subtitles/      # Process entire directory with debug logging
    subtrans completions bash > subtrans.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED PLATFORMS:
    openai    - OpenAI API (default: gpt-4o-mini)
    gemini    - Google Gemini via the OpenAI-compatible endpoint
    deepseek  - DeepSeek API
    claude    - Anthropic Claude API")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory; defaults to the input file's directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// AI platform to use
    #[arg(short, long, value_enum)]
    platform: Option<CliPlatform>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key, overrides the config file value
    #[arg(short = 'k', long, env = "SUBTRANS_API_KEY")]
    api_key: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'el', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

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
    // Info level until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;
            let args = TranslateArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                platform: cli.platform,
                model: cli.model,
                api_key: cli.api_key,
                source_language: cli.source_language,
                target_language: cli.target_language,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file: {}", options.config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            options.config_path
        );
        Config::from_file_or_default(config_path)?
    };

    // CLI options override the config file
    if let Some(platform) = options.platform {
        config.translation.platform = platform.into();
    }
    if let Some(model) = options.model {
        config.translation.model = model;
    }
    if let Some(api_key) = options.api_key {
        config.translation.api_key = api_key;
    }
    if let Some(source) = options.source_language {
        config.translation.source_language = source;
    }
    if let Some(target) = options.target_language {
        config.translation.target_language = target;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config
        .translation
        .validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    // Collect input files
    let input_paths: Vec<PathBuf> = if options.input_path.is_file() {
        vec![options.input_path.clone()]
    } else if options.input_path.is_dir() {
        FileManager::find_srt_files(&options.input_path)?
    } else {
        return Err(anyhow!(
            "Input path does not exist: {:?}",
            options.input_path
        ));
    };
    if input_paths.is_empty() {
        warn!("No SRT files found under {:?}", options.input_path);
        return Ok(());
    }

    let output_dir = options.output_dir.clone().unwrap_or_else(|| {
        if options.input_path.is_dir() {
            options.input_path.clone()
        } else {
            options
                .input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf()
        }
    });

    // Skip files whose output already exists unless forced
    let mut files: Vec<SourceFile> = Vec::new();
    let mut output_paths: HashMap<String, PathBuf> = HashMap::new();
    for path in &input_paths {
        let output_path = FileManager::generate_output_path(
            path,
            &output_dir,
            &config.translation.target_language,
        );
        if FileManager::file_exists(&output_path) && !options.force_overwrite {
            warn!(
                "Output file already exists: {:?}. Use -f to force overwrite.",
                output_path
            );
            continue;
        }
        let source = FileManager::read_source_file(path)?;
        output_paths.insert(source.name.clone(), output_path);
        files.push(source);
    }
    if files.is_empty() {
        info!("Nothing to translate.");
        return Ok(());
    }

    info!(
        "subtrans: {} - {}",
        config.translation.platform.display_name(),
        config.translation.effective_model()
    );
    info!(
        "Translating {} file(s) from {} to {}",
        files.len(),
        config.translation.source_language,
        config.translation.target_language
    );

    let request = TranslationRequest {
        files,
        settings: config.translation.clone(),
        matching_words: config.matching_words.clone(),
        removal_words: config.removal_words.clone(),
    };

    let scheduler = Arc::new(JobScheduler::from_settings(&config.translation)?);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let cancel = CancelFlag::new();

    // Ctrl-C requests cooperative cancellation
    let ctrlc_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested, finishing in-flight work...");
            ctrlc_cancel.cancel();
        }
    });

    let job = tokio::spawn({
        let scheduler = Arc::clone(&scheduler);
        let cancel = cancel.clone();
        async move { scheduler.run(request, events_tx, cancel).await }
    });

    // One bar per file, driven by the job's progress events
    let multi_progress = MultiProgress::new();
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cues ({percent}%) {msg}")
        .or_else(|_| {
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
        })
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let mut bars: HashMap<String, ProgressBar> = HashMap::new();

    while let Some(event) = events_rx.recv().await {
        match event {
            ProgressEvent::Progress {
                file,
                current,
                total,
            } => {
                let bar = bars.entry(file.clone()).or_insert_with(|| {
                    let bar = multi_progress.add(ProgressBar::new(total as u64));
                    bar.set_style(style.clone().progress_chars("█▓▒░"));
                    bar.set_message(file.clone());
                    bar
                });
                bar.set_position(current as u64);
            }
            ProgressEvent::FileComplete { file, output } => {
                if let Some(bar) = bars.get(&file) {
                    bar.finish_with_message(format!("{} done", file));
                }
                if let Some(output_path) = output_paths.get(&file) {
                    FileManager::write_output(output_path, &output)?;
                    info!("Success: {:?}", output_path);
                }
            }
            ProgressEvent::Error { file, message } => match file {
                Some(file) => {
                    if let Some(bar) = bars.get(&file) {
                        bar.abandon_with_message(format!("{} failed", file));
                    }
                    error!("{}: {}", file, message);
                }
                None => error!("{}", message),
            },
            ProgressEvent::Cancelled { file } => {
                if let Some(file) = file {
                    if let Some(bar) = bars.get(&file) {
                        bar.abandon_with_message(format!("{} cancelled", file));
                    }
                }
            }
            ProgressEvent::AllComplete { files } => {
                info!("Finished: {} file(s) translated", files.len());
            }
        }
    }

    let summary = job.await.context("Translation job panicked")?;
    match summary.status {
        subtrans::jobs::JobStatus::Completed => Ok(()),
        subtrans::jobs::JobStatus::Cancelled => {
            warn!("Job cancelled; {} file(s) completed", summary.completed.len());
            Ok(())
        }
        _ => Err(anyhow!("Translation job failed")),
    }
}
