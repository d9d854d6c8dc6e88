use std::{io, path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use frame_sampler::{
    DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_DIR, FfmpegLogLevel, FrameSampler, FrameStatus,
    ProgressCallback, ProgressInfo, SampleReport, SamplerConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use serde_json::{Value, json};

const DEFAULT_INPUT: &str = "Docmate Overview.mp4";

const CLI_AFTER_HELP: &str = "Frames are taken at 20%, 50% and 80% of the duration and written as frame_0.jpg, frame_1.jpg and frame_2.jpg.\n\nExamples:\n  frame-sampler input.mp4\n  frame-sampler input.mp4 --out stills --quality 85 --progress\n  frame-sampler input.mp4 --json > report.json\n  frame-sampler --completions zsh > _frame-sampler";

#[derive(Debug, Parser)]
#[command(
    name = "frame-sampler",
    version,
    about = "Save still frames from 20%, 50% and 80% of a video as JPEG files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video path.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output directory for frame_<index>.jpg files (created if missing).
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    out: PathBuf,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Print a machine-readable JSON report to stdout.
    #[arg(long)]
    json: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Show debug logging output.
    #[arg(long, short, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors.
    #[arg(long, short)]
    quiet: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug, trace).
    #[arg(long, default_value_t = FfmpegLogLevel::Error)]
    ffmpeg_log_level: FfmpegLogLevel,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, exclusive = true)]
    completions: Option<Shell>,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig::new(&self.input, &self.out).with_jpeg_quality(self.quality)
    }
}

/// `RUST_LOG`, when set, takes precedence over the command-line level.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_module("frame_sampler", level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(total: u64) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(total);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total);
        self.bar.set_position(info.current);
        self.bar.set_message(format!(
            "{:.3}s {}",
            info.timestamp.as_secs_f64(),
            if info.saved { "saved" } else { "failed" }
        ));
    }
}

fn report_json(config: &SamplerConfig, report: &SampleReport) -> Value {
    let frames: Vec<Value> = report
        .frames
        .iter()
        .map(|frame| match &frame.status {
            FrameStatus::Saved(path) => json!({
                "index": frame.index,
                "timestamp_seconds": frame.timestamp.as_secs_f64(),
                "status": "saved",
                "path": path.display().to_string(),
            }),
            FrameStatus::Failed(reason) => json!({
                "index": frame.index,
                "timestamp_seconds": frame.timestamp.as_secs_f64(),
                "status": "failed",
                "reason": reason,
            }),
        })
        .collect();

    json!({
        "input": config.video_path.display().to_string(),
        "output_dir": config.output_dir.display().to_string(),
        "duration_seconds": report.duration.as_secs_f64(),
        "saved": report.saved_count(),
        "failed": report.failed_count(),
        "frames": frames,
    })
}

fn print_summary(config: &SamplerConfig, report: &SampleReport) {
    let message = format!(
        "Saved {} of {} frame(s) to {}",
        report.saved_count(),
        report.frames.len(),
        config.output_dir.display()
    );
    if report.is_complete() {
        println!("{} {}", "success:".green().bold(), message.green());
    } else {
        println!("{} {}", "warning:".yellow().bold(), message.yellow());
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "frame-sampler", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.log_level());
    frame_sampler::set_ffmpeg_log_level(cli.ffmpeg_log_level);

    let mut sampler = FrameSampler::new(cli.sampler_config());

    let progress = if cli.progress {
        let progress = Arc::new(TerminalProgress::new(sampler.config().fractions.len() as u64)?);
        sampler = sampler.with_progress(progress.clone());
        Some(progress)
    } else {
        None
    };

    let report = sampler.run()?;

    if let Some(progress) = progress {
        progress.bar.finish_with_message("done");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report_json(sampler.config(), &report))?);
    } else {
        print_summary(sampler.config(), &report);
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
