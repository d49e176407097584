use batch_resize::batch::{self, BatchConfig, BatchEvent, CancelToken};
use batch_resize::config::{self, ResizeConfig};
use batch_resize::imaging::{FitMode, Quality, RustBackend, TargetSize};
use batch_resize::types::{BatchReport, ItemOutcome};
use batch_resize::{output, scan};
use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

/// Shared flags for commands that resize images.
#[derive(clap::Args, Clone)]
struct ResizeArgs {
    /// Target width in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Target height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Output directory (created if missing)
    #[arg(short, long, default_value = "resized")]
    output: PathBuf,

    /// Keep the source aspect ratio, fitting inside WIDTHxHEIGHT
    #[arg(long)]
    keep_aspect: bool,

    /// Fill WIDTHxHEIGHT exactly and crop the centered overflow (wins over --keep-aspect)
    #[arg(long)]
    crop: bool,

    /// Brighten using the configured factor (1.2 by default)
    #[arg(long, conflicts_with = "brightness")]
    brighten: bool,

    /// Explicit brightness multiplier, e.g. 0.8 or 1.5
    #[arg(long, value_name = "FACTOR")]
    brightness: Option<f32>,

    /// Suffix inserted before the extension [config default: _resized]
    #[arg(long)]
    suffix: Option<String>,

    /// JPEG quality 1-100 [config default: 90]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Parallel workers; 1 processes files in order [default: CPU cores]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Give up on a single image after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Write a JSON report of every item to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "batch-resize")]
#[command(about = "Resize a batch of images to one target size")]
#[command(long_about = "\
Resize a batch of images to one target size

Every supported image (jpg, jpeg, png, bmp, gif) is decoded, optionally
brightened, fitted into WIDTHxHEIGHT and written to the output directory
with a suffix before its extension. Sources are never modified.

Fit modes:

  (default)       stretch to exactly WIDTHxHEIGHT
  --keep-aspect   largest box inside WIDTHxHEIGHT with the source ratio
  --crop          fill WIDTHxHEIGHT exactly, cropping the centered overflow

Files that cannot be read or written are reported and skipped; the rest of
the batch carries on. The exit status is 1 if any file failed.

Run 'batch-resize gen-config' to generate a documented resize.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing resize.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log every decode, plan and encode
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize every supported image directly inside a directory
    Dir {
        input_dir: PathBuf,
        #[command(flatten)]
        args: ResizeArgs,
    },
    /// Resize an explicit list of files
    Files {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[command(flatten)]
        args: ResizeArgs,
    },
    /// Print a stock resize.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let (items, args) = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Dir { input_dir, args } => (scan::discover_images(&input_dir)?, args),
        Command::Files { paths, args } => (scan::items_from_paths(&paths), args),
    };
    if items.is_empty() {
        return Err("no images found".into());
    }

    let file_config = config::load_config(&cli.config_dir)?;
    std::fs::create_dir_all(&args.output)?;
    let batch_config = build_batch_config(&args, &file_config);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!("could not install Ctrl-C handler: {e}");
    }

    output::print_batch_header(items.len(), &batch_config);
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        let mut outcomes = Vec::new();
        for event in rx {
            output::print_event(&event);
            record_outcome(&mut outcomes, event);
        }
        outcomes
    });
    let result = batch::run_batch(
        &RustBackend::new(),
        &items,
        &batch_config,
        &tx,
        Some(&cancel),
    );
    drop(tx);
    let outcomes = printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let summary = result?;

    if let Some(report_path) = &args.report {
        let report = BatchReport {
            summary,
            items: outcomes,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(report_path, json)?;
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Merge CLI flags over the file config into the batch snapshot.
fn build_batch_config(args: &ResizeArgs, file: &ResizeConfig) -> BatchConfig {
    let fit_mode = if args.keep_aspect || args.crop {
        if args.keep_aspect && args.crop {
            warn!("both --keep-aspect and --crop given; cropping to fill");
        }
        FitMode::from_toggles(args.keep_aspect, args.crop)
    } else {
        file.resize.mode
    };

    let brightness = args
        .brightness
        .or(args.brighten.then_some(file.resize.brighten_factor));

    BatchConfig {
        target: TargetSize::new(args.width, args.height),
        fit_mode,
        brightness,
        output_dir: args.output.clone(),
        suffix: args
            .suffix
            .clone()
            .unwrap_or_else(|| file.output.suffix.clone()),
        quality: Quality::new(args.quality.unwrap_or(file.output.quality)),
        jobs: config::effective_threads(&file.processing, args.jobs),
        item_timeout: args
            .timeout
            .or(file.processing.timeout_secs)
            .map(Duration::from_secs),
    }
}

fn record_outcome(outcomes: &mut Vec<ItemOutcome>, event: BatchEvent) {
    match event {
        BatchEvent::Done {
            display_name,
            output,
        } => outcomes.push(ItemOutcome {
            display_name,
            output: Some(output),
            error: None,
        }),
        BatchEvent::Failed {
            display_name,
            error,
        } => outcomes.push(ItemOutcome {
            display_name,
            output: None,
            error: Some(error),
        }),
        BatchEvent::Started { .. } | BatchEvent::Finished(_) => {}
    }
}
