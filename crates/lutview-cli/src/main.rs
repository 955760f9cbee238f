//! lutview - color-managed video preview
//!
//! Builds per-display 3D LUTs from ICC profiles and renders planar video
//! frames through them on the GPU.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lutview_core::{ChromaSubsampling, ColorRange, ColorSpace};
use lutview_icc::{Intent, StandardProfile};

mod commands;
mod config;

use config::Settings;

#[derive(Parser)]
#[command(name = "lutview")]
#[command(author, version, about = "Color-managed video preview")]
#[command(long_about = "
Builds 3D display LUTs from ICC profiles and renders planar video frames
through them on the GPU.

Examples:
  lutview info                                  # GPU adapter and settings
  lutview displays                              # Configured displays and their LUTs
  lutview lut --profile monitor.icc -o mon.cube # Export a display LUT
  lutview lut --standard display-p3 -r 33
  lutview render --pattern -W 1920 -H 1080 --standard p3 -o preview.png
  lutview render clip.yuv -W 3840 -H 2160 --bits 10 --frame 12 --display studio -o f12.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Settings file (default: <config dir>/lutview/config.ron)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show GPU adapter, settings and built-in profiles
    #[command(visible_alias = "i")]
    Info,

    /// List displays, their resolved profiles and LUT origin
    #[command(visible_alias = "d")]
    Displays(DisplaysArgs),

    /// Generate a display LUT, optionally exporting it as .cube
    Lut(LutArgs),

    /// Render one frame through a display LUT to PNG (headless)
    #[command(visible_alias = "r")]
    Render(RenderArgs),
}

/// Which LUT to use. At most one source; none means identity.
#[derive(Args, Debug, Default)]
struct LutSource {
    /// Configured display name
    #[arg(long, group = "lut_source")]
    display: Option<String>,

    /// ICC profile file
    #[arg(long, group = "lut_source")]
    profile: Option<PathBuf>,

    /// Built-in profile: srgb, linear-srgb, adobe-rgb, display-p3, rec2020
    #[arg(long, group = "lut_source")]
    standard: Option<StandardProfile>,

    /// Existing .cube file
    #[arg(long, group = "lut_source")]
    cube: Option<PathBuf>,

    /// LUT edge resolution (default from settings, 65)
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Rendering intent: perceptual, relative, saturation, absolute
    #[arg(long)]
    intent: Option<Intent>,
}

#[derive(Args)]
struct DisplaysArgs {
    /// Extra display names to include (resolved via settings)
    #[arg(long = "display")]
    displays: Vec<String>,

    /// LUT edge resolution (default from settings)
    #[arg(short, long)]
    resolution: Option<usize>,
}

#[derive(Args)]
struct LutArgs {
    #[command(flatten)]
    source: LutSource,

    /// Write the LUT as .cube
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TITLE line for the .cube file
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args)]
struct RenderArgs {
    /// Headerless planar file (planes back to back, frames back to back)
    #[arg(required_unless_present = "pattern")]
    input: Option<PathBuf>,

    /// Use the built-in test pattern instead of a file
    #[arg(long, conflicts_with = "input")]
    pattern: bool,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Luma width
    #[arg(short = 'W', long, default_value = "1280")]
    width: u32,

    /// Luma height
    #[arg(short = 'H', long, default_value = "720")]
    height: u32,

    /// Chroma subsampling: 444, 422, 420
    #[arg(long, default_value = "420")]
    subsampling: ChromaSubsampling,

    /// Matrix: rgb, bt601, bt709, bt2020
    #[arg(long, default_value = "bt709")]
    color_space: ColorSpace,

    /// Range: limited, full
    #[arg(long, default_value = "limited")]
    range: ColorRange,

    /// Bits per sample (1-16 integer; 16 or 32 with --float)
    #[arg(long, default_value = "8")]
    bits: u32,

    /// Samples are IEEE floats normalized to [0, 1]
    #[arg(long)]
    float: bool,

    /// Frame index
    #[arg(short, long, default_value = "0")]
    frame: usize,

    #[command(flatten)]
    lut: LutSource,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_deref())?;

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => commands::info::run(&settings),
        Commands::Displays(args) => commands::displays::run(args, &settings),
        Commands::Lut(args) => commands::lut::run(args, &settings),
        Commands::Render(args) => commands::render::run(args, &settings),
    }
}

/// Console logging to stderr plus an optional non-blocking file sink.
///
/// The returned guard flushes the file writer on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let registry = tracing_subscriber::registry().with(filter).with(console);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Ok(Some(guard))
        }
        None => {
            registry.init();
            Ok(None)
        }
    }
}
