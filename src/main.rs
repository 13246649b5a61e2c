//! Replays recorded hand/face landmarks through the accessory overlay engine.

use accessory_overlay::app::{AppConfig, FrameSource, ReplayApp};
use accessory_overlay::assets::{AssetLoader, ImageFetcher};
use accessory_overlay::config::{Config, EXAMPLE_CONFIG};
use accessory_overlay::engine::OverlayEngine;
use accessory_overlay::resolvers::Mode;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON lines file of landmark frames (reads stdin when omitted)
    #[arg(short, long)]
    frames: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Accessory mode (rings, sunglasses, earrings, necklace)
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Accessory id for the selected mode
    #[arg(short, long)]
    accessory: Option<String>,

    /// Size scale in percent (50-200)
    #[arg(short, long)]
    size: Option<u32>,

    /// Frame width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in logical pixels
    #[arg(long)]
    height: Option<u32>,

    /// Device pixel ratio
    #[arg(long)]
    pixel_ratio: Option<f64>,

    /// Directory to write composited PNG frames into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Accessory overlay replay");

    // Load configuration if provided
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    // Command line overrides
    if let Some(mode) = args.mode {
        config.selection.mode = mode;
    }
    if let Some(id) = &args.accessory {
        config.selection.set_accessory(config.selection.mode, id);
    }
    if let Some(size) = args.size {
        config.selection.size_scale_percent = size;
    }
    if let Some(width) = args.width {
        config.output.width = width;
    }
    if let Some(height) = args.height {
        config.output.height = height;
    }
    if let Some(ratio) = args.pixel_ratio {
        config.output.pixel_ratio = ratio;
    }
    config.validate()?;

    // Build the engine and start loading the catalog
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(config.http_fetcher());
    let loader = AssetLoader::new(fetcher)?;
    let engine = OverlayEngine::new(config.asset_store(), Some(loader), config.smoothing_filter());

    let app_config = AppConfig {
        frame_source: args.frames.map_or(FrameSource::Stdin, FrameSource::File),
        output_dir: args.output_dir,
        settings: config.frame_settings(),
        viewport: config.viewport(),
        settle_timeout: Duration::from_secs(config.loader.settle_timeout_secs),
    };

    // Create and run application
    let mut app = ReplayApp::new(app_config, engine)?;
    let summary = app.run()?;

    if let Some(report) = summary.last_report {
        info!("Final status: {}", report.status);
    }

    Ok(())
}
