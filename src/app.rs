//! Replay application: recorded landmark frames in, composited overlays out.

use crate::{
    engine::{FrameReport, FrameSettings, OverlayEngine},
    error::Result,
    landmarks::{FrameInput, Viewport},
    surface::RasterSurface,
};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Replay application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where landmark frames come from
    pub frame_source: FrameSource,
    /// Directory for PNG frames, none to skip writing
    pub output_dir: Option<PathBuf>,
    /// Mode, selections and size used for every frame
    pub settings: FrameSettings,
    /// Frame geometry
    pub viewport: Viewport,
    /// How long to wait for assets before the first frame
    pub settle_timeout: Duration,
}

/// Landmark frame source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSource {
    /// JSON lines file
    File(PathBuf),
    /// JSON lines on standard input
    Stdin,
}

/// Totals of one replay run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    /// Frames processed by the engine
    pub frames: usize,
    /// Lines that were not valid frames
    pub skipped: usize,
    /// Frames in which at least one overlay was drawn
    pub frames_with_overlay: usize,
    /// Report of the last processed frame
    pub last_report: Option<FrameReport>,
}

/// Main replay application struct
pub struct ReplayApp {
    config: AppConfig,
    engine: OverlayEngine,
    surface: RasterSurface,
}

impl ReplayApp {
    /// Create a new replay application around a configured engine
    pub fn new(config: AppConfig, engine: OverlayEngine) -> Result<Self> {
        info!(
            "Initializing replay: {} mode, {}x{} @{}x",
            config.settings.mode,
            config.viewport.width,
            config.viewport.height,
            config.viewport.device_ratio()
        );

        if let Some(dir) = &config.output_dir {
            std::fs::create_dir_all(dir)?;
            info!("Writing frames to {}", dir.display());
        }

        let surface = RasterSurface::new(config.viewport)?;
        Ok(Self { config, engine, surface })
    }

    #[must_use]
    pub const fn engine(&self) -> &OverlayEngine {
        &self.engine
    }

    /// Run the replay over the configured frame source
    pub fn run(&mut self) -> Result<ReplaySummary> {
        match self.config.frame_source.clone() {
            FrameSource::File(path) => {
                info!("Reading frames from {}", path.display());
                let reader = BufReader::new(File::open(path)?);
                self.replay(reader)
            }
            FrameSource::Stdin => {
                info!("Reading frames from standard input");
                self.replay(io::stdin().lock())
            }
        }
    }

    /// Process every JSON line from `reader`
    ///
    /// Blank lines are ignored; malformed lines are logged and skipped.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> Result<ReplaySummary> {
        if !self.engine.settle(self.config.settle_timeout) {
            warn!("Some assets are still loading; overlays will appear once they arrive");
        }

        let mut summary = ReplaySummary::default();
        let mut last_status = String::new();
        let start_time = Instant::now();

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let input = match FrameInput::from_json_line(&line) {
                Ok(input) => input,
                Err(e) => {
                    warn!("Skipping line {}: {e}", line_number + 1);
                    summary.skipped += 1;
                    continue;
                }
            };

            let report = self
                .engine
                .process_frame(&input, &self.config.settings, &mut self.surface);

            if report.status != last_status {
                info!("Frame {}: {}", summary.frames, report.status);
                last_status.clone_from(&report.status);
            }
            if !report.poses.is_empty() {
                summary.frames_with_overlay += 1;
            }

            self.write_frame(summary.frames)?;
            summary.frames += 1;
            summary.last_report = Some(report);
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        if summary.frames > 0 && elapsed > 0.0 {
            debug!("Average throughput: {:.1} fps", summary.frames as f64 / elapsed);
        }
        info!(
            "Replay finished: {} frames, {} with overlay, {} skipped",
            summary.frames, summary.frames_with_overlay, summary.skipped
        );
        Ok(summary)
    }

    fn write_frame(&self, index: usize) -> Result<()> {
        if let Some(dir) = &self.config.output_dir {
            self.surface.save(dir.join(format!("frame_{index:05}.png")))?;
        }
        Ok(())
    }
}
