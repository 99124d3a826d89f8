//! Video export: quality tiers, the capture state machine, and the
//! track-to-file convenience path.

pub mod sink;

use std::path::PathBuf;

use image::imageops::{self, FilterType};
use log::info;
use thiserror::Error;

use crate::audio::AudioGraph;
use crate::pipeline::{FrameComposer, RenderLoop};
use crate::render::Surface;
use crate::settings::AspectRatio;

pub use sink::{FfmpegSink, FrameSink, MemorySink};

/// Extra capture time past the end of the track so the final beat's decay
/// is not cut off.
pub const TAIL_MARGIN_SECS: f64 = 0.5;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export: no track is connected")]
    Unavailable,
    #[error("{0} export requires a pro subscription")]
    ProRequired(&'static str),
    #[error("no capture encoder available on this system")]
    CaptureUnavailable,
    #[error("no export in progress")]
    NotCapturing,
    #[error("encoder error: {0}")]
    Encoder(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the exporter is in its lifecycle. Failures are visible until the
/// next start or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPhase {
    #[default]
    Idle,
    Capturing,
    Finalizing,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportQuality {
    P720,
    P1080,
    Q2k,
    Q4k,
    Q5k,
}

impl ExportQuality {
    pub fn label(&self) -> &'static str {
        match self {
            ExportQuality::P720 => "720p",
            ExportQuality::P1080 => "1080p",
            ExportQuality::Q2k => "2K",
            ExportQuality::Q4k => "4K",
            ExportQuality::Q5k => "5K",
        }
    }

    /// Tiers above 1080p are gated behind the pro plan.
    pub fn requires_pro(&self) -> bool {
        !matches!(self, ExportQuality::P720 | ExportQuality::P1080)
    }

    fn base_height(&self) -> u32 {
        match self {
            ExportQuality::P720 => 720,
            ExportQuality::P1080 => 1080,
            ExportQuality::Q2k => 1440,
            ExportQuality::Q4k => 2160,
            ExportQuality::Q5k => 2880,
        }
    }

    /// Output dimensions for the tier under the given aspect ratio. Both
    /// axes are kept even for the encoder's chroma subsampling.
    pub fn dimensions(&self, aspect: AspectRatio) -> (u32, u32) {
        let h = self.base_height();
        let (rw, rh) = aspect.resolution();
        let w = (h as u64 * rw as u64 / rh as u64) as u32;
        (w & !1, h & !1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    WebM,
    Mp4,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::WebM => "webm",
            ExportFormat::Mp4 => "mp4",
        }
    }

    pub fn video_codec(&self) -> &'static str {
        match self {
            ExportFormat::WebM => "libvpx-vp9",
            ExportFormat::Mp4 => "libx264",
        }
    }
}

/// Everything needed to start an export.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub title: String,
    pub quality: ExportQuality,
    pub format: ExportFormat,
    pub fps: u32,
    pub output_dir: PathBuf,
    /// Original audio file to mux back in. Missing files degrade to
    /// video-only output.
    pub audio_path: Option<PathBuf>,
    pub is_pro: bool,
}

impl ExportPlan {
    pub fn output_path(&self) -> PathBuf {
        let name = format!(
            "{}_{}.{}",
            sanitize_title(&self.title),
            self.quality.label(),
            self.format.extension()
        );
        self.output_dir.join(name)
    }
}

/// Replace path-hostile characters so any track title yields a usable
/// filename.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "visualizer".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub frames_written: u64,
}

struct Session {
    sink: Box<dyn FrameSink>,
    path: PathBuf,
    frames: u64,
}

/// Incremental capture driver. One export at a time: while a capture is in
/// flight, further start requests are no-ops.
#[derive(Default)]
pub struct Exporter {
    phase: ExportPhase,
    session: Option<Session>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    /// Begin a capture into an ffmpeg encoder. Returns the output path, or
    /// `Ok(None)` when a capture is already running.
    pub fn start(&mut self, plan: &ExportPlan, aspect: AspectRatio) -> Result<Option<PathBuf>, ExportError> {
        if self.phase == ExportPhase::Capturing {
            return Ok(None);
        }
        self.check_plan(plan)?;

        let path = plan.output_path();
        let (width, height) = plan.quality.dimensions(aspect);
        let sink = FfmpegSink::spawn(
            &path,
            width,
            height,
            plan.fps.max(1),
            plan.format,
            plan.audio_path.as_deref(),
        )
        .map_err(|err| self.fail(err))?;

        info!("export started: {}", path.display());
        self.begin(Box::new(sink), path.clone());
        Ok(Some(path))
    }

    /// Begin a capture into a caller-supplied sink. Returns false when a
    /// capture is already running.
    pub fn start_with_sink(
        &mut self,
        plan: &ExportPlan,
        sink: Box<dyn FrameSink>,
    ) -> Result<bool, ExportError> {
        if self.phase == ExportPhase::Capturing {
            return Ok(false);
        }
        self.check_plan(plan)?;
        self.begin(sink, plan.output_path());
        Ok(true)
    }

    pub fn write_frame(&mut self, rgba: &[u8]) -> Result<(), ExportError> {
        let session = match (&self.phase, self.session.as_mut()) {
            (ExportPhase::Capturing, Some(session)) => session,
            _ => return Err(ExportError::NotCapturing),
        };
        match session.sink.write_frame(rgba) {
            Ok(()) => {
                session.frames += 1;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Close the capture and return what was written.
    pub fn finish(&mut self) -> Result<ExportReport, ExportError> {
        if self.phase != ExportPhase::Capturing {
            return Err(ExportError::NotCapturing);
        }
        self.phase = ExportPhase::Finalizing;
        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                self.phase = ExportPhase::Idle;
                return Err(ExportError::NotCapturing);
            }
        };
        match session.sink.finish() {
            Ok(()) => {
                self.phase = ExportPhase::Idle;
                info!(
                    "export finished: {} ({} frames)",
                    session.path.display(),
                    session.frames
                );
                Ok(ExportReport {
                    path: session.path,
                    frames_written: session.frames,
                })
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Abort an in-flight capture. Safe to call in any phase.
    pub fn cancel(&mut self) {
        self.session = None;
        self.phase = ExportPhase::Idle;
    }

    fn check_plan(&mut self, plan: &ExportPlan) -> Result<(), ExportError> {
        if plan.quality.requires_pro() && !plan.is_pro {
            return Err(self.fail(ExportError::ProRequired(plan.quality.label())));
        }
        Ok(())
    }

    fn begin(&mut self, sink: Box<dyn FrameSink>, path: PathBuf) {
        self.session = Some(Session {
            sink,
            path,
            frames: 0,
        });
        self.phase = ExportPhase::Capturing;
    }

    fn fail(&mut self, err: ExportError) -> ExportError {
        self.phase = ExportPhase::Failed;
        self.session = None;
        err
    }
}

/// Render the whole track from the top into the plan's output file. Rewinds
/// to zero, captures the track plus a half-second tail, and finalizes.
pub fn export_track(
    composer: &mut FrameComposer,
    graph: &mut AudioGraph,
    plan: &ExportPlan,
) -> Result<ExportReport, ExportError> {
    if !graph.has_track() {
        return Err(ExportError::Unavailable);
    }
    let mut exporter = Exporter::new();
    let aspect = composer.settings().aspect_ratio;
    let path = exporter
        .start(plan, aspect)?
        .ok_or(ExportError::NotCapturing)?;
    run_capture(&mut exporter, composer, graph, plan)?;
    let report = exporter.finish()?;
    debug_assert_eq!(report.path, path);
    Ok(report)
}

fn run_capture(
    exporter: &mut Exporter,
    composer: &mut FrameComposer,
    graph: &mut AudioGraph,
    plan: &ExportPlan,
) -> Result<(), ExportError> {
    graph.seek(0.0);
    let fps = plan.fps.max(1);
    let duration = graph.duration();
    let (out_width, out_height) = plan.quality.dimensions(composer.settings().aspect_ratio);
    let mut render_loop = RenderLoop::new(fps);

    let mut write_error = None;
    render_loop.render_offline(composer, graph, duration, |surface| {
        if write_error.is_some() {
            return;
        }
        if let Err(err) = write_fitted(exporter, surface, out_width, out_height) {
            write_error = Some(err);
        }
    });
    if let Some(err) = write_error {
        return Err(err);
    }

    // Tail margin past the end of the track so the last beat's visual decay
    // is kept. The clock is pinned at the end; these frames decay to the
    // background.
    let tail_frames = (TAIL_MARGIN_SECS * fps as f64).ceil() as u64;
    for _ in 0..tail_frames {
        let surface = composer.compose(graph);
        write_fitted(exporter, surface, out_width, out_height)?;
    }
    Ok(())
}

/// Frames are composed at the aspect ratio's canonical resolution while the
/// encoder is opened at the quality tier's. Rescale whenever the two differ
/// so the rawvideo stream matches the advertised stride.
fn write_fitted(
    exporter: &mut Exporter,
    surface: &Surface,
    width: u32,
    height: u32,
) -> Result<(), ExportError> {
    if surface.dimensions() == (width, height) {
        return exporter.write_frame(surface.pixels());
    }
    let scaled = imageops::resize(surface.image(), width, height, FilterType::Triangle);
    exporter.write_frame(scaled.as_raw())
}
