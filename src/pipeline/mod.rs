//! Frame composition and the render loop.
//!
//! [`FrameComposer`] turns the current playback state into one finished
//! frame: analysis sample, background, visualization, captions, filter.
//! [`RenderLoop`] drives it against a wall clock for live preview, or
//! deterministically via [`RenderLoop::render_offline`] for export.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;
use thiserror::Error;

use crate::audio::{bass_energy, load_audio, pulse_scale, AudioError, AudioGraph, FrequencyAnalyzer};
use crate::background::{draw_background, BackgroundSlot, GenerateError};
use crate::captions::CaptionOverlay;
use crate::meta::{AudioMetadata, MetadataError};
use crate::render::{apply_filter, execute, Surface};
use crate::settings::VisualizerSettings;
use crate::visuals::{create_visualization, Visualization};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
    #[error("background error: {0}")]
    Background(#[from] GenerateError),
    #[error("export error: {0}")]
    Export(#[from] crate::export::ExportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Composes one frame per call from the playback state it is handed.
///
/// Owns everything that persists across frames: the analyzer, the settings,
/// the background slot, the caption overlay, and the surface the frame is
/// rasterized into.
pub struct FrameComposer {
    analyzer: FrequencyAnalyzer,
    settings: VisualizerSettings,
    visualization: Box<dyn Visualization>,
    metadata: Option<AudioMetadata>,
    pub background: BackgroundSlot,
    captions: CaptionOverlay,
    surface: Surface,
}

impl FrameComposer {
    pub fn new(settings: VisualizerSettings) -> Self {
        let settings = settings.clamped();
        let (width, height) = settings.aspect_ratio.resolution();
        let mut captions = CaptionOverlay::new();
        if let Some(path) = &settings.lyrics_font {
            captions.load_font(path);
        }
        Self {
            analyzer: FrequencyAnalyzer::new(),
            visualization: create_visualization(settings.mode),
            metadata: None,
            background: BackgroundSlot::new(),
            captions,
            surface: Surface::new(width, height),
            settings,
        }
    }

    pub fn settings(&self) -> &VisualizerSettings {
        &self.settings
    }

    /// Replace the settings, reloading whatever depends on them.
    pub fn set_settings(&mut self, settings: VisualizerSettings) {
        let settings = settings.clamped();
        if settings.mode != self.settings.mode {
            self.visualization = create_visualization(settings.mode);
        }
        if settings.lyrics_font != self.settings.lyrics_font {
            self.captions = CaptionOverlay::new();
            if let Some(path) = &settings.lyrics_font {
                self.captions.load_font(path);
            }
        }
        self.settings = settings;
    }

    pub fn metadata(&self) -> Option<&AudioMetadata> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Option<AudioMetadata>) {
        self.metadata = metadata;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Render the frame for the graph's current playhead.
    pub fn compose(&mut self, graph: &AudioGraph) -> &Surface {
        let (width, height) = self.settings.aspect_ratio.resolution();
        self.surface.resize(width, height);

        let spectrum = self.analyzer.sample_frame(graph);
        let bass = bass_energy(&spectrum);
        let pulse = pulse_scale(bass);
        let time = graph.current_time();

        self.surface.clear();

        if let Some(asset) = self.background.asset() {
            draw_background(&mut self.surface, asset, time, pulse);
        }

        if graph.has_track() {
            let commands =
                self.visualization
                    .render(&spectrum, &self.settings, bass, width, height);
            execute(&mut self.surface, &commands);
        }

        if self.settings.show_lyrics {
            if let Some(metadata) = &self.metadata {
                self.captions
                    .draw(&mut self.surface, &metadata.transcription, time, &self.settings);
            }
        }

        apply_filter(self.settings.filter, self.surface.image_mut());
        &self.surface
    }
}

/// Decode a track from disk and export it end to end.
///
/// Convenience wrapper over the incremental API: connects the track to a
/// fresh graph, composes every frame with `settings`, and captures into the
/// plan's output file.
pub fn export_file(
    audio_path: &Path,
    settings: VisualizerSettings,
    plan: &crate::export::ExportPlan,
) -> Result<crate::export::ExportReport, PipelineError> {
    let audio = load_audio(audio_path)?;
    let mut graph = AudioGraph::new();
    graph.connect(&audio);
    let mut composer = FrameComposer::new(settings);
    let report = crate::export::export_track(&mut composer, &mut graph, plan)?;
    Ok(report)
}

/// Cooperative cancellation handle shared with a running loop.
#[derive(Clone, Default)]
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop after the frame in flight. Idempotent.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Drives the composer at a fixed frame rate.
pub struct RenderLoop {
    fps: u32,
    handle: LoopHandle,
}

impl RenderLoop {
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            handle: LoopHandle::new(),
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Run in real time until the track ends or the handle is stopped,
    /// advancing the playback clock and invoking `on_frame` with each
    /// composed frame. Returns the number of frames produced.
    pub fn run(
        &mut self,
        composer: &mut FrameComposer,
        graph: &mut AudioGraph,
        mut on_frame: impl FnMut(&Surface),
    ) -> u64 {
        let frame_dt = 1.0 / self.fps as f64;
        let frame_budget = Duration::from_secs_f64(frame_dt);
        let mut frames = 0u64;

        graph.play();
        while !self.handle.is_stopped() {
            let started = Instant::now();
            on_frame(composer.compose(graph));
            frames += 1;

            if !graph.advance(frame_dt) {
                break;
            }
            if let Some(remaining) = frame_budget.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        graph.pause();
        info!("render loop finished after {frames} frames");
        frames
    }

    /// Step through `duration` seconds from the current playhead without
    /// pacing, for deterministic offline rendering. Stops early at the end
    /// of the track or on cancellation.
    pub fn render_offline(
        &mut self,
        composer: &mut FrameComposer,
        graph: &mut AudioGraph,
        duration: f64,
        mut on_frame: impl FnMut(&Surface),
    ) -> u64 {
        let frame_dt = 1.0 / self.fps as f64;
        let total = (duration.max(0.0) * self.fps as f64).ceil() as u64;
        let mut frames = 0u64;

        graph.play();
        for _ in 0..total {
            if self.handle.is_stopped() {
                break;
            }
            on_frame(composer.compose(graph));
            frames += 1;
            if !graph.advance(frame_dt) {
                break;
            }
        }
        graph.pause();
        frames
    }
}
