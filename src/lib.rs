//! ChromaBeat Core
//!
//! Audio visualization library for turning music into animated videos.
//!
//! # Features
//!
//! - Audio loading (WAV, MP3, FLAC, AAC) via Symphonia
//! - 256-point FFT spectrum analysis via RustFFT
//! - Frequency-reactive visualization modes (bars, waves, circle, symmetry)
//! - Generated image/video backgrounds with beat-driven pulse compositing
//! - Time-synced caption overlay from transcribed lyrics
//! - Video export via FFmpeg (VP9 WebM, H.264 MP4)

pub mod audio;
pub mod background;
pub mod captions;
pub mod export;
pub mod meta;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod visuals;

// Re-export commonly used types
pub use audio::{
    bass_energy, load_audio, load_audio_bytes, pulse_scale, AudioData, AudioGraph, FrameSpectrum,
    FrequencyAnalyzer,
};
pub use background::{BackgroundAsset, BackgroundGenerator, BackgroundSlot};
pub use captions::{active_caption, CaptionOverlay};
pub use export::{
    export_track, ExportFormat, ExportPhase, ExportPlan, ExportQuality, ExportReport, Exporter,
};
pub use meta::{AudioMetadata, MetadataService, TranscriptionSegment};
pub use pipeline::{export_file, FrameComposer, PipelineError, RenderLoop};
pub use settings::{parse_hex_color, AspectRatio, FilterKind, VisualizerSettings, VizMode};
pub use visuals::{create_visualization, DrawCommand, Visualization};
