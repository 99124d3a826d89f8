//! Audio decoding, the session audio graph, and per-frame frequency analysis.
//!
//! This module provides:
//! - Track decoding via Symphonia (WAV, MP3, FLAC, AAC), from a path or raw bytes
//! - An explicitly owned [`AudioGraph`] holding the decoded track and playback clock
//! - A 256-point [`FrequencyAnalyzer`] producing byte-scaled spectrum snapshots
//! - Deterministic test-signal synthesis for unit and integration tests

pub mod analyzer;
pub mod graph;
pub mod loader;
pub mod synth;

pub use analyzer::{
    bass_energy, pulse_scale, FrameSpectrum, FrequencyAnalyzer, BIN_COUNT, FFT_SIZE,
};
pub use graph::AudioGraph;
pub use loader::{load_audio, load_audio_bytes, AudioData, AudioError};
