//! Per-frame frequency analysis.
//!
//! Wraps a fixed 256-point FFT and exposes one spectrum snapshot per rendered
//! frame as byte arrays: frequency magnitudes mapped from the -100..-30 dB
//! range into 0..=255, time-domain samples centered at 128. The drawing
//! formulas downstream all take this 0..=255 domain as input.

use rustfft::{num_complex::Complex, FftPlanner};

/// Transform size. 256 points yield 128 usable frequency bins.
pub const FFT_SIZE: usize = 256;

/// Usable frequency bins per frame (positive frequencies only).
pub const BIN_COUNT: usize = FFT_SIZE / 2;

/// Bins averaged for the bass-energy beat proxy.
const BASS_BINS: usize = 10;

/// dB window mapped onto the 0..=255 byte range.
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// One frame's worth of spectral data.
///
/// Both arrays are fixed-length; an analyzer with no connected audio yields
/// all zeros for `frequency` and a flat 128 centerline for `waveform`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpectrum {
    /// Frequency-bin magnitudes, 0..=255.
    pub frequency: [u8; BIN_COUNT],
    /// Time-domain samples, 0..=255 centered at 128.
    pub waveform: [u8; BIN_COUNT],
}

impl FrameSpectrum {
    /// The silent frame: zero magnitudes, centered waveform.
    pub fn silent() -> Self {
        Self {
            frequency: [0; BIN_COUNT],
            waveform: [128; BIN_COUNT],
        }
    }
}

impl Default for FrameSpectrum {
    fn default() -> Self {
        Self::silent()
    }
}

/// Mean magnitude of the lowest frequency bins, in 0..=255.
///
/// Proxy for kick-drum intensity; drives the per-frame beat pulse.
pub fn bass_energy(spectrum: &FrameSpectrum) -> f32 {
    let sum: u32 = spectrum.frequency[..BASS_BINS].iter().map(|&m| m as u32).sum();
    sum as f32 / BASS_BINS as f32
}

/// Uniform zoom factor for the beat pulse, bounded to 1.00..=1.04.
pub fn pulse_scale(bass: f32) -> f32 {
    1.0 + (bass / 255.0).clamp(0.0, 1.0) * 0.04
}

/// Real-time spectral analyzer, one snapshot per rendered frame.
pub struct FrequencyAnalyzer {
    planner: FftPlanner<f32>,
    window: [f32; FFT_SIZE],
}

impl FrequencyAnalyzer {
    pub fn new() -> Self {
        // Hann window to reduce spectral leakage
        let mut window = [0.0f32; FFT_SIZE];
        for (i, w) in window.iter_mut().enumerate() {
            let t = i as f32 / (FFT_SIZE - 1) as f32;
            *w = 0.5 * (1.0 - (2.0 * std::f32::consts::PI * t).cos());
        }
        Self {
            planner: FftPlanner::new(),
            window,
        }
    }

    /// Snapshot the spectrum at the graph's playhead.
    ///
    /// Reflects the most recent audio energy with no temporal averaging.
    /// Returns the silent frame when no track is connected or the playhead is
    /// too close to the end for a full window. Never errors.
    pub fn sample_frame(&mut self, graph: &crate::audio::AudioGraph) -> FrameSpectrum {
        match graph.window_at_playhead(FFT_SIZE) {
            Some(samples) => self.analyze_window(samples),
            None => FrameSpectrum::silent(),
        }
    }

    /// Analyze exactly one window of `FFT_SIZE` samples.
    pub fn analyze_window(&mut self, samples: &[f32]) -> FrameSpectrum {
        debug_assert!(samples.len() >= FFT_SIZE);

        let mut out = FrameSpectrum::silent();

        // Time-domain bytes come straight from the unwindowed samples
        for (i, byte) in out.waveform.iter_mut().enumerate() {
            let s = samples[i].clamp(-1.0, 1.0);
            *byte = (128.0 + s * 127.0).round().clamp(0.0, 255.0) as u8;
        }

        let mut buffer: Vec<Complex<f32>> = samples[..FFT_SIZE]
            .iter()
            .zip(&self.window)
            .map(|(s, w)| Complex::new(s * w, 0.0))
            .collect();

        let fft = self.planner.plan_fft_forward(FFT_SIZE);
        fft.process(&mut buffer);

        for (i, byte) in out.frequency.iter_mut().enumerate() {
            let magnitude = buffer[i].norm() / FFT_SIZE as f32;
            let db = 20.0 * magnitude.max(1e-10).log10();
            let scaled = (db - MIN_DB) / (MAX_DB - MIN_DB) * 255.0;
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }

        out
    }
}

impl Default for FrequencyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
