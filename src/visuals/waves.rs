//! Oscilloscope-style waveform visualization.

use super::{DrawCommand, Paint, Visualization};
use crate::audio::{FrameSpectrum, BIN_COUNT};
use crate::settings::{VisualizerSettings, VizMode};

/// Single continuous polyline over the time-domain samples, left to right.
/// Always stroked in the flat primary color.
pub struct WavesViz;

impl Visualization for WavesViz {
    fn mode(&self) -> VizMode {
        VizMode::Waves
    }

    fn render(
        &self,
        spectrum: &FrameSpectrum,
        settings: &VisualizerSettings,
        _bass_energy: f32,
        width: u32,
        height: u32,
    ) -> Vec<DrawCommand> {
        let settings = settings.clamped();
        let w = width as f32;
        let h = height as f32;

        let slice_width = w / BIN_COUNT as f32;
        let points: Vec<(f32, f32)> = spectrum
            .waveform
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                // Byte 128 is the centerline; 0/255 swing half the height
                let y = (sample as f32 / 128.0) * (h / 2.0);
                (i as f32 * slice_width, y.clamp(0.0, h))
            })
            .collect();

        vec![DrawCommand::StrokePolyline {
            points,
            width: (6.0 * settings.intensity / 100.0).max(1.0),
            paint: Paint::Flat(settings.color),
        }]
    }
}
