//! Frequency-bar visualization.

use super::{paint_for, DrawCommand, Visualization};
use crate::audio::{FrameSpectrum, BIN_COUNT};
use crate::settings::{VisualizerSettings, VizMode};

/// Vertical bars across the full width, one per low-half frequency bin,
/// growing up from the bottom edge.
pub struct BarsViz;

impl Visualization for BarsViz {
    fn mode(&self) -> VizMode {
        VizMode::Bars
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

        // Upper bins carry little musical energy; draw only the lower half.
        let bar_count = BIN_COUNT / 2;
        let bar_width = (w / bar_count as f32) * settings.bar_width;
        let height_scale = (settings.sensitivity / 50.0) * (settings.intensity / 100.0);

        let mut commands = Vec::with_capacity(bar_count);
        let mut x = 0.0;

        for &mag in spectrum.frequency.iter().take(bar_count) {
            let bar_height = ((mag as f32 / 255.0) * h * 0.6 * height_scale).min(h);
            if bar_height > 0.0 {
                commands.push(DrawCommand::FillRect {
                    x,
                    y: h - bar_height,
                    w: (bar_width - 1.0).max(0.0),
                    h: bar_height,
                    paint: paint_for(&settings, (x, h), (x, h - bar_height)),
                });
            }
            x += bar_width;
        }

        commands
    }
}
