//! Mirrored-bar visualization.

use super::{paint_for, DrawCommand, Visualization};
use crate::audio::{FrameSpectrum, BIN_COUNT};
use crate::settings::{VisualizerSettings, VizMode};

/// Bars mirrored around the horizontal center: bin i appears once to the
/// right of center and once to the left, each vertically centered.
pub struct SymmetryViz;

impl Visualization for SymmetryViz {
    fn mode(&self) -> VizMode {
        VizMode::Symmetry
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

        // First quarter of the bins, each drawn twice (mirrored)
        let bar_count = BIN_COUNT / 4;
        let bar_width = (w / bar_count as f32 / 2.0) * settings.bar_width;
        let height_scale = (settings.sensitivity / 50.0) * (settings.intensity / 100.0);
        let center_x = w / 2.0;
        let center_y = h / 2.0;

        let mut commands = Vec::with_capacity(bar_count * 2);

        for (i, &mag) in spectrum.frequency.iter().take(bar_count).enumerate() {
            let bar_height = ((mag as f32 / 255.0) * h * 0.3 * height_scale).min(h);
            if bar_height <= 0.0 {
                continue;
            }
            let top = center_y - bar_height / 2.0;
            let rect_w = (bar_width - 1.0).max(0.0);
            let paint = paint_for(
                &settings,
                (0.0, top),
                (0.0, center_y + bar_height / 2.0),
            );

            commands.push(DrawCommand::FillRect {
                x: center_x + i as f32 * bar_width,
                y: top,
                w: rect_w,
                h: bar_height,
                paint: paint.clone(),
            });
            commands.push(DrawCommand::FillRect {
                x: center_x - i as f32 * bar_width - bar_width,
                y: top,
                w: rect_w,
                h: bar_height,
                paint,
            });
        }

        commands
    }
}
