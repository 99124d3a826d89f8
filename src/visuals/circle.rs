//! Orb visualization: a bass-pulsed ring with radial frequency spokes.

use super::{paint_for, DrawCommand, Paint, Visualization};
use crate::audio::{FrameSpectrum, BIN_COUNT};
use crate::settings::{VisualizerSettings, VizMode};

/// Every Nth frequency bin becomes one spoke around the ring.
const SPOKE_STRIDE: usize = 4;

/// Centered ring whose radius grows with bass energy, surrounded by radial
/// spokes whose length follows the per-bin magnitude.
pub struct CircleViz;

impl Visualization for CircleViz {
    fn mode(&self) -> VizMode {
        VizMode::Circle
    }

    fn render(
        &self,
        spectrum: &FrameSpectrum,
        settings: &VisualizerSettings,
        bass_energy: f32,
        width: u32,
        height: u32,
    ) -> Vec<DrawCommand> {
        let settings = settings.clamped();
        let w = width as f32;
        let h = height as f32;
        let center = (w / 2.0, h / 2.0);

        let base_radius = w.min(h) / 5.0;
        let radius = base_radius + bass_energy / 2.0;
        let intensity_scale = settings.intensity / 100.0;
        let length_scale = (settings.sensitivity / 50.0) * intensity_scale;

        let mut commands = Vec::with_capacity(1 + BIN_COUNT / SPOKE_STRIDE);

        commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width: (10.0 * intensity_scale).max(1.0),
            paint: Paint::Flat(settings.color),
        });

        for (i, &mag) in spectrum
            .frequency
            .iter()
            .enumerate()
            .step_by(SPOKE_STRIDE)
        {
            let spoke_length = (mag as f32 / 255.0) * 200.0 * length_scale;
            if spoke_length <= 0.0 {
                continue;
            }
            let angle = (i as f32 / BIN_COUNT as f32) * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            let inner = (center.0 + cos * radius, center.1 + sin * radius);
            let outer = (
                center.0 + cos * (radius + spoke_length),
                center.1 + sin * (radius + spoke_length),
            );

            commands.push(DrawCommand::StrokeLine {
                from: inner,
                to: outer,
                width: (4.0 * intensity_scale).max(1.0),
                // Gradient runs along the spoke: primary at the ring,
                // secondary at the tip.
                paint: paint_for(&settings, inner, outer),
            });
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_spectrum() -> FrameSpectrum {
        let mut s = FrameSpectrum::silent();
        s.frequency = [255; BIN_COUNT];
        s
    }

    #[test]
    fn test_ring_plus_spokes() {
        let commands = CircleViz.render(
            &full_spectrum(),
            &VisualizerSettings::default(),
            0.0,
            1920,
            1080,
        );
        // One ring, one spoke per 4th bin
        assert_eq!(commands.len(), 1 + BIN_COUNT / SPOKE_STRIDE);
        assert!(matches!(commands[0], DrawCommand::StrokeCircle { .. }));
    }

    #[test]
    fn test_ring_radius_grows_with_bass() {
        let settings = VisualizerSettings::default();
        let quiet = CircleViz.render(&full_spectrum(), &settings, 0.0, 1920, 1080);
        let loud = CircleViz.render(&full_spectrum(), &settings, 255.0, 1920, 1080);

        let radius_of = |cmds: &[DrawCommand]| match &cmds[0] {
            DrawCommand::StrokeCircle { radius, .. } => *radius,
            other => panic!("expected circle, got {other:?}"),
        };
        // base = min(1920, 1080) / 5 = 216; bass adds bass/2
        assert!((radius_of(&quiet) - 216.0).abs() < 0.5);
        assert!((radius_of(&loud) - 343.5).abs() < 0.5);
    }

    #[test]
    fn test_spoke_length_formula() {
        // mag 255, sensitivity 50, intensity 100 => length 200
        let commands = CircleViz.render(
            &full_spectrum(),
            &VisualizerSettings::default(),
            0.0,
            1920,
            1080,
        );
        let DrawCommand::StrokeLine { from, to, .. } = &commands[1] else {
            panic!("expected spoke");
        };
        let len = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
        assert!((len - 200.0).abs() < 0.5, "spoke length {len}");
    }

    #[test]
    fn test_spoke_gradient_runs_inner_to_outer() {
        let settings = VisualizerSettings::default();
        let commands = CircleViz.render(&full_spectrum(), &settings, 0.0, 1920, 1080);
        let DrawCommand::StrokeLine { from, to, paint, .. } = &commands[1] else {
            panic!("expected spoke");
        };
        let Paint::Linear {
            from: gfrom,
            to: gto,
            start,
            end,
        } = paint
        else {
            panic!("expected gradient spoke");
        };
        assert_eq!(gfrom, from);
        assert_eq!(gto, to);
        assert_eq!(*start, settings.color);
        assert_eq!(*end, settings.color_secondary);
    }

    #[test]
    fn test_silence_keeps_only_ring() {
        let commands = CircleViz.render(
            &FrameSpectrum::silent(),
            &VisualizerSettings::default(),
            0.0,
            1920,
            1080,
        );
        assert_eq!(commands.len(), 1);
    }
}
