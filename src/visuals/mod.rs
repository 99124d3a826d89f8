//! Visualization mode system.
//!
//! Each mode turns one frame of spectral data into a retained draw list:
//! - Bars: frequency bars rising from the bottom edge
//! - Symmetry: mirrored bars growing outward from the horizontal center
//! - Waves: oscilloscope polyline over the time-domain samples
//! - Circle: bass-pulsed orb with radial frequency spokes
//! - Particles, Grid: reserved; accepted as settings values, render nothing
//!
//! Every mode is a pure function of (spectrum, settings, bass energy, surface
//! size): no randomness and no state carried across frames.

mod bars;
mod circle;
mod draw;
mod symmetry;
mod waves;

pub use bars::BarsViz;
pub use circle::CircleViz;
pub use draw::{DrawCommand, Paint};
pub use symmetry::SymmetryViz;
pub use waves::WavesViz;

use crate::audio::FrameSpectrum;
use crate::settings::{VisualizerSettings, VizMode};

/// Trait for visualization modes.
pub trait Visualization: Send + Sync {
    /// Mode identifier.
    fn mode(&self) -> VizMode;

    /// Generate the draw list for one frame.
    ///
    /// `width`/`height` are the render-surface dimensions in pixels; all
    /// emitted geometry derives from them and from the clamped settings.
    fn render(
        &self,
        spectrum: &FrameSpectrum,
        settings: &VisualizerSettings,
        bass_energy: f32,
        width: u32,
        height: u32,
    ) -> Vec<DrawCommand>;
}

/// Placeholder for modes without a drawing algorithm yet.
///
/// Renders nothing extra; the background and captions still compose normally.
pub struct PlaceholderViz(pub VizMode);

impl Visualization for PlaceholderViz {
    fn mode(&self) -> VizMode {
        self.0
    }

    fn render(
        &self,
        _spectrum: &FrameSpectrum,
        _settings: &VisualizerSettings,
        _bass_energy: f32,
        _width: u32,
        _height: u32,
    ) -> Vec<DrawCommand> {
        Vec::new()
    }
}

/// Create a visualization instance for a mode.
///
/// This is the single dispatch point; no mode-tagged branching exists
/// anywhere else in the render path.
pub fn create_visualization(mode: VizMode) -> Box<dyn Visualization> {
    match mode {
        VizMode::Bars => Box::new(BarsViz),
        VizMode::Waves => Box::new(WavesViz),
        VizMode::Circle => Box::new(CircleViz),
        VizMode::Symmetry => Box::new(SymmetryViz),
        VizMode::Particles | VizMode::Grid => Box::new(PlaceholderViz(mode)),
    }
}

/// Resolve the fill style for a shape spanning `from`..`to`.
///
/// A two-stop gradient between the primary and secondary color when gradients
/// are enabled, otherwise flat primary color.
pub(crate) fn paint_for(
    settings: &VisualizerSettings,
    from: (f32, f32),
    to: (f32, f32),
) -> Paint {
    if settings.gradient_enabled {
        Paint::Linear {
            from,
            to,
            start: settings.color,
            end: settings.color_secondary,
        }
    } else {
        Paint::Flat(settings.color)
    }
}
