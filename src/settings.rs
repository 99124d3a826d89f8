//! Visualizer session settings.
//!
//! Created with defaults once a track finishes analysis, mutated live by user
//! controls, and read by the frame composer each tick. Settings serialize
//! round-trip exactly so a restored session renders identical frames.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// RGBA color, straight bytes.
pub type Color = [u8; 4];

/// Parse a `#rrggbb` or `#rrggbbaa` hex color (missing alpha means opaque).
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    let a = if hex.len() == 8 {
        u8::from_str_radix(&hex[6..8], 16).ok()?
    } else {
        0xff
    };
    Some([r, g, b, a])
}

/// Available visualization modes.
///
/// `Particles` and `Grid` are accepted settings values reserved for future
/// visuals; they currently dispatch to a no-op renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VizMode {
    Bars,
    Waves,
    Circle,
    Symmetry,
    Particles,
    Grid,
}

impl VizMode {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bars" | "spectrum" => Some(Self::Bars),
            "waves" | "wave" | "oscilloscope" => Some(Self::Waves),
            "circle" | "orb" => Some(Self::Circle),
            "symmetry" | "mirror" => Some(Self::Symmetry),
            "particles" | "dust" => Some(Self::Particles),
            "grid" => Some(Self::Grid),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::Waves => "waves",
            Self::Circle => "circle",
            Self::Symmetry => "symmetry",
            Self::Particles => "particles",
            Self::Grid => "grid",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Bars,
            Self::Waves,
            Self::Circle,
            Self::Symmetry,
            Self::Particles,
            Self::Grid,
        ]
    }
}

/// Output resolution preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Vertical,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// Canonical render-surface resolution for this preset.
    pub fn resolution(&self) -> (u32, u32) {
        match self {
            Self::Widescreen => (1920, 1080),
            Self::Vertical => (1080, 1920),
            Self::Square => (1080, 1080),
        }
    }
}

/// Whole-frame post-process filter presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    None,
    /// Grayscale, dimmed, high contrast.
    Noir,
    /// Sepia tone.
    Vintage,
    /// Desaturated, low contrast.
    Muted,
    /// Oversaturated.
    Hyper,
    /// Soft gaussian blur, slightly faded.
    Dream,
}

/// All user-tweakable visualizer settings, immutable within a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerSettings {
    pub mode: VizMode,
    pub color: Color,
    pub color_secondary: Color,
    pub gradient_enabled: bool,
    /// Height scale, 10..=150.
    pub sensitivity: f32,
    /// Height/stroke scale, 0..=200.
    pub intensity: f32,
    /// Multiplier on the computed bar width, 0.5..=5.0.
    pub bar_width: f32,
    pub filter: FilterKind,
    pub show_lyrics: bool,
    pub lyrics_color: Color,
    /// Path to a TTF/OTF font for captions. Captions are skipped when absent
    /// or unloadable.
    pub lyrics_font: Option<PathBuf>,
    /// Caption size in pixels.
    pub lyrics_size: f32,
    pub aspect_ratio: AspectRatio,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            mode: VizMode::Bars,
            // #06b6d4 / #8b5cf6
            color: [0x06, 0xb6, 0xd4, 0xff],
            color_secondary: [0x8b, 0x5c, 0xf6, 0xff],
            gradient_enabled: true,
            sensitivity: 50.0,
            intensity: 100.0,
            bar_width: 1.0,
            filter: FilterKind::None,
            show_lyrics: true,
            lyrics_color: [0xff, 0xff, 0xff, 0xff],
            lyrics_font: None,
            lyrics_size: 52.0,
            aspect_ratio: AspectRatio::Widescreen,
        }
    }
}

impl VisualizerSettings {
    /// Copy with numeric fields clamped to their documented ranges.
    ///
    /// Renderers call this before deriving geometry so no settings extreme can
    /// push a bin index or pixel dimension out of bounds.
    pub fn clamped(&self) -> Self {
        let mut s = self.clone();
        s.sensitivity = s.sensitivity.clamp(10.0, 150.0);
        s.intensity = s.intensity.clamp(0.0, 200.0);
        s.bar_width = s.bar_width.clamp(0.5, 5.0);
        s.lyrics_size = s.lyrics_size.clamp(8.0, 256.0);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#00ff88"), Some([0x00, 0xff, 0x88, 0xff]));
        assert_eq!(parse_hex_color("ffffff"), Some([0xff; 4]));
        assert_eq!(parse_hex_color("#00000080"), Some([0, 0, 0, 0x80]));
        assert_eq!(parse_hex_color("nope"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(VizMode::from_str("BARS"), Some(VizMode::Bars));
        assert_eq!(VizMode::from_str("orb"), Some(VizMode::Circle));
        assert_eq!(VizMode::from_str("sparkles"), None);
    }

    #[test]
    fn test_aspect_resolutions() {
        assert_eq!(AspectRatio::Widescreen.resolution(), (1920, 1080));
        assert_eq!(AspectRatio::Vertical.resolution(), (1080, 1920));
        assert_eq!(AspectRatio::Square.resolution(), (1080, 1080));
    }

    #[test]
    fn test_clamped_ranges() {
        let mut s = VisualizerSettings::default();
        s.sensitivity = 999.0;
        s.intensity = -5.0;
        s.bar_width = 0.0;
        let c = s.clamped();
        assert_eq!(c.sensitivity, 150.0);
        assert_eq!(c.intensity, 0.0);
        assert_eq!(c.bar_width, 0.5);
    }

    #[test]
    fn test_settings_serde_round_trip() {
        let settings = VisualizerSettings {
            mode: VizMode::Symmetry,
            aspect_ratio: AspectRatio::Vertical,
            filter: FilterKind::Dream,
            sensitivity: 75.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let restored: VisualizerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settings);
        // Aspect presets keep their wire names
        assert!(json.contains("9:16"));
    }
}
