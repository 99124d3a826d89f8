//! Time-synced caption selection and text overlay.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use imageproc::drawing::{draw_text_mut, text_size};
use log::warn;

use crate::meta::TranscriptionSegment;
use crate::render::Surface;
use crate::settings::VisualizerSettings;

/// Fraction of the surface height the caption baseline sits above the bottom.
const BOTTOM_MARGIN: f32 = 0.12;

/// Pick the segment covering `time`, if any.
///
/// Boundaries are inclusive on both ends. When segments overlap, the one with
/// the earliest start wins; an exact tie goes to whichever appears first in
/// the list, so back-to-back segments hand off at the shared boundary without
/// flicker.
pub fn active_caption(segments: &[TranscriptionSegment], time: f64) -> Option<&TranscriptionSegment> {
    let mut best: Option<&TranscriptionSegment> = None;
    for segment in segments {
        if time < segment.start || time > segment.end {
            continue;
        }
        match best {
            Some(current) if current.start <= segment.start => {}
            _ => best = Some(segment),
        }
    }
    best
}

/// Draws the active caption centered near the bottom of the frame.
///
/// A missing or unloadable font disables drawing rather than failing the
/// frame; caption selection itself does not depend on the font.
pub struct CaptionOverlay {
    font: Option<FontVec>,
}

impl CaptionOverlay {
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Load a TTF/OTF font from disk. Returns whether the font is usable.
    pub fn load_font(&mut self, path: &Path) -> bool {
        self.font = match std::fs::read(path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => Some(font),
                Err(err) => {
                    warn!("caption font {} is not a valid font: {err}", path.display());
                    None
                }
            },
            Err(err) => {
                warn!("failed to read caption font {}: {err}", path.display());
                None
            }
        };
        self.font.is_some()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw the caption active at `time` onto the surface. A no-op when no
    /// segment is active or no font is loaded.
    pub fn draw(
        &self,
        surface: &mut Surface,
        segments: &[TranscriptionSegment],
        time: f64,
        settings: &VisualizerSettings,
    ) {
        let Some(font) = &self.font else {
            return;
        };
        let Some(segment) = active_caption(segments, time) else {
            return;
        };
        let text = segment.text.trim();
        if text.is_empty() {
            return;
        }

        let scale = PxScale::from(settings.lyrics_size.max(1.0));
        let (text_w, text_h) = text_size(scale, font, text);
        let (width, height) = surface.dimensions();

        let x = (width as i32 - text_w as i32) / 2;
        let y = (height as f32 * (1.0 - BOTTOM_MARGIN)) as i32 - text_h as i32;
        draw_text_mut(
            surface.image_mut(),
            image::Rgba(settings.lyrics_color),
            x.max(0),
            y.max(0),
            scale,
            font,
            text,
        );
    }
}

impl Default for CaptionOverlay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, start: f64, end: f64) -> TranscriptionSegment {
        TranscriptionSegment {
            text: text.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_active_caption_inside_window() {
        let segments = vec![segment("fade in", 0.0, 2.0), segment("fade out", 2.0, 4.0)];
        assert_eq!(active_caption(&segments, 1.5).map(|s| s.text.as_str()), Some("fade in"));
        assert_eq!(active_caption(&segments, 2.5).map(|s| s.text.as_str()), Some("fade out"));
    }

    #[test]
    fn test_no_caption_outside_all_windows() {
        let segments = vec![segment("fade in", 0.0, 2.0), segment("fade out", 2.0, 4.0)];
        assert!(active_caption(&segments, 5.0).is_none());
        assert!(active_caption(&segments, -1.0).is_none());
    }

    #[test]
    fn test_boundary_goes_to_earlier_segment() {
        let segments = vec![segment("fade in", 0.0, 2.0), segment("fade out", 2.0, 4.0)];
        assert_eq!(active_caption(&segments, 2.0).map(|s| s.text.as_str()), Some("fade in"));
    }

    #[test]
    fn test_overlap_earliest_start_wins() {
        let segments = vec![segment("late", 1.0, 5.0), segment("early", 0.5, 5.0)];
        assert_eq!(active_caption(&segments, 3.0).map(|s| s.text.as_str()), Some("early"));
    }

    #[test]
    fn test_equal_starts_first_listed_wins() {
        let segments = vec![segment("first", 1.0, 5.0), segment("second", 1.0, 5.0)];
        assert_eq!(active_caption(&segments, 2.0).map(|s| s.text.as_str()), Some("first"));
    }

    #[test]
    fn test_empty_list() {
        assert!(active_caption(&[], 0.0).is_none());
    }

    #[test]
    fn test_draw_without_font_is_noop() {
        let overlay = CaptionOverlay::new();
        let mut surface = Surface::new(64, 64);
        let before = surface.pixels().to_vec();
        overlay.draw(
            &mut surface,
            &[segment("hello", 0.0, 10.0)],
            1.0,
            &VisualizerSettings::default(),
        );
        assert_eq!(surface.pixels(), &before[..]);
    }

    #[test]
    fn test_load_missing_font_reports_false() {
        let mut overlay = CaptionOverlay::new();
        assert!(!overlay.load_font(Path::new("/nonexistent/font.ttf")));
        assert!(!overlay.has_font());
    }

    #[test]
    fn test_load_invalid_font_reports_false() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();
        let mut overlay = CaptionOverlay::new();
        assert!(!overlay.load_font(file.path()));
        assert!(!overlay.has_font());
    }
}
