//! Background asset types.

use image::RgbaImage;

/// A decoded background ready for compositing.
pub enum BackgroundAsset {
    /// A still image, drawn identically every frame.
    Image(RgbaImage),
    /// A short decoded clip, looped over the playback clock.
    Video {
        frames: Vec<RgbaImage>,
        frame_rate: f32,
    },
}

impl BackgroundAsset {
    /// Whether the asset has any pixels to draw.
    pub fn is_ready(&self) -> bool {
        match self {
            BackgroundAsset::Image(image) => image.width() > 0 && image.height() > 0,
            BackgroundAsset::Video { frames, frame_rate } => {
                !frames.is_empty() && *frame_rate > 0.0
            }
        }
    }

    /// The frame to show at playback time `time`, looping video clips.
    pub fn frame_at(&self, time: f64) -> Option<&RgbaImage> {
        match self {
            BackgroundAsset::Image(image) => Some(image),
            BackgroundAsset::Video { frames, frame_rate } => {
                if frames.is_empty() || *frame_rate <= 0.0 {
                    return None;
                }
                let index = (time.max(0.0) * *frame_rate as f64) as usize % frames.len();
                frames.get(index)
            }
        }
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frame_at(0.0).map(|f| f.dimensions())
    }
}
