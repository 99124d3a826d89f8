//! Background placement and compositing.

use image::imageops::{self, FilterType};

use super::asset::BackgroundAsset;
use crate::render::Surface;

/// Alpha of the dark scrim layered over the background for contrast.
const SCRIM_ALPHA: u8 = 128;

/// Cover-fit placement of an asset on a surface, scaled about the center by
/// `pulse` (1.0 = no pulse). The shorter asset axis fills the surface exactly
/// at pulse 1.0; the longer axis overflows and is cropped by the blit.
pub fn cover_placement(
    asset_size: (u32, u32),
    surface_size: (u32, u32),
    pulse: f32,
) -> (i64, i64, u32, u32) {
    let (aw, ah) = (asset_size.0.max(1) as f32, asset_size.1.max(1) as f32);
    let (sw, sh) = (surface_size.0 as f32, surface_size.1 as f32);
    let asset_ratio = aw / ah;
    let surface_ratio = sw / sh;

    let (dw, dh) = if surface_ratio > asset_ratio {
        let dw = sw * pulse;
        (dw, dw / asset_ratio)
    } else {
        let dh = sh * pulse;
        (dh * asset_ratio, dh)
    };

    let dx = ((sw - dw) / 2.0).round() as i64;
    let dy = ((sh - dh) / 2.0).round() as i64;
    (dx, dy, dw.max(1.0) as u32, dh.max(1.0) as u32)
}

/// Draw the asset's frame for `time` behind the visualization, then darken
/// it with a half-black scrim. Not-ready assets draw nothing, leaving the
/// cleared surface visible.
pub fn draw_background(surface: &mut Surface, asset: &BackgroundAsset, time: f64, pulse: f32) {
    if !asset.is_ready() {
        return;
    }
    let Some(frame) = asset.frame_at(time) else {
        return;
    };

    let (dx, dy, dw, dh) = cover_placement(frame.dimensions(), surface.dimensions(), pulse);
    let scaled = imageops::resize(frame, dw, dh, FilterType::Triangle);
    surface.blit(&scaled, dx, dy);

    // The scrim scales the channels down directly instead of alpha-blending
    // black over them, so composed frames stay fully opaque.
    let keep = (255 - SCRIM_ALPHA) as u16;
    for pixel in surface.image_mut().pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [
            (r as u16 * keep / 255) as u8,
            (g as u16 * keep / 255) as u8,
            (b as u16 * keep / 255) as u8,
            a,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_matching_ratio_fills_exactly() {
        let (dx, dy, dw, dh) = cover_placement((160, 90), (1920, 1080), 1.0);
        assert_eq!((dx, dy, dw, dh), (0, 0, 1920, 1080));
    }

    #[test]
    fn test_square_asset_on_widescreen_overflows_vertically() {
        let (dx, dy, dw, dh) = cover_placement((1000, 1000), (1920, 1080), 1.0);
        assert_eq!(dw, 1920);
        assert_eq!(dh, 1920);
        assert_eq!(dx, 0);
        assert_eq!(dy, -420);
    }

    #[test]
    fn test_wide_asset_on_portrait_overflows_horizontally() {
        let (dx, dy, dw, dh) = cover_placement((1920, 1080), (1080, 1920), 1.0);
        assert_eq!(dh, 1920);
        assert!(dw > 1080);
        assert!(dx < 0);
        assert_eq!(dy, 0);
    }

    #[test]
    fn test_pulse_scales_about_center() {
        let (dx, dy, dw, dh) = cover_placement((160, 90), (1920, 1080), 1.04);
        assert_eq!(dw, (1920.0f32 * 1.04) as u32);
        assert_eq!(dh, (1080.0f32 * 1.04) as u32);
        assert!(dx < 0 && dy < 0);
    }

    #[test]
    fn test_not_ready_asset_draws_nothing() {
        let mut surface = Surface::new(16, 16);
        let asset = BackgroundAsset::Video {
            frames: vec![],
            frame_rate: 30.0,
        };
        draw_background(&mut surface, &asset, 0.0, 1.0);
        assert!(surface.pixels().chunks(4).all(|p| p[0] == 0));
    }

    #[test]
    fn test_scrim_darkens_background() {
        let mut surface = Surface::new(8, 8);
        let asset =
            BackgroundAsset::Image(RgbaImage::from_pixel(8, 8, Rgba([200, 200, 200, 255])));
        draw_background(&mut surface, &asset, 0.0, 1.0);
        let [r, _, _, a] = surface.get_pixel(4, 4);
        assert!(r > 80 && r < 120, "scrim should halve brightness, got {r}");
        assert_eq!(a, 255);
        // every pixel stays opaque for the encoder
        assert!(surface.pixels().chunks(4).all(|p| p[3] == 255));
    }
}
