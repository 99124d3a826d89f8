//! Whole-frame color filters applied after composition.

use image::{imageops, Rgba, RgbaImage};

use crate::settings::FilterKind;

/// Apply a filter in place. `FilterKind::None` leaves the frame untouched.
pub fn apply_filter(kind: FilterKind, frame: &mut RgbaImage) {
    match kind {
        FilterKind::None => {}
        FilterKind::Noir => map_pixels(frame, |[r, g, b]| {
            let gray = luma(r, g, b);
            let v = contrast(gray * 0.75, 1.25);
            [v, v, v]
        }),
        FilterKind::Vintage => map_pixels(frame, |[r, g, b]| {
            let sr = 0.393 * r + 0.769 * g + 0.189 * b;
            let sg = 0.349 * r + 0.686 * g + 0.168 * b;
            let sb = 0.272 * r + 0.534 * g + 0.131 * b;
            [sr * 0.9, sg * 0.9, sb * 0.9]
        }),
        FilterKind::Muted => map_pixels(frame, |rgb| {
            let [r, g, b] = saturate(rgb, 0.5);
            [contrast(r, 0.75), contrast(g, 0.75), contrast(b, 0.75)]
        }),
        FilterKind::Hyper => map_pixels(frame, |rgb| saturate(rgb, 2.0)),
        FilterKind::Dream => {
            *frame = imageops::blur(frame, 2.0);
            map_pixels(frame, |[r, g, b]| [r * 0.8, g * 0.8, b * 0.8]);
        }
    }
}

fn map_pixels(frame: &mut RgbaImage, f: impl Fn([f32; 3]) -> [f32; 3]) {
    for pixel in frame.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let [nr, ng, nb] = f([r as f32, g as f32, b as f32]);
        *pixel = Rgba([clamp_u8(nr), clamp_u8(ng), clamp_u8(nb), a]);
    }
}

fn clamp_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Lerp each channel toward (s < 1) or away from (s > 1) the pixel's luma.
fn saturate([r, g, b]: [f32; 3], s: f32) -> [f32; 3] {
    let l = luma(r, g, b);
    [l + (r - l) * s, l + (g - l) * s, l + (b - l) * s]
}

fn contrast(v: f32, k: f32) -> f32 {
    (v - 128.0) * k + 128.0
}
