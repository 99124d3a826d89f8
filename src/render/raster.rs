//! Draw-command rasterizer.
//!
//! Executes the retained draw list produced by the visualization modes onto
//! the surface. Flat-painted primitives go through imageproc; gradient fills
//! interpolate per pixel. All geometry is clipped to the surface and
//! degenerate or non-finite shapes are skipped, never a panic.

use image::Rgba;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use super::surface::Surface;
use crate::visuals::{DrawCommand, Paint};

/// Execute a draw list in order.
pub fn execute(surface: &mut Surface, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::FillRect { x, y, w, h, paint } => {
                fill_rect(surface, *x, *y, *w, *h, paint);
            }
            DrawCommand::StrokeLine {
                from,
                to,
                width,
                paint,
            } => {
                stroke_line(surface, *from, *to, *width, paint);
            }
            DrawCommand::StrokePolyline {
                points,
                width,
                paint,
            } => {
                for pair in points.windows(2) {
                    stroke_line(surface, pair[0], pair[1], *width, paint);
                }
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                width,
                paint,
            } => {
                stroke_circle(surface, *center, *radius, *width, paint);
            }
        }
    }
}

fn finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn fill_rect(surface: &mut Surface, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
    if !finite(&[x, y, w, h]) || w <= 0.0 || h <= 0.0 {
        return;
    }

    // Clip to the surface before iterating
    let x0 = x.max(0.0) as i64;
    let y0 = y.max(0.0) as i64;
    let x1 = ((x + w).min(surface.width() as f32)).ceil() as i64;
    let y1 = ((y + h).min(surface.height() as f32)).ceil() as i64;
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    match paint {
        Paint::Flat(color) if color[3] == 255 => {
            let rect = Rect::at(x0 as i32, y0 as i32)
                .of_size((x1 - x0) as u32, (y1 - y0) as u32);
            draw_filled_rect_mut(surface.image_mut(), rect, Rgba(*color));
        }
        _ => {
            for py in y0..y1 {
                for px in x0..x1 {
                    let color = paint.at(px as f32 + 0.5, py as f32 + 0.5);
                    surface.blend_pixel(px, py, color);
                }
            }
        }
    }
}

fn stroke_line(
    surface: &mut Surface,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    paint: &Paint,
) {
    if !finite(&[from.0, from.1, to.0, to.1, width]) || width <= 0.0 {
        return;
    }

    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let length = (dx * dx + dy * dy).sqrt();
    if length < f32::EPSILON {
        return;
    }

    if width <= 1.5 {
        if let Paint::Flat(color) = paint {
            draw_line_segment_mut(surface.image_mut(), from, to, Rgba(*color));
            return;
        }
    }

    // Stamp perpendicular spans along the segment; half-pixel steps leave no
    // gaps at any angle.
    let (nx, ny) = (-dy / length, dx / length);
    let steps = (length * 2.0).ceil() as u32;
    let half_spans = (width).ceil() as i32;

    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let cx = from.0 + dx * t;
        let cy = from.1 + dy * t;
        let color = paint.at(cx, cy);
        for span in -half_spans..=half_spans {
            let offset = span as f32 * 0.5;
            if offset.abs() > width / 2.0 {
                continue;
            }
            let px = (cx + nx * offset).round() as i64;
            let py = (cy + ny * offset).round() as i64;
            surface.blend_pixel(px, py, color);
        }
    }
}

fn stroke_circle(
    surface: &mut Surface,
    center: (f32, f32),
    radius: f32,
    width: f32,
    paint: &Paint,
) {
    if !finite(&[center.0, center.1, radius, width]) || radius <= 0.0 || width <= 0.0 {
        return;
    }

    let color = paint.at(center.0, center.1);
    let r0 = (radius - width / 2.0).max(1.0).round() as i32;
    let r1 = (radius + width / 2.0).round() as i32;
    let cx = center.0.round() as i32;
    let cy = center.1.round() as i32;

    // Adjacent integer radii cover the annulus without visible gaps
    for r in r0..=r1 {
        draw_hollow_circle_mut(surface.image_mut(), (cx, cy), r, Rgba(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_non_black(surface: &Surface) -> usize {
        surface
            .pixels()
            .chunks(4)
            .filter(|p| p[0] != 0 || p[1] != 0 || p[2] != 0)
            .count()
    }

    #[test]
    fn test_fill_rect_flat() {
        let mut surface = Surface::new(10, 10);
        execute(
            &mut surface,
            &[DrawCommand::FillRect {
                x: 2.0,
                y: 2.0,
                w: 3.0,
                h: 3.0,
                paint: Paint::Flat([255, 0, 0, 255]),
            }],
        );
        assert_eq!(surface.get_pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(surface.get_pixel(4, 4), [255, 0, 0, 255]);
        assert_eq!(surface.get_pixel(5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn test_fill_rect_clips_to_surface() {
        let mut surface = Surface::new(8, 8);
        execute(
            &mut surface,
            &[DrawCommand::FillRect {
                x: -100.0,
                y: -100.0,
                w: 1000.0,
                h: 1000.0,
                paint: Paint::Flat([0, 255, 0, 255]),
            }],
        );
        assert_eq!(count_non_black(&surface), 64);
    }

    #[test]
    fn test_degenerate_commands_are_skipped() {
        let mut surface = Surface::new(8, 8);
        execute(
            &mut surface,
            &[
                DrawCommand::FillRect {
                    x: f32::NAN,
                    y: 0.0,
                    w: 4.0,
                    h: 4.0,
                    paint: Paint::Flat([255; 4]),
                },
                DrawCommand::FillRect {
                    x: 0.0,
                    y: 0.0,
                    w: 0.0,
                    h: 4.0,
                    paint: Paint::Flat([255; 4]),
                },
                DrawCommand::StrokeLine {
                    from: (1.0, 1.0),
                    to: (1.0, 1.0),
                    width: 2.0,
                    paint: Paint::Flat([255; 4]),
                },
                DrawCommand::StrokeCircle {
                    center: (4.0, 4.0),
                    radius: -1.0,
                    width: 2.0,
                    paint: Paint::Flat([255; 4]),
                },
            ],
        );
        assert_eq!(count_non_black(&surface), 0);
    }

    #[test]
    fn test_gradient_rect_varies_along_axis() {
        let mut surface = Surface::new(1, 100);
        execute(
            &mut surface,
            &[DrawCommand::FillRect {
                x: 0.0,
                y: 0.0,
                w: 1.0,
                h: 100.0,
                paint: Paint::Linear {
                    from: (0.0, 100.0),
                    to: (0.0, 0.0),
                    start: [0, 0, 0, 255],
                    end: [255, 255, 255, 255],
                },
            }],
        );
        let bottom = surface.get_pixel(0, 99);
        let top = surface.get_pixel(0, 0);
        assert!(top[0] > 240, "top {top:?}");
        assert!(bottom[0] < 15, "bottom {bottom:?}");
    }

    #[test]
    fn test_thick_line_covers_width() {
        let mut surface = Surface::new(20, 20);
        execute(
            &mut surface,
            &[DrawCommand::StrokeLine {
                from: (0.0, 10.0),
                to: (19.0, 10.0),
                width: 6.0,
                paint: Paint::Flat([0, 0, 255, 255]),
            }],
        );
        assert_eq!(surface.get_pixel(10, 10), [0, 0, 255, 255]);
        assert_eq!(surface.get_pixel(10, 8), [0, 0, 255, 255]);
        assert_eq!(surface.get_pixel(10, 12), [0, 0, 255, 255]);
        assert_eq!(surface.get_pixel(10, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn test_circle_stroke_hits_ring_not_center() {
        let mut surface = Surface::new(40, 40);
        execute(
            &mut surface,
            &[DrawCommand::StrokeCircle {
                center: (20.0, 20.0),
                radius: 10.0,
                width: 2.0,
                paint: Paint::Flat([255, 255, 0, 255]),
            }],
        );
        assert_eq!(surface.get_pixel(30, 20), [255, 255, 0, 255]);
        assert_eq!(surface.get_pixel(20, 20), [0, 0, 0, 255]);
    }

    #[test]
    fn test_polyline_draws_segments() {
        let mut surface = Surface::new(10, 10);
        execute(
            &mut surface,
            &[DrawCommand::StrokePolyline {
                points: vec![(0.0, 5.0), (5.0, 5.0), (5.0, 9.0)],
                width: 1.0,
                paint: Paint::Flat([255, 0, 255, 255]),
            }],
        );
        assert_eq!(surface.get_pixel(2, 5), [255, 0, 255, 255]);
        assert_eq!(surface.get_pixel(5, 7), [255, 0, 255, 255]);
    }
}
