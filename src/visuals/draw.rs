//! Retained draw list shared by all visualization modes.

use crate::settings::Color;

/// Fill/stroke style for a draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Single flat color.
    Flat(Color),
    /// Two-stop linear gradient along `from`..`to`.
    Linear {
        from: (f32, f32),
        to: (f32, f32),
        start: Color,
        end: Color,
    },
}

impl Paint {
    /// Color at a pixel, projecting onto the gradient axis for `Linear`.
    pub fn at(&self, x: f32, y: f32) -> Color {
        match self {
            Paint::Flat(c) => *c,
            Paint::Linear {
                from,
                to,
                start,
                end,
            } => {
                let axis = (to.0 - from.0, to.1 - from.1);
                let len_sq = axis.0 * axis.0 + axis.1 * axis.1;
                if len_sq <= f32::EPSILON {
                    return *start;
                }
                let t = ((x - from.0) * axis.0 + (y - from.1) * axis.1) / len_sq;
                lerp_color(*start, *end, t.clamp(0.0, 1.0))
            }
        }
    }
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    }
    out
}

/// One drawing operation on the render surface.
///
/// Coordinates are surface pixels; the rasterizer clips to the surface
/// bounds and skips degenerate geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        paint: Paint,
    },
    StrokeLine {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        paint: Paint,
    },
    StrokePolyline {
        points: Vec<(f32, f32)>,
        width: f32,
        paint: Paint,
    },
    StrokeCircle {
        center: (f32, f32),
        radius: f32,
        width: f32,
        paint: Paint,
    },
}

impl DrawCommand {
    pub fn paint(&self) -> &Paint {
        match self {
            DrawCommand::FillRect { paint, .. }
            | DrawCommand::StrokeLine { paint, .. }
            | DrawCommand::StrokePolyline { paint, .. }
            | DrawCommand::StrokeCircle { paint, .. } => paint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_paint_everywhere() {
        let paint = Paint::Flat([1, 2, 3, 4]);
        assert_eq!(paint.at(0.0, 0.0), [1, 2, 3, 4]);
        assert_eq!(paint.at(500.0, -30.0), [1, 2, 3, 4]);
    }

    #[test]
    fn test_gradient_endpoints_exact() {
        let paint = Paint::Linear {
            from: (0.0, 100.0),
            to: (0.0, 0.0),
            start: [0, 0, 0, 255],
            end: [255, 255, 255, 255],
        };
        assert_eq!(paint.at(0.0, 100.0), [0, 0, 0, 255]);
        assert_eq!(paint.at(0.0, 0.0), [255, 255, 255, 255]);
        // Off-axis positions project onto the axis
        assert_eq!(paint.at(50.0, 100.0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_gradient_midpoint() {
        let paint = Paint::Linear {
            from: (0.0, 0.0),
            to: (100.0, 0.0),
            start: [0, 0, 0, 255],
            end: [200, 100, 50, 255],
        };
        assert_eq!(paint.at(50.0, 0.0), [100, 50, 25, 255]);
    }

    #[test]
    fn test_gradient_clamps_outside_span() {
        let paint = Paint::Linear {
            from: (0.0, 0.0),
            to: (10.0, 0.0),
            start: [10, 10, 10, 255],
            end: [20, 20, 20, 255],
        };
        assert_eq!(paint.at(-50.0, 0.0), [10, 10, 10, 255]);
        assert_eq!(paint.at(999.0, 0.0), [20, 20, 20, 255]);
    }

    #[test]
    fn test_degenerate_gradient_uses_start() {
        let paint = Paint::Linear {
            from: (5.0, 5.0),
            to: (5.0, 5.0),
            start: [1, 1, 1, 255],
            end: [9, 9, 9, 255],
        };
        assert_eq!(paint.at(0.0, 0.0), [1, 1, 1, 255]);
    }
}
