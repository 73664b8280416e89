//! Superellipse ("squircle") clipping container.
//!
//! [`superellipse_points`] is the shared math. [`SquircleView`] clips its
//! child to the curve and strokes an optional inset border on top, backed by
//! one of two geometry strategies:
//! - [`CanvasSquircle`]: path rebuilt in the paint pass, memoized by size and
//!   exponent
//! - [`LayerMask`]: oversized mask rebuilt on every layout

mod canvas;
mod layer;
mod view;

pub use canvas::CanvasSquircle;
pub use layer::{LayerMask, MASK_OUTSET};
pub use view::{SquircleProps, SquircleView, BASE_CORNER_SMOOTHING, DEFAULT_BORDER_COLOR, VARIANT_CORNER_SMOOTHING};

use std::f32::consts::TAU;

use lumen_engine::coords::Vec2;

/// Smallest exponent accepted; anything lower is raised to it.
pub const MIN_EXPONENT: f32 = 0.01;

/// Exponent used in place of a non-finite one.
pub const FALLBACK_EXPONENT: f32 = 4.0;

/// Boundary samples per curve.
pub const STEPS: usize = 50;

/// `steps + 1` points of the superellipse of exponent `n` inscribed in a
/// `width × height` box with its top-left corner at the origin.
///
/// Angles are sampled uniformly over `[0, 2π]`, so the last point closes the
/// loop onto the first. `n = 2` is an ellipse; larger `n` approaches the
/// rectangle. Empty when either side is not positive.
pub fn superellipse_points(width: f32, height: f32, n: f32, steps: usize) -> Vec<Vec2> {
    if !(width > 0.0 && height > 0.0) {
        return Vec::new();
    }
    let p = 2.0 / clamp_exponent(n);
    let (a, b) = (width * 0.5, height * 0.5);

    let denom = steps.max(1) as f32;
    (0..=steps)
        .map(|i| {
            let theta = TAU * i as f32 / denom;
            let (sin, cos) = theta.sin_cos();
            let (sin, cos) = (snap(sin), snap(cos));
            Vec2::new(a + a * sign(cos) * cos.abs().powf(p), b + b * sign(sin) * sin.abs().powf(p))
        })
        .collect()
}

/// Exponent actually drawn for `n`: non-finite values become
/// [`FALLBACK_EXPONENT`], then the result is raised to [`MIN_EXPONENT`].
pub fn clamp_exponent(n: f32) -> f32 {
    let n = if n.is_finite() { n } else { FALLBACK_EXPONENT };
    n.max(MIN_EXPONENT)
}

/// Like `signum`, but zero stays zero.
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Rounding noise near the axes is raised to a large power by `2/n`; zero it
/// so the loop closes and the axis points land on the box edges.
fn snap(v: f32) -> f32 {
    if v.abs() < 1e-6 { 0.0 } else { v }
}

/// Outline and border of one squircle, relative to its box origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquirclePath {
    /// Clip and background curve.
    pub outline: Vec<Vec2>,
    /// Border curve, inset by half the stroke width so the stroke stays
    /// inside the outline. Empty without a border.
    pub border: Vec<Vec2>,
}

impl SquirclePath {
    /// Builds both curves for a `size` box. The outline box may be larger
    /// than the view (see [`LayerMask`]); the border always follows `size`.
    fn build(outline_origin: Vec2, outline_size: Vec2, size: Vec2, n: f32, border_width: f32) -> Self {
        let outline = offset(superellipse_points(outline_size.x, outline_size.y, n, STEPS), outline_origin);
        let border = if border_width > 0.0 {
            let half = border_width * 0.5;
            offset(
                superellipse_points(size.x - border_width, size.y - border_width, n, STEPS),
                Vec2::new(half, half),
            )
        } else {
            Vec::new()
        };
        Self { outline, border }
    }
}

/// Moves every point by `by`.
pub fn offset(mut points: Vec<Vec2>, by: Vec2) -> Vec<Vec2> {
    if by != Vec2::zero() {
        for p in &mut points {
            *p = *p + by;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    // ── superellipse_points ───────────────────────────────────────────────

    #[test]
    fn returns_steps_plus_one_closed_points() {
        for steps in [4, 50, 97] {
            let pts = superellipse_points(120.0, 80.0, 4.0, steps);
            assert_eq!(pts.len(), steps + 1);
            let (first, last) = (pts[0], pts[steps]);
            assert!(close(first.x, last.x) && close(first.y, last.y), "{first:?} vs {last:?}");
        }
    }

    #[test]
    fn loop_closes_at_high_exponents() {
        let pts = superellipse_points(80.0, 80.0, 40.0, 50);
        assert_eq!(pts[0], pts[50]);
        assert_eq!(pts[0], Vec2::new(80.0, 40.0));
    }

    #[test]
    fn empty_for_degenerate_box() {
        assert!(superellipse_points(0.0, 10.0, 4.0, 50).is_empty());
        assert!(superellipse_points(10.0, -1.0, 4.0, 50).is_empty());
        assert!(superellipse_points(f32::NAN, 10.0, 4.0, 50).is_empty());
    }

    #[test]
    fn exponent_two_is_the_inscribed_ellipse() {
        let (w, h) = (200.0, 100.0);
        for p in superellipse_points(w, h, 2.0, 64) {
            let nx = (p.x - w / 2.0) / (w / 2.0);
            let ny = (p.y - h / 2.0) / (h / 2.0);
            assert!((nx * nx + ny * ny - 1.0).abs() < 1e-3, "{p:?}");
        }
    }

    #[test]
    fn stays_inside_the_box() {
        for n in [0.5, 2.0, 4.0, 8.0, 40.0] {
            for p in superellipse_points(60.0, 30.0, n, 50) {
                assert!(p.x >= -1e-3 && p.x <= 60.0 + 1e-3, "n={n} {p:?}");
                assert!(p.y >= -1e-3 && p.y <= 30.0 + 1e-3, "n={n} {p:?}");
            }
        }
    }

    #[test]
    fn larger_exponent_fills_the_corner() {
        // Point at 45°: further out toward the box corner as n grows.
        let diag = |n: f32| superellipse_points(100.0, 100.0, n, 8)[1];
        assert!(diag(8.0).x > diag(4.0).x);
        assert!(diag(4.0).x > diag(2.0).x);
    }

    #[test]
    fn tiny_exponent_is_clamped() {
        let a = superellipse_points(10.0, 10.0, 0.0, 8);
        let b = superellipse_points(10.0, 10.0, MIN_EXPONENT, 8);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn non_finite_exponent_draws_the_default_curve() {
        let expected = superellipse_points(40.0, 20.0, FALLBACK_EXPONENT, 16);
        for n in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(superellipse_points(40.0, 20.0, n, 16), expected, "n = {n}");
        }
        assert_eq!(clamp_exponent(f32::NAN), 4.0);
        assert_eq!(clamp_exponent(-3.0), MIN_EXPONENT);
    }

    #[test]
    fn axis_points_stay_on_the_edge_midpoints() {
        // Quarter turns land exactly on the axes for any exponent.
        let pts = superellipse_points(40.0, 20.0, 1.0e30, 4);
        assert!(close(pts[0].x, 40.0) && close(pts[0].y, 10.0));
        assert!(close(pts[1].x, 20.0) && close(pts[1].y, 20.0));
        assert!(close(pts[2].x, 0.0) && close(pts[2].y, 10.0));
        assert!(close(pts[3].x, 20.0) && close(pts[3].y, 0.0));
    }

    #[test]
    fn zero_steps_yields_one_point() {
        assert_eq!(superellipse_points(10.0, 10.0, 4.0, 0), [Vec2::new(10.0, 5.0)]);
    }

    // ── SquirclePath ──────────────────────────────────────────────────────

    #[test]
    fn border_is_inset_by_half_the_stroke() {
        let size = Vec2::new(100.0, 50.0);
        let path = SquirclePath::build(Vec2::zero(), size, size, 4.0, 4.0);
        assert_eq!(path.outline.len(), STEPS + 1);
        assert_eq!(path.border.len(), STEPS + 1);
        // θ = 0 sits on the right edge.
        assert!(close(path.outline[0].x, 100.0));
        assert!(close(path.border[0].x, 98.0));
        assert!(close(path.border[0].y, 25.0));
    }

    #[test]
    fn no_border_without_width() {
        let size = Vec2::new(10.0, 10.0);
        assert!(SquirclePath::build(Vec2::zero(), size, size, 4.0, 0.0).border.is_empty());
    }
}
