use crate::coords::Vec2;

use super::Color;

/// A single gradient stop; `t` is the position along the gradient axis in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient in logical pixel space, clamped outside `[start, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops }
    }

    /// Evenly spaced stops from `colors` along `start → end`.
    pub fn evenly_spaced(start: Vec2, end: Vec2, colors: &[Color]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, c)| ColorStop::new(i as f32 / last, *c))
            .collect();
        Self { start, end, stops }
    }

    /// Horizontal two-or-more stop gradient spanning `width` from `x`.
    pub fn horizontal(x: f32, width: f32, colors: &[Color]) -> Self {
        Self::evenly_spaced(Vec2::new(x, 0.0), Vec2::new(x + width, 0.0), colors)
    }

    /// True when the gradient has at least two stops and a non-degenerate axis.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.len() >= 2
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.start != self.end
    }

    /// Color at `p`, projected onto the axis and clamped (two-stop evaluation).
    pub fn sample(&self, p: Vec2) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::transparent();
        };
        let axis = self.end - self.start;
        let len2 = axis.x * axis.x + axis.y * axis.y;
        if len2 <= f32::EPSILON {
            return first.color;
        }
        let rel = p - self.start;
        let t = ((rel.x * axis.x + rel.y * axis.y) / len2).clamp(0.0, 1.0);
        first.color.lerp(last.color, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_straight(1.0, 0.0, 0.0, 1.0)
    }

    fn blue() -> Color {
        Color::from_straight(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn horizontal_spans_width() {
        let g = LinearGradient::horizontal(10.0, 100.0, &[red(), blue()]);
        assert_eq!(g.start, Vec2::new(10.0, 0.0));
        assert_eq!(g.end, Vec2::new(110.0, 0.0));
        assert_eq!(g.stops[0].t, 0.0);
        assert_eq!(g.stops[1].t, 1.0);
        assert!(g.is_valid());
    }

    #[test]
    fn sample_clamps_outside_axis() {
        let g = LinearGradient::horizontal(0.0, 100.0, &[red(), blue()]);
        assert_eq!(g.sample(Vec2::new(-50.0, 3.0)), red());
        assert_eq!(g.sample(Vec2::new(500.0, 3.0)), blue());
        let mid = g.sample(Vec2::new(50.0, 0.0));
        assert!((mid.r - 0.5).abs() < 1e-6 && (mid.b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn single_stop_is_invalid() {
        let g = LinearGradient::horizontal(0.0, 10.0, &[red()]);
        assert!(!g.is_valid());
    }
}
