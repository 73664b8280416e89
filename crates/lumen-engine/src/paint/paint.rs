use super::Color;
use super::gradient::LinearGradient;

/// Fill source for 2D geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// First color of the paint, used where only a flat color can be drawn.
    pub fn primary_color(&self) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::LinearGradient(g) => g.stops.first().map_or(Color::transparent(), |s| s.color),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::LinearGradient(g)
    }
}
