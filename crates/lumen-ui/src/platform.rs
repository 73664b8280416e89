//! Platform drawing variants.
//!
//! The squircle view and gradient text each come in two flavours that differ
//! in where the curve lives and how text width is padded:
//! - [`Variant::Canvas`] rebuilds its path during paint, memoized by size
//!   and exponent
//! - [`Variant::Layer`] keeps a slightly oversized mask that is re-applied on
//!   every layout pass

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Variant {
    #[default]
    Canvas,
    Layer,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Canvas => "canvas",
            Variant::Layer => "layer",
        }
    }

    /// Extra width the gradient of a text run spans past the measured text.
    pub fn gradient_padding(self) -> f32 {
        match self {
            Variant::Canvas => 0.0,
            Variant::Layer => 5.0,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canvas" => Ok(Variant::Canvas),
            "layer" => Ok(Variant::Layer),
            other => Err(format!("unknown view variant '{other}' (expected canvas or layer)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Canvas".parse::<Variant>(), Ok(Variant::Canvas));
        assert_eq!(" layer ".parse::<Variant>(), Ok(Variant::Layer));
        assert!("metal".parse::<Variant>().is_err());
    }

    #[test]
    fn only_layer_pads_gradients() {
        assert_eq!(Variant::Canvas.gradient_padding(), 0.0);
        assert_eq!(Variant::Layer.gradient_padding(), 5.0);
    }
}
