//! The authored keyframe table.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::color::{Rgb, Rgba, lerp};

/// One authored pose of the logo and its background.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnimationState {
    /// Euler angles (radians, XYZ order).
    pub rotation: Vec3,
    /// Uniform scale applied to all three axes.
    pub scale: f32,
    pub position: Vec3,
    pub base_color1: Rgb,
    pub base_color2: Rgb,
    pub accent_color1: Rgba,
    pub accent_color2: Rgba,
    pub pulse_intensity: f32,
    /// Radial gradient focus points in UV space.
    pub radial_pos1: Vec2,
    pub radial_pos2: Vec2,
}

impl AnimationState {
    /// Field-wise interpolation. Base colors round per channel; accents keep
    /// fractional channels and alpha.
    pub fn lerp(&self, other: &AnimationState, t: f32) -> AnimationState {
        AnimationState {
            rotation: self.rotation.lerp(other.rotation, t),
            scale: lerp(self.scale, other.scale, t),
            position: self.position.lerp(other.position, t),
            base_color1: self.base_color1.lerp(other.base_color1, t),
            base_color2: self.base_color2.lerp(other.base_color2, t),
            accent_color1: self.accent_color1.lerp(other.accent_color1, t),
            accent_color2: self.accent_color2.lerp(other.accent_color2, t),
            pulse_intensity: lerp(self.pulse_intensity, other.pulse_intensity, t),
            radial_pos1: self.radial_pos1.lerp(other.radial_pos1, t),
            radial_pos2: self.radial_pos2.lerp(other.radial_pos2, t),
        }
    }
}

const INTRO_ACCENT_1: Rgba = Rgba::new(65.0, 209.0, 255.0, 1.0);
const INTRO_ACCENT_2: Rgba = Rgba::new(189.0, 52.0, 254.0, 1.0);

/// Scroll-driven sequence, first to last.
pub static KEYFRAMES: [AnimationState; 7] = [
    AnimationState {
        rotation: Vec3::new(0.8, -TAU - 1.0, -0.2),
        scale: 4.0,
        position: Vec3::new(-0.5, 2.0, 0.5),
        base_color1: Rgb::from_hex(0x0f0f23),
        base_color2: Rgb::from_hex(0x1a1a2e),
        accent_color1: Rgba::new(41.0, 128.0, 185.0, 0.8),
        accent_color2: Rgba::new(142.0, 68.0, 173.0, 0.6),
        pulse_intensity: 0.05,
        radial_pos1: Vec2::new(0.1, 0.1),
        radial_pos2: Vec2::new(0.9, 0.9),
    },
    AnimationState {
        rotation: Vec3::new(0.4, -TAU, 0.0),
        scale: 6.5,
        position: Vec3::new(0.0, 1.25, 0.0),
        base_color1: Rgb::from_hex(0x1a1a2e),
        base_color2: Rgb::from_hex(0x16213e),
        accent_color1: INTRO_ACCENT_1,
        accent_color2: INTRO_ACCENT_2,
        pulse_intensity: 0.15,
        radial_pos1: Vec2::new(0.25, 0.3),
        radial_pos2: Vec2::new(0.75, 0.7),
    },
    AnimationState {
        rotation: Vec3::new(0.0, 1.0, 0.0),
        scale: 12.0,
        position: Vec3::new(-0.2, 0.0, 0.0),
        base_color1: Rgb::from_hex(0x1a1a2e),
        base_color2: Rgb::from_hex(0x16213e),
        accent_color1: INTRO_ACCENT_1,
        accent_color2: INTRO_ACCENT_2,
        pulse_intensity: 0.1,
        radial_pos1: Vec2::new(0.15, 0.2),
        radial_pos2: Vec2::new(0.85, 0.8),
    },
    AnimationState {
        rotation: Vec3::new(0.0, -1.0, 0.4),
        scale: 5.0,
        position: Vec3::new(0.2, 0.1, 0.0),
        base_color1: Rgb::from_hex(0x667eea),
        base_color2: Rgb::from_hex(0x764ba2),
        accent_color1: Rgba::new(255.0, 255.0, 255.0, 0.1),
        accent_color2: Rgba::new(255.0, 255.0, 255.0, 0.1),
        pulse_intensity: 0.25,
        radial_pos1: Vec2::new(0.3, 0.15),
        radial_pos2: Vec2::new(0.7, 0.85),
    },
    AnimationState {
        rotation: Vec3::new(0.0, -TAU, 0.0),
        scale: 10.0,
        position: Vec3::new(0.0, 0.0, 0.0),
        base_color1: Rgb::from_hex(0x1e3c72),
        base_color2: Rgb::from_hex(0x2a5298),
        accent_color1: Rgba::new(65.0, 209.0, 255.0, 0.2),
        accent_color2: Rgba::new(189.0, 52.0, 254.0, 0.12),
        pulse_intensity: 0.4,
        radial_pos1: Vec2::new(0.35, 0.65),
        radial_pos2: Vec2::new(0.65, 0.35),
    },
    AnimationState {
        rotation: Vec3::new(TAU + 0.4, 0.0, 0.0),
        scale: 8.0,
        position: Vec3::new(0.0, 1.2, 0.0),
        base_color1: Rgb::from_hex(0x434343),
        base_color2: Rgb::from_hex(0x000000),
        accent_color1: Rgba::new(128.0, 128.0, 128.0, 0.2),
        accent_color2: Rgba::new(188.0, 188.0, 188.0, 0.05),
        pulse_intensity: 0.5,
        radial_pos1: Vec2::new(0.3, 0.7),
        radial_pos2: Vec2::new(0.7, 0.3),
    },
    AnimationState {
        rotation: Vec3::new(TAU + 0.8, 1.0, 0.3),
        scale: 12.0,
        position: Vec3::new(0.5, 0.5, -0.5),
        base_color1: Rgb::from_hex(0x2c1810),
        base_color2: Rgb::from_hex(0x1a1a1a),
        accent_color1: Rgba::new(255.0, 165.0, 0.0, 0.4),
        accent_color2: Rgba::new(255.0, 69.0, 0.0, 0.3),
        pulse_intensity: 0.7,
        radial_pos1: Vec2::new(0.8, 0.2),
        radial_pos2: Vec2::new(0.2, 0.8),
    },
];
