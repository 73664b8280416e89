//! The scene's material graphs.

use glam::{Vec2, Vec3};

use crate::graphics::animation::color::Rgb;

use super::node::{GraphError, NodeGraph, NodeRef};

/// `pow(1 - smoothstep(low, high, d), exponent)`.
fn falloff(g: &mut NodeGraph, low: NodeRef, high: NodeRef, d: NodeRef, exponent: f32) -> Result<NodeRef, GraphError> {
    let s = g.smoothstep(low, high, d)?;
    let inv = g.one_minus(s)?;
    let e = g.float(exponent);
    g.pow(inv, e)
}

/// Base two-color ramp along `length(uv)` with two pulsing accent spots.
pub fn gradient(radial1: Vec2, radial2: Vec2, pulse_intensity: f32) -> Result<NodeGraph, GraphError> {
    let mut g = NodeGraph::new();
    let color1 = g.uniform("color1", Rgb::from_hex(0x1a1a2e).to_linear())?;
    let color2 = g.uniform("color2", Rgb::from_hex(0x16213e).to_linear())?;
    let accent1 = g.uniform("accentColor1", Rgb::from_hex(0x41d1ff).to_linear())?;
    let accent2 = g.uniform("accentColor2", Rgb::from_hex(0xbd34fe).to_linear())?;
    let pos1 = g.uniform("radialPos1", radial1)?;
    let pos2 = g.uniform("radialPos2", radial2)?;
    let time = g.uniform("time", 0.0_f32)?;
    let intensity = g.uniform("pulseIntensity", pulse_intensity)?;

    let uv = g.uv();
    let len = g.length(uv)?;
    let base = g.mix(color1, color2, len)?;

    let t = g.scale(time, 0.001)?;
    let s = g.sin(t)?;
    let s = g.scale(s, 0.15)?;
    let pulse = g.offset(s, 0.85)?;

    let zero = g.float(0.0);
    let reach = g.scale(pulse, 0.6)?;
    let d1 = g.distance(uv, pos1)?;
    let r1 = falloff(&mut g, zero, reach, d1, 2.0)?;
    let d2 = g.distance(uv, pos2)?;
    let r2 = falloff(&mut g, zero, reach, d2, 2.0)?;
    let w1 = g.mul(r1, intensity)?;
    let w2 = g.mul(r2, intensity)?;

    let c = g.mix(base, accent1, w1)?;
    let c = g.mix(c, accent2, w2)?;
    let lift1 = g.mul(accent1, w1)?;
    let lift1 = g.scale(lift1, 0.3)?;
    let c = g.add(c, lift1)?;
    let lift2 = g.mul(accent2, w2)?;
    let lift2 = g.scale(lift2, 0.3)?;
    let c = g.add(c, lift2)?;

    let one = g.float(1.0);
    let out = g.vec4(c, one)?;
    g.set_output(out)?;
    Ok(g)
}

/// Thin rim plus soft core around the quad centre; alpha carries the strength.
pub fn glow(color: Rgb, intensity: f32) -> Result<NodeGraph, GraphError> {
    let mut g = NodeGraph::new();
    let glow_color = g.uniform("glowColor", color.to_linear())?;
    let glow_intensity = g.uniform("glowIntensity", intensity)?;

    let uv = g.uv();
    let center = g.vec2(0.5, 0.5);
    let d = g.distance(uv, center)?;

    let (rim_lo, rim_hi) = (g.float(0.48), g.float(0.52));
    let rim = falloff(&mut g, rim_lo, rim_hi, d, 8.0)?;
    let (core_lo, core_hi) = (g.float(0.0), g.float(0.47));
    let core = falloff(&mut g, core_lo, core_hi, d, 4.0)?;

    let rim = g.scale(rim, 0.6)?;
    let core = g.scale(core, 0.3)?;
    let strength = g.max(rim, core)?;
    let alpha = g.mul(strength, glow_intensity)?;
    let out = g.vec4(glow_color, alpha)?;
    g.set_output(out)?;
    Ok(g)
}

/// Diagonal two-color ramp with a slow travelling wave.
pub fn logo_gradient(color1: Rgb, color2: Rgb) -> Result<NodeGraph, GraphError> {
    let mut g = NodeGraph::new();
    let c1 = g.uniform("color1", color1.to_linear())?;
    let c2 = g.uniform("color2", color2.to_linear())?;
    let time = g.uniform("time", 0.0_f32)?;
    let direction = g.uniform("gradientDirection", 0.7_f32)?;

    let uv = g.uv();
    let (u, v) = (g.swizzle(uv, "x")?, g.swizzle(uv, "y")?);
    let along = g.mix(v, u, direction)?;
    let (lo, hi) = (g.float(0.4), g.float(0.8));
    let ramp = g.smoothstep(lo, hi, along)?;

    let phase = g.scale(time, 0.002)?;
    let turn = g.scale(ramp, 6.28318)?;
    let phase = g.add(phase, turn)?;
    let wave = g.sin(phase)?;
    let wave = g.scale(wave, 0.1)?;
    let wave = g.offset(wave, 0.9)?;

    let t = g.mul(ramp, wave)?;
    let color = g.mix(c1, c2, t)?;
    let one = g.float(1.0);
    let out = g.vec4(color, one)?;
    g.set_output(out)?;
    Ok(g)
}

/// Three-stop radial gradient whose radius breathes with `time`.
pub fn gradient_background() -> Result<NodeGraph, GraphError> {
    let mut g = NodeGraph::new();
    let time = g.uniform("time", 0.0_f32)?;
    let center = g.uniform("center", Vec2::new(0.5, 0.5))?;
    let radius = g.uniform("radius", 0.6_f32)?;
    let c1 = g.uniform("color1", Vec3::new(0.2, 0.4, 1.0))?;
    let c2 = g.uniform("color2", Vec3::new(1.0, 0.3, 0.8))?;
    let c3 = g.uniform("color3", Vec3::new(0.1, 0.8, 0.4))?;

    let uv = g.uv();
    let d = g.distance(uv, center)?;
    let t = g.scale(time, 0.001)?;
    let s = g.sin(t)?;
    let s = g.scale(s, 0.1)?;
    let pulse = g.offset(s, 1.0)?;
    let r = g.mul(radius, pulse)?;
    let nd = g.div(d, r)?;

    let (a0, a1) = (g.float(0.0), g.float(0.5));
    let inner = g.smoothstep(a0, a1, nd)?;
    let (b0, b1) = (g.float(0.3), g.float(1.0));
    let outer = g.smoothstep(b0, b1, nd)?;
    let color = g.mix(c1, c2, inner)?;
    let color = g.mix(color, c3, outer)?;
    let one = g.float(1.0);
    let out = g.vec4(color, one)?;
    g.set_output(out)?;
    Ok(g)
}

/// Uniform-free blue-to-purple radial, used when the background graph fails.
pub fn radial_fallback() -> Result<NodeGraph, GraphError> {
    let mut g = NodeGraph::new();
    let uv = g.uv();
    let center = g.vec2(0.5, 0.5);
    let d = g.distance(uv, center)?;
    let (lo, hi) = (g.float(0.0), g.float(0.7));
    let ramp = g.smoothstep(lo, hi, d)?;
    let inner = g.vec3(0.0, 0.5, 1.0);
    let outer = g.vec3(0.2, 0.0, 0.4);
    let color = g.mix(inner, outer, ramp)?;
    let one = g.float(1.0);
    let out = g.vec4(color, one)?;
    g.set_output(out)?;
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::super::codegen::lower;
    use super::*;

    // ── graphs build and lower ────────────────────────────────────────────

    #[test]
    fn every_graph_lowers() {
        let graphs = [
            gradient(Vec2::new(0.3, 0.7), Vec2::new(0.8, 0.2), 0.4),
            glow(Rgb::from_hex(0x4dd0e1), 0.6),
            logo_gradient(Rgb::from_hex(0xbd34fe), Rgb::from_hex(0x41d1ff)),
            gradient_background(),
            radial_fallback(),
        ];
        for g in graphs {
            let (src, _) = lower(&g.unwrap()).unwrap();
            assert!(src.contains("fn shade(uv: vec2<f32>) -> vec4<f32>"));
        }
    }

    #[test]
    fn gradient_uniforms_in_declaration_order() {
        let g = gradient(Vec2::ZERO, Vec2::ONE, 0.4).unwrap();
        let names: Vec<&str> = g.uniforms().names().collect();
        assert_eq!(
            names,
            ["color1", "color2", "accentColor1", "accentColor2", "radialPos1", "radialPos2", "time", "pulseIntensity"]
        );
    }

    #[test]
    fn logo_gradient_reads_uv_components() {
        let (src, _) = lower(&logo_gradient(Rgb::BLACK, Rgb::BLACK).unwrap()).unwrap();
        assert!(src.contains("= uv.x;"));
        assert!(src.contains("= uv.y;"));
        assert!(src.contains("material.gradientDirection"));
    }

    #[test]
    fn radial_fallback_has_no_uniforms() {
        let (src, layout) = lower(&radial_fallback().unwrap()).unwrap();
        assert!(layout.fields().is_empty());
        assert!(src.contains("_unused: vec4<f32>"));
    }
}
