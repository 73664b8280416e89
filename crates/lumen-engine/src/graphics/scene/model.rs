//! Model loading behind a trait, plus the built-in logo model.

use glam::{Vec2, Vec3};

use super::SceneError;
use super::geometry::Geometry;
use super::graph::Transform;

/// Name the scene asks the loader for by default.
pub const LOGO_MODEL: &str = "vite.glb";

/// One mesh of a loaded model, in traversal order.
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub geometry: Geometry,
    pub transform: Transform,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    pub parts: Vec<ModelPart>,
}

impl Model {
    pub fn mesh_count(&self) -> usize {
        self.parts.len()
    }
}

pub trait ModelLoader {
    fn load(&self, name: &str) -> Result<Model, SceneError>;
}

/// Serves the procedural logo under [`LOGO_MODEL`] and `"logo"`.
#[derive(Debug, Default, Copy, Clone)]
pub struct BuiltinModelLoader;

impl ModelLoader for BuiltinModelLoader {
    fn load(&self, name: &str) -> Result<Model, SceneError> {
        match name {
            LOGO_MODEL | "logo" => logo_model(),
            other => Err(SceneError::ModelNotFound(other.to_string())),
        }
    }
}

// Outlines in a 410 × 404 design space, y down.
const SHIELD: [(f32, f32); 9] = [
    (399.6, 59.5),
    (215.6, 388.5),
    (207.0, 393.7),
    (198.2, 388.6),
    (10.6, 59.6),
    (21.0, 44.8),
    (205.2, 77.7),
    (208.8, 77.7),
    (389.1, 44.8),
];

const BOLT: [(f32, f32); 18] = [
    (293.0, 1.6),
    (156.8, 28.3),
    (152.8, 32.9),
    (144.4, 174.3),
    (150.5, 179.5),
    (188.4, 170.7),
    (194.4, 176.6),
    (183.2, 231.8),
    (189.5, 237.6),
    (212.9, 230.4),
    (219.3, 236.2),
    (201.4, 322.9),
    (210.5, 326.6),
    (323.5, 102.1),
    (318.0, 94.9),
    (279.0, 102.5),
    (273.3, 96.2),
    (298.7, 7.9),
];

/// Design space to model units: centred, y up, about one unit across.
fn to_model(points: &[(f32, f32)]) -> Vec<Vec2> {
    points
        .iter()
        .map(|&(x, y)| Vec2::new((x - 205.0) / 400.0, (200.0 - y) / 400.0))
        .collect()
}

fn logo_model() -> Result<Model, SceneError> {
    let shield = Geometry::prism(&to_model(&SHIELD), 0.06)?;
    let bolt = Geometry::prism(&to_model(&BOLT), 0.06)?;
    Ok(Model {
        parts: vec![
            ModelPart { name: "shield".into(), geometry: shield, transform: Transform::default() },
            ModelPart {
                name: "bolt".into(),
                geometry: bolt,
                transform: Transform::from_position(Vec3::new(0.0, 0.0, 0.04)),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_logo_has_two_closed_meshes() {
        let model = BuiltinModelLoader.load(LOGO_MODEL).unwrap();
        assert_eq!(model.mesh_count(), 2);
        for part in &model.parts {
            let (lo, hi) = part.geometry.bounds();
            assert!((hi - lo).x < 1.1 && (hi - lo).y < 1.1, "{}", part.name);
            assert!(part.geometry.triangle_count() > 0);
        }
    }

    #[test]
    fn alias_loads_the_same_model() {
        assert_eq!(BuiltinModelLoader.load("logo").unwrap().mesh_count(), 2);
    }

    #[test]
    fn unknown_model_is_not_found() {
        let err = BuiltinModelLoader.load("teapot.glb").unwrap_err();
        assert!(matches!(err, SceneError::ModelNotFound(n) if n == "teapot.glb"));
    }
}
