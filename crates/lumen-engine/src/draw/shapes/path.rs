use crate::coords::Vec2;
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Paint;

use super::Stroke;

/// How a closed path is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStyle {
    /// Filled as a fan around the point centroid. Intended for star-shaped
    /// outlines such as superellipses.
    Fill(Paint),
    /// Outline of the given width, centered on the path.
    Stroke(Stroke),
}

/// Closed polyline draw payload. The last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCmd {
    pub points: Vec<Vec2>,
    pub style: PathStyle,
}

impl DrawList {
    /// Records a filled closed path. Fewer than three points records nothing.
    pub fn push_fill_path(&mut self, z: ZIndex, points: Vec<Vec2>, paint: Paint) {
        if points.len() < 3 {
            return;
        }
        self.push(z, DrawCmd::Path(PathCmd { points, style: PathStyle::Fill(paint) }));
    }

    /// Records a stroked closed path. Zero or negative widths record nothing.
    pub fn push_stroke_path(&mut self, z: ZIndex, points: Vec<Vec2>, stroke: Stroke) {
        if points.len() < 2 || !(stroke.width > 0.0) {
            return;
        }
        self.push(z, DrawCmd::Path(PathCmd { points, style: PathStyle::Stroke(stroke) }));
    }
}
