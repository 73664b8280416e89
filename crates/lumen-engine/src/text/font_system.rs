use crate::coords::Vec2;

/// Failure to parse font bytes.
#[derive(Debug, Clone, thiserror::Error)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// Handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl FontId {
    /// Id of the `index`-th font loaded into a system. Ids that were never
    /// loaded measure as one empty line and draw nothing.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// Loaded fonts, shared by text measurement and the text renderer.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TrueType or OpenType font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {id:?}");
        Ok(id)
    }

    /// Reads and parses a font file.
    pub fn load_font_file(&mut self, path: &std::path::Path) -> Result<FontId, FontLoadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| FontLoadError(format!("{}: {e}", path.display())))?;
        self.load_font(&bytes)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// `(width, height)` of laid-out text in logical pixels.
    ///
    /// Unknown fonts and empty strings measure as zero width and one line high.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32, max_width: Option<f32>) -> Vec2 {
        self.measure_text_scaled(text, id, size, max_width, 1.0)
    }

    /// Measures at `size * scale` and converts back to logical pixels, so the
    /// result matches glyph positions rasterized at that scale.
    #[must_use]
    pub fn measure_text_scaled(
        &self,
        text: &str,
        id: FontId,
        size: f32,
        max_width: Option<f32>,
        scale: f32,
    ) -> Vec2 {
        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

        let line = Vec2::new(0.0, size * 1.2);
        let Some(font) = self.get(id) else {
            return line;
        };

        let scale = scale.max(0.01);
        let px = size * scale;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            max_width: max_width.map(|w| w * scale),
            ..LayoutSettings::default()
        });
        layout.append(&[font], &TextStyle::new(text, px, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return line;
        }

        // Pen extent, not bitmap extent: fontdue wraps on advance width.
        let width = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let height = glyphs
            .iter()
            .map(|g| g.y + g.height as f32)
            .fold(px, f32::max);
        Vec2::new(width / scale, height / scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_measures_one_empty_line() {
        let fonts = FontSystem::new();
        let size = fonts.measure_text("hello", FontId(3), 20.0, None);
        assert_eq!(size, Vec2::new(0.0, 24.0));
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
        assert!(fonts.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font_file(std::path::Path::new("/no/such/font.ttf")).unwrap_err();
        assert!(err.to_string().contains("/no/such/font.ttf"));
    }
}
