//! Named material uniforms and their GPU block layout.

use glam::{Vec2, Vec3, Vec4};

use super::MaterialError;

/// WGSL type of a uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl UniformKind {
    pub fn wgsl_type(self) -> &'static str {
        match self {
            UniformKind::Float => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec3 => "vec3<f32>",
            UniformKind::Vec4 => "vec4<f32>",
        }
    }

    /// Accepts both the long and the `vecNf` short spellings.
    pub fn from_wgsl(ty: &str) -> Option<Self> {
        match ty.replace(' ', "").as_str() {
            "f32" => Some(UniformKind::Float),
            "vec2<f32>" | "vec2f" => Some(UniformKind::Vec2),
            "vec3<f32>" | "vec3f" => Some(UniformKind::Vec3),
            "vec4<f32>" | "vec4f" => Some(UniformKind::Vec4),
            _ => None,
        }
    }

    /// Alignment in a uniform-address-space struct.
    pub fn align(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 | UniformKind::Vec4 => 16,
        }
    }

    pub fn size(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
        }
    }

    pub fn components(self) -> usize {
        self.size() / 4
    }
}

/// Value of a single uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
        }
    }

    fn write_to(&self, out: &mut [f32]) {
        match self {
            UniformValue::Float(v) => out[0] = *v,
            UniformValue::Vec2(v) => out[..2].copy_from_slice(&v.to_array()),
            UniformValue::Vec3(v) => out[..3].copy_from_slice(&v.to_array()),
            UniformValue::Vec4(v) => out[..4].copy_from_slice(&v.to_array()),
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            UniformValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

/// Insertion-ordered uniform values of one material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformSet {
    entries: Vec<(String, UniformValue)>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces `name`. Builder-style.
    pub fn with(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: UniformValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Overwrites an existing uniform of the same kind.
    pub fn update(&mut self, name: &str, value: UniformValue) -> Result<(), MaterialError> {
        let Some((_, slot)) = self.entries.iter_mut().find(|(n, _)| n == name) else {
            return Err(MaterialError::UnknownUniform(name.to_string()));
        };
        if slot.kind() != value.kind() {
            return Err(MaterialError::UniformKind {
                name: name.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One field of a [`UniformLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct UniformField {
    pub name: String,
    pub kind: UniformKind,
    /// Byte offset inside the block.
    pub offset: usize,
}

/// Byte layout of a `struct Uniforms` block under WGSL uniform rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: usize,
}

impl UniformLayout {
    pub fn new<'a>(fields: impl IntoIterator<Item = (&'a str, UniformKind)>) -> Self {
        let mut out = Vec::new();
        let mut cursor = 0usize;
        let mut max_align = 16usize;
        for (name, kind) in fields {
            cursor = cursor.next_multiple_of(kind.align());
            out.push(UniformField { name: name.to_string(), kind, offset: cursor });
            cursor += kind.size();
            max_align = max_align.max(kind.align());
        }
        // Empty blocks still bind 16 bytes.
        let size = cursor.next_multiple_of(max_align).max(16);
        Self { fields: out, size }
    }

    /// Layout declaring every uniform of `set`, in insertion order.
    pub fn from_set(set: &UniformSet) -> Self {
        Self::new(set.iter().map(|(n, v)| (n, v.kind())))
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Block size in bytes, a multiple of 16.
    pub fn size(&self) -> usize {
        self.size
    }

    /// WGSL declaration of the block.
    pub fn wgsl_struct(&self) -> String {
        let mut s = String::from("struct Uniforms {\n");
        for f in &self.fields {
            s.push_str(&format!("    {}: {},\n", f.name, f.kind.wgsl_type()));
        }
        if self.fields.is_empty() {
            s.push_str("    _unused: vec4<f32>,\n");
        }
        s.push_str("};\n");
        s
    }

    /// Packs `values` into the block. Fields absent from `values` stay zero.
    pub fn pack(&self, values: &UniformSet) -> Vec<u8> {
        let mut words = vec![0f32; self.size / 4];
        for f in &self.fields {
            if let Some(v) = values.get(&f.name).filter(|v| v.kind() == f.kind) {
                let at = f.offset / 4;
                v.write_to(&mut words[at..at + f.kind.components()]);
            }
        }
        bytemuck::cast_slice(&words).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn vec3_aligns_to_16_and_packs_a_trailing_float() {
        let layout = UniformLayout::new([
            ("color1", UniformKind::Vec3),
            ("time", UniformKind::Float),
            ("pos", UniformKind::Vec2),
            ("color2", UniformKind::Vec3),
        ]);
        let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 12, 16, 32]);
        assert_eq!(layout.size(), 48);
    }

    #[test]
    fn size_rounds_to_16() {
        let layout = UniformLayout::new([("a", UniformKind::Float)]);
        assert_eq!(layout.size(), 16);
        let empty = UniformLayout::new(std::iter::empty());
        assert_eq!(empty.size(), 16);
        assert!(empty.wgsl_struct().contains("_unused"));
    }

    #[test]
    fn gradient_block_layout() {
        let layout = UniformLayout::new([
            ("color1", UniformKind::Vec3),
            ("color2", UniformKind::Vec3),
            ("accentColor1", UniformKind::Vec3),
            ("accentColor2", UniformKind::Vec3),
            ("radialPos1", UniformKind::Vec2),
            ("radialPos2", UniformKind::Vec2),
            ("time", UniformKind::Float),
            ("pulseIntensity", UniformKind::Float),
        ]);
        assert_eq!(layout.field("radialPos1").map(|f| f.offset), Some(64));
        assert_eq!(layout.field("pulseIntensity").map(|f| f.offset), Some(84));
        assert_eq!(layout.size(), 96);
    }

    #[test]
    fn pack_writes_values_at_offsets() {
        let set = UniformSet::new()
            .with("color", Vec3::new(1.0, 2.0, 3.0))
            .with("time", 4.0_f32);
        let layout = UniformLayout::from_set(&set);
        let bytes = layout.pack(&set);
        let words: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(words, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn wgsl_struct_lists_fields_in_order() {
        let layout = UniformLayout::new([("a", UniformKind::Float), ("b", UniformKind::Vec4)]);
        assert_eq!(
            layout.wgsl_struct(),
            "struct Uniforms {\n    a: f32,\n    b: vec4<f32>,\n};\n"
        );
    }

    // ── set ───────────────────────────────────────────────────────────────

    #[test]
    fn update_rejects_unknown_and_mismatched() {
        let mut set = UniformSet::new().with("time", 0.0_f32);
        assert!(set.update("time", UniformValue::Float(5.0)).is_ok());
        assert_eq!(set.get("time"), Some(&UniformValue::Float(5.0)));
        assert!(matches!(set.update("nope", UniformValue::Float(1.0)), Err(MaterialError::UnknownUniform(_))));
        assert!(matches!(
            set.update("time", Vec2::ONE.into()),
            Err(MaterialError::UniformKind { .. })
        ));
        assert_eq!(set.get("time"), Some(&UniformValue::Float(5.0)));
    }

    #[test]
    fn kind_parses_short_and_long_spellings() {
        assert_eq!(UniformKind::from_wgsl("vec3f"), Some(UniformKind::Vec3));
        assert_eq!(UniformKind::from_wgsl("vec2< f32 >"), Some(UniformKind::Vec2));
        assert_eq!(UniformKind::from_wgsl("mat4x4<f32>"), None);
    }
}
