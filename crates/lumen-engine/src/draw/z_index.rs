/// Layer of a draw item. Higher values paint on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const BACKGROUND: ZIndex = ZIndex(-100);
    pub const CONTENT: ZIndex = ZIndex(0);
    pub const OVERLAY: ZIndex = ZIndex(100);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    /// Layer `n` steps above this one.
    #[inline]
    pub const fn above(self, n: i32) -> Self {
        Self(self.0.saturating_add(n))
    }
}
