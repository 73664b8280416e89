use crate::coords::{Rect, Vec2};

use super::{DrawCmd, SortKey, ZIndex};

/// Superellipse inscribed in `bounds`: `|2dx/w|^n + |2dy/h|^n <= 1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SuperellipseClip {
    pub bounds: Rect,
    pub exponent: f32,
}

impl SuperellipseClip {
    /// Whether `p` lies inside the curve (boundary inclusive).
    pub fn contains(&self, p: Vec2) -> bool {
        let b = self.bounds.normalized();
        if b.is_empty() {
            return false;
        }
        let c = b.center();
        let nx = (2.0 * (p.x - c.x) / b.size.x).abs();
        let ny = (2.0 * (p.y - c.y) / b.size.y).abs();
        nx.powf(self.exponent) + ny.powf(self.exponent) <= 1.0
    }
}

/// Effective clip of a draw item.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Clip {
    /// Scissor rect, already intersected with every parent clip.
    pub scissor: Rect,
    /// Innermost curved clip, if any.
    pub curve: Option<SuperellipseClip>,
}

impl Clip {
    /// Whether `p` survives both the scissor and the curve.
    pub fn contains(&self, p: Vec2) -> bool {
        self.scissor.contains(p) && self.curve.is_none_or(|c| c.contains(p))
    }
}

/// A single draw item: sort key + command + effective clip.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// `None` = unclipped.
    pub clip: Option<Clip>,
}

/// Recorded 2D draw stream for one frame.
///
/// Paint order is `(z, insertion order)`. The sorted index buffer is reused
/// across frames.
///
/// # Clipping
///
/// [`push_clip`](Self::push_clip) scopes commands to a scissor rect, and
/// [`push_clip_superellipse`](Self::push_clip_superellipse) additionally curves
/// it. Nested scissors intersect. Nested curves do not compose: the innermost
/// one wins.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    clip_stack: Vec<Clip>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears items and the clip stack, keeping capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current clip depth.
    #[inline]
    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    /// Records `cmd` under the current clip.
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
            clip: self.clip_stack.last().copied(),
        });
        self.sorted_dirty = true;
    }

    /// Begins a rectangular clip. Must be balanced with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        let (scissor, curve) = self.nested(rect);
        self.clip_stack.push(Clip { scissor, curve });
    }

    /// Begins a clip to the superellipse inscribed in `rect`.
    pub fn push_clip_superellipse(&mut self, rect: Rect, exponent: f32) {
        let (scissor, _) = self.nested(rect);
        self.clip_stack.push(Clip {
            scissor,
            curve: Some(SuperellipseClip { bounds: rect.normalized(), exponent }),
        });
    }

    /// Ends the most recent clip.
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip without matching push");
        self.clip_stack.pop();
    }

    fn nested(&self, rect: Rect) -> (Rect, Option<SuperellipseClip>) {
        match self.clip_stack.last() {
            None => (rect.normalized(), None),
            // Disjoint parents yield a zero-area scissor; renderers skip those items.
            Some(parent) => (
                parent.scissor.intersect(rect).unwrap_or_default(),
                parent.curve,
            ),
        }
    }

    /// Indices into [`items`](Self::items) in paint order.
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        &self.sorted_indices
    }

    /// Items in paint order, without cloning.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());
        let items = &self.items;
        self.sorted_indices.sort_by_key(|&i| items[i].key);
        self.sorted_dirty = false;
    }
}
