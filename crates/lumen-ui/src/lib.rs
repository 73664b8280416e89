//! Lumen UI: a retained widget tree on top of `lumen-engine`, drawn as an
//! overlay over the animated scene.
//!
//! A frame measures the tree, lays it out, paints it into the engine's
//! `DrawList` and routes input:
//!
//! ```rust,ignore
//! use lumen_ui::prelude::*;
//!
//! let mut ui = UiScene::new();
//! let font = ui.load_font(include_bytes!("font.ttf"))?;
//! let card = SquircleView::new(Variant::Layer)
//!     .background(Color::from_hex_or_black("#1a1a2e"))
//!     .padding(Edges::all(24.0))
//!     .child(GradientText::from_hex("Lumen", font, 40.0, &["#41d1ff", "#bd34fe"]));
//! let overlay = UiOverlay::new(ui, Align::center(card));
//! ```
//!
//! Views that draw with fallbacks report a [`PaintOutcome`](diagnostics::PaintOutcome)
//! to the scene's [`DiagnosticsSink`](diagnostics::DiagnosticsSink).

pub mod constraints;
pub mod diagnostics;
pub mod event;
pub mod overlay;
pub mod painter;
pub mod platform;
pub mod scene;
pub mod squircle;
pub mod widget;
pub mod widgets;

/// Everything needed to build and extend UI.
pub mod prelude {
    pub use crate::constraints::{Constraints, Edges, LayoutCtx};
    pub use crate::diagnostics::{DiagnosticsSink, LogSink, PaintOutcome, RecordingSink};
    pub use crate::event::{EventResult, UiEvent};
    pub use crate::overlay::UiOverlay;
    pub use crate::painter::Painter;
    pub use crate::platform::Variant;
    pub use crate::scene::{UiInput, UiScene};
    pub use crate::squircle::{superellipse_points, SquircleProps, SquircleView};
    pub use crate::widget::{Element, Widget};
    pub use crate::widgets::{
        align::{Align, Alignment},
        column::Column,
        gradient_text::GradientText,
        text::Text,
    };

    pub use lumen_engine::coords::{Rect, Vec2};
    pub use lumen_engine::paint::{Color, LinearGradient, Paint};
    pub use lumen_engine::text::FontId;
}
