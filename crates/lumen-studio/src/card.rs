use std::path::Path;

use lumen_ui::prelude::*;

const CARD_BACKGROUND: &str = "#1a1a2e";
const CARD_BORDER: &str = "#41d1ff";
const TITLE_COLORS: [&str; 2] = ["#41d1ff", "#bd34fe"];

/// Loads the card font, if one was given. The card still lays out without
/// one; its text just draws nothing.
pub fn load_font(ui: &mut UiScene, path: Option<&Path>) -> FontId {
    match path {
        Some(path) => match ui.load_font_file(path) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("{e}; overlay text disabled");
                FontId::from_index(0)
            }
        },
        None => {
            log::warn!("no --font given; overlay text disabled");
            FontId::from_index(0)
        }
    }
}

/// Squircle card pinned to the bottom of the window.
pub fn build(font: FontId, variant: Variant) -> Element {
    let subtitle = Color::from_straight(0.85, 0.85, 0.9, 1.0);
    let content = Column::new()
        .spacing(6.0)
        .cross_align(Alignment::Center)
        .child(GradientText::from_hex("Lumen", font, 36.0, &TITLE_COLORS).variant(variant))
        .child(Text::new("scroll to animate", font, 14.0, subtitle));

    let card = SquircleView::new(variant)
        .border(1.5, CARD_BORDER)
        .background(Color::from_hex_or_black(CARD_BACKGROUND))
        .padding(Edges::symmetric(18.0, 28.0))
        .child(content);

    Align::new(card, Alignment::Center, Alignment::End)
        .margin(Edges { bottom: 48.0, ..Edges::default() })
        .into()
}
