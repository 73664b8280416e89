mod app;
mod card;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_engine::graphics::scene::SceneOptions;
use lumen_engine::graphics::{GraphicsController, GraphicsOptions};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::window::{Runtime, RuntimeConfig};
use lumen_ui::overlay::UiOverlay;
use lumen_ui::scene::UiScene;
use winit::dpi::LogicalSize;

use crate::app::StudioApp;
use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig { env_filter: cli.log.clone(), ..LoggingConfig::default() });

    let options = GraphicsOptions {
        backend: cli.backend,
        scene: SceneOptions { glow: cli.glow, ..SceneOptions::default() },
        ..GraphicsOptions::default()
    };
    let graphics = GraphicsController::new(options);

    let mut ui = UiScene::new();
    let font = card::load_font(&mut ui, cli.font.as_deref());
    let overlay = UiOverlay::new(ui, card::build(font, cli.variant));

    log::info!("lumen studio: {} backend, {} card, progress {}", cli.backend, cli.variant, cli.progress);
    let config = RuntimeConfig {
        title: format!("Lumen Studio ({})", cli.backend),
        initial_size: LogicalSize::new(cli.width, cli.height),
    };
    Runtime::run(config, StudioApp::new(graphics, overlay, cli.progress)).context("event loop failed")
}
