use std::path::PathBuf;

use clap::Parser;
use lumen_engine::graphics::materials::Backend;
use lumen_ui::platform::Variant;

#[derive(Parser, Debug)]
#[command(name = "lumen-studio", version, about = "Animated logo scene viewer")]
pub struct Cli {
    /// Material backend: `shader` (WGSL source) or `graph` (uniform graph).
    #[arg(long, value_name = "shader|graph", default_value = "shader", env = "LUMEN_BACKEND")]
    pub backend: Backend,

    /// Initial scroll progress; -1 is the first keyframe.
    #[arg(long, value_name = "FLOAT", default_value_t = -1.0, allow_negative_numbers = true)]
    pub progress: f32,

    /// Log filter in `env_logger` syntax; falls back to `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = 420.0)]
    pub width: f64,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 860.0)]
    pub height: f64,

    /// TrueType/OpenType font for the overlay card.
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Overlay card drawing variant: `canvas` or `layer`.
    #[arg(long, value_name = "canvas|layer", default_value = "layer")]
    pub variant: Variant,

    /// Add the halo plane behind the logo.
    #[arg(long)]
    pub glow: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["lumen-studio"]).unwrap();
        assert_eq!(cli.backend, Backend::ShaderSource);
        assert_eq!(cli.progress, -1.0);
        assert_eq!(cli.variant, Variant::Layer);
        assert!(cli.font.is_none());
        assert!(!cli.glow);
    }

    #[test]
    fn parses_backend_and_negative_progress() {
        let cli = Cli::try_parse_from(["lumen-studio", "--backend", "graph", "--progress", "-0.5"]).unwrap();
        assert_eq!(cli.backend, Backend::UniformGraph);
        assert_eq!(cli.progress, -0.5);
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["lumen-studio", "--backend", "vulkan"]).is_err());
    }
}
