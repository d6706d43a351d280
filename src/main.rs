use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use primview::app::ViewerApp;
use primview::config::{CatalogVariant, OpacityPolicy, ViewerConfig};
use primview::gfx::material::{Material, MaterialKind};
use primview::ui::panel::model_name;
use primview::viewer::AnimationState;

#[derive(Parser, Debug)]
#[command(name = "primview")]
#[command(about = "Interactive viewer for procedural 3D primitives and OBJ models")]
struct Cli {
    /// Use the older 21-shape setup (basic material, clamped opacity)
    #[arg(long)]
    legacy: bool,

    /// Primitive catalog: standard or extended
    #[arg(long)]
    catalog: Option<CatalogVariant>,

    /// Open with the rotation loop stopped
    #[arg(long)]
    start_stopped: bool,

    /// Clamp opacity edits to [0, 1]
    #[arg(long)]
    clamp_opacity: bool,

    /// Initial material: basic, lambert, phong, standard or toon
    #[arg(long)]
    material: Option<MaterialKind>,

    /// Seed for the random color button
    #[arg(long)]
    seed: Option<u64>,

    /// OBJ model to import on startup
    #[arg(long)]
    model: Option<PathBuf>,

    /// Where screenshots are written
    #[arg(long, default_value = "screenshot.png")]
    screenshot: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

impl Cli {
    fn config(&self) -> ViewerConfig {
        let mut config = if self.legacy {
            ViewerConfig::legacy()
        } else {
            ViewerConfig::default()
        };
        if let Some(catalog) = self.catalog {
            config.catalog = catalog;
        }
        if self.start_stopped {
            config.initial_animation = AnimationState::Stopped;
        }
        if self.clamp_opacity {
            config.opacity_policy = OpacityPolicy::Clamp;
        }
        if let Some(kind) = self.material {
            config.initial_material = Material::with_kind(&config.initial_material, kind);
        }
        config.seed = self.seed;
        config.screenshot_path = self.screenshot.clone();
        config.window_size = (self.width, self.height);
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = cli.config();
    log::info!("Starting with the {} catalog", config.catalog);

    let mut app = ViewerApp::new(config).context("failed to create event loop")?;
    if let Some(path) = &cli.model {
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        app = app.with_initial_model(model_name(path), bytes);
    }

    app.run().context("event loop terminated with an error")
}
