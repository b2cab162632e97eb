use anyhow::{anyhow, Context, Result};
use eframe::{egui, NativeOptions};
use scripts::{Script, ScriptDb, ScriptOrder, ScriptStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod clock;
mod config;
mod detail;
mod keyboard;
mod overlay;
mod player;

use clock::SharedScheduler;
use config::AppConfig;
use detail::{DetailAction, ScriptDetail};
use keyboard::KeyCommand;

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    // Ensure DB exists before UI
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);
    let db_path = config.db_path();
    let mut db = ScriptDb::open_or_create(&db_path)
        .with_context(|| format!("open script database {}", db_path.display()))?;
    if config.seed_sample && db.count().context("count scripts")? == 0 {
        db.insert(&Script::sample()).context("seed sample script")?;
        tracing::info!("seeded sample script");
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Teleprompter")
            .with_inner_size([960.0, 640.0]),
        ..NativeOptions::default()
    };
    eframe::run_native(
        "Teleprompter",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(db, config, config_path)))),
    )
    .map_err(|err| anyhow!("ui exited with error: {err}"))
}

include!("app.rs");
