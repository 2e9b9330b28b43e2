//! Bubble picker demo host.
//!
//! Example:
//!   cargo run -- --config assets/config/picker.ron --seed 7
//!   cargo run -- --random-sections 6

use std::path::PathBuf;

use anyhow::{bail, Result};
use bevy::prelude::*;
use clap::Parser;

use bubble_picker::{BubblePickerPlugin, ConfigWarnings, PickerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Section-based colour picker with a physics bubble field", long_about = None)]
struct Args {
    /// Config files merged in order; later files win. Missing files are skipped.
    #[arg(
        long = "config",
        default_values = ["assets/config/picker.ron", "assets/config/picker.local.ron"]
    )]
    configs: Vec<PathBuf>,
    /// Seed for bubble placement and random palettes.
    #[arg(long)]
    seed: Option<u64>,
    /// Ignore configured sections and generate this many random ones.
    #[arg(long)]
    random_sections: Option<usize>,
    #[arg(long)]
    auto_close: Option<f32>,
    /// Treat config read/parse errors as fatal.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let existing: Vec<&PathBuf> = args.configs.iter().filter(|p| p.exists()).collect();
    let mut warnings = Vec::new();
    if existing.is_empty() {
        warnings.push(format!("no config found in {:?}; using defaults", args.configs));
    }
    let (mut cfg, used, errors) = PickerConfig::load_layered(existing);
    if args.strict && !errors.is_empty() {
        bail!("config errors:\n{}", errors.join("\n"));
    }
    warnings.extend(errors);

    if let Some(seed) = args.seed {
        cfg.palette.seed = Some(seed);
    }
    if let Some(n) = args.random_sections {
        cfg.palette.sections.clear();
        cfg.palette.random_sections = n;
    }
    if let Some(secs) = args.auto_close {
        cfg.window.auto_close = secs;
    }

    let mut app = App::new();
    app.insert_resource(cfg.clone())
        .insert_resource(ConfigWarnings(warnings))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(BubblePickerPlugin);
    info!(target: "config", "loaded config layers: {:?}", used);

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("picker exited with code {code}"),
    }
}
