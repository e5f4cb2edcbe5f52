#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Word Defence experience.

mod config;
mod simulation;

use std::{
    cell::Cell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use word_defence_core::SessionStats;
use word_defence_rendering::{layout, Presentation, RenderingBackend};
use word_defence_rendering_macroquad::MacroquadBackend;
use word_defence_system_analytics::{answer_accuracy, defence_rate};
use word_defence_system_quiz::{Quiz, WordBank};
use word_defence_system_spawning::Spawning;
use word_defence_world::{query, World};

use crate::{config::GameConfig, simulation::Simulation};

/// Tower defence funded by vocabulary answers.
#[derive(Debug, Parser)]
#[command(name = "word-defence", version, about)]
struct CliArgs {
    /// JSON file listing `{ "word", "meaning" }` pairs.
    #[arg(long, value_name = "PATH", default_value = "assets/words.json")]
    words: PathBuf,

    /// Optional TOML file overriding gameplay tunables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for question generation. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// TrueType font used for all text, needed for meanings outside Latin script.
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "on|off", value_parser = parse_toggle)]
    vsync: Option<bool>,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,

    /// Run for the given number of seconds without a window and log the session stats.
    #[arg(long, value_name = "SECONDS")]
    headless: Option<f32>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_toggle(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(format!("expected `on` or `off`, got `{other}`")),
    }
}

/// Entry point for the Word Defence command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_level);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(clock_seed);

    let bank = load_word_bank(&args.words)?;
    if args.headless.is_none() && args.font.is_none() && needs_custom_font(&bank) {
        warn!(
            words = %args.words.display(),
            "word list contains non-Latin text the built-in font cannot draw; pass --font"
        );
    }
    let map = config.map().context("invalid map in config file")?;
    let world = World::with_map(config.world_config(), map).context("failed to build world")?;
    let title = query::welcome_banner(&world);
    info!(words = bank.len(), seed, "{title}");

    let mut simulation = Simulation::new(
        world,
        Spawning::new(config.spawning_config()),
        Quiz::new(bank, seed),
    );

    if let Some(seconds) = args.headless {
        let duration = Duration::try_from_secs_f32(seconds.max(0.0))
            .context("headless duration is out of range")?;
        log_session(&simulation.run_headless(duration));
        return Ok(());
    }

    let font_bytes = args
        .font
        .as_deref()
        .map(|path| {
            fs::read(path).with_context(|| format!("failed to read font {}", path.display()))
        })
        .transpose()?;

    let scene = simulation.scene()?;
    let presentation = Presentation::new(title, layout::BACKGROUND_COLOR, scene);

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_font_bytes(font_bytes);
    if let Some(vsync) = args.vsync {
        backend = backend.with_vsync(vsync);
    }

    let last_stats = Rc::new(Cell::new(simulation.stats()));
    let frame_stats = Rc::clone(&last_stats);
    backend.run(presentation, move |dt, input, scene| {
        simulation.advance_frame(dt, input, scene);
        frame_stats.set(simulation.stats());
    })?;

    log_session(&last_stats.get());
    Ok(())
}

fn log_session(stats: &SessionStats) {
    info!(
        spawned = stats.monsters_spawned,
        defeated = stats.monsters_defeated,
        escaped = stats.monsters_escaped,
        towers = stats.towers_built,
        bullets = stats.bullets_fired,
        defence_rate = ?defence_rate(stats),
        accuracy = ?answer_accuracy(stats),
        "session finished"
    );
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn load_word_bank(path: &Path) -> Result<WordBank> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read word list {}", path.display()))?;
    WordBank::from_json_slice(&bytes)
        .with_context(|| format!("failed to parse word list {}", path.display()))
}

/// Reports whether any word or meaning falls outside the built-in font's ASCII range.
fn needs_custom_font(bank: &WordBank) -> bool {
    bank.entries()
        .iter()
        .any(|entry| !entry.word.is_ascii() || !entry.meaning.is_ascii())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
