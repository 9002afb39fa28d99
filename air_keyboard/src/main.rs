//! air_keyboard — interactive entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use air_keyboard::app::run;
use air_keyboard::config::AppConfig;
use air_keyboard::source::{HandSource, SimHandSource};

/// Pinch-to-type virtual keyboard
#[derive(Parser, Debug)]
#[command(name = "air_keyboard", version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/air_keyboard/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Capture device index
    #[arg(long, value_name = "INDEX")]
    camera_index: Option<u32>,

    /// Hand-landmark ONNX model (camera mode)
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Pinch distance threshold in pixels
    #[arg(long)]
    threshold: Option<f32>,

    /// Minimum milliseconds between two clicks
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Type into the on-screen buffer only; send nothing to the OS
    #[arg(long)]
    no_inject: bool,

    /// Use the mouse instead of the camera even when built with `camera`
    #[arg(long)]
    simulate: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, cfg: &mut AppConfig) {
        if let Some(i) = self.camera_index { cfg.camera.index = i; }
        if let Some(m) = &self.model       { cfg.detector.model_path = Some(m.clone()); }
        if let Some(t) = self.threshold    { cfg.pinch.threshold = t; }
        if let Some(c) = self.cooldown_ms  { cfg.pinch.cooldown_ms = c; }
        if self.no_inject                  { cfg.inject_keystrokes = false; }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║           Air Keyboard — pinch to type, q to quit            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut cfg = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    cli.apply(&mut cfg);

    let source = open_source(&cfg, cli.simulate)?;
    info!(mode = source.name(), "opening keyboard window");

    run(&cfg, source).context("virtual keyboard failed")
}

#[cfg(feature = "camera")]
fn open_source(cfg: &AppConfig, simulate: bool) -> Result<Box<dyn HandSource>> {
    if simulate {
        return Ok(Box::new(SimHandSource::new()));
    }
    let source = air_keyboard::camera::CameraHandSource::open(&cfg.camera, &cfg.detector)
        .context("failed to open camera")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "camera"))]
fn open_source(_cfg: &AppConfig, _simulate: bool) -> Result<Box<dyn HandSource>> {
    Ok(Box::new(SimHandSource::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "air_keyboard", "--threshold", "30", "--cooldown-ms", "250", "--no-inject",
            "--camera-index", "1",
        ]);
        let mut cfg = AppConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.pinch.threshold, 30.0);
        assert_eq!(cfg.pinch.cooldown_ms, 250);
        assert_eq!(cfg.camera.index, 1);
        assert!(!cfg.inject_keystrokes);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::parse_from(["air_keyboard"]);
        let mut cfg = AppConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg, AppConfig::default());
    }
}
