use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glitch_core::{EffectSpec, ParamLimits, Pipeline, fingerprint};
use glitch_preview::{PreviewMode, PreviewSession};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::io;

#[derive(Parser, Debug)]
#[command(
    name = "glitch",
    version,
    about = "Noise, blur, shake and motion effects for still images"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply effects at full resolution.
    Apply(ApplyArgs),
    /// Render a downscaled preview.
    Preview(PreviewArgs),
    /// Print the cache fingerprint of an effect spec.
    Fingerprint(FingerprintArgs),
    /// Print the default (all disabled) effect spec as JSON.
    Defaults,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Input image (JPEG, PNG or TIFF).
    #[arg(long = "in")]
    pub in_path: PathBuf,

    /// Effect spec JSON.
    #[arg(long)]
    pub effects: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    pub out: PathBuf,

    /// Seed for the random effects. Uses OS entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Check parameters against the extreme ranges instead of the standard ones.
    #[arg(long)]
    pub extreme: bool,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Input image (JPEG, PNG or TIFF).
    #[arg(long = "in")]
    pub in_path: PathBuf,

    /// Effect spec JSON.
    #[arg(long)]
    pub effects: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    pub out: PathBuf,

    /// Preview mode: "Fast", "Balanced" or "High Quality". Unknown names
    /// fall back to Balanced.
    #[arg(long, default_value = "Balanced")]
    pub mode: String,

    /// Seed for the random effects. Uses OS entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Check parameters against the extreme ranges instead of the standard ones.
    #[arg(long)]
    pub extreme: bool,
}

#[derive(Parser, Debug)]
pub struct FingerprintArgs {
    /// Effect spec JSON.
    #[arg(long)]
    pub effects: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Fingerprint(args) => cmd_fingerprint(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn warn_out_of_range(spec: &EffectSpec, extreme: bool) {
    for violation in ParamLimits::for_mode(extreme).check(spec) {
        warn!(%violation, extreme, "parameter outside the control range");
    }
}

fn applied_summary(spec: &EffectSpec) -> String {
    let names = spec.active_effect_names();
    if names.is_empty() {
        "No effects enabled".to_string()
    } else {
        format!("Applied: {}", names.join(", "))
    }
}

fn cmd_apply(args: ApplyArgs) -> Result<()> {
    let spec = io::load_spec(&args.effects)?;
    warn_out_of_range(&spec, args.extreme);
    let image = io::load_image(&args.in_path)?;

    let mut rng = make_rng(args.seed);
    let t0 = std::time::Instant::now();
    let out = Pipeline::new()
        .apply(&image, &spec, &mut rng)
        .context("processing failed")?;
    info!(elapsed_ms = t0.elapsed().as_millis(), "full quality processing");

    io::save_image(&args.out, &out, io::FULL_JPEG_QUALITY)?;
    println!("{}", applied_summary(&spec));
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> Result<()> {
    let spec = io::load_spec(&args.effects)?;
    warn_out_of_range(&spec, args.extreme);
    let image = io::load_image(&args.in_path)?;

    let mode = PreviewMode::from_name(&args.mode);
    let mut session = PreviewSession::new(image, mode)?;
    let mut rng = make_rng(args.seed);
    let outcome = session.render(&spec, &mut rng).context("preview failed")?;

    io::save_image(&args.out, &outcome.image, mode.quality())?;
    println!(
        "{} {}x{} in {:.1} ms ({})",
        mode.label(),
        outcome.image.width,
        outcome.image.height,
        outcome.elapsed.as_secs_f64() * 1000.0,
        outcome.fingerprint
    );
    println!("{}", applied_summary(&spec));
    Ok(())
}

fn cmd_fingerprint(args: FingerprintArgs) -> Result<()> {
    let spec = io::load_spec(&args.effects)?;
    println!("{}", fingerprint(&spec));
    Ok(())
}

fn cmd_defaults() -> Result<()> {
    println!("{}", EffectSpec::default().to_json()?);
    Ok(())
}
