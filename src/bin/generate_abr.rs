use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use abrwave::simulation::{
    NoiseConfig, WaveShape, default_wave_template, generate_abr_signal, generate_electrodes,
    time_axis,
};

#[derive(Parser, Debug)]
#[command(name = "generate_abr")]
#[command(about = "Generate synthetic multi-electrode ABR recordings as CSV")]
struct Args {
    /// TOML file with [noise] settings and [[waves]] shapes
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Number of recordings to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Electrodes (CSV columns) per recording
    #[arg(short, long, default_value_t = 4)]
    electrodes: usize,

    /// Recording length in milliseconds
    #[arg(long, default_value_t = 12.0)]
    duration_ms: f64,

    /// Sampling interval in milliseconds
    #[arg(long, default_value_t = 0.01)]
    interval_ms: f64,

    /// Noise standard deviation per electrode (overrides config)
    #[arg(long)]
    noise: Option<f64>,

    /// Standard deviation of a constant per-electrode offset (overrides config)
    #[arg(long)]
    baseline: Option<f64>,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GeneratorConfig {
    noise: NoiseConfig,
    waves: Vec<WaveShape>,
}

fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.interval_ms <= 0.0 || args.duration_ms <= 0.0 {
        anyhow::bail!("duration and interval must be positive");
    }

    let mut config = match args.config {
        Some(ref path) => load_config(path)?,
        None => GeneratorConfig::default(),
    };
    if config.waves.is_empty() {
        config.waves = default_wave_template();
    }
    if let Some(std_dev) = args.noise {
        config.noise.std_dev = std_dev;
    }
    if let Some(baseline_std) = args.baseline {
        config.noise = config.noise.with_baseline(baseline_std);
    }

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    let num_samples = (args.duration_ms / args.interval_ms).round() as usize;
    let time = time_axis(num_samples, args.interval_ms);
    let clean = generate_abr_signal(&time, &config.waves);

    let time_path = args.output_dir.join("time_data.csv");
    write_time_csv(&time_path, &time)?;
    log::info!("Wrote {} ({} samples)", time_path.display(), num_samples);

    for i in 0..args.count {
        let mut noise = config.noise.clone();
        if let Some(base) = args.seed.or(config.noise.seed) {
            noise.seed = Some(base.wrapping_add(i as u64));
        }

        let channels = generate_electrodes(&clean, args.electrodes, &noise)?;
        let path = args.output_dir.join(format!("{}.csv", i + 1));
        write_signal_csv(&path, &channels, num_samples)?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}

fn write_time_csv(path: &Path, time: &[f64]) -> Result<()> {
    let mut out = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    writeln!(out, "time_ms")?;
    for t in time {
        writeln!(out, "{:.6}", t)?;
    }
    out.flush()?;
    Ok(())
}

fn write_signal_csv(path: &Path, channels: &[Vec<f64>], num_samples: usize) -> Result<()> {
    let mut out = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    let header: Vec<String> = (1..=channels.len()).map(|c| format!("electrode_{}", c)).collect();
    writeln!(out, "{}", header.join(","))?;

    for i in 0..num_samples {
        let row: Vec<String> = channels.iter().map(|c| format!("{:.8}", c[i])).collect();
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()?;
    Ok(())
}
