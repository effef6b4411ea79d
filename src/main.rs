use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;

use abrwave::config::{AnalysisConfig, WaveId};
use abrwave::ingest::{load_recording, recording_id};
use abrwave::output::{OutputFormat, TraceReport, create_formatter};
use abrwave::{TraceResult, WaveAnalyzer};

#[derive(Parser, Debug)]
#[command(name = "abrwave")]
#[command(about = "Detect ABR wave I-V latencies and amplitudes from signal CSVs", long_about = None)]
struct Args {
    /// Signal CSV files (one column per electrode)
    #[arg(required = true)]
    signals: Vec<PathBuf>,

    /// Time CSV (first column, milliseconds)
    #[arg(short = 't', long, default_value = "time_data.csv")]
    time: PathBuf,

    /// TOML configuration file (windows and detection parameters)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Threshold of the first detection pass
    #[arg(long)]
    initial_threshold: Option<f64>,

    /// Maximum number of threshold relaxation passes
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Neighbours a peak must exceed on each side
    #[arg(long)]
    half_window: Option<usize>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print per-wave statistics across all recordings to stderr
    #[arg(long)]
    summary: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match args.config {
        Some(ref path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(t) = args.initial_threshold {
        config.detection.initial_threshold = t;
    }
    if let Some(n) = args.max_attempts {
        config.detection.max_attempts = n;
    }
    if let Some(hw) = args.half_window {
        config.detection.half_window = hw;
    }

    let analyzer = WaveAnalyzer::new(config).context("Invalid analysis configuration")?;

    let reports: Vec<TraceReport> = args
        .signals
        .iter()
        .map(|path| analyze_file(&analyzer, path, &args.time))
        .collect();

    let formatter = create_formatter(args.format, args.verbose > 0);
    let mut out: Box<dyn Write> = match args.output {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if let Some(header) = formatter.header() {
        writeln!(out, "{}", header)?;
    }
    for report in &reports {
        writeln!(out, "{}", formatter.format(report))?;
    }
    out.flush()?;

    if let Some(ref path) = args.output {
        log::info!("Saved wave detection results to {}", path.display());
    }

    if args.summary {
        print_summary(&reports);
    }

    Ok(())
}

fn analyze_file(analyzer: &WaveAnalyzer, signal_path: &Path, time_path: &Path) -> TraceReport {
    let tolerance = analyzer.config().detection.sampling_tolerance;
    match load_recording(signal_path, time_path, tolerance) {
        Ok(recording) => {
            log::info!(
                "{}: {} samples, {} electrodes",
                recording.id,
                recording.trace.len(),
                recording.electrode_count
            );
            let result = analyzer.analyze(&recording.trace);
            if result.is_empty() {
                log::warn!(
                    "{}: no wave detected after {} attempts",
                    recording.id,
                    result.attempts()
                );
            }
            TraceReport::success(recording.id, result)
        }
        Err(e) => {
            log::error!("{}: {}", signal_path.display(), e);
            TraceReport::failure(recording_id(signal_path), e)
        }
    }
}

fn print_summary(reports: &[TraceReport]) {
    let results: Vec<&TraceResult> = reports.iter().filter_map(|r| r.result.as_ref()).collect();

    eprintln!();
    eprintln!(
        "Summary over {} recordings ({} failed):",
        results.len(),
        reports.len() - results.len()
    );
    eprintln!(
        "{:<8} {:>6} {:>10} {:>8} {:>10} {:>8}",
        "Wave", "Found", "Latency", "Std", "Amplitude", "Std"
    );

    for wave in WaveId::ALL {
        let mut latency: Stats<f64> = Stats::new();
        let mut amplitude: Stats<f64> = Stats::new();
        for d in results.iter().filter_map(|r| r.wave(wave)) {
            latency.update(d.latency_ms);
            amplitude.update(d.amplitude);
        }

        if latency.count == 0 {
            eprintln!("{:<8} {:>6} {:>10} {:>8} {:>10} {:>8}", wave, 0, "-", "-", "-", "-");
            continue;
        }
        eprintln!(
            "{:<8} {:>6} {:>10.3} {:>8.3} {:>10.5} {:>8.5}",
            wave, latency.count, latency.mean, latency.std_dev, amplitude.mean, amplitude.std_dev
        );
    }

    let mut interpeak: Stats<f64> = Stats::new();
    for ipi in results.iter().filter_map(|r| r.interpeak_1_5()) {
        interpeak.update(ipi);
    }
    if interpeak.count > 0 {
        eprintln!(
            "I-V interpeak: {:.3} ± {:.3} ms (n={}, range {:.3}-{:.3})",
            interpeak.mean, interpeak.std_dev, interpeak.count, interpeak.min, interpeak.max
        );
    }
}
