use anyhow::Context;
use clap::Parser;
use console::style;
use spectra::audio::SampleReader;
use spectra::config::{self, Config};
use spectra::{SpectrumAnalyzer, SpectrumReport, WindowKind};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Print the frequency spectrum of raw 16-bit PCM audio, block by block.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,
    /// PCM source: a file, a named pipe or `-` for stdin
    #[arg(short, long)]
    input: Option<String>,
    #[arg(long)]
    sample_rate: Option<u32>,
    #[arg(long)]
    channels: Option<u16>,
    /// Samples per analyzed block
    #[arg(short, long)]
    block_size: Option<usize>,
    #[arg(short, long, value_enum)]
    window: Option<WindowKind>,
    #[arg(long)]
    lowcut: Option<f64>,
    #[arg(long)]
    highcut: Option<f64>,
    /// Band-pass every block to [lowcut, highcut] before analysis
    #[arg(long)]
    filter: bool,
    /// Stop after this many blocks
    #[arg(long)]
    blocks: Option<u64>,
    /// Print one JSON report per line
    #[arg(long)]
    json: bool,
    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    init_config: bool,
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        let analyzer = &mut config.analyzer;
        if let Some(input) = &self.input {
            analyzer.input = input.clone();
        }
        if let Some(sample_rate) = self.sample_rate {
            analyzer.sample_rate = sample_rate;
        }
        if let Some(channels) = self.channels {
            analyzer.channels = channels;
        }
        if let Some(block_size) = self.block_size {
            analyzer.block_size = block_size;
        }
        if let Some(window) = self.window {
            analyzer.window = window;
        }
        if let Some(lowcut) = self.lowcut {
            analyzer.lowcut = lowcut;
        }
        if let Some(highcut) = self.highcut {
            analyzer.highcut = highcut;
        }
        analyzer.filter_enabled |= self.filter;
    }
}

fn print_report(out: &mut impl Write, report: &SpectrumReport) -> io::Result<()> {
    writeln!(
        out,
        "{} peak {} at {}",
        style(format!("#{:<6}", report.block)).dim(),
        style(format!("{:>7.1} dB", report.peak_db)).yellow(),
        style(format!("{:>8.1} Hz", report.peak_hz)).cyan(),
    )?;
    for band in &report.bands {
        let bar_len = ((band.level_db + 120.0) / 4.0).clamp(0.0, 40.0) as usize;
        writeln!(
            out,
            "  {:>7.0}-{:<7.0} Hz {:>7.1} dB {}",
            band.low_hz,
            band.high_hz,
            band.level_db,
            style("#".repeat(bar_len)).green(),
        )?;
    }
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config_path = match args.config.clone().or_else(config::default_config_path) {
        Some(path) => path,
        None => {
            return Err(anyhow::Error::msg(
                "Couldn't determine a config directory, pass --config explicitly.",
            ));
        }
    };
    let mut config = config::try_read_from_file(&config_path)?.unwrap_or_default();
    args.apply_overrides(&mut config);

    if args.init_config {
        config::make_new_config_file(&config, &config_path)?;
        println!("Wrote configuration to {}", config_path.display());
        return Ok(());
    }

    config.engine.apply();
    let settings = &config.analyzer;
    let mut analyzer = SpectrumAnalyzer::new(settings).context("Invalid analyzer settings")?;
    let mut reader = SampleReader::open(&settings.input, settings.channels)?;
    tracing::debug!(?settings, "starting analysis");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut processed = 0u64;
    while args.blocks.map_or(true, |limit| processed < limit) {
        let Some(samples) = reader.next_block(analyzer.block_size())? else {
            break;
        };
        analyzer.push_block(&samples)?;
        processed += 1;

        if let Some(report) = analyzer.report() {
            if args.json {
                writeln!(out, "{}", serde_json::to_string(&report)?)?;
            } else {
                print_report(&mut out, &report)?;
            }
        }
    }
    tracing::debug!(processed, "input exhausted");

    Ok(())
}
