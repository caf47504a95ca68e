//! aplab CLI — run Active-Passive decomposition analyses.
//!
//! Commands:
//! - `run` — analyze a price CSV (or a synthetic series) and print/export
//!   the decomposition report
//! - `synth` — write a synthetic `date,close` CSV for experimentation

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use aplab_runner::{
    load_close_csv, run_analysis, save_artifacts, synthetic_prices, DataSource, RunConfig,
};

#[derive(Parser)]
#[command(
    name = "aplab",
    about = "aplab — Active-Passive decomposition of dynamic DCA strategies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the passive and momentum strategies and decompose the result.
    Run {
        /// Path to a TOML run configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to a `date,close` price CSV.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Use a synthetic price series with this many trading days.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Seed for the synthetic series.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Symbol label (overrides the config's symbol).
        #[arg(long)]
        symbol: Option<String>,

        /// Directory to write report artifacts into.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a synthetic price CSV.
    Synth {
        /// Number of trading days.
        #[arg(long, default_value_t = 1260)]
        days: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file path.
        #[arg(long, default_value = "synthetic.csv")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Run {
            config,
            csv,
            synthetic,
            seed,
            symbol,
            out,
        } => cmd_run(config, csv, synthetic, seed, symbol, out),
        Commands::Synth { days, seed, out } => cmd_synth(days, seed, out),
    }
}

fn cmd_run(
    config_path: Option<PathBuf>,
    csv: Option<PathBuf>,
    synthetic: Option<usize>,
    seed: u64,
    symbol: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RunConfig::from_toml_file(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(symbol) = symbol {
        config.symbol = symbol;
    }

    let (prices, source) = match (&csv, synthetic) {
        (Some(path), None) => {
            let prices = load_close_csv(path, &config.symbol)
                .with_context(|| format!("failed to load prices from {}", path.display()))?;
            (prices, DataSource::Csv)
        }
        (None, Some(days)) => (
            synthetic_prices(&config.symbol, days, seed),
            DataSource::Synthetic,
        ),
        (None, None) => bail!("provide either --csv <file> or --synthetic <days>"),
        (Some(_), Some(_)) => bail!("--csv and --synthetic are mutually exclusive"),
    };

    println!(
        "Analyzing {} ({} rows, {:?})...",
        config.symbol,
        prices.len(),
        source
    );
    let report = run_analysis(&config, &prices, source)?;

    print_summary(&report);

    if let Some(dir) = out {
        let written = save_artifacts(&report, &dir)?;
        for path in written {
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn cmd_synth(days: usize, seed: u64, out: PathBuf) -> Result<()> {
    let prices = synthetic_prices("SYN", days, seed);
    let mut text = String::from("date,close\n");
    for point in prices.points() {
        text.push_str(&format!("{},{}\n", point.date, point.close));
    }
    std::fs::write(&out, text)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("wrote {} ({days} trading days, seed {seed})", out.display());
    Ok(())
}

fn print_summary(report: &aplab_runner::AnalysisReport) {
    let p = &report.passive.metrics;
    let m = &report.momentum.metrics;
    println!();
    println!("                      passive     momentum");
    println!(
        "total return      {:>9.2}%   {:>9.2}%",
        p.total_return * 100.0,
        m.total_return * 100.0
    );
    println!(
        "annualized        {:>9.2}%   {:>9.2}%",
        p.annualized_return * 100.0,
        m.annualized_return * 100.0
    );
    println!(
        "sharpe            {:>10.3}   {:>10.3}",
        p.sharpe_ratio, m.sharpe_ratio
    );
    println!(
        "max drawdown      {:>9.2}%   {:>9.2}%",
        p.max_drawdown * 100.0,
        m.max_drawdown * 100.0
    );
    println!();
    match report.decomposition.record() {
        Some(record) => {
            println!("active (δp)       {:>12.6}", record.active);
            println!("passive (νp)      {:>12.6}", record.passive);
            println!("active ratio (θp) {:>12.4}", record.active_ratio);
            println!("correlation       {:>12.3}", record.correlation);
            println!(
                "sample            {:>12} ({:?})",
                record.sample_size, record.significance
            );
        }
        None => println!("decomposition degenerate: {:?}", report.decomposition),
    }
    println!(
        "information ratio {:>12.4}",
        report.extended.information_ratio
    );
}
