use std::io::{self, BufReader};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use pattern_detector::chart::{NoChart, Renderer, TerminalChart};
use pattern_detector::cli::Cli;
use pattern_detector::corpus::{Corpus, WordTokenizer};
use pattern_detector::session::{self, SessionContext, StdConsole};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "warn"; // used when RUST_LOG is unset and --debug is off

/// Initialize tracing subscriber; stderr keeps stdout free for the report
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let corpus = Corpus::load(&cli.input, &WordTokenizer)
        .with_context(|| format!("Failed to load input text {}", cli.input.display()))?;
    let ctx = SessionContext::new(
        cli.input.clone(),
        corpus,
        cli.output_dir.clone(),
        cli.top,
        Local::now().date_naive(),
    );

    let mut renderer: Box<dyn Renderer> = if cli.no_chart {
        Box::new(NoChart)
    } else {
        Box::new(TerminalChart)
    };
    let mut console = StdConsole::new(BufReader::new(io::stdin()), io::stdout());

    session::run(&ctx, &mut console, renderer.as_mut()).context("Interactive session failed")?;
    Ok(())
}
