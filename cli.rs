//! CLI argument parsing for pattern-detector

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use crate::patterns::DEFAULT_TOP_N;

#[derive(Parser, Debug)]
#[command(name = "pattern-detector")]
#[command(version)]
#[command(about = "Find and chart frequent word sequences in a text file", long_about = None)]
pub struct Cli {
    /// UTF-8 text file to analyze
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of top patterns to print and chart
    #[arg(short = 'n', long = "top", default_value_t = DEFAULT_TOP_N,
          value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub top: usize,

    /// Directory where saved results are written
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Skip the interactive bar chart
    #[arg(long = "no-chart")]
    pub no_chart: bool,

    /// Enable verbose tracing output on stderr
    #[arg(short, long)]
    pub debug: bool,
}
