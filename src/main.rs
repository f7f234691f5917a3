//! Mprof Studio CLI
//!
//! Turns binary memory-allocation profiles into ranked hot-spot tables,
//! call graphs and detail dumps.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use mprof_studio::aggregator::{AccountingMode, RankBy};
use mprof_studio::commands::{execute_inspect, execute_report, validate_args, ReportArgs};
use mprof_studio::utils::config::{DEFAULT_RENDERER, SCHEMA_VERSION};

/// Mprof Studio - memory allocation profile analysis
#[derive(Parser, Debug)]
#[command(name = "mprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse a profile and produce reports
    Report {
        /// Binary profile file
        #[arg(short, long)]
        input: PathBuf,

        /// Accounting mode
        #[arg(long, value_enum, default_value_t = AccountingMode::InUse)]
        mode: AccountingMode,

        /// Shorthand for --mode inuse
        #[arg(long, conflicts_with = "mode")]
        inuse: bool,

        /// Rank by flat (self) or cumulative volume
        #[arg(long, value_enum, default_value_t = RankBy::Flat)]
        rank: RankBy,

        /// Print the ranking table to stdout
        #[arg(long)]
        text: bool,

        /// Disable highlighting of the top entries
        #[arg(long)]
        no_color: bool,

        /// Output path for a PNG call graph
        #[arg(long)]
        png: Option<PathBuf>,

        /// Output path for an SVG call graph
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Output path for the DOT call graph description
        #[arg(long)]
        dot: Option<PathBuf>,

        /// Output path for the detail dump of every sample
        #[arg(long)]
        info: Option<PathBuf>,

        /// Output path for a JSON report
        #[arg(long)]
        json: Option<PathBuf>,

        /// Graphviz-compatible layout program
        #[arg(long, env = "MPROF_RENDERER", default_value = DEFAULT_RENDERER)]
        renderer: String,
    },

    /// Decode a profile and print a summary
    Inspect {
        /// Binary profile file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            input,
            mode,
            inuse,
            rank,
            text,
            no_color,
            png,
            svg,
            dot,
            info,
            json,
            renderer,
        } => {
            let args = ReportArgs {
                input,
                mode: if inuse { AccountingMode::InUse } else { mode },
                rank_by: rank,
                print_text: text,
                color: !no_color,
                output_png: png,
                output_svg: svg,
                output_dot: dot,
                output_info: info,
                output_json: json,
                renderer,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(&args)?;
        }

        Commands::Inspect { input } => {
            execute_inspect(&input)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
fn display_version() {
    println!("Mprof Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Memory allocation profile analysis: hot spots, call graphs, detail dumps.");
}
