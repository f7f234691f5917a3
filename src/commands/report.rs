//! Report command implementation.
//!
//! The report command:
//! 1. Reads and decodes the profile
//! 2. Aggregates flat and cumulative volume
//! 3. Prints the ranking table
//! 4. Builds and renders the call graph
//! 5. Writes the detail dump and JSON report

use super::utils::load_profile;
use crate::aggregator::{aggregate, rank, AccountingMode, RankBy};
use crate::callgraph::{build_graph_from, GraphRenderer, GraphvizRenderer, ImageFormat};
use crate::output::{write_artifact, write_report};
use crate::report::{format_detail, format_ranking, to_report, RankingOptions};
use crate::utils::config::DEFAULT_RENDERER;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Binary profile to analyse
    pub input: PathBuf,

    pub mode: AccountingMode,
    pub rank_by: RankBy,

    /// Print the ranking table to stdout
    pub print_text: bool,

    /// Highlight top entries in the ranking table
    pub color: bool,

    pub output_png: Option<PathBuf>,
    pub output_svg: Option<PathBuf>,
    pub output_dot: Option<PathBuf>,

    /// Detail dump of every sample
    pub output_info: Option<PathBuf>,

    pub output_json: Option<PathBuf>,

    /// Graphviz-compatible layout program
    pub renderer: String,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            mode: AccountingMode::InUse,
            rank_by: RankBy::Flat,
            print_text: false,
            color: true,
            output_png: None,
            output_svg: None,
            output_dot: None,
            output_info: None,
            output_json: None,
            renderer: DEFAULT_RENDERER.to_string(),
        }
    }
}

impl ReportArgs {
    fn wants_images(&self) -> bool {
        self.output_png.is_some() || self.output_svg.is_some()
    }

    fn wants_graph(&self) -> bool {
        self.wants_images() || self.output_dot.is_some()
    }

    fn wants_files(&self) -> bool {
        self.wants_graph() || self.output_info.is_some() || self.output_json.is_some()
    }

    fn output_paths(&self) -> impl Iterator<Item = &PathBuf> {
        [
            &self.output_png,
            &self.output_svg,
            &self.output_dot,
            &self.output_info,
            &self.output_json,
        ]
        .into_iter()
        .flatten()
    }
}

/// What a report run produced
#[derive(Debug, Clone, Default)]
pub struct ReportOutcome {
    /// Ranking table, when it was printed
    pub text: Option<String>,

    /// Files written, in write order
    pub written: Vec<PathBuf>,
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input profile path cannot be empty");
    }

    if args.wants_images() && args.renderer.trim().is_empty() {
        anyhow::bail!("Renderer program cannot be empty when rendering images");
    }

    let paths: Vec<&PathBuf> = args.output_paths().collect();
    for (i, path) in paths.iter().enumerate() {
        if paths[i + 1..].contains(path) {
            anyhow::bail!("Output path used more than once: {}", path.display());
        }
        if **path == args.input {
            anyhow::bail!("Output path would overwrite the input: {}", path.display());
        }
    }

    Ok(())
}

/// Execute the report command with the configured Graphviz program
///
/// **Public** - main entry point called from main.rs
pub fn execute_report(args: &ReportArgs) -> Result<ReportOutcome> {
    let renderer = GraphvizRenderer::new(args.renderer.clone());
    execute_report_with(args, &renderer)
}

/// Execute the report command with an explicit renderer
///
/// # Errors
/// * Unreadable or malformed input
/// * Image rendering requested for a profile with no data
/// * Renderer or file write failures
pub fn execute_report_with(args: &ReportArgs, renderer: &dyn GraphRenderer) -> Result<ReportOutcome> {
    let start_time = Instant::now();
    let mut outcome = ReportOutcome::default();

    info!("Step 1/5: Decoding {}...", args.input.display());
    let profile = load_profile(&args.input)?;
    info!(
        "Decoded {} functions and {} samples",
        profile.functions.len(),
        profile.samples.len()
    );

    info!("Step 2/5: Aggregating in {} mode...", args.mode);
    let aggregation = aggregate(&profile, args.mode);
    debug!(
        "Total {} bytes / {} objects",
        aggregation.total.bytes, aggregation.total.objects
    );

    if args.print_text || !args.wants_files() {
        info!("Step 3/5: Ranking by {}...", args.rank_by);
        let ranked = rank(&aggregation, args.rank_by);
        let options = RankingOptions {
            by: args.rank_by,
            color: args.color,
        };
        let text = format_ranking(&profile, &aggregation, &ranked, options);
        print!("{}", text);
        outcome.text = Some(text);
    } else {
        info!("Step 3/5: Skipping ranking table (not requested)");
    }

    if args.wants_graph() {
        info!("Step 4/5: Building call graph...");
        let graph = build_graph_from(&profile, &aggregation);
        let dot = graph.to_dot();

        if let Some(path) = &args.output_dot {
            write_artifact(dot.as_bytes(), path).context("Failed to write DOT file")?;
            outcome.written.push(path.clone());
        }

        if args.wants_images() {
            aggregation
                .require_data()
                .context("Cannot render a call graph")?;

            let targets = [
                (&args.output_png, ImageFormat::Png),
                (&args.output_svg, ImageFormat::Svg),
            ];
            for (target, format) in targets {
                let Some(path) = target else { continue };
                let image = renderer
                    .render(&dot, format)
                    .with_context(|| format!("Failed to render {} call graph", format.as_str()))?;
                write_artifact(&image, path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("✓ Call graph written to: {}", path.display());
                outcome.written.push(path.clone());
            }
        }
    } else {
        info!("Step 4/5: Skipping call graph (not requested)");
    }

    info!("Step 5/5: Writing dumps...");
    if let Some(path) = &args.output_info {
        write_artifact(format_detail(&profile).as_bytes(), path)
            .context("Failed to write detail dump")?;
        info!("✓ Detail dump written to: {}", path.display());
        outcome.written.push(path.clone());
    }

    if let Some(path) = &args.output_json {
        let report = to_report(&profile, &aggregation, args.rank_by);
        write_report(&report, path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", path.display());
        outcome.written.push(path.clone());
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(outcome)
}
