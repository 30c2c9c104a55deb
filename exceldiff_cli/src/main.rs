use anyhow::{bail, Context};
use clap::Parser;
use exceldiff_common::{
    load_config, load_config_from, AppConfig, DiffOptions, DiffResult, DiffSummary, RowDiff,
};
use exceldiff_core::{
    CsvRenderer, LoadedSheet, ReaderRegistry, TextRenderer, WorksheetDiffEngine, XlsxRenderer,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_SAME: i32 = 0;
const EXIT_DIFFERENT: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "exceldiff")]
#[command(author = "ExcelDiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Compare two worksheets row by row and report the differences", long_about = None)]
struct Cli {
    /// First file (baseline)
    file1: PathBuf,

    /// Second file (comparison)
    file2: PathBuf,

    /// Write the report to this path (colored workbook for .xlsx, CSV otherwise)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sheet name in the first file (default: first sheet)
    #[arg(long)]
    sheet1: Option<String>,

    /// Sheet name in the second file (default: first sheet)
    #[arg(long)]
    sheet2: Option<String>,

    /// Only output rows with differences (exclude identical rows)
    #[arg(short = 'd', long)]
    diff_only: bool,

    /// Do not include the header row when using --diff-only
    #[arg(long)]
    no_header: bool,

    /// Share of equal columns (0 to 1) for two rows to count as one modified row
    #[arg(short = 't', long)]
    threshold: Option<f64>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Disable ANSI colors in output
    #[arg(long)]
    no_color: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    // Initialize tracing to stderr (so report output can go cleanly to stdout)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let code = match run_diff(&cli) {
        Ok(true) => EXIT_DIFFERENT,
        Ok(false) => EXIT_SAME,
        Err(e) => {
            error!("Diff failed: {:#}", e);
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

/// Returns whether the two sheets differ
fn run_diff(cli: &Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?.config,
        None => load_config()?.config,
    };
    let options = build_options(cli, &config)?;

    let registry = ReaderRegistry::default();
    for path in [&cli.file1, &cli.file2] {
        if !path.exists() {
            bail!("Path does not exist: {}", path.display());
        }
        if !registry.supports(path) {
            bail!("{} is not a supported spreadsheet", path.display());
        }
    }

    let left = load_sheet(&registry, &cli.file1, cli.sheet1.as_deref())?;
    let right = load_sheet(&registry, &cli.file2, cli.sheet2.as_deref())?;

    info!("Comparing worksheets...");
    let engine = WorksheetDiffEngine::with_options(options);
    let result = engine.diff(&left.rows, &right.rows);
    let summary = result.summary();

    if cli.json {
        let report = build_json_report(&cli.file1, &cli.file2, &left, &right, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let use_color = !cli.no_color && config.color && std::io::stdout().is_terminal();
        print_report(&result, use_color)?;
    }

    if let Some(output) = &cli.output {
        let written = write_report(&result, output)?;
        info!("Diff written to {} ({} rows)", output.display(), written);
    }

    Ok(summary.has_differences())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Xlsx,
    Csv,
}

impl ReportFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ReportFormat::Xlsx,
            _ => ReportFormat::Csv,
        }
    }
}

/// Write the report file and return the number of rows written
fn write_report(result: &DiffResult, output: &Path) -> anyhow::Result<usize> {
    let written = match ReportFormat::for_path(output) {
        ReportFormat::Xlsx => XlsxRenderer::new().write(result, output)?,
        ReportFormat::Csv => {
            let file = File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            CsvRenderer::new().write(result, BufWriter::new(file))?
        }
    };
    Ok(written)
}

fn build_options(cli: &Cli, config: &AppConfig) -> anyhow::Result<DiffOptions> {
    let threshold = cli.threshold.unwrap_or(config.match_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        bail!("Threshold must be between 0 and 1, got {}", threshold);
    }

    let diff_only = cli.diff_only || config.diff_only;
    let include_header = diff_only && !cli.no_header && config.include_header;

    Ok(DiffOptions::new()
        .with_diff_only(diff_only)
        .with_include_header(include_header)
        .with_match_threshold(threshold))
}

fn load_sheet(
    registry: &ReaderRegistry,
    path: &Path,
    sheet: Option<&str>,
) -> anyhow::Result<LoadedSheet> {
    let loaded = registry
        .load(path, sheet)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if sheet.is_none() {
        info!(
            "Reading first sheet from {}: '{}'",
            path.display(),
            loaded.sheet_name
        );
    }
    info!("Loaded {} rows from {}", loaded.rows.len(), path.display());

    Ok(loaded)
}

fn print_report(result: &DiffResult, use_color: bool) -> std::io::Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("Comparison Results");
    println!("{}", "=".repeat(80));

    let stdout = std::io::stdout();
    TextRenderer::new()
        .with_color(use_color)
        .write_to(result, stdout.lock())?;

    let summary = result.summary();
    println!("\n{}", "=".repeat(80));
    println!("Diff Summary:");
    println!("  Identical rows: {}", summary.identical);
    println!("  Modified rows:  {}", summary.modified);
    println!("  Removed rows:   {}", summary.removed);
    println!("  Added rows:     {}", summary.added);
    println!("{}", "=".repeat(80));

    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    left: String,
    right: String,
    sheet_left: &'a str,
    sheet_right: &'a str,
    summary: DiffSummary,
    entries: &'a [RowDiff],
}

fn build_json_report<'a>(
    left: &Path,
    right: &Path,
    left_sheet: &'a LoadedSheet,
    right_sheet: &'a LoadedSheet,
    result: &'a DiffResult,
) -> JsonReport<'a> {
    JsonReport {
        left: left.to_string_lossy().to_string(),
        right: right.to_string_lossy().to_string(),
        sheet_left: &left_sheet.sheet_name,
        sheet_right: &right_sheet.sheet_name,
        summary: result.summary(),
        entries: result.entries(),
    }
}
