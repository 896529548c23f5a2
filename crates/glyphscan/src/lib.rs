//! glyphscan command-line library.
//!
//! Argument handling, input loading and output rendering for the binary.
//! The binary itself is in main.rs.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Serialize;

use glyphscan_core::{DetectorConfig, Grid};
use glyphscan_detector::{Analysis, DetectionReport, Detector, ScanStats};

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: glyphscan [OPTIONS] [FILE]

Detect UI elements in a glyph grid and print the annotated grid.
Reads FILE, or standard input when FILE is omitted or '-'.

Options:
  --json           Print a JSON document instead of text
  --config PATH    Load detector settings from a YAML file
  --context        Enable the border/keyword context bonus
  --schema         Print the JSON schema of the detection report
  -h, --help       Print this help
";

/// Parsed command-line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Input file; `None` reads stdin
    pub input: Option<PathBuf>,
    /// YAML config file
    pub config: Option<PathBuf>,
    /// Emit JSON
    pub json: bool,
    /// Force the context bonus on
    pub context: bool,
    /// Print the report schema and exit
    pub schema: bool,
    /// Print usage and exit
    pub help: bool,
}

impl Options {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => options.json = true,
                "--context" => options.context = true,
                "--schema" => options.schema = true,
                "-h" | "--help" => options.help = true,
                "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    options.config = Some(PathBuf::from(path));
                }
                "-" => options.input = None,
                flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
                path => {
                    if options.input.is_some() {
                        bail!("only one input file may be given");
                    }
                    options.input = Some(PathBuf::from(path));
                }
            }
        }

        Ok(options)
    }

    /// Load the config file (or defaults) and apply command-line overrides.
    pub fn load_config(&self) -> anyhow::Result<DetectorConfig> {
        let mut config = match &self.config {
            Some(path) => DetectorConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => DetectorConfig::default(),
        };
        if self.context {
            config.scan.context_bonus = true;
        }
        Ok(config)
    }

    /// Read the input grid text.
    pub fn read_input(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read standard input")?;
                Ok(text)
            }
        }
    }
}

/// JSON document written by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    /// Annotated grid, one string per row
    pub grid: Vec<String>,
    /// Detection report
    pub report: &'a DetectionReport,
    /// Scan counters
    pub stats: &'a ScanStats,
}

/// Run detection over grid text.
pub fn analyze_text(config: &DetectorConfig, text: &str) -> Analysis {
    let grid = Grid::from_text(text.strip_suffix('\n').unwrap_or(text));
    tracing::debug!("Read grid: {} rows, widest {}", grid.height(), grid.max_width());
    Detector::from_config(config).analyze(&grid)
}

/// Render an analysis as text or JSON.
pub fn render(analysis: &Analysis, json: bool) -> anyhow::Result<String> {
    if json {
        let output = JsonOutput {
            generated_at: chrono::Utc::now().to_rfc3339(),
            grid: (0..analysis.grid.height())
                .map(|r| analysis.grid.row_text(r))
                .collect(),
            report: &analysis.report,
            stats: &analysis.stats,
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    let mut text = analysis.grid.to_text();
    text.push_str("\n\n");
    text.push_str(&analysis.report.to_string());
    Ok(text)
}

/// JSON schema of [`DetectionReport`].
pub fn report_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(DetectionReport);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Run the command for already-parsed options and input text.
pub fn run(options: &Options, config: &DetectorConfig, text: &str) -> anyhow::Result<String> {
    let analysis = analyze_text(config, text);

    let stats = &analysis.stats;
    if stats.budget_exhausted {
        tracing::warn!(
            "Scan stopped early after {} cell comparisons; raise scan.max_work to scan every template",
            stats.work
        );
    }
    tracing::info!(
        "{} element(s) detected ({} candidates, {} conflicts dropped)",
        stats.accepted,
        stats.raw_candidates,
        stats.conflicts_dropped
    );

    render(&analysis, options.json)
}
