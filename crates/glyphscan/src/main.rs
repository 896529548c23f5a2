//! # glyphscan
//!
//! Detects UI elements (arrows, media controls, buttons, progress bars,
//! toggles, inputs) in a glyph-rendered screenshot and prints the grid with
//! each element replaced by a canonical symbol, followed by a report.
//!
//! ## Architecture
//!
//! This is Layer 2 - the binary that ties together:
//! - glyphscan-core: Grid, geometry, configuration
//! - glyphscan-detector: Template library, scanners, resolver, annotator

use glyphscan::{report_schema, run, Options, USAGE};

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let options = Options::parse(std::env::args().skip(1))?;
    if options.help {
        print!("{USAGE}");
        return Ok(());
    }
    if options.schema {
        println!("{}", report_schema()?);
        return Ok(());
    }

    let config = options.load_config()?;

    // Initialize logging on stderr; stdout carries the result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::debug!("glyphscan v{} starting", env!("CARGO_PKG_VERSION"));

    let text = options.read_input()?;
    let output = run(&options, &config, &text)?;
    println!("{output}");

    Ok(())
}
