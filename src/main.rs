use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use cidmetrics::{load_font, CompiledFont, FontSource, WidthRange};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Compile TCPDF CID font metrics files and print a JSON summary.",
    arg_required_else_help = true
)]
pub struct Args {
    /// Metrics files to compile (e.g. cid0jp.php). Includes are resolved
    /// next to each file.
    #[clap(required = true)]
    pub metrics: Vec<String>,

    /// Optional output file path. If omitted, writes to stdout.
    #[clap(short, long)]
    pub output: Option<String>,

    /// Pretty print the JSON output.
    #[clap(short, long)]
    pub pretty: bool,

    /// Include the glyph map in the output.
    #[clap(long)]
    pub glyphs: bool,

    /// Log parsing details.
    #[clap(short, long)]
    pub verbose: bool,

    /// Directory for a log file.
    #[clap(long)]
    pub log_dir: Option<String>,
}

#[derive(Serialize)]
struct FontSummary<'a> {
    path: &'a str,
    base_font: String,
    #[serde(flatten)]
    record: &'a cidmetrics::MetricsRecord,
    glyph_count: usize,
    widths: &'a [WidthRange],
    #[serde(skip_serializing_if = "Option::is_none")]
    glyph_map: Option<&'a cidmetrics::GlyphMap>,
}

fn expand(path: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(path).with_context(|| format!("cannot expand path {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _guard = match &args.log_dir {
        Some(dir) => Some(
            cidmetrics::logging::init_logging_with_dir(args.verbose, expand(dir)?)
                .context("cannot set up log directory")?,
        ),
        None => {
            cidmetrics::logging::init_logging(args.verbose);
            None
        }
    };

    let paths = args
        .metrics
        .iter()
        .map(|p| expand(p))
        .collect::<Result<Vec<_>>>()?;

    // Each file is an independent session.
    let fonts = paths
        .par_iter()
        .map(|path| {
            load_font(FontSource::Path(path.clone()))
                .with_context(|| format!("failed to compile {}", path.display()))
        })
        .collect::<Result<Vec<CompiledFont>>>()?;

    let summaries: Vec<FontSummary> = args
        .metrics
        .iter()
        .zip(&fonts)
        .map(|(path, font)| FontSummary {
            path,
            base_font: font.record.base_font_name(),
            record: &font.record,
            glyph_count: font.glyphs.len(),
            widths: font.widths.ranges(),
            glyph_map: args.glyphs.then_some(&font.glyphs),
        })
        .collect();

    let json = if args.pretty {
        serde_json::to_string_pretty(&summaries)?
    } else {
        serde_json::to_string(&summaries)?
    };

    match &args.output {
        Some(path) => {
            let path = expand(path)?;
            fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))?;
            info!("Output written to: {:?}", path);
        }
        None => println!("{json}"),
    }
    Ok(())
}
