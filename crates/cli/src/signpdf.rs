//! signpdf - stamp a signature image onto a PDF
//!
//! A command line front end for the rubrica assembly engine: pick the
//! target pages, the corner and size, optionally a preview watermark,
//! and write the signed PDF next to the input.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use rubrica_core::util::format_bytes;
use rubrica_core::{
    AssembleOptions, Corner, PageMode, Placement, PlacementConfig, assemble,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Placement strategy for the signature.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum PlacementArg {
    /// Centered at the bottom margin
    Keyword,
    /// One or both bottom corners (default)
    #[default]
    Corners,
}

impl From<PlacementArg> for Placement {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::Keyword => Self::Keyword,
            PlacementArg::Corners => Self::Corners,
        }
    }
}

/// Which bottom corner(s) receive the signature.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum CornerArg {
    BottomLeft,
    #[default]
    BottomRight,
    BottomBoth,
}

impl From<CornerArg> for Corner {
    fn from(value: CornerArg) -> Self {
        match value {
            CornerArg::BottomLeft => Self::BottomLeft,
            CornerArg::BottomRight => Self::BottomRight,
            CornerArg::BottomBoth => Self::BottomBoth,
        }
    }
}

/// Which pages receive the signature.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum PagesArg {
    /// Every page
    All,
    /// Only the final page (default)
    #[default]
    Last,
    /// Pages named by --custom-pages
    Custom,
}

impl From<PagesArg> for PageMode {
    fn from(value: PagesArg) -> Self {
        match value {
            PagesArg::All => Self::All,
            PagesArg::Last => Self::Last,
            PagesArg::Custom => Self::Custom,
        }
    }
}

/// Stamp a signature image onto selected pages of a PDF.
#[derive(Parser, Debug)]
#[command(name = "signpdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input PDF
    pdf: PathBuf,

    /// Path to the signature image (PNG or JPEG, sniffed by content)
    signature: PathBuf,

    /// Placement strategy
    #[arg(long, value_enum, default_value = "corners")]
    placement: PlacementArg,

    /// Corner selection, used with --placement corners
    #[arg(long, value_enum, default_value = "bottom-right")]
    corner: CornerArg,

    /// Page selection mode
    #[arg(long, value_enum, default_value = "last")]
    pages: PagesArg,

    /// Page ranges like "1,3,5-7" (1-based), used with --pages custom
    #[arg(long, default_value = "")]
    custom_pages: String,

    /// Signature width as a percentage of the page width (5-50 sensible)
    #[arg(short = 's', long, default_value_t = 20.0)]
    size: f64,

    /// Add the removable PREVIEW ONLY watermark to every signed page
    #[arg(long, action = ArgAction::SetTrue)]
    preview: bool,

    /// Output path (default: <prefix>document.pdf next to the input)
    #[arg(short = 'o', long)]
    outfile: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn run(args: &Args) -> Result<()> {
    let pdf_bytes = fs::read(&args.pdf)
        .with_context(|| format!("failed to read PDF {}", args.pdf.display()))?;
    let signature_bytes = fs::read(&args.signature)
        .with_context(|| format!("failed to read signature image {}", args.signature.display()))?;

    let options = AssembleOptions {
        pages: args.pages.into(),
        custom_pages: args.custom_pages.clone(),
        placement: PlacementConfig {
            placement: args.placement.into(),
            corner: args.corner.into(),
            size_percent: args.size,
        },
        preview: args.preview,
    };

    let signed = assemble(&pdf_bytes, &signature_bytes, &options)?;

    let outfile = args
        .outfile
        .clone()
        .unwrap_or_else(|| args.pdf.with_file_name(signed.suggested_filename()));
    fs::write(&outfile, &signed.bytes)
        .with_context(|| format!("failed to write output {}", outfile.display()))?;

    if args.json {
        let summary = serde_json::json!({
            "output": outfile.display().to_string(),
            "bytes": signed.bytes.len(),
            "pages_signed": signed.pages_signed,
            "preview": args.preview,
            "expires_at": signed.expires_at.to_rfc3339(),
        });
        println!("{summary}");
    } else {
        println!(
            "Signed {} page(s) -> {} ({}), draft expires {}",
            signed.pages_signed,
            outfile.display(),
            format_bytes(signed.bytes.len() as u64),
            signed.expires_at.to_rfc3339(),
        );
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .init();
    }

    if let Err(err) = run(&args) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
