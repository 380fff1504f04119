//! sweepdrafts - delete draft files past the 24-hour retention horizon
//!
//! Runs the rubrica retention sweep over a directory of drafts, using
//! file modification time as the upload timestamp. Meant to be invoked
//! from cron; the in-process deletion timers of earlier designs are
//! gone on purpose.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser};
use rubrica_core::retention::{ArtifactMeta, ArtifactStore, SweepPage, sweep_expired};
use tracing_subscriber::EnvFilter;

/// Delete expired draft files from a directory.
#[derive(Parser, Debug)]
#[command(name = "sweepdrafts")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding draft files
    dir: PathBuf,

    /// Report what would be deleted without deleting anything
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Print a JSON summary instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

/// Artifact store over a local directory: one file per artifact, file
/// mtime as the upload timestamp, numeric listing cursor over a snapshot
/// taken at startup.
struct DirStore {
    entries: Vec<ArtifactMeta>,
    dry_run: bool,
}

impl DirStore {
    fn open(dir: &PathBuf, dry_run: bool) -> Result<Self> {
        let mut entries = Vec::new();
        for entry in
            fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            entries.push(ArtifactMeta {
                key: entry.path().display().to_string(),
                uploaded_at: DateTime::<Utc>::from(modified),
            });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(Self { entries, dry_run })
    }
}

impl ArtifactStore for DirStore {
    fn list(&self, cursor: Option<&str>, limit: usize) -> rubrica_core::Result<SweepPage> {
        let start = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let end = (start + limit).min(self.entries.len());
        let artifacts = self.entries[start..end].to_vec();
        let cursor = (end < self.entries.len()).then(|| end.to_string());
        Ok(SweepPage { artifacts, cursor })
    }

    fn delete(&self, keys: &[String]) -> rubrica_core::Result<()> {
        if self.dry_run {
            return Ok(());
        }
        for key in keys {
            fs::remove_file(key)?;
        }
        Ok(())
    }
}

fn run(args: &Args) -> Result<()> {
    let store = DirStore::open(&args.dir, args.dry_run)?;
    let report = sweep_expired(&store, Utc::now())?;

    if args.json {
        let summary = serde_json::json!({
            "checked": report.checked,
            "deleted": report.deleted,
            "dry_run": args.dry_run,
            "errors": report.errors,
        });
        println!("{summary}");
    } else {
        let verb = if args.dry_run { "would delete" } else { "deleted" };
        println!(
            "Checked {} draft(s), {verb} {} expired",
            report.checked, report.deleted
        );
        for err in &report.errors {
            eprintln!("warning: {err}");
        }
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
