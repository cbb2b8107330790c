use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::aggregate::{aggregate_purchases, summary_hints};
use crate::cli::ImportArgs;
use crate::dataset::{build_collection, write_collection};
use crate::images::ImageResolver;
use crate::layout::ImportLayout;
use crate::sheet::{is_supported_file, read_rows};

/// Reads every input, then writes the dataset. Nothing is written when any
/// input fails to load.
pub fn run(args: ImportArgs) -> anyhow::Result<()> {
    let layout = ImportLayout::load_or_default(args.layout.as_deref()).context("load layout")?;

    tracing::info!(ledger = %args.ledger.display(), "import: purchases");
    let purchase_rows = read_rows(&args.ledger, Some(layout.purchases.sheet.as_str()))
        .context("read purchase sheet")?;
    let ledger = aggregate_purchases(&purchase_rows, &layout.purchases);

    tracing::info!("import: summary");
    let summary_rows = read_rows(&args.ledger, Some(layout.summary.sheet.as_str()))
        .context("read summary sheet")?;
    let hints = summary_hints(&summary_rows, &layout.summary);

    let history_files = history_files(&args)?;
    let mut resolver = ImageResolver::new();
    for path in &history_files {
        tracing::info!(history = %path.display(), "import: history");
        let rows = read_rows(path, layout.history.sheet.as_deref())
            .with_context(|| format!("read history: {}", path.display()))?;
        resolver.observe_rows(&rows, &layout.history, &ledger.items);
    }
    let images = resolver.finish();

    let collection = build_collection(&ledger, &hints, &images);

    tracing::info!(out = %args.out.display(), "import: write");
    let digest = write_collection(&args.out, &collection).context("write collection")?;
    tracing::info!(sha256 = %digest, series = collection.series.len(), "import: done");

    println!(
        "Wrote {} series to {}",
        collection.series.len(),
        args.out.display()
    );
    Ok(())
}

/// `--history` files that exist plus matches from `--history-dir`, sorted by
/// path and deduplicated.
fn history_files(args: &ImportArgs) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in &args.history {
        if path.exists() {
            files.push(path.clone());
        } else {
            tracing::warn!(history = %path.display(), "history file not found; skipping");
        }
    }
    if let Some(dir) = &args.history_dir {
        files.extend(discover_history(dir, &args.history_prefix)?);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn discover_history(dir: &Path, prefix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("read history dir: {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("read history dir entry: {}", dir.display()))?
            .path();
        let matches_prefix = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(prefix));
        if path.is_file() && matches_prefix && is_supported_file(&path) {
            found.push(path);
        }
    }
    tracing::debug!(dir = %dir.display(), files = found.len(), "discovered history files");
    Ok(found)
}
