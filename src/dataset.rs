use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use sha2::Digest as _;

use crate::aggregate::PurchaseLedger;
use crate::formats::{Collection, SeriesRecord};
use crate::images::ResolvedImages;
use crate::slug::slugify;

pub const PUBLISHER: &str = "DC";

/// Merges ledger ownership, summary hints and images into the dataset.
/// Series are ordered by name.
pub fn build_collection(
    ledger: &PurchaseLedger,
    hints: &BTreeMap<String, u32>,
    images: &ResolvedImages,
) -> Collection {
    let series = ledger
        .ownership
        .iter()
        .map(|(name, owned)| {
            let total_issues = match hints.get(name) {
                Some(&hint) if hint > 0 => hint,
                _ => owned.max_issue().unwrap_or(0),
            };
            SeriesRecord {
                id: slugify(name),
                name: name.clone(),
                publisher: PUBLISHER.to_owned(),
                total_issues,
                owned_primary_cover: owned.primary_cover.iter().copied().collect(),
                owned_other_cover: owned.other_cover().collect(),
                image_url: images.series_images.get(name).cloned().unwrap_or_default(),
                issue_covers: images.issue_covers.get(name).cloned().unwrap_or_default(),
            }
        })
        .collect();

    Collection { series }
}

pub fn render_json(collection: &Collection) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(collection).context("serialize collection")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Replaces `path` with the rendered collection in one step and returns the
/// hex SHA-256 of what was written.
pub fn write_collection(path: &Path, collection: &Collection) -> anyhow::Result<String> {
    let bytes = render_json(collection)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create output dir: {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in: {}", parent.display()))?;
    tmp.write_all(&bytes).context("write collection")?;
    tmp.flush().context("flush collection")?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("replace output: {}", path.display()))?;

    Ok(hex::encode(sha2::Sha256::digest(&bytes)))
}
