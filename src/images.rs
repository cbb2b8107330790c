use std::collections::{BTreeMap, HashSet};

use crate::aggregate::{ItemIndex, is_primary_cover};
use crate::formats::CoverImage;
use crate::layout::HistoryColumns;
use crate::sheet::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub item_name: String,
    pub image_url: String,
}

impl HistoryRow {
    /// `None` unless both the item name and the image URL are present.
    pub fn from_row(row: &Row, columns: &HistoryColumns) -> Option<Self> {
        Some(Self {
            item_name: row.get(&columns.item_name).trimmed_text()?,
            image_url: row.get(&columns.image_url).trimmed_text()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImages {
    pub series_images: BTreeMap<String, String>,
    /// Series name to issue number to covers, primary cover first.
    pub issue_covers: BTreeMap<String, BTreeMap<u32, Vec<CoverImage>>>,
}

#[derive(Debug, Default)]
pub struct ImageResolver {
    images: ResolvedImages,
    seen: HashSet<(String, u32, String)>,
    attributed: usize,
    unattributed: usize,
}

impl ImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the item name has no purchase to attribute to.
    pub fn observe(&mut self, row: &HistoryRow, items: &ItemIndex) -> bool {
        let Some(purchase) = items.get(&row.item_name) else {
            self.unattributed += 1;
            return false;
        };
        self.attributed += 1;
        let primary = purchase.is_primary_cover();

        if primary || !self.images.series_images.contains_key(&purchase.series) {
            self.images
                .series_images
                .insert(purchase.series.clone(), row.image_url.clone());
        }

        let key = (
            purchase.series.clone(),
            purchase.issue_number,
            purchase.cover_variant.clone(),
        );
        if self.seen.insert(key) {
            self.images
                .issue_covers
                .entry(purchase.series.clone())
                .or_default()
                .entry(purchase.issue_number)
                .or_default()
                .push(CoverImage {
                    cover: purchase.cover_variant.clone(),
                    image_url: row.image_url.clone(),
                });
        }
        true
    }

    pub fn observe_rows(&mut self, rows: &[Row], columns: &HistoryColumns, items: &ItemIndex) {
        for row in rows {
            if let Some(history) = HistoryRow::from_row(row, columns) {
                self.observe(&history, items);
            }
        }
    }

    pub fn finish(mut self) -> ResolvedImages {
        for issues in self.images.issue_covers.values_mut() {
            for covers in issues.values_mut() {
                sort_covers(covers);
            }
        }
        tracing::debug!(
            attributed = self.attributed,
            unattributed = self.unattributed,
            series = self.images.series_images.len(),
            "resolved history images"
        );
        self.images
    }
}

/// Primary cover first, then by cover label. Stable for equal labels.
pub fn sort_covers(covers: &mut [CoverImage]) {
    covers.sort_by(|a, b| {
        let rank = |c: &CoverImage| u8::from(!is_primary_cover(&c.cover));
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.cover.cmp(&b.cover))
    });
}

pub fn resolve_images(
    sources: &[Vec<Row>],
    columns: &HistoryColumns,
    items: &ItemIndex,
) -> ResolvedImages {
    let mut resolver = ImageResolver::new();
    for rows in sources {
        resolver.observe_rows(rows, columns, items);
    }
    resolver.finish()
}
