use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::layout::{PurchaseColumns, SummaryColumns};
use crate::sheet::Row;

pub const PRIMARY_COVER_MARKER: &str = "CVR A";

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+").expect("valid digit run regex"));

pub fn is_primary_cover(cover_variant: &str) -> bool {
    cover_variant
        .to_uppercase()
        .contains(PRIMARY_COVER_MARKER)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRow {
    pub series: String,
    pub issue_number: u32,
    pub cover_variant: String,
    pub item_name: Option<String>,
}

impl PurchaseRow {
    /// `None` when the series name or issue number is absent.
    pub fn from_row(row: &Row, columns: &PurchaseColumns) -> Option<Self> {
        let series = present_text(row, &columns.series)?;
        let issue_number = row.get(&columns.issue_number).as_whole_number()?;
        let cover_variant = row
            .get(&columns.cover)
            .text()
            .map(|c| c.into_owned())
            .unwrap_or_default();
        let item_name = row.get(&columns.item_name).trimmed_text();
        Some(Self {
            series,
            issue_number,
            cover_variant,
            item_name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub series: String,
    pub owned_volumes_text: String,
}

impl SummaryRow {
    pub fn from_row(row: &Row, columns: &SummaryColumns) -> Option<Self> {
        let series = present_text(row, &columns.series)?;
        let owned_volumes_text = row
            .get(&columns.owned_volumes)
            .text()
            .map(|c| c.into_owned())
            .unwrap_or_default();
        Some(Self {
            series,
            owned_volumes_text,
        })
    }

    /// Largest number appearing in the free-text "owned volumes" field.
    pub fn max_issue_hint(&self) -> Option<u32> {
        DIGIT_RUN
            .find_iter(&self.owned_volumes_text)
            .filter_map(|m| m.as_str().parse::<u32>().ok())
            .max()
    }
}

fn present_text(row: &Row, column: &str) -> Option<String> {
    let cell = row.get(column);
    if cell.is_empty() {
        return None;
    }
    cell.text().map(|c| c.into_owned())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesOwnership {
    pub all: BTreeSet<u32>,
    pub primary_cover: BTreeSet<u32>,
}

impl SeriesOwnership {
    pub fn other_cover(&self) -> impl Iterator<Item = u32> + '_ {
        self.all.difference(&self.primary_cover).copied()
    }

    pub fn max_issue(&self) -> Option<u32> {
        self.all.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRef {
    pub series: String,
    pub issue_number: u32,
    pub cover_variant: String,
}

impl PurchaseRef {
    pub fn is_primary_cover(&self) -> bool {
        is_primary_cover(&self.cover_variant)
    }
}

/// Trimmed item name to its purchase. Later ledger rows overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    items: HashMap<String, PurchaseRef>,
}

impl ItemIndex {
    pub fn insert(&mut self, item_name: String, purchase: PurchaseRef) {
        self.items.insert(item_name, purchase);
    }

    pub fn get(&self, item_name: &str) -> Option<&PurchaseRef> {
        self.items.get(item_name.trim())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseLedger {
    /// Keyed by series name; iteration order is the output order.
    pub ownership: BTreeMap<String, SeriesOwnership>,
    pub items: ItemIndex,
}

pub fn aggregate_purchases(rows: &[Row], columns: &PurchaseColumns) -> PurchaseLedger {
    let mut ledger = PurchaseLedger::default();
    let mut skipped = 0_usize;

    for row in rows {
        let Some(purchase) = PurchaseRow::from_row(row, columns) else {
            skipped += 1;
            continue;
        };

        let owned = ledger
            .ownership
            .entry(purchase.series.clone())
            .or_default();
        owned.all.insert(purchase.issue_number);
        if is_primary_cover(&purchase.cover_variant) {
            owned.primary_cover.insert(purchase.issue_number);
        }

        if let Some(item_name) = purchase.item_name {
            ledger.items.insert(
                item_name,
                PurchaseRef {
                    series: purchase.series,
                    issue_number: purchase.issue_number,
                    cover_variant: purchase.cover_variant,
                },
            );
        }
    }

    tracing::debug!(
        rows = rows.len(),
        skipped,
        series = ledger.ownership.len(),
        items = ledger.items.len(),
        "aggregated purchases"
    );
    ledger
}

/// Series name to the largest issue number named in its summary row.
/// Later rows for the same series overwrite earlier ones.
pub fn summary_hints(rows: &[Row], columns: &SummaryColumns) -> BTreeMap<String, u32> {
    let mut hints = BTreeMap::new();
    for summary in rows.iter().filter_map(|row| SummaryRow::from_row(row, columns)) {
        if let Some(max) = summary.max_issue_hint() {
            hints.insert(summary.series, max);
        }
    }
    tracing::debug!(rows = rows.len(), hints = hints.len(), "read summary hints");
    hints
}
