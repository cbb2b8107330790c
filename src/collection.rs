use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context as _;
use clap::ValueEnum;

use crate::formats::{Collection, IssueStatus, SeriesRecord};

pub fn load_collection(path: &Path) -> anyhow::Result<Collection> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read collection: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse collection: {}", path.display()))
}

fn all_owned(series: &SeriesRecord) -> BTreeSet<u32> {
    series
        .owned_primary_cover
        .iter()
        .chain(&series.owned_other_cover)
        .copied()
        .collect()
}

pub fn issue_status(series: &SeriesRecord, issue_number: u32) -> IssueStatus {
    if series.owned_primary_cover.contains(&issue_number) {
        IssueStatus::PrimaryCover
    } else if series.owned_other_cover.contains(&issue_number) {
        IssueStatus::OtherCover
    } else {
        IssueStatus::Missing
    }
}

/// Issues owned in an unbroken run from #1, never more than `total_issues`.
pub fn consecutive_owned_count(series: &SeriesRecord) -> u32 {
    let owned = all_owned(series);
    (1..=series.total_issues)
        .take_while(|n| owned.contains(n))
        .fold(0, |count, _| count + 1)
}

/// Rounded percentage of the consecutive run; 100 for an empty series.
pub fn completion_percent(series: &SeriesRecord) -> u32 {
    percent(
        u64::from(consecutive_owned_count(series)),
        u64::from(series.total_issues),
    )
}

pub fn is_complete(series: &SeriesRecord) -> bool {
    consecutive_owned_count(series) == series.total_issues
}

pub fn missing_issues(series: &SeriesRecord) -> Vec<u32> {
    let owned = all_owned(series);
    (1..=series.total_issues)
        .filter(|n| !owned.contains(n))
        .collect()
}

/// Round-half-up integer percentage, 100 when `whole` is zero.
fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 100;
    }
    let rounded = (part * 200 + whole) / (whole * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

pub fn find_series<'a>(collection: &'a Collection, id: &str) -> Option<&'a SeriesRecord> {
    collection.series.iter().find(|s| s.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortField {
    #[default]
    Name,
    Completion,
    TotalIssues,
}

/// Case-insensitive substring match on the series name.
pub fn filter_series<'a>(series: &'a [SeriesRecord], query: &str) -> Vec<&'a SeriesRecord> {
    let query = query.trim().to_lowercase();
    series
        .iter()
        .filter(|s| query.is_empty() || s.name.to_lowercase().contains(&query))
        .collect()
}

pub fn sort_series(series: &mut [&SeriesRecord], field: SortField) {
    match field {
        SortField::Name => series.sort_by(|a, b| a.name.cmp(&b.name)),
        SortField::Completion => {
            series.sort_by_key(|s| std::cmp::Reverse(completion_percent(s)));
        }
        SortField::TotalIssues => series.sort_by_key(|s| std::cmp::Reverse(s.total_issues)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionStats {
    pub series: usize,
    pub primary_cover_owned: u64,
    pub total_issues: u64,
    pub complete_series: usize,
    pub overall_percent: u32,
}

pub fn collection_stats(series: &[SeriesRecord]) -> CollectionStats {
    let total_issues: u64 = series.iter().map(|s| u64::from(s.total_issues)).sum();
    let consecutive: u64 = series
        .iter()
        .map(|s| u64::from(consecutive_owned_count(s)))
        .sum();
    CollectionStats {
        series: series.len(),
        primary_cover_owned: series
            .iter()
            .map(|s| s.owned_primary_cover.len() as u64)
            .sum(),
        total_issues,
        complete_series: series.iter().filter(|s| is_complete(s)).count(),
        overall_percent: percent(consecutive, total_issues),
    }
}
