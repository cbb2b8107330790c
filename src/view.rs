use std::io::Write;

use anyhow::Context as _;

use crate::cli::{ListArgs, ShowArgs};
use crate::collection::{
    SortField, collection_stats, completion_percent, consecutive_owned_count, filter_series,
    find_series, is_complete, issue_status, load_collection, missing_issues, sort_series,
};
use crate::formats::{Collection, SeriesRecord};

pub fn list(args: ListArgs) -> anyhow::Result<()> {
    let collection = load_collection(&args.collection)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let search = args.search.as_deref().unwrap_or("");
    render_dashboard(&mut out, &collection, search, args.sort)?;
    out.flush().context("flush stdout")
}

pub fn show(args: ShowArgs) -> anyhow::Result<()> {
    let collection = load_collection(&args.collection)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match find_series(&collection, &args.id) {
        Some(series) => render_detail(&mut out, series)?,
        None => {
            tracing::debug!(id = %args.id, "series lookup missed");
            render_not_found(&mut out, &args.id)?;
        }
    }
    out.flush().context("flush stdout")
}

pub fn render_dashboard(
    out: &mut impl Write,
    collection: &Collection,
    search: &str,
    sort: SortField,
) -> anyhow::Result<()> {
    let stats = collection_stats(&collection.series);
    writeln!(
        out,
        "Series: {}  Cover A Owned: {}/{}  Complete: {}  Overall: {}%",
        stats.series,
        stats.primary_cover_owned,
        stats.total_issues,
        stats.complete_series,
        stats.overall_percent
    )?;
    writeln!(out)?;

    let mut shown = filter_series(&collection.series, search);
    sort_series(&mut shown, sort);
    if shown.is_empty() {
        writeln!(out, "No series match {search:?}.")?;
        return Ok(());
    }

    let width = shown.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    for series in shown {
        let others = match series.owned_other_cover.len() {
            0 => String::new(),
            1 => "  +1 other cover".to_owned(),
            n => format!("  +{n} other covers"),
        };
        let marker = if is_complete(series) { "  complete" } else { "" };
        writeln!(
            out,
            "{:<width$}  {:>3}%  {}/{} consecutive  [{}]{others}{marker}",
            series.name,
            completion_percent(series),
            consecutive_owned_count(series),
            series.total_issues,
            series.id,
        )?;
    }
    Ok(())
}

pub fn render_detail(out: &mut impl Write, series: &SeriesRecord) -> anyhow::Result<()> {
    writeln!(out, "{} ({})", series.name, series.publisher)?;
    if !series.image_url.is_empty() {
        writeln!(out, "Image: {}", series.image_url)?;
    }
    writeln!(
        out,
        "Completion: {}%  {}/{} Cover A",
        completion_percent(series),
        series.owned_primary_cover.len(),
        series.total_issues
    )?;

    let missing = missing_issues(series);
    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(|n| format!("#{n}")).collect();
        writeln!(out, "Missing: {}", list.join(", "))?;
    }
    writeln!(out)?;

    for issue in 1..=series.total_issues {
        let status = issue_status(series, issue);
        let cover = series
            .issue_covers
            .get(&issue)
            .and_then(|covers| covers.first());
        match cover {
            Some(cover) => writeln!(
                out,
                "#{issue:<4} {:<12} {} ({})",
                status.label(),
                cover.image_url,
                cover.cover
            )?,
            None => writeln!(out, "#{issue:<4} {}", status.label())?,
        }
    }
    Ok(())
}

pub fn render_not_found(out: &mut impl Write, id: &str) -> anyhow::Result<()> {
    writeln!(out, "Series not found: {id}")?;
    writeln!(out, "Run `comictrack list` to see all series.")?;
    Ok(())
}
