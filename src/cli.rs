use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::collection::SortField;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the collection dataset from spreadsheet purchase records.
    Import(ImportArgs),
    /// Print the dashboard: collection stats and one line per series.
    List(ListArgs),
    /// Print the issue-by-issue view of one series.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Purchase ledger workbook (needs the purchase and summary sheets).
    #[arg(long)]
    pub ledger: PathBuf,

    /// Purchase-history export with item names and image URLs (repeatable).
    #[arg(long = "history")]
    pub history: Vec<PathBuf>,

    /// Directory scanned for purchase-history exports.
    #[arg(long)]
    pub history_dir: Option<PathBuf>,

    /// File name prefix of exports found in `--history-dir`.
    #[arg(long, default_value = "Ebay_Purchase_History_")]
    pub history_prefix: String,

    /// YAML file overriding sheet and column names.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Output path for the dataset JSON (replaced on every run).
    #[arg(long, default_value = "collection.json")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Dataset JSON written by `import`.
    #[arg(long, default_value = "collection.json")]
    pub collection: PathBuf,

    /// Only show series whose name contains this text (case-insensitive).
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t = SortField::Name)]
    pub sort: SortField,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Dataset JSON written by `import`.
    #[arg(long, default_value = "collection.json")]
    pub collection: PathBuf,

    /// Series id (slug), as printed by `list`.
    pub id: String,
}
