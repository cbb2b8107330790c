use std::fs;
use std::path::{Path, PathBuf};

pub const PURCHASES_CSV: &str = "\
Date,Series,Volume #,Cover,Item Name
2024-01-02,Robin (2021),1,CVR A,Robin #1 Cover A
2024-01-02,Robin (2021),2,CVR A,Robin #2 Cover A
2024-01-03,Robin (2021),3,CVR B Variant,Robin #3 Cover B
2024-01-03,Robin (2021),4,cvr a,Robin #4 Cover A
2024-01-04,Robin (2021),3,CVR C,Robin #3 Cover C
2024-02-01,Action Comics (2016),1,CVR B,Action #1 B
2024-02-01,,5,CVR A,Orphan
2024-02-01,Flash,,CVR A,No Issue
";

pub const SUMMARY_CSV: &str = "\
Series,Volumes Owned
Robin (2021),\"1-4, 6\"
Action Comics (2016),1
";

pub const HISTORY_2024_CSV: &str = "\
ItemName,Image URL
Robin #3 Cover C,https://img/r3c
Robin #1 Cover A,https://img/r1a
Unknown Thing,https://img/x
";

pub const HISTORY_2025_CSV: &str = "\
ItemName,Image URL
Robin #3 Cover B,https://img/r3b
Robin #1 Cover A,https://img/r1a-2025
Action #1 B,https://img/a1b
Robin #2 Cover A,
";

pub struct Workspace {
    pub ledger: PathBuf,
    pub history_dir: PathBuf,
}

/// A CSV ledger workbook (one file per sheet) and a history export dir.
pub fn write_workspace(root: &Path) -> anyhow::Result<Workspace> {
    let ledger = root.join("ledger");
    fs::create_dir_all(&ledger)?;
    fs::write(ledger.join("All Purchases.csv"), PURCHASES_CSV)?;
    fs::write(ledger.join("Collection Summary.csv"), SUMMARY_CSV)?;

    let history_dir = root.join("history");
    fs::create_dir_all(&history_dir)?;
    fs::write(
        history_dir.join("Ebay_Purchase_History_2024.csv"),
        HISTORY_2024_CSV,
    )?;
    fs::write(
        history_dir.join("Ebay_Purchase_History_2025.csv"),
        HISTORY_2025_CSV,
    )?;
    fs::write(history_dir.join("README.txt"), "not an export")?;

    Ok(Workspace {
        ledger,
        history_dir,
    })
}
