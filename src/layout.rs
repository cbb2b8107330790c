use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportLayout {
    pub purchases: PurchaseColumns,
    pub summary: SummaryColumns,
    pub history: HistoryColumns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseColumns {
    pub sheet: String,
    pub series: String,
    pub issue_number: String,
    pub cover: String,
    pub item_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryColumns {
    pub sheet: String,
    pub series: String,
    pub owned_volumes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryColumns {
    /// `None` reads the first sheet of each history file.
    pub sheet: Option<String>,
    pub item_name: String,
    pub image_url: String,
}

impl Default for PurchaseColumns {
    fn default() -> Self {
        Self {
            sheet: "All Purchases".to_owned(),
            series: "Series".to_owned(),
            issue_number: "Volume #".to_owned(),
            cover: "Cover".to_owned(),
            item_name: "Item Name".to_owned(),
        }
    }
}

impl Default for SummaryColumns {
    fn default() -> Self {
        Self {
            sheet: "Collection Summary".to_owned(),
            series: "Series".to_owned(),
            owned_volumes: "Volumes Owned".to_owned(),
        }
    }
}

impl Default for HistoryColumns {
    fn default() -> Self {
        Self {
            sheet: None,
            item_name: "ItemName".to_owned(),
            image_url: "Image URL".to_owned(),
        }
    }
}

impl ImportLayout {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read layout: {}", path.display()))?;
        let layout: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parse layout: {}", path.display()))?;
        Ok(layout)
    }

    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
