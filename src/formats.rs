use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub series: Vec<SeriesRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
    pub id: String,
    pub name: String,
    pub publisher: String,
    pub total_issues: u32,
    #[serde(rename = "ownedCoverA")]
    pub owned_primary_cover: Vec<u32>,
    #[serde(rename = "ownedOther")]
    pub owned_other_cover: Vec<u32>,
    pub image_url: String,
    /// Issue number to its known covers, primary cover first.
    #[serde(default)]
    pub issue_covers: BTreeMap<u32, Vec<CoverImage>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub cover: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    #[serde(rename = "coverA")]
    PrimaryCover,
    #[serde(rename = "otherCover")]
    OtherCover,
    #[serde(rename = "missing")]
    Missing,
}

impl IssueStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::PrimaryCover => "Cover A",
            Self::OtherCover => "Other Cover",
            Self::Missing => "Missing",
        }
    }
}
