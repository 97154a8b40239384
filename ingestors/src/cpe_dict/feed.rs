//! Serde model of the NVD CPE match-dictionary feed.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
}

/// One dictionary entry: a platform URI, optional version bounds, and
/// the concrete identities the entry resolves to.
#[derive(Clone, Debug, Deserialize)]
pub struct MatchEntry {
    #[serde(rename = "cpe23Uri")]
    pub cpe23_uri: String,
    #[serde(rename = "versionStartExcluding", default)]
    pub version_start_excluding: Option<String>,
    #[serde(rename = "versionStartIncluding", default)]
    pub version_start_including: Option<String>,
    #[serde(rename = "versionEndExcluding", default)]
    pub version_end_excluding: Option<String>,
    #[serde(rename = "versionEndIncluding", default)]
    pub version_end_including: Option<String>,
    #[serde(rename = "cpe_name", default)]
    pub cpe_name: Vec<CpeName>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CpeName {
    #[serde(rename = "cpe23Uri")]
    pub cpe23_uri: String,
}
