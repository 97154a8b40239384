//! Serde model of the NVD JSON 1.1 vulnerability feed. Only the fields
//! the loader projects are modeled; everything else is ignored.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Feed {
    #[serde(rename = "CVE_data_timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "CVE_Items", default)]
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Item {
    pub cve: Cve,
    #[serde(default)]
    pub configurations: Option<Configurations>,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(rename = "publishedDate")]
    pub published_date: String,
    #[serde(rename = "lastModifiedDate")]
    pub last_modified_date: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Cve {
    pub data_type: Option<String>,
    pub data_format: Option<String>,
    pub data_version: Option<String>,
    #[serde(rename = "CVE_data_meta")]
    pub meta: Meta,
    #[serde(default)]
    pub problemtype: Option<ProblemType>,
    #[serde(default)]
    pub references: Option<References>,
    #[serde(default)]
    pub description: Option<DescriptionBlock>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Meta {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ASSIGNER", default)]
    pub assigner: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProblemType {
    #[serde(default)]
    pub problemtype_data: Vec<ProblemTypeEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProblemTypeEntry {
    #[serde(default)]
    pub description: Vec<LangValue>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LangValue {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct References {
    #[serde(default)]
    pub reference_data: Vec<Reference>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Reference {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub refsource: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DescriptionBlock {
    #[serde(default)]
    pub description_data: Vec<LangValue>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Configurations {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// One match group. Internal groups carry `children`, leaf groups carry
/// `cpe_match`; the builder must not assume a fixed nesting depth.
#[derive(Clone, Debug, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub cpe_match: Vec<CpeMatch>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CpeMatch {
    pub vulnerable: bool,
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

#[derive(Clone, Debug, Deserialize)]
pub struct Impact {
    #[serde(rename = "baseMetricV2", default)]
    pub base_metric_v2: Option<BaseMetricV2>,
    #[serde(rename = "baseMetricV3", default)]
    pub base_metric_v3: Option<BaseMetricV3>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BaseMetricV2 {
    #[serde(rename = "cvssV2")]
    pub cvss_v2: CvssV2,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(rename = "exploitabilityScore", default)]
    pub exploitability_score: Option<f64>,
    #[serde(rename = "impactScore", default)]
    pub impact_score: Option<f64>,
    #[serde(rename = "obtainAllPrivilege", default)]
    pub obtain_all_privilege: Option<bool>,
    #[serde(rename = "obtainUserPrivilege", default)]
    pub obtain_user_privilege: Option<bool>,
    #[serde(rename = "obtainOtherPrivilege", default)]
    pub obtain_other_privilege: Option<bool>,
    #[serde(rename = "userInteractionRequired", default)]
    pub user_interaction_required: Option<bool>,
    #[serde(rename = "acInsufInfo", default)]
    pub ac_insuf_info: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CvssV2 {
    #[serde(rename = "vectorString")]
    pub vector_string: String,
    #[serde(rename = "baseScore", default)]
    pub base_score: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BaseMetricV3 {
    #[serde(rename = "cvssV3")]
    pub cvss_v3: CvssV3,
    #[serde(rename = "exploitabilityScore", default)]
    pub exploitability_score: Option<f64>,
    #[serde(rename = "impactScore", default)]
    pub impact_score: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CvssV3 {
    #[serde(rename = "vectorString")]
    pub vector_string: String,
    #[serde(rename = "baseScore", default)]
    pub base_score: Option<f64>,
    #[serde(rename = "baseSeverity", default)]
    pub base_severity: Option<String>,
}
