use crate::{cvss2, cvss3};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub lang: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    pub name: Option<String>,
    pub source: Option<String>,
    pub tags: Vec<String>,
}

/// A vulnerability record, keyed by its external stable identifier.
///
/// The base scores are denormalized copies of the metric base scores,
/// kept on the record for fast filtering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub data_type: Option<String>,
    pub data_format: Option<String>,
    pub data_version: Option<String>,
    pub assigner: Option<String>,
    pub descriptions: Vec<Description>,
    pub references: Vec<Reference>,
    pub cwes: Vec<String>,
    pub cvss2: Option<cvss2::Model>,
    pub cvss3: Option<cvss3::Model>,
    pub base_score_v2: Option<f64>,
    pub base_score_v3: Option<f64>,
    pub published: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Model {
    pub fn key(&self) -> &str {
        &self.id
    }
}
