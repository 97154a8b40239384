use nvdsync_common::cpe::Cpe;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A plain platform identity, keyed by its canonical URI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub uri: String,
    pub part: Option<String>,
    pub vendor: Option<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub update: Option<String>,
    pub edition: Option<String>,
    pub language: Option<String>,
    pub sw_edition: Option<String>,
    pub target_sw: Option<String>,
    pub target_hw: Option<String>,
    pub other: Option<String>,
}

impl Model {
    pub fn key(&self) -> &str {
        &self.uri
    }
}

impl From<Cpe> for Model {
    fn from(value: Cpe) -> Self {
        let uri = value.uri().to_string();

        // destructure to ensure we don't miss any new fields
        let Cpe {
            part,
            vendor,
            product,
            version,
            update,
            edition,
            language,
            sw_edition,
            target_sw,
            target_hw,
            other,
            ..
        } = value;

        Self {
            uri,
            part,
            vendor,
            product,
            version,
            update,
            edition,
            language,
            sw_edition,
            target_sw,
            target_hw,
            other,
        }
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}
