use serde::{Deserialize, Serialize};

/// Join between a configuration node and a platform identity (plain or
/// range-qualified), keyed by the `(vulnerability, identity, node)`
/// triple so re-ingesting the same feed never duplicates a link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub key: String,
    pub vulnerability_id: String,
    pub cpe_key: String,
    pub node_id: String,
    pub vulnerable: bool,
}

impl Model {
    pub fn new(
        vulnerability_id: impl Into<String>,
        cpe_key: impl Into<String>,
        node_id: impl Into<String>,
        vulnerable: bool,
    ) -> Self {
        let vulnerability_id = vulnerability_id.into();
        let cpe_key = cpe_key.into();
        let node_id = node_id.into();

        Self {
            key: Self::key_for(&vulnerability_id, &cpe_key, &node_id),
            vulnerability_id,
            cpe_key,
            node_id,
            vulnerable,
        }
    }

    pub fn key_for(vulnerability_id: &str, cpe_key: &str, node_id: &str) -> String {
        format!("{vulnerability_id}|{cpe_key}|{node_id}")
    }
}
