use nvdsync_cvss::v2::{AccessComplexity, AccessVector, Authentication, Cvss2Vector, Impact};
use serde::{Deserialize, Serialize};

/// CVSS v2 metrics decomposed from a pre-computed scoring vector.
/// Created once per vulnerability record, never updated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub vector: String,
    pub access_vector: Option<AccessVector>,
    pub access_complexity: Option<AccessComplexity>,
    pub authentication: Option<Authentication>,
    pub confidentiality_impact: Option<Impact>,
    pub integrity_impact: Option<Impact>,
    pub availability_impact: Option<Impact>,
    pub severity: Option<String>,
    pub base_score: Option<f64>,
    pub exploitability_score: Option<f64>,
    pub impact_score: Option<f64>,
    pub obtain_all_privilege: Option<bool>,
    pub obtain_user_privilege: Option<bool>,
    pub obtain_other_privilege: Option<bool>,
    pub user_interaction_required: Option<bool>,
    pub ac_insuf_info: Option<bool>,
}

impl Model {
    /// Decompose the categorical part of a vector string; numeric
    /// sub-scores and flags are copied from the feed by the caller.
    pub fn decompose(vector: &str) -> Self {
        let parsed = Cvss2Vector::parse(vector);

        Self {
            vector: vector.to_string(),
            access_vector: parsed.av,
            access_complexity: parsed.ac,
            authentication: parsed.au,
            confidentiality_impact: parsed.c,
            integrity_impact: parsed.i,
            availability_impact: parsed.a,
            ..Default::default()
        }
    }
}
