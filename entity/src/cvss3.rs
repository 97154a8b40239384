use nvdsync_cvss::v3::{
    AttackComplexity, AttackVector, Availability, Confidentiality, Cvss3Vector, Integrity,
    PrivilegesRequired, Scope, UserInteraction,
};
use serde::{Deserialize, Serialize};

/// CVSS v3.x metrics decomposed from a pre-computed scoring vector.
/// Created once per vulnerability record, never updated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub vector: String,
    pub minor_version: Option<u8>,
    pub attack_vector: Option<AttackVector>,
    pub attack_complexity: Option<AttackComplexity>,
    pub privileges_required: Option<PrivilegesRequired>,
    pub user_interaction: Option<UserInteraction>,
    pub scope: Option<Scope>,
    pub confidentiality_impact: Option<Confidentiality>,
    pub integrity_impact: Option<Integrity>,
    pub availability_impact: Option<Availability>,
    pub base_severity: Option<String>,
    pub base_score: Option<f64>,
    pub exploitability_score: Option<f64>,
    pub impact_score: Option<f64>,
}

impl Model {
    /// Decompose the categorical part of a vector string; numeric
    /// sub-scores are copied from the feed by the caller.
    pub fn decompose(vector: &str) -> Self {
        let parsed = Cvss3Vector::parse(vector);

        Self {
            vector: vector.to_string(),
            minor_version: parsed.minor_version,
            attack_vector: parsed.av,
            attack_complexity: parsed.ac,
            privileges_required: parsed.pr,
            user_interaction: parsed.ui,
            scope: parsed.s,
            confidentiality_impact: parsed.c,
            integrity_impact: parsed.i,
            availability_impact: parsed.a,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decompose_full_vector() {
        let model = Model::decompose("CVSS:3.1/AV:L/AC:H/PR:L/UI:R/S:C/C:L/I:N/A:N");

        assert_eq!(model.minor_version, Some(1));
        assert_eq!(model.attack_vector, Some(AttackVector::Local));
        assert_eq!(model.attack_complexity, Some(AttackComplexity::High));
        assert_eq!(model.privileges_required, Some(PrivilegesRequired::Low));
        assert_eq!(model.user_interaction, Some(UserInteraction::Required));
        assert_eq!(model.scope, Some(Scope::Changed));
        assert_eq!(model.confidentiality_impact, Some(Confidentiality::Low));
        assert_eq!(model.integrity_impact, Some(Integrity::None));
        assert_eq!(model.availability_impact, Some(Availability::None));
    }
}
