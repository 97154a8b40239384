use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("unknown boolean operator: {value}")]
pub struct OperatorError {
    pub value: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Operator {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(OperatorError {
                value: other.to_string(),
            }),
        }
    }
}

/// A node in a per-vulnerability boolean match tree.
///
/// Negation is kept as its own flag next to the operator; the folded
/// `NAND`/`NOR` tag is derived on demand. The parent reference is a
/// plain id, never a shared pointer, so trees cannot form cycles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub vulnerability_id: String,
    pub parent_id: Option<String>,
    pub operator: Operator,
    pub negate: bool,
}

impl Model {
    /// The combined operator tag as the source feeds encode it.
    pub fn folded_operator(&self) -> &'static str {
        match (self.operator, self.negate) {
            (Operator::And, false) => "AND",
            (Operator::And, true) => "NAND",
            (Operator::Or, false) => "OR",
            (Operator::Or, true) => "NOR",
        }
    }

    /// Evaluate the node over the boolean outcomes of its children or
    /// predicates.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        let combined = match self.operator {
            Operator::And => inputs.iter().all(|value| *value),
            Operator::Or => inputs.iter().any(|value| *value),
        };
        combined != self.negate
    }
}
