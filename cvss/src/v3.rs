use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, thiserror::Error)]
pub enum Cvss3Error {
    #[error("invalid attack vector")]
    AttackVector,
    #[error("invalid attack complexity")]
    AttackComplexity,
    #[error("invalid privileges required")]
    PrivilegesRequired,
    #[error("invalid user interaction")]
    UserInteraction,
    #[error("invalid scope")]
    Scope,
    #[error("invalid confidentiality impact")]
    Confidentiality,
    #[error("invalid integrity impact")]
    Integrity,
    #[error("invalid availability impact")]
    Availability,
}

/// Best-effort decomposition of a CVSS v3.x vector string.
///
/// Tokens which do not parse are left unset rather than failing the
/// whole vector; score decomposition must never reject a record.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cvss3Vector {
    pub minor_version: Option<u8>,
    pub av: Option<AttackVector>,
    pub ac: Option<AttackComplexity>,
    pub pr: Option<PrivilegesRequired>,
    pub ui: Option<UserInteraction>,
    pub s: Option<Scope>,
    pub c: Option<Confidentiality>,
    pub i: Option<Integrity>,
    pub a: Option<Availability>,
}

impl Cvss3Vector {
    pub fn parse(vector: &str) -> Self {
        let mut out = Self::default();

        for token in vector.split('/') {
            let Some((metric, value)) = token.split_once(':') else {
                continue;
            };
            match metric {
                "CVSS" => {
                    out.minor_version = match value {
                        "3.0" => Some(0),
                        "3.1" => Some(1),
                        _ => None,
                    }
                }
                "AV" => out.av = value.parse().ok(),
                "AC" => out.ac = value.parse().ok(),
                "PR" => out.pr = value.parse().ok(),
                "UI" => out.ui = value.parse().ok(),
                "S" => out.s = value.parse().ok(),
                "C" => out.c = value.parse().ok(),
                "I" => out.i = value.parse().ok(),
                "A" => out.a = value.parse().ok(),
                _ => {}
            }
        }

        out
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackVector {
    Network,
    Adjacent,
    Local,
    Physical,
}

impl Display for AttackVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AttackVector::Network => 'N',
                AttackVector::Adjacent => 'A',
                AttackVector::Local => 'L',
                AttackVector::Physical => 'P',
            }
        )
    }
}

impl FromStr for AttackVector {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::Network),
            "A" => Ok(Self::Adjacent),
            "L" => Ok(Self::Local),
            "P" => Ok(Self::Physical),
            _ => Err(Cvss3Error::AttackVector),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackComplexity {
    Low,
    High,
}

impl Display for AttackComplexity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AttackComplexity::Low => 'L',
                AttackComplexity::High => 'H',
            }
        )
    }
}

impl FromStr for AttackComplexity {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Self::Low),
            "H" => Ok(Self::High),
            _ => Err(Cvss3Error::AttackComplexity),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivilegesRequired {
    None,
    Low,
    High,
}

impl Display for PrivilegesRequired {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PrivilegesRequired::None => 'N',
                PrivilegesRequired::Low => 'L',
                PrivilegesRequired::High => 'H',
            }
        )
    }
}

impl FromStr for PrivilegesRequired {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::None),
            "L" => Ok(Self::Low),
            "H" => Ok(Self::High),
            _ => Err(Cvss3Error::PrivilegesRequired),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserInteraction {
    None,
    Required,
}

impl Display for UserInteraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UserInteraction::None => 'N',
                UserInteraction::Required => 'R',
            }
        )
    }
}

impl FromStr for UserInteraction {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::None),
            "R" => Ok(Self::Required),
            _ => Err(Cvss3Error::UserInteraction),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Unchanged,
    Changed,
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Scope::Unchanged => 'U',
                Scope::Changed => 'C',
            }
        )
    }
}

impl FromStr for Scope {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "U" => Ok(Self::Unchanged),
            "C" => Ok(Self::Changed),
            _ => Err(Cvss3Error::Scope),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidentiality {
    None,
    Low,
    High,
}

impl Display for Confidentiality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Confidentiality::None => 'N',
                Confidentiality::Low => 'L',
                Confidentiality::High => 'H',
            }
        )
    }
}

impl FromStr for Confidentiality {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::None),
            "L" => Ok(Self::Low),
            "H" => Ok(Self::High),
            _ => Err(Cvss3Error::Confidentiality),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Integrity {
    None,
    Low,
    High,
}

impl Display for Integrity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Integrity::None => 'N',
                Integrity::Low => 'L',
                Integrity::High => 'H',
            }
        )
    }
}

impl FromStr for Integrity {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::None),
            "L" => Ok(Self::Low),
            "H" => Ok(Self::High),
            _ => Err(Cvss3Error::Integrity),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    None,
    Low,
    High,
}

impl Display for Availability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Availability::None => 'N',
                Availability::Low => 'L',
                Availability::High => 'H',
            }
        )
    }
}

impl FromStr for Availability {
    type Err = Cvss3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::None),
            "L" => Ok(Self::Low),
            "H" => Ok(Self::High),
            _ => Err(Cvss3Error::Availability),
        }
    }
}
