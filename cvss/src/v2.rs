use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, thiserror::Error)]
pub enum Cvss2Error {
    #[error("invalid access vector")]
    AccessVector,
    #[error("invalid access complexity")]
    AccessComplexity,
    #[error("invalid authentication")]
    Authentication,
    #[error("invalid impact")]
    Impact,
}

/// Best-effort decomposition of a CVSS v2 vector string such as
/// `AV:N/AC:L/Au:N/C:P/I:P/A:P`. Unknown or malformed tokens are left
/// unset.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cvss2Vector {
    pub av: Option<AccessVector>,
    pub ac: Option<AccessComplexity>,
    pub au: Option<Authentication>,
    pub c: Option<Impact>,
    pub i: Option<Impact>,
    pub a: Option<Impact>,
}

impl Cvss2Vector {
    pub fn parse(vector: &str) -> Self {
        let mut out = Self::default();

        // some feeds wrap the v2 vector in parentheses
        let vector = vector.trim_matches(['(', ')']);

        for token in vector.split('/') {
            let Some((metric, value)) = token.split_once(':') else {
                continue;
            };
            match metric {
                "AV" => out.av = value.parse().ok(),
                "AC" => out.ac = value.parse().ok(),
                "Au" => out.au = value.parse().ok(),
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
pub enum AccessVector {
    Network,
    AdjacentNetwork,
    Local,
}

impl Display for AccessVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AccessVector::Network => 'N',
                AccessVector::AdjacentNetwork => 'A',
                AccessVector::Local => 'L',
            }
        )
    }
}

impl FromStr for AccessVector {
    type Err = Cvss2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::Network),
            "A" => Ok(Self::AdjacentNetwork),
            "L" => Ok(Self::Local),
            _ => Err(Cvss2Error::AccessVector),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessComplexity {
    High,
    Medium,
    Low,
}

impl Display for AccessComplexity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AccessComplexity::High => 'H',
                AccessComplexity::Medium => 'M',
                AccessComplexity::Low => 'L',
            }
        )
    }
}

impl FromStr for AccessComplexity {
    type Err = Cvss2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(Self::High),
            "M" => Ok(Self::Medium),
            "L" => Ok(Self::Low),
            _ => Err(Cvss2Error::AccessComplexity),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authentication {
    Multiple,
    Single,
    None,
}

impl Display for Authentication {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Authentication::Multiple => 'M',
                Authentication::Single => 'S',
                Authentication::None => 'N',
            }
        )
    }
}

impl FromStr for Authentication {
    type Err = Cvss2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::Multiple),
            "S" => Ok(Self::Single),
            "N" => Ok(Self::None),
            _ => Err(Cvss2Error::Authentication),
        }
    }
}

/// Impact level shared by the confidentiality, integrity and
/// availability metrics.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    None,
    Partial,
    Complete,
}

impl Display for Impact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Impact::None => 'N',
                Impact::Partial => 'P',
                Impact::Complete => 'C',
            }
        )
    }
}

impl FromStr for Impact {
    type Err = Cvss2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::None),
            "P" => Ok(Self::Partial),
            "C" => Ok(Self::Complete),
            _ => Err(Cvss2Error::Impact),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_full_vector() {
        let vector = Cvss2Vector::parse("AV:N/AC:L/Au:N/C:P/I:P/A:P");

        assert_eq!(vector.av, Some(AccessVector::Network));
        assert_eq!(vector.ac, Some(AccessComplexity::Low));
        assert_eq!(vector.au, Some(Authentication::None));
        assert_eq!(vector.c, Some(Impact::Partial));
        assert_eq!(vector.i, Some(Impact::Partial));
        assert_eq!(vector.a, Some(Impact::Partial));
    }

    #[test]
    fn parenthesized_vector() {
        let vector = Cvss2Vector::parse("(AV:L/AC:H/Au:S/C:C/I:N/A:N)");

        assert_eq!(vector.av, Some(AccessVector::Local));
        assert_eq!(vector.ac, Some(AccessComplexity::High));
        assert_eq!(vector.au, Some(Authentication::Single));
        assert_eq!(vector.c, Some(Impact::Complete));
        assert_eq!(vector.i, Some(Impact::None));
    }

    #[test]
    fn malformed_tokens_are_unset() {
        let vector = Cvss2Vector::parse("AV:Z/AC:L/nonsense");

        assert_eq!(vector.av, None);
        assert_eq!(vector.ac, Some(AccessComplexity::Low));
        assert_eq!(vector.au, None);
    }
}
