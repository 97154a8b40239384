use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The sentinel used by the feed for "matches anything".
pub const WILDCARD: &str = "*";

/// Number of colon-separated slots in a CPE 2.3 URI: the `cpe:2.3`
/// prefix pair, the part, and the ten attributes.
const SLOTS: usize = 13;

#[derive(Debug, thiserror::Error)]
pub enum CpeError {
    #[error("malformed CPE URI: expected {SLOTS} fields, found {found}")]
    FieldCount { found: usize },
}

/// A normalized CPE 2.3 platform identifier.
///
/// Wildcard components are mapped to `None`. The canonical URI is
/// reconstructed at parse time from an unescaped copy of the raw slots,
/// with absent components rendered as empty segments; it never contains
/// the wildcard sentinel and serves as the identity key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cpe {
    uri: String,
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

impl Cpe {
    /// The canonical identity key.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl FromStr for Cpe {
    type Err = CpeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut slots = split_unescaped(s);
        if slots.len() < SLOTS {
            return Err(CpeError::FieldCount { found: slots.len() });
        }
        slots.truncate(SLOTS);

        // feeds scraped out of JSON occasionally leave artifacts on the
        // final slot
        if let Some(last) = slots.last_mut() {
            while last.ends_with(['"', ',', '}']) {
                last.pop();
            }
        }

        let unescaped = slots.iter().map(|s| unescape(s)).collect::<Vec<_>>();

        // the key and the stored fields map the wildcard differently
        // (empty segment vs. absent), so derive both from the same
        // unescaped slots but independently
        let uri = canonical_uri(&unescaped);

        let mut fields = unescaped
            .into_iter()
            .skip(2)
            .map(|value| if value == WILDCARD { None } else { Some(value) });

        let mut next = || fields.next().flatten();

        Ok(Self {
            uri,
            part: next(),
            vendor: next(),
            product: next(),
            version: next(),
            update: next(),
            edition: next(),
            language: next(),
            sw_edition: next(),
            target_sw: next(),
            target_hw: next(),
            other: next(),
        })
    }
}

impl Display for Cpe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl Debug for Cpe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Split on colons which are not preceded by a backslash. The escape
/// character stays in the token; unescaping is a separate step.
fn split_unescaped(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in s.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                current.push(c);
                escaped = true;
            }
            ':' => out.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    out.push(current);
    out
}

/// Collapse double backslashes to a single one. Also applied to the
/// version bound values which accompany platform URIs in the feeds.
pub fn unescape(s: &str) -> String {
    s.replace("\\\\", "\\")
}

fn canonical_uri(slots: &[String]) -> String {
    let mut out = Vec::with_capacity(SLOTS);
    out.push("cpe");
    out.push("2.3");
    for value in &slots[2..] {
        if value == WILDCARD {
            out.push("");
        } else {
            out.push(value);
        }
    }
    out.join(":")
}
