use serde::{Deserialize, Serialize};

/// Optional version bounds qualifying a platform predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionBounds {
    pub start_excluding: Option<String>,
    pub start_including: Option<String>,
    pub end_excluding: Option<String>,
    pub end_including: Option<String>,
}

impl VersionBounds {
    pub fn is_empty(&self) -> bool {
        self.start_excluding.is_none()
            && self.start_including.is_none()
            && self.end_excluding.is_none()
            && self.end_including.is_none()
    }

    /// Ordered, labeled suffix appended to the base identity key.
    ///
    /// Distinct bound combinations can never collide because each bound
    /// carries its own label, and re-parsing the same feed entry always
    /// produces the same suffix. No bounds means no suffix, so an
    /// unbounded predicate keys identically to its plain identity.
    pub fn key_suffix(&self) -> String {
        let mut out = String::new();
        for (tag, value) in [
            ("versionStartExcluding", &self.start_excluding),
            ("versionStartIncluding", &self.start_including),
            ("versionEndExcluding", &self.end_excluding),
            ("versionEndIncluding", &self.end_including),
        ] {
            if let Some(value) = value {
                out.push(':');
                out.push_str(tag);
                out.push(':');
                out.push_str(value);
            }
        }
        out
    }
}

/// A range-qualified platform predicate: a plain identity plus version
/// bounds, keyed by the identity key with the bound suffix appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub key: String,
    /// Key of the underlying plain identity.
    pub cpe_uri: String,
    pub vulnerable: bool,
    pub bounds: VersionBounds,
    /// Keys of the concrete identities this predicate resolves to, as
    /// enumerated by the feed.
    pub matched_cpe_uris: Vec<String>,
}

impl Model {
    pub fn new(cpe_uri: impl Into<String>, vulnerable: bool, bounds: VersionBounds) -> Self {
        let cpe_uri = cpe_uri.into();
        let key = format!("{}{}", cpe_uri, bounds.key_suffix());

        Self {
            key,
            cpe_uri,
            vulnerable,
            bounds,
            matched_cpe_uris: Vec::new(),
        }
    }

    pub fn key_for(cpe_uri: &str, bounds: &VersionBounds) -> String {
        format!("{}{}", cpe_uri, bounds.key_suffix())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_bounds_keys_like_plain_identity() {
        let model = Model::new("cpe:2.3:a:acme:widget:::::::::", true, VersionBounds::default());
        assert_eq!(model.key, "cpe:2.3:a:acme:widget:::::::::");
    }

    #[test]
    fn bound_suffixes_are_ordered_and_labeled() {
        let base = "cpe:2.3:a:acme:widget:::::::::";
        let bounds = VersionBounds {
            start_including: Some("1.0".into()),
            end_excluding: Some("2.0".into()),
            ..Default::default()
        };
        let model = Model::new(base, true, bounds);

        assert_eq!(
            model.key,
            format!("{base}:versionStartIncluding:1.0:versionEndExcluding:2.0")
        );
    }

    #[test]
    fn different_bound_combinations_never_collide() {
        let start = VersionBounds {
            start_including: Some("1.0".into()),
            ..Default::default()
        };
        let end = VersionBounds {
            end_including: Some("1.0".into()),
            ..Default::default()
        };

        assert_ne!(
            Model::key_for("cpe:2.3:a:acme:widget:::::::::", &start),
            Model::key_for("cpe:2.3:a:acme:widget:::::::::", &end),
        );
    }
}
