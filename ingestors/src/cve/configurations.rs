//! Rebuilds the per-vulnerability boolean match tree from the feed's
//! nested node structure.

use crate::cve::feed;
use nvdsync_common::cpe::{self, Cpe};
use nvdsync_entity::{configuration_node, cpe_match::VersionBounds};
use nvdsync_graph::graph::vulnerability::{NodeSpec, PredicateSpec};
use std::str::FromStr;

/// Walk the feed's configuration nodes and produce the flat node list
/// the reconciliation engine ingests. Node ids are deterministic:
/// the record id plus a pre-order ordinal, so re-parsing the same feed
/// entry always yields the same ids.
pub fn build(vulnerability_id: &str, nodes: &[feed::Node]) -> Vec<NodeSpec> {
    let mut out = Vec::new();
    let mut ordinal = 0;

    for node in nodes {
        walk(vulnerability_id, node, None, &mut ordinal, &mut out);
    }

    out
}

fn walk(
    vulnerability_id: &str,
    node: &feed::Node,
    parent_id: Option<&str>,
    ordinal: &mut usize,
    out: &mut Vec<NodeSpec>,
) {
    let raw = node.operator.as_deref().unwrap_or("OR");
    let operator = match configuration_node::Operator::from_str(raw) {
        Ok(operator) => operator,
        Err(err) => {
            log::warn!("skipping configuration node on {vulnerability_id}: {err}");
            return;
        }
    };

    let id = format!("{vulnerability_id}:{ordinal}");
    *ordinal += 1;

    let predicates = node
        .cpe_match
        .iter()
        .filter_map(|entry| predicate(vulnerability_id, entry))
        .collect();

    out.push(NodeSpec {
        node: configuration_node::Model {
            id: id.clone(),
            vulnerability_id: vulnerability_id.to_string(),
            parent_id: parent_id.map(ToString::to_string),
            operator,
            negate: node.negate,
        },
        predicates,
    });

    for child in &node.children {
        walk(vulnerability_id, child, Some(&id), ordinal, out);
    }
}

/// Resolve one match entry. A URI which does not normalize is logged
/// and dropped without affecting its siblings.
fn predicate(vulnerability_id: &str, entry: &feed::CpeMatch) -> Option<PredicateSpec> {
    let identity = match Cpe::from_str(&entry.cpe23_uri) {
        Ok(identity) => identity,
        Err(err) => {
            log::warn!(
                "skipping predicate {} on {vulnerability_id}: {err}",
                entry.cpe23_uri
            );
            return None;
        }
    };

    let matched = entry
        .cpe_name
        .iter()
        .filter_map(|name| match Cpe::from_str(&name.cpe23_uri) {
            Ok(matched) => Some(matched.into()),
            Err(err) => {
                log::warn!(
                    "skipping matched name {} on {vulnerability_id}: {err}",
                    name.cpe23_uri
                );
                None
            }
        })
        .collect();

    Some(PredicateSpec {
        cpe: identity.into(),
        vulnerable: entry.vulnerable,
        bounds: VersionBounds {
            start_excluding: entry.version_start_excluding.as_deref().map(cpe::unescape),
            start_including: entry.version_start_including.as_deref().map(cpe::unescape),
            end_excluding: entry.version_end_excluding.as_deref().map(cpe::unescape),
            end_including: entry.version_end_including.as_deref().map(cpe::unescape),
        },
        matched,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use nvdsync_entity::configuration_node::Operator;
    use test_log::test;

    fn nodes(value: serde_json::Value) -> Vec<feed::Node> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn children_become_parented_leaves() {
        let nodes = nodes(serde_json::json!([{
            "operator": "AND",
            "children": [
                {
                    "operator": "OR",
                    "cpe_match": [
                        { "vulnerable": true, "cpe23Uri": "cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*" }
                    ]
                },
                {
                    "operator": "OR",
                    "cpe_match": [
                        { "vulnerable": false, "cpe23Uri": "cpe:2.3:o:acme:base:*:*:*:*:*:*:*:*" }
                    ]
                }
            ]
        }]));

        let specs = build("CVE-2024-0001", &nodes);

        assert_eq!(specs.len(), 3);

        let internal = &specs[0];
        assert_eq!(internal.node.operator, Operator::And);
        assert_eq!(internal.node.parent_id, None);
        assert!(internal.predicates.is_empty());

        for leaf in &specs[1..] {
            assert_eq!(leaf.node.operator, Operator::Or);
            assert_eq!(leaf.node.parent_id.as_deref(), Some(internal.node.id.as_str()));
            assert_eq!(leaf.predicates.len(), 1);
        }
    }

    #[test]
    fn node_ids_are_deterministic() {
        let nodes = nodes(serde_json::json!([
            { "operator": "OR", "cpe_match": [] },
            { "operator": "OR", "cpe_match": [] }
        ]));

        let first = build("CVE-2024-0002", &nodes);
        let second = build("CVE-2024-0002", &nodes);

        let ids: Vec<_> = first.iter().map(|spec| spec.node.id.as_str()).collect();
        assert_eq!(ids, vec!["CVE-2024-0002:0", "CVE-2024-0002:1"]);
        assert_eq!(
            ids,
            second.iter().map(|spec| spec.node.id.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn malformed_predicate_is_dropped() {
        let nodes = nodes(serde_json::json!([{
            "operator": "OR",
            "cpe_match": [
                { "vulnerable": true, "cpe23Uri": "cpe:2.3:a:acme" },
                { "vulnerable": true, "cpe23Uri": "cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*" }
            ]
        }]));

        let specs = build("CVE-2024-0003", &nodes);

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].predicates.len(), 1);
    }

    #[test]
    fn unknown_operator_skips_the_node() {
        let nodes = nodes(serde_json::json!([
            { "operator": "XOR", "cpe_match": [] },
            { "operator": "OR", "cpe_match": [] }
        ]));

        let specs = build("CVE-2024-0004", &nodes);

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].node.operator, Operator::Or);
    }

    #[test]
    fn bounds_are_unescaped_independently() {
        let nodes = nodes(serde_json::json!([{
            "operator": "OR",
            "cpe_match": [{
                "vulnerable": true,
                "cpe23Uri": "cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*",
                "versionStartIncluding": "1.0\\\\beta",
                "versionEndExcluding": "2.0"
            }]
        }]));

        let specs = build("CVE-2024-0005", &nodes);
        let bounds = &specs[0].predicates[0].bounds;

        assert_eq!(bounds.start_including.as_deref(), Some("1.0\\beta"));
        assert_eq!(bounds.end_excluding.as_deref(), Some("2.0"));
        assert_eq!(bounds.start_excluding, None);
    }
}
