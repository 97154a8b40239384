use crate::graph::{error::Error, Graph};
use nvdsync_entity::{
    configuration_node, cpe, cpe_match::{self, VersionBounds}, node_cpe_ref, vulnerability, Entity,
    EntityKind,
};

/// A freshly parsed configuration node together with the predicates on
/// its leaf, ready for reconciliation.
#[derive(Clone, Debug)]
pub struct NodeSpec {
    pub node: configuration_node::Model,
    pub predicates: Vec<PredicateSpec>,
}

/// A platform predicate as it appears in the feed: the normalized
/// identity, the vulnerable flag, optional version bounds, and the
/// concrete identities the feed enumerates for it.
#[derive(Clone, Debug)]
pub struct PredicateSpec {
    pub cpe: cpe::Model,
    pub vulnerable: bool,
    pub bounds: VersionBounds,
    pub matched: Vec<cpe::Model>,
}

impl Graph {
    pub async fn get_vulnerability(&self, id: &str) -> Result<Option<vulnerability::Model>, Error> {
        match self.store().get(EntityKind::Vulnerability, id).await? {
            Some(Entity::Vulnerability(model)) => Ok(Some(model)),
            _ => Ok(None),
        }
    }

    /// Reconcile a vulnerability record and its configuration tree
    /// against the store: reuse whatever exists, create what is
    /// missing, and never duplicate a link.
    pub async fn ingest_vulnerability(
        &self,
        vulnerability: vulnerability::Model,
        nodes: Vec<NodeSpec>,
    ) -> Result<vulnerability::Model, Error> {
        let record = match self.get_vulnerability(&vulnerability.id).await? {
            Some(found) => found,
            None => {
                self.store().save(vulnerability.clone().into()).await?;
                vulnerability
            }
        };

        for spec in nodes {
            self.ingest_node(&record.id, spec).await?;
        }

        Ok(record)
    }

    /// Persist one node and walk its predicate list. The node goes in
    /// first since links reference its id.
    async fn ingest_node(&self, vulnerability_id: &str, spec: NodeSpec) -> Result<(), Error> {
        let node_id = spec.node.id.clone();

        if self
            .store()
            .get(EntityKind::ConfigurationNode, &node_id)
            .await?
            .is_none()
        {
            self.store().save(spec.node.into()).await?;
        }

        for predicate in spec.predicates {
            let uri = predicate.cpe.uri.clone();
            if let Err(err) = self
                .ingest_predicate(vulnerability_id, &node_id, predicate)
                .await
            {
                if err.is_duplicate() {
                    log::warn!("skipping predicate {uri} on {vulnerability_id}: {err}");
                } else {
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    async fn ingest_predicate(
        &self,
        vulnerability_id: &str,
        node_id: &str,
        predicate: PredicateSpec,
    ) -> Result<(), Error> {
        let match_key = cpe_match::Model::key_for(predicate.cpe.key(), &predicate.bounds);

        // a previous run (or an earlier record in this one) may already
        // have persisted this predicate
        if let Some(found) = self.get_cpe_match(&match_key).await? {
            return self
                .link(vulnerability_id, &found.key, node_id, predicate.vulnerable)
                .await;
        }

        if predicate.bounds.is_empty() {
            // plain predicate: link straight to the identity, no
            // range-qualified row
            let cpe = self.ingest_cpe(predicate.cpe).await?;
            self.link(vulnerability_id, cpe.key(), node_id, predicate.vulnerable)
                .await
        } else {
            self.ingest_cpe(predicate.cpe.clone()).await?;

            let mut model =
                cpe_match::Model::new(predicate.cpe.key(), predicate.vulnerable, predicate.bounds);
            for matched in predicate.matched {
                let matched = self.ingest_cpe(matched).await?;
                model.matched_cpe_uris.push(matched.uri);
            }

            self.store().save(model.clone().into()).await?;
            self.link(vulnerability_id, &model.key, node_id, predicate.vulnerable)
                .await
        }
    }

    /// Create the node-to-identity link unless the `(vulnerability,
    /// identity, node)` triple already exists.
    async fn link(
        &self,
        vulnerability_id: &str,
        cpe_key: &str,
        node_id: &str,
        vulnerable: bool,
    ) -> Result<(), Error> {
        let key = node_cpe_ref::Model::key_for(vulnerability_id, cpe_key, node_id);

        if self.store().get(EntityKind::NodeCpeRef, &key).await?.is_some() {
            return Ok(());
        }

        self.store()
            .save(node_cpe_ref::Model::new(vulnerability_id, cpe_key, node_id, vulnerable).into())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::{self, memory::MemoryStore, Store};
    use async_trait::async_trait;
    use nvdsync_common::cpe::Cpe;
    use nvdsync_entity::configuration_node::Operator;
    use std::str::FromStr;
    use std::sync::Arc;
    use test_log::test;

    /// Store double that fails `save` for selected keys, delegating
    /// everything else to the in-memory backend.
    #[derive(Default)]
    struct FaultStore {
        inner: MemoryStore,
        duplicate_keys: Vec<String>,
        backend_keys: Vec<String>,
    }

    #[async_trait]
    impl Store for FaultStore {
        async fn get(
            &self,
            kind: EntityKind,
            key: &str,
        ) -> Result<Option<Entity>, store::Error> {
            self.inner.get(kind, key).await
        }

        async fn save(&self, entity: Entity) -> Result<(), store::Error> {
            let key = entity.key().to_string();
            if self.duplicate_keys.contains(&key) {
                return Err(store::Error::DuplicateKey {
                    kind: entity.kind(),
                    key,
                });
            }
            if self.backend_keys.contains(&key) {
                return Err(store::Error::Backend(anyhow::anyhow!("connection reset")));
            }
            self.inner.save(entity).await
        }

        async fn begin(&self) -> Result<(), store::Error> {
            self.inner.begin().await
        }

        async fn commit(&self) -> Result<(), store::Error> {
            self.inner.commit().await
        }

        async fn find_by_partition_key(
            &self,
            kind: EntityKind,
            partition_key: &str,
        ) -> Result<Vec<Entity>, store::Error> {
            self.inner.find_by_partition_key(kind, partition_key).await
        }
    }

    fn record(id: &str) -> vulnerability::Model {
        vulnerability::Model {
            id: id.to_string(),
            data_type: Some("CVE".to_string()),
            data_format: Some("MITRE".to_string()),
            data_version: Some("4.0".to_string()),
            assigner: None,
            descriptions: vec![],
            references: vec![],
            cwes: vec![],
            cvss2: None,
            cvss3: None,
            base_score_v2: None,
            base_score_v3: None,
            published: chrono::DateTime::UNIX_EPOCH,
            modified: chrono::DateTime::UNIX_EPOCH,
        }
    }

    fn node(id: &str, vulnerability_id: &str) -> configuration_node::Model {
        configuration_node::Model {
            id: id.to_string(),
            vulnerability_id: vulnerability_id.to_string(),
            parent_id: None,
            operator: Operator::Or,
            negate: false,
        }
    }

    fn predicate(raw: &str, bounds: VersionBounds) -> PredicateSpec {
        PredicateSpec {
            cpe: Cpe::from_str(raw).unwrap().into(),
            vulnerable: true,
            bounds,
            matched: vec![],
        }
    }

    fn ranged() -> VersionBounds {
        VersionBounds {
            start_including: Some("1.0".into()),
            end_excluding: Some("2.0".into()),
            ..Default::default()
        }
    }

    #[test(tokio::test)]
    async fn reingest_resolves_by_lookup() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());

        let spec = NodeSpec {
            node: node("CVE-2024-0001:0", "CVE-2024-0001"),
            predicates: vec![predicate("cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*", ranged())],
        };

        graph
            .ingest_vulnerability(record("CVE-2024-0001"), vec![spec.clone()])
            .await?;

        let after_first = (
            store.count(EntityKind::Cpe),
            store.count(EntityKind::CpeMatch),
            store.count(EntityKind::ConfigurationNode),
            store.count(EntityKind::NodeCpeRef),
            store.count(EntityKind::Vulnerability),
        );
        assert_eq!(after_first, (1, 1, 1, 1, 1));

        graph
            .ingest_vulnerability(record("CVE-2024-0001"), vec![spec])
            .await?;

        let after_second = (
            store.count(EntityKind::Cpe),
            store.count(EntityKind::CpeMatch),
            store.count(EntityKind::ConfigurationNode),
            store.count(EntityKind::NodeCpeRef),
            store.count(EntityKind::Vulnerability),
        );
        assert_eq!(after_first, after_second);

        Ok(())
    }

    #[test(tokio::test)]
    async fn plain_predicate_creates_no_match_row() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());

        let spec = NodeSpec {
            node: node("CVE-2024-0002:0", "CVE-2024-0002"),
            predicates: vec![predicate(
                "cpe:2.3:a:acme:widget:1.0:*:*:*:*:*:*:*",
                VersionBounds::default(),
            )],
        };

        graph
            .ingest_vulnerability(record("CVE-2024-0002"), vec![spec])
            .await?;

        assert_eq!(store.count(EntityKind::Cpe), 1);
        assert_eq!(store.count(EntityKind::CpeMatch), 0);
        assert_eq!(store.count(EntityKind::NodeCpeRef), 1);

        Ok(())
    }

    #[test(tokio::test)]
    async fn shared_predicate_links_once_per_node() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());

        // two records referencing the same ranged predicate
        for id in ["CVE-2024-0003", "CVE-2024-0004"] {
            let spec = NodeSpec {
                node: node(&format!("{id}:0"), id),
                predicates: vec![predicate("cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*", ranged())],
            };
            graph.ingest_vulnerability(record(id), vec![spec]).await?;
        }

        // the predicate row is shared, the links are per record
        assert_eq!(store.count(EntityKind::CpeMatch), 1);
        assert_eq!(store.count(EntityKind::NodeCpeRef), 2);

        Ok(())
    }

    #[test(tokio::test)]
    async fn matched_names_become_identities() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());

        let mut spec = NodeSpec {
            node: node("CVE-2024-0005:0", "CVE-2024-0005"),
            predicates: vec![predicate("cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*", ranged())],
        };
        spec.predicates[0].matched = vec![
            Cpe::from_str("cpe:2.3:a:acme:widget:1.0:*:*:*:*:*:*:*")?.into(),
            Cpe::from_str("cpe:2.3:a:acme:widget:1.5:*:*:*:*:*:*:*")?.into(),
        ];

        graph
            .ingest_vulnerability(record("CVE-2024-0005"), vec![spec])
            .await?;

        // the base identity plus the two enumerated ones
        assert_eq!(store.count(EntityKind::Cpe), 3);

        let base = Cpe::from_str("cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*")?;
        let stored = graph
            .get_cpe_match(&format!(
                "{}:versionStartIncluding:1.0:versionEndExcluding:2.0",
                base.uri()
            ))
            .await?
            .expect("predicate must be stored");
        assert_eq!(stored.matched_cpe_uris.len(), 2);

        Ok(())
    }

    #[test(tokio::test)]
    async fn duplicate_key_skips_the_predicate_only() -> Result<(), anyhow::Error> {
        let store = Arc::new(FaultStore {
            duplicate_keys: vec!["cpe:2.3:a:acme:widget:1.0:::::::".to_string()],
            ..Default::default()
        });
        let graph = Graph::new(store.clone());

        let spec = NodeSpec {
            node: node("CVE-2024-0006:0", "CVE-2024-0006"),
            predicates: vec![
                predicate(
                    "cpe:2.3:a:acme:widget:1.0:*:*:*:*:*:*:*",
                    VersionBounds::default(),
                ),
                predicate(
                    "cpe:2.3:a:acme:widget:2.0:*:*:*:*:*:*:*",
                    VersionBounds::default(),
                ),
            ],
        };

        graph
            .ingest_vulnerability(record("CVE-2024-0006"), vec![spec])
            .await?;

        // the racing predicate is dropped, its sibling still lands
        assert_eq!(store.inner.count(EntityKind::ConfigurationNode), 1);
        assert_eq!(store.inner.count(EntityKind::Cpe), 1);
        assert_eq!(store.inner.count(EntityKind::NodeCpeRef), 1);

        Ok(())
    }

    #[test(tokio::test)]
    async fn backend_error_aborts_without_commit() -> Result<(), anyhow::Error> {
        let store = Arc::new(FaultStore {
            backend_keys: vec!["CVE-2024-0007".to_string()],
            ..Default::default()
        });
        let graph = Graph::new(store.clone());

        graph.begin().await?;

        let spec = NodeSpec {
            node: node("CVE-2024-0007:0", "CVE-2024-0007"),
            predicates: vec![predicate("cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*", ranged())],
        };
        let err = graph
            .ingest_vulnerability(record("CVE-2024-0007"), vec![spec])
            .await
            .unwrap_err();

        assert!(!err.is_duplicate());

        // the open transaction was never committed
        assert_eq!(store.inner.count(EntityKind::Vulnerability), 0);
        assert_eq!(store.inner.count(EntityKind::ConfigurationNode), 0);
        assert_eq!(store.inner.count(EntityKind::NodeCpeRef), 0);

        Ok(())
    }
}
