use crate::graph::{error::Error, Graph};
use nvdsync_entity::{cpe_match, Entity, EntityKind};

impl Graph {
    pub async fn get_cpe_match(&self, key: &str) -> Result<Option<cpe_match::Model>, Error> {
        match self.store().get(EntityKind::CpeMatch, key).await? {
            Some(Entity::CpeMatch(model)) => Ok(Some(model)),
            _ => Ok(None),
        }
    }

    /// Reuse the stored predicate if present, otherwise create it.
    pub async fn ingest_cpe_match(
        &self,
        cpe_match: cpe_match::Model,
    ) -> Result<cpe_match::Model, Error> {
        if let Some(found) = self.get_cpe_match(&cpe_match.key).await? {
            return Ok(found);
        }

        self.store().save(cpe_match.clone().into()).await?;
        Ok(cpe_match)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::memory::MemoryStore;
    use nvdsync_entity::cpe_match::VersionBounds;
    use std::sync::Arc;
    use test_log::test;

    #[test(tokio::test)]
    async fn ingest_cpe_match_is_idempotent() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());

        let bounds = VersionBounds {
            start_including: Some("1.0".into()),
            end_excluding: Some("2.0".into()),
            ..Default::default()
        };

        let m1 = graph
            .ingest_cpe_match(cpe_match::Model::new(
                "cpe:2.3:a:acme:widget:::::::::",
                true,
                bounds.clone(),
            ))
            .await?;
        let m2 = graph
            .ingest_cpe_match(cpe_match::Model::new(
                "cpe:2.3:a:acme:widget:::::::::",
                true,
                bounds,
            ))
            .await?;

        assert_eq!(m1.key, m2.key);
        assert_eq!(store.count(EntityKind::CpeMatch), 1);

        Ok(())
    }
}
