use crate::graph::{error::Error, Graph};
use crate::store::{self, Store};
use nvdsync_entity::{cpe, Entity, EntityKind};
use std::collections::{BTreeMap, HashSet};

impl Graph {
    pub async fn get_cpe(&self, uri: &str) -> Result<Option<cpe::Model>, Error> {
        match self.store().get(EntityKind::Cpe, uri).await? {
            Some(Entity::Cpe(model)) => Ok(Some(model)),
            _ => Ok(None),
        }
    }

    /// Reuse the stored identity if present, otherwise create it.
    pub async fn ingest_cpe(&self, cpe: cpe::Model) -> Result<cpe::Model, Error> {
        if let Some(found) = self.get_cpe(cpe.key()).await? {
            return Ok(found);
        }

        self.store().save(cpe.clone().into()).await?;
        Ok(cpe)
    }
}

/// Bulk creator for the platform dictionary feed.
///
/// Candidates are grouped by vendor; per group, only the store rows
/// sharing that vendor are fetched and compared, so the cost of the
/// dedup is bounded by the group size rather than the store size.
#[derive(Default)]
pub struct CpeCreator {
    groups: BTreeMap<String, BTreeMap<String, cpe::Model>>,
}

impl CpeCreator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cpe: cpe::Model) {
        let partition = cpe.vendor.clone().unwrap_or_default();
        self.groups
            .entry(partition)
            .or_default()
            .insert(cpe.uri.clone(), cpe);
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(|group| group.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> BTreeMap<String, Vec<cpe::Model>> {
        self.groups
            .into_iter()
            .map(|(partition, group)| (partition, group.into_values().collect()))
            .collect()
    }

    /// Create every candidate not already present, one partition at a
    /// time. Returns the number of created identities.
    pub async fn create(self, store: &dyn Store) -> Result<usize, Error> {
        let mut created = 0;
        for (partition, candidates) in self.into_groups() {
            created += Self::create_group(store, &partition, candidates).await?;
        }
        Ok(created)
    }

    /// Create-vs-reuse for a single vendor partition.
    pub async fn create_group(
        store: &dyn Store,
        partition: &str,
        candidates: Vec<cpe::Model>,
    ) -> Result<usize, Error> {
        let existing = store
            .find_by_partition_key(EntityKind::Cpe, partition)
            .await?
            .into_iter()
            .map(|entity| entity.key().to_string())
            .collect::<HashSet<_>>();

        let mut created = 0;
        for candidate in candidates {
            if existing.contains(&candidate.uri) {
                continue;
            }
            match store.save(candidate.into()).await {
                Ok(()) => created += 1,
                Err(store::Error::DuplicateKey { key, .. }) => {
                    log::warn!("identity {key} created concurrently, reusing");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(created)
    }
}
