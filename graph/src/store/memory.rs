use super::{Error, Store};
use async_trait::async_trait;
use nvdsync_entity::{Entity, EntityKind};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct State {
    committed: HashMap<EntityKind, BTreeMap<String, Entity>>,
    staged: Vec<Entity>,
    in_transaction: bool,
    partition_queries: Vec<(EntityKind, String)>,
}

/// In-memory reference backend.
///
/// Writes issued inside a transaction are staged and become visible to
/// other readers only on `commit`; `get` observes the staging area so
/// the engine can read its own uncommitted writes. Every
/// `find_by_partition_key` call is recorded, which lets tests assert
/// that the bulk dedup path never loads a foreign partition.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.state
            .lock()
            .committed
            .get(&kind)
            .map(|entries| entries.len())
            .unwrap_or_default()
    }

    pub fn partition_queries(&self) -> Vec<(EntityKind, String)> {
        self.state.lock().partition_queries.clone()
    }
}

impl State {
    fn contains(&self, kind: EntityKind, key: &str) -> bool {
        self.committed
            .get(&kind)
            .is_some_and(|entries| entries.contains_key(key))
            || self
                .staged
                .iter()
                .any(|entity| entity.kind() == kind && entity.key() == key)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, kind: EntityKind, key: &str) -> Result<Option<Entity>, Error> {
        let state = self.state.lock();

        if let Some(staged) = state
            .staged
            .iter()
            .rev()
            .find(|entity| entity.kind() == kind && entity.key() == key)
        {
            return Ok(Some(staged.clone()));
        }

        Ok(state
            .committed
            .get(&kind)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn save(&self, entity: Entity) -> Result<(), Error> {
        let mut state = self.state.lock();

        let kind = entity.kind();
        if state.contains(kind, entity.key()) {
            return Err(Error::DuplicateKey {
                kind,
                key: entity.key().to_string(),
            });
        }

        if state.in_transaction {
            state.staged.push(entity);
        } else {
            let key = entity.key().to_string();
            state.committed.entry(kind).or_default().insert(key, entity);
        }

        Ok(())
    }

    async fn begin(&self) -> Result<(), Error> {
        let mut state = self.state.lock();
        if state.in_transaction {
            return Err(Error::Transaction("transaction already open"));
        }
        state.in_transaction = true;
        Ok(())
    }

    async fn commit(&self) -> Result<(), Error> {
        let mut state = self.state.lock();
        if !state.in_transaction {
            return Err(Error::Transaction("no open transaction"));
        }

        let staged = std::mem::take(&mut state.staged);
        for entity in staged {
            let kind = entity.kind();
            let key = entity.key().to_string();
            state.committed.entry(kind).or_default().insert(key, entity);
        }
        state.in_transaction = false;

        Ok(())
    }

    async fn find_by_partition_key(
        &self,
        kind: EntityKind,
        partition_key: &str,
    ) -> Result<Vec<Entity>, Error> {
        let mut state = self.state.lock();
        state
            .partition_queries
            .push((kind, partition_key.to_string()));

        let mut out = Vec::new();
        if let Some(entries) = state.committed.get(&kind) {
            out.extend(
                entries
                    .values()
                    .filter(|entity| entity.partition_key() == Some(partition_key))
                    .cloned(),
            );
        }
        out.extend(
            state
                .staged
                .iter()
                .filter(|entity| {
                    entity.kind() == kind && entity.partition_key() == Some(partition_key)
                })
                .cloned(),
        );

        Ok(out)
    }
}
