//! The persistence contract consumed by the reconciliation engine.
//!
//! Any key-value or relational backend can satisfy it; the engine only
//! ever uses these four operations plus the transactional scope.

pub mod memory;

use async_trait::async_trait;
use nvdsync_entity::{Entity, EntityKind};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `save` hit an already-present key. Single-run ingestion looks
    /// up before saving, so this surfaces a concurrent writer rather
    /// than silently corrupting a link.
    #[error("duplicate key for {kind:?}: {key}")]
    DuplicateKey { kind: EntityKind, key: String },

    #[error("transaction error: {0}")]
    Transaction(&'static str),

    #[error("store backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Look up a single entity by its structural key. Within an open
    /// transaction this must observe writes staged since `begin`.
    async fn get(&self, kind: EntityKind, key: &str) -> Result<Option<Entity>, Error>;

    /// Insert-if-absent. A present key yields [`Error::DuplicateKey`].
    async fn save(&self, entity: Entity) -> Result<(), Error>;

    /// Open a transactional scope.
    async fn begin(&self) -> Result<(), Error>;

    /// Make all writes since the last `begin` visible atomically.
    async fn commit(&self) -> Result<(), Error>;

    /// All entities of `kind` sharing a partition key value. Used by
    /// the bulk dedup path to bound comparisons to one group.
    async fn find_by_partition_key(
        &self,
        kind: EntityKind,
        partition_key: &str,
    ) -> Result<Vec<Entity>, Error>;
}
