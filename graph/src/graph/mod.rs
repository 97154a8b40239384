//! The reconciliation engine: create-vs-reuse decisions over the
//! persistent store.

pub mod cpe;
pub mod cpe_match;
pub mod error;
pub mod vulnerability;

use crate::store::Store;
use error::Error;
use std::sync::Arc;

#[derive(Clone)]
pub struct Graph {
    store: Arc<dyn Store>,
}

impl Graph {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Open a transactional scope on the backing store.
    pub async fn begin(&self) -> Result<(), Error> {
        Ok(self.store.begin().await?)
    }

    /// Commit all writes since the last `begin`.
    pub async fn commit(&self) -> Result<(), Error> {
        Ok(self.store.commit().await?)
    }
}
