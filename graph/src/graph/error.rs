#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] crate::store::Error),
}

impl Error {
    /// A duplicate key on save means a concurrent writer beat our
    /// lookup; it is scoped to one predicate, everything else aborts
    /// the batch.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Store(crate::store::Error::DuplicateKey { .. }))
    }
}
