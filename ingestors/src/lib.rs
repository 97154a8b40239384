pub mod batch;
pub mod cpe_dict;
pub mod cve;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] nvdsync_graph::graph::error::Error),

    #[error(transparent)]
    Store(#[from] nvdsync_graph::store::Error),
}

impl Error {
    /// Store failures abort the whole run; everything else is scoped
    /// to the file being processed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Graph(_) | Error::Store(_))
    }
}
