use crate::Error;
use nvdsync_common::config::Import;
use nvdsync_graph::graph::Graph;
use std::time::Instant;

/// Groups top-level records into store transactions.
///
/// A transaction is opened lazily on the first record and committed once
/// `batch_size` records have been completed. With time buckets enabled a
/// commit also happens whenever `commit_interval` has elapsed since the
/// last one, so a slow bulk import still makes durable progress.
pub struct BatchCoordinator {
    graph: Graph,
    config: Import,
    time_buckets: bool,
    in_flight: usize,
    processed: usize,
    open: bool,
    last_commit: Instant,
}

impl BatchCoordinator {
    pub fn new(graph: Graph, config: Import) -> Self {
        Self {
            graph,
            config,
            time_buckets: false,
            in_flight: 0,
            processed: 0,
            open: false,
            last_commit: Instant::now(),
        }
    }

    /// Also commit on elapsed wall time, not only on record count.
    pub fn with_time_buckets(graph: Graph, config: Import) -> Self {
        Self {
            time_buckets: true,
            ..Self::new(graph, config)
        }
    }

    /// Call before processing a record. Opens a transaction if none is
    /// in progress.
    pub async fn enter(&mut self) -> Result<(), Error> {
        if !self.open {
            self.graph.begin().await?;
            self.open = true;
            self.last_commit = Instant::now();
        }
        Ok(())
    }

    /// Call after a record has been fully reconciled. Commits the open
    /// transaction when the batch is full or the time bucket is over.
    pub async fn complete_record(&mut self) -> Result<(), Error> {
        self.in_flight += 1;
        self.processed += 1;

        let batch_full = self.in_flight >= self.config.batch_size;
        let bucket_over =
            self.time_buckets && self.last_commit.elapsed() >= self.config.commit_interval;

        if batch_full || bucket_over {
            self.commit().await?;
        }

        Ok(())
    }

    /// Commit whatever remains and return the total number of records
    /// completed through this coordinator.
    pub async fn finish(mut self) -> Result<usize, Error> {
        if self.open {
            self.commit().await?;
        }
        Ok(self.processed)
    }

    async fn commit(&mut self) -> Result<(), Error> {
        self.graph.commit().await?;
        log::debug!(
            "committed batch of {} (total {})",
            self.in_flight,
            self.processed
        );
        self.open = false;
        self.in_flight = 0;
        self.last_commit = Instant::now();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nvdsync_entity::{vulnerability, Entity, EntityKind};
    use nvdsync_graph::store::{memory::MemoryStore, Store};
    use std::sync::Arc;
    use test_log::test;

    fn record(id: &str) -> Entity {
        Entity::Vulnerability(vulnerability::Model {
            id: id.to_string(),
            data_type: None,
            data_format: None,
            data_version: None,
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
        })
    }

    #[test(tokio::test)]
    async fn commits_every_batch_size_records() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());
        let config = Import {
            batch_size: 2,
            ..Default::default()
        };

        let mut batch = BatchCoordinator::new(graph.clone(), config);

        for i in 0..3 {
            batch.enter().await?;
            graph.store().save(record(&format!("CVE-2024-{i:04}"))).await?;
            batch.complete_record().await?;
        }

        // two committed by the full batch, one still staged
        assert_eq!(store.count(EntityKind::Vulnerability), 2);

        let processed = batch.finish().await?;
        assert_eq!(processed, 3);
        assert_eq!(store.count(EntityKind::Vulnerability), 3);

        Ok(())
    }

    #[test(tokio::test)]
    async fn finish_without_records_is_a_noop() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let batch = BatchCoordinator::new(Graph::new(store), Import::default());

        assert_eq!(batch.finish().await?, 0);

        Ok(())
    }

    #[test(tokio::test)]
    async fn failed_record_leaves_the_batch_uncommitted() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());

        let mut batch = BatchCoordinator::new(graph.clone(), Import::default());

        // the record errors out between enter and complete, so the
        // coordinator is dropped without a commit
        batch.enter().await?;
        graph.store().save(record("CVE-2024-0001")).await?;
        drop(batch);

        assert_eq!(store.count(EntityKind::Vulnerability), 0);

        Ok(())
    }

    #[test(tokio::test)]
    async fn elapsed_bucket_forces_a_commit() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryStore::new());
        let graph = Graph::new(store.clone());
        let config = Import {
            batch_size: 1000,
            commit_interval: std::time::Duration::ZERO,
        };

        let mut batch = BatchCoordinator::with_time_buckets(graph.clone(), config);

        batch.enter().await?;
        graph.store().save(record("CVE-2024-0001")).await?;
        batch.complete_record().await?;

        // far below the batch size, committed by the zero-length bucket
        assert_eq!(store.count(EntityKind::Vulnerability), 1);

        batch.finish().await?;

        Ok(())
    }
}
