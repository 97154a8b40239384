use nvdsync_common::config::Import;
use nvdsync_graph::{graph::Graph, store::memory::MemoryStore};
use nvdsync_ingestors::batch::BatchCoordinator;
use nvdsync_ingestors::cpe_dict::{loader::DictionarySummary, CpeDictionaryLoader};
use nvdsync_ingestors::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(clap::Args, Debug)]
pub struct ImportCpeDictionaryCommand {
    /// Match-dictionary feed files, processed in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub import: Import,
}

impl ImportCpeDictionaryCommand {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let graph = Graph::new(Arc::new(MemoryStore::new()));
        let loader = CpeDictionaryLoader::new(&graph);

        let mut failed = false;

        for file in &self.files {
            match self.import_file(&graph, &loader, file).await {
                Ok(summary) => {
                    log::info!(
                        "{}: {} identities created, {} range entries, {} skipped",
                        file.display(),
                        summary.identities_created,
                        summary.matches_processed,
                        summary.skipped
                    );
                }
                Err(err) if err.is_fatal() => {
                    log::error!("aborting at {}: {err}", file.display());
                    return Ok(ExitCode::FAILURE);
                }
                Err(err) => {
                    log::warn!("failed to import {}: {err}", file.display());
                    failed = true;
                }
            }
        }

        Ok(if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }

    async fn import_file(
        &self,
        graph: &Graph,
        loader: &CpeDictionaryLoader<'_>,
        file: &Path,
    ) -> Result<DictionarySummary, Error> {
        let document = BufReader::new(File::open(file)?);

        let mut batch = BatchCoordinator::with_time_buckets(graph.clone(), self.import.clone());
        let summary = loader
            .load(&file.display().to_string(), document, &mut batch)
            .await?;
        batch.finish().await?;

        Ok(summary)
    }
}
