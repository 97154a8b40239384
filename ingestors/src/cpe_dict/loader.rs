use crate::batch::BatchCoordinator;
use crate::cpe_dict::feed;
use crate::Error;
use nvdsync_common::cpe::{self, Cpe};
use nvdsync_entity::cpe_match::{self, VersionBounds};
use nvdsync_graph::graph::{cpe::CpeCreator, Graph};
use std::io::Read;
use std::str::FromStr;
use std::time::Instant;

/// Outcome of loading one dictionary file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DictionarySummary {
    /// New plain identities created.
    pub identities_created: usize,
    /// Range-qualified entries reconciled.
    pub matches_processed: usize,
    /// Entries dropped as malformed.
    pub skipped: usize,
}

/// A normalized dictionary entry, ready for reconciliation.
struct Candidate {
    base: Cpe,
    bounds: VersionBounds,
    matched: Vec<Cpe>,
}

/// Parses a platform dictionary feed and bulk-reconciles its identities
/// through the vendor-partitioned dedup path. Dictionary files are large
/// single documents, so commits are time-bucketed as well as counted.
pub struct CpeDictionaryLoader<'g> {
    graph: &'g Graph,
}

impl<'g> CpeDictionaryLoader<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub async fn load<R: Read>(
        &self,
        location: &str,
        document: R,
        batch: &mut BatchCoordinator,
    ) -> Result<DictionarySummary, Error> {
        let start = Instant::now();
        log::info!("parsing {location}");

        let feed: feed::Feed = serde_json::from_reader(document)?;

        log::info!(
            "parsed {location}: {} entries in {}",
            feed.matches.len(),
            humantime::format_duration(start.elapsed())
        );

        let mut summary = DictionarySummary::default();
        let mut creator = CpeCreator::new();
        let mut candidates = Vec::new();

        for entry in &feed.matches {
            let Some(candidate) = normalize(entry, &mut summary) else {
                continue;
            };

            creator.add(candidate.base.clone().into());
            for matched in &candidate.matched {
                creator.add(matched.clone().into());
            }
            candidates.push(candidate);
        }

        log::info!("deduplicating {} identities", creator.len());

        for (partition, group) in creator.into_groups() {
            batch.enter().await?;
            summary.identities_created +=
                CpeCreator::create_group(self.graph.store(), &partition, group).await?;
            batch.complete_record().await?;
        }

        log::info!(
            "deduplicated identities in {}",
            humantime::format_duration(start.elapsed())
        );

        for candidate in candidates {
            if candidate.bounds.is_empty() {
                continue;
            }

            batch.enter().await?;
            let mut model = cpe_match::Model::new(candidate.base.uri(), true, candidate.bounds);
            model.matched_cpe_uris = candidate
                .matched
                .iter()
                .map(|matched| matched.uri().to_string())
                .collect();
            self.graph.ingest_cpe_match(model).await?;
            batch.complete_record().await?;

            summary.matches_processed += 1;
        }

        log::info!(
            "loaded {location}: {} identities created, {} range entries, {} skipped, {}",
            summary.identities_created,
            summary.matches_processed,
            summary.skipped,
            humantime::format_duration(start.elapsed())
        );

        Ok(summary)
    }
}

/// Normalize one entry. A URI which does not normalize drops the whole
/// entry; a malformed enumerated name drops only that name.
fn normalize(entry: &feed::MatchEntry, summary: &mut DictionarySummary) -> Option<Candidate> {
    let base = match Cpe::from_str(&entry.cpe23_uri) {
        Ok(base) => base,
        Err(err) => {
            log::warn!("skipping dictionary entry {}: {err}", entry.cpe23_uri);
            summary.skipped += 1;
            return None;
        }
    };

    let matched = entry
        .cpe_name
        .iter()
        .filter_map(|name| match Cpe::from_str(&name.cpe23_uri) {
            Ok(matched) => Some(matched),
            Err(err) => {
                log::warn!("skipping matched name {}: {err}", name.cpe23_uri);
                None
            }
        })
        .collect();

    Some(Candidate {
        base,
        bounds: VersionBounds {
            start_excluding: entry.version_start_excluding.as_deref().map(cpe::unescape),
            start_including: entry.version_start_including.as_deref().map(cpe::unescape),
            end_excluding: entry.version_end_excluding.as_deref().map(cpe::unescape),
            end_including: entry.version_end_including.as_deref().map(cpe::unescape),
        },
        matched,
    })
}
