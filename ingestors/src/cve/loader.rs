use crate::batch::BatchCoordinator;
use crate::cve::{configurations, feed};
use crate::Error;
use nvdsync_common::time::parse_feed_timestamp;
use nvdsync_entity::{cvss2, cvss3, vulnerability};
use nvdsync_graph::graph::{vulnerability::NodeSpec, Graph};
use std::io::Read;
use std::time::Instant;

/// Outcome of loading one feed file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records reconciled into the store.
    pub processed: usize,
    /// Records dropped as malformed.
    pub skipped: usize,
}

/// Parses a vulnerability feed file and reconciles every record through
/// the graph, batching commits via the coordinator.
pub struct CveLoader<'g> {
    graph: &'g Graph,
}

impl<'g> CveLoader<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub async fn load<R: Read>(
        &self,
        location: &str,
        document: R,
        batch: &mut BatchCoordinator,
    ) -> Result<LoadSummary, Error> {
        let start = Instant::now();
        log::info!("parsing {location}");

        let feed: feed::Feed = serde_json::from_reader(document)?;

        log::info!(
            "parsed {location}: {} records (feed timestamp {}) in {}",
            feed.items.len(),
            feed.timestamp.as_deref().unwrap_or("unknown"),
            humantime::format_duration(start.elapsed())
        );

        let mut summary = LoadSummary::default();

        for item in &feed.items {
            let Some((record, nodes)) = assemble(item) else {
                summary.skipped += 1;
                continue;
            };

            batch.enter().await?;
            self.graph.ingest_vulnerability(record, nodes).await?;
            batch.complete_record().await?;

            summary.processed += 1;
        }

        log::info!(
            "loaded {location}: {} records, {} skipped, {}",
            summary.processed,
            summary.skipped,
            humantime::format_duration(start.elapsed())
        );

        Ok(summary)
    }
}

/// Project one feed item into a record plus its configuration tree.
/// An unparseable timestamp drops the record, nothing else does.
fn assemble(item: &feed::Item) -> Option<(vulnerability::Model, Vec<NodeSpec>)> {
    let id = item.cve.meta.id.clone();

    let published = match parse_feed_timestamp(&item.published_date) {
        Ok(published) => published,
        Err(err) => {
            log::warn!("skipping {id}: {err}");
            return None;
        }
    };
    let modified = match parse_feed_timestamp(&item.last_modified_date) {
        Ok(modified) => modified,
        Err(err) => {
            log::warn!("skipping {id}: {err}");
            return None;
        }
    };

    let descriptions = item
        .cve
        .description
        .iter()
        .flat_map(|block| &block.description_data)
        .map(|entry| vulnerability::Description {
            lang: entry.lang.clone(),
            value: entry.value.clone(),
        })
        .collect();

    let references = item
        .cve
        .references
        .iter()
        .flat_map(|block| &block.reference_data)
        .map(|entry| vulnerability::Reference {
            url: entry.url.clone(),
            name: entry.name.clone(),
            source: entry.refsource.clone(),
            tags: entry.tags.clone(),
        })
        .collect();

    let cwes = item
        .cve
        .problemtype
        .iter()
        .flat_map(|block| &block.problemtype_data)
        .flat_map(|entry| &entry.description)
        .filter(|entry| !entry.value.is_empty())
        .map(|entry| entry.value.clone())
        .collect();

    let cvss2 = item
        .impact
        .as_ref()
        .and_then(|impact| impact.base_metric_v2.as_ref())
        .map(metrics_v2);
    let cvss3 = item
        .impact
        .as_ref()
        .and_then(|impact| impact.base_metric_v3.as_ref())
        .map(metrics_v3);

    let base_score_v2 = cvss2.as_ref().and_then(|metrics| metrics.base_score);
    let base_score_v3 = cvss3.as_ref().and_then(|metrics| metrics.base_score);

    let nodes = item
        .configurations
        .as_ref()
        .map(|configurations| configurations::build(&id, &configurations.nodes))
        .unwrap_or_default();

    Some((
        vulnerability::Model {
            id,
            data_type: item.cve.data_type.clone(),
            data_format: item.cve.data_format.clone(),
            data_version: item.cve.data_version.clone(),
            assigner: item.cve.meta.assigner.clone(),
            descriptions,
            references,
            cwes,
            cvss2,
            cvss3,
            base_score_v2,
            base_score_v3,
            published,
            modified,
        },
        nodes,
    ))
}

fn metrics_v2(metric: &feed::BaseMetricV2) -> cvss2::Model {
    cvss2::Model {
        severity: metric.severity.clone(),
        base_score: metric.cvss_v2.base_score,
        exploitability_score: metric.exploitability_score,
        impact_score: metric.impact_score,
        obtain_all_privilege: metric.obtain_all_privilege,
        obtain_user_privilege: metric.obtain_user_privilege,
        obtain_other_privilege: metric.obtain_other_privilege,
        user_interaction_required: metric.user_interaction_required,
        ac_insuf_info: metric.ac_insuf_info,
        ..cvss2::Model::decompose(&metric.cvss_v2.vector_string)
    }
}

fn metrics_v3(metric: &feed::BaseMetricV3) -> cvss3::Model {
    cvss3::Model {
        base_severity: metric.cvss_v3.base_severity.clone(),
        base_score: metric.cvss_v3.base_score,
        exploitability_score: metric.exploitability_score,
        impact_score: metric.impact_score,
        ..cvss3::Model::decompose(&metric.cvss_v3.vector_string)
    }
}
