/// Report-facing types and the analysis entry point.
///
/// The JSON shape here is the contract the dashboard consumes; field names
/// are fixed (`clusterId`, `ts`, `errors`, ...) and must not drift.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::{build_clusters, build_trend};
use crate::clustering::{ClusteringStrategy, RuleBasedClustering, SelectingClusterer};
use crate::log_source::LogRecord;
use crate::similarity::SimilarityClustering;

/// One reported error cluster, assembled once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub cluster_id: String,
    pub count: usize,
    pub category: String,
    pub confidence: f64,
    pub signature: String,
    pub sample: String,
}

/// Error count for one minute that had at least one log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub ts: String,
    pub errors: usize,
}

/// The complete incident report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub service: String,
    pub scenario: String,
    pub seed: u64,
    /// Which clustering strategy actually produced the labels.
    pub engine: String,
    pub trend: Vec<TrendPoint>,
    pub clusters: Vec<Cluster>,
}

/// Run the full analysis pipeline over a batch of records.
///
/// The only error that crosses this boundary is input malformation (a bad
/// timestamp); a primary-clustering failure is absorbed by the selector and
/// shows up only in the `engine` field. Empty input yields an empty trend
/// and cluster list.
pub fn analyze<P, F>(
    service: &str,
    scenario: &str,
    seed: u64,
    records: &[LogRecord],
    clusterer: &SelectingClusterer<P, F>,
) -> Result<Report>
where
    P: ClusteringStrategy,
    F: ClusteringStrategy,
{
    let trend = build_trend(records)?;

    let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
    let outcome = clusterer.cluster(&messages)?;
    let clusters = build_clusters(records, &outcome.labels);

    info!(
        "analyzed {} records: engine={}, clusters={}, trend points={}",
        records.len(),
        outcome.engine,
        clusters.len(),
        trend.len()
    );

    Ok(Report {
        service: service.to_string(),
        scenario: scenario.to_string(),
        seed,
        engine: outcome.engine.to_string(),
        trend,
        clusters,
    })
}

/// The default strategy pair: similarity clustering with the rule-based
/// fallback behind it.
pub fn default_clusterer() -> SelectingClusterer<SimilarityClustering, RuleBasedClustering> {
    SelectingClusterer::new(SimilarityClustering::new(), RuleBasedClustering::new())
}
