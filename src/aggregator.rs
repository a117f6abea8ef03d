/// Joins cluster labels with categorization and signatures, orders the
/// clusters for display, and builds the per-minute trend series.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::categorizer::categorize;
use crate::clustering::NOISE_LABEL;
use crate::log_source::LogRecord;
use crate::report::{Cluster, TrendPoint};
use crate::signature::build_signature;

/// Build the sorted cluster list from records and their engine labels.
///
/// Groups keep first-encounter label order, the noise group is dropped
/// entirely, and the blob for each group concatenates member messages in
/// group order. Display order: count descending, then category label
/// ascending, then signature ascending. The sort is stable, so clusters
/// equal on all three keys keep group-encounter order. Ids are assigned
/// after the sort as `CL-<rank>`, 1-based.
pub fn build_clusters(records: &[LogRecord], labels: &[i64]) -> Vec<Cluster> {
    let mut group_index: FxHashMap<i64, usize> = FxHashMap::default();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (i, &label) in labels.iter().enumerate() {
        if label == NOISE_LABEL {
            continue;
        }
        let next = groups.len();
        let slot = *group_index.entry(label).or_insert(next);
        if slot == groups.len() {
            groups.push(Vec::new());
        }
        groups[slot].push(i);
    }

    let mut clusters: Vec<Cluster> = groups
        .iter()
        .map(|members| {
            let blob = members
                .iter()
                .map(|&i| records[i].message.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let (category, confidence) = categorize(&blob);
            Cluster {
                cluster_id: String::new(), // assigned after the sort
                count: members.len(),
                category: category.label().to_string(),
                confidence,
                signature: build_signature(&blob),
                sample: records[members[0]].message.clone(),
            }
        })
        .collect();

    clusters.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.signature.cmp(&b.signature))
    });

    for (rank, cluster) in clusters.iter_mut().enumerate() {
        cluster.cluster_id = format!("CL-{}", rank + 1);
    }

    clusters
}

/// Count records per truncated minute, ascending, skipping empty minutes.
///
/// Timestamps must be RFC 3339 ('Z' or an explicit offset); a malformed
/// timestamp is an input-validation failure surfaced to the caller.
pub fn build_trend(records: &[LogRecord]) -> Result<Vec<TrendPoint>> {
    let mut per_minute: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let ts: DateTime<Utc> = DateTime::parse_from_rfc3339(&record.ts)
            .with_context(|| format!("malformed timestamp '{}'", record.ts))?
            .with_timezone(&Utc);
        // Fixed-width UTC strings sort chronologically, so the BTreeMap key
        // doubles as the output timestamp.
        let minute = ts.format("%Y-%m-%dT%H:%M:00Z").to_string();
        *per_minute.entry(minute).or_insert(0) += 1;
    }

    Ok(per_minute
        .into_iter()
        .map(|(ts, errors)| TrendPoint { ts, errors })
        .collect())
}
