/// Clustering strategy abstraction and strategy selection.
///
/// Two interchangeable strategies produce one label per input message:
/// the similarity engine (see `similarity`) and a deterministic rule-based
/// fallback with no failure modes. [`SelectingClusterer`] tries the primary
/// and switches on any reported failure, recording which strategy ran.
/// Selection is an availability contract, not a data-driven choice.
use anyhow::Result;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::categorizer::{categorize, Category};

/// Sentinel label for records not assigned to any real group. Excluded
/// from the final report.
pub const NOISE_LABEL: i64 = -1;

/// Trait for mapping a sequence of messages to group labels.
///
/// Implementations must return exactly one label per input message, in
/// input order. Label values carry no meaning beyond group identity;
/// [`NOISE_LABEL`] marks ungrouped messages.
pub trait ClusteringStrategy {
    fn cluster(&self, messages: &[&str]) -> Result<Vec<i64>>;

    /// Name reported in the `engine` field of the final report.
    fn name(&self) -> &'static str;
}

/// Rule-based fallback clustering.
///
/// Buckets message indices by `(category, first three lowercased words)`;
/// a bucket becomes a real cluster only with two or more members. Label
/// values follow bucket first-encounter order. No external dependency and
/// no failure path, so it can always stand in for the similarity engine.
pub struct RuleBasedClustering;

impl RuleBasedClustering {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleBasedClustering {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusteringStrategy for RuleBasedClustering {
    fn cluster(&self, messages: &[&str]) -> Result<Vec<i64>> {
        let mut bucket_index: FxHashMap<(Category, String), usize> = FxHashMap::default();
        let mut buckets: Vec<Vec<usize>> = Vec::new();

        for (i, message) in messages.iter().enumerate() {
            let (category, _) = categorize(message);
            let prefix = message
                .to_lowercase()
                .split_whitespace()
                .take(3)
                .collect::<Vec<_>>()
                .join(" ");

            let next = buckets.len();
            let slot = *bucket_index.entry((category, prefix)).or_insert(next);
            if slot == buckets.len() {
                buckets.push(Vec::new());
            }
            buckets[slot].push(i);
        }

        let mut labels = vec![NOISE_LABEL; messages.len()];
        let mut current: i64 = 0;
        for members in &buckets {
            if members.len() < 2 {
                continue;
            }
            for &i in members {
                labels[i] = current;
            }
            current += 1;
        }
        Ok(labels)
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// Outcome of a clustering run: the labels plus the strategy that
/// actually produced them.
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    pub labels: Vec<i64>,
    pub engine: &'static str,
}

/// Tries the primary strategy and falls back on any reported failure.
///
/// A primary failure never crosses this boundary; it is absorbed and made
/// observable only through the outcome's `engine` field.
pub struct SelectingClusterer<P: ClusteringStrategy, F: ClusteringStrategy> {
    primary: P,
    fallback: F,
}

impl<P: ClusteringStrategy, F: ClusteringStrategy> SelectingClusterer<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn cluster(&self, messages: &[&str]) -> Result<ClusteringOutcome> {
        match self.primary.cluster(messages) {
            Ok(labels) => Ok(ClusteringOutcome {
                labels,
                engine: self.primary.name(),
            }),
            Err(e) => {
                warn!(
                    "clustering strategy '{}' failed ({}), switching to '{}'",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                let labels = self.fallback.cluster(messages)?;
                Ok(ClusteringOutcome {
                    labels,
                    engine: self.fallback.name(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn test_fallback_groups_by_category_and_prefix() {
        let messages = vec![
            "Timeout expired. The timeout period elapsed",
            "Timeout expired. The connection was dropped",
            "401 Unauthorized: JWT expired",
            "401 Unauthorized: JWT signature invalid",
            "Quota exceeded on dependency service",
        ];
        let labels = RuleBasedClustering::new().cluster(&messages).unwrap();
        assert_eq!(labels.len(), 5);

        // Same category and same first three words => same bucket.
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
        assert_ne!(labels[0], NOISE_LABEL);

        // Only member of its bucket => noise.
        assert_eq!(labels[4], NOISE_LABEL);
    }

    #[test]
    fn test_fallback_requires_two_members() {
        let messages = vec![
            "Rate limit hit. Retry-After: 30",
            "Rate limit hit. Retry-After: 30",
            "OutOfMemory: worker killed",
        ];
        let labels = RuleBasedClustering::new().cluster(&messages).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], NOISE_LABEL);
        assert_eq!(labels[2], NOISE_LABEL);
    }

    #[test]
    fn test_fallback_label_order_is_bucket_encounter_order() {
        let messages = vec![
            "Quota exceeded on dependency service",
            "401 Unauthorized: JWT expired",
            "Quota exceeded on dependency service",
            "401 Unauthorized: JWT expired",
        ];
        let labels = RuleBasedClustering::new().cluster(&messages).unwrap();
        // Quota bucket was encountered first, so it takes label 0.
        assert_eq!(labels, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_fallback_never_fails() {
        let empty: Vec<&str> = Vec::new();
        assert!(RuleBasedClustering::new().cluster(&empty).unwrap().is_empty());
        assert_eq!(
            RuleBasedClustering::new().cluster(&["", ""]).unwrap(),
            vec![0, 0]
        );
    }

    struct AlwaysFails;

    impl ClusteringStrategy for AlwaysFails {
        fn cluster(&self, _messages: &[&str]) -> Result<Vec<i64>> {
            bail!("backend unavailable")
        }

        fn name(&self) -> &'static str {
            "always-fails"
        }
    }

    struct AlwaysGroupsTogether;

    impl ClusteringStrategy for AlwaysGroupsTogether {
        fn cluster(&self, messages: &[&str]) -> Result<Vec<i64>> {
            Ok(vec![0; messages.len()])
        }

        fn name(&self) -> &'static str {
            "single-group"
        }
    }

    #[test]
    fn test_selector_reports_primary_when_it_succeeds() {
        let clusterer = SelectingClusterer::new(AlwaysGroupsTogether, RuleBasedClustering::new());
        let outcome = clusterer.cluster(&["a b c", "a b c"]).unwrap();
        assert_eq!(outcome.engine, "single-group");
        assert_eq!(outcome.labels, vec![0, 0]);
    }

    #[test]
    fn test_selector_switches_on_failure() {
        let clusterer = SelectingClusterer::new(AlwaysFails, RuleBasedClustering::new());
        let outcome = clusterer
            .cluster(&["Quota exceeded on x", "Quota exceeded on y"])
            .unwrap();
        assert_eq!(outcome.engine, "fallback");
        assert_eq!(outcome.labels, vec![0, 0]);
    }
}
