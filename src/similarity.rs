/// Similarity-based clustering: TF-IDF feature vectors grouped by DBSCAN
/// over cosine distance.
///
/// Parameters are tuned so near-duplicate template messages land in one
/// group: neighborhood radius 0.8 in cosine distance, minimum group size 2
/// so singletons stay noise instead of becoming one-message "clusters".
use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::clustering::{ClusteringStrategy, NOISE_LABEL};

const EPS: f64 = 0.8;
const MIN_SAMPLES: usize = 2;

// Common english function words, dropped before weighting so shared
// boilerplate does not pull unrelated messages together.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "due",
    "for", "from", "had", "has", "have", "in", "into", "is", "it", "its",
    "of", "on", "or", "our", "prior", "so", "such", "than", "that", "the",
    "their", "then", "there", "these", "this", "to", "too", "was", "were",
    "while", "with",
];

static STOP_WORD_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

pub struct SimilarityClustering;

impl SimilarityClustering {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimilarityClustering {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusteringStrategy for SimilarityClustering {
    fn cluster(&self, messages: &[&str]) -> Result<Vec<i64>> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = vectorize(messages)?;
        Ok(dbscan(&vectors))
    }

    fn name(&self) -> &'static str {
        "tfidf-dbscan"
    }
}

/// Lowercased alphanumeric tokens of length >= 2, stop words removed.
fn tokenize(message: &str) -> Vec<String> {
    let lower = message.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2 && !STOP_WORD_SET.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// L2-normalized TF-IDF vectors, sparse over a first-encounter vocabulary.
///
/// Fails when no message contributes a single vocabulary term; that is the
/// one condition under which this strategy is unusable.
fn vectorize(messages: &[&str]) -> Result<Vec<FxHashMap<usize, f64>>> {
    let mut vocabulary: FxHashMap<String, usize> = FxHashMap::default();
    let mut doc_terms: Vec<FxHashMap<usize, usize>> = Vec::with_capacity(messages.len());

    for message in messages {
        let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
        for token in tokenize(message) {
            let next_id = vocabulary.len();
            let term_id = *vocabulary.entry(token).or_insert(next_id);
            *counts.entry(term_id).or_insert(0) += 1;
        }
        doc_terms.push(counts);
    }

    if vocabulary.is_empty() {
        bail!("empty vocabulary: no message produced any term");
    }

    // Document frequency per term
    let mut df = vec![0usize; vocabulary.len()];
    for counts in &doc_terms {
        for &term_id in counts.keys() {
            df[term_id] += 1;
        }
    }

    // Smoothed IDF: ln((1 + n) / (1 + df)) + 1, never zero or negative
    let n = messages.len() as f64;
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    let mut vectors = Vec::with_capacity(doc_terms.len());
    for counts in doc_terms {
        let mut vector: FxHashMap<usize, f64> = FxHashMap::default();
        let mut norm_sq = 0.0;
        for (term_id, count) in counts {
            let weight = count as f64 * idf[term_id];
            norm_sq += weight * weight;
            vector.insert(term_id, weight);
        }
        if norm_sq > 0.0 {
            let inv_norm = 1.0 / norm_sq.sqrt();
            for weight in vector.values_mut() {
                *weight *= inv_norm;
            }
        }
        vectors.push(vector);
    }

    Ok(vectors)
}

/// Cosine distance between two L2-normalized sparse vectors.
///
/// A vector with no terms has undefined direction; it is treated as
/// maximally distant so stop-word-only messages end up as noise.
fn cosine_distance(a: &FxHashMap<usize, f64>, b: &FxHashMap<usize, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 1.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term_id, wa)| large.get(term_id).map(|wb| wa * wb))
        .sum();
    (1.0 - dot).max(0.0)
}

/// Density-based grouping over the precomputed vectors.
///
/// Standard DBSCAN with the point itself counted toward `MIN_SAMPLES`.
/// Points reachable from no core point keep the noise label.
fn dbscan(vectors: &[FxHashMap<usize, f64>]) -> Vec<i64> {
    let n = vectors.len();
    let mut labels = vec![NOISE_LABEL; n];
    let mut visited = vec![false; n];
    let mut next_label: i64 = 0;

    let neighbors = |i: usize| -> Vec<usize> {
        (0..n)
            .filter(|&j| cosine_distance(&vectors[i], &vectors[j]) <= EPS)
            .collect()
    };

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let seed_neighbors = neighbors(i);
        if seed_neighbors.len() < MIN_SAMPLES {
            continue; // stays noise unless later claimed as a border point
        }

        let label = next_label;
        next_label += 1;
        labels[i] = label;

        let mut queue: Vec<usize> = seed_neighbors;
        while let Some(j) = queue.pop() {
            if labels[j] == NOISE_LABEL {
                labels[j] = label;
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;
            let reachable = neighbors(j);
            if reachable.len() >= MIN_SAMPLES {
                queue.extend(reachable);
            }
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_duplicates_share_a_group() {
        let messages = vec![
            "Timeout expired waiting for SQL connection",
            "Timeout expired waiting for SQL connection",
            "Timeout expired waiting for SQL connection pool",
            "401 Unauthorized: JWT expired for user",
        ];
        let labels = SimilarityClustering::new().cluster(&messages).unwrap();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], NOISE_LABEL);
        assert_eq!(labels[0], labels[2]);
    }

    #[test]
    fn test_singletons_are_noise() {
        let messages = vec![
            "disk latency elevated on volume xvda",
            "certificate chain incomplete for host",
        ];
        let labels = SimilarityClustering::new().cluster(&messages).unwrap();
        // Two unrelated messages: neither has a neighbor, both are noise.
        assert_eq!(labels, vec![NOISE_LABEL, NOISE_LABEL]);
    }

    #[test]
    fn test_empty_input_yields_no_labels() {
        let labels = SimilarityClustering::new().cluster(&[]).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        // Stop words and single characters only: nothing to vectorize.
        let messages = vec!["to be or", "a of the"];
        assert!(SimilarityClustering::new().cluster(&messages).is_err());
    }

    #[test]
    fn test_label_vector_matches_input_length() {
        let messages = vec![
            "Quota exceeded on dependency service",
            "Quota exceeded on dependency service",
            "Rate limit hit",
        ];
        let labels = SimilarityClustering::new().cluster(&messages).unwrap();
        assert_eq!(labels.len(), messages.len());
    }

    #[test]
    fn test_identical_vectors_have_zero_distance() {
        let vectors = vectorize(&["connection pool exhausted", "connection pool exhausted"]).unwrap();
        let d = cosine_distance(&vectors[0], &vectors[1]);
        assert!(d.abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_labels() {
        let messages = vec![
            "Timeout while connecting to SQL endpoint",
            "Timeout while connecting to SQL endpoint",
            "429 Too Many Requests: rate limit exceeded",
            "429 Too Many Requests: rate limit exceeded",
        ];
        let engine = SimilarityClustering::new();
        let a = engine.cluster(&messages).unwrap();
        let b = engine.cluster(&messages).unwrap();
        assert_eq!(a, b);
    }
}
